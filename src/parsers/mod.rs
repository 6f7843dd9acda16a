use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

pub mod panel;
pub mod ped;
pub mod vcf;

pub use panel::parse_panel;
pub use ped::parse_ped;
pub use vcf::VcfParser;

/// Open a possibly gzip-compressed text file for buffered reading
pub(crate) fn open_file(path: &Path) -> Result<Box<dyn BufRead>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    if path.extension().map(|ext| ext == "gz").unwrap_or(false) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}
