use anyhow::{anyhow, Context, Result};
use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;
use tracing::debug;

use crate::parsers::open_file;
use crate::types::{Cnv, CnvAllele, CnvInheritance, Genotype, Snv, TriageError, Variant};

/// Parser for annotated single-sample VCF files (plain or gzipped).
///
/// SNV records carry GT/GQ/AD sample data and an HGNC_ID annotation; CNV
/// records are recognised by a symbolic alt (`<DEL>`/`<DUP>`) and carry
/// END, CN and CNV_INH in INFO.
pub struct VcfParser;

impl VcfParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse every annotated record into a variant-id keyed map
    pub fn parse(&self, path: &Path) -> Result<HashMap<String, Variant>> {
        let reader = open_file(path)?;
        let mut variants = HashMap::new();

        for (lineno, line) in reader.lines().enumerate() {
            let line =
                line.with_context(|| format!("{} line {}", path.display(), lineno + 1))?;
            if line.starts_with('#') || line.trim().is_empty() {
                continue;
            }
            let parsed = self
                .parse_record(&line)
                .with_context(|| format!("{} line {}", path.display(), lineno + 1))?;
            if let Some(variant) = parsed {
                variants.insert(variant.id(), variant);
            }
        }
        Ok(variants)
    }

    fn parse_record(&self, line: &str) -> Result<Option<Variant>> {
        let parts: Vec<&str> = line.trim_end().split('\t').collect();
        if parts.len() < 8 {
            return Err(anyhow!("Invalid VCF line: not enough columns"));
        }

        let chrom = parts[0].trim_start_matches("chr").to_string();
        let pos: u64 = parts[1]
            .parse()
            .with_context(|| format!("Invalid position: {}", parts[1]))?;
        let ref_allele = parts[3].to_string();
        let alt = parts[4];
        let info = parse_info_field(parts[7]);

        // unannotated records can never reach a panel gene
        let Some(hgnc_id) = info.get("HGNC_ID") else {
            debug!("{}_{} has no HGNC_ID annotation; skipped", chrom, pos);
            return Ok(None);
        };
        let symbol = info.get("SYMBOL").cloned().unwrap_or_default();

        if alt.starts_with('<') {
            let allele = CnvAllele::from_alt(alt).ok_or_else(|| {
                TriageError::UnrecognizedVariantType(format!("{}_{}_{}", chrom, pos, alt))
            })?;
            let end: u64 = info
                .get("END")
                .context("CNV record missing END")?
                .parse()
                .context("Invalid CNV END")?;
            let copy_number: u32 = info
                .get("CN")
                .context("CNV record missing CN")?
                .parse()
                .context("Invalid CNV CN")?;
            let inheritance = info
                .get("CNV_INH")
                .map(|label| CnvInheritance::from_label(label))
                .unwrap_or_else(|| CnvInheritance::Unknown("missing".to_string()));

            Ok(Some(Variant::Cnv(Cnv {
                chrom,
                start: pos,
                end,
                ref_allele,
                allele,
                hgnc_id: hgnc_id.clone(),
                symbol,
                copy_number,
                inheritance,
                trio_genotype: None,
            })))
        } else {
            if parts.len() < 10 {
                return Err(anyhow!("SNV record without FORMAT and sample columns"));
            }
            let sample = parse_sample_fields(parts[8], parts[9]);
            let Some(genotype) = sample.get("GT").and_then(|gt| Genotype::from_gt(gt)) else {
                debug!("{}_{} has no usable genotype call; skipped", chrom, pos);
                return Ok(None);
            };
            let genotype_quality = sample.get("GQ").and_then(|gq| gq.parse().ok());
            let allele_depths = sample.get("AD").and_then(|ad| parse_allele_depths(ad));

            Ok(Some(Variant::Snv(Snv {
                chrom,
                pos,
                ref_allele,
                alt_allele: alt.to_string(),
                hgnc_id: hgnc_id.clone(),
                symbol,
                consequence: info.get("CONSEQUENCE").cloned().unwrap_or_default(),
                genotype,
                genotype_quality,
                allele_depths,
                trio_genotype: None,
            })))
        }
    }
}

impl Default for VcfParser {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_info_field(info_str: &str) -> HashMap<String, String> {
    let mut info_map = HashMap::new();
    if info_str == "." {
        return info_map;
    }
    for entry in info_str.split(';') {
        if let Some(eq_pos) = entry.find('=') {
            info_map.insert(entry[..eq_pos].to_string(), entry[eq_pos + 1..].to_string());
        } else {
            info_map.insert(entry.to_string(), "true".to_string());
        }
    }
    info_map
}

/// Zip the FORMAT keys with the sample column values
fn parse_sample_fields(format_str: &str, sample_str: &str) -> HashMap<String, String> {
    format_str
        .split(':')
        .zip(sample_str.split(':'))
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

fn parse_allele_depths(ad: &str) -> Option<(u32, u32)> {
    let mut depths = ad.split(',');
    let ref_depth = depths.next()?.parse().ok()?;
    let alt_depth = depths.next()?.parse().ok()?;
    Some((ref_depth, alt_depth))
}
