use anyhow::{Context, Result};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::collections::hash_map::Entry;
use std::path::Path;
use tracing::warn;

use crate::types::{GeneEntry, GenePanel, ImprintedOrigin, InheritanceMode, Mechanism};

/// One row of the gene panel CSV; a gene may span several rows when it is
/// associated with more than one disease entry.
#[derive(Debug, Deserialize)]
struct PanelRow {
    hgnc_id: String,
    symbol: String,
    chr: String,
    start: u64,
    end: u64,
    mode: String,
    mechanism: String,
    #[serde(default)]
    imprinting: String,
}

/// Load a DDG2P-style gene panel CSV into a `GenePanel`.
///
/// `mode` and `mechanism` are `;`-separated label lists. Labels the panel
/// schema doesn't know are skipped with a warning rather than failing the
/// load; curated panels outlive code releases.
pub fn parse_panel(path: &Path) -> Result<GenePanel> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open gene panel {}", path.display()))?;

    let mut panel = GenePanel::new();
    for (rowno, result) in reader.deserialize().enumerate() {
        let row: PanelRow = result
            .with_context(|| format!("{} row {}", path.display(), rowno + 1))?;

        let modes = row
            .mode
            .split(';')
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .filter_map(|label| {
                let mode = InheritanceMode::from_label(label);
                if mode.is_none() {
                    warn!("{}: unknown inheritance mode '{}' skipped", row.hgnc_id, label);
                }
                mode
            });
        let mechanisms = row
            .mechanism
            .split(';')
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .filter_map(|label| {
                let mechanism = Mechanism::from_label(label);
                if mechanism.is_none() {
                    warn!("{}: unknown mechanism '{}' skipped", row.hgnc_id, label);
                }
                mechanism
            });
        let imprinting = ImprintedOrigin::from_label(row.imprinting.trim());

        match panel.genes.entry(row.hgnc_id.clone()) {
            Entry::Occupied(mut occupied) => {
                let existing = occupied.get_mut();
                existing.modes.extend(modes);
                existing.mechanisms.extend(mechanisms);
                if existing.imprinting.is_none() {
                    existing.imprinting = imprinting;
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(GeneEntry {
                    chrom: row.chr,
                    start: row.start,
                    end: row.end,
                    symbol: row.symbol,
                    modes: modes.collect(),
                    mechanisms: mechanisms.collect(),
                    imprinting,
                });
            }
        }
    }
    Ok(panel)
}
