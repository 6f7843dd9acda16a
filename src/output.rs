use anyhow::{Context, Result};
use chrono::Local;
use csv::WriterBuilder;
use serde_json::to_string_pretty;
use std::fs;
use std::path::{Path, PathBuf};

use crate::types::{Candidate, CandidateVariants, Variant};

/// Supported report formats
#[derive(Debug, Clone, Copy)]
pub enum ReportFormat {
    Json,
    Tsv,
    All,
}

/// Writes per-family candidate reports into an output directory
pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl ReportGenerator {
    pub fn new(output_dir: &Path) -> Result<Self> {
        if !output_dir.exists() {
            fs::create_dir_all(output_dir).with_context(|| {
                format!("Failed to create output directory {}", output_dir.display())
            })?;
        }
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
        })
    }

    /// Generate reports in the specified format(s) for one family's run
    pub fn generate(
        &self,
        family_id: &str,
        candidates: &CandidateVariants,
        format: ReportFormat,
    ) -> Result<()> {
        match format {
            ReportFormat::Json => self.generate_json_report(family_id, candidates)?,
            ReportFormat::Tsv => self.generate_tsv_report(family_id, candidates)?,
            ReportFormat::All => {
                self.generate_json_report(family_id, candidates)?;
                self.generate_tsv_report(family_id, candidates)?;
            }
        }
        Ok(())
    }

    fn generate_json_report(&self, family_id: &str, candidates: &CandidateVariants) -> Result<()> {
        let filename = self.report_path(family_id, "json");
        let json = to_string_pretty(candidates)?;
        fs::write(&filename, json)
            .with_context(|| format!("Failed to write JSON report to {}", filename.display()))?;
        Ok(())
    }

    fn generate_tsv_report(&self, family_id: &str, candidates: &CandidateVariants) -> Result<()> {
        let filename = self.report_path(family_id, "tsv");
        let mut writer = WriterBuilder::new()
            .delimiter(b'\t')
            .from_path(&filename)
            .with_context(|| format!("Failed to write TSV report to {}", filename.display()))?;

        writer.write_record([
            "family_id",
            "result",
            "hgnc_id",
            "variant_id",
            "modes",
            "trio_genotype",
        ])?;

        let mut singles: Vec<(&String, &Candidate)> =
            candidates.single_variants.iter().collect();
        singles.sort_by(|a, b| a.0.cmp(b.0));
        for (variant_id, candidate) in singles {
            writer.write_record(candidate_record(family_id, "single_variant", variant_id, candidate))?;
        }

        let mut genes: Vec<&String> = candidates.compound_hets.keys().collect();
        genes.sort();
        for gene in genes {
            let mut pairs: Vec<(&String, &Candidate)> =
                candidates.compound_hets[gene].iter().collect();
            pairs.sort_by(|a, b| a.0.cmp(b.0));
            for (variant_id, candidate) in pairs {
                writer.write_record(candidate_record(
                    family_id,
                    "compound_het",
                    variant_id,
                    candidate,
                ))?;
            }
        }

        writer.flush()?;
        Ok(())
    }

    fn report_path(&self, family_id: &str, extension: &str) -> PathBuf {
        let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
        self.output_dir
            .join(format!("{}_candidates_{}.{}", family_id, timestamp, extension))
    }
}

fn candidate_record(
    family_id: &str,
    result: &str,
    variant_id: &str,
    candidate: &Candidate,
) -> Vec<String> {
    let mut modes: Vec<&str> = candidate.modes.iter().map(|m| m.label()).collect();
    modes.sort_unstable();
    let trio_genotype = match &candidate.variant {
        Variant::Snv(snv) => snv.trio_genotype.map(|t| t.to_string()),
        Variant::Cnv(cnv) => cnv.trio_genotype.map(|t| t.to_string()),
    };
    vec![
        family_id.to_string(),
        result.to_string(),
        candidate.hgnc_id.clone(),
        variant_id.to_string(),
        modes.join(";"),
        trio_genotype.unwrap_or_default(),
    ]
}
