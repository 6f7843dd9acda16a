//! # Trio Triage
//!
//! Inheritance classification of candidate disease variants in sequenced
//! family trios (affected child plus zero, one or two parents).
//!
//! ## Features
//!
//! - Pedigree sample sheet loading into family structures
//! - DDG2P-style disease-gene panel loading (modes, mechanisms, coordinates)
//! - Trio genotype assembly for every variant observed in the child
//! - Per-gene inheritance-mode classification of SNVs and CNVs
//!   (biallelic, monoallelic, hemizygous, X-linked dominant, imprinted, mosaic)
//! - Candidate aggregation into single-variant and compound-het buckets
//! - JSON and TSV candidate reports, families processed in parallel

pub mod family;
pub mod inheritance;
pub mod output;
pub mod parsers;
pub mod trio;
pub mod types;

// Re-export key types
pub use family::{Family, Person};
pub use inheritance::{CnvRuleParams, InheritanceClassifier};
pub use output::{ReportFormat, ReportGenerator};
pub use parsers::{parse_panel, parse_ped, VcfParser};
pub use trio::{assemble_trio_genotypes, group_by_gene};
pub use types::*;
