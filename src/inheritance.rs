use std::collections::HashSet;
use tracing::debug;

use crate::family::Family;
use crate::types::{
    Candidate, CandidateVariants, Cnv, CnvInheritance, GeneEntry, GenePanel, Genotype,
    ImprintedOrigin, InheritanceMode, Mechanism, ParentCall, Snv, TriageError, TrioGenotype,
    Variant, VariantsPerGene,
};

/// Allele-balance ceiling under which a heterozygous call is treated as mosaic
const MOSAIC_ALLELE_BALANCE: f64 = 0.30;

/// Default minimum CNV length for the non-panel screen
const DEFAULT_MIN_CNV_LENGTH: u64 = 1_000_000;

/// CNV-only rule parameters; `None` for SNV-only runs
#[derive(Debug, Clone)]
pub struct CnvRuleParams {
    pub min_length: u64,
}

impl Default for CnvRuleParams {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_CNV_LENGTH,
        }
    }
}

/// Evaluates every child variant in every panel gene against the gene's
/// inheritance modes, filling its own `candidate_variants` as it goes.
///
/// One classifier run per family; runs never share state, so callers may
/// process families in parallel.
pub struct InheritanceClassifier<'a> {
    variants_per_gene: &'a VariantsPerGene,
    family: &'a Family,
    panel: &'a GenePanel,
    cnv_params: Option<CnvRuleParams>,
    pub candidate_variants: CandidateVariants,
}

impl<'a> InheritanceClassifier<'a> {
    pub fn new(
        variants_per_gene: &'a VariantsPerGene,
        family: &'a Family,
        panel: &'a GenePanel,
        cnv_params: Option<CnvRuleParams>,
    ) -> Self {
        Self {
            variants_per_gene,
            family,
            panel,
            cnv_params,
            candidate_variants: CandidateVariants::new(),
        }
    }

    /// Classify every variant of every gene present in both the grouping and
    /// the panel. Aborts the run on the fatal conditions; partial results are
    /// never returned to the caller.
    pub fn classify_genes(&mut self) -> Result<(), TriageError> {
        let per_gene = self.variants_per_gene;
        let panel = self.panel;
        for (hgnc_id, gene_variants) in per_gene {
            let Some(gene) = panel.get(hgnc_id) else {
                continue;
            };
            for (variant_id, trio_variant) in gene_variants {
                match &trio_variant.child {
                    Variant::Snv(snv) => {
                        self.classify_snv(hgnc_id, gene, variant_id, snv, &trio_variant.child)?
                    }
                    Variant::Cnv(cnv) => {
                        self.classify_cnv(hgnc_id, gene, variant_id, cnv, &trio_variant.child)?
                    }
                }
            }
        }
        Ok(())
    }

    /// SNV decision table. Every mode tagged on the gene is evaluated
    /// independently; parental affected status is never a gate.
    fn classify_snv(
        &mut self,
        hgnc_id: &str,
        gene: &GeneEntry,
        variant_id: &str,
        snv: &Snv,
        variant: &Variant,
    ) -> Result<(), TriageError> {
        let Some(TrioGenotype::Snv { child, mum, dad }) = snv.trio_genotype else {
            return Err(TriageError::MissingTrioGenotype(variant_id.to_string()));
        };
        let male = self.family.proband().is_male();

        for mode in &gene.modes {
            match mode {
                InheritanceMode::Biallelic => match child {
                    Genotype::Heterozygous => {
                        // only two hom-alt parents rule out a het child
                        let both_hom_alt = mum.is_called(Genotype::HomozygousAlt)
                            && dad.is_called(Genotype::HomozygousAlt);
                        if !both_hom_alt {
                            self.candidate_variants
                                .add_compound_het(hgnc_id, variant_id, *mode, variant);
                        }
                    }
                    Genotype::HomozygousAlt => {
                        // every called parent must carry at least one alt
                        let parent_is_ref = mum.is_called(Genotype::Reference)
                            || dad.is_called(Genotype::Reference);
                        if !parent_is_ref {
                            self.candidate_variants
                                .add_single(variant_id, *mode, variant, hgnc_id);
                        }
                    }
                    Genotype::Reference => {}
                },
                InheritanceMode::Monoallelic => {
                    if child == Genotype::Heterozygous {
                        self.candidate_variants
                            .add_single(variant_id, *mode, variant, hgnc_id);
                    }
                }
                InheritanceMode::XLinkedDominant => {
                    let hemizygous_alt = child == Genotype::HomozygousAlt && male;
                    if child == Genotype::Heterozygous || hemizygous_alt {
                        self.candidate_variants
                            .add_single(variant_id, *mode, variant, hgnc_id);
                    }
                }
                InheritanceMode::Hemizygous => {
                    if male && child.carries_alt() {
                        self.candidate_variants
                            .add_single(variant_id, *mode, variant, hgnc_id);
                    }
                }
                InheritanceMode::Imprinted => match gene.imprinting {
                    Some(direction) => {
                        if child.carries_alt()
                            && parental_origin(mum, dad) == Some(direction)
                        {
                            self.candidate_variants
                                .add_single(variant_id, *mode, variant, hgnc_id);
                        }
                    }
                    None => {
                        debug!("gene {} tagged Imprinted without a direction", hgnc_id);
                    }
                },
                InheritanceMode::Mosaic => {
                    if child == Genotype::Heterozygous
                        && !mum.carries_alt()
                        && !dad.carries_alt()
                    {
                        if let Some(balance) = snv.allele_balance() {
                            if balance < MOSAIC_ALLELE_BALANCE {
                                self.candidate_variants
                                    .add_single(variant_id, *mode, variant, hgnc_id);
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// CNV decision table, layered on copy number, mechanism and gene overlap
    fn classify_cnv(
        &mut self,
        hgnc_id: &str,
        gene: &GeneEntry,
        variant_id: &str,
        cnv: &Cnv,
        variant: &Variant,
    ) -> Result<(), TriageError> {
        if let CnvInheritance::Unknown(label) = &cnv.inheritance {
            return Err(TriageError::UndeterminedCnvInheritance {
                id: variant_id.to_string(),
                label: label.clone(),
            });
        }

        let min_length = self
            .cnv_params
            .as_ref()
            .map(|p| p.min_length)
            .unwrap_or(DEFAULT_MIN_CNV_LENGTH);
        if cnv.length() < min_length
            && !self.panel.overlaps_span(&cnv.chrom, cnv.start, cnv.end)
        {
            debug!(
                "{} shorter than {}bp with no panel overlap; rejected",
                variant_id, min_length
            );
            return Ok(());
        }

        let male = self.family.proband().is_male();
        let cn = cnv.copy_number;

        for mode in &gene.modes {
            match mode {
                InheritanceMode::Biallelic => {
                    if cn == 0
                        && (gene.has_mechanism(Mechanism::Uncertain)
                            || gene.has_mechanism(Mechanism::LossOfFunction)
                            || gene.has_mechanism(Mechanism::DominantNegative))
                    {
                        self.candidate_variants
                            .add_single(variant_id, *mode, variant, hgnc_id);
                    }
                    if cn == 1 || cn == 3 {
                        self.candidate_variants
                            .add_compound_het(hgnc_id, variant_id, *mode, variant);
                    }
                }
                InheritanceMode::Monoallelic | InheritanceMode::XLinkedDominant => {
                    if dosage_admissible(gene, cnv, cn) {
                        self.candidate_variants
                            .add_single(variant_id, *mode, variant, hgnc_id);
                    }
                }
                InheritanceMode::Hemizygous => {
                    if male {
                        if dosage_admissible(gene, cnv, cn) {
                            self.candidate_variants
                                .add_single(variant_id, *mode, variant, hgnc_id);
                        }
                        if cn == 1 {
                            self.candidate_variants
                                .add_compound_het(hgnc_id, variant_id, *mode, variant);
                        }
                    } else if cn == 3 && gene.has_mechanism(Mechanism::IncreasedGeneDosage) {
                        self.candidate_variants
                            .add_single(variant_id, *mode, variant, hgnc_id);
                    }
                }
                // no CNV rules for these modes
                InheritanceMode::Imprinted | InheritanceMode::Mosaic => {}
            }
        }
        Ok(())
    }
}

/// Copy number 0, 1 or 3 admits a dominant-pattern gene, except a duplication
/// swallowing a loss-of-function gene whole; an intragenic duplication that
/// leaves part of the gene outside the CNV boundary still disrupts it.
fn dosage_admissible(gene: &GeneEntry, cnv: &Cnv, cn: u32) -> bool {
    if !matches!(cn, 0 | 1 | 3) {
        return false;
    }
    if cn > 2
        && gene.has_mechanism(Mechanism::LossOfFunction)
        && cnv.encloses(gene.start, gene.end)
    {
        return false;
    }
    true
}

/// Which parent the alt allele came from, when that is unambiguous
fn parental_origin(mum: ParentCall, dad: ParentCall) -> Option<ImprintedOrigin> {
    match (mum.carries_alt(), dad.carries_alt()) {
        (true, false) => Some(ImprintedOrigin::Maternal),
        (false, true) => Some(ImprintedOrigin::Paternal),
        _ => None,
    }
}

impl CandidateVariants {
    /// Record a single-variant (dominant-pattern) admission, unioning mode
    /// tags when the variant was already admitted under another mode.
    pub fn add_single(
        &mut self,
        variant_id: &str,
        mode: InheritanceMode,
        variant: &Variant,
        hgnc_id: &str,
    ) {
        let entry = self
            .single_variants
            .entry(variant_id.to_string())
            .or_insert_with(|| Candidate {
                modes: HashSet::new(),
                variant: variant.clone(),
                hgnc_id: hgnc_id.to_string(),
            });
        entry.modes.insert(mode);
    }

    /// Record a compound-het admission under its gene. Candidates are kept
    /// independently; pairing them up is a downstream concern.
    pub fn add_compound_het(
        &mut self,
        hgnc_id: &str,
        variant_id: &str,
        mode: InheritanceMode,
        variant: &Variant,
    ) {
        let entry = self
            .compound_hets
            .entry(hgnc_id.to_string())
            .or_default()
            .entry(variant_id.to_string())
            .or_insert_with(|| Candidate {
                modes: HashSet::new(),
                variant: variant.clone(),
                hgnc_id: hgnc_id.to_string(),
            });
        entry.modes.insert(mode);
    }
}
