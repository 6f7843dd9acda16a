use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use thiserror::Error;

/// Fatal conditions for a classification run
#[derive(Debug, Error)]
pub enum TriageError {
    #[error("unknown affected status: {0} should be '1' or '2'")]
    UnknownAffectedStatus(String),

    #[error("family {0} matches no parental presence pattern")]
    UnknownFamilyShape(String),

    #[error("unrecognised variant type: {0}")]
    UnrecognizedVariantType(String),

    #[error("CNV inheritance for {id} could not be determined: {label}")]
    UndeterminedCnvInheritance { id: String, label: String },

    #[error("variant {0} has no trio genotype; assemble before classifying")]
    MissingTrioGenotype(String),
}

/// Single-sample genotype call at a biallelic site
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Genotype {
    Reference,     // 0/0
    Heterozygous,  // 0/1
    HomozygousAlt, // 1/1
}

impl Genotype {
    /// Parse a VCF GT string; `None` for no-calls and partial calls
    pub fn from_gt(s: &str) -> Option<Self> {
        match s {
            "0/0" | "0|0" => Some(Genotype::Reference),
            "0/1" | "0|1" | "1/0" | "1|0" => Some(Genotype::Heterozygous),
            "1/1" | "1|1" => Some(Genotype::HomozygousAlt),
            _ => None,
        }
    }

    /// One-letter genotype code used in trio genotype signatures
    pub fn code(&self) -> char {
        match self {
            Genotype::Reference => '0',
            Genotype::Heterozygous => '1',
            Genotype::HomozygousAlt => '2',
        }
    }

    pub fn carries_alt(&self) -> bool {
        !matches!(self, Genotype::Reference)
    }
}

impl fmt::Display for Genotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Parent slot of an SNV trio genotype.
///
/// `Missing` means the parent is not in the pedigree; a parent who is present
/// but has no record at the site is `Called(Reference)`. The two are never
/// conflated.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ParentCall {
    Called(Genotype),
    Missing,
}

impl ParentCall {
    pub fn carries_alt(&self) -> bool {
        matches!(self, ParentCall::Called(g) if g.carries_alt())
    }

    pub fn is_called(&self, genotype: Genotype) -> bool {
        matches!(self, ParentCall::Called(g) if *g == genotype)
    }
}

impl fmt::Display for ParentCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParentCall::Called(g) => write!(f, "{}", g),
            ParentCall::Missing => write!(f, "NA"),
        }
    }
}

/// Copy-number-bearing allele token of a CNV record
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CnvAllele {
    Del,
    Dup,
}

impl CnvAllele {
    /// Parse a symbolic alt such as `<DEL>` or `<DUP>`
    pub fn from_alt(alt: &str) -> Option<Self> {
        match alt {
            "<DEL>" => Some(CnvAllele::Del),
            "<DUP>" => Some(CnvAllele::Dup),
            _ => None,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            CnvAllele::Del => "DEL",
            CnvAllele::Dup => "DUP",
        }
    }
}

impl fmt::Display for CnvAllele {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// Parent slot of a CNV trio genotype
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CnvParentCall {
    Ref,
    Carrier(CnvAllele),
    Undetermined,
    Missing,
}

impl fmt::Display for CnvParentCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CnvParentCall::Ref => write!(f, "REF"),
            CnvParentCall::Carrier(a) => write!(f, "{}", a),
            CnvParentCall::Undetermined => write!(f, "?"),
            CnvParentCall::Missing => write!(f, "NA"),
        }
    }
}

/// CNV inheritance classification computed upstream from parental read depth
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CnvInheritance {
    NotInherited,
    Maternal,
    Paternal,
    Biparental,
    Unknown(String),
}

impl CnvInheritance {
    pub fn from_label(label: &str) -> Self {
        match label {
            "not_inherited" => CnvInheritance::NotInherited,
            "maternal_inh" => CnvInheritance::Maternal,
            "paternal_inh" => CnvInheritance::Paternal,
            "biparental_inh" => CnvInheritance::Biparental,
            other => CnvInheritance::Unknown(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            CnvInheritance::NotInherited => "not_inherited",
            CnvInheritance::Maternal => "maternal_inh",
            CnvInheritance::Paternal => "paternal_inh",
            CnvInheritance::Biparental => "biparental_inh",
            CnvInheritance::Unknown(l) => l,
        }
    }
}

/// Combined child+mum+dad genotype for one child variant.
///
/// Rendered as the signature string used for inheritance-pattern matching:
/// `"100"`, `"1NANA"`, `"DELDELREF"`, `"DUP??"` and so on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TrioGenotype {
    Snv {
        child: Genotype,
        mum: ParentCall,
        dad: ParentCall,
    },
    Cnv {
        child: CnvAllele,
        mum: CnvParentCall,
        dad: CnvParentCall,
    },
}

impl fmt::Display for TrioGenotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrioGenotype::Snv { child, mum, dad } => write!(f, "{}{}{}", child, mum, dad),
            TrioGenotype::Cnv { child, mum, dad } => write!(f, "{}{}{}", child, mum, dad),
        }
    }
}

/// Single-nucleotide or small indel variant record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Snv {
    pub chrom: String,
    pub pos: u64,
    pub ref_allele: String,
    pub alt_allele: String,
    pub hgnc_id: String,
    pub symbol: String,
    pub consequence: String,
    pub genotype: Genotype,
    pub genotype_quality: Option<u32>,
    /// Reference and alternate read depths, for the mosaic allele-balance rule
    pub allele_depths: Option<(u32, u32)>,
    pub trio_genotype: Option<TrioGenotype>,
}

impl Snv {
    pub fn id(&self) -> String {
        format!(
            "{}_{}_{}_{}",
            self.chrom, self.pos, self.ref_allele, self.alt_allele
        )
    }

    /// Fraction of reads supporting the alternate allele
    pub fn allele_balance(&self) -> Option<f64> {
        let (ref_depth, alt_depth) = self.allele_depths?;
        let total = ref_depth + alt_depth;
        if total == 0 {
            return None;
        }
        Some(f64::from(alt_depth) / f64::from(total))
    }
}

/// Copy-number variant record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cnv {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
    pub ref_allele: String,
    pub allele: CnvAllele,
    pub hgnc_id: String,
    pub symbol: String,
    pub copy_number: u32,
    pub inheritance: CnvInheritance,
    pub trio_genotype: Option<TrioGenotype>,
}

impl Cnv {
    pub fn id(&self) -> String {
        format!(
            "{}_{}_{}_<{}>",
            self.chrom, self.start, self.ref_allele, self.allele
        )
    }

    pub fn length(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// True when the CNV span completely encloses the given interval
    pub fn encloses(&self, start: u64, end: u64) -> bool {
        self.start <= start && self.end >= end
    }

    pub fn overlaps(&self, chrom: &str, start: u64, end: u64) -> bool {
        self.chrom == chrom && self.start <= end && self.end >= start
    }
}

/// A variant observed in one person, closed over the two supported kinds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Variant {
    Snv(Snv),
    Cnv(Cnv),
}

impl Variant {
    /// Stable identifier: chromosome_position_ref_alt
    pub fn id(&self) -> String {
        match self {
            Variant::Snv(v) => v.id(),
            Variant::Cnv(v) => v.id(),
        }
    }

    pub fn hgnc_id(&self) -> &str {
        match self {
            Variant::Snv(v) => &v.hgnc_id,
            Variant::Cnv(v) => &v.hgnc_id,
        }
    }

    pub fn trio_genotype(&self) -> Option<&TrioGenotype> {
        match self {
            Variant::Snv(v) => v.trio_genotype.as_ref(),
            Variant::Cnv(v) => v.trio_genotype.as_ref(),
        }
    }

    pub fn is_snv(&self) -> bool {
        matches!(self, Variant::Snv(_))
    }

    pub fn is_cnv(&self) -> bool {
        matches!(self, Variant::Cnv(_))
    }
}

/// Inheritance modes a panel gene may be tagged with
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum InheritanceMode {
    Biallelic,
    Monoallelic,
    Hemizygous,
    XLinkedDominant,
    Imprinted,
    Mosaic,
}

impl InheritanceMode {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Biallelic" => Some(InheritanceMode::Biallelic),
            "Monoallelic" => Some(InheritanceMode::Monoallelic),
            "Hemizygous" => Some(InheritanceMode::Hemizygous),
            "X-linked dominant" => Some(InheritanceMode::XLinkedDominant),
            "Imprinted" => Some(InheritanceMode::Imprinted),
            "Mosaic" => Some(InheritanceMode::Mosaic),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InheritanceMode::Biallelic => "biallelic",
            InheritanceMode::Monoallelic => "monoallelic",
            InheritanceMode::Hemizygous => "hemizygous",
            InheritanceMode::XLinkedDominant => "x-linked dominant",
            InheritanceMode::Imprinted => "imprinted",
            InheritanceMode::Mosaic => "mosaic",
        }
    }
}

/// Mutation mechanisms a panel gene may be tagged with
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Mechanism {
    LossOfFunction,
    DominantNegative,
    IncreasedGeneDosage,
    Uncertain,
}

impl Mechanism {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Loss of function" => Some(Mechanism::LossOfFunction),
            "Dominant negative" => Some(Mechanism::DominantNegative),
            "Increased gene dosage" => Some(Mechanism::IncreasedGeneDosage),
            "Uncertain" => Some(Mechanism::Uncertain),
            _ => None,
        }
    }
}

/// Parent whose copy of an imprinted gene is expressed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ImprintedOrigin {
    Maternal,
    Paternal,
}

impl ImprintedOrigin {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Maternal" => Some(ImprintedOrigin::Maternal),
            "Paternal" => Some(ImprintedOrigin::Paternal),
            _ => None,
        }
    }
}

/// One disease gene from the panel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneEntry {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
    pub symbol: String,
    pub modes: HashSet<InheritanceMode>,
    pub mechanisms: HashSet<Mechanism>,
    /// Imprinting direction, required for the Imprinted mode to admit anything
    pub imprinting: Option<ImprintedOrigin>,
}

impl GeneEntry {
    pub fn has_mechanism(&self, mechanism: Mechanism) -> bool {
        self.mechanisms.contains(&mechanism)
    }
}

/// Disease-gene panel keyed by HGNC id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenePanel {
    pub genes: HashMap<String, GeneEntry>,
}

impl GenePanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, hgnc_id: &str) -> Option<&GeneEntry> {
        self.genes.get(hgnc_id)
    }

    pub fn insert(&mut self, hgnc_id: String, entry: GeneEntry) {
        self.genes.insert(hgnc_id, entry);
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// True when any panel gene's coordinates intersect the given span
    pub fn overlaps_span(&self, chrom: &str, start: u64, end: u64) -> bool {
        self.genes
            .values()
            .any(|g| g.chrom == chrom && g.start <= end && g.end >= start)
    }
}

/// One admitted variant and the union of modes it satisfied
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Candidate {
    pub modes: HashSet<InheritanceMode>,
    pub variant: Variant,
    pub hgnc_id: String,
}

/// Per-run result structure, populated incrementally by the classifier
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct CandidateVariants {
    pub single_variants: HashMap<String, Candidate>,
    pub compound_hets: HashMap<String, HashMap<String, Candidate>>,
}

impl CandidateVariants {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.single_variants.is_empty() && self.compound_hets.is_empty()
    }
}

/// Per-person variant maps for one family.
///
/// An absent parent contributes an empty map; parental absence itself is
/// encoded at the `Family` level.
#[derive(Debug, Clone, Default)]
pub struct FamilyVariants {
    pub child: HashMap<String, Variant>,
    pub mum: HashMap<String, Variant>,
    pub dad: HashMap<String, Variant>,
}

/// One child variant plus whatever parental records exist at the same site
#[derive(Debug, Clone)]
pub struct TrioVariant {
    pub child: Variant,
    pub mum: Option<Variant>,
    pub dad: Option<Variant>,
}

/// Child variants keyed by gene id, then variant id
pub type VariantsPerGene = HashMap<String, HashMap<String, TrioVariant>>;
