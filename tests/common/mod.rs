#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;

use trio_triage::{
    assemble_trio_genotypes, group_by_gene, CandidateVariants, Cnv, CnvAllele, CnvInheritance,
    CnvRuleParams, Family, FamilyVariants, GeneEntry, GenePanel, Genotype, ImprintedOrigin,
    InheritanceClassifier, InheritanceMode, Mechanism, Person, Snv, Variant, VariantsPerGene,
};

pub const SITE_ID: &str = "5_10971838_A_GG";
pub const GENE_ID: &str = "1234";

pub fn person(id: &str, dad: &str, mum: &str, sex: &str, affected: &str) -> Person {
    Person::new("fam", id, dad, mum, sex, affected, Path::new("/vcf/path")).unwrap()
}

/// Trio with both parents present; parents unaffected unless stated
pub fn trio_family(child_sex: &str, mum_affected: &str, dad_affected: &str) -> Family {
    Family::new(
        person("child_id", "dad_id", "mum_id", child_sex, "2"),
        Some(person("mum_id", "0", "0", "XX", mum_affected)),
        Some(person("dad_id", "0", "0", "XY", dad_affected)),
    )
}

pub fn mum_only_family() -> Family {
    Family::new(
        person("child_id", "0", "mum_id", "XY", "2"),
        Some(person("mum_id", "0", "0", "XX", "1")),
        None,
    )
}

pub fn dad_only_family() -> Family {
    Family::new(
        person("child_id", "dad_id", "0", "XY", "2"),
        None,
        Some(person("dad_id", "0", "0", "XY", "1")),
    )
}

pub fn no_parents_family(child_sex: &str) -> Family {
    Family::new(person("child_id", "0", "0", child_sex, "2"), None, None)
}

/// SNV at the fixture site with balanced read depths
pub fn snv(genotype: Genotype) -> Variant {
    snv_with_depths(genotype, (4, 4))
}

pub fn snv_with_depths(genotype: Genotype, allele_depths: (u32, u32)) -> Variant {
    Variant::Snv(Snv {
        chrom: "5".to_string(),
        pos: 10971838,
        ref_allele: "A".to_string(),
        alt_allele: "GG".to_string(),
        hgnc_id: GENE_ID.to_string(),
        symbol: "MECP2".to_string(),
        consequence: "start_lost".to_string(),
        genotype,
        genotype_quality: Some(50),
        allele_depths: Some(allele_depths),
        trio_genotype: None,
    })
}

pub fn cnv_on(
    chrom: &str,
    start: u64,
    end: u64,
    allele: CnvAllele,
    copy_number: u32,
    inheritance: CnvInheritance,
) -> Variant {
    Variant::Cnv(Cnv {
        chrom: chrom.to_string(),
        start,
        end,
        ref_allele: "T".to_string(),
        allele,
        hgnc_id: GENE_ID.to_string(),
        symbol: "MECP2".to_string(),
        copy_number,
        inheritance,
        trio_genotype: None,
    })
}

/// Build, assemble and group one child variant plus optional parent records.
/// A `None` parent genotype means the parent has no record at the site.
pub fn variants_per_gene(
    family: &Family,
    child: Variant,
    mum: Option<Variant>,
    dad: Option<Variant>,
) -> VariantsPerGene {
    let id = child.id();
    let mut family_variants = FamilyVariants {
        child: HashMap::from([(id.clone(), child)]),
        mum: mum.map(|v| HashMap::from([(id.clone(), v)])).unwrap_or_default(),
        dad: dad.map(|v| HashMap::from([(id.clone(), v)])).unwrap_or_default(),
    };
    assemble_trio_genotypes(family, &mut family_variants).unwrap();
    group_by_gene(&family_variants)
}

pub fn snv_variants_per_gene(
    family: &Family,
    child: Genotype,
    mum: Option<Genotype>,
    dad: Option<Genotype>,
) -> VariantsPerGene {
    variants_per_gene(family, snv(child), mum.map(snv), dad.map(snv))
}

/// Panel with a single fixture gene
pub fn panel_on(
    chrom: &str,
    modes: &[InheritanceMode],
    mechanisms: &[Mechanism],
    imprinting: Option<ImprintedOrigin>,
) -> GenePanel {
    let mut panel = GenePanel::new();
    panel.insert(
        GENE_ID.to_string(),
        GeneEntry {
            chrom: chrom.to_string(),
            start: 10_971_836,
            end: 11_904_446,
            symbol: "MECP2".to_string(),
            modes: modes.iter().copied().collect(),
            mechanisms: mechanisms.iter().copied().collect(),
            imprinting,
        },
    );
    panel
}

pub fn biallelic_panel() -> GenePanel {
    panel_on(
        "5",
        &[InheritanceMode::Biallelic],
        &[Mechanism::LossOfFunction],
        None,
    )
}

pub fn monoallelic_panel() -> GenePanel {
    panel_on(
        "5",
        &[InheritanceMode::Monoallelic],
        &[Mechanism::LossOfFunction],
        None,
    )
}

/// Run a classifier over the grouping and hand back its results
pub fn classify(
    family: &Family,
    panel: &GenePanel,
    variants_per_gene: &VariantsPerGene,
    cnv_params: Option<CnvRuleParams>,
) -> CandidateVariants {
    let mut classifier = InheritanceClassifier::new(variants_per_gene, family, panel, cnv_params);
    classifier.classify_genes().unwrap();
    classifier.candidate_variants
}
