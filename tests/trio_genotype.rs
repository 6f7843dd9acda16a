mod common;

use common::*;
use trio_triage::{
    assemble_trio_genotypes, CnvAllele, CnvInheritance, FamilyVariants, Genotype, Variant,
};

fn signature(variants_per_gene: &trio_triage::VariantsPerGene) -> String {
    let gene = variants_per_gene.get(GENE_ID).unwrap();
    let trio_variant = gene.values().next().unwrap();
    trio_variant
        .child
        .trio_genotype()
        .expect("child variant must be annotated")
        .to_string()
}

#[test]
fn snv_signatures_with_both_parents() {
    let family = trio_family("XY", "1", "1");
    let cases = [
        (Genotype::Reference, Genotype::Reference, "100"),
        (Genotype::Reference, Genotype::Heterozygous, "101"),
        (Genotype::Heterozygous, Genotype::Reference, "110"),
        (Genotype::Heterozygous, Genotype::HomozygousAlt, "112"),
        (Genotype::HomozygousAlt, Genotype::HomozygousAlt, "122"),
    ];
    for (mum, dad, expected) in cases {
        let grouped =
            snv_variants_per_gene(&family, Genotype::Heterozygous, Some(mum), Some(dad));
        assert_eq!(signature(&grouped), expected);
    }
}

#[test]
fn parent_without_a_record_is_taken_as_reference() {
    let family = trio_family("XY", "1", "1");
    let grouped = snv_variants_per_gene(&family, Genotype::Heterozygous, None, None);
    assert_eq!(signature(&grouped), "100");

    let grouped = snv_variants_per_gene(
        &family,
        Genotype::HomozygousAlt,
        Some(Genotype::Heterozygous),
        None,
    );
    assert_eq!(signature(&grouped), "210");
}

#[test]
fn snv_signatures_with_one_or_no_parents() {
    let grouped = snv_variants_per_gene(
        &mum_only_family(),
        Genotype::Heterozygous,
        Some(Genotype::Heterozygous),
        None,
    );
    assert_eq!(signature(&grouped), "11NA");

    let grouped = snv_variants_per_gene(&mum_only_family(), Genotype::Heterozygous, None, None);
    assert_eq!(signature(&grouped), "10NA");

    let grouped = snv_variants_per_gene(
        &dad_only_family(),
        Genotype::Heterozygous,
        None,
        Some(Genotype::HomozygousAlt),
    );
    assert_eq!(signature(&grouped), "1NA2");

    let grouped =
        snv_variants_per_gene(&no_parents_family("XY"), Genotype::HomozygousAlt, None, None);
    assert_eq!(signature(&grouped), "2NANA");
}

#[test]
fn cnv_parental_signature_follows_inheritance_classification() {
    let family = trio_family("XY", "1", "1");
    let cases = [
        (CnvInheritance::NotInherited, "DELREFREF"),
        (CnvInheritance::Maternal, "DELDELREF"),
        (CnvInheritance::Paternal, "DELREFDEL"),
        (CnvInheritance::Biparental, "DELDELDEL"),
    ];
    for (inheritance, expected) in cases {
        let child = cnv_on("5", 10_000_000, 12_000_000, CnvAllele::Del, 1, inheritance);
        let grouped = variants_per_gene(&family, child, None, None);
        assert_eq!(signature(&grouped), expected);
    }

    let dup = cnv_on(
        "5",
        10_000_000,
        12_000_000,
        CnvAllele::Dup,
        3,
        CnvInheritance::Paternal,
    );
    let grouped = variants_per_gene(&family, dup, None, None);
    assert_eq!(signature(&grouped), "DUPREFDUP");
}

#[test]
fn undetermined_cnv_inheritance_is_annotated_not_fatal() {
    let family = trio_family("XY", "1", "1");
    let child = cnv_on(
        "5",
        10_000_000,
        12_000_000,
        CnvAllele::Dup,
        3,
        CnvInheritance::Unknown("inconclusive".to_string()),
    );
    let grouped = variants_per_gene(&family, child, None, None);
    assert_eq!(signature(&grouped), "DUP??");
}

#[test]
fn single_parent_cnv_signatures_stay_unresolved() {
    let child = cnv_on(
        "5",
        10_000_000,
        12_000_000,
        CnvAllele::Del,
        1,
        CnvInheritance::Maternal,
    );
    let grouped = variants_per_gene(&mum_only_family(), child.clone(), None, None);
    assert_eq!(signature(&grouped), "DELNANA");

    let grouped = variants_per_gene(&dad_only_family(), child.clone(), None, None);
    assert_eq!(signature(&grouped), "DELNANA");

    let grouped = variants_per_gene(&no_parents_family("XY"), child, None, None);
    assert_eq!(signature(&grouped), "DELNANA");
}

#[test]
fn assembly_is_idempotent() {
    let family = trio_family("XY", "1", "1");
    let child = snv(Genotype::Heterozygous);
    let id = child.id();
    let mut family_variants = FamilyVariants {
        child: std::collections::HashMap::from([(id.clone(), child)]),
        mum: std::collections::HashMap::from([(id.clone(), snv(Genotype::Reference))]),
        dad: std::collections::HashMap::from([(id.clone(), snv(Genotype::Heterozygous))]),
    };

    assemble_trio_genotypes(&family, &mut family_variants).unwrap();
    let first = match family_variants.child.get(&id).unwrap() {
        Variant::Snv(snv) => snv.trio_genotype.unwrap(),
        Variant::Cnv(_) => unreachable!(),
    };

    assemble_trio_genotypes(&family, &mut family_variants).unwrap();
    let second = match family_variants.child.get(&id).unwrap() {
        Variant::Snv(snv) => snv.trio_genotype.unwrap(),
        Variant::Cnv(_) => unreachable!(),
    };

    assert_eq!(first, second);
    assert_eq!(first.to_string(), "101");
}
