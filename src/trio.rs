use std::collections::HashMap;
use tracing::info;

use crate::family::Family;
use crate::types::{
    CnvInheritance, CnvParentCall, FamilyVariants, Genotype, ParentCall, TriageError, TrioGenotype,
    TrioVariant, Variant, VariantsPerGene,
};

/// Annotate every child variant with its trio genotype signature.
///
/// Dispatched once per run on the family's parental presence pattern; this is
/// the only place allowed to branch on family shape. Child variants are
/// annotated in place, no new records are created.
pub fn assemble_trio_genotypes(
    family: &Family,
    variants: &mut FamilyVariants,
) -> Result<(), TriageError> {
    if family.has_both_parents() {
        // positions absent from a parent's map are taken as ref/ref
        assemble_both_parents(variants);
        Ok(())
    } else if family.has_mum() {
        assemble_single_parent(variants, Parent::Mum);
        Ok(())
    } else if family.has_dad() {
        assemble_single_parent(variants, Parent::Dad);
        Ok(())
    } else if family.has_no_parents() {
        assemble_no_parents(variants);
        Ok(())
    } else {
        Err(TriageError::UnknownFamilyShape(family.id().to_string()))
    }
}

enum Parent {
    Mum,
    Dad,
}

fn assemble_both_parents(variants: &mut FamilyVariants) {
    let FamilyVariants { child, mum, dad } = variants;
    for (id, variant) in child.iter_mut() {
        match variant {
            Variant::Snv(snv) => {
                let trio = TrioGenotype::Snv {
                    child: snv.genotype,
                    mum: snv_parent_call(mum, id),
                    dad: snv_parent_call(dad, id),
                };
                snv.trio_genotype = Some(trio);
            }
            Variant::Cnv(cnv) => {
                // parental side comes from the upstream inheritance call
                let (mum_call, dad_call) = match &cnv.inheritance {
                    CnvInheritance::NotInherited => (CnvParentCall::Ref, CnvParentCall::Ref),
                    CnvInheritance::Maternal => {
                        (CnvParentCall::Carrier(cnv.allele), CnvParentCall::Ref)
                    }
                    CnvInheritance::Paternal => {
                        (CnvParentCall::Ref, CnvParentCall::Carrier(cnv.allele))
                    }
                    CnvInheritance::Biparental => (
                        CnvParentCall::Carrier(cnv.allele),
                        CnvParentCall::Carrier(cnv.allele),
                    ),
                    CnvInheritance::Unknown(label) => {
                        info!(
                            "{} trio genotype for CNV can't be determined, CNV inh = {}",
                            id, label
                        );
                        (CnvParentCall::Undetermined, CnvParentCall::Undetermined)
                    }
                };
                cnv.trio_genotype = Some(TrioGenotype::Cnv {
                    child: cnv.allele,
                    mum: mum_call,
                    dad: dad_call,
                });
            }
        }
    }
}

fn assemble_single_parent(variants: &mut FamilyVariants, present: Parent) {
    let FamilyVariants { child, mum, dad } = variants;
    let parent_map = match present {
        Parent::Mum => mum,
        Parent::Dad => dad,
    };
    for (id, variant) in child.iter_mut() {
        match variant {
            Variant::Snv(snv) => {
                let parent_call = snv_parent_call(parent_map, id);
                let (mum_call, dad_call) = match present {
                    Parent::Mum => (parent_call, ParentCall::Missing),
                    Parent::Dad => (ParentCall::Missing, parent_call),
                };
                snv.trio_genotype = Some(TrioGenotype::Snv {
                    child: snv.genotype,
                    mum: mum_call,
                    dad: dad_call,
                });
            }
            Variant::Cnv(cnv) => {
                // TODO refine once upstream predicts single-parent CNV inheritance
                cnv.trio_genotype = Some(TrioGenotype::Cnv {
                    child: cnv.allele,
                    mum: CnvParentCall::Missing,
                    dad: CnvParentCall::Missing,
                });
            }
        }
    }
}

fn assemble_no_parents(variants: &mut FamilyVariants) {
    for variant in variants.child.values_mut() {
        match variant {
            Variant::Snv(snv) => {
                snv.trio_genotype = Some(TrioGenotype::Snv {
                    child: snv.genotype,
                    mum: ParentCall::Missing,
                    dad: ParentCall::Missing,
                });
            }
            Variant::Cnv(cnv) => {
                cnv.trio_genotype = Some(TrioGenotype::Cnv {
                    child: cnv.allele,
                    mum: CnvParentCall::Missing,
                    dad: CnvParentCall::Missing,
                });
            }
        }
    }
}

/// Genotype of a present parent at the given variant; no record means ref/ref
fn snv_parent_call(parent_map: &HashMap<String, Variant>, id: &str) -> ParentCall {
    match parent_map.get(id) {
        Some(Variant::Snv(snv)) => ParentCall::Called(snv.genotype),
        _ => ParentCall::Called(Genotype::Reference),
    }
}

/// Group the annotated child variants by gene for the classifier,
/// carrying along any parental records at the same site.
pub fn group_by_gene(variants: &FamilyVariants) -> VariantsPerGene {
    let mut per_gene: VariantsPerGene = HashMap::new();
    for (id, child_variant) in &variants.child {
        let gene_variants = per_gene
            .entry(child_variant.hgnc_id().to_string())
            .or_default();
        gene_variants.insert(
            id.clone(),
            TrioVariant {
                child: child_variant.clone(),
                mum: variants.mum.get(id).cloned(),
                dad: variants.dad.get(id).cloned(),
            },
        );
    }
    per_gene
}
