use anyhow::Result;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

use trio_triage::{
    assemble_trio_genotypes, group_by_gene, parse_panel, parse_ped, FamilyVariants,
    InheritanceClassifier, InheritanceMode, ReportFormat, ReportGenerator, VcfParser,
};

const VCF_HEADER: &str = "##fileformat=VCFv4.2\n\
    #CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tsample\n";

fn write_vcf(dir: &Path, name: &str, gt: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut file = fs::File::create(&path).unwrap();
    write!(file, "{}", VCF_HEADER).unwrap();
    writeln!(
        file,
        "5\t10971838\t.\tA\tGG\t50\tPASS\t\
         HGNC_ID=1234;SYMBOL=MECP2;CONSEQUENCE=start_lost\tGT:GQ:AD\t{}:50:4,4",
        gt
    )
    .unwrap();
    path
}

fn write_inputs(dir: &Path, child_gt: &str, mum_gt: &str, dad_gt: &str) -> (std::path::PathBuf, std::path::PathBuf) {
    let child_vcf = write_vcf(dir, "child.vcf", child_gt);
    let mum_vcf = write_vcf(dir, "mum.vcf", mum_gt);
    let dad_vcf = write_vcf(dir, "dad.vcf", dad_gt);

    let ped_path = dir.join("samples.ped");
    fs::write(
        &ped_path,
        format!(
            "fam1 child_id dad_id mum_id XY 2 {}\n\
             fam1 mum_id 0 0 XX 1 {}\n\
             fam1 dad_id 0 0 XY 1 {}\n",
            child_vcf.display(),
            mum_vcf.display(),
            dad_vcf.display()
        ),
    )
    .unwrap();

    let panel_path = dir.join("panel.csv");
    fs::write(
        &panel_path,
        "hgnc_id,symbol,chr,start,end,mode,mechanism,imprinting\n\
         1234,MECP2,5,10971836,11904446,Biallelic,Loss of function,\n",
    )
    .unwrap();

    (ped_path, panel_path)
}

fn run_pipeline(ped_path: &Path, panel_path: &Path) -> Result<trio_triage::CandidateVariants> {
    let panel = parse_panel(panel_path)?;
    let families = parse_ped(ped_path)?;
    assert_eq!(families.len(), 1);
    let family = &families[0];

    let parser = VcfParser::new();
    let mut variants = FamilyVariants {
        child: parser.parse(family.proband().vcf_path())?,
        mum: parser.parse(family.mum().unwrap().vcf_path())?,
        dad: parser.parse(family.dad().unwrap().vcf_path())?,
    };
    assemble_trio_genotypes(family, &mut variants)?;
    let variants_per_gene = group_by_gene(&variants);

    let mut classifier = InheritanceClassifier::new(&variants_per_gene, family, &panel, None);
    classifier.classify_genes()?;
    Ok(classifier.candidate_variants)
}

#[test]
fn het_child_of_reference_parents_becomes_a_compound_het_candidate() -> Result<()> {
    let dir = TempDir::new()?;
    let (ped, panel) = write_inputs(dir.path(), "0/1", "0/0", "0/0");

    let candidates = run_pipeline(&ped, &panel)?;
    assert!(candidates.single_variants.is_empty());
    let gene = candidates.compound_hets.get("1234").unwrap();
    let candidate = gene.get("5_10971838_A_GG").unwrap();
    assert!(candidate.modes.contains(&InheritanceMode::Biallelic));
    Ok(())
}

#[test]
fn hom_alt_child_with_a_reference_father_is_rejected() -> Result<()> {
    let dir = TempDir::new()?;
    let (ped, panel) = write_inputs(dir.path(), "1/1", "0/1", "0/0");

    let candidates = run_pipeline(&ped, &panel)?;
    assert!(candidates.is_empty());
    Ok(())
}

#[test]
fn hom_alt_child_with_carrying_parents_is_a_single_variant_candidate() -> Result<()> {
    let dir = TempDir::new()?;
    let (ped, panel) = write_inputs(dir.path(), "1/1", "0/1", "1/1");

    let candidates = run_pipeline(&ped, &panel)?;
    assert!(candidates.compound_hets.is_empty());
    assert!(candidates.single_variants.contains_key("5_10971838_A_GG"));
    Ok(())
}

#[test]
fn reports_are_generated_for_a_run() -> Result<()> {
    let dir = TempDir::new()?;
    let (ped, panel) = write_inputs(dir.path(), "0/1", "0/0", "0/0");
    let candidates = run_pipeline(&ped, &panel)?;

    let report_dir = dir.path().join("reports");
    let generator = ReportGenerator::new(&report_dir)?;
    generator.generate("fam1", &candidates, ReportFormat::All)?;

    let names: Vec<String> = fs::read_dir(&report_dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    assert!(names.iter().any(|n| n.ends_with(".json")));
    assert!(names.iter().any(|n| n.ends_with(".tsv")));

    let json_name = names.iter().find(|n| n.ends_with(".json")).unwrap();
    let json = fs::read_to_string(report_dir.join(json_name))?;
    assert!(json.contains("compound_hets"));
    assert!(json.contains("5_10971838_A_GG"));
    Ok(())
}
