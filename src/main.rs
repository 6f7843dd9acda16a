use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueHint};
use clap_complete::{generate, Shell};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::io;
use std::path::PathBuf;
use tracing::info;

mod family;
mod inheritance;
mod output;
mod parsers;
mod trio;
mod types;

use family::Family;
use inheritance::{CnvRuleParams, InheritanceClassifier};
use output::ReportGenerator;
use parsers::{parse_panel, parse_ped, VcfParser};
use trio::{assemble_trio_genotypes, group_by_gene};
use types::{CandidateVariants, FamilyVariants, GenePanel};

/// Trio-based inheritance classification of candidate disease variants
#[derive(Parser, Debug)]
#[command(
    name = "trio-triage",
    version,
    about = "Classify trio variants against disease-gene inheritance models",
    long_about = r#"
Classifies the variants of an affected child against the inheritance modes of
a curated disease-gene panel, using trio genotypes assembled from whichever
parents were sequenced.

For each family the tool:
- assembles a child+mum+dad genotype signature per variant
- evaluates every inheritance mode tagged on each panel gene
  (biallelic, monoallelic, hemizygous, X-linked dominant, imprinted, mosaic)
- applies copy-number, mechanism and gene-overlap rules to CNVs
- reports single-variant candidates and compound-het candidates per gene

Families are independent and processed in parallel.
"#
)]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Pedigree sample sheet (family person dad mum sex affected vcf_path)
    #[arg(short, long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    ped: Option<PathBuf>,

    /// Disease-gene panel CSV
    #[arg(short = 'g', long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    panel: Option<PathBuf>,

    /// Output directory for candidate reports
    #[arg(short, long, default_value = "./reports")]
    output: PathBuf,

    /// Report format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Number of threads (0 = auto-detect)
    #[arg(short, long, default_value = "0", help = "Number of threads (0 = auto)")]
    threads: usize,

    /// Minimum CNV length kept without a panel-gene overlap
    #[arg(long, default_value = "1000000")]
    min_cnv_length: u64,

    /// Enable verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Generate shell completions
    #[arg(long, value_enum, value_name = "SHELL")]
    completions: Option<Shell>,

    /// Subcommands
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions
    Completions { shell: Shell },
    /// List recognised inheritance modes and mechanisms
    Modes,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Json,
    Tsv,
    All,
}

impl From<OutputFormat> for output::ReportFormat {
    fn from(format: OutputFormat) -> output::ReportFormat {
        match format {
            OutputFormat::Json => output::ReportFormat::Json,
            OutputFormat::Tsv => output::ReportFormat::Tsv,
            OutputFormat::All => output::ReportFormat::All,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        generate_completions(shell);
        return Ok(());
    }

    if let Some(Commands::Completions { shell }) = cli.command {
        generate_completions(shell);
        return Ok(());
    }

    if let Some(Commands::Modes) = cli.command {
        list_modes();
        return Ok(());
    }

    init_logging(cli.verbose);
    init_thread_pool(cli.threads)?;

    let ped = cli
        .ped
        .clone()
        .context("--ped is required to run a classification")?;
    let panel_path = cli
        .panel
        .clone()
        .context("--panel is required to run a classification")?;

    info!("Starting trio inheritance classification...");
    info!("Using {} threads", rayon::current_num_threads());

    let panel = parse_panel(&panel_path)?;
    info!("Loaded {} panel genes from {}", panel.len(), panel_path.display());

    let families = parse_ped(&ped)?;
    info!("Loaded {} families from {}", families.len(), ped.display());

    run_classification(&cli, families, &panel)
}

fn run_classification(cli: &Cli, families: Vec<Family>, panel: &GenePanel) -> Result<()> {
    let progress = ProgressBar::new(families.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} families {msg}")?
            .progress_chars("#>-"),
    );

    let cnv_params = CnvRuleParams {
        min_length: cli.min_cnv_length,
    };

    let results: Vec<(String, Result<CandidateVariants>)> = families
        .par_iter()
        .map(|family| {
            let outcome = classify_family(family, panel, &cnv_params);
            progress.inc(1);
            (family.id().to_string(), outcome)
        })
        .collect();
    progress.finish_with_message("done");

    let generator = ReportGenerator::new(&cli.output)?;
    let mut classified = 0usize;
    let mut singles = 0usize;
    let mut compound = 0usize;
    for (family_id, outcome) in results {
        match outcome {
            Ok(candidates) => {
                singles += candidates.single_variants.len();
                compound += candidates
                    .compound_hets
                    .values()
                    .map(|gene| gene.len())
                    .sum::<usize>();
                generator.generate(&family_id, &candidates, cli.format.into())?;
                classified += 1;
            }
            Err(e) => {
                // fail-fast: partial candidate sets are not trustworthy output
                return Err(e.context(format!("family {}", family_id)));
            }
        }
    }

    println!();
    println!(
        "{} {}",
        style("Families classified:").bold(),
        style(classified).green()
    );
    println!(
        "{} {}",
        style("Single-variant candidates:").bold(),
        style(singles).green()
    );
    println!(
        "{} {}",
        style("Compound-het candidates:").bold(),
        style(compound).green()
    );
    println!(
        "{} {}",
        style("Reports written to:").bold(),
        style(cli.output.display()).cyan()
    );
    Ok(())
}

/// One complete classifier run: parse the family's VCFs, assemble trio
/// genotypes, group by gene, classify, hand back the candidate structure.
fn classify_family(
    family: &Family,
    panel: &GenePanel,
    cnv_params: &CnvRuleParams,
) -> Result<CandidateVariants> {
    let parser = VcfParser::new();
    let mut variants = FamilyVariants {
        child: parser.parse(family.proband().vcf_path())?,
        mum: match family.mum() {
            Some(mum) => parser.parse(mum.vcf_path())?,
            None => Default::default(),
        },
        dad: match family.dad() {
            Some(dad) => parser.parse(dad.vcf_path())?,
            None => Default::default(),
        },
    };

    assemble_trio_genotypes(family, &mut variants)?;
    let variants_per_gene = group_by_gene(&variants);

    let mut classifier = InheritanceClassifier::new(
        &variants_per_gene,
        family,
        panel,
        Some(cnv_params.clone()),
    );
    classifier.classify_genes()?;
    Ok(classifier.candidate_variants)
}

fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

fn list_modes() {
    println!("{}", style("Recognised inheritance modes:").bold().cyan());
    let modes = [
        ("Biallelic", "disease requires two disrupted gene copies"),
        ("Monoallelic", "disease requires one disrupted copy"),
        ("Hemizygous", "X-linked, single active copy in males"),
        ("X-linked dominant", "dominant on the X chromosome"),
        ("Imprinted", "pathogenic only from one parental origin"),
        ("Mosaic", "post-zygotic, low allele balance in the child"),
    ];
    for (name, desc) in modes {
        println!("  {} - {}", style(name).green().bold(), style(desc).dim());
    }

    println!();
    println!("{}", style("Recognised mechanisms:").bold().cyan());
    for name in [
        "Loss of function",
        "Dominant negative",
        "Increased gene dosage",
        "Uncertain",
    ] {
        println!("  {}", style(name).yellow());
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!("trio_triage={}", level))
        .init();
}

fn init_thread_pool(threads: usize) -> Result<()> {
    let num_threads = if threads == 0 {
        num_cpus::get()
    } else {
        threads
    };

    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
        .map_err(|e| anyhow::anyhow!("Failed to initialize thread pool: {}", e))?;

    Ok(())
}
