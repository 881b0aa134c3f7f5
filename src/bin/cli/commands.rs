//! CLI command implementations.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::info;

use muninn::io::reports::{self, ReportFormat, ReportSet};
use muninn::{ExtractionConfig, ExtractionReport, MuninnEngine};

use super::args::{ExtractArgs, InitConfigArgs, ValidateConfigArgs};

/// Run the `extract` command end-to-end.
pub fn extract_command(args: ExtractArgs) -> Result<()> {
    let config = resolve_config(&args)?;
    config
        .validate()
        .context("invalid extraction configuration")?;

    let engine = MuninnEngine::from_tsv_path(config.clone(), &args.entities)
        .with_context(|| format!("failed to load dictionary {}", args.entities.display()))?;
    if engine.dictionary().is_empty() {
        bail!("dictionary {} holds no entities", args.entities.display());
    }

    let documents = read_documents(&args.documents)?;
    let reports = run_extraction(&engine, &documents, args.quiet)?;

    let set = ReportSet::new(&config, reports);
    info!(
        documents = set.documents.len(),
        matches = set.total_matches(),
        "extraction finished"
    );

    let format = ReportFormat::from(args.format);
    match &args.out {
        Some(path) => {
            reports::write_to_path(&set, format, path)
                .with_context(|| format!("failed to write {}", path.display()))?;
            if !args.quiet {
                println!("report written to {}", path.display());
            }
        }
        None => print!("{}", reports::render(&set, format)?),
    }

    Ok(())
}

/// Print the default configuration as YAML.
pub fn print_default_config() -> Result<()> {
    print!("{}", ExtractionConfig::default().to_yaml_string()?);
    Ok(())
}

/// Write a starter configuration file.
pub fn init_config(args: InitConfigArgs) -> Result<()> {
    if args.output.exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            args.output.display()
        );
    }
    let yaml = ExtractionConfig::default().to_yaml_string()?;
    fs::write(&args.output, yaml)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    println!("configuration written to {}", args.output.display());
    Ok(())
}

/// Validate a configuration file and report the outcome.
pub fn validate_config(args: ValidateConfigArgs) -> Result<()> {
    let config = ExtractionConfig::from_yaml_file(&args.config)
        .with_context(|| format!("configuration {} is invalid", args.config.display()))?;
    println!("{} is valid", args.config.display());
    if args.verbose {
        println!(
            "similarity: {} (threshold {}), pruner: {}, verify: {}",
            config.similarity, config.threshold, config.pruner, config.verify
        );
    }
    Ok(())
}

/// Merge the config file (or defaults) with command-line overrides.
fn resolve_config(args: &ExtractArgs) -> Result<ExtractionConfig> {
    let mut config = match &args.config {
        Some(path) => ExtractionConfig::from_yaml_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ExtractionConfig::default(),
    };

    if let Some(similarity) = args.similarity {
        config.similarity = similarity.into();
    }
    if let Some(threshold) = args.threshold {
        config.threshold = threshold;
    }
    if let Some(q) = args.q {
        config.tokenizer.q = q;
    }
    if let Some(pruner) = args.pruner {
        config.pruner = pruner.into();
    }
    if let Some(mode) = args.mode {
        config.tokenizer.mode = mode.into();
    }
    if args.no_verify {
        config.verify = false;
    }
    if args.all_candidates {
        config.valid_only = false;
    }
    Ok(config)
}

/// Read the documents to scan: the given files, or stdin when none.
fn read_documents(paths: &[PathBuf]) -> Result<Vec<String>> {
    if paths.is_empty() {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read document from stdin")?;
        return Ok(vec![buffer]);
    }
    paths
        .iter()
        .map(|path| {
            fs::read_to_string(path)
                .with_context(|| format!("failed to read document {}", path.display()))
        })
        .collect()
}

/// Extract from all documents, with a progress bar for larger batches.
fn run_extraction(
    engine: &MuninnEngine,
    documents: &[String],
    quiet: bool,
) -> Result<Vec<ExtractionReport>> {
    let bar = if quiet || documents.len() < 2 {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(documents.len() as u64);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}",
            )
            .expect("static progress template is well-formed"),
        );
        bar
    };

    let reports = documents
        .par_iter()
        .map(|doc| {
            let report = engine.extract(doc);
            bar.inc(1);
            report
        })
        .collect::<muninn::Result<Vec<_>>>()?;
    bar.finish_and_clear();
    Ok(reports)
}
