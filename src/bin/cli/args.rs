//! CLI argument structures and configuration enums.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use muninn::io::reports::ReportFormat;
use muninn::{PrunerKind, SimilarityKind, TokenMode};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Approximate dictionary entity extraction
#[derive(Parser)]
#[command(name = "muninn")]
#[command(version = VERSION)]
#[command(about = "Muninn - approximate dictionary entity extraction")]
#[command(long_about = "
Find every substring of a document that approximately matches an entry of
an entity dictionary, under Jaccard, cosine, Dice, edit-distance, or
edit-similarity thresholds.

Common Usage:

  # Scan documents against a TSV dictionary (edit distance, tau = 2)
  muninn extract --entities entities.tsv doc1.txt doc2.txt

  # Read the document from stdin and emit JSON
  cat doc.txt | muninn extract --entities entities.tsv --format json

  # Word-level Jaccard at 0.8
  muninn extract --entities e.tsv --mode word --similarity jaccard --threshold 0.8 doc.txt

  # Write a starter configuration and validate it after editing
  muninn init-config
  muninn validate-config --config .muninn.yml
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract entity matches from documents
    Extract(ExtractArgs),

    /// Print the default configuration in YAML format
    #[command(name = "print-default-config")]
    PrintDefaultConfig,

    /// Initialize a configuration file with defaults
    #[command(name = "init-config")]
    InitConfig(InitConfigArgs),

    /// Validate a muninn configuration file
    #[command(name = "validate-config")]
    ValidateConfig(ValidateConfigArgs),
}

#[derive(Args)]
pub struct ExtractArgs {
    /// Entity dictionary: TSV with id<TAB>text records, or one entity per line
    #[arg(short, long)]
    pub entities: PathBuf,

    /// Document files to scan (reads one document from stdin when omitted)
    pub documents: Vec<PathBuf>,

    /// Configuration file path (flags below override its values)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Similarity measure
    #[arg(short, long, value_enum)]
    pub similarity: Option<SimilarityArg>,

    /// Threshold: in (0, 1] for similarities, a non-negative integer for edit-dist
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// q-gram width for character tokenization
    #[arg(short, long)]
    pub q: Option<usize>,

    /// Pruning strategy
    #[arg(short, long, value_enum)]
    pub pruner: Option<PrunerArg>,

    /// Tokenization mode
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Skip exact verification of filtered candidates
    #[arg(long)]
    pub no_verify: bool,

    /// Keep candidates the verifier rejects
    #[arg(long)]
    pub all_candidates: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    pub format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Suppress progress output
    #[arg(long)]
    pub quiet: bool,
}

#[derive(Args)]
pub struct InitConfigArgs {
    /// Output configuration file name
    #[arg(short, long, default_value = ".muninn.yml")]
    pub output: PathBuf,

    /// Overwrite an existing configuration file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ValidateConfigArgs {
    /// Path to the configuration file to validate
    #[arg(short, long, required = true)]
    pub config: PathBuf,

    /// Show the parsed configuration
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SimilarityArg {
    Jaccard,
    Cosine,
    Dice,
    EditSim,
    EditDist,
}

impl From<SimilarityArg> for SimilarityKind {
    fn from(value: SimilarityArg) -> Self {
        match value {
            SimilarityArg::Jaccard => Self::Jaccard,
            SimilarityArg::Cosine => Self::Cosine,
            SimilarityArg::Dice => Self::Dice,
            SimilarityArg::EditSim => Self::EditSim,
            SimilarityArg::EditDist => Self::EditDist,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PrunerArg {
    None,
    Lazy,
    Bucket,
    Batch,
}

impl From<PrunerArg> for PrunerKind {
    fn from(value: PrunerArg) -> Self {
        match value {
            PrunerArg::None => Self::None,
            PrunerArg::Lazy => Self::Lazy,
            PrunerArg::Bucket => Self::Bucket,
            PrunerArg::Batch => Self::Batch,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Char,
    Word,
}

impl From<ModeArg> for TokenMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Char => Self::Char,
            ModeArg::Word => Self::Word,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Single pretty-printed JSON document
    Json,
    /// One JSON line per document
    Jsonl,
    /// Human-readable output
    Pretty,
}

impl From<OutputFormat> for ReportFormat {
    fn from(value: OutputFormat) -> Self {
        match value {
            OutputFormat::Json => Self::Json,
            OutputFormat::Jsonl => Self::Jsonl,
            OutputFormat::Pretty => Self::Pretty,
        }
    }
}
