//! Muninn CLI - approximate dictionary entity extraction.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging; RUST_LOG overrides the verbosity flag
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Extract(args) => cli::extract_command(args)?,
        Commands::PrintDefaultConfig => cli::print_default_config()?,
        Commands::InitConfig(args) => cli::init_config(args)?,
        Commands::ValidateConfig(args) => cli::validate_config(args)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cli::args::{OutputFormat, PrunerArg, SimilarityArg};
    use std::path::PathBuf;

    #[test]
    fn test_cli_parsing_extract_defaults() {
        let cli = Cli::parse_from(["muninn", "extract", "--entities", "e.tsv"]);
        assert!(!cli.verbose);

        match cli.command {
            Commands::Extract(args) => {
                assert_eq!(args.entities, PathBuf::from("e.tsv"));
                assert!(args.documents.is_empty());
                assert!(args.similarity.is_none());
                assert!(args.threshold.is_none());
                assert!(!args.no_verify);
                assert!(!args.all_candidates);
                assert!(matches!(args.format, OutputFormat::Pretty));
            }
            _ => panic!("Expected Extract command"),
        }
    }

    #[test]
    fn test_cli_parsing_extract_with_options() {
        let cli = Cli::parse_from([
            "muninn",
            "--verbose",
            "extract",
            "--entities",
            "dict.tsv",
            "--similarity",
            "edit-dist",
            "--threshold",
            "1",
            "--pruner",
            "bucket",
            "--format",
            "json",
            "--out",
            "report.json",
            "--quiet",
            "a.txt",
            "b.txt",
        ]);

        assert!(cli.verbose);
        match cli.command {
            Commands::Extract(args) => {
                assert_eq!(args.documents, vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")]);
                assert!(matches!(args.similarity, Some(SimilarityArg::EditDist)));
                assert_eq!(args.threshold, Some(1.0));
                assert!(matches!(args.pruner, Some(PrunerArg::Bucket)));
                assert!(matches!(args.format, OutputFormat::Json));
                assert_eq!(args.out, Some(PathBuf::from("report.json")));
                assert!(args.quiet);
            }
            _ => panic!("Expected Extract command"),
        }
    }

    #[test]
    fn test_cli_parsing_print_default_config() {
        let cli = Cli::parse_from(["muninn", "print-default-config"]);
        assert!(matches!(cli.command, Commands::PrintDefaultConfig));
    }

    #[test]
    fn test_cli_parsing_init_config() {
        let cli = Cli::parse_from(["muninn", "init-config", "--output", "custom.yml", "--force"]);
        match cli.command {
            Commands::InitConfig(args) => {
                assert_eq!(args.output, PathBuf::from("custom.yml"));
                assert!(args.force);
            }
            _ => panic!("Expected InitConfig command"),
        }
    }

    #[test]
    fn test_cli_parsing_validate_config() {
        let cli = Cli::parse_from(["muninn", "validate-config", "--config", "test.yml", "--verbose"]);
        match cli.command {
            Commands::ValidateConfig(args) => {
                assert_eq!(args.config, PathBuf::from("test.yml"));
                assert!(args.verbose);
            }
            _ => panic!("Expected ValidateConfig command"),
        }
    }
}
