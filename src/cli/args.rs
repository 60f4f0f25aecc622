//! CLI argument definitions using clap
//!
//! Commands:
//! - dtbench validate <dataset> [--taxonomy <path>] [--format auto|json|jsonl]
//! - dtbench normalize <dataset> --output <path>
//! - dtbench taxonomy [--taxonomy <path>]

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::dataset::DatasetFormat;

/// dtbench - loader and validator for document-to-table ground truth
#[derive(Parser, Debug)]
#[command(name = "dtbench")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to an optional JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load a dataset and report every problem found
    Validate {
        /// Dataset file (.json array or .jsonl)
        dataset: PathBuf,

        /// Strategy taxonomy artifact
        #[arg(long)]
        taxonomy: Option<PathBuf>,

        /// Input format; `auto` picks from the file extension
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
    },

    /// Load a dataset and write it back in canonical form
    Normalize {
        /// Dataset file (.json array or .jsonl)
        dataset: PathBuf,

        /// Destination file
        #[arg(long)]
        output: PathBuf,

        /// Strategy taxonomy artifact
        #[arg(long)]
        taxonomy: Option<PathBuf>,

        /// Input format; `auto` picks from the file extension
        #[arg(long, value_enum)]
        format: Option<FormatArg>,

        /// Output format; `auto` picks from the output extension
        #[arg(long, value_enum)]
        output_format: Option<FormatArg>,
    },

    /// Print the strategy taxonomy in use
    Taxonomy {
        /// Strategy taxonomy artifact
        #[arg(long)]
        taxonomy: Option<PathBuf>,
    },
}

/// Dataset format selection on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    Auto,
    Json,
    Jsonl,
}

impl FormatArg {
    /// Concrete format, or `None` to decide from the path.
    pub fn to_format(self) -> Option<DatasetFormat> {
        match self {
            FormatArg::Auto => None,
            FormatArg::Json => Some(DatasetFormat::Json),
            FormatArg::Jsonl => Some(DatasetFormat::JsonLines),
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_validate() {
        let cli = Cli::try_parse_from([
            "dtbench",
            "validate",
            "data/cases.jsonl",
            "--taxonomy",
            "tax.json",
            "--format",
            "jsonl",
        ])
        .unwrap();

        match cli.command {
            Command::Validate {
                dataset,
                taxonomy,
                format,
            } => {
                assert_eq!(dataset, PathBuf::from("data/cases.jsonl"));
                assert_eq!(taxonomy, Some(PathBuf::from("tax.json")));
                assert_eq!(format, Some(FormatArg::Jsonl));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let cli = Cli::try_parse_from(["dtbench", "taxonomy", "--config", "dtbench.json"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("dtbench.json")));
    }

    #[test]
    fn test_normalize_requires_output() {
        assert!(Cli::try_parse_from(["dtbench", "normalize", "cases.json"]).is_err());
    }

    #[test]
    fn test_format_arg_mapping() {
        assert_eq!(FormatArg::Auto.to_format(), None);
        assert_eq!(FormatArg::Jsonl.to_format(), Some(DatasetFormat::JsonLines));
    }
}
