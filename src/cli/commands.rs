//! CLI command implementations
//!
//! Each command loads the taxonomy, runs, and writes exactly one JSON
//! response to stdout. A rejected dataset is reported on stdout with every
//! violation and then returned as an error so the process exits non-zero.

use std::path::Path;

use serde_json::json;
use tracing::info;

use crate::dataset::{save_file, Case, DatasetError, DatasetFormat, DatasetLoader};
use crate::observability::{init_logging, Event};
use crate::taxonomy::Taxonomy;

use super::args::{Cli, Command, FormatArg};
use super::config::Config;
use super::errors::CliResult;
use super::io::{write_error, write_response};

/// Main CLI entry point
///
/// Parses arguments, loads configuration, installs logging and dispatches.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let config = Config::load_or_default(cli.config.as_deref())?;

    if let Err(e) = init_logging(&config.log_filter) {
        eprintln!("{}", e);
    }
    if let Some(path) = &cli.config {
        info!(event = %Event::ConfigLoaded, path = %path.display());
    }

    run_command(cli.command, &config)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command, config: &Config) -> CliResult<()> {
    match cmd {
        Command::Validate {
            dataset,
            taxonomy,
            format,
        } => validate(&dataset, taxonomy.as_deref(), format, config),
        Command::Normalize {
            dataset,
            output,
            taxonomy,
            format,
            output_format,
        } => normalize(&dataset, &output, taxonomy.as_deref(), format, output_format, config),
        Command::Taxonomy { taxonomy } => show_taxonomy(taxonomy.as_deref(), config),
    }
}

/// Load a dataset and report a summary, or every violation found.
pub fn validate(
    dataset: &Path,
    taxonomy_path: Option<&Path>,
    format: Option<FormatArg>,
    config: &Config,
) -> CliResult<()> {
    let taxonomy = load_taxonomy(taxonomy_path, config)?;
    let format = resolve_format(dataset, format, config)?;
    let cases = load_dataset(dataset, format, &taxonomy)?;

    write_response(json!({
        "dataset": dataset.display().to_string(),
        "format": format.as_str(),
        "cases": cases.len(),
        "source_tables": cases.iter().map(|c| c.table.len()).sum::<usize>(),
        "extractions": cases.iter().map(|c| c.ground_truth.len()).sum::<usize>(),
        "cells": cases.iter().map(Case::cell_count).sum::<usize>()
    }))
}

/// Load a dataset and write it back in canonical form.
pub fn normalize(
    dataset: &Path,
    output: &Path,
    taxonomy_path: Option<&Path>,
    format: Option<FormatArg>,
    output_format: Option<FormatArg>,
    config: &Config,
) -> CliResult<()> {
    let taxonomy = load_taxonomy(taxonomy_path, config)?;
    let input_format = resolve_format(dataset, format, config)?;
    let cases = load_dataset(dataset, input_format, &taxonomy)?;

    let output_format = output_format
        .and_then(FormatArg::to_format)
        .unwrap_or_else(|| DatasetFormat::from_path(output));
    save_file(output, &cases, output_format)?;

    write_response(json!({
        "output": output.display().to_string(),
        "format": output_format.as_str(),
        "cases": cases.len()
    }))
}

/// Print the taxonomy in use.
pub fn show_taxonomy(taxonomy_path: Option<&Path>, config: &Config) -> CliResult<()> {
    let taxonomy = load_taxonomy(taxonomy_path, config)?;
    write_response(json!({
        "codes": taxonomy.len(),
        "categories": taxonomy.categories()
    }))
}

/// Loads the taxonomy from the flag, then the config file, then the builtin artifact.
fn load_taxonomy(flag: Option<&Path>, config: &Config) -> CliResult<Taxonomy> {
    let taxonomy = match flag.or(config.taxonomy_path.as_deref()) {
        Some(path) => Taxonomy::load(path)?,
        None => Taxonomy::builtin()?,
    };
    info!(
        event = %Event::TaxonomyLoaded,
        categories = taxonomy.categories().len(),
        codes = taxonomy.len()
    );
    Ok(taxonomy)
}

fn resolve_format(dataset: &Path, flag: Option<FormatArg>, config: &Config) -> CliResult<DatasetFormat> {
    let explicit = match flag {
        Some(arg) => arg.to_format(),
        None => config.format_override()?,
    };
    Ok(explicit.unwrap_or_else(|| DatasetFormat::from_path(dataset)))
}

fn load_dataset(path: &Path, format: DatasetFormat, taxonomy: &Taxonomy) -> CliResult<Vec<Case>> {
    DatasetLoader::new(taxonomy)
        .load_file_with_format(path, format)
        .or_else(report_rejection)
}

fn report_rejection<T>(error: DatasetError) -> CliResult<T> {
    write_error(error.code().code(), &error.to_string(), error.violations())?;
    Err(error.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const CASES: &str = r#"[{
        "name": "c1",
        "table": [{"table_title": "t", "header": ["A"], "data": [["1"]]}],
        "document": "A is one.",
        "ground_truth": [{"header": [["A"]], "data": [[{"value": "1", "strategy": ["T1"]}]]}]
    }]"#;

    #[test]
    fn test_validate_accepts_valid_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cases.json");
        fs::write(&path, CASES).unwrap();

        assert!(validate(&path, None, None, &Config::default()).is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_code() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cases.json");
        fs::write(&path, CASES.replace("\"T1\"", "\"Z9\"")).unwrap();

        let err = validate(&path, None, None, &Config::default()).unwrap_err();
        assert_eq!(err.code_str(), "DTB_CONSISTENCY_ERROR");
    }

    #[test]
    fn test_normalize_writes_json_lines() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("cases.json");
        let output = temp_dir.path().join("cases.jsonl");
        fs::write(&input, CASES).unwrap();

        normalize(&input, &output, None, None, None, &Config::default()).unwrap();

        let written = fs::read_to_string(&output).unwrap();
        assert_eq!(written.lines().count(), 1);
        assert!(written.contains("\"name\":\"c1\""));
    }

    #[test]
    fn test_custom_taxonomy_from_config() {
        let temp_dir = TempDir::new().unwrap();
        let taxonomy = temp_dir.path().join("tax.json");
        fs::write(
            &taxonomy,
            r#"{"version":1,"categories":[{"code":"X","name":"Extra","capabilities":[{"code":"X1","name":"One"}]}]}"#,
        )
        .unwrap();
        let path = temp_dir.path().join("cases.json");
        fs::write(&path, CASES.replace("\"T1\"", "\"X1\"")).unwrap();

        let config = Config {
            taxonomy_path: Some(taxonomy),
            ..Config::default()
        };
        assert!(validate(&path, None, None, &config).is_ok());
        assert!(validate(&path, None, None, &Config::default()).is_err());
    }

    #[test]
    fn test_resolve_format_precedence() {
        let config = Config {
            default_format: "jsonl".into(),
            ..Config::default()
        };
        let path = Path::new("cases.json");
        assert_eq!(resolve_format(path, None, &config).unwrap(), DatasetFormat::JsonLines);
        assert_eq!(
            resolve_format(path, Some(FormatArg::Json), &config).unwrap(),
            DatasetFormat::Json
        );
        assert_eq!(
            resolve_format(path, Some(FormatArg::Auto), &config).unwrap(),
            DatasetFormat::Json
        );
    }
}
