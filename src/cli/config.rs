//! Configuration file for the dtbench CLI
//!
//! All fields are optional:
//! - `taxonomy_path`: default taxonomy artifact, relative to the config file
//! - `log_filter`: tracing filter used when `RUST_LOG` is unset (default "warn")
//! - `default_format`: "auto", "json" or "jsonl" (default "auto")

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dataset::DatasetFormat;
use crate::observability::DEFAULT_LOG_FILTER;

use super::errors::{CliError, CliResult};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Taxonomy artifact used when `--taxonomy` is not given
    #[serde(default)]
    pub taxonomy_path: Option<PathBuf>,

    /// Log filter (optional, default "warn")
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Dataset format when `--format` is not given (optional, default "auto")
    #[serde(default = "default_format")]
    pub default_format: String,
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

fn default_format() -> String {
    "auto".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            taxonomy_path: None,
            log_filter: default_log_filter(),
            default_format: default_format(),
        }
    }
}

impl Config {
    /// Load configuration from file
    ///
    /// A relative `taxonomy_path` is resolved against the config file's
    /// directory.
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let mut config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        if let Some(base) = path.parent() {
            config.taxonomy_path = config.taxonomy_path.map(|taxonomy| {
                if taxonomy.is_relative() {
                    base.join(taxonomy)
                } else {
                    taxonomy
                }
            });
        }

        Ok(config)
    }

    /// Loads `path` when given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> CliResult<()> {
        if self.log_filter.trim().is_empty() {
            return Err(CliError::config_error("log_filter must not be empty"));
        }

        self.format_override()?;
        Ok(())
    }

    /// Configured dataset format, or `None` for extension-based detection.
    pub fn format_override(&self) -> CliResult<Option<DatasetFormat>> {
        match self.default_format.as_str() {
            "auto" => Ok(None),
            "json" => Ok(Some(DatasetFormat::Json)),
            "jsonl" => Ok(Some(DatasetFormat::JsonLines)),
            other => Err(CliError::config_error(format!(
                "Invalid default_format: '{}'. Must be 'auto', 'json' or 'jsonl'.",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::load_or_default(None).unwrap();
        assert_eq!(config.log_filter, "warn");
        assert_eq!(config.format_override().unwrap(), None);
        assert!(config.taxonomy_path.is_none());
    }

    #[test]
    fn test_relative_taxonomy_resolved_against_config_dir() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dtbench.json");
        fs::write(&path, r#"{"taxonomy_path": "tax/codes.json", "default_format": "jsonl"}"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.taxonomy_path, Some(temp_dir.path().join("tax/codes.json")));
        assert_eq!(config.format_override().unwrap(), Some(DatasetFormat::JsonLines));
    }

    #[test]
    fn test_invalid_format_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dtbench.json");
        fs::write(&path, r#"{"default_format": "csv"}"#).unwrap();

        let err = Config::load(&path).unwrap_err();
        assert_eq!(err.code_str(), "DTB_CLI_CONFIG_ERROR");
        assert!(err.message().contains("csv"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dtbench.json");
        fs::write(&path, r#"{"taxonomy": "x.json"}"#).unwrap();

        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_empty_log_filter_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("dtbench.json");
        fs::write(&path, r#"{"log_filter": "  "}"#).unwrap();

        assert!(Config::load(&path).is_err());
    }
}
