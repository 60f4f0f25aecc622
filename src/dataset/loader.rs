//! Dataset loader
//!
//! Loading runs three phases over the whole input and stops at the first
//! phase that fails:
//! 1. syntax (`DTB_FORMAT_ERROR`)
//! 2. shape of every case (`DTB_SCHEMA_ERROR`)
//! 3. consistency of the collection (`DTB_CONSISTENCY_ERROR`)
//!
//! Either every case is returned or none is.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::observability::Event;
use crate::taxonomy::Taxonomy;

use super::errors::{DatasetError, DatasetResult, Violation};
use super::shape;
use super::types::Case;
use super::validator::CaseValidator;

/// Serialized layout of a dataset file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    /// One top-level JSON array of cases
    Json,
    /// One case object per non-blank line
    JsonLines,
}

impl DatasetFormat {
    /// Picks the format from a file extension: `.jsonl` is JSON Lines,
    /// anything else is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("jsonl") => DatasetFormat::JsonLines,
            _ => DatasetFormat::Json,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetFormat::Json => "json",
            DatasetFormat::JsonLines => "jsonl",
        }
    }
}

/// Loads datasets and validates them against a strategy taxonomy.
pub struct DatasetLoader<'a> {
    taxonomy: &'a Taxonomy,
}

impl<'a> DatasetLoader<'a> {
    pub fn new(taxonomy: &'a Taxonomy) -> Self {
        Self { taxonomy }
    }

    /// Parses and validates a JSON array of cases.
    pub fn load_str(&self, source: &str) -> DatasetResult<Vec<Case>> {
        self.load_with_format(source, DatasetFormat::Json)
    }

    /// Parses and validates `source` in the given format.
    pub fn load_with_format(&self, source: &str, format: DatasetFormat) -> DatasetResult<Vec<Case>> {
        info!(
            event = %Event::DatasetLoadStart,
            format = format.as_str(),
            bytes = source.len()
        );

        let result = self.load_inner(source, format);
        match &result {
            Ok(cases) => info!(event = %Event::DatasetLoaded, cases = cases.len()),
            Err(e) => warn!(
                event = %Event::DatasetRejected,
                code = e.code().code(),
                violations = e.violations().len()
            ),
        }
        result
    }

    /// Reads and loads a dataset file; the format follows the extension.
    pub fn load_file(&self, path: &Path) -> DatasetResult<Vec<Case>> {
        self.load_file_with_format(path, DatasetFormat::from_path(path))
    }

    /// Reads and loads a dataset file in an explicit format.
    pub fn load_file_with_format(&self, path: &Path, format: DatasetFormat) -> DatasetResult<Vec<Case>> {
        debug!(event = %Event::DatasetLoadStart, path = %path.display());
        let source = read_utf8(path)?;
        self.load_with_format(&source, format)
    }

    fn load_inner(&self, source: &str, format: DatasetFormat) -> DatasetResult<Vec<Case>> {
        let values = match format {
            DatasetFormat::Json => parse_json_array(source)?,
            DatasetFormat::JsonLines => parse_json_lines(source)?,
        };

        let mut shape_violations = Vec::new();
        for (index, value) in values.iter().enumerate() {
            shape_violations.extend(
                shape::check_case(value)
                    .into_iter()
                    .map(|v| v.in_case(Some(index), None)),
            );
        }
        if !shape_violations.is_empty() {
            return Err(DatasetError::Schema {
                violations: shape_violations,
            });
        }

        let cases = decode_cases(values)?;

        let violations = CaseValidator::new(self.taxonomy).validate_collection(&cases);
        if !violations.is_empty() {
            return Err(DatasetError::Consistency { violations });
        }

        Ok(cases)
    }
}

/// Loads a JSON array of cases from `source`.
pub fn load(source: &str, taxonomy: &Taxonomy) -> DatasetResult<Vec<Case>> {
    DatasetLoader::new(taxonomy).load_str(source)
}

/// Loads `source` in an explicit format.
pub fn load_with_format(
    source: &str,
    format: DatasetFormat,
    taxonomy: &Taxonomy,
) -> DatasetResult<Vec<Case>> {
    DatasetLoader::new(taxonomy).load_with_format(source, format)
}

/// Loads a dataset file, picking the format from its extension.
pub fn load_file(path: &Path, taxonomy: &Taxonomy) -> DatasetResult<Vec<Case>> {
    DatasetLoader::new(taxonomy).load_file(path)
}

/// Serializes cases as a pretty-printed JSON array.
pub fn to_json_string(cases: &[Case]) -> DatasetResult<String> {
    serde_json::to_string_pretty(cases)
        .map_err(|e| DatasetError::io("<in-memory>", format!("Failed to serialize dataset: {}", e)))
}

/// Serializes cases as JSON Lines, one compact case per line.
pub fn to_json_lines(cases: &[Case]) -> DatasetResult<String> {
    let mut out = String::new();
    for case in cases {
        let line = serde_json::to_string(case).map_err(|e| {
            DatasetError::io("<in-memory>", format!("Failed to serialize case '{}': {}", case.name, e))
        })?;
        out.push_str(&line);
        out.push('\n');
    }
    Ok(out)
}

/// Writes cases to `path` in the given format.
pub fn save_file(path: &Path, cases: &[Case], format: DatasetFormat) -> DatasetResult<()> {
    let content = match format {
        DatasetFormat::Json => to_json_string(cases)?,
        DatasetFormat::JsonLines => to_json_lines(cases)?,
    };

    fs::write(path, content).map_err(|e| {
        DatasetError::io(path.display().to_string(), format!("Failed to write file: {}", e))
    })?;

    info!(
        event = %Event::DatasetWritten,
        path = %path.display(),
        cases = cases.len(),
        format = format.as_str()
    );
    Ok(())
}

fn read_utf8(path: &Path) -> DatasetResult<String> {
    let bytes = fs::read(path).map_err(|e| {
        DatasetError::io(path.display().to_string(), format!("Failed to read file: {}", e))
    })?;

    String::from_utf8(bytes).map_err(|e| {
        let valid = &e.as_bytes()[..e.utf8_error().valid_up_to()];
        let line = valid.iter().filter(|&&b| b == b'\n').count() + 1;
        let column = valid.iter().rev().take_while(|&&b| b != b'\n').count() + 1;
        DatasetError::format(line, column, "input is not valid UTF-8")
    })
}

fn parse_json_array(source: &str) -> DatasetResult<Vec<Value>> {
    let root: Value = serde_json::from_str(source)
        .map_err(|e| DatasetError::format(e.line(), e.column(), e.to_string()))?;

    match root {
        Value::Array(values) => Ok(values),
        other => Err(DatasetError::Schema {
            violations: vec![Violation::type_mismatch(
                "$root",
                "array of case objects",
                shape::json_type_name(&other),
            )],
        }),
    }
}

fn parse_json_lines(source: &str) -> DatasetResult<Vec<Value>> {
    let mut values = Vec::new();
    for (i, line) in source.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(line)
            .map_err(|e| DatasetError::format(i + 1, e.column(), e.to_string()))?;
        values.push(value);
    }
    Ok(values)
}

fn decode_cases(values: Vec<Value>) -> DatasetResult<Vec<Case>> {
    let mut cases = Vec::with_capacity(values.len());
    let mut violations = Vec::new();

    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<Case>(value) {
            Ok(case) => cases.push(case),
            Err(e) => violations.push(
                Violation::type_mismatch("$root", "case object", e.to_string())
                    .in_case(Some(index), None),
            ),
        }
    }

    if violations.is_empty() {
        Ok(cases)
    } else {
        Err(DatasetError::Schema { violations })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::errors::{DatasetErrorCode, ViolationKind};
    use serde_json::json;
    use tempfile::TempDir;

    fn taxonomy() -> Taxonomy {
        Taxonomy::builtin().unwrap()
    }

    fn case_json(name: &str) -> Value {
        json!({
            "name": name,
            "table": [{
                "table_title": "Scores",
                "header": ["Team", "Score"],
                "data": [["Falcons", "12"]]
            }],
            "document": "The Falcons scored a dozen.",
            "ground_truth": [{
                "header": [["Team"], ["Score"]],
                "data": [[
                    {"value": "Falcons", "strategy": []},
                    {"value": "12", "strategy": ["T3"]}
                ]]
            }]
        })
    }

    #[test]
    fn test_load_valid_collection() {
        let taxonomy = taxonomy();
        let source = json!([case_json("a"), case_json("b")]).to_string();

        let cases = load(&source, &taxonomy).unwrap();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[1].name, "b");
        assert_eq!(cases[0].ground_truth[0].data[0][1].strategy, vec!["T3"]);
    }

    #[test]
    fn test_empty_collection_is_valid() {
        let taxonomy = taxonomy();
        assert!(load("[]", &taxonomy).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_json_is_format_error() {
        let taxonomy = taxonomy();
        let err = load("[{\"name\": \"a\",\n  oops}]", &taxonomy).unwrap_err();
        assert_eq!(err.code(), DatasetErrorCode::Format);
        match err {
            DatasetError::Format { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_non_array_root_is_schema_error() {
        let taxonomy = taxonomy();
        let err = load(&case_json("a").to_string(), &taxonomy).unwrap_err();
        assert_eq!(err.code(), DatasetErrorCode::Schema);
        assert_eq!(err.violations()[0].path, "$root");
    }

    #[test]
    fn test_missing_field_is_schema_error_with_context() {
        let taxonomy = taxonomy();
        let mut broken = case_json("b");
        broken.as_object_mut().unwrap().remove("document");
        let source = json!([case_json("a"), broken]).to_string();

        let err = load(&source, &taxonomy).unwrap_err();
        assert_eq!(err.code(), DatasetErrorCode::Schema);
        let v = &err.violations()[0];
        assert_eq!(v.kind, ViolationKind::MissingField);
        assert_eq!(v.case_index, Some(1));
        assert_eq!(v.case_name.as_deref(), Some("b"));
        assert_eq!(v.path, "document");
    }

    #[test]
    fn test_shape_errors_take_precedence_over_consistency() {
        let taxonomy = taxonomy();
        let mut bad_code = case_json("a");
        bad_code["ground_truth"][0]["data"][0][1]["strategy"] = json!(["Z9"]);
        let mut bad_shape = case_json("b");
        bad_shape["document"] = json!(["not", "a", "string"]);
        let source = json!([bad_code, bad_shape]).to_string();

        let err = load(&source, &taxonomy).unwrap_err();
        assert_eq!(err.code(), DatasetErrorCode::Schema);
        assert_eq!(err.violations().len(), 1);
    }

    #[test]
    fn test_consistency_error_rejects_whole_collection() {
        let taxonomy = taxonomy();
        let mut bad = case_json("b");
        bad["table"][0]["data"][0] = json!(["x", "y", "z"]);
        let source = json!([case_json("a"), bad, case_json("c")]).to_string();

        let err = load(&source, &taxonomy).unwrap_err();
        assert_eq!(err.code(), DatasetErrorCode::Consistency);
        assert_eq!(err.violations().len(), 1);
        assert_eq!(err.violations()[0].kind, ViolationKind::RowLength);
    }

    #[test]
    fn test_json_lines_loading() {
        let taxonomy = taxonomy();
        let source = format!("{}\n\n{}\n", case_json("a"), case_json("b"));

        let cases = load_with_format(&source, DatasetFormat::JsonLines, &taxonomy).unwrap();
        assert_eq!(cases.len(), 2);
    }

    #[test]
    fn test_json_lines_format_error_reports_line() {
        let taxonomy = taxonomy();
        let source = format!("{}\n{{\"name\": \n", case_json("a"));

        let err = load_with_format(&source, DatasetFormat::JsonLines, &taxonomy).unwrap_err();
        match err {
            DatasetError::Format { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(DatasetFormat::from_path(Path::new("a/b.jsonl")), DatasetFormat::JsonLines);
        assert_eq!(DatasetFormat::from_path(Path::new("a/b.JSONL")), DatasetFormat::JsonLines);
        assert_eq!(DatasetFormat::from_path(Path::new("a/b.json")), DatasetFormat::Json);
        assert_eq!(DatasetFormat::from_path(Path::new("a/b")), DatasetFormat::Json);
    }

    #[test]
    fn test_save_and_load_file() {
        let taxonomy = taxonomy();
        let temp_dir = TempDir::new().unwrap();
        let cases = load(&json!([case_json("a"), case_json("b")]).to_string(), &taxonomy).unwrap();

        for (file, format) in [("set.json", DatasetFormat::Json), ("set.jsonl", DatasetFormat::JsonLines)] {
            let path = temp_dir.path().join(file);
            save_file(&path, &cases, format).unwrap();
            assert_eq!(load_file(&path, &taxonomy).unwrap(), cases);
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let taxonomy = taxonomy();
        let temp_dir = TempDir::new().unwrap();
        let err = load_file(&temp_dir.path().join("absent.json"), &taxonomy).unwrap_err();
        assert_eq!(err.code(), DatasetErrorCode::Io);
    }

    #[test]
    fn test_invalid_utf8_is_format_error() {
        let taxonomy = taxonomy();
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.json");
        fs::write(&path, b"[\n  \"ok\",\n  \"\xff\"]").unwrap();

        let err = load_file(&path, &taxonomy).unwrap_err();
        match err {
            DatasetError::Format { line, column, .. } => {
                assert_eq!(line, 3);
                assert_eq!(column, 4);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
