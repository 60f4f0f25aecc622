//! Dataset error types
//!
//! Error codes:
//! - DTB_FORMAT_ERROR (input is not well-formed JSON)
//! - DTB_SCHEMA_ERROR (missing, undeclared, null or mistyped field)
//! - DTB_CONSISTENCY_ERROR (row length, duplicate name, unknown strategy code)
//! - DTB_IO_ERROR (dataset file cannot be read or written)

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// What a single violation is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    // Shape
    MissingField,
    UnexpectedField,
    NullValue,
    TypeMismatch,

    // Consistency
    EmptyName,
    DuplicateName,
    RowLength,
    EmptyHeaderPath,
    UnknownPrimaryKey,
    UnknownStrategy,
}

impl ViolationKind {
    /// Whether this kind belongs to the shape phase rather than consistency.
    pub fn is_shape(&self) -> bool {
        matches!(
            self,
            ViolationKind::MissingField
                | ViolationKind::UnexpectedField
                | ViolationKind::NullValue
                | ViolationKind::TypeMismatch
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::MissingField => "missing_field",
            ViolationKind::UnexpectedField => "unexpected_field",
            ViolationKind::NullValue => "null_value",
            ViolationKind::TypeMismatch => "type_mismatch",
            ViolationKind::EmptyName => "empty_name",
            ViolationKind::DuplicateName => "duplicate_name",
            ViolationKind::RowLength => "row_length",
            ViolationKind::EmptyHeaderPath => "empty_header_path",
            ViolationKind::UnknownPrimaryKey => "unknown_primary_key",
            ViolationKind::UnknownStrategy => "unknown_strategy",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One located problem in a dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub kind: ViolationKind,
    /// Position of the case in the collection, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_index: Option<usize>,
    /// Case name, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_name: Option<String>,
    /// Field path relative to the case (e.g. `table[0].data[2]`)
    pub path: String,
    pub expected: String,
    pub actual: String,
}

impl Violation {
    pub fn new(
        kind: ViolationKind,
        path: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            case_index: None,
            case_name: None,
            path: path.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn missing_field(path: impl Into<String>) -> Self {
        Self::new(ViolationKind::MissingField, path, "field to be present", "missing")
    }

    pub fn unexpected_field(path: impl Into<String>) -> Self {
        Self::new(
            ViolationKind::UnexpectedField,
            path,
            "no undeclared fields",
            "extra field present",
        )
    }

    pub fn null_value(path: impl Into<String>) -> Self {
        Self::new(ViolationKind::NullValue, path, "non-null value", "null")
    }

    pub fn type_mismatch(
        path: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::new(ViolationKind::TypeMismatch, path, expected, actual)
    }

    pub fn row_length(path: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::new(
            ViolationKind::RowLength,
            path,
            format!("{} cells", expected),
            format!("{} cells", actual),
        )
    }

    pub fn unknown_strategy(path: impl Into<String>, code: &str) -> Self {
        Self::new(
            ViolationKind::UnknownStrategy,
            path,
            "code from the strategy taxonomy",
            format!("'{}'", code),
        )
    }

    pub fn duplicate_name(name: &str, first_index: usize) -> Self {
        Self::new(
            ViolationKind::DuplicateName,
            "name",
            "unique case name",
            format!("'{}' already used by case #{}", name, first_index),
        )
    }

    /// Attaches the case position and name.
    pub fn in_case(mut self, index: Option<usize>, name: Option<&str>) -> Self {
        if index.is_some() {
            self.case_index = index;
        }
        if let Some(name) = name {
            self.case_name = Some(name.to_string());
        }
        self
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.case_index, &self.case_name) {
            (Some(i), Some(name)) => write!(f, "case #{} '{}': ", i, name)?,
            (Some(i), None) => write!(f, "case #{}: ", i)?,
            (None, Some(name)) => write!(f, "case '{}': ", name)?,
            (None, None) => {}
        }
        write!(
            f,
            "{} at '{}': expected {}, got {}",
            self.kind, self.path, self.expected, self.actual
        )
    }
}

/// Dataset error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetErrorCode {
    Format,
    Schema,
    Consistency,
    Io,
}

impl DatasetErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            DatasetErrorCode::Format => "DTB_FORMAT_ERROR",
            DatasetErrorCode::Schema => "DTB_SCHEMA_ERROR",
            DatasetErrorCode::Consistency => "DTB_CONSISTENCY_ERROR",
            DatasetErrorCode::Io => "DTB_IO_ERROR",
        }
    }
}

impl fmt::Display for DatasetErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Errors raised while loading or writing a dataset
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatasetError {
    #[error("DTB_FORMAT_ERROR: malformed input at line {line}, column {column}: {message}")]
    Format {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("DTB_SCHEMA_ERROR: {} violation(s): {}", .violations.len(), summarize(.violations))]
    Schema { violations: Vec<Violation> },

    #[error("DTB_CONSISTENCY_ERROR: {} violation(s): {}", .violations.len(), summarize(.violations))]
    Consistency { violations: Vec<Violation> },

    #[error("DTB_IO_ERROR: '{path}': {message}")]
    Io { path: String, message: String },
}

impl DatasetError {
    pub fn format(line: usize, column: usize, message: impl Into<String>) -> Self {
        DatasetError::Format {
            line,
            column,
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<String>, message: impl Into<String>) -> Self {
        DatasetError::Io {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn code(&self) -> DatasetErrorCode {
        match self {
            DatasetError::Format { .. } => DatasetErrorCode::Format,
            DatasetError::Schema { .. } => DatasetErrorCode::Schema,
            DatasetError::Consistency { .. } => DatasetErrorCode::Consistency,
            DatasetError::Io { .. } => DatasetErrorCode::Io,
        }
    }

    /// Violations carried by schema and consistency errors.
    pub fn violations(&self) -> &[Violation] {
        match self {
            DatasetError::Schema { violations } | DatasetError::Consistency { violations } => {
                violations
            }
            _ => &[],
        }
    }
}

/// Shown in the error message; the full list stays available via `violations()`.
const SUMMARY_LIMIT: usize = 5;

fn summarize(violations: &[Violation]) -> String {
    let mut parts: Vec<String> = violations
        .iter()
        .take(SUMMARY_LIMIT)
        .map(Violation::to_string)
        .collect();
    if violations.len() > SUMMARY_LIMIT {
        parts.push(format!("and {} more", violations.len() - SUMMARY_LIMIT));
    }
    parts.join("; ")
}

/// Result type for dataset operations
pub type DatasetResult<T> = Result<T, DatasetError>;
