//! Ground-truth dataset subsystem for dtbench
//!
//! A dataset is an ordered collection of cases. Each case pairs source
//! tables and a synthesized document with the tables an extractor should
//! recover, every cell annotated with the capabilities needed to recover it.
//!
//! # Loading rules
//!
//! - Malformed syntax is a format error
//! - Missing, undeclared, null or mistyped fields are schema errors
//! - Row-length mismatches, duplicate names and unknown strategy codes are
//!   consistency errors
//! - Loading is all-or-nothing; nothing is repaired or skipped

mod errors;
mod loader;
mod shape;
mod types;
mod validator;

pub use errors::{DatasetError, DatasetErrorCode, DatasetResult, Violation, ViolationKind};
pub use loader::{
    load, load_file, load_with_format, save_file, to_json_lines, to_json_string, DatasetFormat,
    DatasetLoader,
};
pub use shape::{case_shape, check_case, FieldSpec, Shape};
pub use types::{AnnotatedCell, Case, PrimaryKey, SourceTable, TableExtraction};
pub use validator::{validate_case, validate_collection, CaseValidator};
