//! Ground-truth record definitions
//!
//! Wire field names are fixed: `name`, `table`, `table_title`, `header`,
//! `data`, `primary_key`, `document`, `ground_truth`, `value`, `strategy`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// One benchmark item: source tables, the synthesized document, and the
/// tables an extractor is expected to recover from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Case {
    /// Unique identifier within a collection
    pub name: String,
    /// Source tables the document was synthesized from
    pub table: Vec<SourceTable>,
    /// Unstructured document text
    pub document: String,
    /// Expected extraction output
    pub ground_truth: Vec<TableExtraction>,
}

impl Case {
    /// Total number of annotated ground-truth cells.
    pub fn cell_count(&self) -> usize {
        self.ground_truth
            .iter()
            .flat_map(|t| t.data.iter())
            .map(Vec::len)
            .sum()
    }

    /// Iterates over every annotated ground-truth cell.
    pub fn cells(&self) -> impl Iterator<Item = &AnnotatedCell> {
        self.ground_truth
            .iter()
            .flat_map(|t| t.data.iter())
            .flat_map(|row| row.iter())
    }
}

/// Primary key declaration of a source table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimaryKey {
    Single(String),
    Composite(Vec<String>),
}

impl PrimaryKey {
    /// Column names making up the key.
    pub fn columns(&self) -> Vec<&str> {
        match self {
            PrimaryKey::Single(column) => vec![column.as_str()],
            PrimaryKey::Composite(columns) => columns.iter().map(String::as_str).collect(),
        }
    }
}

/// Metadata and content of one source table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceTable {
    pub table_title: String,
    /// Column names
    pub header: Vec<String>,
    /// Rows of cell values, each as long as `header`
    pub data: Vec<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<PrimaryKey>,
}

/// One ground-truth table.
///
/// Each entry of `header` is the label path of one leaf column, outermost
/// group first: `[["Revenue", "2022"], ["Revenue", "2023"]]` is two leaf
/// columns sharing the `Revenue` group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableExtraction {
    pub header: Vec<Vec<String>>,
    pub data: Vec<Vec<AnnotatedCell>>,
}

impl TableExtraction {
    /// Number of leaf columns implied by the header.
    pub fn leaf_count(&self) -> usize {
        self.header.len()
    }

    /// Leaf column labels joined with `separator` across header levels.
    pub fn leaf_labels(&self, separator: &str) -> Vec<String> {
        self.header.iter().map(|path| path.join(separator)).collect()
    }

    /// Depth of the deepest header path.
    pub fn header_depth(&self) -> usize {
        self.header.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// One ground-truth cell with the capabilities needed to recover it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnnotatedCell {
    pub value: String,
    /// Strategy codes; empty means directly extractable
    pub strategy: Vec<String>,
}

impl AnnotatedCell {
    pub fn new(value: impl Into<String>, strategy: &[&str]) -> Self {
        Self {
            value: value.into(),
            strategy: strategy.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Whether the value can be copied from the document as-is.
    pub fn is_direct(&self) -> bool {
        self.strategy.is_empty()
    }

    /// Strategy codes as a set.
    pub fn strategy_set(&self) -> BTreeSet<&str> {
        self.strategy.iter().map(String::as_str).collect()
    }
}
