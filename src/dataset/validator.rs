//! Consistency validation of decoded cases
//!
//! Checks, all reported together:
//! - `name` is non-empty and unique within the collection
//! - source table rows are as long as their header
//! - primary key columns exist in the header
//! - extraction header paths are non-empty
//! - extraction rows are as long as the leaf-column count
//! - every strategy code is in the taxonomy
//!
//! The validator does not mutate cases and is deterministic.

use std::collections::HashMap;

use crate::taxonomy::Taxonomy;

use super::errors::{Violation, ViolationKind};
use super::types::{Case, SourceTable, TableExtraction};

/// Validates cases against the structural invariants and a strategy taxonomy.
pub struct CaseValidator<'a> {
    taxonomy: &'a Taxonomy,
}

impl<'a> CaseValidator<'a> {
    pub fn new(taxonomy: &'a Taxonomy) -> Self {
        Self { taxonomy }
    }

    /// Validates one case in isolation.
    ///
    /// Returns every violation found rather than stopping at the first one.
    pub fn validate_case(&self, case: &Case) -> Result<(), Vec<Violation>> {
        let mut out = Vec::new();

        if case.name.trim().is_empty() {
            out.push(Violation::new(
                ViolationKind::EmptyName,
                "name",
                "non-empty case name",
                format!("{:?}", case.name),
            ));
        }

        for (i, table) in case.table.iter().enumerate() {
            self.check_source_table(table, &format!("table[{}]", i), &mut out);
        }

        for (i, extraction) in case.ground_truth.iter().enumerate() {
            self.check_extraction(extraction, &format!("ground_truth[{}]", i), &mut out);
        }

        if out.is_empty() {
            Ok(())
        } else {
            Err(out
                .into_iter()
                .map(|v| v.in_case(None, Some(case.name.as_str())))
                .collect())
        }
    }

    /// Validates a whole collection, including cross-case name uniqueness.
    ///
    /// Violations are tagged with the case index and ordered by it.
    pub fn validate_collection(&self, cases: &[Case]) -> Vec<Violation> {
        let mut out = Vec::new();
        let mut first_seen: HashMap<&str, usize> = HashMap::new();

        for (index, case) in cases.iter().enumerate() {
            if let Err(violations) = self.validate_case(case) {
                out.extend(violations.into_iter().map(|v| v.in_case(Some(index), None)));
            }

            if let Some(&first) = first_seen.get(case.name.as_str()) {
                out.push(
                    Violation::duplicate_name(&case.name, first)
                        .in_case(Some(index), Some(case.name.as_str())),
                );
            } else {
                first_seen.insert(case.name.as_str(), index);
            }
        }

        out
    }

    fn check_source_table(&self, table: &SourceTable, path: &str, out: &mut Vec<Violation>) {
        let width = table.header.len();
        for (r, row) in table.data.iter().enumerate() {
            if row.len() != width {
                out.push(Violation::row_length(
                    format!("{}.data[{}]", path, r),
                    width,
                    row.len(),
                ));
            }
        }

        if let Some(primary_key) = &table.primary_key {
            for column in primary_key.columns() {
                if !table.header.iter().any(|h| h == column) {
                    out.push(Violation::new(
                        ViolationKind::UnknownPrimaryKey,
                        format!("{}.primary_key", path),
                        "column declared in header",
                        format!("'{}'", column),
                    ));
                }
            }
        }
    }

    fn check_extraction(&self, extraction: &TableExtraction, path: &str, out: &mut Vec<Violation>) {
        for (h, header_path) in extraction.header.iter().enumerate() {
            if header_path.is_empty() {
                out.push(Violation::new(
                    ViolationKind::EmptyHeaderPath,
                    format!("{}.header[{}]", path, h),
                    "at least one label",
                    "empty header path",
                ));
            }
        }

        let leaves = extraction.leaf_count();
        for (r, row) in extraction.data.iter().enumerate() {
            let row_path = format!("{}.data[{}]", path, r);
            if row.len() != leaves {
                out.push(Violation::row_length(&row_path, leaves, row.len()));
            }

            for (c, cell) in row.iter().enumerate() {
                for (s, code) in cell.strategy.iter().enumerate() {
                    if !self.taxonomy.contains(code) {
                        out.push(Violation::unknown_strategy(
                            format!("{}[{}].strategy[{}]", row_path, c, s),
                            code,
                        ));
                    }
                }
            }
        }
    }
}

/// Validates one case against `taxonomy`.
pub fn validate_case(case: &Case, taxonomy: &Taxonomy) -> Result<(), Vec<Violation>> {
    CaseValidator::new(taxonomy).validate_case(case)
}

/// Validates a collection against `taxonomy`; an empty result means valid.
pub fn validate_collection(cases: &[Case], taxonomy: &Taxonomy) -> Vec<Violation> {
    CaseValidator::new(taxonomy).validate_collection(cases)
}
