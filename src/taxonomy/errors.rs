//! Taxonomy error types
//!
//! Error codes:
//! - DTB_TAXONOMY_IO (cannot read the artifact)
//! - DTB_TAXONOMY_MALFORMED (not valid JSON or wrong shape)
//! - DTB_TAXONOMY_INVALID (duplicate or empty codes, empty categories)

use thiserror::Error;

/// Result type for taxonomy operations
pub type TaxonomyResult<T> = Result<T, TaxonomyError>;

/// Errors raised while loading a strategy taxonomy
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaxonomyError {
    #[error("DTB_TAXONOMY_IO: failed to read taxonomy '{path}': {message}")]
    Io { path: String, message: String },

    #[error("DTB_TAXONOMY_MALFORMED: taxonomy '{origin}' is not valid: {message}")]
    Malformed { origin: String, message: String },

    #[error("DTB_TAXONOMY_INVALID: {0}")]
    Invalid(String),
}

impl TaxonomyError {
    /// Returns the string code for this error
    pub fn code(&self) -> &'static str {
        match self {
            TaxonomyError::Io { .. } => "DTB_TAXONOMY_IO",
            TaxonomyError::Malformed { .. } => "DTB_TAXONOMY_MALFORMED",
            TaxonomyError::Invalid(_) => "DTB_TAXONOMY_INVALID",
        }
    }
}
