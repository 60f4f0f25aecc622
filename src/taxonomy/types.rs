//! Strategy taxonomy definitions
//!
//! The taxonomy is a closed set of capability codes grouped under top-level
//! categories. It is always read from a JSON artifact; no code is known to
//! the binary except through that artifact.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{TaxonomyError, TaxonomyResult};

/// Artifact shipped with the crate, used when no taxonomy path is configured.
const BUILTIN_TAXONOMY: &str = include_str!("../../config/taxonomy.json");

/// Artifact format version understood by this crate
pub const TAXONOMY_FORMAT_VERSION: u32 = 1;

/// A fine-grained extraction capability (e.g. `T3`, Semantic Mapping)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Capability {
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A top-level capability category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Category {
    pub code: String,
    pub name: String,
    pub capabilities: Vec<Capability>,
}

/// On-disk layout of the taxonomy artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct TaxonomyFile {
    version: u32,
    categories: Vec<Category>,
}

/// Validated, indexed strategy taxonomy.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    categories: Vec<Category>,
    /// capability code -> (category index, capability index)
    index: HashMap<String, (usize, usize)>,
}

impl Taxonomy {
    /// Loads and validates a taxonomy artifact from disk.
    pub fn load(path: &Path) -> TaxonomyResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| TaxonomyError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Parses a taxonomy artifact held in memory.
    pub fn from_json_str(content: &str) -> TaxonomyResult<Self> {
        Self::parse(content, "<in-memory>")
    }

    /// Returns the taxonomy shipped in `config/taxonomy.json`.
    pub fn builtin() -> TaxonomyResult<Self> {
        Self::parse(BUILTIN_TAXONOMY, "<builtin>")
    }

    /// Builds a taxonomy from already-constructed categories.
    pub fn from_categories(categories: Vec<Category>) -> TaxonomyResult<Self> {
        let index = build_index(&categories)?;
        Ok(Self { categories, index })
    }

    fn parse(content: &str, origin: &str) -> TaxonomyResult<Self> {
        let file: TaxonomyFile =
            serde_json::from_str(content).map_err(|e| TaxonomyError::Malformed {
                origin: origin.to_string(),
                message: e.to_string(),
            })?;

        if file.version != TAXONOMY_FORMAT_VERSION {
            return Err(TaxonomyError::Malformed {
                origin: origin.to_string(),
                message: format!(
                    "unsupported version {}, expected {}",
                    file.version, TAXONOMY_FORMAT_VERSION
                ),
            });
        }

        Self::from_categories(file.categories)
    }

    /// Whether `code` names a capability in this taxonomy.
    pub fn contains(&self, code: &str) -> bool {
        self.index.contains_key(code)
    }

    pub fn capability(&self, code: &str) -> Option<&Capability> {
        self.index
            .get(code)
            .map(|&(cat, cap)| &self.categories[cat].capabilities[cap])
    }

    /// Returns the category a capability code belongs to.
    pub fn category_of(&self, code: &str) -> Option<&Category> {
        self.index.get(code).map(|&(cat, _)| &self.categories[cat])
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// All capability codes, in artifact order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.categories
            .iter()
            .flat_map(|c| c.capabilities.iter().map(|cap| cap.code.as_str()))
    }

    /// Number of capability codes.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Serializes back to the artifact format.
    pub fn to_json_string(&self) -> TaxonomyResult<String> {
        let file = TaxonomyFile {
            version: TAXONOMY_FORMAT_VERSION,
            categories: self.categories.clone(),
        };
        serde_json::to_string_pretty(&file).map_err(|e| TaxonomyError::Malformed {
            origin: "<in-memory>".into(),
            message: e.to_string(),
        })
    }
}

fn build_index(categories: &[Category]) -> TaxonomyResult<HashMap<String, (usize, usize)>> {
    if categories.is_empty() {
        return Err(TaxonomyError::Invalid(
            "taxonomy must define at least one category".into(),
        ));
    }

    let mut category_codes = HashSet::new();
    let mut index = HashMap::new();

    for (cat_idx, category) in categories.iter().enumerate() {
        if category.code.trim().is_empty() {
            return Err(TaxonomyError::Invalid(format!(
                "category #{} has an empty code",
                cat_idx
            )));
        }
        if !category_codes.insert(category.code.as_str()) {
            return Err(TaxonomyError::Invalid(format!(
                "duplicate category code '{}'",
                category.code
            )));
        }
        if category.capabilities.is_empty() {
            return Err(TaxonomyError::Invalid(format!(
                "category '{}' defines no capabilities",
                category.code
            )));
        }

        for (cap_idx, capability) in category.capabilities.iter().enumerate() {
            if capability.code.trim().is_empty() {
                return Err(TaxonomyError::Invalid(format!(
                    "capability #{} of category '{}' has an empty code",
                    cap_idx, category.code
                )));
            }
            if index
                .insert(capability.code.clone(), (cat_idx, cap_idx))
                .is_some()
            {
                return Err(TaxonomyError::Invalid(format!(
                    "duplicate capability code '{}'",
                    capability.code
                )));
            }
        }
    }

    Ok(index)
}
