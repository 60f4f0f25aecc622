//! Strategy taxonomy subsystem
//!
//! Strategy codes label the capability needed to recover a ground-truth
//! cell from its document. The set of codes is closed and comes from an
//! external artifact (`config/taxonomy.json` by default).

mod errors;
mod types;

pub use errors::{TaxonomyError, TaxonomyResult};
pub use types::{Capability, Category, Taxonomy, TAXONOMY_FORMAT_VERSION};
