//! Observable lifecycle events for dtbench
//!
//! Events are explicit and typed. They are emitted through `tracing` as the
//! `event` field of a log record.

use std::fmt;

/// Observable events in dtbench
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration file loaded
    ConfigLoaded,
    /// Strategy taxonomy loaded
    TaxonomyLoaded,

    // Dataset
    /// Dataset parsing begins
    DatasetLoadStart,
    /// Dataset accepted
    DatasetLoaded,
    /// Dataset rejected by a format, schema or consistency check
    DatasetRejected,
    /// Dataset written back to disk
    DatasetWritten,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::TaxonomyLoaded => "TAXONOMY_LOADED",
            Event::DatasetLoadStart => "DATASET_LOAD_BEGIN",
            Event::DatasetLoaded => "DATASET_LOADED",
            Event::DatasetRejected => "DATASET_REJECTED",
            Event::DatasetWritten => "DATASET_WRITTEN",
        }
    }

    /// Returns true if this event means the run cannot use its input
    pub fn is_failure(&self) -> bool {
        matches!(self, Event::DatasetRejected)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
