//! dtbench - loader and validator for document-to-table ground truth
//!
//! A DTBench dataset is a collection of cases. Each case pairs source tables
//! and a synthesized document with the tables an extractor must recover,
//! every cell labelled with the strategy codes needed to recover it.

pub mod cli;
pub mod dataset;
pub mod observability;
pub mod taxonomy;
