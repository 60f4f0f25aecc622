//! CLI module for dtbench
//!
//! Provides command-line interface for:
//! - validate: load a dataset and report violations
//! - normalize: rewrite a valid dataset in canonical form
//! - taxonomy: print the strategy taxonomy in use

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command, FormatArg};
pub use commands::{normalize, run, run_command, show_taxonomy, validate};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_error_to, write_response, write_response_to};
