//! CLI module for formwizard
//!
//! Provides command-line interface for:
//! - serve: Load the form and serve the HTTP API
//! - validate: One-shot validation of a submission file
//! - inspect: Print the loaded form's steps and fields

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{inspect, run, run_command, serve, validate, Config};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_submission, write_json};
