//! CLI argument definitions using clap
//!
//! Commands:
//! - formwizard serve    [--config <path>] [--port <port>] [--strict]
//! - formwizard validate [--config <path>] --input <path> [--strict]
//! - formwizard inspect  [--config <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// formwizard - schema-driven multi-step form backend
#[derive(Parser, Debug)]
#[command(name = "formwizard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the form API over HTTP
    Serve {
        /// Path to configuration file (defaults apply when omitted)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Port override
        #[arg(long)]
        port: Option<u16>,

        /// Reject submitted keys the schema does not declare
        #[arg(long)]
        strict: bool,
    },

    /// Validate a JSON submission file against the form schema and exit
    Validate {
        /// Path to configuration file (defaults apply when omitted)
        #[arg(long)]
        config: Option<PathBuf>,

        /// JSON file holding the submitted data
        #[arg(long)]
        input: PathBuf,

        /// Reject submitted keys the schema does not declare
        #[arg(long)]
        strict: bool,
    },

    /// Print the steps and fields of the loaded form
    Inspect {
        /// Path to configuration file (defaults apply when omitted)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
