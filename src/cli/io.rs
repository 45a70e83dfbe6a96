//! JSON I/O handling for CLI
//!
//! - Input: a JSON file
//! - Output: one pretty-printed JSON document on stdout

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::Serialize;

use super::errors::{CliError, CliResult};
use crate::schema::SubmittedData;

/// Read a submission file; the top-level value must be an object.
pub fn read_submission(path: &Path) -> CliResult<SubmittedData> {
    let content = fs::read_to_string(path)
        .map_err(|e| CliError::io_error(format!("Failed to read '{}': {}", path.display(), e)))?;

    match serde_json::from_str(&content)? {
        serde_json::Value::Object(map) => Ok(map),
        _ => Err(CliError::invalid_input(format!(
            "'{}' must contain a JSON object",
            path.display()
        ))),
    }
}

/// Write a value as JSON to stdout
pub fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}
