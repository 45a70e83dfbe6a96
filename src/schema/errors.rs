//! Schema loading errors
//!
//! Error codes:
//! - FORM_SCHEMA_UNREADABLE (FATAL)
//! - FORM_SCHEMA_MALFORMED (FATAL)
//! - FORM_SCHEMA_INVALID (FATAL)
//! - FORM_SCHEMA_UNWRITABLE
//!
//! Submitted data never produces a `SchemaError`; violations are reported
//! through [`super::ValidationErrors`] instead.

use thiserror::Error;

/// Errors raised while loading or saving a form schema. Load errors stop
/// startup.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Schema file could not be read
    #[error("Failed to read schema file '{path}': {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Schema file could not be written
    #[error("Failed to write schema file '{path}': {source}")]
    Unwritable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Schema file is not valid JSON for the schema model
    #[error("Malformed schema file '{path}': {reason}")]
    Malformed { path: String, reason: String },

    /// Schema parsed but breaks a structural rule
    #[error("Invalid schema '{path}': {reason}")]
    Invalid { path: String, reason: String },
}

impl SchemaError {
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Returns the string code for this error
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::Unreadable { .. } => "FORM_SCHEMA_UNREADABLE",
            SchemaError::Unwritable { .. } => "FORM_SCHEMA_UNWRITABLE",
            SchemaError::Malformed { .. } => "FORM_SCHEMA_MALFORMED",
            SchemaError::Invalid { .. } => "FORM_SCHEMA_INVALID",
        }
    }
}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
