//! Reference data errors. Any of these at startup is fatal.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("Failed to read reference file '{path}': {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed reference file '{path}': {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Duplicate {kind} id '{id}'")]
    DuplicateId { kind: &'static str, id: String },
}

pub type ReferenceResult<T> = Result<T, ReferenceError>;
