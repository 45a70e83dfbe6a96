//! Schema loader
//!
//! The form schema lives in `<data_dir>/form.json`. It is read once at
//! startup, checked structurally and then shared read-only. A missing or
//! malformed file is fatal.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::errors::{SchemaError, SchemaResult};
use super::types::FormSchema;

/// File name of the form schema inside the data directory.
pub const SCHEMA_FILE: &str = "form.json";

/// Reads the form schema from a data directory.
pub struct SchemaLoader {
    schema_path: PathBuf,
}

impl SchemaLoader {
    /// Creates a loader for `<data_dir>/form.json`.
    pub fn new(data_dir: &Path) -> Self {
        Self {
            schema_path: data_dir.join(SCHEMA_FILE),
        }
    }

    /// Creates a loader for an explicit schema file.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            schema_path: path.into(),
        }
    }

    pub fn schema_path(&self) -> &Path {
        &self.schema_path
    }

    /// Loads and checks the schema.
    pub fn load(&self) -> SchemaResult<FormSchema> {
        let path = self.schema_path.display().to_string();

        let content = fs::read_to_string(&self.schema_path).map_err(|source| {
            SchemaError::Unreadable {
                path: path.clone(),
                source,
            }
        })?;

        let schema = Self::parse(&path, &content)?;
        debug!(
            path = %path,
            steps = schema.step_count(),
            fields = schema.fields().count(),
            "form schema loaded"
        );
        Ok(schema)
    }

    /// Parses schema JSON; `origin` is only used in error messages.
    pub fn parse(origin: &str, content: &str) -> SchemaResult<FormSchema> {
        let schema: FormSchema = serde_json::from_str(content)
            .map_err(|e| SchemaError::malformed(origin, format!("Invalid JSON: {}", e)))?;

        schema
            .validate_structure()
            .map_err(|reason| SchemaError::invalid(origin, reason))?;

        Ok(schema)
    }

    /// Writes a schema to the loader's path, pretty-printed.
    pub fn save(&self, schema: &FormSchema) -> SchemaResult<()> {
        let path = self.schema_path.display().to_string();

        let content = serde_json::to_string_pretty(schema)
            .map_err(|e| SchemaError::malformed(&path, format!("Failed to serialize: {}", e)))?;

        if let Some(parent) = self.schema_path.parent() {
            fs::create_dir_all(parent).map_err(|source| SchemaError::Unwritable {
                path: parent.display().to_string(),
                source,
            })?;
        }

        fs::write(&self.schema_path, content).map_err(|source| SchemaError::Unwritable {
            path,
            source,
        })
    }
}
