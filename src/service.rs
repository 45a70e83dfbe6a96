//! Form service
//!
//! Owns everything the HTTP handlers and the CLI need: the immutable form
//! schema, the reference data and the validation policy. It is constructed
//! explicitly (`load` for a data directory, `new` for fixtures) and shared
//! behind an `Arc`; nothing here is mutated after construction.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::reference::{City, ReferenceError, ReferenceStore, School};
use crate::schema::{
    FormSchema, SchemaError, SchemaLoader, SchemaValidator, SubmittedData, ValidationErrors,
    ValidationPolicy,
};

/// Message returned with a successful submission.
pub const SUCCESS_MESSAGE: &str = "Form validated successfully.";

/// Startup failures. Both are fatal to the serving layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Reference(#[from] ReferenceError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Body of a `/api/submit` response, in both directions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationErrors>,
}

impl SubmitResponse {
    pub fn accepted(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            errors: None,
        }
    }

    pub fn rejected(errors: ValidationErrors) -> Self {
        Self {
            success: false,
            message: None,
            errors: Some(errors),
        }
    }
}

/// Schema, reference data and policy, loaded once.
#[derive(Debug)]
pub struct FormService {
    schema: Arc<FormSchema>,
    references: ReferenceStore,
    policy: ValidationPolicy,
}

impl FormService {
    pub fn new(schema: FormSchema, references: ReferenceStore, policy: ValidationPolicy) -> Self {
        Self {
            schema: Arc::new(schema),
            references,
            policy,
        }
    }

    /// Loads `form.json`, `cities.json` and `schools.json` from `data_dir`.
    pub fn load(data_dir: &Path, policy: ValidationPolicy) -> ServiceResult<Self> {
        let schema = SchemaLoader::new(data_dir).load()?;
        let references = ReferenceStore::load(data_dir)?;

        info!(
            data_dir = %data_dir.display(),
            steps = schema.step_count(),
            cities = references.list_cities().len(),
            unexpected_fields = ?policy.unexpected_fields,
            "form service loaded"
        );

        Ok(Self::new(schema, references, policy))
    }

    pub fn form(&self) -> &FormSchema {
        &self.schema
    }

    /// Shared handle to the schema, for wizard sessions.
    pub fn schema_handle(&self) -> Arc<FormSchema> {
        Arc::clone(&self.schema)
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    pub fn cities(&self) -> &[City] {
        self.references.list_cities()
    }

    pub fn schools(&self, city_id: &str) -> Vec<School> {
        self.references.list_schools(city_id)
    }

    pub fn validator(&self) -> SchemaValidator<'_> {
        SchemaValidator::new(&self.schema, &self.policy)
    }

    /// Runs the authoritative validation over a submission.
    pub fn submit(&self, data: &SubmittedData) -> SubmitResponse {
        debug!(data = ?data, "received form data");

        let errors = self.validator().validate(data);
        if errors.is_empty() {
            info!(fields = data.len(), "form submission accepted");
            SubmitResponse::accepted(SUCCESS_MESSAGE)
        } else {
            info!(
                fields = data.len(),
                failing = errors.len(),
                "form submission rejected"
            );
            SubmitResponse::rejected(errors)
        }
    }
}
