//! Form schema subsystem
//!
//! The schema is data, not code: steps of fields, each field carrying a
//! control kind and a declarative rule set. One validator interprets it for
//! both the authoritative server check and the wizard's per-step mirror.
//!
//! # Design Principles
//!
//! - Loaded once, immutable afterwards
//! - Validation is pure and deterministic
//! - One message per failing field, first violated rule wins

mod errors;
mod loader;
mod types;
mod validator;

pub use errors::{SchemaError, SchemaResult};
pub use loader::{SchemaLoader, SCHEMA_FILE};
pub use types::{
    CustomInput, ExpectedType, FieldKind, FieldSpec, FormSchema, InputKind, ReferenceSource,
    StepSpec, ValidationRules, CUSTOM_SENTINEL,
};
pub use validator::{
    check_rules, SchemaValidator, SubmittedData, UnexpectedFieldPolicy, ValidationErrors,
    ValidationPolicy,
};
