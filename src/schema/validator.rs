//! Schema validator for submitted form data
//!
//! Validation semantics:
//! - Every field of every step is checked exactly once, in schema order
//! - At most one message per field; the first violated rule wins
//! - A required violation suppresses every other check for that field
//! - Props listed as loose-typed accept any string or number and skip the
//!   rule set entirely
//! - Undeclared keys are ignored unless the policy is strict
//!
//! The validator never mutates the schema or the data and never fails:
//! absent or wrongly typed values are themselves validation failures.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::types::{ExpectedType, FieldSpec, FormSchema, ValidationRules};

/// Flat mapping from field prop to the submitted value.
pub type SubmittedData = Map<String, Value>;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern compiles"))
}

/// Field prop → single error message. Empty means the data is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, prop: &str) -> Option<&str> {
        self.0.get(prop).map(String::as_str)
    }

    pub fn contains(&self, prop: &str) -> bool {
        self.0.contains_key(prop)
    }

    /// Records a message unless the prop already has one.
    pub fn record(&mut self, prop: impl Into<String>, message: impl Into<String>) {
        self.0.entry(prop.into()).or_insert_with(|| message.into());
    }

    pub fn props(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl From<BTreeMap<String, String>> for ValidationErrors {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

/// What to do with submitted keys the schema does not declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnexpectedFieldPolicy {
    /// Ignore undeclared keys
    #[default]
    Lenient,
    /// Report "Unexpected field: <key>" for each undeclared key
    Strict,
}

/// Knobs of the validator that are not part of the schema itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationPolicy {
    pub unexpected_fields: UnexpectedFieldPolicy,
    /// Props that accept any string or number and skip their rule set.
    ///
    /// Defaults to `school`, whose select can be overridden with free text.
    /// This is a property of the shipped form, not a general rule.
    pub loose_type_props: BTreeSet<String>,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            unexpected_fields: UnexpectedFieldPolicy::Lenient,
            loose_type_props: BTreeSet::from(["school".to_string()]),
        }
    }
}

impl ValidationPolicy {
    /// Default policy with strict unexpected-field rejection
    pub fn strict() -> Self {
        Self {
            unexpected_fields: UnexpectedFieldPolicy::Strict,
            ..Self::default()
        }
    }

    pub fn with_unexpected_fields(mut self, policy: UnexpectedFieldPolicy) -> Self {
        self.unexpected_fields = policy;
        self
    }

    pub fn with_loose_type_props<I, S>(mut self, props: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.loose_type_props = props.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_loose_typed(&self, prop: &str) -> bool {
        self.loose_type_props.contains(prop)
    }
}

/// Validates submitted data against a form schema.
pub struct SchemaValidator<'a> {
    schema: &'a FormSchema,
    policy: &'a ValidationPolicy,
}

impl<'a> SchemaValidator<'a> {
    pub fn new(schema: &'a FormSchema, policy: &'a ValidationPolicy) -> Self {
        Self { schema, policy }
    }

    /// Validates every field of every step.
    pub fn validate(&self, data: &SubmittedData) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        for field in self.schema.fields() {
            if let Some(message) = self.check_field(field, data.get(&field.prop)) {
                errors.record(&field.prop, message);
            }
        }

        if self.policy.unexpected_fields == UnexpectedFieldPolicy::Strict {
            for key in data.keys() {
                if !self.schema.contains_prop(key) {
                    errors.record(key, format!("Unexpected field: {}", key));
                }
            }
        }

        errors
    }

    /// Validates only the fields of one step. Unexpected keys are never
    /// reported here since other steps' answers are legitimately present.
    pub fn validate_step(&self, step_index: usize, data: &SubmittedData) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        if let Some(step) = self.schema.step(step_index) {
            for field in &step.fields {
                if let Some(message) = self.check_field(field, data.get(&field.prop)) {
                    errors.record(&field.prop, message);
                }
            }
        }

        errors
    }

    /// Checks one field's value, returning the first violated rule's message.
    pub fn check_field(&self, field: &FieldSpec, value: Option<&Value>) -> Option<String> {
        if self.policy.is_loose_typed(&field.prop) {
            return match value {
                Some(Value::String(_)) | Some(Value::Number(_)) => None,
                _ => Some(format!(
                    "{} must be either a string or a number.",
                    field.label
                )),
            };
        }

        check_rules(&field.label, field.validation.as_ref(), value)
    }
}

/// Applies a rule set to a single value. Shared by schema fields and
/// custom-input overrides.
pub fn check_rules(
    label: &str,
    rules: Option<&ValidationRules>,
    value: Option<&Value>,
) -> Option<String> {
    let rules = rules?;

    if rules.required && is_blank(value) {
        return Some(format!("{} is required.", label));
    }

    let value = value?;

    if let Some(expected) = rules.expected {
        if let Some(message) = check_type(label, expected, rules, value) {
            return Some(message);
        }
    }

    if let (Some(min_length), Value::String(s)) = (rules.min_length, value) {
        if s.chars().count() < min_length {
            return Some(format!(
                "{} must be at least {} characters long.",
                label, min_length
            ));
        }
    }

    if let (Some(min), Some(n)) = (rules.min, value.as_f64()) {
        if n < min {
            return Some(format!("{} must be at least {}.", label, min));
        }
    }

    None
}

fn check_type(
    label: &str,
    expected: ExpectedType,
    rules: &ValidationRules,
    value: &Value,
) -> Option<String> {
    match expected {
        ExpectedType::String => {
            (!value.is_string()).then(|| format!("{} must be a string.", label))
        }
        ExpectedType::Number => {
            (!value.is_number()).then(|| format!("{} must be a number.", label))
        }
        ExpectedType::Email => {
            let valid = value.as_str().is_some_and(|s| email_regex().is_match(s));
            (!valid).then(|| format!("{} is not a valid email address.", label))
        }
        ExpectedType::Boolean => {
            let allowed = rules
                .valid_values
                .as_ref()
                .map_or(true, |allowed| allowed.contains(value));
            (!allowed).then(|| format!("{} must be accepted.", label))
        }
    }
}

/// Absent, null, or the empty string.
fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}
