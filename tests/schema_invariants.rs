//! Schema Validation Invariant Tests
//!
//! - Empty result iff every field passes
//! - Validation is deterministic and pure
//! - One message per failing field, required wins over everything else
//! - `school` accepts any string or number
//! - Unexpected keys are reported only in strict mode

use formwizard::schema::{
    ExpectedType, FieldSpec, FormSchema, SchemaLoader, SchemaValidator, StepSpec, SubmittedData,
    UnexpectedFieldPolicy, ValidationPolicy, ValidationRules,
};
use serde_json::{json, Value};
use std::path::Path;

// =============================================================================
// Helper Functions
// =============================================================================

fn data(value: Value) -> SubmittedData {
    value.as_object().cloned().unwrap()
}

fn email_schema() -> FormSchema {
    FormSchema::new(vec![StepSpec::new(
        "Contact",
        vec![FieldSpec::email("email", "Email")
            .with_validation(ValidationRules::required().with_type(ExpectedType::Email))],
    )])
}

fn shipped_schema() -> FormSchema {
    let data_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
    SchemaLoader::new(&data_dir).load().unwrap()
}

fn valid_submission() -> Value {
    json!({
        "name": "Alice Liddell",
        "email": "alice@example.com",
        "age": 21,
        "city": "1",
        "school": "102",
        "terms": true
    })
}

fn validate(schema: &FormSchema, value: Value) -> Vec<(String, String)> {
    let policy = ValidationPolicy::default();
    SchemaValidator::new(schema, &policy)
        .validate(&data(value))
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// =============================================================================
// Reference Scenarios
// =============================================================================

#[test]
fn test_missing_required_email() {
    assert_eq!(
        validate(&email_schema(), json!({})),
        vec![("email".to_string(), "Email is required.".to_string())]
    );
}

#[test]
fn test_malformed_email() {
    assert_eq!(
        validate(&email_schema(), json!({ "email": "not-an-email" })),
        vec![(
            "email".to_string(),
            "Email is not a valid email address.".to_string()
        )]
    );
}

#[test]
fn test_well_formed_email() {
    assert!(validate(&email_schema(), json!({ "email": "a@b.com" })).is_empty());
}

#[test]
fn test_age_below_minimum() {
    let schema = FormSchema::new(vec![StepSpec::new(
        "Age",
        vec![FieldSpec::number("age", "Age").with_validation(
            ValidationRules::default()
                .with_type(ExpectedType::Number)
                .with_min(18.0),
        )],
    )]);
    assert_eq!(
        validate(&schema, json!({ "age": 12 })),
        vec![("age".to_string(), "Age must be at least 18.".to_string())]
    );
}

// =============================================================================
// Shipped Form Tests
// =============================================================================

#[test]
fn test_shipped_form_accepts_complete_submission() {
    assert!(validate(&shipped_schema(), valid_submission()).is_empty());
}

#[test]
fn test_shipped_form_reports_every_failing_field_once() {
    let errors = validate(
        &shipped_schema(),
        json!({
            "name": "Al",
            "email": "alice",
            "age": "twenty",
            "school": true,
            "terms": false
        }),
    );

    assert_eq!(
        errors,
        vec![
            (
                "age".to_string(),
                "Age must be a number.".to_string()
            ),
            ("city".to_string(), "City is required.".to_string()),
            (
                "email".to_string(),
                "Email is not a valid email address.".to_string()
            ),
            (
                "name".to_string(),
                "Full Name must be at least 3 characters long.".to_string()
            ),
            (
                "school".to_string(),
                "School must be either a string or a number.".to_string()
            ),
            (
                "terms".to_string(),
                "I accept the terms and conditions must be accepted.".to_string()
            ),
        ]
    );
}

#[test]
fn test_errors_only_reference_schema_props_in_lenient_mode() {
    let schema = shipped_schema();
    let errors = validate(&schema, json!({ "unknown": 1, "name": 5 }));
    assert!(!errors.is_empty());
    for (prop, _) in errors {
        assert!(schema.contains_prop(&prop), "unexpected prop {}", prop);
    }
}

#[test]
fn test_custom_school_text_accepted() {
    let mut submission = valid_submission();
    submission["school"] = json!("Evergreen Community School");
    assert!(validate(&shipped_schema(), submission).is_empty());

    let mut submission = valid_submission();
    submission["school"] = json!(102);
    assert!(validate(&shipped_schema(), submission).is_empty());
}

// =============================================================================
// Determinism Tests
// =============================================================================

/// Same data validates the same way every time.
#[test]
fn test_validation_is_deterministic() {
    let schema = shipped_schema();
    let submission = json!({ "name": "", "email": "x", "extra": [1] });
    let first = validate(&schema, submission.clone());

    for _ in 0..100 {
        assert_eq!(validate(&schema, submission.clone()), first);
    }
}

/// Validation leaves schema and data untouched.
#[test]
fn test_validation_does_not_mutate_inputs() {
    let schema = shipped_schema();
    let before_schema = schema.clone();
    let submission = data(json!({ "name": "Al", "extra": true }));
    let before_data = submission.clone();

    let policy = ValidationPolicy::strict();
    let _ = SchemaValidator::new(&schema, &policy).validate(&submission);

    assert_eq!(schema, before_schema);
    assert_eq!(submission, before_data);
}

// =============================================================================
// Unexpected Field Policy Tests
// =============================================================================

#[test]
fn test_unexpected_fields_only_in_strict_mode() {
    let schema = shipped_schema();
    let mut submission = valid_submission();
    submission["nickname"] = json!("Al");

    let lenient = ValidationPolicy::default();
    assert_eq!(lenient.unexpected_fields, UnexpectedFieldPolicy::Lenient);
    assert!(SchemaValidator::new(&schema, &lenient)
        .validate(&data(submission.clone()))
        .is_empty());

    let strict = ValidationPolicy::strict();
    let errors = SchemaValidator::new(&schema, &strict).validate(&data(submission));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.get("nickname"), Some("Unexpected field: nickname"));
}
