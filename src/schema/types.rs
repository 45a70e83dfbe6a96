//! Form schema type definitions
//!
//! A form is an ordered list of steps, each step an ordered list of fields.
//! The JSON layout matches what `GET /api/form` serves:
//!
//! ```json
//! [
//!   { "title": "About you", "fields": [
//!       { "prop": "email", "label": "Email", "type": "input", "subType": "email",
//!         "validation": { "required": true, "type": "email" } }
//!   ] }
//! ]
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Value a select field holds when the user opts into free-text entry.
pub const CUSTOM_SENTINEL: &str = "custom";

/// Primitive a field value is expected to have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpectedType {
    String,
    Number,
    Email,
    Boolean,
}

impl ExpectedType {
    /// Returns the type name as written in schema files
    pub fn type_name(&self) -> &'static str {
        match self {
            ExpectedType::String => "string",
            ExpectedType::Number => "number",
            ExpectedType::Email => "email",
            ExpectedType::Boolean => "boolean",
        }
    }
}

/// Flavour of a free-text input control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    #[default]
    Text,
    Number,
    Email,
}

/// Reference data a select field draws its options from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceSource {
    /// All cities
    Cities,
    /// Schools of the currently selected city
    Schools,
}

/// Control kind of a field, tagged by `type` in the schema file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    Input {
        #[serde(rename = "subType", default)]
        sub_type: InputKind,
    },
    Select {
        collection: ReferenceSource,
        /// Label of the extra option that switches to custom input
        #[serde(
            rename = "customInputOption",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        custom_input_option: Option<String>,
    },
    Checkbox,
}

impl FieldKind {
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldKind::Input { sub_type } => match sub_type {
                InputKind::Text => "text-input",
                InputKind::Number => "numeric-input",
                InputKind::Email => "email-input",
            },
            FieldKind::Select { .. } => "single-select",
            FieldKind::Checkbox => "checkbox",
        }
    }
}

/// Rule set attached to a field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRules {
    /// Value must be present and non-empty
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    /// Expected primitive of the value
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<ExpectedType>,
    /// Minimum character count for string values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    /// Numeric floor for number values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Allow-list for boolean fields (`[true]` means "must be checked")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_values: Option<Vec<Value>>,
}

impl ValidationRules {
    pub fn required() -> Self {
        Self {
            required: true,
            ..Default::default()
        }
    }

    pub fn with_type(mut self, expected: ExpectedType) -> Self {
        self.expected = Some(expected);
        self
    }

    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = Some(min_length);
        self
    }

    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn with_valid_values(mut self, values: Vec<Value>) -> Self {
        self.valid_values = Some(values);
        self
    }
}

/// Free-text override of a select field, active when the select holds
/// [`CUSTOM_SENTINEL`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomInput {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationRules>,
}

/// One form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Key of the value in submitted data
    pub prop: String,
    /// Human-readable name used in error messages
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(flatten)]
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationRules>,
    #[serde(
        rename = "customInput",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub custom_input: Option<CustomInput>,
}

impl FieldSpec {
    fn new(prop: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            prop: prop.into(),
            label: label.into(),
            placeholder: None,
            kind,
            validation: None,
            custom_input: None,
        }
    }

    /// Create a text input field
    pub fn text(prop: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(prop, label, FieldKind::Input { sub_type: InputKind::Text })
    }

    /// Create a numeric input field
    pub fn number(prop: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(prop, label, FieldKind::Input { sub_type: InputKind::Number })
    }

    /// Create an email input field
    pub fn email(prop: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(prop, label, FieldKind::Input { sub_type: InputKind::Email })
    }

    /// Create a select field backed by reference data
    pub fn select(
        prop: impl Into<String>,
        label: impl Into<String>,
        collection: ReferenceSource,
    ) -> Self {
        Self::new(
            prop,
            label,
            FieldKind::Select {
                collection,
                custom_input_option: None,
            },
        )
    }

    /// Create a checkbox field
    pub fn checkbox(prop: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(prop, label, FieldKind::Checkbox)
    }

    pub fn with_validation(mut self, rules: ValidationRules) -> Self {
        self.validation = Some(rules);
        self
    }

    pub fn with_custom_input(mut self, option_label: impl Into<String>, custom: CustomInput) -> Self {
        if let FieldKind::Select {
            custom_input_option,
            ..
        } = &mut self.kind
        {
            *custom_input_option = Some(option_label.into());
        }
        self.custom_input = Some(custom);
        self
    }

    /// Whether the field must be present and non-empty
    pub fn is_required(&self) -> bool {
        self.validation.as_ref().is_some_and(|v| v.required)
    }
}

/// One screen of the wizard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepSpec {
    pub title: String,
    pub fields: Vec<FieldSpec>,
}

impl StepSpec {
    pub fn new(title: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        Self {
            title: title.into(),
            fields,
        }
    }

    /// Returns true if any field of this step has the given prop
    pub fn contains_prop(&self, prop: &str) -> bool {
        self.fields.iter().any(|f| f.prop == prop)
    }
}

/// Complete form schema. Step order is the wizard order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormSchema {
    steps: Vec<StepSpec>,
}

impl FormSchema {
    pub fn new(steps: Vec<StepSpec>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[StepSpec] {
        &self.steps
    }

    pub fn step(&self, index: usize) -> Option<&StepSpec> {
        self.steps.get(index)
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// True if `index` is the final step
    pub fn is_last_step(&self, index: usize) -> bool {
        !self.steps.is_empty() && index + 1 == self.steps.len()
    }

    /// All fields across every step, in schema order
    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.steps.iter().flat_map(|s| s.fields.iter())
    }

    pub fn field(&self, prop: &str) -> Option<&FieldSpec> {
        self.fields().find(|f| f.prop == prop)
    }

    pub fn contains_prop(&self, prop: &str) -> bool {
        self.field(prop).is_some()
    }

    /// Index of the step declaring `prop`
    pub fn step_of(&self, prop: &str) -> Option<usize> {
        self.steps.iter().position(|s| s.contains_prop(prop))
    }

    /// Checks the schema structure itself (not submitted data).
    pub fn validate_structure(&self) -> Result<(), String> {
        if self.steps.is_empty() {
            return Err("Form must define at least one step".into());
        }

        let mut seen = std::collections::HashSet::new();
        for (i, step) in self.steps.iter().enumerate() {
            if step.fields.is_empty() {
                return Err(format!("Step {} ('{}') has no fields", i, step.title));
            }
            for field in &step.fields {
                if field.prop.is_empty() {
                    return Err(format!("Step {} has a field with an empty prop", i));
                }
                if !seen.insert(field.prop.as_str()) {
                    return Err(format!("Duplicate field prop '{}'", field.prop));
                }
            }
        }

        Ok(())
    }
}
