//! Wizard session state machine
//!
//! Walks the schema one step at a time. Each step submission is checked
//! with the same validator the server uses, scoped to the fields of the
//! displayed step; the session never advances past a step with errors.
//! The final step hands the full answer set back to the caller for the
//! authoritative submission, whose response is fed back through
//! [`WizardSession::apply_submit_response`].

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use super::draft::{DraftResult, DraftStore, CUSTOM_TEXT_KEY};
use super::schools::{SchoolRequests, SchoolTicket};
use crate::reference::School;
use crate::schema::{
    check_rules, FieldKind, FormSchema, ReferenceSource, SchemaValidator, StepSpec,
    SubmittedData, ValidationErrors, ValidationPolicy, CUSTOM_SENTINEL,
};
use crate::service::SubmitResponse;

/// Result of submitting the displayed step.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// Step passed; the session moved to this step index
    Advanced(usize),
    /// Last step passed; send these answers to the server
    ReadyToSubmit(SubmittedData),
    /// Step has errors; the session stays put
    Blocked(ValidationErrors),
}

/// What the caller should do after the server answered a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitFollowUp {
    /// Submission accepted, draft cleared
    Completed { message: String },
    /// Fix the errors; the session moved to the first step carrying one
    Fix {
        step: usize,
        errors: ValidationErrors,
    },
    /// The server reported props this schema does not know; refetch the
    /// schema and call [`WizardSession::replace_schema`]
    RefreshSchema { errors: ValidationErrors },
}

/// One user's pass through the form.
pub struct WizardSession {
    schema: Arc<FormSchema>,
    policy: ValidationPolicy,
    step: usize,
    answers: SubmittedData,
    custom_text: BTreeMap<String, String>,
    schools: Vec<School>,
    school_requests: SchoolRequests,
    errors: ValidationErrors,
    completed: Option<String>,
    drafts: Box<dyn DraftStore>,
}

impl WizardSession {
    /// Starts a session, restoring a saved draft if there is one.
    pub fn new(
        schema: Arc<FormSchema>,
        policy: ValidationPolicy,
        drafts: Box<dyn DraftStore>,
    ) -> DraftResult<Self> {
        let mut answers = drafts.load()?.unwrap_or_default();
        let custom_text = take_custom_text(&mut answers);
        if !answers.is_empty() {
            debug!(
                fields = answers.len(),
                custom = custom_text.len(),
                "restored wizard draft"
            );
        }

        Ok(Self {
            schema,
            policy,
            step: 0,
            answers,
            custom_text,
            schools: Vec::new(),
            school_requests: SchoolRequests::new(),
            errors: ValidationErrors::new(),
            completed: None,
            drafts,
        })
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn step_index(&self) -> usize {
        self.step
    }

    pub fn step_count(&self) -> usize {
        self.schema.step_count()
    }

    pub fn current_step(&self) -> Option<&StepSpec> {
        self.schema.step(self.step)
    }

    pub fn is_last_step(&self) -> bool {
        self.schema.is_last_step(self.step)
    }

    pub fn answers(&self) -> &SubmittedData {
        &self.answers
    }

    /// Errors from the last step check or server response.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn is_completed(&self) -> bool {
        self.completed.is_some()
    }

    pub fn success_message(&self) -> Option<&str> {
        self.completed.as_deref()
    }

    pub fn set_answer(&mut self, prop: impl Into<String>, value: Value) {
        self.answers.insert(prop.into(), value);
    }

    /// Free text for a select field switched to its custom option.
    pub fn set_custom_text(&mut self, prop: impl Into<String>, text: impl Into<String>) {
        self.custom_text.insert(prop.into(), text.into());
    }

    /// Moves one step back; answers are kept.
    pub fn go_back(&mut self) -> usize {
        self.step = self.step.saturating_sub(1);
        self.step
    }

    /// The currently selected city, if any.
    pub fn selected_city(&self) -> Option<&str> {
        let prop = self.prop_for(ReferenceSource::Cities)?;
        self.answers.get(&prop).and_then(Value::as_str)
    }

    /// Selects a city. The school answer and school list are reset and a
    /// ticket for the new school fetch is returned.
    pub fn select_city(&mut self, city_id: impl Into<String>) -> SchoolTicket {
        let city_id = city_id.into();

        if let Some(prop) = self.prop_for(ReferenceSource::Cities) {
            self.answers.insert(prop, Value::String(city_id.clone()));
        }
        if let Some(prop) = self.prop_for(ReferenceSource::Schools) {
            self.answers.remove(&prop);
            self.custom_text.remove(&prop);
        }
        self.schools.clear();

        self.school_requests.begin(city_id)
    }

    /// Handle for tasks that fetch schools and want to check staleness.
    pub fn school_requests(&self) -> SchoolRequests {
        self.school_requests.clone()
    }

    /// Applies a school list if `ticket` is still the latest selection.
    pub fn accept_schools(&mut self, ticket: &SchoolTicket, schools: Vec<School>) -> bool {
        if !self.school_requests.is_current(ticket) {
            debug!(
                city_id = ticket.city_id(),
                generation = ticket.generation(),
                "dropping stale school list"
            );
            return false;
        }
        self.schools = schools;
        true
    }

    pub fn schools(&self) -> &[School] {
        &self.schools
    }

    /// Merges the displayed step's values and checks that step.
    pub fn submit_step(&mut self, values: SubmittedData) -> DraftResult<StepOutcome> {
        self.answers.extend(values);

        let (resolved, mut errors) = self.resolve_custom_inputs();
        let validator = SchemaValidator::new(&self.schema, &self.policy);
        for (prop, message) in validator.validate_step(self.step, &resolved).iter() {
            errors.record(prop, message);
        }

        if !errors.is_empty() {
            self.errors = errors.clone();
            return Ok(StepOutcome::Blocked(errors));
        }

        self.errors = ValidationErrors::new();
        self.drafts.save(&self.draft())?;

        if self.is_last_step() {
            return Ok(StepOutcome::ReadyToSubmit(resolved));
        }

        self.step += 1;
        Ok(StepOutcome::Advanced(self.step))
    }

    /// Feeds the server's answer to a final submission back in.
    pub fn apply_submit_response(
        &mut self,
        response: &SubmitResponse,
    ) -> DraftResult<SubmitFollowUp> {
        if response.success {
            self.drafts.clear()?;
            self.errors = ValidationErrors::new();
            let message = response.message.clone().unwrap_or_default();
            self.completed = Some(message.clone());
            return Ok(SubmitFollowUp::Completed { message });
        }

        let errors = response.errors.clone().unwrap_or_default();
        self.errors = errors.clone();

        if errors.props().any(|prop| !self.schema.contains_prop(prop)) {
            warn!(
                failing = errors.len(),
                "server reported fields unknown to the local schema"
            );
            return Ok(SubmitFollowUp::RefreshSchema { errors });
        }

        self.step = self.first_errored_step().unwrap_or(self.step);
        Ok(SubmitFollowUp::Fix {
            step: self.step,
            errors,
        })
    }

    /// Swaps in a freshly fetched schema. Answers for props the new schema
    /// no longer declares are dropped and the session moves to the first
    /// step carrying a pending error, or stays within bounds otherwise.
    pub fn replace_schema(&mut self, schema: Arc<FormSchema>) -> usize {
        self.schema = schema;

        let schema = Arc::clone(&self.schema);
        self.answers.retain(|prop, _| schema.contains_prop(prop));
        self.custom_text.retain(|prop, _| schema.contains_prop(prop));

        let last = self.schema.step_count().saturating_sub(1);
        self.step = self.first_errored_step().unwrap_or(self.step.min(last));
        self.step
    }

    fn first_errored_step(&self) -> Option<usize> {
        self.errors
            .props()
            .filter_map(|prop| self.schema.step_of(prop))
            .min()
    }

    fn prop_for(&self, source: ReferenceSource) -> Option<String> {
        self.schema
            .fields()
            .find(|f| matches!(&f.kind, FieldKind::Select { collection, .. } if *collection == source))
            .map(|f| f.prop.clone())
    }

    /// Answers plus typed custom text, in the shape the draft store keeps.
    fn draft(&self) -> SubmittedData {
        let mut draft = self.answers.clone();
        if !self.custom_text.is_empty() {
            let texts = self
                .custom_text
                .iter()
                .map(|(prop, text)| (prop.clone(), Value::String(text.clone())))
                .collect();
            draft.insert(CUSTOM_TEXT_KEY.to_string(), Value::Object(texts));
        }
        draft
    }

    /// Answers with every custom-input sentinel replaced by the typed text.
    /// Violations are reported for the displayed step only; a field on
    /// another step whose text no longer passes is sent as null so the
    /// server rejects it and the session relocates there.
    fn resolve_custom_inputs(&self) -> (SubmittedData, ValidationErrors) {
        let mut resolved = self.answers.clone();
        let mut errors = ValidationErrors::new();

        for field in self.schema.fields() {
            let Some(custom) = &field.custom_input else {
                continue;
            };
            if self.answers.get(&field.prop).and_then(Value::as_str) != Some(CUSTOM_SENTINEL) {
                continue;
            }

            let text = self
                .custom_text
                .get(&field.prop)
                .map(|t| Value::String(t.clone()));

            match check_rules(&custom.label, custom.validation.as_ref(), text.as_ref()) {
                Some(message) if self.schema.step_of(&field.prop) == Some(self.step) => {
                    errors.record(&field.prop, message);
                }
                Some(_) => {
                    resolved.insert(field.prop.clone(), Value::Null);
                }
                None => {
                    resolved.insert(field.prop.clone(), text.unwrap_or(Value::Null));
                }
            }
        }

        (resolved, errors)
    }
}

/// Pulls the custom-text entry back out of a restored draft.
fn take_custom_text(answers: &mut SubmittedData) -> BTreeMap<String, String> {
    match answers.remove(CUSTOM_TEXT_KEY) {
        Some(Value::Object(texts)) => texts
            .into_iter()
            .filter_map(|(prop, text)| match text {
                Value::String(text) => Some((prop, text)),
                _ => None,
            })
            .collect(),
        _ => BTreeMap::new(),
    }
}
