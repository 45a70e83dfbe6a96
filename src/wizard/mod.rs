//! Headless wizard client
//!
//! Drives a user through the form step by step: per-step mirrored
//! validation with the shared rule engine, custom-input overrides, draft
//! persistence, stale school-fetch protection and recovery from schema
//! drift reported by the server. Rendering is left to the embedding UI.

mod draft;
mod schools;
mod session;

pub use draft::{
    DraftError, DraftResult, DraftStore, FileDraftStore, MemoryDraftStore, CUSTOM_TEXT_KEY,
    DRAFT_KEY,
};
pub use schools::{SchoolRequests, SchoolTicket};
pub use session::{StepOutcome, SubmitFollowUp, WizardSession};
