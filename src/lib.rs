//! formwizard - schema-driven multi-step form wizard backend
//!
//! A declarative form schema (ordered steps of typed, rule-bearing fields)
//! drives both rendering and validation. The server validates submissions
//! authoritatively; the wizard client mirrors the same rules per step.

pub mod cli;
pub mod http_server;
pub mod observability;
pub mod reference;
pub mod schema;
pub mod service;
pub mod wizard;
