//! # Form HTTP Server Module
//!
//! JSON over HTTP, no authentication.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/api/cities`, `/api/schools` - Reference data
//! - `/api/form` - Form schema
//! - `/api/submit` - Submission validation

pub mod config;
pub mod errors;
pub mod form_routes;
pub mod observability_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult};
pub use server::HttpServer;
