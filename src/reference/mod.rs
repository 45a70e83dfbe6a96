//! Reference data: cities and their schools
//!
//! Static lookup tables loaded once from the data directory. They feed the
//! select fields of the form but are not subject to the validation engine.

mod errors;
mod store;
mod types;

pub use errors::{ReferenceError, ReferenceResult};
pub use store::{ReferenceStore, CITIES_FILE, SCHOOLS_FILE};
pub use types::{City, School};
