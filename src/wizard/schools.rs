//! Generation guard for school fetches
//!
//! Schools are fetched per selected city. Each new selection bumps the
//! generation; a response is applied only if its ticket still carries the
//! current generation, so a slow response for an older city can never
//! overwrite the list for the newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Proof of which selection a school fetch belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchoolTicket {
    generation: u64,
    city_id: String,
}

impl SchoolTicket {
    pub fn city_id(&self) -> &str {
        &self.city_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Shared generation counter. Clones observe the same counter, so tasks
/// performing the fetch can check staleness themselves.
#[derive(Debug, Clone, Default)]
pub struct SchoolRequests {
    generation: Arc<AtomicU64>,
}

impl SchoolRequests {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fetch for `city_id`, invalidating every earlier ticket.
    pub fn begin(&self, city_id: impl Into<String>) -> SchoolTicket {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        SchoolTicket {
            generation,
            city_id: city_id.into(),
        }
    }

    /// Invalidates outstanding tickets without starting a new fetch.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
    }

    pub fn is_current(&self, ticket: &SchoolTicket) -> bool {
        self.generation.load(Ordering::Acquire) == ticket.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_ticket_invalidates_older() {
        let requests = SchoolRequests::new();
        let first = requests.begin("1");
        let second = requests.begin("2");

        assert!(!requests.is_current(&first));
        assert!(requests.is_current(&second));
        assert_eq!(second.city_id(), "2");
    }

    #[test]
    fn test_cancel_invalidates_outstanding() {
        let requests = SchoolRequests::new();
        let ticket = requests.begin("1");
        requests.cancel();
        assert!(!requests.is_current(&ticket));
    }

    #[test]
    fn test_clones_share_generation() {
        let requests = SchoolRequests::new();
        let handle = requests.clone();
        let ticket = handle.begin("1");
        assert!(requests.is_current(&ticket));
        requests.begin("2");
        assert!(!handle.is_current(&ticket));
    }
}
