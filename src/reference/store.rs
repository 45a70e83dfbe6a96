//! In-memory reference data store
//!
//! Files (inside the data directory):
//! - `cities.json`: `[{ "id": "1", "name": "..." }]`
//! - `schools.json`: `[{ "id": "10", "name": "...", "cityId": "1" }]`
//!
//! Lookups preserve file order. Unknown city ids yield an empty list.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::debug;

use super::errors::{ReferenceError, ReferenceResult};
use super::types::{City, School};

pub const CITIES_FILE: &str = "cities.json";
pub const SCHOOLS_FILE: &str = "schools.json";

/// Immutable cities and schools.
#[derive(Debug, Clone, Default)]
pub struct ReferenceStore {
    cities: Vec<City>,
    schools: Vec<School>,
}

impl ReferenceStore {
    /// Builds a store from in-memory lists, rejecting duplicate ids.
    pub fn new(cities: Vec<City>, schools: Vec<School>) -> ReferenceResult<Self> {
        check_unique("city", cities.iter().map(|c| c.id.as_str()))?;
        check_unique("school", schools.iter().map(|s| s.id.as_str()))?;
        Ok(Self { cities, schools })
    }

    /// Loads `cities.json` and `schools.json` from `data_dir`.
    pub fn load(data_dir: &Path) -> ReferenceResult<Self> {
        let cities: Vec<City> = read_json(&data_dir.join(CITIES_FILE))?;
        let schools: Vec<School> = read_json(&data_dir.join(SCHOOLS_FILE))?;

        debug!(
            cities = cities.len(),
            schools = schools.len(),
            "reference data loaded"
        );

        Self::new(cities, schools)
    }

    /// All cities, in file order.
    pub fn list_cities(&self) -> &[City] {
        &self.cities
    }

    /// Schools of one city, in file order. Unknown city → empty.
    pub fn list_schools(&self, city_id: &str) -> Vec<School> {
        self.schools
            .iter()
            .filter(|s| s.city_id == city_id)
            .cloned()
            .collect()
    }

    pub fn city(&self, id: &str) -> Option<&City> {
        self.cities.iter().find(|c| c.id == id)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> ReferenceResult<T> {
    let display = path.display().to_string();
    let content = fs::read_to_string(path).map_err(|source| ReferenceError::Unreadable {
        path: display.clone(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ReferenceError::Malformed {
        path: display,
        source,
    })
}

fn check_unique<'a>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> ReferenceResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ReferenceError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_store() -> ReferenceStore {
        ReferenceStore::new(
            vec![City::new("1", "Springfield"), City::new("2", "Shelbyville")],
            vec![
                School::new("10", "Springfield Elementary", "1"),
                School::new("20", "Shelbyville High", "2"),
                School::new("11", "West Springfield Academy", "1"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_schools_filtered_by_city_in_order() {
        let store = sample_store();
        let ids: Vec<_> = store
            .list_schools("1")
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec!["10", "11"]);
    }

    #[test]
    fn test_unknown_city_yields_empty() {
        assert!(sample_store().list_schools("99").is_empty());
        assert!(sample_store().list_schools("").is_empty());
    }

    #[test]
    fn test_duplicate_city_id_rejected() {
        let result = ReferenceStore::new(
            vec![City::new("1", "A"), City::new("1", "B")],
            vec![],
        );
        assert!(matches!(
            result,
            Err(ReferenceError::DuplicateId { kind: "city", .. })
        ));
    }

    #[test]
    fn test_load_from_directory() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(CITIES_FILE),
            r#"[{"id":"1","name":"Springfield"}]"#,
        )
        .unwrap();
        fs::write(
            temp_dir.path().join(SCHOOLS_FILE),
            r#"[{"id":"10","name":"Springfield Elementary","cityId":"1"}]"#,
        )
        .unwrap();

        let store = ReferenceStore::load(temp_dir.path()).unwrap();
        assert_eq!(store.list_cities().len(), 1);
        assert_eq!(store.city("1").unwrap().name, "Springfield");
        assert_eq!(store.list_schools("1")[0].name, "Springfield Elementary");
    }

    #[test]
    fn test_load_missing_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let result = ReferenceStore::load(temp_dir.path());
        assert!(matches!(result, Err(ReferenceError::Unreadable { .. })));
    }
}
