//! Reference entity types

use serde::{Deserialize, Serialize};

/// A selectable city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub id: String,
    pub name: String,
}

impl City {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A school, owned by one city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
    pub id: String,
    pub name: String,
    #[serde(rename = "cityId")]
    pub city_id: String,
}

impl School {
    pub fn new(id: impl Into<String>, name: impl Into<String>, city_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            city_id: city_id.into(),
        }
    }
}
