//! Villa entity.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A rental property record as persisted.
///
/// `id` is assigned by the store; a value of 0 means "not yet persisted".
/// Names are unique among villas, compared case-insensitively.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Villa {
    pub id: i32,
    pub name: String,
    pub sqft: i32,
    pub occupancy: i32,
    pub rate: f64,
    pub details: String,
    pub image_url: String,
    pub amenity: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Villa {
    pub fn same_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}
