//! Villa number entity.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A numbered unit within a villa.
///
/// `villa_no` is the natural key. `villa_id` must name an existing villa when
/// the record is created or updated; the API layer checks this, not the store.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct VillaNumber {
    pub villa_no: i32,
    pub villa_id: i32,
    pub details: String,
    pub special_details: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
