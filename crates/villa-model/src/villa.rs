//! Villa transport shapes.
//!
//! # Purpose
//! Read, create, and update shapes for villa listings. Each shape lists exactly
//! the fields a caller may see or set for that operation.
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VillaDto {
    pub id: i32,
    pub name: String,
    pub sqft: i32,
    pub occupancy: i32,
    pub rate: f64,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub amenity: String,
}

/// Body of a villa create request.
///
/// `id` is accepted only so that callers who send one can be rejected; the
/// store assigns identities.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VillaCreateDto {
    #[serde(default)]
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub sqft: i32,
    #[serde(default)]
    pub occupancy: i32,
    #[serde(default)]
    pub rate: f64,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub amenity: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VillaUpdateDto {
    pub id: i32,
    pub name: String,
    pub sqft: i32,
    pub occupancy: i32,
    pub rate: f64,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub amenity: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn villa_shapes_use_camel_case_on_the_wire() {
        let dto = VillaDto {
            id: 3,
            name: "Royal".to_string(),
            sqft: 550,
            occupancy: 4,
            rate: 200.0,
            details: "Ocean view".to_string(),
            image_url: "https://img/royal.jpg".to_string(),
            amenity: "Pool".to_string(),
        };
        let json = serde_json::to_value(&dto).expect("serialize");
        assert_eq!(json["imageUrl"], "https://img/royal.jpg");
        assert!(json.get("image_url").is_none());
    }

    #[test]
    fn create_shape_defaults_missing_id_to_zero() {
        let dto: VillaCreateDto = serde_json::from_value(serde_json::json!({
            "name": "Seaside",
            "sqft": 1200,
            "occupancy": 4,
            "rate": 150.0
        }))
        .expect("deserialize");
        assert_eq!(dto.id, 0);
        assert_eq!(dto.details, "");
    }
}
