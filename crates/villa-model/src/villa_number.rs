//! Villa number transport shapes.
//!
//! # Purpose
//! Read, create, and update shapes for numbered units within a villa. The
//! villa number is the natural key; `villa_id` names the owning villa.
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VillaNumberDto {
    pub villa_no: i32,
    #[serde(rename = "villaID", alias = "villaId")]
    pub villa_id: i32,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub special_details: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VillaNumberCreateDto {
    pub villa_no: i32,
    #[serde(rename = "villaID", alias = "villaId")]
    pub villa_id: i32,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub special_details: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VillaNumberUpdateDto {
    pub villa_no: i32,
    #[serde(rename = "villaID", alias = "villaId")]
    pub villa_id: i32,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub special_details: Option<String>,
}
