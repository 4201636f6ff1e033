//! Shape validation and validation error bodies.
//!
//! # Purpose
//! Collects field-keyed validation messages in the `{ "key": ["message"] }`
//! form returned with 400 responses, and checks the constraints each create
//! and update shape carries.
use crate::villa::{VillaCreateDto, VillaUpdateDto};
use crate::villa_number::{VillaNumberCreateDto, VillaNumberUpdateDto};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

pub const NAME_MAX_LEN: usize = 30;

/// Field-keyed validation messages.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(key: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(key, message);
        errors
    }

    pub fn add(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.0.entry(key.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.0.get(key).map(Vec::as_slice)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

fn check_name(name: &str, errors: &mut ValidationErrors) {
    if name.trim().is_empty() {
        errors.add("name", "The Name field is required.");
    } else if name.chars().count() > NAME_MAX_LEN {
        errors.add(
            "name",
            format!("The Name field must be at most {NAME_MAX_LEN} characters."),
        );
    }
}

fn check_villa_no(villa_no: i32, errors: &mut ValidationErrors) {
    if villa_no <= 0 {
        errors.add("villaNo", "The VillaNo field must be a positive number.");
    }
}

impl Validate for VillaCreateDto {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_name(&self.name, &mut errors);
        errors.into_result()
    }
}

impl Validate for VillaUpdateDto {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_name(&self.name, &mut errors);
        errors.into_result()
    }
}

impl Validate for VillaNumberCreateDto {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_villa_no(self.villa_no, &mut errors);
        errors.into_result()
    }
}

impl Validate for VillaNumberUpdateDto {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_villa_no(self.villa_no, &mut errors);
        errors.into_result()
    }
}
