//! Persistence entities and their mapping to transport shapes.
//!
//! # Purpose
//! Defines the records the store owns and the explicit per-pair conversions
//! between those records and the shapes in `villa_model`.
mod mapping;
mod villa;
mod villa_number;

pub use villa::Villa;
pub use villa_number::VillaNumber;
