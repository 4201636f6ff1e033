//! Shared villa transport model.
//!
//! # Purpose
//! Defines the wire shapes exchanged between the villa API and its clients:
//! per-operation DTOs, the response envelope used by villa number endpoints,
//! the patch document applied by partial updates, and shape validation.
//!
//! # Notes
//! Persistence entities are not defined here; the service owns them and maps
//! to and from these shapes explicitly.
pub mod envelope;
pub mod mapping;
pub mod patch;
pub mod validation;
mod villa;
mod villa_number;

pub use envelope::{ApiResponse, Empty};
pub use patch::{PatchDocument, PatchError, PatchOperation, apply_patch};
pub use validation::{Validate, ValidationErrors};
pub use villa::{VillaCreateDto, VillaDto, VillaUpdateDto};
pub use villa_number::{VillaNumberCreateDto, VillaNumberDto, VillaNumberUpdateDto};
