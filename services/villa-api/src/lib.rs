//! Villa listing service library crate.
//!
//! # Purpose
//! Exposes the HTTP API surface, configuration, observability wiring, entity
//! model, and storage backends for use by the binary and tests.
//!
//! # Notes
//! Module boundaries mirror the HTTP resources and storage backends.
pub mod api;
pub mod app;
pub mod config;
pub mod model;
pub mod observability;
pub mod store;

#[cfg(test)]
mod test_support;
