//! Storage abstraction for villas and villa numbers.
//!
//! # Purpose
//! Handlers talk to persistence only through [`VillaStore`]. Every operation
//! returns a [`StoreResult`], so expected outcomes (missing rows, constraint
//! conflicts) and unexpected faults are ordinary values rather than panics.
use crate::model::{Villa, VillaNumber};
use async_trait::async_trait;
use thiserror::Error;

pub mod memory;
pub mod postgres;
#[cfg(test)]
mod postgres_tests;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Unexpected(err.into())
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::Unexpected(err.into())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait VillaStore: Send + Sync {
    async fn list_villas(&self) -> StoreResult<Vec<Villa>>;
    async fn get_villa(&self, id: i32) -> StoreResult<Villa>;
    /// Case-insensitive exact match on the villa name.
    async fn find_villa_by_name(&self, name: &str) -> StoreResult<Option<Villa>>;
    async fn villa_exists(&self, id: i32) -> StoreResult<bool>;
    /// Persist a new villa; the store assigns `id` and ignores the incoming one.
    async fn create_villa(&self, villa: Villa) -> StoreResult<Villa>;
    /// Replace the mutable fields of an existing villa. `created_at` is kept.
    async fn update_villa(&self, villa: Villa) -> StoreResult<Villa>;
    async fn delete_villa(&self, id: i32) -> StoreResult<()>;

    async fn list_villa_numbers(&self) -> StoreResult<Vec<VillaNumber>>;
    async fn get_villa_number(&self, villa_no: i32) -> StoreResult<VillaNumber>;
    async fn villa_number_exists(&self, villa_no: i32) -> StoreResult<bool>;
    async fn create_villa_number(&self, number: VillaNumber) -> StoreResult<VillaNumber>;
    async fn update_villa_number(&self, number: VillaNumber) -> StoreResult<VillaNumber>;
    async fn delete_villa_number(&self, villa_no: i32) -> StoreResult<()>;

    async fn health_check(&self) -> StoreResult<()>;
    fn is_durable(&self) -> bool;
    fn backend_name(&self) -> &'static str;
}
