#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Arc;
use villa_api::app::{AppState, build_router};
use villa_api::model::{Villa, VillaNumber};
use villa_api::store::memory::InMemoryStore;
use villa_api::store::{StoreResult, VillaStore};

pub type TestApp = axum::routing::RouterIntoService<axum::body::Body, ()>;

pub fn memory_app() -> TestApp {
    build_router(AppState::new(Arc::new(InMemoryStore::new()))).into_service()
}

/// Lookups never see existing rows, so duplicates reach the write and are
/// rejected there, as when two creates race past the read check.
pub struct StaleLookupStore {
    inner: InMemoryStore,
}

#[async_trait]
impl VillaStore for StaleLookupStore {
    async fn list_villas(&self) -> StoreResult<Vec<Villa>> {
        self.inner.list_villas().await
    }
    async fn get_villa(&self, id: i32) -> StoreResult<Villa> {
        self.inner.get_villa(id).await
    }
    async fn find_villa_by_name(&self, _name: &str) -> StoreResult<Option<Villa>> {
        Ok(None)
    }
    async fn villa_exists(&self, id: i32) -> StoreResult<bool> {
        self.inner.villa_exists(id).await
    }
    async fn create_villa(&self, villa: Villa) -> StoreResult<Villa> {
        self.inner.create_villa(villa).await
    }
    async fn update_villa(&self, villa: Villa) -> StoreResult<Villa> {
        self.inner.update_villa(villa).await
    }
    async fn delete_villa(&self, id: i32) -> StoreResult<()> {
        self.inner.delete_villa(id).await
    }
    async fn list_villa_numbers(&self) -> StoreResult<Vec<VillaNumber>> {
        self.inner.list_villa_numbers().await
    }
    async fn get_villa_number(&self, villa_no: i32) -> StoreResult<VillaNumber> {
        self.inner.get_villa_number(villa_no).await
    }
    async fn villa_number_exists(&self, _villa_no: i32) -> StoreResult<bool> {
        Ok(false)
    }
    async fn create_villa_number(&self, number: VillaNumber) -> StoreResult<VillaNumber> {
        self.inner.create_villa_number(number).await
    }
    async fn update_villa_number(&self, number: VillaNumber) -> StoreResult<VillaNumber> {
        self.inner.update_villa_number(number).await
    }
    async fn delete_villa_number(&self, villa_no: i32) -> StoreResult<()> {
        self.inner.delete_villa_number(villa_no).await
    }
    async fn health_check(&self) -> StoreResult<()> {
        self.inner.health_check().await
    }
    fn is_durable(&self) -> bool {
        false
    }
    fn backend_name(&self) -> &'static str {
        "stale-lookup"
    }
}

pub fn stale_lookup_app() -> TestApp {
    let store = StaleLookupStore {
        inner: InMemoryStore::new(),
    };
    build_router(AppState::new(Arc::new(store))).into_service()
}

pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

pub async fn read_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body")
        .to_vec()
}
