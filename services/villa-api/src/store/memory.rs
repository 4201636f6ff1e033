//! In-memory implementation of the villa store.
//!
//! # Purpose
//! Implements [`VillaStore`] with `HashMap`s guarded by `tokio::sync::RwLock`.
//! It backs local development, the HTTP tests, and deployments that do not
//! need durability.
//!
//! # Durability and consistency
//! - **Not durable**: all state is lost on process restart.
//! - Each mutation runs under the write lock of its table, so the name and
//!   number uniqueness checks done here cannot race with another write. These
//!   checks are the constraint boundary; the API layer's own pre-checks are
//!   read-then-write and may race.
//! - Villa ids come from a per-store counter starting at 1 and are never reused.
use super::{StoreError, StoreResult, VillaStore};
use crate::model::{Villa, VillaNumber};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug)]
struct VillaTable {
    next_id: i32,
    rows: HashMap<i32, Villa>,
}

impl VillaTable {
    fn new() -> Self {
        Self {
            next_id: 1,
            rows: HashMap::new(),
        }
    }

    fn name_taken(&self, name: &str, except_id: Option<i32>) -> bool {
        self.rows
            .values()
            .any(|villa| Some(villa.id) != except_id && villa.same_name(name))
    }
}

#[derive(Clone)]
pub struct InMemoryStore {
    /// Villas keyed by store-assigned id, plus the id counter.
    villas: Arc<RwLock<VillaTable>>,
    /// Villa numbers keyed by their natural key.
    villa_numbers: Arc<RwLock<HashMap<i32, VillaNumber>>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            villas: Arc::new(RwLock::new(VillaTable::new())),
            villa_numbers: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl VillaStore for InMemoryStore {
    async fn list_villas(&self) -> StoreResult<Vec<Villa>> {
        let mut items: Vec<Villa> = self.villas.read().await.rows.values().cloned().collect();
        items.sort_by_key(|villa| villa.id);
        Ok(items)
    }

    async fn get_villa(&self, id: i32) -> StoreResult<Villa> {
        self.villas
            .read()
            .await
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("villa".into()))
    }

    async fn find_villa_by_name(&self, name: &str) -> StoreResult<Option<Villa>> {
        Ok(self
            .villas
            .read()
            .await
            .rows
            .values()
            .find(|villa| villa.same_name(name))
            .cloned())
    }

    async fn villa_exists(&self, id: i32) -> StoreResult<bool> {
        Ok(self.villas.read().await.rows.contains_key(&id))
    }

    async fn create_villa(&self, villa: Villa) -> StoreResult<Villa> {
        let mut table = self.villas.write().await;
        if table.name_taken(&villa.name, None) {
            return Err(StoreError::Conflict("villa name exists".into()));
        }
        let now = Utc::now();
        let created = Villa {
            id: table.next_id,
            created_at: now,
            updated_at: now,
            ..villa
        };
        table.next_id += 1;
        table.rows.insert(created.id, created.clone());
        metrics::counter!("villa_changes_total", "op" => "created").increment(1);
        metrics::gauge!("villas_total").set(table.rows.len() as f64);
        Ok(created)
    }

    async fn update_villa(&self, villa: Villa) -> StoreResult<Villa> {
        let mut table = self.villas.write().await;
        if table.name_taken(&villa.name, Some(villa.id)) {
            return Err(StoreError::Conflict("villa name exists".into()));
        }
        let current = table
            .rows
            .get_mut(&villa.id)
            .ok_or_else(|| StoreError::NotFound("villa".into()))?;
        *current = Villa {
            created_at: current.created_at,
            updated_at: Utc::now(),
            ..villa
        };
        let updated = current.clone();
        metrics::counter!("villa_changes_total", "op" => "updated").increment(1);
        Ok(updated)
    }

    async fn delete_villa(&self, id: i32) -> StoreResult<()> {
        let mut table = self.villas.write().await;
        if table.rows.remove(&id).is_none() {
            return Err(StoreError::NotFound("villa".into()));
        }
        metrics::counter!("villa_changes_total", "op" => "deleted").increment(1);
        metrics::gauge!("villas_total").set(table.rows.len() as f64);
        Ok(())
    }

    async fn list_villa_numbers(&self) -> StoreResult<Vec<VillaNumber>> {
        let mut items: Vec<VillaNumber> =
            self.villa_numbers.read().await.values().cloned().collect();
        items.sort_by_key(|number| number.villa_no);
        Ok(items)
    }

    async fn get_villa_number(&self, villa_no: i32) -> StoreResult<VillaNumber> {
        self.villa_numbers
            .read()
            .await
            .get(&villa_no)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("villa number".into()))
    }

    async fn villa_number_exists(&self, villa_no: i32) -> StoreResult<bool> {
        Ok(self.villa_numbers.read().await.contains_key(&villa_no))
    }

    async fn create_villa_number(&self, number: VillaNumber) -> StoreResult<VillaNumber> {
        let mut numbers = self.villa_numbers.write().await;
        if numbers.contains_key(&number.villa_no) {
            return Err(StoreError::Conflict("villa number exists".into()));
        }
        let now = Utc::now();
        let created = VillaNumber {
            created_at: now,
            updated_at: now,
            ..number
        };
        numbers.insert(created.villa_no, created.clone());
        metrics::counter!("villa_number_changes_total", "op" => "created").increment(1);
        metrics::gauge!("villa_numbers_total").set(numbers.len() as f64);
        Ok(created)
    }

    async fn update_villa_number(&self, number: VillaNumber) -> StoreResult<VillaNumber> {
        let mut numbers = self.villa_numbers.write().await;
        let current = numbers
            .get_mut(&number.villa_no)
            .ok_or_else(|| StoreError::NotFound("villa number".into()))?;
        *current = VillaNumber {
            created_at: current.created_at,
            updated_at: Utc::now(),
            ..number
        };
        let updated = current.clone();
        metrics::counter!("villa_number_changes_total", "op" => "updated").increment(1);
        Ok(updated)
    }

    async fn delete_villa_number(&self, villa_no: i32) -> StoreResult<()> {
        let mut numbers = self.villa_numbers.write().await;
        if numbers.remove(&villa_no).is_none() {
            return Err(StoreError::NotFound("villa number".into()));
        }
        metrics::counter!("villa_number_changes_total", "op" => "deleted").increment(1);
        metrics::gauge!("villa_numbers_total").set(numbers.len() as f64);
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        // Always healthy while the process runs.
        Ok(())
    }

    fn is_durable(&self) -> bool {
        false
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
