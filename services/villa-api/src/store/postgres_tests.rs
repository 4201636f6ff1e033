//! Postgres store tests against a real database.
//!
//! # Purpose
//! Exercise the Postgres-backed store with real SQL to verify the schema,
//! migrations, CRUD behavior, and unique-index conflict mapping.
//!
//! # Key invariants
//! - Tests are serialized and truncate both tables before running.
//! - Tests skip (with a note on stderr) when no database URL is configured.
//!
//! # How to use
//! Run with
//! `VILLA_API_TEST_DATABASE_URL=postgres://... cargo test -p villa-api --features pg-tests postgres_store`.
#![cfg(feature = "pg-tests")]

use super::postgres::PostgresStore;
use super::{StoreError, VillaStore};
use crate::config::PostgresConfig;
use crate::model::{Villa, VillaNumber};
use chrono::Utc;
use serial_test::serial;

fn pg_url() -> Option<String> {
    std::env::var("VILLA_API_TEST_DATABASE_URL")
        .or_else(|_| std::env::var("VILLA_API_POSTGRES_URL"))
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
}

async fn fresh_store() -> Option<PostgresStore> {
    let Some(url) = pg_url() else {
        eprintln!("skipping pg-tests: no database url configured");
        return None;
    };
    let store = PostgresStore::connect(&PostgresConfig::with_url(url))
        .await
        .expect("connect");
    sqlx::query("TRUNCATE villas, villa_numbers RESTART IDENTITY")
        .execute(store.pool())
        .await
        .expect("truncate");
    Some(store)
}

fn villa(name: &str) -> Villa {
    let now = Utc::now();
    Villa {
        id: 0,
        name: name.to_string(),
        sqft: 550,
        occupancy: 4,
        rate: 200.0,
        details: "Sea view".to_string(),
        image_url: String::new(),
        amenity: String::new(),
        created_at: now,
        updated_at: now,
    }
}

fn number(villa_no: i32, villa_id: i32) -> VillaNumber {
    let now = Utc::now();
    VillaNumber {
        villa_no,
        villa_id,
        details: "Ground floor".to_string(),
        special_details: None,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
#[serial]
async fn postgres_store_villa_roundtrip() {
    let Some(store) = fresh_store().await else {
        return;
    };
    store.health_check().await.expect("health");
    assert!(store.is_durable());
    assert_eq!(store.backend_name(), "postgres");

    let created = store.create_villa(villa("Royal")).await.expect("create");
    assert_eq!(created.id, 1);
    assert!(store.villa_exists(created.id).await.expect("exists"));

    let found = store
        .find_villa_by_name("ROYAL")
        .await
        .expect("find")
        .expect("present");
    assert_eq!(found.id, created.id);

    let dup = store.create_villa(villa("royal")).await;
    assert!(matches!(dup, Err(StoreError::Conflict(_))));

    let mut changed = created.clone();
    changed.rate = 350.0;
    let updated = store.update_villa(changed).await.expect("update");
    assert_eq!(updated.rate, 350.0);
    assert_eq!(updated.created_at, created.created_at);

    store.delete_villa(created.id).await.expect("delete");
    assert!(matches!(
        store.get_villa(created.id).await,
        Err(StoreError::NotFound(_))
    ));
    assert!(matches!(
        store.delete_villa(created.id).await,
        Err(StoreError::NotFound(_))
    ));
}

#[tokio::test]
#[serial]
async fn postgres_store_villa_number_roundtrip() {
    let Some(store) = fresh_store().await else {
        return;
    };
    let parent = store.create_villa(villa("Harbor")).await.expect("villa");

    let created = store
        .create_villa_number(number(101, parent.id))
        .await
        .expect("create");
    assert_eq!(created.villa_no, 101);
    assert!(matches!(
        store.create_villa_number(number(101, parent.id)).await,
        Err(StoreError::Conflict(_))
    ));

    let mut changed = created.clone();
    changed.special_details = Some("Private pool".to_string());
    let updated = store.update_villa_number(changed).await.expect("update");
    assert_eq!(updated.special_details.as_deref(), Some("Private pool"));

    let listed = store.list_villa_numbers().await.expect("list");
    assert_eq!(listed.len(), 1);

    store.delete_villa_number(101).await.expect("delete");
    assert!(!store.villa_number_exists(101).await.expect("exists"));
}

#[tokio::test]
#[serial]
async fn postgres_store_recounts_rows_after_writes() {
    let Some(store) = fresh_store().await else {
        return;
    };
    assert_eq!(store.record_totals().await.expect("totals"), (0, 0));

    let parent = store.create_villa(villa("Lagoon")).await.expect("villa");
    store
        .create_villa_number(number(201, parent.id))
        .await
        .expect("number");
    assert_eq!(store.record_totals().await.expect("totals"), (1, 1));

    store.delete_villa_number(201).await.expect("delete number");
    store.delete_villa(parent.id).await.expect("delete villa");
    assert_eq!(store.record_totals().await.expect("totals"), (0, 0));
}
