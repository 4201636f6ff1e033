//! Postgres-backed implementation of the villa store.
//!
//! # What this module is
//! Implements [`VillaStore`] on a `sqlx::PgPool`. Two authoritative tables,
//! `villas` and `villa_numbers`, hold current state; there is no change log.
//!
//! # Key invariants
//! - `villas.id` is a `SERIAL` assigned by Postgres.
//! - A unique index on `lower(name)` enforces case-insensitive name
//!   uniqueness at write time. Unique violations (`23505`) surface as
//!   [`StoreError::Conflict`], which closes the race left open by the API
//!   layer's read-then-write pre-check.
//! - `villa_numbers.villa_id` is not a declared foreign key.
//!
//! # Operational notes
//! - Migrations run at connect time via `sqlx::migrate!("./migrations")` so
//!   handlers can assume the schema exists.
//! - Row-count gauges are recounted at connect and after each insert or delete.
//! - Database URLs may contain credentials; never log `pg.url`.
//! - Pool sizing and timeouts come from [`PostgresConfig`]; startup fails fast
//!   rather than hanging when the database is unreachable.
use super::{StoreError, StoreResult, VillaStore};
use crate::config::PostgresConfig;
use crate::model::{Villa, VillaNumber};
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use std::time::Duration;

/// Durable villa store backed by Postgres.
///
/// # Example
/// ```rust,no_run
/// use villa_api::config::PostgresConfig;
/// use villa_api::store::postgres::PostgresStore;
///
/// async fn open(pg: PostgresConfig) {
///     let _ = PostgresStore::connect(&pg).await;
/// }
/// ```
pub struct PostgresStore {
    pool: PgPool,
}

/// Row shape for the `villas` table.
#[derive(Debug, Clone, FromRow)]
struct DbVilla {
    id: i32,
    name: String,
    sqft: i32,
    occupancy: i32,
    rate: f64,
    details: String,
    image_url: String,
    amenity: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Row shape for the `villa_numbers` table.
#[derive(Debug, Clone, FromRow)]
struct DbVillaNumber {
    villa_no: i32,
    villa_id: i32,
    details: String,
    special_details: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DbVilla> for Villa {
    fn from(row: DbVilla) -> Self {
        Self {
            id: row.id,
            name: row.name,
            sqft: row.sqft,
            occupancy: row.occupancy,
            rate: row.rate,
            details: row.details,
            image_url: row.image_url,
            amenity: row.amenity,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<DbVillaNumber> for VillaNumber {
    fn from(row: DbVillaNumber) -> Self {
        Self {
            villa_no: row.villa_no,
            villa_id: row.villa_id,
            details: row.details,
            special_details: row.special_details,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const VILLA_COLUMNS: &str =
    "id, name, sqft, occupancy, rate, details, image_url, amenity, created_at, updated_at";
const VILLA_NUMBER_COLUMNS: &str =
    "villa_no, villa_id, details, special_details, created_at, updated_at";

impl PostgresStore {
    /// Connect to Postgres and apply embedded migrations.
    ///
    /// # Errors
    /// - Invalid URL, connect timeout, pool setup, or migration failures.
    pub async fn connect(pg: &PostgresConfig) -> StoreResult<Self> {
        let connect_options = PgConnectOptions::from_str(&pg.url)?;
        let connect = PgPoolOptions::new()
            .max_connections(pg.max_connections)
            .acquire_timeout(Duration::from_millis(pg.acquire_timeout_ms))
            .connect_with(connect_options);
        let pool = tokio::time::timeout(Duration::from_millis(pg.connect_timeout_ms), connect)
            .await
            .map_err(|_| StoreError::Unexpected(anyhow!("postgres connect timed out")))??;
        sqlx::migrate!("./migrations").run(&pool).await?;

        let store = Self { pool };
        store.record_totals().await?;
        Ok(store)
    }

    /// Count both tables and publish the `villas_total` and
    /// `villa_numbers_total` gauges.
    pub(crate) async fn record_totals(&self) -> StoreResult<(i64, i64)> {
        let (villas, numbers) = sqlx::query_as::<_, (i64, i64)>(
            "SELECT (SELECT COUNT(*) FROM villas), (SELECT COUNT(*) FROM villa_numbers)",
        )
        .fetch_one(&self.pool)
        .await?;
        metrics::gauge!("villas_total").set(villas as f64);
        metrics::gauge!("villa_numbers_total").set(numbers as f64);
        Ok((villas, numbers))
    }

    // The write has already committed; a failed recount only leaves the gauges stale.
    async fn refresh_totals(&self) {
        if let Err(err) = self.record_totals().await {
            tracing::warn!(error = %err, "failed to refresh row gauges");
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl VillaStore for PostgresStore {
    async fn list_villas(&self) -> StoreResult<Vec<Villa>> {
        let rows = sqlx::query_as::<_, DbVilla>(&format!(
            "SELECT {VILLA_COLUMNS} FROM villas ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Villa::from).collect())
    }

    async fn get_villa(&self, id: i32) -> StoreResult<Villa> {
        let row = sqlx::query_as::<_, DbVilla>(&format!(
            "SELECT {VILLA_COLUMNS} FROM villas WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Villa::from)
            .ok_or_else(|| StoreError::NotFound("villa".into()))
    }

    async fn find_villa_by_name(&self, name: &str) -> StoreResult<Option<Villa>> {
        let row = sqlx::query_as::<_, DbVilla>(&format!(
            "SELECT {VILLA_COLUMNS} FROM villas WHERE lower(name) = lower($1)"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Villa::from))
    }

    async fn villa_exists(&self, id: i32) -> StoreResult<bool> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM villas WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    async fn create_villa(&self, villa: Villa) -> StoreResult<Villa> {
        let inserted = sqlx::query_as::<_, DbVilla>(&format!(
            r#"INSERT INTO villas (name, sqft, occupancy, rate, details, image_url, amenity, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, now(), now())
               RETURNING {VILLA_COLUMNS}"#
        ))
        .bind(&villa.name)
        .bind(villa.sqft)
        .bind(villa.occupancy)
        .bind(villa.rate)
        .bind(&villa.details)
        .bind(&villa.image_url)
        .bind(&villa.amenity)
        .fetch_one(&self.pool)
        .await;
        match inserted {
            Ok(row) => {
                metrics::counter!("villa_changes_total", "op" => "created").increment(1);
                self.refresh_totals().await;
                Ok(Villa::from(row))
            }
            Err(err) if is_unique_violation(&err) => {
                Err(StoreError::Conflict("villa name exists".into()))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn update_villa(&self, villa: Villa) -> StoreResult<Villa> {
        let updated = sqlx::query_as::<_, DbVilla>(&format!(
            r#"UPDATE villas
               SET name = $2, sqft = $3, occupancy = $4, rate = $5, details = $6,
                   image_url = $7, amenity = $8, updated_at = now()
               WHERE id = $1
               RETURNING {VILLA_COLUMNS}"#
        ))
        .bind(villa.id)
        .bind(&villa.name)
        .bind(villa.sqft)
        .bind(villa.occupancy)
        .bind(villa.rate)
        .bind(&villa.details)
        .bind(&villa.image_url)
        .bind(&villa.amenity)
        .fetch_optional(&self.pool)
        .await;
        match updated {
            Ok(Some(row)) => {
                metrics::counter!("villa_changes_total", "op" => "updated").increment(1);
                Ok(Villa::from(row))
            }
            Ok(None) => Err(StoreError::NotFound("villa".into())),
            Err(err) if is_unique_violation(&err) => {
                Err(StoreError::Conflict("villa name exists".into()))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn delete_villa(&self, id: i32) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM villas WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("villa".into()));
        }
        metrics::counter!("villa_changes_total", "op" => "deleted").increment(1);
        self.refresh_totals().await;
        Ok(())
    }

    async fn list_villa_numbers(&self) -> StoreResult<Vec<VillaNumber>> {
        let rows = sqlx::query_as::<_, DbVillaNumber>(&format!(
            "SELECT {VILLA_NUMBER_COLUMNS} FROM villa_numbers ORDER BY villa_no"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(VillaNumber::from).collect())
    }

    async fn get_villa_number(&self, villa_no: i32) -> StoreResult<VillaNumber> {
        let row = sqlx::query_as::<_, DbVillaNumber>(&format!(
            "SELECT {VILLA_NUMBER_COLUMNS} FROM villa_numbers WHERE villa_no = $1"
        ))
        .bind(villa_no)
        .fetch_optional(&self.pool)
        .await?;
        row.map(VillaNumber::from)
            .ok_or_else(|| StoreError::NotFound("villa number".into()))
    }

    async fn villa_number_exists(&self, villa_no: i32) -> StoreResult<bool> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM villa_numbers WHERE villa_no = $1")
                .bind(villa_no)
                .fetch_one(&self.pool)
                .await?;
        Ok(count > 0)
    }

    async fn create_villa_number(&self, number: VillaNumber) -> StoreResult<VillaNumber> {
        let inserted = sqlx::query_as::<_, DbVillaNumber>(&format!(
            r#"INSERT INTO villa_numbers (villa_no, villa_id, details, special_details, created_at, updated_at)
               VALUES ($1, $2, $3, $4, now(), now())
               RETURNING {VILLA_NUMBER_COLUMNS}"#
        ))
        .bind(number.villa_no)
        .bind(number.villa_id)
        .bind(&number.details)
        .bind(&number.special_details)
        .fetch_one(&self.pool)
        .await;
        match inserted {
            Ok(row) => {
                metrics::counter!("villa_number_changes_total", "op" => "created").increment(1);
                self.refresh_totals().await;
                Ok(VillaNumber::from(row))
            }
            Err(err) if is_unique_violation(&err) => {
                Err(StoreError::Conflict("villa number exists".into()))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn update_villa_number(&self, number: VillaNumber) -> StoreResult<VillaNumber> {
        let row = sqlx::query_as::<_, DbVillaNumber>(&format!(
            r#"UPDATE villa_numbers
               SET villa_id = $2, details = $3, special_details = $4, updated_at = now()
               WHERE villa_no = $1
               RETURNING {VILLA_NUMBER_COLUMNS}"#
        ))
        .bind(number.villa_no)
        .bind(number.villa_id)
        .bind(&number.details)
        .bind(&number.special_details)
        .fetch_optional(&self.pool)
        .await?;
        match row {
            Some(row) => {
                metrics::counter!("villa_number_changes_total", "op" => "updated").increment(1);
                Ok(VillaNumber::from(row))
            }
            None => Err(StoreError::NotFound("villa number".into())),
        }
    }

    async fn delete_villa_number(&self, villa_no: i32) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM villa_numbers WHERE villa_no = $1")
            .bind(villa_no)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("villa number".into()));
        }
        metrics::counter!("villa_number_changes_total", "op" => "deleted").increment(1);
        self.refresh_totals().await;
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn is_durable(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        return db_err.code().map(|code| code == "23505").unwrap_or(false);
    }
    false
}
