//! Villa API HTTP application wiring.
//!
//! # Purpose
//! Builds the Axum router, configures middleware, and defines the shared
//! application state injected into handlers.
//!
//! # Notes
//! Route composition lives here so `main` stays small and tests can build the
//! same router against any [`VillaStore`].
use crate::api;
use crate::api::openapi::ApiDoc;
use crate::config::{ServiceConfig, StorageBackend};
use crate::observability;
use crate::store::VillaStore;
use crate::store::memory::InMemoryStore;
use crate::store::postgres::PostgresStore;
use anyhow::{Context, Result, anyhow};
use axum::Router;
use axum::routing::get;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_opentelemetry::OpenTelemetrySpanExt;
use utoipa::OpenApi;

pub const API_VERSION: &str = "v1";

#[derive(Clone)]
pub struct AppState {
    pub api_version: String,
    pub store: Arc<dyn VillaStore + Send + Sync>,
}

impl AppState {
    pub fn new(store: Arc<dyn VillaStore + Send + Sync>) -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            store,
        }
    }
}

/// Open the configured store and wrap it in application state.
///
/// # Errors
/// - `postgres` storage without a `postgres` section.
/// - Connection or migration failures.
pub async fn build_state(config: &ServiceConfig) -> Result<AppState> {
    let store: Arc<dyn VillaStore + Send + Sync> = match config.storage {
        StorageBackend::Memory => Arc::new(InMemoryStore::new()),
        StorageBackend::Postgres => {
            let pg = config
                .postgres
                .as_ref()
                .ok_or_else(|| anyhow!("postgres storage selected but no postgres url set"))?;
            let store = PostgresStore::connect(pg)
                .await
                .context("connect postgres store")?;
            Arc::new(store)
        }
    };
    tracing::info!(backend = store.backend_name(), "villa store ready");
    Ok(AppState::new(store))
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
            let parent = observability::trace_context_from_headers(request.headers());
            let span = tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version()
            );
            span.set_parent(parent);
            span
        });

    Router::new()
        .route("/api/health", get(api::system::system_health))
        .route("/api/system/info", get(api::system::system_info))
        .route(
            "/api/VillaAPI",
            get(api::villas::list_villas).post(api::villas::create_villa),
        )
        .route(
            "/api/VillaAPI/:id",
            get(api::villas::get_villa)
                .put(api::villas::update_villa)
                .patch(api::villas::patch_villa)
                .delete(api::villas::delete_villa),
        )
        .route(
            "/api/VillaNumberAPI",
            get(api::villa_numbers::list_villa_numbers)
                .post(api::villa_numbers::create_villa_number),
        )
        .route(
            "/api/VillaNumberAPI/:villa_no",
            get(api::villa_numbers::get_villa_number)
                .put(api::villa_numbers::update_villa_number)
                .patch(api::villa_numbers::patch_villa_number)
                .delete(api::villa_numbers::delete_villa_number),
        )
        .merge(
            utoipa_swagger_ui::SwaggerUi::new("/docs").url("/api/openapi.json", ApiDoc::openapi()),
        )
        .layer(trace_layer)
        .with_state(state)
}
