//! Villa API HTTP service entry point.
//!
//! # Purpose
//! Loads configuration, opens the configured store, and serves the villa API
//! and the Prometheus metrics endpoint until ctrl-c.
use anyhow::Context;
use std::future::Future;
use tokio::sync::watch;
use villa_api::app::{build_router, build_state};
use villa_api::config::ServiceConfig;
use villa_api::observability;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServiceConfig::from_env_or_yaml().context("villa api config")?;
    run_with_shutdown(config, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

async fn run_with_shutdown<F>(config: ServiceConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let metrics_handle = observability::init_observability("villa-api")?;
    let state = build_state(&config).await?;

    let metrics_listener = tokio::net::TcpListener::bind(config.metrics_bind)
        .await
        .with_context(|| format!("bind metrics {}", config.metrics_bind))?;
    let (stop_tx, mut stop_rx) = watch::channel(false);
    let metrics_task = tokio::spawn(async move {
        let stopped = async move {
            let _ = stop_rx.wait_for(|stop| *stop).await;
        };
        let served = observability::serve_metrics(metrics_listener, metrics_handle, stopped).await;
        if let Err(err) = served {
            tracing::warn!(error = %err, "metrics listener failed");
        }
    });

    let addr = config.bind_addr;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {addr}"))?;
    tracing::info!(addr = %listener.local_addr()?, "villa api listening");
    axum::serve(listener, build_router(state).into_make_service())
        .with_graceful_shutdown(shutdown)
        .await?;

    let _ = stop_tx.send(true);
    let _ = metrics_task.await;
    tracing::info!("villa api stopped");
    Ok(())
}
