mod config;
mod db;
mod handlers;
mod models;
mod otel;
mod routes;
mod state;
mod store;
mod telemetry;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use opentelemetry::metrics::MeterProvider;
use tokio::net::TcpListener;

use crate::{
    config::Config,
    state::AppState,
    store::{MemoryStore, UserStore},
    telemetry::{NoopTelemetry, OtelTelemetry, Telemetry},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    let providers = config
        .telemetry_key()
        .and_then(|key| key.map(|key| otel::init_providers(&config, key)).transpose());
    let (providers, telemetry_error) = match providers {
        Ok(providers) => (providers, None),
        Err(err) => (None, Some(err)),
    };

    telemetry::init_subscriber(providers.as_ref().map(|p| &p.tracer), &config.service_name);

    if let Some(err) = telemetry_error {
        tracing::warn!(error = %format!("{err:#}"), "Telemetry disabled");
    } else if providers.is_none() {
        tracing::warn!("No instrumentation key configured, telemetry disabled");
    }

    let telemetry: Arc<dyn Telemetry> = match &providers {
        Some(providers) => Arc::new(OtelTelemetry::new(&providers.meter.meter("user-service"))),
        None => Arc::new(NoopTelemetry),
    };

    let store: Arc<dyn UserStore> = match &config.database_url {
        Some(database_url) => {
            let pool = db::create_pool(database_url).await?;
            db::run_migrations(&pool).await?;
            tracing::info!("Connected to database and migrations applied");
            Arc::new(db::PgUserStore::new(pool))
        }
        None => {
            tracing::info!("No DATABASE_URL configured, keeping users in memory");
            Arc::new(MemoryStore::new())
        }
    };

    let app = routes::create_router(AppState::new(store, telemetry));
    let addr = config.listen_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    if let Some(providers) = providers {
        providers.shutdown();
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to install CTRL+C signal handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, flushing telemetry...");
}
