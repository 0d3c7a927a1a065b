// Copyright 2025 pgrapher Contributors
// SPDX-License-Identifier: Apache-2.0

//! Results API service for pgrapher.
//!
//! Records individual benchmark runs and serves their averages per machine,
//! test and thread count.

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;

use crate::config::ApiConfig;
use crate::models::AppState;
use crate::store::{MemoryStore, PgStore, RunStore};
use anyhow::Context;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

pub use routes::router;

/// Open the store selected by `config`.
pub async fn open_store(config: &ApiConfig) -> anyhow::Result<Arc<dyn RunStore>> {
    let store: Arc<dyn RunStore> = match &config.database_url {
        Some(url) => Arc::new(
            PgStore::connect(url)
                .await
                .context("Failed to connect to database")?,
        ),
        None => {
            info!("No database configured, keeping runs in memory");
            Arc::new(MemoryStore::new())
        }
    };

    store.init().await.context("Failed to initialize store")?;
    Ok(store)
}

/// Serve the API until interrupted.
pub async fn serve(config: ApiConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let store = open_store(&config).await?;
    let app = router(Arc::new(AppState::new(store)));

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    info!(%addr, "Results API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Results API stopped");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
