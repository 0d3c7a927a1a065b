// Copyright 2025 pgrapher Contributors
// SPDX-License-Identifier: Apache-2.0

//! Results API service entry point.

use anyhow::Context;
use pgrapher_api::config::ApiConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pgrapher_api=info,tower_http=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ApiConfig::load().context("Failed to load configuration")?;
    pgrapher_api::serve(config).await
}
