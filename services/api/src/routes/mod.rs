// Copyright 2025 pgrapher Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTTP routes of the results API.

pub mod machines;
pub mod runs;

use crate::models::AppState;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the full application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .merge(machines::routes())
        .merge(runs::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
