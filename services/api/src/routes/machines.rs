// Copyright 2025 pgrapher Contributors
// SPDX-License-Identifier: Apache-2.0

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;
use tracing::debug;

use crate::error::ApiError;
use crate::models::{AppState, MachineRow};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/machines", get(list_machines))
}

async fn list_machines(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MachineRow>>, ApiError> {
    let hostnames = state.store.hostnames().await?;
    debug!(count = hostnames.len(), "Listed machines");

    Ok(Json(
        hostnames
            .into_iter()
            .map(|hostname| MachineRow { hostname })
            .collect(),
    ))
}
