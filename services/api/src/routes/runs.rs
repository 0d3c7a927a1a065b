// Copyright 2025 pgrapher Contributors
// SPDX-License-Identifier: Apache-2.0

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::models::{AppState, AverageRow, HostAverageRow, RunSubmission};
use pgrapher_benchmarks::SubmittedRun;

/// `GET` treats the segment as a hostname, `DELETE` as a run id.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/tests", get(list_tests).post(submit_test))
        .route("/api/tests/:segment", get(host_tests).delete(delete_test))
}

async fn list_tests(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AverageRow>>, ApiError> {
    let rows = state.store.averages().await?;
    debug!(count = rows.len(), "Listed averages");
    Ok(Json(rows))
}

async fn host_tests(
    State(state): State<Arc<AppState>>,
    Path(hostname): Path<String>,
) -> Result<Json<Vec<HostAverageRow>>, ApiError> {
    let rows = state.store.averages_for_host(&hostname).await?;
    if rows.is_empty() {
        return Err(ApiError::NotFound);
    }
    debug!(%hostname, count = rows.len(), "Listed host averages");
    Ok(Json(rows))
}

async fn submit_test(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SubmittedRun>, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let submission: RunSubmission =
        serde_json::from_value(body).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let run = submission.validate()?;

    let (hostname, test, threads) = (run.hostname.clone(), run.test.clone(), run.threads);
    let id = state.store.insert(run).await?;
    info!(id, %hostname, %test, threads, "Run recorded");

    Ok(Json(SubmittedRun { id }))
}

async fn delete_test(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: i64 = id
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid run id '{id}'")))?;

    let existed = state.store.delete(id).await?;
    info!(id, existed, "Run deleted");
    Ok(StatusCode::NO_CONTENT)
}
