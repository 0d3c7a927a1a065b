// Copyright 2025 pgrapher Contributors
// SPDX-License-Identifier: Apache-2.0

//! Handler errors and their HTTP mapping.

use crate::store::StoreError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Errors returned by request handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Nothing stored for the requested resource
    #[error("Not found")]
    NotFound,

    /// Backing store failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::NotFound => "NOT_FOUND",
            ApiError::Store(_) => "STORE_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::Store(err) => {
                error!(error = %err, "Store operation failed");
                "internal error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": message,
            }
        }));
        (self.status(), body).into_response()
    }
}
