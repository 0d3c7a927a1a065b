// Copyright 2025 pgrapher Contributors
// SPDX-License-Identifier: Apache-2.0

//! Single-shot JSON fetches.
//!
//! A [`Fetcher`] issues one GET per call and completes exactly once with
//! either the parsed body or a [`FetchError`]. Only status 200 counts as
//! success; any other status is reported with its numeric code and the body
//! is left unread.
//!
//! # Example
//!
//! ```ignore
//! use pgrapher_client::Fetcher;
//!
//! let fetcher = Fetcher::new();
//! let body = fetcher.get_json("http://localhost:8080/api/machines").await?;
//! ```

use crate::error::{FetchError, Result};
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// Issues JSON GET requests.
#[derive(Debug, Clone, Default)]
pub struct Fetcher {
    http: Client,
}

impl Fetcher {
    /// Create a fetcher with no request timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fetcher whose requests give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FetchError::Transport)?;
        Ok(Self { http })
    }

    /// Wrap an existing `reqwest` client.
    pub fn from_client(http: Client) -> Self {
        Self { http }
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// Fetch `url` and decode the body as JSON.
    pub async fn get_json(&self, url: &str) -> Result<Value> {
        let url = Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;
        self.get_json_url(url).await
    }

    /// Fetch an already parsed URL and decode the body as JSON.
    pub async fn get_json_url(&self, url: Url) -> Result<Value> {
        let response = self
            .http
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        debug!(%url, status = status.as_u16(), "GET completed");

        if status != StatusCode::OK {
            return Err(FetchError::Status(status.as_u16()));
        }

        response.json::<Value>().await.map_err(|e| {
            if e.is_decode() {
                FetchError::Decode(e)
            } else {
                FetchError::Transport(e)
            }
        })
    }

    /// Run [`Fetcher::get_json`] as a background task.
    ///
    /// The caller is not blocked; awaiting the handle yields the single
    /// completion of the request.
    pub fn spawn(&self, url: impl Into<String>) -> JoinHandle<Result<Value>> {
        let fetcher = self.clone();
        let url = url.into();
        tokio::spawn(async move { fetcher.get_json(&url).await })
    }
}
