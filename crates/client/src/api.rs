// Copyright 2025 pgrapher Contributors
// SPDX-License-Identifier: Apache-2.0

//! Typed client for the results API.
//!
//! Every call is a single request with no retry. Read calls go through the
//! [`Fetcher`], so they share its status handling: anything but 200 is an
//! error carrying the status code.

use crate::config::ClientConfig;
use crate::error::{FetchError, Result};
use crate::fetch::Fetcher;
use pgrapher_benchmarks::{records_from_value, BenchmarkRecord, NewRun, SubmittedRun};
use reqwest::{RequestBuilder, Response, Url};
use serde_json::Value;
use tracing::{debug, info};

/// Client bound to one results API deployment.
#[derive(Debug, Clone)]
pub struct GrapherClient {
    fetcher: Fetcher,
    base_url: Url,
}

impl GrapherClient {
    /// Create a client for the API rooted at `base_url`.
    ///
    /// The base URL may carry a path prefix (`http://host/pgrapher`); every
    /// API path is resolved beneath it.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_fetcher(Fetcher::new(), base_url)
    }

    /// Create a client that sends its requests through `fetcher`.
    pub fn with_fetcher(fetcher: Fetcher, base_url: &str) -> Result<Self> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| FetchError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl(base_url.to_string()));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { fetcher, base_url })
    }

    /// Create a client from loaded configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let fetcher = match config.timeout() {
            Some(timeout) => Fetcher::with_timeout(timeout)?,
            None => Fetcher::new(),
        };
        Self::with_fetcher(fetcher, &config.base_url)
    }

    /// Root URL of the API, always ending in `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The fetcher used for read calls.
    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    /// Resolve `path` beneath the base URL.
    ///
    /// A leading `/` does not escape the base URL's path prefix.
    pub fn url_for(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| FetchError::InvalidUrl(format!("{path}: {e}")))
    }

    /// Fetch the raw body behind `path`, for report building.
    pub async fn fetch_report_body(&self, path: &str) -> Result<Value> {
        let url = self.url_for(path)?;
        self.fetcher.get_json_url(url).await
    }

    /// Host names that have submitted results.
    pub async fn machines(&self) -> Result<Vec<String>> {
        let body = self.fetch_report_body("api/machines").await?;
        let hostnames = records_from_value(&body)
            .into_iter()
            .filter_map(|record| record.hostname)
            .collect();
        Ok(hostnames)
    }

    /// Averaged results of every machine.
    pub async fn tests(&self) -> Result<Vec<BenchmarkRecord>> {
        let body = self.fetch_report_body("api/tests").await?;
        Ok(records_from_value(&body))
    }

    /// Averaged results of one machine.
    ///
    /// A host without results is reported by the server as status 404.
    pub async fn tests_for_host(&self, hostname: &str) -> Result<Vec<BenchmarkRecord>> {
        let mut url = self.url_for("api/tests")?;
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push(hostname);

        let body = self.fetcher.get_json_url(url).await?;
        let mut records = records_from_value(&body);
        for record in &mut records {
            if record.hostname.is_none() {
                record.hostname = Some(hostname.to_string());
            }
        }
        Ok(records)
    }

    /// Record one benchmark run and return its id.
    pub async fn submit_run(&self, run: &NewRun) -> Result<i64> {
        let url = self.url_for("api/tests")?;
        let response = self.send(self.fetcher.http().post(url).json(run)).await?;
        let body: SubmittedRun = response.json().await.map_err(FetchError::Decode)?;

        info!(
            id = body.id,
            hostname = %run.hostname,
            test = %run.test,
            threads = run.threads,
            "Run submitted"
        );
        Ok(body.id)
    }

    /// Delete one recorded run.
    pub async fn delete_test(&self, id: i64) -> Result<()> {
        let url = self.url_for(&format!("api/tests/{id}"))?;
        self.send(self.fetcher.http().delete(url)).await?;
        info!(id, "Run deleted");
        Ok(())
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(FetchError::Transport)?;
        let status = response.status();
        debug!(url = %response.url(), status = status.as_u16(), "request completed");

        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        Ok(response)
    }
}
