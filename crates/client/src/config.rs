// Copyright 2025 pgrapher Contributors
// SPDX-License-Identifier: Apache-2.0

//! Client configuration.
//!
//! Values are layered, later sources winning:
//!
//! 1. built-in defaults
//! 2. an optional `pgrapher.toml` (or an explicit file)
//! 3. `PGRAPHER_*` environment variables, after `.env` is loaded

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Default API root, where `pgrapher-api` listens out of the box.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Default endpoint the report is built from.
pub const DEFAULT_REPORT_PATH: &str = "/api/machines";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "PGRAPHER";

/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "pgrapher";

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// Settings of the pgrapher client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Root URL of the results API. May include a path prefix when the
    /// API is mounted below the server root.
    pub base_url: String,
    /// Path fetched to build the report.
    pub report_path: String,
    /// Request timeout in seconds; no timeout when unset.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            report_path: DEFAULT_REPORT_PATH.to_string(),
            timeout_secs: None,
        }
    }
}

impl ClientConfig {
    /// Load configuration from the process environment.
    ///
    /// `file` replaces the default `pgrapher.toml` lookup and must exist.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_sources(file, None)
    }

    /// Load configuration with an explicit environment map instead of the
    /// process environment.
    pub fn from_sources(
        file: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let file_source = match file {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = config::Config::builder()
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("report_path", DEFAULT_REPORT_PATH)?
            .add_source(file_source)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .source(env),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Request timeout, when configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
