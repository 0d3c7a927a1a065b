// Copyright 2025 pgrapher Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTTP client for the pgrapher results API.
//!
//! - [`fetch`] - single-shot JSON GETs with status classification
//! - [`api`] - typed calls for every results API endpoint
//! - [`config`] - layered client configuration
//! - [`error`] - the [`FetchError`] taxonomy

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod api;
pub mod config;
pub mod error;
pub mod fetch;

pub use api::GrapherClient;
pub use crate::config::ClientConfig;
pub use error::{FetchError, Result};
pub use fetch::Fetcher;
