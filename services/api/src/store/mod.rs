// Copyright 2025 pgrapher Contributors
// SPDX-License-Identifier: Apache-2.0

//! Run storage.
//!
//! - [`MemoryStore`] keeps runs in process, for tests and local use
//! - [`PgStore`] keeps runs in a Postgres `tests` table
//!
//! Averages are ordered by test, then hostname, then thread count.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::models::{AverageRow, HostAverageRow};
use async_trait::async_trait;
use pgrapher_benchmarks::NewRun;
use thiserror::Error;

/// Errors that can occur in a run store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Persistence for benchmark runs.
#[async_trait]
pub trait RunStore: Send + Sync {
    /// Prepare the store for use.
    async fn init(&self) -> Result<()> {
        Ok(())
    }

    /// Store one run and return its id.
    async fn insert(&self, run: NewRun) -> Result<i64>;

    /// Delete a run; returns whether it existed.
    async fn delete(&self, id: i64) -> Result<bool>;

    /// Distinct host names, sorted.
    async fn hostnames(&self) -> Result<Vec<String>>;

    /// Average result per hostname, test and thread count.
    async fn averages(&self) -> Result<Vec<AverageRow>>;

    /// Average result per test and thread count for one host.
    async fn averages_for_host(&self, hostname: &str) -> Result<Vec<HostAverageRow>>;
}
