// Copyright 2025 pgrapher Contributors
// SPDX-License-Identifier: Apache-2.0

//! Postgres run store.

use super::{Result, RunStore};
use crate::models::{AverageRow, HostAverageRow};
use async_trait::async_trait;
use pgrapher_benchmarks::NewRun;
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

const INIT_TABLE: &str = "CREATE TABLE IF NOT EXISTS tests \
    (id SERIAL, hostname TEXT, test TEXT, threads INT, run INT, result REAL)";

const SELECT_HOSTNAMES: &str =
    "SELECT DISTINCT hostname FROM tests WHERE hostname IS NOT NULL ORDER BY hostname";

const SELECT_AVERAGES: &str = "SELECT hostname, test, threads, avg(result)::float8 AS average_result \
    FROM tests GROUP BY hostname, test, threads ORDER BY test, hostname, threads";

const SELECT_HOST_AVERAGES: &str = "SELECT test, threads, avg(result)::float8 AS average_result \
    FROM tests WHERE hostname = $1 GROUP BY test, threads ORDER BY test, threads";

const INSERT_RUN: &str = "INSERT INTO tests (hostname, test, threads, run, result) \
    VALUES ($1, $2, $3, $4, $5) RETURNING id";

const DELETE_RUN: &str = "DELETE FROM tests WHERE id = $1";

/// Run store backed by a Postgres connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect to the database at `url`.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new().max_connections(5).connect(url).await?;
        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RunStore for PgStore {
    async fn init(&self) -> Result<()> {
        sqlx::query(INIT_TABLE).execute(&self.pool).await?;
        info!("Postgres run store ready");
        Ok(())
    }

    async fn insert(&self, run: NewRun) -> Result<i64> {
        let id: i32 = sqlx::query_scalar(INSERT_RUN)
            .bind(&run.hostname)
            .bind(&run.test)
            .bind(run.threads)
            .bind(run.run)
            .bind(run.result as f32)
            .fetch_one(&self.pool)
            .await?;
        Ok(i64::from(id))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let Ok(id) = i32::try_from(id) else {
            return Ok(false);
        };
        let done = sqlx::query(DELETE_RUN).bind(id).execute(&self.pool).await?;
        Ok(done.rows_affected() > 0)
    }

    async fn hostnames(&self) -> Result<Vec<String>> {
        Ok(sqlx::query_scalar(SELECT_HOSTNAMES)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn averages(&self) -> Result<Vec<AverageRow>> {
        let rows: Vec<(String, String, i32, f64)> = sqlx::query_as(SELECT_AVERAGES)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(hostname, test, threads, average_result)| AverageRow {
                hostname,
                test,
                threads,
                average_result,
            })
            .collect())
    }

    async fn averages_for_host(&self, hostname: &str) -> Result<Vec<HostAverageRow>> {
        let rows: Vec<(String, i32, f64)> = sqlx::query_as(SELECT_HOST_AVERAGES)
            .bind(hostname)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(test, threads, average_result)| HostAverageRow {
                test,
                threads,
                average_result,
            })
            .collect())
    }
}
