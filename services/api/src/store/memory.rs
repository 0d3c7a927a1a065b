// Copyright 2025 pgrapher Contributors
// SPDX-License-Identifier: Apache-2.0

//! In-process run store.

use super::{Result, RunStore};
use crate::models::{AverageRow, HostAverageRow};
use async_trait::async_trait;
use pgrapher_benchmarks::NewRun;
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Runs {
    next_id: i64,
    rows: Vec<(i64, NewRun)>,
}

/// Run store backed by a vector.
#[derive(Debug, Default)]
pub struct MemoryStore {
    runs: RwLock<Runs>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored runs.
    pub async fn len(&self) -> usize {
        self.runs.read().await.rows.len()
    }

    /// Whether no runs are stored.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[derive(Default)]
struct Mean {
    sum: f64,
    count: u32,
}

impl Mean {
    fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn value(&self) -> f64 {
        self.sum / f64::from(self.count)
    }
}

#[async_trait]
impl RunStore for MemoryStore {
    async fn insert(&self, run: NewRun) -> Result<i64> {
        let mut runs = self.runs.write().await;
        runs.next_id += 1;
        let id = runs.next_id;
        runs.rows.push((id, run));
        Ok(id)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut runs = self.runs.write().await;
        let before = runs.rows.len();
        runs.rows.retain(|(row_id, _)| *row_id != id);
        Ok(runs.rows.len() != before)
    }

    async fn hostnames(&self) -> Result<Vec<String>> {
        let runs = self.runs.read().await;
        let hostnames: BTreeSet<_> = runs.rows.iter().map(|(_, r)| r.hostname.clone()).collect();
        Ok(hostnames.into_iter().collect())
    }

    async fn averages(&self) -> Result<Vec<AverageRow>> {
        let runs = self.runs.read().await;
        let mut groups: BTreeMap<(&str, &str, i32), Mean> = BTreeMap::new();
        for (_, run) in &runs.rows {
            groups
                .entry((run.test.as_str(), run.hostname.as_str(), run.threads))
                .or_default()
                .add(run.result);
        }

        Ok(groups
            .into_iter()
            .map(|((test, hostname, threads), mean)| AverageRow {
                hostname: hostname.to_string(),
                test: test.to_string(),
                threads,
                average_result: mean.value(),
            })
            .collect())
    }

    async fn averages_for_host(&self, hostname: &str) -> Result<Vec<HostAverageRow>> {
        let runs = self.runs.read().await;
        let mut groups: BTreeMap<(&str, i32), Mean> = BTreeMap::new();
        for (_, run) in runs.rows.iter().filter(|(_, r)| r.hostname == hostname) {
            groups
                .entry((run.test.as_str(), run.threads))
                .or_default()
                .add(run.result);
        }

        Ok(groups
            .into_iter()
            .map(|((test, threads), mean)| HostAverageRow {
                test: test.to_string(),
                threads,
                average_result: mean.value(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(hostname: &str, test: &str, threads: i32, result: f64) -> NewRun {
        NewRun {
            hostname: hostname.into(),
            test: test.into(),
            threads,
            run: 1,
            result,
        }
    }

    #[tokio::test]
    async fn test_ids_increase_from_one() {
        let store = MemoryStore::new();
        assert_eq!(store.insert(run("h1", "cpu", 1, 1.0)).await.unwrap(), 1);
        assert_eq!(store.insert(run("h1", "cpu", 1, 1.0)).await.unwrap(), 2);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryStore::new();
        let id = store.insert(run("h1", "cpu", 1, 1.0)).await.unwrap();
        assert!(store.delete(id).await.unwrap());
        assert!(!store.delete(id).await.unwrap());
        assert!(store.is_empty().await);

        let next = store.insert(run("h1", "cpu", 1, 1.0)).await.unwrap();
        assert_eq!(next, id + 1);
    }

    #[tokio::test]
    async fn test_averages_group_and_order() {
        let store = MemoryStore::new();
        store.insert(run("h2", "io", 2, 4.0)).await.unwrap();
        store.insert(run("h1", "cpu", 4, 1.0)).await.unwrap();
        store.insert(run("h1", "cpu", 4, 2.0)).await.unwrap();
        store.insert(run("h2", "cpu", 4, 3.0)).await.unwrap();

        let rows = store.averages().await.unwrap();
        let keys: Vec<_> = rows
            .iter()
            .map(|r| (r.test.as_str(), r.hostname.as_str(), r.average_result))
            .collect();
        assert_eq!(
            keys,
            [("cpu", "h1", 1.5), ("cpu", "h2", 3.0), ("io", "h2", 4.0)]
        );

        assert_eq!(store.hostnames().await.unwrap(), ["h1", "h2"]);
    }

    #[tokio::test]
    async fn test_averages_for_host() {
        let store = MemoryStore::new();
        store.insert(run("h1", "cpu", 8, 2.0)).await.unwrap();
        store.insert(run("h1", "cpu", 2, 6.0)).await.unwrap();
        store.insert(run("h2", "cpu", 2, 9.0)).await.unwrap();

        let rows = store.averages_for_host("h1").await.unwrap();
        assert_eq!(
            rows,
            [
                HostAverageRow { test: "cpu".into(), threads: 2, average_result: 6.0 },
                HostAverageRow { test: "cpu".into(), threads: 8, average_result: 2.0 },
            ]
        );
        assert!(store.averages_for_host("h3").await.unwrap().is_empty());
    }
}
