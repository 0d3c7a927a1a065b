// Copyright 2025 pgrapher Contributors
// SPDX-License-Identifier: Apache-2.0

//! Shared state and wire types of the results API.

use crate::error::ApiError;
use crate::store::RunStore;
use pgrapher_benchmarks::NewRun;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// State shared by every handler.
pub struct AppState {
    /// Backing run store.
    pub store: Arc<dyn RunStore>,
}

impl AppState {
    /// Wrap a store.
    pub fn new(store: Arc<dyn RunStore>) -> Self {
        Self { store }
    }
}

/// Entry of `GET /api/machines`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineRow {
    /// Machine host name.
    pub hostname: String,
}

/// Entry of `GET /api/tests`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AverageRow {
    /// Machine host name.
    pub hostname: String,
    /// Test identifier.
    pub test: String,
    /// Thread count.
    pub threads: i32,
    /// Mean over all runs of this combination.
    pub average_result: f64,
}

/// Entry of `GET /api/tests/{hostname}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostAverageRow {
    /// Test identifier.
    pub test: String,
    /// Thread count.
    pub threads: i32,
    /// Mean over all runs of this combination.
    pub average_result: f64,
}

/// A JSON string or number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// JSON string.
    Text(String),
    /// JSON number.
    Number(serde_json::Number),
}

impl Scalar {
    fn as_text(&self) -> String {
        match self {
            Scalar::Text(text) => text.clone(),
            Scalar::Number(n) => n.to_string(),
        }
    }
}

/// Body of `POST /api/tests`, before validation.
///
/// Fields may be sent as strings or numbers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunSubmission {
    /// Machine that ran the benchmark.
    #[serde(default)]
    pub hostname: Option<Scalar>,
    /// Test identifier.
    #[serde(default)]
    pub test: Option<Scalar>,
    /// Thread count.
    #[serde(default)]
    pub threads: Option<Scalar>,
    /// Run number.
    #[serde(default)]
    pub run: Option<Scalar>,
    /// Measured result.
    #[serde(default)]
    pub result: Option<Scalar>,
}

impl RunSubmission {
    /// Check every field is present and well formed.
    pub fn validate(&self) -> Result<NewRun, ApiError> {
        Ok(NewRun {
            hostname: required(&self.hostname, "hostname")?.as_text(),
            test: required(&self.test, "test")?.as_text(),
            threads: parse_field(&self.threads, "threads")?,
            run: parse_field(&self.run, "run")?,
            result: parse_field(&self.result, "result")?,
        })
    }
}

fn required<'a>(field: &'a Option<Scalar>, name: &str) -> Result<&'a Scalar, ApiError> {
    field
        .as_ref()
        .ok_or_else(|| ApiError::BadRequest(format!("missing field '{name}'")))
}

fn parse_field<T: std::str::FromStr>(field: &Option<Scalar>, name: &str) -> Result<T, ApiError> {
    required(field, name)?
        .as_text()
        .trim()
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid value for '{name}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn submission(value: serde_json::Value) -> RunSubmission {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_string_fields_are_parsed() {
        let run = submission(json!({
            "hostname": "h1", "test": "cpu", "threads": "4", "run": "1", "result": "1.5"
        }))
        .validate()
        .unwrap();

        assert_eq!(
            run,
            NewRun {
                hostname: "h1".into(),
                test: "cpu".into(),
                threads: 4,
                run: 1,
                result: 1.5,
            }
        );
    }

    #[test]
    fn test_numeric_fields_are_accepted() {
        let run = submission(json!({
            "hostname": "h1", "test": "cpu", "threads": 8, "run": 2, "result": 3
        }))
        .validate()
        .unwrap();
        assert_eq!(run.threads, 8);
        assert_eq!(run.result, 3.0);
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let err = submission(json!({ "hostname": "h1", "test": "cpu", "threads": 4, "run": 1 }))
            .validate()
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(ref m) if m.contains("result")));
    }

    #[test]
    fn test_unparsable_field_is_rejected() {
        let err = submission(json!({
            "hostname": "h1", "test": "cpu", "threads": "many", "run": 1, "result": 1.0
        }))
        .validate()
        .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(ref m) if m.contains("threads")));
    }
}
