//! Aggregated benchmark reports.
//!
//! [`aggregate`] folds a flat list of [`BenchmarkRecord`]s into an
//! [`AggregatedReport`]: test name, then thread count, then the ordered
//! results of every machine that ran that combination.

use crate::record::{BenchmarkRecord, Threads};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Key used for records that carry no test name or no thread count.
pub const MISSING_KEY: &str = "undefined";

/// Thread-count key of a report.
///
/// Keys that are array indices (canonical integers from `0` to `2^32 - 2`)
/// sort numerically and come before every other key; the rest sort
/// lexically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadKey(String);

impl ThreadKey {
    /// Create a key from its rendered form.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Get the key as a string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Array-index keys (`0` to `2^32 - 2`, no leading zeros) order
    /// numerically.
    fn index(&self) -> Option<u32> {
        let n: u32 = self.0.parse().ok()?;
        (n != u32::MAX && n.to_string() == self.0).then_some(n)
    }
}

impl Ord for ThreadKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.index(), other.index()) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for ThreadKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ThreadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One machine's result inside a bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEntry {
    /// Machine that produced the result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// Averaged result, carried through unchanged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

/// Results grouped by test name and thread count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregatedReport {
    tests: BTreeMap<String, BTreeMap<ThreadKey, Vec<ResultEntry>>>,
}

impl AggregatedReport {
    /// Test names in key order.
    pub fn tests(&self) -> impl Iterator<Item = &str> {
        self.tests.keys().map(String::as_str)
    }

    /// Thread-count buckets of one test.
    pub fn thread_buckets(&self, test: &str) -> Option<&BTreeMap<ThreadKey, Vec<ResultEntry>>> {
        self.tests.get(test)
    }

    /// The bucket for a `(test, threads)` pair.
    pub fn bucket(&self, test: &str, threads: &str) -> Option<&[ResultEntry]> {
        self.tests
            .get(test)?
            .get(&ThreadKey::new(threads))
            .map(Vec::as_slice)
    }

    /// Total number of result entries across all buckets.
    pub fn entry_count(&self) -> usize {
        self.tests
            .values()
            .flat_map(BTreeMap::values)
            .map(Vec::len)
            .sum()
    }

    /// Whether the report holds no buckets.
    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    /// Serialize the report into a JSON value.
    pub fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    fn push(&mut self, record: &BenchmarkRecord) {
        let test = record
            .test
            .clone()
            .unwrap_or_else(|| MISSING_KEY.to_string());
        let threads = record
            .threads
            .as_ref()
            .map(Threads::key)
            .unwrap_or_else(|| MISSING_KEY.to_string());

        self.tests
            .entry(test)
            .or_default()
            .entry(ThreadKey::new(threads))
            .or_default()
            .push(ResultEntry {
                hostname: record.hostname.clone(),
                result: record.average_result.clone(),
            });
    }
}

/// Fold records into a report.
///
/// Each record appends exactly one entry to its `(test, threads)` bucket, in
/// input order. Buckets are created on first use and entries are never
/// merged, even when hostname and result repeat.
pub fn aggregate(records: &[BenchmarkRecord]) -> AggregatedReport {
    let mut report = AggregatedReport::default();
    for record in records {
        report.push(record);
    }

    debug!(
        records = records.len(),
        tests = report.tests.len(),
        "aggregated benchmark records"
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::records_from_value;
    use serde_json::json;

    fn sample() -> Vec<BenchmarkRecord> {
        vec![
            BenchmarkRecord::new("cpu", 4, 1.2, "h1"),
            BenchmarkRecord::new("cpu", 4, 1.5, "h2"),
            BenchmarkRecord::new("io", 2, 3.0, "h1"),
        ]
    }

    #[test]
    fn test_aggregate_groups_by_test_and_threads() {
        let report = aggregate(&sample());

        assert_eq!(
            report.to_json().unwrap(),
            json!({
                "cpu": { "4": [
                    { "hostname": "h1", "result": 1.2 },
                    { "hostname": "h2", "result": 1.5 }
                ]},
                "io": { "2": [{ "hostname": "h1", "result": 3.0 }] }
            })
        );
    }

    #[test]
    fn test_every_record_lands_in_one_bucket() {
        let mut records = sample();
        records.push(BenchmarkRecord::new("cpu", 8, 0.9, "h1"));
        records.push(BenchmarkRecord::new("cpu", 4, 1.2, "h1"));

        let report = aggregate(&records);
        assert_eq!(report.entry_count(), records.len());
        assert_eq!(report.bucket("cpu", "4").map(<[_]>::len), Some(3));
        assert_eq!(report.bucket("cpu", "8").map(<[_]>::len), Some(1));
    }

    #[test]
    fn test_bucket_preserves_input_order() {
        let records: Vec<_> = ["h3", "h1", "h2", "h1"]
            .iter()
            .enumerate()
            .map(|(i, host)| BenchmarkRecord::new("mem", 1, i as f64, *host))
            .collect();

        let report = aggregate(&records);
        let hosts: Vec<_> = report
            .bucket("mem", "1")
            .unwrap()
            .iter()
            .map(|entry| entry.hostname.as_deref().unwrap())
            .collect();
        assert_eq!(hosts, ["h3", "h1", "h2", "h1"]);
    }

    #[test]
    fn test_aggregate_is_repeatable() {
        let records = sample();
        assert_eq!(aggregate(&records), aggregate(&records));
    }

    #[test]
    fn test_empty_input() {
        let report = aggregate(&[]);
        assert!(report.is_empty());
        assert_eq!(report.entry_count(), 0);
        assert_eq!(report.to_json().unwrap(), json!({}));
    }

    #[test]
    fn test_missing_fields_are_carried_through() {
        let records = vec![
            BenchmarkRecord {
                test: Some("cpu".into()),
                threads: Some(Threads::Count(2)),
                ..Default::default()
            },
            BenchmarkRecord {
                hostname: Some("h9".into()),
                average_result: Some(json!(7.5)),
                ..Default::default()
            },
        ];

        let report = aggregate(&records);
        assert_eq!(report.entry_count(), 2);
        assert_eq!(
            report.bucket("cpu", "2").unwrap(),
            [ResultEntry { hostname: None, result: None }]
        );
        assert_eq!(
            report.bucket(MISSING_KEY, MISSING_KEY).unwrap()[0].hostname.as_deref(),
            Some("h9")
        );
        assert_eq!(
            report.to_json().unwrap()["cpu"]["2"],
            json!([{}])
        );
    }

    #[test]
    fn test_numeric_and_string_threads_share_a_bucket() {
        let records = vec![
            BenchmarkRecord::new("cpu", 4, 1.0, "h1"),
            BenchmarkRecord::new("cpu", "4", 2.0, "h2"),
            BenchmarkRecord {
                threads: Some(Threads::Fractional(4.0)),
                ..BenchmarkRecord::new("cpu", 0, 3.0, "h3")
            },
        ];

        let report = aggregate(&records);
        assert_eq!(report.bucket("cpu", "4").map(<[_]>::len), Some(3));
    }

    #[test]
    fn test_thread_keys_order_numerically() {
        let records: Vec<_> = ["16", "2", "abc", "1", "02"]
            .iter()
            .map(|t| BenchmarkRecord::new("cpu", *t, 1.0, "h1"))
            .collect();

        let report = aggregate(&records);
        let keys: Vec<_> = report
            .thread_buckets("cpu")
            .unwrap()
            .keys()
            .map(ThreadKey::as_str)
            .collect();
        assert_eq!(keys, ["1", "2", "16", "02", "abc"]);
    }

    #[test]
    fn test_keys_past_the_array_index_range_order_lexically() {
        let records: Vec<_> = ["4294967295", "abc", "4294967294", "10", "18446744073709551616"]
            .iter()
            .map(|t| BenchmarkRecord::new("cpu", *t, 1.0, "h1"))
            .collect();

        let report = aggregate(&records);
        let keys: Vec<_> = report
            .thread_buckets("cpu")
            .unwrap()
            .keys()
            .map(ThreadKey::as_str)
            .collect();
        assert_eq!(
            keys,
            ["10", "4294967294", "18446744073709551616", "4294967295", "abc"]
        );
    }

    #[test]
    fn test_mistyped_fields_keep_their_bucket() {
        let body = json!([
            { "test": "cpu", "threads": 4, "average_result": "1.5", "hostname": "h1" },
            { "test": 5, "threads": true, "average_result": 2.0, "hostname": "h2" }
        ]);

        let report = aggregate(&records_from_value(&body));
        assert_eq!(report.entry_count(), 2);
        assert_eq!(
            report.to_json().unwrap(),
            json!({
                "cpu": { "4": [{ "hostname": "h1", "result": "1.5" }] },
                "5": { "true": [{ "hostname": "h2", "result": 2.0 }] }
            })
        );
    }

    #[test]
    fn test_report_round_trips_through_json() {
        let report = aggregate(&sample());
        let text = serde_json::to_string(&report).unwrap();
        let back: AggregatedReport = serde_json::from_str(&text).unwrap();
        assert_eq!(back, report);
    }
}
