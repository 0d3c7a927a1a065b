//! Benchmark record types.
//!
//! A [`BenchmarkRecord`] is one row served by the results API: the averaged
//! result of one test at one thread count on one machine. Rows arrive from a
//! remote service, so every field is optional and decoding never fails.
//!
//! Key fields (`test`, `threads`) of an unexpected JSON type are rendered the
//! way a browser's `toString` renders them, so `5` becomes `"5"` and `true`
//! becomes `"true"`. `average_result` is kept as the JSON value it arrived as.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use tracing::warn;

/// Thread count of a benchmark run.
///
/// The results API reports an integer, but older exports carry the count as
/// a string, so both shapes are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Threads {
    /// Integral thread count.
    Count(i64),
    /// Non-integral or out-of-range numeric count.
    Fractional(f64),
    /// Free-form label.
    Label(String),
}

impl Threads {
    /// Render the thread count as a report key.
    ///
    /// Numbers render like JavaScript's `Number.prototype.toString`: `4` and
    /// `4.0` share the key `"4"`, and `1e21` renders as `"1e+21"`.
    pub fn key(&self) -> String {
        match self {
            Threads::Count(n) => n.to_string(),
            Threads::Fractional(f) => float_key(*f),
            Threads::Label(label) => label.clone(),
        }
    }

    /// Read a thread count out of a JSON value.
    ///
    /// `null` yields `None`; booleans, arrays and objects become labels.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => match n.as_i64() {
                Some(count) => Some(Threads::Count(count)),
                None => n.as_f64().map(Threads::Fractional),
            },
            Value::String(label) => Some(Threads::Label(label.clone())),
            Value::Null => None,
            other => key_string(other).map(Threads::Label),
        }
    }
}

impl From<i64> for Threads {
    fn from(count: i64) -> Self {
        Threads::Count(count)
    }
}

impl From<&str> for Threads {
    fn from(label: &str) -> Self {
        Threads::Label(label.to_string())
    }
}

/// Render a JSON value as a mapping key.
///
/// Strings are used as-is, numbers and booleans in their JavaScript string
/// form, arrays and objects as compact JSON. `null` has no key.
pub fn key_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Number(n) => Some(number_key(n)),
        Value::Bool(b) => Some(b.to_string()),
        compound => Some(compound.to_string()),
    }
}

fn number_key(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    n.as_f64().map(float_key).unwrap_or_else(|| n.to_string())
}

/// Shortest round-trip rendering, switching to exponent form outside
/// `[1e-6, 1e21)` like JavaScript does.
fn float_key(f: f64) -> String {
    if f.is_nan() {
        return "NaN".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if f == 0.0 {
        return "0".to_string();
    }

    let magnitude = f.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return f.to_string();
    }

    let exponent_form = format!("{f:e}");
    match exponent_form.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => exponent_form,
    }
}

/// One benchmark result row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRecord {
    /// Test identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test: Option<String>,
    /// Thread count the test ran with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<Threads>,
    /// Mean of all recorded runs, exactly as received.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_result: Option<Value>,
    /// Machine that produced the result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
}

impl BenchmarkRecord {
    /// Create a fully populated record.
    pub fn new(
        test: impl Into<String>,
        threads: impl Into<Threads>,
        average_result: f64,
        hostname: impl Into<String>,
    ) -> Self {
        Self {
            test: Some(test.into()),
            threads: Some(threads.into()),
            average_result: Some(Value::from(average_result)),
            hostname: Some(hostname.into()),
        }
    }

    /// The average result, when it is a JSON number.
    pub fn average(&self) -> Option<f64> {
        self.average_result.as_ref().and_then(Value::as_f64)
    }

    /// Decode a record from an arbitrary JSON value.
    ///
    /// Absent fields become `None`. Present fields are never dropped: key
    /// fields are stringified and `average_result` is carried unchanged. A
    /// non-object value yields an empty record.
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::default();
        };

        Self {
            test: object.get("test").and_then(key_string),
            threads: object.get("threads").and_then(Threads::from_value),
            average_result: object.get("average_result").cloned(),
            hostname: object.get("hostname").and_then(key_string),
        }
    }
}

/// Decode every record of a response body.
///
/// An array yields one record per element, in order. Anything else carries
/// no records.
pub fn records_from_value(body: &Value) -> Vec<BenchmarkRecord> {
    match body {
        Value::Array(items) => items.iter().map(BenchmarkRecord::from_value).collect(),
        other => {
            warn!(kind = value_kind(other), "response body is not an array, no records decoded");
            Vec::new()
        }
    }
}

/// A single benchmark run submitted to the results API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRun {
    /// Machine that ran the benchmark.
    pub hostname: String,
    /// Test identifier.
    pub test: String,
    /// Thread count.
    pub threads: i32,
    /// Run number within a series.
    pub run: i32,
    /// Measured result.
    pub result: f64,
}

/// Acknowledgement of a stored run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedRun {
    /// Id assigned to the run.
    pub id: i64,
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
