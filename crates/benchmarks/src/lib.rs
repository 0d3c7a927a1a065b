//! Benchmark records and report aggregation for pgrapher.
//!
//! This crate holds the data model shared by the client and the results
//! API, and the aggregation that regroups result rows by test name and
//! thread count.
//!
//! # Quick Start
//!
//! ```
//! use pgrapher_benchmarks::{aggregate, BenchmarkRecord};
//!
//! let records = vec![
//!     BenchmarkRecord::new("cpu", 4, 1.2, "h1"),
//!     BenchmarkRecord::new("cpu", 4, 1.5, "h2"),
//! ];
//!
//! let report = aggregate(&records);
//! assert_eq!(report.bucket("cpu", "4").map(<[_]>::len), Some(2));
//! ```
//!
//! # Modules
//!
//! - [`record`] - The `BenchmarkRecord` input row
//! - [`report`] - `AggregatedReport` and the aggregation itself
//! - [`io`] - Reading saved bodies and writing reports

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod io;
pub mod record;
pub mod report;

pub use record::{
    key_string, records_from_value, BenchmarkRecord, NewRun, SubmittedRun, Threads,
};
pub use report::{aggregate, AggregatedReport, ResultEntry, ThreadKey, MISSING_KEY};
