//! Report flow: fetch once, regroup, log.
//!
//! A rejected fetch is shown to the user through an [`Alert`] and nothing is
//! aggregated. A successful one is logged raw, folded into an
//! [`AggregatedReport`] and logged again.

use crate::alert::Alert;
use pgrapher_benchmarks::io::read_body_json;
use pgrapher_benchmarks::{aggregate, records_from_value, AggregatedReport};
use pgrapher_client::{FetchError, GrapherClient};
use serde_json::Value;
use std::io;
use std::path::Path;
use tracing::{error, info, warn};

/// Fetch `path` and build its report.
///
/// Returns `None` after alerting when the fetch fails. A non-success status
/// is alerted as its bare numeric code.
pub async fn load_report(
    client: &GrapherClient,
    path: &str,
    alert: &dyn Alert,
) -> Option<AggregatedReport> {
    match client.fetch_report_body(path).await {
        Ok(body) => Some(build_report(&body)),
        Err(FetchError::Status(code)) => {
            warn!(status = code, path, "Report fetch rejected");
            alert.alert(&code.to_string());
            None
        }
        Err(err) => {
            error!(error = %err, path, "Report fetch failed");
            alert.alert(&err.to_string());
            None
        }
    }
}

/// Build a report from a response body already in hand.
pub fn build_report(body: &Value) -> AggregatedReport {
    info!(body = %body, "Response body");

    let records = records_from_value(body);
    let report = aggregate(&records);

    match report.to_json() {
        Ok(json) => info!(
            tests = report.tests().count(),
            entries = report.entry_count(),
            report = %json,
            "Aggregated report"
        ),
        Err(err) => warn!(error = %err, "Aggregated report could not be serialized"),
    }

    report
}

/// Build a report from a saved response body.
pub fn report_from_file(path: &Path) -> io::Result<AggregatedReport> {
    let body = read_body_json(path)?;
    Ok(build_report(&body))
}
