//! I/O operations for response bodies and reports.
//!
//! Saved response bodies let a report be rebuilt without the results API,
//! and a built report can be written next to them.

use crate::report::AggregatedReport;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::Path;

/// Read a saved response body.
pub fn read_body_json(path: impl AsRef<Path>) -> io::Result<Value> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Write a report as pretty-printed JSON, creating parent directories.
pub fn write_report_json(report: &AggregatedReport, path: impl AsRef<Path>) -> io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    fs::write(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{aggregate, records_from_value};

    #[test]
    fn test_report_from_saved_body() {
        let dir = tempfile::tempdir().unwrap();
        let body_path = dir.path().join("machines.json");
        fs::write(
            &body_path,
            r#"[{"test":"cpu","threads":4,"average_result":1.2,"hostname":"h1"}]"#,
        )
        .unwrap();

        let body = read_body_json(&body_path).unwrap();
        let report = aggregate(&records_from_value(&body));

        let out = dir.path().join("out/report.json");
        write_report_json(&report, &out).unwrap();

        let written: AggregatedReport =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(written, report);
        assert_eq!(written.entry_count(), 1);
    }

    #[test]
    fn test_invalid_body_is_invalid_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "not json").unwrap();

        let err = read_body_json(&path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
