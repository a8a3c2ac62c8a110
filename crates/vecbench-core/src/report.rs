// SPDX-License-Identifier: MIT OR Apache-2.0
//! Report rows and the persisted CSV artifact.
//!
//! The artifact is a bare delimited table, one row per benchmark function in
//! processing order, with no header line:
//!
//! ```text
//! s000,true,true,2.5,0.5
//! ```

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One persisted line of the comparison report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    /// Benchmark function identifier.
    pub function_name: String,
    /// Whether both builds produced the same checksum.
    pub checksum_match: bool,
    /// Whether the compiler actually emitted vector code for this function.
    pub vectorized: bool,
    /// Scalar build duration in seconds.
    pub scalar_duration: f64,
    /// Vectorized build duration in seconds.
    pub vector_duration: f64,
}

/// Writes the report artifact, one CSV row per function, in the order given.
///
/// # Errors
///
/// Returns an error if the file cannot be created or a row fails to
/// serialize.
pub fn write_report(path: &Path, rows: &[ReportRow]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads a report artifact back into rows.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or a row does not
/// deserialize into the report column shape.
pub fn read_report(path: &Path) -> Result<Vec<ReportRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rows() -> Vec<ReportRow> {
        vec![
            ReportRow {
                function_name: "s000".to_owned(),
                checksum_match: true,
                vectorized: true,
                scalar_duration: 2.5,
                vector_duration: 0.5,
            },
            ReportRow {
                function_name: "s1115".to_owned(),
                checksum_match: false,
                vectorized: false,
                scalar_duration: 1.0,
                vector_duration: 1.0,
            },
        ]
    }

    #[test]
    fn test_report_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("benchmark_result.csv");
        let rows = sample_rows();

        write_report(&path, &rows).unwrap();
        let reread = read_report(&path).unwrap();
        assert_eq!(reread, rows);
    }

    #[test]
    fn test_report_has_no_header_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("benchmark_result.csv");

        write_report(&path, &sample_rows()).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("s000,"));
        assert_eq!(raw.lines().count(), 2);
    }

    #[test]
    fn test_empty_report_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");

        write_report(&path, &[]).unwrap();
        assert!(read_report(&path).unwrap().is_empty());
    }
}
