// SPDX-License-Identifier: MIT OR Apache-2.0
//! Core types, error handling, and report artifacts for vecbench
//!
//! This crate provides the foundational types shared across the vecbench
//! workspace:
//!
//! - [`error`] - Error taxonomy and Result alias
//! - [`record`] - Per-function benchmark observations and aligned pairs
//! - [`verdict`] - Per-function vectorization verdicts with default-false lookup
//! - [`report`] - Persisted report rows and the CSV artifact

#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]

/// Error types for vecbench operations
pub mod error;
/// Benchmark observation types
pub mod record;
/// Report rows and CSV artifact I/O
pub mod report;
/// Vectorization verdict map
pub mod verdict;

// Re-exports for convenience
pub use error::{Result, VecbenchError};
pub use record::{BenchmarkRecord, RecordPair};
pub use report::{ReportRow, read_report, write_report};
pub use verdict::VerdictMap;
