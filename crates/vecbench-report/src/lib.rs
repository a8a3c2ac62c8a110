// SPDX-License-Identifier: MIT OR Apache-2.0
//! Result synthesis, classification, and live reporting for vecbench
//!
//! Consumes the paired record sequence together with the verdict map,
//! checks correctness, computes and classifies speedups, prints one live
//! console line per function, and persists the accumulated rows as the CSV
//! artifact once the sequence is exhausted.

#![deny(rust_2018_idioms)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]

/// Speedup computation and classification
pub mod speedup;
/// The report synthesizer
pub mod synthesize;

pub use speedup::{Classification, Speedup};
pub use synthesize::ReportSynthesizer;
