// SPDX-License-Identifier: MIT OR Apache-2.0
//! The report synthesizer.
//!
//! One live console line per function as each pair arrives, one
//! [`ReportRow`] accumulated per function, and the CSV artifact written only
//! after the whole sequence completed. A failed run writes no artifact.

use colored::Colorize as _;
use std::io::Write;
use std::path::Path;
use tracing::debug;
use vecbench_core::{RecordPair, ReportRow, Result, VerdictMap, write_report};

use crate::speedup::{Classification, Speedup};

/// Consumes aligned record pairs and produces the run's report.
pub struct ReportSynthesizer<W: Write> {
    verdicts: VerdictMap,
    console: W,
    rows: Vec<ReportRow>,
}

impl<W: Write> ReportSynthesizer<W> {
    /// Creates a synthesizer owning the run's verdict map, writing live
    /// output to `console`.
    pub fn new(verdicts: VerdictMap, console: W) -> Self {
        Self {
            verdicts,
            console,
            rows: Vec::new(),
        }
    }

    /// Processes one aligned pair: checks correctness, classifies speedup,
    /// prints the live line, and accumulates the report row.
    ///
    /// # Errors
    ///
    /// Returns an error only if the console sink fails.
    pub fn process(&mut self, pair: &RecordPair) -> Result<()> {
        let function_name = pair.function_name();
        let checksum_match = pair.scalar.checksum == pair.vector.checksum;
        let vectorized = self.verdicts.is_vectorized(function_name);
        let speedup = Speedup::compute(pair.scalar.duration, pair.vector.duration);

        let correctness = if checksum_match {
            "OK".normal()
        } else {
            "MISMATCH".red()
        };
        let emitted = if vectorized {
            "AUTOVEC".green()
        } else {
            "NOVEC".yellow()
        };
        let speedup_text = speedup.to_string();
        let speedup_marker = match speedup.classify() {
            Classification::Regression => speedup_text.red(),
            Classification::Exceptional => speedup_text.cyan(),
            Classification::Neutral | Classification::Undefined => speedup_text.normal(),
        };
        writeln!(
            self.console,
            "{function_name}:\t{correctness}\t{emitted}\t{speedup_marker}"
        )?;

        debug!(function = function_name, checksum_match, vectorized, %speedup, "pair processed");
        self.rows.push(ReportRow {
            function_name: function_name.to_owned(),
            checksum_match,
            vectorized,
            scalar_duration: pair.scalar.duration,
            vector_duration: pair.vector.duration,
        });
        Ok(())
    }

    /// Rows accumulated so far, in processing order.
    #[must_use]
    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    /// Consumes the whole paired sequence, then persists the artifact.
    ///
    /// # Errors
    ///
    /// Propagates the first pipeline or console error without writing the
    /// artifact; persisting the artifact itself can also fail.
    pub fn run<I>(mut self, pairs: I, artifact: &Path) -> Result<Vec<ReportRow>>
    where
        I: IntoIterator<Item = Result<RecordPair>>,
    {
        for pair in pairs {
            self.process(&pair?)?;
        }
        write_report(artifact, &self.rows)?;
        Ok(self.rows)
    }
}
