// SPDX-License-Identifier: MIT OR Apache-2.0
//! Lockstep pairing of two benchmark streams.
//!
//! Both binaries iterate the identical, deterministic function list, so
//! their record streams pair positionally: one blocking receive per side
//! per step, no reordering, no buffering beyond the single in-flight record
//! each side holds. A slow producer on either side stalls the whole
//! pipeline, which keeps the paired measurements temporally aligned.

use std::path::Path;
use tracing::info;
use vecbench_core::{RecordPair, Result, VecbenchError};

use crate::runner::{BenchmarkRunner, RunnerEvent};

/// A pair of concurrently running benchmark binaries, iterated as a lazy,
/// finite sequence of aligned record pairs.
///
/// Iteration ends after the terminal marker arrives on both sides, at which
/// point both children have been waited on. Any error is terminal: it is
/// yielded once and the sequence ends.
pub struct PairedRun {
    scalar: Option<BenchmarkRunner>,
    vector: Option<BenchmarkRunner>,
    failed: bool,
}

impl PairedRun {
    /// Launches the scalar and vectorized binaries concurrently.
    ///
    /// # Errors
    ///
    /// Returns an error if either binary cannot be launched; a half-started
    /// run is torn down before returning.
    pub fn launch(scalar_binary: &Path, vector_binary: &Path) -> Result<Self> {
        let scalar = BenchmarkRunner::launch(scalar_binary)?;
        let vector = match BenchmarkRunner::launch(vector_binary) {
            Ok(vector) => vector,
            Err(e) => {
                scalar.abort();
                return Err(e);
            }
        };
        info!(
            scalar = %scalar_binary.display(),
            vector = %vector_binary.display(),
            "benchmark pair running"
        );
        Ok(Self {
            scalar: Some(scalar),
            vector: Some(vector),
            failed: false,
        })
    }

    /// Tears both runners down without waiting for more output.
    fn fail(&mut self) {
        self.failed = true;
        if let Some(runner) = self.scalar.take() {
            runner.abort();
        }
        if let Some(runner) = self.vector.take() {
            runner.abort();
        }
    }

    /// Normal end of sequence: waits for both children to exit.
    fn shutdown(&mut self) -> Result<()> {
        let mut outcome = Ok(());
        for runner in [self.scalar.take(), self.vector.take()].into_iter().flatten() {
            let result = runner.finish();
            if outcome.is_ok()
                && let Err(e) = result
            {
                outcome = Err(e);
            }
        }
        outcome
    }

    /// A producer dropped its channel without the terminal marker; finish
    /// it to recover the underlying error and tear down the other side.
    fn recover_failure(&mut self, side: &'static str) -> VecbenchError {
        self.failed = true;
        let (dead, healthy) = if side == "scalar" {
            (self.scalar.take(), self.vector.take())
        } else {
            (self.vector.take(), self.scalar.take())
        };
        if let Some(runner) = healthy {
            runner.abort();
        }
        match dead.map(BenchmarkRunner::finish) {
            Some(Err(e)) => e,
            _ => VecbenchError::ExternalTool(format!(
                "{side} benchmark stream closed without a terminal marker"
            )),
        }
    }
}

impl Iterator for PairedRun {
    type Item = Result<RecordPair>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.scalar.is_none() {
            return None;
        }
        let scalar_event = self.scalar.as_ref().and_then(BenchmarkRunner::recv_event);
        let vector_event = self.vector.as_ref().and_then(BenchmarkRunner::recv_event);

        match (scalar_event, vector_event) {
            (Some(RunnerEvent::Record(scalar)), Some(RunnerEvent::Record(vector))) => {
                match RecordPair::try_new(scalar, vector) {
                    Ok(pair) => Some(Ok(pair)),
                    Err(e) => {
                        self.fail();
                        Some(Err(e))
                    }
                }
            }
            (Some(RunnerEvent::Finished), Some(RunnerEvent::Finished)) => {
                match self.shutdown() {
                    Ok(()) => None,
                    Err(e) => {
                        self.failed = true;
                        Some(Err(e))
                    }
                }
            }
            (Some(RunnerEvent::Finished), Some(RunnerEvent::Record(_))) => {
                self.fail();
                Some(Err(VecbenchError::UnevenStreams { side: "scalar" }))
            }
            (Some(RunnerEvent::Record(_)), Some(RunnerEvent::Finished)) => {
                self.fail();
                Some(Err(VecbenchError::UnevenStreams { side: "vector" }))
            }
            (None, _) => Some(Err(self.recover_failure("scalar"))),
            (_, None) => Some(Err(self.recover_failure("vector"))),
        }
    }
}
