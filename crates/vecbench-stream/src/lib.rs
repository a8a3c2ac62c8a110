// SPDX-License-Identifier: MIT OR Apache-2.0
//! Benchmark process supervision and lockstep result pairing for vecbench
//!
//! The scalar and the vectorized benchmark binary run as genuinely
//! concurrent child processes, each supervised by an OS thread that parses
//! its output into records and forwards them over a channel with an
//! explicit terminal marker. The pairing layer performs a blocking receive
//! from each side in turn, yielding aligned record pairs in the order the
//! two suites report them.

#![deny(rust_2018_idioms)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]

/// Lockstep pairing of two benchmark streams
pub mod pairing;
/// Single benchmark child process supervision
pub mod runner;

pub use pairing::PairedRun;
pub use runner::{BANNER_PREFIX, BenchmarkRunner, RunnerEvent};
