// SPDX-License-Identifier: MIT OR Apache-2.0
//! Vectorization evidence sources for vecbench
//!
//! A build either vectorized a function or it did not, and there are two
//! places to find out:
//!
//! - [`optrecord`] - the compiler's YAML optimization-remark log, cheap to
//!   read but only as trustworthy as the compiler's own reporting
//! - [`binscan`] - a disassembly scan of the compiled ELF binary, expensive
//!   (one disassembler process per symbol) but authoritative
//!
//! Both backends implement [`EvidenceSource`] and produce the same
//! [`VerdictMap`]; callers pick one at configuration time and stay agnostic
//! afterwards.

#![deny(rust_2018_idioms)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]

/// Disassembly-scan evidence backend
pub mod binscan;
/// Optimization-record evidence backend
pub mod optrecord;

use vecbench_core::{Result, VerdictMap};

pub use binscan::{BinaryScanSource, DEFAULT_OBJDUMP};
pub use optrecord::{OptRecordParser, OptRecordSource, OptRemark, RECOGNIZED_REMARK_TAGS};

/// A strategy that determines, per function, whether the compiler emitted
/// vector code.
pub trait EvidenceSource {
    /// Builds the complete verdict map from this source's artifact.
    ///
    /// The map is built once per run and read-only afterwards; no partial
    /// map is ever returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact cannot be read or interpreted in
    /// full. All such failures are fatal to the run.
    fn verdicts(&self) -> Result<VerdictMap>;
}
