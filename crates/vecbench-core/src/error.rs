// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error taxonomy for vecbench.
//!
//! Every failure here is fatal by policy: a partially-trusted verdict map or
//! record stream is worse than none, so nothing is retried and no partial
//! report is ever written.

use thiserror::Error;

/// Result alias used across the vecbench crates.
pub type Result<T> = std::result::Result<T, VecbenchError>;

/// Errors produced while building verdicts, streaming benchmark output, or
/// persisting the report.
#[derive(Debug, Error)]
pub enum VecbenchError {
    /// The disassembly scanner was pointed at a binary whose instruction-set
    /// family it does not support.
    #[error(
        "unsupported target architecture {arch}: vector detection is implemented only for RISC-V binaries"
    )]
    UnsupportedArch {
        /// Architecture reported by the binary image.
        arch: String,
    },

    /// The executable image could not be read as a scannable binary: the
    /// file is unreadable, not ELF, or carries no symbol table.
    #[error("cannot scan binary {path}: {detail}")]
    BadBinary {
        /// Path of the binary under scan.
        path: String,
        /// What made it unscannable.
        detail: String,
    },

    /// A benchmark output line did not have the
    /// `<name> <duration> <checksum>` shape.
    #[error("malformed benchmark output line {line:?}: {reason}")]
    MalformedLine {
        /// The offending line, as read from the child process.
        line: String,
        /// What was wrong with it.
        reason: String,
    },

    /// An optimization-record document could not be interpreted.
    #[error("malformed optimization record: {0}")]
    MalformedRecord(String),

    /// The scalar and vector streams disagreed on the function under test,
    /// which invalidates every subsequent measurement.
    #[error("benchmark streams out of sync: scalar reported {scalar:?}, vector reported {vector:?}")]
    Misaligned {
        /// Function name reported by the scalar build.
        scalar: String,
        /// Function name reported by the vectorized build.
        vector: String,
    },

    /// One benchmark stream ended while the other was still producing
    /// records; the two binaries are not comparable builds of one suite.
    #[error("{side} benchmark stream ended early while the other side was still producing records")]
    UnevenStreams {
        /// Which stream ended first (`"scalar"` or `"vector"`).
        side: &'static str,
    },

    /// An external tool (disassembler or benchmark child process) failed.
    #[error("external tool failure: {0}")]
    ExternalTool(String),

    /// Failure reading or writing the report artifact.
    #[error("report artifact error: {0}")]
    Report(#[from] csv::Error),

    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
