// SPDX-License-Identifier: MIT OR Apache-2.0
//! # vecbench-cli
//!
//! Command-line harness comparing a scalar and an auto-vectorized build of
//! the same benchmark suite.
//!
//! ## Usage
//!
//! ```bash
//! # Build the suite in ./TSVC_2 and compare the default binaries,
//! # reading vectorization verdicts from the compiler's remark log
//! vecbench
//!
//! # Compare pre-built binaries; verdicts come from disassembling the
//! # vectorized binary instead of the remark log
//! vecbench --scalar-binary scalar.elf --vector-binary vector.elf
//!
//! # Rebuild everything and write the report elsewhere
//! vecbench -B -o results/run1.csv
//! ```
//!
//! One line is printed per benchmark function as both builds report it:
//! checksum agreement, whether the compiler vectorized the function, and
//! the measured speedup. The full table is persisted as CSV when the run
//! completes.

#![warn(missing_docs)]

use clap::Parser;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;
use vecbench_oracle::{BinaryScanSource, DEFAULT_OBJDUMP, EvidenceSource, OptRecordSource};
use vecbench_report::ReportSynthesizer;
use vecbench_stream::PairedRun;

/// Build-system invocation for the benchmark suite
pub mod buildsys;

/// Optimization-record log the suite build drops for the vectorized
/// object, relative to the suite root.
const DEFAULT_OPT_RECORD: &str = "src/tsvc_vec.o_default.opt.yml";
/// Directory the suite build places its binaries in, relative to the suite
/// root.
const BINARY_SUBDIR: &str = "bin/tsvc-runner";
const DEFAULT_SCALAR_BINARY: &str = "tsvc_novec_default";
const DEFAULT_VECTOR_BINARY: &str = "tsvc_vec_default";

/// Command-line arguments for the vecbench harness.
#[derive(Parser, Debug)]
#[command(name = "vecbench")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Root directory of the benchmark suite
    #[arg(long = "suite-root", default_value = "./TSVC_2")]
    pub suite_root: PathBuf,

    /// User-specified makefile for building the suite
    #[arg(short, long, default_value = "./Makefile")]
    pub makefile: PathBuf,

    /// Pre-built scalar binary
    #[arg(long = "scalar-binary")]
    pub scalar_binary: Option<PathBuf>,

    /// Pre-built vectorized binary; when given, vectorization verdicts come
    /// from disassembling it rather than from the remark log
    #[arg(long = "vector-binary")]
    pub vector_binary: Option<PathBuf>,

    /// objdump command for disassembly
    #[arg(long = "objdump-command", default_value = DEFAULT_OBJDUMP)]
    pub objdump_command: String,

    /// Rebuild the whole suite from clean
    #[arg(short = 'B', long = "rebuild-all")]
    pub rebuild_all: bool,

    /// Report output path
    #[arg(short, long, default_value = "benchmark_result.csv")]
    pub output: PathBuf,
}

/// Which evidence source a given invocation uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OracleChoice {
    /// Parse the compiler's optimization-remark log at this path.
    OptRecord(PathBuf),
    /// Disassemble this binary with the given objdump command.
    BinaryScan(PathBuf, String),
}

impl OracleChoice {
    /// Selects the evidence source for the given arguments.
    ///
    /// A caller-supplied vectorized binary was built outside this run, so
    /// no remark log can be trusted to describe it; the binary itself is
    /// scanned instead. Otherwise the log the suite build just produced is
    /// read.
    #[must_use]
    pub fn from_args(args: &Args) -> Self {
        args.vector_binary.as_ref().map_or_else(
            || Self::OptRecord(args.suite_root.join(DEFAULT_OPT_RECORD)),
            |binary| Self::BinaryScan(binary.clone(), args.objdump_command.clone()),
        )
    }

    fn into_source(self) -> Box<dyn EvidenceSource> {
        match self {
            Self::OptRecord(path) => Box::new(OptRecordSource::new(path)),
            Self::BinaryScan(binary, objdump) => Box::new(BinaryScanSource::new(binary, objdump)),
        }
    }
}

/// Parses arguments, initializes logging, and executes the run.
///
/// # Errors
///
/// Returns any build, oracle, pipeline, or report error; the caller prints
/// it and exits nonzero.
pub fn run() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();
    execute(&args)
}

/// Executes one full comparison run for already-parsed arguments.
///
/// # Errors
///
/// Returns any build, oracle, pipeline, or report error.
pub fn execute(args: &Args) -> anyhow::Result<()> {
    if args.scalar_binary.is_none() || args.vector_binary.is_none() {
        buildsys::build_suite(&args.suite_root, &args.makefile, args.rebuild_all)?;
    }

    let verdicts = OracleChoice::from_args(args).into_source().verdicts()?;

    let scalar = binary_path(args.scalar_binary.as_deref(), &args.suite_root, DEFAULT_SCALAR_BINARY);
    let vector = binary_path(args.vector_binary.as_deref(), &args.suite_root, DEFAULT_VECTOR_BINARY);

    let pairs = PairedRun::launch(&scalar, &vector)?;
    let stdout = io::stdout();
    let synthesizer = ReportSynthesizer::new(verdicts, stdout.lock());
    let rows = synthesizer.run(pairs, &args.output)?;

    info!(
        functions = rows.len(),
        report = %args.output.display(),
        "comparison run complete"
    );
    Ok(())
}

fn binary_path(explicit: Option<&Path>, suite_root: &Path, default_name: &str) -> PathBuf {
    explicit.map_or_else(
        || suite_root.join(BINARY_SUBDIR).join(default_name),
        Path::to_path_buf,
    )
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_arguments() {
        let args = Args::try_parse_from(["vecbench"]).unwrap();
        assert_eq!(args.suite_root, PathBuf::from("./TSVC_2"));
        assert_eq!(args.objdump_command, DEFAULT_OBJDUMP);
        assert_eq!(args.output, PathBuf::from("benchmark_result.csv"));
        assert!(!args.rebuild_all);
    }

    #[test]
    fn test_log_oracle_is_the_default() {
        let args = Args::try_parse_from(["vecbench", "--suite-root", "/suite"]).unwrap();
        assert_eq!(
            OracleChoice::from_args(&args),
            OracleChoice::OptRecord(PathBuf::from("/suite/src/tsvc_vec.o_default.opt.yml"))
        );
    }

    #[test]
    fn test_external_vector_binary_switches_to_binary_scan() {
        let args = Args::try_parse_from([
            "vecbench",
            "--vector-binary",
            "/bin/vec.elf",
            "--objdump-command",
            "llvm-objdump",
        ])
        .unwrap();
        assert_eq!(
            OracleChoice::from_args(&args),
            OracleChoice::BinaryScan(PathBuf::from("/bin/vec.elf"), "llvm-objdump".to_owned())
        );
    }

    #[test]
    fn test_default_binary_locations_under_suite_root() {
        let path = binary_path(None, Path::new("/suite"), DEFAULT_SCALAR_BINARY);
        assert_eq!(path, PathBuf::from("/suite/bin/tsvc-runner/tsvc_novec_default"));
        let explicit = binary_path(Some(Path::new("/elsewhere/s.elf")), Path::new("/suite"), DEFAULT_SCALAR_BINARY);
        assert_eq!(explicit, PathBuf::from("/elsewhere/s.elf"));
    }
}
