// SPDX-License-Identifier: MIT OR Apache-2.0
//! Build-system invocation for the benchmark suite.
//!
//! The suite ships its own makefile machinery; this harness only drops the
//! caller's makefile into place and drives `make` with the variables that
//! select the harness compiler configuration and enable vectorization
//! remark output.

use anyhow::{Context as _, bail};
use std::path::Path;
use std::process::Command;
use tracing::info;

/// Location the caller's makefile is copied to, relative to the suite root.
const RUNNER_MAKEFILE: &str = "makefiles/Makefile.tsvc-runner";

const MAKE_VARS: [&str; 2] = ["COMPILER=tsvc-runner", "VEC_REPORT=1"];

/// Copies `makefile` into the suite tree and builds both benchmark
/// binaries, preceded by `make clean` when `rebuild_all` is set.
///
/// # Errors
///
/// Returns an error if the makefile cannot be copied or any `make`
/// invocation fails to spawn or exits nonzero.
pub fn build_suite(suite_root: &Path, makefile: &Path, rebuild_all: bool) -> anyhow::Result<()> {
    let target = suite_root.join(RUNNER_MAKEFILE);
    std::fs::copy(makefile, &target).with_context(|| {
        format!(
            "copying makefile {} to {}",
            makefile.display(),
            target.display()
        )
    })?;

    if rebuild_all {
        run_make(suite_root, &["clean"])?;
    }
    run_make(suite_root, &MAKE_VARS)
}

fn run_make(suite_root: &Path, args: &[&str]) -> anyhow::Result<()> {
    info!(?args, cwd = %suite_root.display(), "invoking make");
    let status = Command::new("make")
        .args(args)
        .current_dir(suite_root)
        .status()
        .with_context(|| format!("failed to invoke make in {}", suite_root.display()))?;
    if !status.success() {
        bail!("make {} failed: {status}", args.join(" "));
    }
    Ok(())
}
