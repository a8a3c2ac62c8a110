// SPDX-License-Identifier: MIT OR Apache-2.0
//! vecbench CLI entry point.

fn main() {
    if let Err(e) = vecbench_cli::run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
