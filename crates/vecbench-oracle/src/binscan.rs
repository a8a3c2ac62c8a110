// SPDX-License-Identifier: MIT OR Apache-2.0
//! Disassembly-scan evidence backend.
//!
//! Reads the vectorized ELF binary itself: every named symbol in the symbol
//! table is disassembled with an external objdump and the text is searched
//! for the RISC-V vector-configuration mnemonics (`vsetvl`, `vsetvli`,
//! `vsetivli`). A function that executes vector instructions must configure
//! the vector unit first, so the `vset*` family is a reliable signature.
//!
//! This is the expensive path (one disassembler process per symbol) but it
//! reflects what the compiler actually emitted, not what it reported.

use object::{Architecture, Object as _, ObjectSymbol as _};
use regex::bytes::Regex;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;
use tracing::{debug, info};
use vecbench_core::{Result, VecbenchError, VerdictMap};

use crate::EvidenceSource;

/// Default disassembler command for RISC-V cross toolchains.
pub const DEFAULT_OBJDUMP: &str = "riscv64-unknown-linux-gnu-objdump";

static VECTOR_MNEMONIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"vseti?vli?").expect("vector mnemonic pattern"));

/// Evidence source backed by disassembly of the compiled binary.
#[derive(Debug, Clone)]
pub struct BinaryScanSource {
    binary: PathBuf,
    objdump: String,
}

impl BinaryScanSource {
    /// Creates a scanner for `binary` using the given objdump command.
    pub fn new(binary: impl Into<PathBuf>, objdump: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            objdump: objdump.into(),
        }
    }

    fn scan(&self) -> Result<VerdictMap> {
        let data = std::fs::read(&self.binary)?;
        let image = object::File::parse(&*data).map_err(|e| VecbenchError::BadBinary {
            path: self.binary.display().to_string(),
            detail: e.to_string(),
        })?;

        let arch = image.architecture();
        if !matches!(arch, Architecture::Riscv32 | Architecture::Riscv64) {
            return Err(VecbenchError::UnsupportedArch {
                arch: format!("{arch:?}"),
            });
        }

        if image.symbol_table().is_none() {
            return Err(VecbenchError::BadBinary {
                path: self.binary.display().to_string(),
                detail: "no symbol table".to_owned(),
            });
        }

        let mut verdicts = VerdictMap::new();
        for symbol in image.symbols() {
            let Ok(name) = symbol.name() else {
                continue;
            };
            if name.is_empty() {
                continue;
            }
            let vectorized = self.symbol_uses_vector_unit(name)?;
            debug!(symbol = name, vectorized, "disassembled symbol");
            verdicts.record(name, vectorized);
        }

        info!(
            binary = %self.binary.display(),
            symbols = verdicts.len(),
            vectorized = verdicts.vectorized_count(),
            "derived verdicts from binary scan"
        );
        Ok(verdicts)
    }

    /// Disassembles one symbol's code in the executable section and tests
    /// it for the vector-instruction signature.
    fn symbol_uses_vector_unit(&self, symbol: &str) -> Result<bool> {
        let output = Command::new(&self.objdump)
            .args(["-j", ".text", "-D"])
            .arg(format!("--disassemble={symbol}"))
            .arg(&self.binary)
            .output()
            .map_err(|e| {
                VecbenchError::ExternalTool(format!("failed to launch {}: {e}", self.objdump))
            })?;
        if !output.status.success() {
            return Err(VecbenchError::ExternalTool(format!(
                "{} {} for symbol {symbol}: {}",
                self.objdump,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(contains_vector_mnemonic(&output.stdout))
    }
}

impl EvidenceSource for BinaryScanSource {
    fn verdicts(&self) -> Result<VerdictMap> {
        self.scan()
    }
}

/// Whether disassembly text contains a vector-configuration mnemonic.
#[must_use]
pub fn contains_vector_mnemonic(disassembly: &[u8]) -> bool {
    VECTOR_MNEMONIC.is_match(disassembly)
}

/// Reads only the binary's architecture gate, without scanning symbols.
///
/// Useful for failing fast before any measurement is taken.
///
/// # Errors
///
/// Returns [`VecbenchError::BadBinary`] for unreadable or non-ELF input and
/// [`VecbenchError::UnsupportedArch`] for non-RISC-V machines.
pub fn check_supported_arch(binary: &Path) -> Result<()> {
    let data = std::fs::read(binary)?;
    let image = object::File::parse(&*data).map_err(|e| VecbenchError::BadBinary {
        path: binary.display().to_string(),
        detail: e.to_string(),
    })?;
    let arch = image.architecture();
    if matches!(arch, Architecture::Riscv32 | Architecture::Riscv64) {
        Ok(())
    } else {
        Err(VecbenchError::UnsupportedArch {
            arch: format!("{arch:?}"),
        })
    }
}
