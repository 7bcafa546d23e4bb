//! Register File Aggregate.
//!
//! This module provides `RegisterFile`, which groups the integer, floating-point and
//! vector register files of one hart. It provides:
//! 1. **Unified Storage:** All architectural data registers in one snapshot-able value.
//! 2. **Abstraction:** A single set of methods for reading and writing register values.
//! 3. **Observability:** A register dump for tracing.

use crate::core::arch::fpr::Fpr;
use crate::core::arch::gpr::Gpr;
use crate::core::arch::vreg::VectorRegFile;

/// Integer, floating-point and vector registers of one hart.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterFile {
    gpr: Gpr,
    fpr: Fpr,
    vregs: VectorRegFile,
}

impl RegisterFile {
    /// Creates a register file with every register cleared and the given VLEN.
    pub fn new(vlen: usize) -> Self {
        Self {
            gpr: Gpr::new(),
            fpr: Fpr::new(),
            vregs: VectorRegFile::new(vlen),
        }
    }

    /// Reads integer register `idx`; `x0` reads zero.
    #[inline(always)]
    pub const fn read(&self, idx: usize) -> u64 {
        self.gpr.read(idx)
    }

    /// Writes integer register `idx`; writes to `x0` are ignored.
    #[inline(always)]
    pub const fn write(&mut self, idx: usize, val: u64) {
        self.gpr.write(idx, val);
    }

    /// Reads the raw bits of floating-point register `idx`.
    #[inline(always)]
    pub const fn read_f(&self, idx: usize) -> u64 {
        self.fpr.read(idx)
    }

    /// Writes the raw bits of floating-point register `idx`.
    #[inline(always)]
    pub const fn write_f(&mut self, idx: usize, val: u64) {
        self.fpr.write(idx, val);
    }

    /// The vector register file.
    #[inline]
    pub const fn vregs(&self) -> &VectorRegFile {
        &self.vregs
    }

    /// The vector register file, mutably.
    #[inline]
    pub const fn vregs_mut(&mut self) -> &mut VectorRegFile {
        &mut self.vregs
    }

    /// Logs the integer registers at `trace` level.
    pub fn dump(&self) {
        tracing::trace!("{}", self.gpr);
    }
}
