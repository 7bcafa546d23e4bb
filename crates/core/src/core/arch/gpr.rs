//! RISC-V General-Purpose Register File.
//!
//! This module implements the integer register file. It performs the following:
//! 1. **Storage:** Maintains 32 integer registers (`x0`-`x31`), each held
//!    sign-extended to 64 bits regardless of XLEN.
//! 2. **Invariant Enforcement:** `x0` reads as zero and discards writes.
//! 3. **Observability:** A two-column register dump via `Display`.

use std::fmt;

/// Number of integer registers.
pub const NUM_GPRS: usize = 32;

/// General-purpose register file (`x0`-`x31`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Gpr {
    regs: [u64; NUM_GPRS],
}

impl Gpr {
    /// Creates a register file with every register cleared.
    pub const fn new() -> Self {
        Self {
            regs: [0; NUM_GPRS],
        }
    }

    /// Reads register `idx`. `x0` always reads as zero.
    #[inline(always)]
    pub const fn read(&self, idx: usize) -> u64 {
        if idx == 0 { 0 } else { self.regs[idx & 31] }
    }

    /// Writes register `idx`. Writes to `x0` are discarded.
    #[inline(always)]
    pub const fn write(&mut self, idx: usize, val: u64) {
        if idx != 0 {
            self.regs[idx & 31] = val;
        }
    }
}

impl fmt::Display for Gpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in (0..NUM_GPRS).step_by(2) {
            writeln!(
                f,
                "x{:<2}={:#018x} x{:<2}={:#018x}",
                i,
                self.read(i),
                i + 1,
                self.read(i + 1)
            )?;
        }
        Ok(())
    }
}
