//! Vector Handlers.
//!
//! Each handler picks an element operation and hands it to one of the loop
//! templates in [`crate::core::units::vector::engine`], which own masking,
//! tail policy and `vstart`. Families that do not fit a template (merges,
//! slides, gathers, mask-register ops, memory) run their own loops with the
//! same helpers.
//!
//! Several encodings share a handler and select the element operation from
//! `funct6`; the dispatch table still carries one entry per instruction.

/// `vsetvli`, `vsetivli`, `vsetvl`.
pub mod config;

/// Element-group crypto: Zvkned, Zvkg, Zvknha.
pub mod crypto;

/// Saturating, averaging, scaling and clipping arithmetic.
pub mod fixed;

/// Integer arithmetic, widening, narrowing and compares.
pub mod int;

/// Mask-register logic and mask-driven queries.
pub mod mask;

/// Unit-stride, strided, segment, mask and whole-register loads and stores.
pub mod mem;

/// Merges, moves, slides, gathers and compress.
pub mod permute;

/// Integer reductions.
pub mod reduce;

/// Zvbb bit manipulation.
pub mod zvbb;

use crate::common::error::Trap;
use crate::isa::Insn;

/// `Ok(next pc)` after a vector instruction that completed.
#[inline(always)]
pub(crate) const fn done(insn: Insn, pc: u64) -> Result<u64, Trap> {
    Ok(pc.wrapping_add(insn.len()))
}

/// Shift amount of a shift by `b` at `sew` bits: the low `log2(sew)` bits.
#[inline(always)]
pub(crate) const fn shamt(b: u64, sew: u32) -> u32 {
    (b & (sew as u64 - 1)) as u32
}
