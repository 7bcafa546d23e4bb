//! RISC-V Floating-Point Register File.
//!
//! Thirty-two 64-bit registers holding raw IEEE 754 bit patterns. Single
//! precision values are stored NaN-boxed (upper 32 bits all ones); boxing
//! and unboxing live in [`crate::core::units::fpu::nan_handling`].

/// Number of floating-point registers.
pub const NUM_FPRS: usize = 32;

/// Floating-point register file (`f0`-`f31`).
///
/// Registers hold bits rather than `f64` so that comparisons of whole
/// architectural states are exact even when registers contain NaNs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fpr {
    fregs: [u64; NUM_FPRS],
}

impl Fpr {
    /// Creates a register file with every register cleared.
    pub const fn new() -> Self {
        Self {
            fregs: [0; NUM_FPRS],
        }
    }

    /// Reads the raw bits of register `idx`.
    #[inline(always)]
    pub const fn read(&self, idx: usize) -> u64 {
        self.fregs[idx & 31]
    }

    /// Writes raw bits to register `idx`.
    #[inline(always)]
    pub const fn write(&mut self, idx: usize, val: u64) {
        self.fregs[idx & 31] = val;
    }
}
