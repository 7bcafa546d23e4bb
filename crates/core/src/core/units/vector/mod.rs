//! Vector Execution Engine.
//!
//! Everything a vector handler needs besides its own element operation:
//! - [`engine`]: the loop templates that walk register groups under
//!   SEW/LMUL/vl/vstart/mask, apply tail and mask policy, and finish with
//!   `vstart = 0`.
//! - [`fixed_point`]: `vxrm` rounding, saturation and the averaging/scaling
//!   arithmetic of the fixed-point instructions.
//!
//! Element values travel as zero-extended `u64`s holding SEW bits; operations
//! that need a signed view use [`sext`].

/// Loop templates.
pub mod engine;

/// Fixed-point rounding and saturation.
pub mod fixed_point;

pub use engine::{Operand, VectorConfig};

/// Mask selecting the low `sew` bits.
#[inline(always)]
pub const fn sew_mask(sew: u32) -> u64 {
    if sew >= 64 { u64::MAX } else { (1u64 << sew) - 1 }
}

/// Sign-extends an SEW-bit element to `i64`.
#[inline(always)]
pub const fn sext(value: u64, sew: u32) -> i64 {
    let shift = 64 - sew;
    ((value << shift) as i64) >> shift
}

/// Largest signed value representable in `sew` bits.
#[inline(always)]
pub const fn signed_max(sew: u32) -> i64 {
    (sew_mask(sew) >> 1) as i64
}

/// Smallest signed value representable in `sew` bits.
#[inline(always)]
pub const fn signed_min(sew: u32) -> i64 {
    -signed_max(sew) - 1
}
