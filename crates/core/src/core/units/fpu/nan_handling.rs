//! NaN boxing, canonical NaNs and IEEE 754-2008 min/max on raw register bits.
//!
//! Single-precision values live in 64-bit registers with the upper 32 bits set.
//! A value that is not properly boxed reads as the canonical NaN. Any NaN an
//! arithmetic operation produces is replaced by the canonical quiet NaN.

use super::FpFormat;

/// Canonical quiet NaN, single precision.
pub const CANONICAL_NAN_F32: u32 = 0x7fc0_0000;

/// Canonical quiet NaN, double precision.
pub const CANONICAL_NAN_F64: u64 = 0x7ff8_0000_0000_0000;

const NAN_BOX_MASK: u64 = 0xffff_ffff_0000_0000;

/// Boxes single-precision bits into a register value.
#[inline]
pub const fn box_f32(bits: u32) -> u64 {
    bits as u64 | NAN_BOX_MASK
}

/// Unboxes a register value; improperly boxed values read as the canonical NaN.
#[inline]
pub const fn unbox_f32(reg: u64) -> u32 {
    if reg & NAN_BOX_MASK == NAN_BOX_MASK {
        reg as u32
    } else {
        CANONICAL_NAN_F32
    }
}

/// Operand bits of `reg` in `fmt` (unboxed for singles).
#[inline]
pub const fn operand(fmt: FpFormat, reg: u64) -> u64 {
    match fmt {
        FpFormat::Single => unbox_f32(reg) as u64,
        FpFormat::Double => reg,
    }
}

/// Register value for result bits in `fmt` (boxed for singles).
#[inline]
pub const fn result(fmt: FpFormat, bits: u64) -> u64 {
    match fmt {
        FpFormat::Single => box_f32(bits as u32),
        FpFormat::Double => bits,
    }
}

const fn layout(fmt: FpFormat) -> (u64, u64, u64) {
    // (sign bit, exponent mask, quiet bit)
    match fmt {
        FpFormat::Single => (1 << 31, 0x7f80_0000, 1 << 22),
        FpFormat::Double => (1 << 63, 0x7ff0_0000_0000_0000, 1 << 51),
    }
}

/// Sign bit of `fmt`.
pub const fn sign_bit(fmt: FpFormat) -> u64 {
    layout(fmt).0
}

/// Returns `true` for any NaN.
pub const fn is_nan(fmt: FpFormat, bits: u64) -> bool {
    let (sign, exp, _) = layout(fmt);
    bits & exp == exp && bits & !(sign | exp) != 0
}

/// Returns `true` for a signaling NaN.
pub const fn is_signaling_nan(fmt: FpFormat, bits: u64) -> bool {
    is_nan(fmt, bits) && bits & layout(fmt).2 == 0
}

/// The canonical NaN of `fmt`.
pub const fn canonical_nan(fmt: FpFormat) -> u64 {
    match fmt {
        FpFormat::Single => CANONICAL_NAN_F32 as u64,
        FpFormat::Double => CANONICAL_NAN_F64,
    }
}

/// Replaces any NaN with the canonical NaN.
#[inline]
pub const fn canonicalize(fmt: FpFormat, bits: u64) -> u64 {
    if is_nan(fmt, bits) { canonical_nan(fmt) } else { bits }
}

/// `fclass` result bit for `bits`.
pub const fn classify(fmt: FpFormat, bits: u64) -> u64 {
    let (sign, exp, quiet) = layout(fmt);
    let negative = bits & sign != 0;
    let exponent = bits & exp;
    let fraction = bits & !(sign | exp);
    let class = if exponent == exp {
        if fraction == 0 {
            if negative { 0 } else { 7 }
        } else if bits & quiet != 0 {
            9
        } else {
            8
        }
    } else if exponent == 0 {
        match (fraction == 0, negative) {
            (true, true) => 3,
            (true, false) => 4,
            (false, true) => 2,
            (false, false) => 5,
        }
    } else if negative {
        1
    } else {
        6
    };
    1 << class
}

/// IEEE 754-2008 `minimumNumber`/`maximumNumber` with `-0 < +0`.
///
/// Returns the result bits and whether a signaling NaN was seen.
pub fn min_max(fmt: FpFormat, a: u64, b: u64, max: bool) -> (u64, bool) {
    let invalid = is_signaling_nan(fmt, a) || is_signaling_nan(fmt, b);
    let sign = sign_bit(fmt);
    let bits = match (is_nan(fmt, a), is_nan(fmt, b)) {
        (true, true) => canonical_nan(fmt),
        (true, false) => b,
        (false, true) => a,
        (false, false) => {
            let less = ordered_less(fmt, a, b) || (a | b) & !sign == 0 && a & sign != 0;
            if less == max { b } else { a }
        }
    };
    (bits, invalid)
}

/// Total order on non-NaN values, treating both zeros as equal.
fn ordered_less(fmt: FpFormat, a: u64, b: u64) -> bool {
    let sign = sign_bit(fmt);
    let magnitude = |x: u64| x & !sign;
    match (a & sign != 0, b & sign != 0) {
        (false, false) => magnitude(a) < magnitude(b),
        (true, true) => magnitude(a) > magnitude(b),
        (true, false) => magnitude(a) | magnitude(b) != 0,
        (false, true) => false,
    }
}
