//! Fixed-point arithmetic.
//!
//! Rounding follows `vxrm`: the value shifted right by `d` bits is incremented by
//!
//! | mode | increment                                   |
//! |------|---------------------------------------------|
//! | RNU  | `v[d-1]`                                    |
//! | RNE  | `v[d-1] & (v[d-2:0] != 0 \| v[d])`          |
//! | RDN  | `0`                                         |
//! | ROD  | `!v[d] & (v[d-1:0] != 0)`                   |
//!
//! Every operation returns its SEW-bit result zero-extended, and the saturating
//! ones also report whether they clamped so the caller can set `vxsat`.

use super::{sew_mask, sext, signed_max, signed_min};
use crate::core::arch::vtype::Vxrm;

/// Increment applied after shifting `v` right by `d` bits.
pub fn rounding_increment(v: u128, d: u32, vxrm: Vxrm) -> u128 {
    if d == 0 {
        return 0;
    }
    let bit = |i: u32| (v >> i) & 1;
    let low = |n: u32| v & ((1u128 << n) - 1);
    match vxrm {
        Vxrm::Rnu => bit(d - 1),
        Vxrm::Rne => bit(d - 1) & u128::from(low(d - 1) != 0 || bit(d) == 1),
        Vxrm::Rdn => 0,
        Vxrm::Rod => u128::from(bit(d) == 0 && low(d) != 0),
    }
}

/// `v >> d`, rounded, for unsigned `v`.
pub fn roundoff_unsigned(v: u128, d: u32, vxrm: Vxrm) -> u128 {
    (v >> d) + rounding_increment(v, d, vxrm)
}

/// `v >> d` (arithmetic), rounded, for signed `v`.
pub fn roundoff_signed(v: i128, d: u32, vxrm: Vxrm) -> i128 {
    (v >> d) + rounding_increment(v as u128, d, vxrm) as i128
}

fn clamp_signed(v: i128, sew: u32) -> (u64, bool) {
    let (min, max) = (i128::from(signed_min(sew)), i128::from(signed_max(sew)));
    let clamped = v.clamp(min, max);
    (clamped as u64 & sew_mask(sew), clamped != v)
}

fn clamp_unsigned(v: u128, sew: u32) -> (u64, bool) {
    let max = u128::from(sew_mask(sew));
    if v > max { (max as u64, true) } else { (v as u64, false) }
}

/// `vsaddu`.
pub fn saturating_add_unsigned(a: u64, b: u64, sew: u32) -> (u64, bool) {
    clamp_unsigned(u128::from(a) + u128::from(b), sew)
}

/// `vsadd`.
pub fn saturating_add(a: u64, b: u64, sew: u32) -> (u64, bool) {
    clamp_signed(i128::from(sext(a, sew)) + i128::from(sext(b, sew)), sew)
}

/// `vssubu`.
pub fn saturating_sub_unsigned(a: u64, b: u64, _sew: u32) -> (u64, bool) {
    if a < b { (0, true) } else { (a - b, false) }
}

/// `vssub`.
pub fn saturating_sub(a: u64, b: u64, sew: u32) -> (u64, bool) {
    clamp_signed(i128::from(sext(a, sew)) - i128::from(sext(b, sew)), sew)
}

/// `vaaddu`.
pub fn averaging_add_unsigned(a: u64, b: u64, sew: u32, vxrm: Vxrm) -> u64 {
    roundoff_unsigned(u128::from(a) + u128::from(b), 1, vxrm) as u64 & sew_mask(sew)
}

/// `vaadd`.
pub fn averaging_add(a: u64, b: u64, sew: u32, vxrm: Vxrm) -> u64 {
    let sum = i128::from(sext(a, sew)) + i128::from(sext(b, sew));
    roundoff_signed(sum, 1, vxrm) as u64 & sew_mask(sew)
}

/// `vasubu`.
pub fn averaging_sub_unsigned(a: u64, b: u64, sew: u32, vxrm: Vxrm) -> u64 {
    let diff = i128::from(a) - i128::from(b);
    roundoff_signed(diff, 1, vxrm) as u64 & sew_mask(sew)
}

/// `vasub`.
pub fn averaging_sub(a: u64, b: u64, sew: u32, vxrm: Vxrm) -> u64 {
    let diff = i128::from(sext(a, sew)) - i128::from(sext(b, sew));
    roundoff_signed(diff, 1, vxrm) as u64 & sew_mask(sew)
}

/// `vsmul`: `(a * b) >> (SEW - 1)`, rounded. `MIN * MIN` saturates to `MAX`.
pub fn fractional_mul(a: u64, b: u64, sew: u32, vxrm: Vxrm) -> (u64, bool) {
    let (sa, sb) = (sext(a, sew), sext(b, sew));
    if sa == signed_min(sew) && sb == signed_min(sew) {
        return (signed_max(sew) as u64, true);
    }
    let product = i128::from(sa) * i128::from(sb);
    clamp_signed(roundoff_signed(product, sew - 1, vxrm), sew)
}

/// `vssrl`: logical right shift by `shift mod SEW`, rounded.
pub fn scaling_shift_right_logical(a: u64, shift: u64, sew: u32, vxrm: Vxrm) -> u64 {
    let d = (shift & u64::from(sew - 1)) as u32;
    roundoff_unsigned(u128::from(a), d, vxrm) as u64 & sew_mask(sew)
}

/// `vssra`: arithmetic right shift by `shift mod SEW`, rounded.
pub fn scaling_shift_right_arith(a: u64, shift: u64, sew: u32, vxrm: Vxrm) -> u64 {
    let d = (shift & u64::from(sew - 1)) as u32;
    roundoff_signed(i128::from(sext(a, sew)), d, vxrm) as u64 & sew_mask(sew)
}

/// `vnclipu`: narrows a `2*SEW` value by `shift mod 2*SEW`, rounded and saturated.
pub fn narrowing_clip_unsigned(wide: u64, shift: u64, sew: u32, vxrm: Vxrm) -> (u64, bool) {
    let d = (shift & u64::from(2 * sew - 1)) as u32;
    clamp_unsigned(roundoff_unsigned(u128::from(wide), d, vxrm), sew)
}

/// `vnclip`: signed counterpart of [`narrowing_clip_unsigned`].
pub fn narrowing_clip(wide: u64, shift: u64, sew: u32, vxrm: Vxrm) -> (u64, bool) {
    let d = (shift & u64::from(2 * sew - 1)) as u32;
    clamp_signed(roundoff_signed(i128::from(sext(wide, 2 * sew)), d, vxrm), sew)
}
