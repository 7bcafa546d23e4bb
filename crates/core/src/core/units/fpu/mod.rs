//! Floating-Point Unit (FPU).
//!
//! IEEE 754 single- and double-precision operations for the F and D extensions.
//! Arithmetic, conversions and comparisons go through `simple-soft-float`, so every
//! rounding mode is exact and the accrued flags match the standard. Operands and
//! results are raw register bits; singles are NaN-boxed on the way out and
//! unboxed on the way in.
//!
//! Operations are organized into submodules:
//! - [`nan_handling`]: NaN boxing, canonical NaN, classification, min/max.
//! - [`rounding_modes`]: The `rm`/`frm` encodings.
//! - [`exception_flags`]: The accrued `fflags` bits.

/// Accrued exception flags.
pub mod exception_flags;

/// NaN boxing, unboxing and canonical NaN propagation.
pub mod nan_handling;

/// Rounding mode definitions.
pub mod rounding_modes;

use std::cmp::Ordering;

use simple_soft_float::{F32, F64, FPState};

use self::exception_flags::FpFlags;
use self::nan_handling::{canonicalize, is_nan, is_signaling_nan, operand, result, sign_bit};
use self::rounding_modes::RoundingMode;

/// Operand format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FpFormat {
    /// Single precision (F).
    Single,
    /// Double precision (D).
    Double,
}

/// Rounded arithmetic operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FpOp {
    /// `a + b`.
    Add,
    /// `a - b`.
    Sub,
    /// `a * b`.
    Mul,
    /// `a / b`.
    Div,
    /// `sqrt(a)`.
    Sqrt,
    /// `a * b + c`.
    MAdd,
    /// `a * b - c`.
    MSub,
    /// `-(a * b) + c`.
    NMSub,
    /// `-(a * b) - c`.
    NMAdd,
}

/// Comparison producing an integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FpCompare {
    /// Quiet equality.
    Eq,
    /// Signaling less-than.
    Lt,
    /// Signaling less-or-equal.
    Le,
}

/// Integer side of a conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntKind {
    /// Signed 32-bit.
    W,
    /// Unsigned 32-bit.
    Wu,
    /// Signed 64-bit.
    L,
    /// Unsigned 64-bit.
    Lu,
}

/// Sign-injection variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SignInjection {
    /// Sign of `b`.
    Copy,
    /// Inverted sign of `b`.
    Negate,
    /// Sign of `a` XOR sign of `b`.
    Xor,
}

macro_rules! soft_arith {
    ($float:ty, $op:expr, $a:expr, $b:expr, $c:expr, $rm:expr, $state:expr) => {{
        let a = <$float>::from_bits($a as _);
        let b = <$float>::from_bits($b as _);
        let c = <$float>::from_bits($c as _);
        let rm = Some($rm);
        let value = match $op {
            FpOp::Add => a.add(&b, rm, Some($state)),
            FpOp::Sub => a.sub(&b, rm, Some($state)),
            FpOp::Mul => a.mul(&b, rm, Some($state)),
            FpOp::Div => a.div(&b, rm, Some($state)),
            FpOp::Sqrt => a.sqrt(rm, Some($state)),
            FpOp::MAdd => a.fused_mul_add(&b, &c, rm, Some($state)),
            FpOp::MSub => {
                let mut c = c.clone();
                c.toggle_sign();
                a.fused_mul_add(&b, &c, rm, Some($state))
            }
            FpOp::NMSub => {
                let mut a = a.clone();
                a.toggle_sign();
                a.fused_mul_add(&b, &c, rm, Some($state))
            }
            FpOp::NMAdd => {
                let mut a = a.clone();
                let mut c = c.clone();
                a.toggle_sign();
                c.toggle_sign();
                a.fused_mul_add(&b, &c, rm, Some($state))
            }
        };
        u64::from(value.into_bits())
    }};
}

/// Floating-Point Unit.
#[derive(Debug)]
pub struct Fpu;

impl Fpu {
    /// Rounded arithmetic; returns the result register value and raised flags.
    ///
    /// # Examples
    ///
    /// ```
    /// use rviss_core::core::units::fpu::{FpFormat, FpOp, Fpu};
    /// use rviss_core::core::units::fpu::rounding_modes::RoundingMode;
    ///
    /// let (bits, flags) = Fpu::arith(
    ///     FpOp::Mul,
    ///     FpFormat::Double,
    ///     2.0f64.to_bits(),
    ///     3.5f64.to_bits(),
    ///     0,
    ///     RoundingMode::Rne,
    /// );
    /// assert_eq!(f64::from_bits(bits), 7.0);
    /// assert!(flags.is_empty());
    /// ```
    pub fn arith(op: FpOp, fmt: FpFormat, a: u64, b: u64, c: u64, rm: RoundingMode) -> (u64, FpFlags) {
        let (a, b, c) = (operand(fmt, a), operand(fmt, b), operand(fmt, c));
        let mut state = FPState::default();
        let bits = match fmt {
            FpFormat::Single => soft_arith!(F32, op, a, b, c, rm.soft(), &mut state),
            FpFormat::Double => soft_arith!(F64, op, a, b, c, rm.soft(), &mut state),
        };
        (result(fmt, canonicalize(fmt, bits)), state.status_flags.into())
    }

    /// Comparison; returns 0 or 1 and raised flags.
    pub fn compare(cmp: FpCompare, fmt: FpFormat, a: u64, b: u64) -> (u64, FpFlags) {
        let (a, b) = (operand(fmt, a), operand(fmt, b));
        let mut state = FPState::default();
        let ordering = match (fmt, cmp) {
            (FpFormat::Single, FpCompare::Eq) => {
                F32::from_bits(a as u32).compare_quiet(&F32::from_bits(b as u32), Some(&mut state))
            }
            (FpFormat::Single, _) => F32::from_bits(a as u32)
                .compare_signaling(&F32::from_bits(b as u32), Some(&mut state)),
            (FpFormat::Double, FpCompare::Eq) => {
                F64::from_bits(a).compare_quiet(&F64::from_bits(b), Some(&mut state))
            }
            (FpFormat::Double, _) => {
                F64::from_bits(a).compare_signaling(&F64::from_bits(b), Some(&mut state))
            }
        };
        let holds = match cmp {
            FpCompare::Eq => ordering == Some(Ordering::Equal),
            FpCompare::Lt => ordering == Some(Ordering::Less),
            FpCompare::Le => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
        };
        (u64::from(holds), state.status_flags.into())
    }

    /// `fmin`/`fmax`; returns the result register value and raised flags.
    pub fn min_max(fmt: FpFormat, a: u64, b: u64, max: bool) -> (u64, FpFlags) {
        let (bits, invalid) = nan_handling::min_max(fmt, operand(fmt, a), operand(fmt, b), max);
        let flags = if invalid { FpFlags::NV } else { FpFlags::NONE };
        (result(fmt, bits), flags)
    }

    /// Sign injection on raw bits; never raises flags.
    pub fn sign_inject(kind: SignInjection, fmt: FpFormat, a: u64, b: u64) -> u64 {
        let (a, b) = (operand(fmt, a), operand(fmt, b));
        let sign = sign_bit(fmt);
        let new_sign = match kind {
            SignInjection::Copy => b & sign,
            SignInjection::Negate => !b & sign,
            SignInjection::Xor => (a ^ b) & sign,
        };
        result(fmt, (a & !sign) | new_sign)
    }

    /// `fclass` mask.
    pub const fn classify(fmt: FpFormat, a: u64) -> u64 {
        nan_handling::classify(fmt, operand(fmt, a))
    }

    /// Float to integer; the result is sign-extended to 64 bits (W forms included).
    ///
    /// Out-of-range inputs and NaNs saturate and raise NV.
    pub fn to_int(fmt: FpFormat, kind: IntKind, a: u64, rm: RoundingMode) -> (u64, FpFlags) {
        let a = operand(fmt, a);
        let mut state = FPState::default();
        let rm = Some(rm.soft());
        let converted = match fmt {
            FpFormat::Single => {
                let v = F32::from_bits(a as u32);
                match kind {
                    IntKind::W => v.to_i32(true, rm, Some(&mut state)).map(|x| x as u64),
                    IntKind::Wu => v.to_u32(true, rm, Some(&mut state)).map(|x| x as i32 as u64),
                    IntKind::L => v.to_i64(true, rm, Some(&mut state)).map(|x| x as u64),
                    IntKind::Lu => v.to_u64(true, rm, Some(&mut state)),
                }
            }
            FpFormat::Double => {
                let v = F64::from_bits(a);
                match kind {
                    IntKind::W => v.to_i32(true, rm, Some(&mut state)).map(|x| x as u64),
                    IntKind::Wu => v.to_u32(true, rm, Some(&mut state)).map(|x| x as i32 as u64),
                    IntKind::L => v.to_i64(true, rm, Some(&mut state)).map(|x| x as u64),
                    IntKind::Lu => v.to_u64(true, rm, Some(&mut state)),
                }
            }
        };
        let flags: FpFlags = state.status_flags.into();
        match converted {
            Some(value) => (value, flags),
            None => {
                let negative = !is_nan(fmt, a) && a & sign_bit(fmt) != 0;
                let saturated = match (kind, negative) {
                    (IntKind::W, false) => i32::MAX as u64,
                    (IntKind::W, true) => i32::MIN as u64,
                    (IntKind::Wu, false) => u64::MAX,
                    (IntKind::L, false) => i64::MAX as u64,
                    (IntKind::L, true) => i64::MIN as u64,
                    (IntKind::Lu, false) => u64::MAX,
                    (IntKind::Wu | IntKind::Lu, true) => 0,
                };
                (saturated, flags | FpFlags::NV)
            }
        }
    }

    /// Integer to float; `value` holds the source register bits.
    pub fn from_int(fmt: FpFormat, kind: IntKind, value: u64, rm: RoundingMode) -> (u64, FpFlags) {
        let mut state = FPState::default();
        let rm = Some(rm.soft());
        let bits = match fmt {
            FpFormat::Single => u64::from(
                match kind {
                    IntKind::W => F32::from_i32(value as i32, rm, Some(&mut state)),
                    IntKind::Wu => F32::from_u32(value as u32, rm, Some(&mut state)),
                    IntKind::L => F32::from_i64(value as i64, rm, Some(&mut state)),
                    IntKind::Lu => F32::from_u64(value, rm, Some(&mut state)),
                }
                .into_bits(),
            ),
            FpFormat::Double => match kind {
                IntKind::W => F64::from_i32(value as i32, rm, Some(&mut state)),
                IntKind::Wu => F64::from_u32(value as u32, rm, Some(&mut state)),
                IntKind::L => F64::from_i64(value as i64, rm, Some(&mut state)),
                IntKind::Lu => F64::from_u64(value, rm, Some(&mut state)),
            }
            .into_bits(),
        };
        (result(fmt, bits), state.status_flags.into())
    }

    /// Converts between formats (`fcvt.s.d`, `fcvt.d.s`).
    pub fn convert(from: FpFormat, to: FpFormat, a: u64, rm: RoundingMode) -> (u64, FpFlags) {
        let a = operand(from, a);
        if from == to {
            return (result(to, canonicalize(to, a)), FpFlags::NONE);
        }
        let mut state = FPState::default();
        let rm = Some(rm.soft());
        let bits = match to {
            FpFormat::Single => u64::from(
                F32::convert_from_float(&F64::from_bits(a), rm, Some(&mut state)).into_bits(),
            ),
            FpFormat::Double => {
                F64::convert_from_float(&F32::from_bits(a as u32), rm, Some(&mut state)).into_bits()
            }
        };
        let mut flags: FpFlags = state.status_flags.into();
        if is_signaling_nan(from, a) {
            flags |= FpFlags::NV;
        }
        (result(to, canonicalize(to, bits)), flags)
    }
}
