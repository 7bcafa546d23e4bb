//! Floating-point accrued exception flags (`fflags`).
//!
//! | Bit | Flag | Description         |
//! |-----|------|---------------------|
//! |  4  | NV   | Invalid Operation   |
//! |  3  | DZ   | Divide by Zero      |
//! |  2  | OF   | Overflow            |
//! |  1  | UF   | Underflow           |
//! |  0  | NX   | Inexact             |

use std::ops::{BitOr, BitOrAssign};

use simple_soft_float::StatusFlags;

/// Floating-point exception flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FpFlags(u8);

impl FpFlags {
    /// No exceptions raised.
    pub const NONE: Self = Self(0);
    /// Invalid Operation.
    pub const NV: Self = Self(1 << 4);
    /// Divide by Zero.
    pub const DZ: Self = Self(1 << 3);
    /// Overflow.
    pub const OF: Self = Self(1 << 2);
    /// Underflow.
    pub const UF: Self = Self(1 << 1);
    /// Inexact.
    pub const NX: Self = Self(1 << 0);

    /// Raw 5-bit value for `fflags`.
    pub const fn bits(self) -> u64 {
        self.0 as u64
    }

    /// Returns `true` if no flags are set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if every flag in `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for FpFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for FpFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl From<StatusFlags> for FpFlags {
    fn from(status: StatusFlags) -> Self {
        [
            (StatusFlags::INVALID_OPERATION, Self::NV),
            (StatusFlags::DIVISION_BY_ZERO, Self::DZ),
            (StatusFlags::OVERFLOW, Self::OF),
            (StatusFlags::UNDERFLOW, Self::UF),
            (StatusFlags::INEXACT, Self::NX),
        ]
        .into_iter()
        .filter(|(soft, _)| status.contains(*soft))
        .fold(Self::NONE, |acc, (_, flag)| acc | flag)
    }
}
