//! Floating-point rounding modes.
//!
//! | Value | Mode | Description                             |
//! |-------|------|-----------------------------------------|
//! | 0b000 | RNE  | Round to Nearest, ties to Even          |
//! | 0b001 | RTZ  | Round towards Zero                      |
//! | 0b010 | RDN  | Round Down (towards −∞)                 |
//! | 0b011 | RUP  | Round Up (towards +∞)                   |
//! | 0b100 | RMM  | Round to Nearest, ties to Max Magnitude |
//!
//! `0b111` in an instruction selects `frm`; `0b101`, `0b110` are reserved.

use simple_soft_float::RoundingMode as SoftRounding;

/// Instruction `rm` value selecting the dynamic mode in `frm`.
pub const DYNAMIC: u8 = 0b111;

/// RISC-V rounding mode encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum RoundingMode {
    /// Round to Nearest, ties to Even.
    Rne = 0b000,
    /// Round towards Zero.
    Rtz = 0b001,
    /// Round Down.
    Rdn = 0b010,
    /// Round Up.
    Rup = 0b011,
    /// Round to Nearest, ties to Max Magnitude.
    Rmm = 0b100,
}

impl RoundingMode {
    /// Decodes a static 3-bit mode; `None` for reserved and dynamic encodings.
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits & 0x7 {
            0b000 => Some(Self::Rne),
            0b001 => Some(Self::Rtz),
            0b010 => Some(Self::Rdn),
            0b011 => Some(Self::Rup),
            0b100 => Some(Self::Rmm),
            _ => None,
        }
    }

    /// Resolves an instruction `rm` field against `frm`.
    pub const fn resolve(rm: u8, frm: u64) -> Option<Self> {
        if rm == DYNAMIC {
            Self::from_bits(frm as u8)
        } else {
            Self::from_bits(rm)
        }
    }

    pub(crate) const fn soft(self) -> SoftRounding {
        match self {
            Self::Rne => SoftRounding::TiesToEven,
            Self::Rtz => SoftRounding::TowardZero,
            Self::Rdn => SoftRounding::TowardNegative,
            Self::Rup => SoftRounding::TowardPositive,
            Self::Rmm => SoftRounding::TiesToAway,
        }
    }
}
