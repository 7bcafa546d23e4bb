//! RISC-V Privilege Modes.
//!
//! This module defines the privilege levels and the virtualization flag.
//! It implements the following:
//! 1. **Mode Classification:** User (U), Supervisor (S) and Machine (M) modes.
//! 2. **Serialization:** Conversion to and from the two-bit `xPP` encodings.
//! 3. **Observability:** Human-readable names, including the virtualized VS/VU forms.

use std::fmt;

/// RISC-V privilege mode levels. Machine mode is the highest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum PrivilegeMode {
    /// User mode (U-mode).
    User = 0,

    /// Supervisor mode (S-mode; HS or VS depending on the virtualization flag).
    Supervisor = 1,

    /// Machine mode (M-mode).
    #[default]
    Machine = 3,
}

impl PrivilegeMode {
    /// Converts a two-bit `xPP` field to a privilege mode.
    ///
    /// The reserved encoding `2` is returned as `None`.
    pub const fn from_bits(val: u64) -> Option<Self> {
        match val & 0b11 {
            0 => Some(Self::User),
            1 => Some(Self::Supervisor),
            3 => Some(Self::Machine),
            _ => None,
        }
    }

    /// Two-bit encoding of the mode.
    pub const fn to_bits(self) -> u64 {
        self as u64
    }

    /// Human-readable name of the mode, qualified by the virtualization flag.
    pub const fn name(self, virt: bool) -> &'static str {
        match (self, virt) {
            (Self::User, false) => "U",
            (Self::User, true) => "VU",
            (Self::Supervisor, false) => "HS",
            (Self::Supervisor, true) => "VS",
            (Self::Machine, _) => "M",
        }
    }
}

impl fmt::Display for PrivilegeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::User => "User",
            Self::Supervisor => "Supervisor",
            Self::Machine => "Machine",
        })
    }
}
