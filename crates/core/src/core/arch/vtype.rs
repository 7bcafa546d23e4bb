//! Vector Configuration State.
//!
//! `vtype` decoding and the vector context that `vsetvl*` configures:
//! 1. **Vtype:** SEW, LMUL (possibly fractional), tail/mask policy and `vill`.
//! 2. **VectorState:** `vl`, `vstart`, the fixed-point rounding mode and saturation flag.

/// Decoded `vtype` register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Vtype {
    /// Raw register value as read through the `vtype` CSR.
    pub raw: u64,
    /// log2(LMUL), in `-3..=3`.
    pub vlmul: i8,
    /// Selected element width in bits.
    pub sew: u32,
    /// Tail agnostic.
    pub vta: bool,
    /// Mask agnostic.
    pub vma: bool,
    /// Illegal configuration; every vector instruction except `vsetvl*` traps.
    pub vill: bool,
}

impl Default for Vtype {
    fn default() -> Self {
        Self::illegal(64)
    }
}

impl Vtype {
    /// The configuration after reset or an unsupported `vsetvl*`.
    pub const fn illegal(xlen: u32) -> Self {
        Self {
            raw: 1 << (xlen - 1),
            vlmul: 0,
            sew: 8,
            vta: false,
            vma: false,
            vill: true,
        }
    }

    /// Decodes a requested `vtype` value, yielding an illegal configuration
    /// when any field is reserved or the SEW/LMUL pair is unsupported for `elen`.
    pub const fn decode(value: u64, xlen: u32, elen: u32) -> Self {
        let vlmul = match value & 0b111 {
            0 => 0,
            1 => 1,
            2 => 2,
            3 => 3,
            5 => -3,
            6 => -2,
            7 => -1,
            _ => return Self::illegal(xlen),
        };
        let sew = 8u32 << ((value >> 3) & 0b111);
        let reserved = value >> 8 != 0;
        if reserved || (value >> 3) & 0b111 > 3 || sew > elen {
            return Self::illegal(xlen);
        }
        if vlmul < 0 && sew > elen >> (-vlmul as u32) {
            return Self::illegal(xlen);
        }
        Self {
            raw: value & 0xff,
            vlmul,
            sew,
            vta: value & (1 << 6) != 0,
            vma: value & (1 << 7) != 0,
            vill: false,
        }
    }

    /// VLMAX = LMUL * VLEN / SEW.
    pub const fn vlmax(&self, vlen: usize) -> u64 {
        let per_reg = (vlen as u64) / (self.sew as u64);
        if self.vlmul >= 0 {
            per_reg << self.vlmul
        } else {
            per_reg >> (-self.vlmul)
        }
    }

    /// Registers occupied by one group (fractional LMUL occupies one).
    pub const fn group_regs(&self) -> usize {
        if self.vlmul > 0 { 1 << self.vlmul } else { 1 }
    }

    /// Registers occupied by a group of elements twice as wide.
    pub const fn wide_group_regs(&self) -> usize {
        if self.vlmul >= 0 { 2 << self.vlmul } else { 1 }
    }
}

/// Fixed-point rounding mode (`vxrm`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Vxrm {
    /// Round to nearest, ties up.
    #[default]
    Rnu,
    /// Round to nearest, ties to even.
    Rne,
    /// Round down (truncate).
    Rdn,
    /// Round to odd ("jam").
    Rod,
}

impl Vxrm {
    /// Decodes the two-bit field.
    pub const fn from_bits(bits: u64) -> Self {
        match bits & 0b11 {
            0 => Self::Rnu,
            1 => Self::Rne,
            2 => Self::Rdn,
            _ => Self::Rod,
        }
    }

    /// Encodes the two-bit field.
    pub const fn to_bits(self) -> u64 {
        match self {
            Self::Rnu => 0,
            Self::Rne => 1,
            Self::Rdn => 2,
            Self::Rod => 3,
        }
    }
}

/// Vector context configured by `vsetvl*` and the vector CSRs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VectorState {
    /// Current configuration.
    pub vtype: Vtype,
    /// Active vector length.
    pub vl: u64,
    /// First element to execute.
    pub vstart: u64,
    /// Fixed-point rounding mode.
    pub vxrm: Vxrm,
    /// Fixed-point saturation flag.
    pub vxsat: bool,
}

impl VectorState {
    /// Reset state for the given XLEN: `vill` set, `vl` zero.
    pub const fn new(xlen: u32) -> Self {
        Self {
            vtype: Vtype::illegal(xlen),
            vl: 0,
            vstart: 0,
            vxrm: Vxrm::Rnu,
            vxsat: false,
        }
    }

    /// Value of `vcsr`.
    pub const fn vcsr(&self) -> u64 {
        (self.vxrm.to_bits() << 1) | self.vxsat as u64
    }
}
