//! RISC-V Vector Register File.
//!
//! Thirty-two registers of VLEN bits stored as one contiguous little-endian
//! byte array. Element `i` of a register group starting at `vd` with element
//! width SEW lives at byte offset `vd * VLENB + i * SEW / 8`, so a group of
//! several registers is simply a longer slice of the same array.

use std::fmt;

/// Number of vector registers.
pub const NUM_VREGS: usize = 32;

/// Vector register file (`v0`-`v31`).
#[derive(Clone, PartialEq, Eq)]
pub struct VectorRegFile {
    vlenb: usize,
    data: Vec<u8>,
}

impl fmt::Debug for VectorRegFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VectorRegFile")
            .field("vlen", &(self.vlenb * 8))
            .finish_non_exhaustive()
    }
}

impl Default for VectorRegFile {
    fn default() -> Self {
        Self::new(128)
    }
}

impl VectorRegFile {
    /// Creates a zeroed register file for the given VLEN in bits.
    pub fn new(vlen: usize) -> Self {
        let vlenb = vlen / 8;
        Self {
            vlenb,
            data: vec![0; vlenb * NUM_VREGS],
        }
    }

    /// VLEN in bytes.
    #[inline]
    pub const fn vlenb(&self) -> usize {
        self.vlenb
    }

    /// VLEN in bits.
    #[inline]
    pub const fn vlen(&self) -> usize {
        self.vlenb * 8
    }

    #[inline]
    fn offset(&self, reg: usize, idx: usize, bytes: usize) -> Option<usize> {
        let off = (reg & 31) * self.vlenb + idx * bytes;
        (off + bytes <= self.data.len()).then_some(off)
    }

    /// Reads element `idx` of width `sew` bits from the group starting at `reg`.
    ///
    /// Elements past the end of `v31` read as zero.
    pub fn elem(&self, reg: usize, idx: usize, sew: u32) -> u64 {
        let bytes = (sew / 8) as usize;
        let Some(off) = self.offset(reg, idx, bytes) else {
            return 0;
        };
        self.data[off..off + bytes]
            .iter()
            .rev()
            .fold(0u64, |acc, b| (acc << 8) | u64::from(*b))
    }

    /// Writes element `idx` of width `sew` bits in the group starting at `reg`.
    ///
    /// Only the low `sew` bits of `value` are stored.
    pub fn set_elem(&mut self, reg: usize, idx: usize, sew: u32, value: u64) {
        let bytes = (sew / 8) as usize;
        let Some(off) = self.offset(reg, idx, bytes) else {
            return;
        };
        for (i, b) in self.data[off..off + bytes].iter_mut().enumerate() {
            *b = (value >> (8 * i)) as u8;
        }
    }

    /// Reads mask bit `idx` of register `reg`.
    #[inline]
    pub fn mask_bit(&self, reg: usize, idx: usize) -> bool {
        let off = (reg & 31) * self.vlenb + idx / 8;
        self.data.get(off).is_some_and(|b| (b >> (idx % 8)) & 1 == 1)
    }

    /// Writes mask bit `idx` of register `reg`.
    #[inline]
    pub fn set_mask_bit(&mut self, reg: usize, idx: usize, value: bool) {
        let off = (reg & 31) * self.vlenb + idx / 8;
        if let Some(b) = self.data.get_mut(off) {
            let bit = 1u8 << (idx % 8);
            if value {
                *b |= bit;
            } else {
                *b &= !bit;
            }
        }
    }

    /// Raw bytes of one register.
    pub fn reg(&self, reg: usize) -> &[u8] {
        let start = (reg & 31) * self.vlenb;
        &self.data[start..start + self.vlenb]
    }

    /// Mutable raw bytes of one register.
    pub fn reg_mut(&mut self, reg: usize) -> &mut [u8] {
        let start = (reg & 31) * self.vlenb;
        &mut self.data[start..start + self.vlenb]
    }
}
