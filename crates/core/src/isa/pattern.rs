//! Encoding Patterns.
//!
//! A [`Pattern`] is a (mask, match) pair: a word belongs to the pattern when
//! `word & mask == match`. Patterns are assembled from field constraints with
//! `const` builder methods so extension tables can be written as readable
//! declarations instead of hand-computed hexadecimal.

use std::fmt;

/// A (mask, match) pair over the low 32 bits of an instruction word.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pattern {
    /// Bits that participate in the comparison.
    pub mask: u32,
    /// Required values of the masked bits.
    pub matched: u32,
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pattern(mask={:#010x}, match={:#010x})", self.mask, self.matched)
    }
}

impl Pattern {
    /// A pattern from raw mask and match values.
    pub const fn raw(mask: u32, matched: u32) -> Self {
        Self { mask, matched }
    }

    /// A pattern fixing the whole 32-bit word.
    pub const fn exact(word: u32) -> Self {
        Self {
            mask: u32::MAX,
            matched: word,
        }
    }

    /// A 32-bit pattern fixing the major opcode.
    pub const fn opcode(op: u32) -> Self {
        Self::raw(0x7f, op & 0x7f)
    }

    /// A 16-bit pattern fixing the quadrant and `funct3`.
    pub const fn compressed(quadrant: u32, funct3: u32) -> Self {
        Self::raw(0xe003, ((funct3 & 0b111) << 13) | (quadrant & 0b11))
    }

    /// Constrains `bits[lo + len - 1 : lo]` to `value`.
    pub const fn bits(self, lo: u32, len: u32, value: u32) -> Self {
        let field = if len >= 32 { u32::MAX } else { ((1u32 << len) - 1) << lo };
        Self {
            mask: self.mask | field,
            matched: (self.matched & !field) | ((value << lo) & field),
        }
    }

    /// Constrains `funct3`.
    pub const fn funct3(self, value: u32) -> Self {
        self.bits(12, 3, value)
    }

    /// Constrains `funct7`.
    pub const fn funct7(self, value: u32) -> Self {
        self.bits(25, 7, value)
    }

    /// Constrains the RV64 shift `funct6` (`bits[31:26]`); also the vector `funct6`.
    pub const fn funct6(self, value: u32) -> Self {
        self.bits(26, 6, value)
    }

    /// Constrains the AMO `funct5` (`bits[31:27]`).
    pub const fn funct5(self, value: u32) -> Self {
        self.bits(27, 5, value)
    }

    /// Constrains the R4 format field (`bits[26:25]`).
    pub const fn funct2(self, value: u32) -> Self {
        self.bits(25, 2, value)
    }

    /// Constrains `rd`.
    pub const fn rd(self, value: u32) -> Self {
        self.bits(7, 5, value)
    }

    /// Constrains `rs1`.
    pub const fn rs1(self, value: u32) -> Self {
        self.bits(15, 5, value)
    }

    /// Constrains `rs2`.
    pub const fn rs2(self, value: u32) -> Self {
        self.bits(20, 5, value)
    }

    /// Constrains the 12-bit immediate / CSR field.
    pub const fn imm12(self, value: u32) -> Self {
        self.bits(20, 12, value)
    }

    /// Constrains the vector mask bit.
    pub const fn vm(self, value: u32) -> Self {
        self.bits(25, 1, value)
    }

    /// Returns `true` when `word` belongs to the pattern.
    #[inline(always)]
    pub const fn matches(self, word: u32) -> bool {
        word & self.mask == self.matched
    }

    /// Returns `true` when some word belongs to both patterns.
    pub const fn overlaps(self, other: Self) -> bool {
        self.mask & other.mask & (self.matched ^ other.matched) == 0
    }

    /// Returns `true` when every word of `self` also belongs to `other`.
    pub const fn is_subset_of(self, other: Self) -> bool {
        self.mask & other.mask == other.mask && self.matched & other.mask == other.matched
    }

    /// Returns `true` when the match value has no bits outside the mask.
    pub const fn is_well_formed(self) -> bool {
        self.matched & !self.mask == 0
    }

    /// Number of constrained bits (specificity).
    pub const fn specificity(self) -> u32 {
        self.mask.count_ones()
    }
}
