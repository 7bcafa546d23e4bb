//! Zbb single-operand operations.

use super::sext32;

/// Single-operand bit-manipulation operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BitOp {
    /// Count leading zeros.
    Clz,
    /// Count trailing zeros.
    Ctz,
    /// Population count.
    Cpop,
    /// Sign-extend byte.
    SextB,
    /// Sign-extend halfword.
    SextH,
    /// Zero-extend halfword.
    ZextH,
    /// OR-combine bytes: each byte becomes 0x00 or 0xff.
    OrcB,
    /// Reverse byte order.
    Rev8,
}

/// Executes a single-operand operation at width `xlen`; `word` selects the
/// `*W` counting forms.
pub fn execute(op: BitOp, a: u64, xlen: u32, word: bool) -> u64 {
    let width = if word { 32 } else { xlen };
    let a = if width == 32 { a & 0xffff_ffff } else { a };
    match op {
        BitOp::Clz => u64::from(a.leading_zeros() - (64 - width)),
        BitOp::Ctz => u64::from(a.trailing_zeros().min(width)),
        BitOp::Cpop => u64::from(a.count_ones()),
        BitOp::SextB => a as i8 as i64 as u64,
        BitOp::SextH => a as i16 as i64 as u64,
        BitOp::ZextH => a & 0xffff,
        BitOp::OrcB => orc_b(a),
        BitOp::Rev8 if width == 32 => sext32(u64::from((a as u32).swap_bytes())),
        BitOp::Rev8 => a.swap_bytes(),
    }
}

/// Each nonzero byte becomes 0xff.
pub const fn orc_b(a: u64) -> u64 {
    let mut out = 0;
    let mut i = 0;
    while i < 8 {
        if (a >> (8 * i)) & 0xff != 0 {
            out |= 0xff << (8 * i);
        }
        i += 1;
    }
    out
}

/// Reverses the bits within each byte.
pub const fn brev8(a: u64) -> u64 {
    let mut out = 0;
    let mut i = 0;
    while i < 8 {
        let byte = ((a >> (8 * i)) & 0xff) as u8;
        out |= (byte.reverse_bits() as u64) << (8 * i);
        i += 1;
    }
    out
}
