//! ALU logical and comparison operations.
//!
//! Bitwise logic (including the Zbb inverted forms), set-less-than, Zbb
//! min/max and the Zicond conditional-zero operations. Comparisons in word
//! form consider only the low 32 bits.

use super::{AluOp, sext32};

/// Executes a logic or comparison operation; `word` selects the 32-bit form.
pub fn execute(op: AluOp, a: u64, b: u64, word: bool) -> u64 {
    let (a, b) = if word { (sext32(a), sext32(b)) } else { (a, b) };
    let result = match op {
        AluOp::Or => a | b,
        AluOp::And => a & b,
        AluOp::Xor => a ^ b,
        AluOp::Andn => a & !b,
        AluOp::Orn => a | !b,
        AluOp::Xnor => !(a ^ b),
        AluOp::Slt => u64::from((a as i64) < (b as i64)),
        AluOp::Sltu => u64::from(a < b),
        AluOp::Min => (a as i64).min(b as i64) as u64,
        AluOp::Max => (a as i64).max(b as i64) as u64,
        AluOp::Minu => a.min(b),
        AluOp::Maxu => a.max(b),
        AluOp::CzeroEqz => if b == 0 { 0 } else { a },
        AluOp::CzeroNez => if b == 0 { a } else { 0 },
        _ => 0,
    };
    if word { sext32(result) } else { result }
}
