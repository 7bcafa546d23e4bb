//! ALU shift and rotate operations.
//!
//! Shift amounts use the low 6 bits of `b` (5 bits in word form). Word-form
//! results are sign-extended from bit 31.

use super::{AluOp, sext32};

/// Executes a shift or rotate; `word` selects the 32-bit form.
pub fn execute(op: AluOp, a: u64, b: u64, word: bool) -> u64 {
    if word {
        let (a, sh) = (a as u32, (b & 0x1f) as u32);
        let result = match op {
            AluOp::Sll => a << sh,
            AluOp::Srl => a >> sh,
            AluOp::Sra => ((a as i32) >> sh) as u32,
            AluOp::Rol => a.rotate_left(sh),
            AluOp::Ror => a.rotate_right(sh),
            _ => 0,
        };
        sext32(u64::from(result))
    } else {
        let sh = (b & 0x3f) as u32;
        match op {
            AluOp::Sll => a << sh,
            AluOp::Srl => a >> sh,
            AluOp::Sra => ((a as i64) >> sh) as u64,
            AluOp::Rol => a.rotate_left(sh),
            AluOp::Ror => a.rotate_right(sh),
            _ => 0,
        }
    }
}
