//! ALU arithmetic operations.
//!
//! Addition, subtraction, the M-extension multiply/divide family and the Zba
//! shift-and-add forms. Division by zero and signed overflow follow the
//! architectural results instead of trapping:
//!
//! | op      | `b == 0`     | `MIN / -1` |
//! |---------|--------------|------------|
//! | div     | all ones     | `MIN`      |
//! | divu    | all ones     | n/a        |
//! | rem     | `a`          | `0`        |
//! | remu    | `a`          | n/a        |

use super::{AluOp, sext32};

/// Executes an arithmetic operation; `word` selects the 32-bit form.
pub fn execute(op: AluOp, a: u64, b: u64, word: bool) -> u64 {
    if word {
        word_op(op, a as u32, b as u32)
    } else {
        full_op(op, a, b)
    }
}

fn full_op(op: AluOp, a: u64, b: u64) -> u64 {
    let (sa, sb) = (a as i64, b as i64);
    match op {
        AluOp::Add => a.wrapping_add(b),
        AluOp::Sub => a.wrapping_sub(b),
        AluOp::Mul => a.wrapping_mul(b),
        AluOp::Mulh => ((i128::from(sa) * i128::from(sb)) >> 64) as u64,
        AluOp::Mulhsu => ((i128::from(sa) * i128::from(b)) >> 64) as u64,
        AluOp::Mulhu => ((u128::from(a) * u128::from(b)) >> 64) as u64,
        AluOp::Div if b == 0 => u64::MAX,
        AluOp::Div => sa.wrapping_div(sb) as u64,
        AluOp::Divu => a.checked_div(b).unwrap_or(u64::MAX),
        AluOp::Rem if b == 0 => a,
        AluOp::Rem => sa.wrapping_rem(sb) as u64,
        AluOp::Remu => a.checked_rem(b).unwrap_or(a),
        AluOp::ShAdd(n) => (a << n).wrapping_add(b),
        AluOp::ShAddUw(n) => (u64::from(a as u32) << n).wrapping_add(b),
        _ => 0,
    }
}

fn word_op(op: AluOp, a: u32, b: u32) -> u64 {
    let (sa, sb) = (a as i32, b as i32);
    let result = match op {
        AluOp::Add => a.wrapping_add(b),
        AluOp::Sub => a.wrapping_sub(b),
        AluOp::Mul => a.wrapping_mul(b),
        AluOp::Mulh => ((i64::from(sa) * i64::from(sb)) >> 32) as u32,
        AluOp::Mulhsu => ((i64::from(sa) * i64::from(b)) >> 32) as u32,
        AluOp::Mulhu => ((u64::from(a) * u64::from(b)) >> 32) as u32,
        AluOp::Div if b == 0 => u32::MAX,
        AluOp::Div => sa.wrapping_div(sb) as u32,
        AluOp::Divu => a.checked_div(b).unwrap_or(u32::MAX),
        AluOp::Rem if b == 0 => a,
        AluOp::Rem => sa.wrapping_rem(sb) as u32,
        AluOp::Remu => a.checked_rem(b).unwrap_or(a),
        AluOp::ShAdd(n) | AluOp::ShAddUw(n) => (a << n).wrapping_add(b),
        _ => 0,
    };
    sext32(u64::from(result))
}
