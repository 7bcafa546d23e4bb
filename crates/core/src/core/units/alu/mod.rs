//! Arithmetic Logic Unit (ALU).
//!
//! Integer operations shared by the base ISA, M, Zba, Zbb and Zicond handlers.
//! Every operation has a full-width form and a word form (`word == true`) that
//! operates on the low 32 bits and sign-extends the result. The word form serves
//! both the RV64 `*W` instructions and every instruction on RV32.
//!
//! Operations are organized into submodules by category:
//! - [`arithmetic`]: add/sub, the multiply family, divide/remainder, `shNadd`
//! - [`logic`]:      bitwise ops, set-less-than, min/max, conditional zero
//! - [`shifts`]:     logical and arithmetic shifts, rotates
//! - [`bits`]:       Zbb single-operand ops (count, extend, byte ops)

/// Add, subtract, multiply, divide.
pub mod arithmetic;

/// Single-operand bit-manipulation.
pub mod bits;

/// Bitwise logic and comparisons.
pub mod logic;

/// Shifts and rotates.
pub mod shifts;

/// Two-operand integer operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AluOp {
    /// `a + b`.
    Add,
    /// `a - b`.
    Sub,
    /// Low half of `a * b`.
    Mul,
    /// High half, signed × signed.
    Mulh,
    /// High half, signed × unsigned.
    Mulhsu,
    /// High half, unsigned × unsigned.
    Mulhu,
    /// Signed division.
    Div,
    /// Unsigned division.
    Divu,
    /// Signed remainder.
    Rem,
    /// Unsigned remainder.
    Remu,
    /// `(a << n) + b` for `shNadd`, `n` in 1..=3.
    ShAdd(u32),
    /// `(zext32(a) << n) + b` for `shNadd.uw` and `add.uw` (`n` = 0).
    ShAddUw(u32),
    /// Bitwise OR.
    Or,
    /// Bitwise AND.
    And,
    /// Bitwise XOR.
    Xor,
    /// `a & !b`.
    Andn,
    /// `a | !b`.
    Orn,
    /// `!(a ^ b)`.
    Xnor,
    /// Signed less-than.
    Slt,
    /// Unsigned less-than.
    Sltu,
    /// Signed minimum.
    Min,
    /// Unsigned minimum.
    Minu,
    /// Signed maximum.
    Max,
    /// Unsigned maximum.
    Maxu,
    /// `b == 0 ? 0 : a`.
    CzeroEqz,
    /// `b != 0 ? 0 : a`.
    CzeroNez,
    /// Shift left logical.
    Sll,
    /// Shift right logical.
    Srl,
    /// Shift right arithmetic.
    Sra,
    /// Rotate left.
    Rol,
    /// Rotate right.
    Ror,
}

/// Arithmetic Logic Unit for integer operations.
pub struct Alu;

impl Alu {
    /// Executes a two-operand operation.
    ///
    /// # Examples
    ///
    /// ```
    /// use rviss_core::core::units::alu::{Alu, AluOp};
    ///
    /// assert_eq!(Alu::execute(AluOp::Add, 42, 8, false), 50);
    /// // Word forms wrap at 32 bits and sign-extend.
    /// assert_eq!(Alu::execute(AluOp::Add, 0x7fff_ffff, 1, true), 0xffff_ffff_8000_0000);
    /// assert_eq!(Alu::execute(AluOp::Divu, 100, 7, false), 14);
    /// assert_eq!(Alu::execute(AluOp::Div, 1, 0, false), u64::MAX);
    /// ```
    pub fn execute(op: AluOp, a: u64, b: u64, word: bool) -> u64 {
        match op {
            AluOp::Add
            | AluOp::Sub
            | AluOp::Mul
            | AluOp::Mulh
            | AluOp::Mulhsu
            | AluOp::Mulhu
            | AluOp::Div
            | AluOp::Divu
            | AluOp::Rem
            | AluOp::Remu
            | AluOp::ShAdd(_)
            | AluOp::ShAddUw(_) => arithmetic::execute(op, a, b, word),

            AluOp::Or
            | AluOp::And
            | AluOp::Xor
            | AluOp::Andn
            | AluOp::Orn
            | AluOp::Xnor
            | AluOp::Slt
            | AluOp::Sltu
            | AluOp::Min
            | AluOp::Minu
            | AluOp::Max
            | AluOp::Maxu
            | AluOp::CzeroEqz
            | AluOp::CzeroNez => logic::execute(op, a, b, word),

            AluOp::Sll | AluOp::Srl | AluOp::Sra | AluOp::Rol | AluOp::Ror => {
                shifts::execute(op, a, b, word)
            }
        }
    }
}

/// Sign-extends the low 32 bits.
#[inline(always)]
pub(crate) const fn sext32(value: u64) -> u64 {
    value as i32 as i64 as u64
}
