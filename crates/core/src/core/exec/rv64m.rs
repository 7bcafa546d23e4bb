//! Multiply/divide handlers (M).

use super::reg_reg_handlers;
use crate::common::error::Trap;
use crate::core::Cpu;
use crate::core::units::alu::AluOp;
use crate::isa::Insn;

reg_reg_handlers! {
    /// `mul`.
    mul => AluOp::Mul,
    /// `mulh`.
    mulh => AluOp::Mulh,
    /// `mulhsu`.
    mulhsu => AluOp::Mulhsu,
    /// `mulhu`.
    mulhu => AluOp::Mulhu,
    /// `div`.
    div => AluOp::Div,
    /// `divu`.
    divu => AluOp::Divu,
    /// `rem`.
    rem => AluOp::Rem,
    /// `remu`.
    remu => AluOp::Remu,
}

reg_reg_handlers! {
    word:
    /// `mulw`.
    mulw => AluOp::Mul,
    /// `divw`.
    divw => AluOp::Div,
    /// `divuw`.
    divuw => AluOp::Divu,
    /// `remw`.
    remw => AluOp::Rem,
    /// `remuw`.
    remuw => AluOp::Remu,
}
