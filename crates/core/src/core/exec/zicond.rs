//! Zicond handlers.

use super::reg_reg_handlers;
use crate::common::error::Trap;
use crate::core::Cpu;
use crate::core::units::alu::AluOp;
use crate::isa::Insn;

reg_reg_handlers! {
    /// `czero.eqz`: `rd = rs2 == 0 ? 0 : rs1`.
    czero_eqz => AluOp::CzeroEqz,
    /// `czero.nez`: `rd = rs2 != 0 ? 0 : rs1`.
    czero_nez => AluOp::CzeroNez,
}
