//! Vector fixed-point handlers.
//!
//! Rounding uses `vxrm` as it stands when the instruction starts. Saturating
//! forms set `vxsat` when any active element clamped; nothing here clears it.

use super::done;
use crate::common::error::Trap;
use crate::core::Cpu;
use crate::core::arch::vtype::Vxrm;
use crate::core::units::vector::engine::{self, Operand};
use crate::core::units::vector::fixed_point as fx;
use crate::isa::Insn;
use crate::isa::rvv::{category, opi, opm};

fn operand(cpu: &Cpu, insn: Insn, unsigned_imm: bool) -> Operand {
    match insn.funct3() {
        category::OPIVV | category::OPMVV => Operand::Vector(insn.rs1()),
        category::OPIVX | category::OPMVX => Operand::Scalar(cpu.x(insn.rs1())),
        _ if unsigned_imm => Operand::Scalar(insn.v_zimm5()),
        _ => Operand::Scalar(insn.v_simm5() as u64),
    }
}

fn saturated(cpu: &mut Cpu, clamped: bool) {
    if clamped {
        cpu.state.vector.vxsat = true;
    }
}

/// `vsaddu`, `vsadd`, `vssubu`, `vssub`.
pub fn saturating(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let op: fn(u64, u64, u32) -> (u64, bool) = match insn.v_funct6() {
        opi::VSADDU => fx::saturating_add_unsigned,
        opi::VSADD => fx::saturating_add,
        opi::VSSUBU => fx::saturating_sub_unsigned,
        opi::VSSUB => fx::saturating_sub,
        _ => return Err(Trap::IllegalInstruction(insn.bits())),
    };
    let rhs = operand(cpu, insn, false);
    let mut clamped = false;
    engine::single_width(cpu, insn, rhs, |a, b, sew| {
        let (value, sat) = op(a, b, sew);
        clamped |= sat;
        value
    })?;
    saturated(cpu, clamped);
    done(insn, pc)
}

/// `vaaddu`, `vaadd`, `vasubu`, `vasub`.
pub fn averaging(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let op: fn(u64, u64, u32, Vxrm) -> u64 = match insn.v_funct6() {
        opm::VAADDU => fx::averaging_add_unsigned,
        opm::VAADD => fx::averaging_add,
        opm::VASUBU => fx::averaging_sub_unsigned,
        opm::VASUB => fx::averaging_sub,
        _ => return Err(Trap::IllegalInstruction(insn.bits())),
    };
    let vxrm = cpu.state.vector.vxrm;
    let rhs = operand(cpu, insn, false);
    engine::single_width(cpu, insn, rhs, |a, b, sew| op(a, b, sew, vxrm))?;
    done(insn, pc)
}

/// `vsmul`.
pub fn vsmul(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let vxrm = cpu.state.vector.vxrm;
    let rhs = operand(cpu, insn, false);
    let mut clamped = false;
    engine::single_width(cpu, insn, rhs, |a, b, sew| {
        let (value, sat) = fx::fractional_mul(a, b, sew, vxrm);
        clamped |= sat;
        value
    })?;
    saturated(cpu, clamped);
    done(insn, pc)
}

/// `vssrl`, `vssra`; the immediate form shifts by an unsigned amount.
pub fn scaling_shift(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let op: fn(u64, u64, u32, Vxrm) -> u64 = match insn.v_funct6() {
        opi::VSSRL => fx::scaling_shift_right_logical,
        opi::VSSRA => fx::scaling_shift_right_arith,
        _ => return Err(Trap::IllegalInstruction(insn.bits())),
    };
    let vxrm = cpu.state.vector.vxrm;
    let rhs = operand(cpu, insn, true);
    engine::single_width(cpu, insn, rhs, |a, b, sew| op(a, b, sew, vxrm))?;
    done(insn, pc)
}

/// `vnclipu`, `vnclip`.
pub fn clip(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let op: fn(u64, u64, u32, Vxrm) -> (u64, bool) = match insn.v_funct6() {
        opi::VNCLIPU => fx::narrowing_clip_unsigned,
        opi::VNCLIP => fx::narrowing_clip,
        _ => return Err(Trap::IllegalInstruction(insn.bits())),
    };
    let vxrm = cpu.state.vector.vxrm;
    let rhs = operand(cpu, insn, true);
    let mut clamped = false;
    engine::narrowing(cpu, insn, rhs, |a, b, sew| {
        let (value, sat) = op(a, b, sew, vxrm);
        clamped |= sat;
        value
    })?;
    saturated(cpu, clamped);
    done(insn, pc)
}
