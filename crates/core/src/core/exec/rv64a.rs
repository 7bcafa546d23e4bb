//! Atomic handlers (A): `lr`, `sc` and the `amo*` family, word and doubleword.

use super::next_pc;
use crate::common::error::Trap;
use crate::core::Cpu;
use crate::core::units::lsu::AmoOp;
use crate::isa::Insn;
use crate::isa::rv64i::funct3;

fn width(cpu: &Cpu, insn: Insn) -> Result<usize, Trap> {
    match insn.funct3() {
        funct3::AMO_W => Ok(4),
        funct3::AMO_D => {
            cpu.require_rv64(insn)?;
            Ok(8)
        }
        _ => Err(Trap::IllegalInstruction(insn.bits())),
    }
}

fn extend(value: u64, size: usize) -> u64 {
    if size == 4 { value as i32 as i64 as u64 } else { value }
}

/// `lr.w`, `lr.d`.
pub fn lr(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    cpu.require(insn.rs2() == 0, insn)?;
    let size = width(cpu, insn)?;
    let value = cpu.load_reserved(cpu.x(insn.rs1()), size)?;
    cpu.set_x(insn.rd(), extend(value, size));
    Ok(next_pc(insn, pc))
}

/// `sc.w`, `sc.d`. Writes 0 to `rd` on success and 1 on failure.
pub fn sc(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let size = width(cpu, insn)?;
    let stored = cpu.store_conditional(cpu.x(insn.rs1()), size, cpu.x(insn.rs2()))?;
    cpu.set_x(insn.rd(), u64::from(!stored));
    Ok(next_pc(insn, pc))
}

/// Every `amo<op>.w` and `amo<op>.d`; `funct5` selects the operation.
pub fn amo(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let size = width(cpu, insn)?;
    let op = AmoOp::from_funct5(insn.funct7() >> 2)
        .ok_or(Trap::IllegalInstruction(insn.bits()))?;
    let operand = cpu.x(insn.rs2());
    let old = cpu.amo(cpu.x(insn.rs1()), size, |mem| op.apply(mem, operand, size))?;
    cpu.set_x(insn.rd(), extend(old, size));
    Ok(next_pc(insn, pc))
}
