//! Zba and Zbb handlers.

use super::{is_rv32, next_pc, reg_imm, reg_reg, reg_reg_handlers};
use crate::common::error::Trap;
use crate::core::Cpu;
use crate::core::units::alu::AluOp;
use crate::core::units::alu::bits::{self, BitOp};
use crate::isa::{Insn, opcodes};

// ── Zba ────────────────────────────────────────────────────────────────────

reg_reg_handlers! {
    /// `sh1add`.
    sh1add => AluOp::ShAdd(1),
    /// `sh2add`.
    sh2add => AluOp::ShAdd(2),
    /// `sh3add`.
    sh3add => AluOp::ShAdd(3),
}

/// `add.uw` and `sh{1,2,3}add.uw`; `funct3` gives the shift (`000` is `add.uw`).
pub fn shadd_uw(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    cpu.require_rv64(insn)?;
    let shift = insn.funct3() >> 1;
    reg_reg(cpu, insn, pc, AluOp::ShAddUw(shift), false)
}

/// `slli.uw`.
pub fn slli_uw(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    cpu.require_rv64(insn)?;
    reg_imm(cpu, insn, pc, AluOp::ShAddUw(insn.shamt()), 0, false)
}

// ── Zbb ────────────────────────────────────────────────────────────────────

reg_reg_handlers! {
    /// `andn`.
    andn => AluOp::Andn,
    /// `orn`.
    orn => AluOp::Orn,
    /// `xnor`.
    xnor => AluOp::Xnor,
    /// `min`.
    min => AluOp::Min,
    /// `minu`.
    minu => AluOp::Minu,
    /// `max`.
    max => AluOp::Max,
    /// `maxu`.
    maxu => AluOp::Maxu,
    /// `rol`.
    rol => AluOp::Rol,
    /// `ror`.
    ror => AluOp::Ror,
}

reg_reg_handlers! {
    word:
    /// `rolw`.
    rolw => AluOp::Rol,
    /// `rorw`.
    rorw => AluOp::Ror,
}

/// `rori`. The shift amount is 6 bits on RV64, 5 on RV32.
pub fn rori(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let shamt = insn.shamt();
    cpu.require(!is_rv32(cpu) || shamt < 32, insn)?;
    reg_imm(cpu, insn, pc, AluOp::Ror, u64::from(shamt), false)
}

/// `roriw`.
pub fn roriw(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    reg_imm(cpu, insn, pc, AluOp::Ror, u64::from(insn.shamt() & 0x1f), true)
}

fn unary_op(insn: Insn) -> Result<BitOp, Trap> {
    match insn.rs2() {
        0 => Ok(BitOp::Clz),
        1 => Ok(BitOp::Ctz),
        2 => Ok(BitOp::Cpop),
        4 => Ok(BitOp::SextB),
        5 => Ok(BitOp::SextH),
        _ => Err(Trap::IllegalInstruction(insn.bits())),
    }
}

fn bit_op(cpu: &mut Cpu, insn: Insn, pc: u64, op: BitOp, word: bool) -> Result<u64, Trap> {
    let xlen = cpu.xlen().bits();
    let result = bits::execute(op, cpu.x(insn.rs1()), xlen, word);
    cpu.set_x(insn.rd(), result);
    Ok(next_pc(insn, pc))
}

/// `clz`, `ctz`, `cpop`, `sext.b`, `sext.h`; the `rs2` field selects the operation.
pub fn unary(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let op = unary_op(insn)?;
    bit_op(cpu, insn, pc, op, false)
}

/// `clzw`, `ctzw`, `cpopw`.
pub fn unary_word(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    cpu.require_rv64(insn)?;
    let op = unary_op(insn)?;
    cpu.require(matches!(op, BitOp::Clz | BitOp::Ctz | BitOp::Cpop), insn)?;
    bit_op(cpu, insn, pc, op, true)
}

/// `zext.h`. RV32 encodes it in OP, RV64 in OP-32.
pub fn zext_h(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    cpu.require((insn.opcode() == opcodes::OP_REG) == is_rv32(cpu), insn)?;
    bit_op(cpu, insn, pc, BitOp::ZextH, false)
}

/// `orc.b`.
pub fn orc_b(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    bit_op(cpu, insn, pc, BitOp::OrcB, false)
}

/// `rev8`. The encoding carries the XLEN-dependent shift amount `XLEN - 8`.
pub fn rev8(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    cpu.require(insn.shamt() + 8 == cpu.xlen().bits(), insn)?;
    bit_op(cpu, insn, pc, BitOp::Rev8, false)
}
