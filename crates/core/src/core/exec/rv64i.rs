//! Base Integer Handlers.
//!
//! RV32I/RV64I: upper immediates, jumps and branches, loads and stores, the
//! register-immediate and register-register ALU forms with their RV64 `*W`
//! counterparts, `fence`, `ecall` and `ebreak`.

use super::{is_rv32, next_pc, reg_imm, reg_reg_handlers};
use crate::common::error::Trap;
use crate::core::Cpu;
use crate::core::units::alu::AluOp;
use crate::isa::Insn;
use crate::isa::rv64i::funct3;

// ── Upper immediates and jumps ─────────────────────────────────────────────

/// `lui`.
pub fn lui(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    cpu.set_x(insn.rd(), insn.u_imm() as u64);
    Ok(next_pc(insn, pc))
}

/// `auipc`.
pub fn auipc(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    cpu.set_x(insn.rd(), pc.wrapping_add(insn.u_imm() as u64));
    Ok(next_pc(insn, pc))
}

/// `jal`.
pub fn jal(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let target = cpu.jump_target(pc.wrapping_add(insn.uj_imm() as u64))?;
    cpu.set_x(insn.rd(), next_pc(insn, pc));
    Ok(target)
}

/// `jalr`. The target is computed before `rd` is written, so `rd == rs1` works.
pub fn jalr(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let base = cpu.x(insn.rs1());
    let target = cpu.jump_target(base.wrapping_add(insn.i_imm() as u64))?;
    cpu.set_x(insn.rd(), next_pc(insn, pc));
    Ok(target)
}

/// Conditional branches; `funct3` selects the comparison.
///
/// A misaligned target traps only when the branch is taken.
pub fn branch(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let (a, b) = (cpu.x(insn.rs1()), cpu.x(insn.rs2()));
    let taken = match insn.funct3() {
        funct3::BEQ => a == b,
        funct3::BNE => a != b,
        funct3::BLT => (a as i64) < (b as i64),
        funct3::BGE => (a as i64) >= (b as i64),
        funct3::BLTU => a < b,
        funct3::BGEU => a >= b,
        _ => return Err(Trap::IllegalInstruction(insn.bits())),
    };
    if taken {
        cpu.jump_target(pc.wrapping_add(insn.sb_imm() as u64))
    } else {
        Ok(next_pc(insn, pc))
    }
}

// ── Loads and stores ───────────────────────────────────────────────────────

/// Integer loads; `funct3` selects width and signedness.
pub fn load(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let (size, signed) = match insn.funct3() {
        funct3::LB => (1, true),
        funct3::LH => (2, true),
        funct3::LW => (4, true),
        funct3::LBU => (1, false),
        funct3::LHU => (2, false),
        funct3::LD => {
            cpu.require_rv64(insn)?;
            (8, false)
        }
        funct3::LWU => {
            cpu.require_rv64(insn)?;
            (4, false)
        }
        _ => return Err(Trap::IllegalInstruction(insn.bits())),
    };
    let addr = cpu.x(insn.rs1()).wrapping_add(insn.i_imm() as u64);
    let value = if signed {
        cpu.load_signed(addr, size)?
    } else {
        cpu.load(addr, size)?
    };
    cpu.set_x(insn.rd(), value);
    Ok(next_pc(insn, pc))
}

/// Integer stores; `funct3` selects the width.
pub fn store(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let size = match insn.funct3() {
        funct3::SB => 1,
        funct3::SH => 2,
        funct3::SW => 4,
        funct3::SD => {
            cpu.require_rv64(insn)?;
            8
        }
        _ => return Err(Trap::IllegalInstruction(insn.bits())),
    };
    let addr = cpu.x(insn.rs1()).wrapping_add(insn.s_imm() as u64);
    cpu.store(addr, size, cpu.x(insn.rs2()))?;
    Ok(next_pc(insn, pc))
}

// ── Register-immediate ─────────────────────────────────────────────────────

/// `addi`, `slti`, `sltiu`, `xori`, `ori`, `andi`.
pub fn op_imm(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let op = match insn.funct3() {
        funct3::ADD_SUB => AluOp::Add,
        funct3::SLT => AluOp::Slt,
        funct3::SLTU => AluOp::Sltu,
        funct3::XOR => AluOp::Xor,
        funct3::OR => AluOp::Or,
        funct3::AND => AluOp::And,
        _ => return Err(Trap::IllegalInstruction(insn.bits())),
    };
    let imm = cpu.xlen().sext(insn.i_imm() as u64);
    reg_imm(cpu, insn, pc, op, imm, false)
}

/// Immediate shift amount; `shamt[5]` is reserved on RV32.
fn shift_amount(cpu: &Cpu, insn: Insn) -> Result<u64, Trap> {
    let shamt = insn.shamt();
    cpu.require(!is_rv32(cpu) || shamt < 32, insn)?;
    Ok(u64::from(shamt))
}

/// `slli`.
pub fn slli(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let shamt = shift_amount(cpu, insn)?;
    reg_imm(cpu, insn, pc, AluOp::Sll, shamt, false)
}

/// `srli`.
pub fn srli(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let shamt = shift_amount(cpu, insn)?;
    reg_imm(cpu, insn, pc, AluOp::Srl, shamt, false)
}

/// `srai`.
pub fn srai(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let shamt = shift_amount(cpu, insn)?;
    reg_imm(cpu, insn, pc, AluOp::Sra, shamt, false)
}

/// `addiw`.
pub fn addiw(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    reg_imm(cpu, insn, pc, AluOp::Add, insn.i_imm() as u64, true)
}

/// `slliw`, `srliw`, `sraiw`; `funct7` picks the arithmetic form.
pub fn shift_imm_word(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let op = match (insn.funct3(), insn.funct7() == 0b010_0000) {
        (funct3::SLL, false) => AluOp::Sll,
        (funct3::SRL_SRA, false) => AluOp::Srl,
        (funct3::SRL_SRA, true) => AluOp::Sra,
        _ => return Err(Trap::IllegalInstruction(insn.bits())),
    };
    reg_imm(cpu, insn, pc, op, u64::from(insn.shamt() & 0x1f), true)
}

// ── Register-register ──────────────────────────────────────────────────────

reg_reg_handlers! {
    /// `add`.
    add => AluOp::Add,
    /// `sub`.
    sub => AluOp::Sub,
    /// `sll`.
    sll => AluOp::Sll,
    /// `slt`.
    slt => AluOp::Slt,
    /// `sltu`.
    sltu => AluOp::Sltu,
    /// `xor`.
    xor => AluOp::Xor,
    /// `srl`.
    srl => AluOp::Srl,
    /// `sra`.
    sra => AluOp::Sra,
    /// `or`.
    or => AluOp::Or,
    /// `and`.
    and => AluOp::And,
}

reg_reg_handlers! {
    word:
    /// `addw`.
    addw => AluOp::Add,
    /// `subw`.
    subw => AluOp::Sub,
    /// `sllw`.
    sllw => AluOp::Sll,
    /// `srlw`.
    srlw => AluOp::Srl,
    /// `sraw`.
    sraw => AluOp::Sra,
}

// ── Fences and environment ─────────────────────────────────────────────────

/// `fence`. Accesses complete in program order, so ordering is already satisfied.
pub fn fence(_cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    Ok(next_pc(insn, pc))
}

/// `ecall`.
pub fn ecall(cpu: &mut Cpu, _insn: Insn, _pc: u64) -> Result<u64, Trap> {
    Err(cpu.environment_call())
}

/// `ebreak`. Debug-mode entry, when enabled, happens in the trap model.
pub fn ebreak(_cpu: &mut Cpu, _insn: Insn, pc: u64) -> Result<u64, Trap> {
    Err(Trap::Breakpoint(pc))
}
