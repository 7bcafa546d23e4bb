//! Compressed (C) handlers.
//!
//! One handler per quadrant/`funct3` slot; the slots whose meaning depends on
//! XLEN (`c.addiw`/`c.jal`, `c.ld`/`c.flw`, `c.sd`/`c.fsw` and their stack
//! forms) branch on it. Reserved encodings inside a slot are illegal.
//! Compressed floating-point accesses additionally require F or D.

use super::{is_rv32, next_pc};
use crate::common::error::Trap;
use crate::core::Cpu;
use crate::core::units::alu::{Alu, AluOp};
use crate::core::units::fpu::nan_handling::box_f32;
use crate::isa::Insn;

const fn field(insn: Insn, lo: u32, len: u32) -> u64 {
    (insn.bits() >> lo) & ((1 << len) - 1)
}

fn alu(cpu: &mut Cpu, rd: usize, op: AluOp, a: u64, b: u64, word: bool) {
    let result = Alu::execute(op, a, b, word || is_rv32(cpu));
    cpu.set_x(rd, result);
}

fn load_int(cpu: &mut Cpu, insn: Insn, pc: u64, rd: usize, addr: u64, size: usize) -> Result<u64, Trap> {
    let value = if size == 4 {
        cpu.load_signed(addr, 4)?
    } else {
        cpu.load(addr, size)?
    };
    cpu.set_x(rd, value);
    Ok(next_pc(insn, pc))
}

fn load_fp(cpu: &mut Cpu, insn: Insn, pc: u64, rd: usize, addr: u64, size: usize) -> Result<u64, Trap> {
    cpu.require_extension(insn, if size == 8 { "d" } else { "f" })?;
    cpu.require_fp(insn)?;
    let value = cpu.load(addr, size)?;
    let bits = if size == 4 { box_f32(value as u32) } else { value };
    cpu.set_f(rd, bits);
    Ok(next_pc(insn, pc))
}

fn store_fp(cpu: &mut Cpu, insn: Insn, pc: u64, rs2: usize, addr: u64, size: usize) -> Result<u64, Trap> {
    cpu.require_extension(insn, if size == 8 { "d" } else { "f" })?;
    cpu.require_fp(insn)?;
    cpu.store(addr, size, cpu.f(rs2))?;
    Ok(next_pc(insn, pc))
}

fn store_int(cpu: &mut Cpu, insn: Insn, pc: u64, rs2: usize, addr: u64, size: usize) -> Result<u64, Trap> {
    cpu.store(addr, size, cpu.x(rs2))?;
    Ok(next_pc(insn, pc))
}

fn branch_to(cpu: &Cpu, pc: u64, offset: i64) -> Result<u64, Trap> {
    cpu.jump_target(pc.wrapping_add(offset as u64))
}

// ── Quadrant 0 ─────────────────────────────────────────────────────────────

/// `c.addi4spn`. A zero immediate (including the all-zero word) is illegal.
pub fn c_addi4spn(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let imm = insn.rvc_addi4spn_imm();
    cpu.require(imm != 0, insn)?;
    alu(cpu, insn.rvc_rs2s(), AluOp::Add, cpu.x(2), imm, false);
    Ok(next_pc(insn, pc))
}

/// `c.fld`.
pub fn c_fld(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let addr = cpu.x(insn.rvc_rs1s()).wrapping_add(insn.rvc_ld_imm());
    load_fp(cpu, insn, pc, insn.rvc_rs2s(), addr, 8)
}

/// `c.lw`.
pub fn c_lw(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let addr = cpu.x(insn.rvc_rs1s()).wrapping_add(insn.rvc_lw_imm());
    load_int(cpu, insn, pc, insn.rvc_rs2s(), addr, 4)
}

/// `c.ld` on RV64, `c.flw` on RV32.
pub fn c_ld(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let base = cpu.x(insn.rvc_rs1s());
    if is_rv32(cpu) {
        load_fp(cpu, insn, pc, insn.rvc_rs2s(), base.wrapping_add(insn.rvc_lw_imm()), 4)
    } else {
        load_int(cpu, insn, pc, insn.rvc_rs2s(), base.wrapping_add(insn.rvc_ld_imm()), 8)
    }
}

/// `c.fsd`.
pub fn c_fsd(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let addr = cpu.x(insn.rvc_rs1s()).wrapping_add(insn.rvc_ld_imm());
    store_fp(cpu, insn, pc, insn.rvc_rs2s(), addr, 8)
}

/// `c.sw`.
pub fn c_sw(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let addr = cpu.x(insn.rvc_rs1s()).wrapping_add(insn.rvc_lw_imm());
    store_int(cpu, insn, pc, insn.rvc_rs2s(), addr, 4)
}

/// `c.sd` on RV64, `c.fsw` on RV32.
pub fn c_sd(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let base = cpu.x(insn.rvc_rs1s());
    if is_rv32(cpu) {
        store_fp(cpu, insn, pc, insn.rvc_rs2s(), base.wrapping_add(insn.rvc_lw_imm()), 4)
    } else {
        store_int(cpu, insn, pc, insn.rvc_rs2s(), base.wrapping_add(insn.rvc_ld_imm()), 8)
    }
}

// ── Quadrant 1 ─────────────────────────────────────────────────────────────

/// `c.addi`; `c.nop` when `rd` is x0.
pub fn c_addi(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let rd = insn.rvc_rd();
    alu(cpu, rd, AluOp::Add, cpu.x(rd), insn.rvc_imm() as u64, false);
    Ok(next_pc(insn, pc))
}

/// `c.addiw` on RV64 (`rd` must not be x0), `c.jal` on RV32.
pub fn c_addiw(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    if is_rv32(cpu) {
        let target = branch_to(cpu, pc, insn.rvc_j_imm())?;
        cpu.set_x(1, next_pc(insn, pc));
        return Ok(target);
    }
    let rd = insn.rvc_rd();
    cpu.require(rd != 0, insn)?;
    alu(cpu, rd, AluOp::Add, cpu.x(rd), insn.rvc_imm() as u64, true);
    Ok(next_pc(insn, pc))
}

/// `c.li`.
pub fn c_li(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    cpu.set_x(insn.rvc_rd(), insn.rvc_imm() as u64);
    Ok(next_pc(insn, pc))
}

/// `c.addi16sp` when `rd` is x2, `c.lui` otherwise. A zero immediate is reserved.
pub fn c_lui(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let rd = insn.rvc_rd();
    if rd == 2 {
        let imm = insn.rvc_addi16sp_imm();
        cpu.require(imm != 0, insn)?;
        alu(cpu, 2, AluOp::Add, cpu.x(2), imm as u64, false);
    } else {
        let imm = insn.rvc_lui_imm();
        cpu.require(imm != 0, insn)?;
        cpu.set_x(rd, imm as u64);
    }
    Ok(next_pc(insn, pc))
}

/// `c.srli`, `c.srai`, `c.andi` and the CA-form register arithmetic.
pub fn c_misc_alu(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let rd = insn.rvc_rs1s();
    let a = cpu.x(rd);
    match field(insn, 10, 2) {
        0b00 | 0b01 => {
            let shamt = insn.rvc_zimm();
            cpu.require(!is_rv32(cpu) || shamt < 32, insn)?;
            let op = if field(insn, 10, 2) == 0 { AluOp::Srl } else { AluOp::Sra };
            alu(cpu, rd, op, a, u64::from(shamt), false);
        }
        0b10 => alu(cpu, rd, AluOp::And, a, insn.rvc_imm() as u64, false),
        _ => {
            let b = cpu.x(insn.rvc_rs2s());
            let (op, word) = match (field(insn, 12, 1), field(insn, 5, 2)) {
                (0, 0b00) => (AluOp::Sub, false),
                (0, 0b01) => (AluOp::Xor, false),
                (0, 0b10) => (AluOp::Or, false),
                (0, _) => (AluOp::And, false),
                (_, 0b00) => (AluOp::Sub, true),
                (_, 0b01) => (AluOp::Add, true),
                _ => return Err(Trap::IllegalInstruction(insn.bits())),
            };
            if word {
                cpu.require_rv64(insn)?;
            }
            alu(cpu, rd, op, a, b, word);
        }
    }
    Ok(next_pc(insn, pc))
}

/// `c.j`.
pub fn c_j(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    branch_to(cpu, pc, insn.rvc_j_imm())
}

/// `c.beqz`.
pub fn c_beqz(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    if cpu.x(insn.rvc_rs1s()) == 0 {
        branch_to(cpu, pc, insn.rvc_b_imm())
    } else {
        Ok(next_pc(insn, pc))
    }
}

/// `c.bnez`.
pub fn c_bnez(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    if cpu.x(insn.rvc_rs1s()) == 0 {
        Ok(next_pc(insn, pc))
    } else {
        branch_to(cpu, pc, insn.rvc_b_imm())
    }
}

// ── Quadrant 2 ─────────────────────────────────────────────────────────────

/// `c.slli`.
pub fn c_slli(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let shamt = insn.rvc_zimm();
    cpu.require(!is_rv32(cpu) || shamt < 32, insn)?;
    let rd = insn.rvc_rd();
    alu(cpu, rd, AluOp::Sll, cpu.x(rd), u64::from(shamt), false);
    Ok(next_pc(insn, pc))
}

/// `c.fldsp`.
pub fn c_fldsp(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let addr = cpu.x(2).wrapping_add(insn.rvc_ldsp_imm());
    load_fp(cpu, insn, pc, insn.rvc_rd(), addr, 8)
}

/// `c.lwsp`; `rd` must not be x0.
pub fn c_lwsp(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    cpu.require(insn.rvc_rd() != 0, insn)?;
    let addr = cpu.x(2).wrapping_add(insn.rvc_lwsp_imm());
    load_int(cpu, insn, pc, insn.rvc_rd(), addr, 4)
}

/// `c.ldsp` on RV64 (`rd` must not be x0), `c.flwsp` on RV32.
pub fn c_ldsp(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    if is_rv32(cpu) {
        let addr = cpu.x(2).wrapping_add(insn.rvc_lwsp_imm());
        return load_fp(cpu, insn, pc, insn.rvc_rd(), addr, 4);
    }
    cpu.require(insn.rvc_rd() != 0, insn)?;
    let addr = cpu.x(2).wrapping_add(insn.rvc_ldsp_imm());
    load_int(cpu, insn, pc, insn.rvc_rd(), addr, 8)
}

/// `c.jr`, `c.mv`, `c.ebreak`, `c.jalr`, `c.add`.
pub fn c_jr_mv_add(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let (rd, rs2) = (insn.rvc_rd(), insn.rvc_rs2());
    match (field(insn, 12, 1), rd, rs2) {
        (0, 0, 0) => Err(Trap::IllegalInstruction(insn.bits())),
        (0, _, 0) => branch_to(cpu, cpu.x(rd), 0),
        (0, _, _) => {
            cpu.set_x(rd, cpu.x(rs2));
            Ok(next_pc(insn, pc))
        }
        (_, 0, 0) => Err(Trap::Breakpoint(pc)),
        (_, _, 0) => {
            let target = branch_to(cpu, cpu.x(rd), 0)?;
            cpu.set_x(1, next_pc(insn, pc));
            Ok(target)
        }
        _ => {
            alu(cpu, rd, AluOp::Add, cpu.x(rd), cpu.x(rs2), false);
            Ok(next_pc(insn, pc))
        }
    }
}

/// `c.fsdsp`.
pub fn c_fsdsp(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let addr = cpu.x(2).wrapping_add(insn.rvc_sdsp_imm());
    store_fp(cpu, insn, pc, insn.rvc_rs2(), addr, 8)
}

/// `c.swsp`.
pub fn c_swsp(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let addr = cpu.x(2).wrapping_add(insn.rvc_swsp_imm());
    store_int(cpu, insn, pc, insn.rvc_rs2(), addr, 4)
}

/// `c.sdsp` on RV64, `c.fswsp` on RV32.
pub fn c_sdsp(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    if is_rv32(cpu) {
        let addr = cpu.x(2).wrapping_add(insn.rvc_swsp_imm());
        return store_fp(cpu, insn, pc, insn.rvc_rs2(), addr, 4);
    }
    let addr = cpu.x(2).wrapping_add(insn.rvc_sdsp_imm());
    store_int(cpu, insn, pc, insn.rvc_rs2(), addr, 8)
}
