//! Instruction encoders.
//!
//! A fluent builder for the base formats plus free functions for the
//! encodings the tests use most.

use rviss_core::isa::opcodes::*;
use rviss_core::isa::privileged::opcodes::{CSRRS, CSRRW};
use rviss_core::isa::rvv::category::{OPCFG, OPIVV, OPMVV};

pub struct InstructionBuilder {
    opcode: u32,
    rd: u32,
    funct3: u32,
    rs1: u32,
    rs2: u32,
    funct7: u32,
    imm: i32,
}

impl Default for InstructionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl InstructionBuilder {
    pub const fn new() -> Self {
        Self {
            opcode: 0,
            rd: 0,
            funct3: 0,
            rs1: 0,
            rs2: 0,
            funct7: 0,
            imm: 0,
        }
    }

    pub const fn opcode(mut self, op: u32) -> Self {
        self.opcode = op;
        self
    }

    pub const fn rd(mut self, rd: u32) -> Self {
        self.rd = rd;
        self
    }

    pub const fn rs1(mut self, rs1: u32) -> Self {
        self.rs1 = rs1;
        self
    }

    pub const fn rs2(mut self, rs2: u32) -> Self {
        self.rs2 = rs2;
        self
    }

    pub const fn funct3(mut self, funct3: u32) -> Self {
        self.funct3 = funct3;
        self
    }

    pub const fn funct7(mut self, funct7: u32) -> Self {
        self.funct7 = funct7;
        self
    }

    pub const fn imm(mut self, imm: i32) -> Self {
        self.imm = imm;
        self
    }

    pub const fn build_r(self) -> u32 {
        (self.funct7 << 25)
            | (self.rs2 << 20)
            | (self.rs1 << 15)
            | (self.funct3 << 12)
            | (self.rd << 7)
            | self.opcode
    }

    pub const fn build_i(self) -> u32 {
        ((self.imm as u32 & 0xfff) << 20)
            | (self.rs1 << 15)
            | (self.funct3 << 12)
            | (self.rd << 7)
            | self.opcode
    }

    pub const fn build_s(self) -> u32 {
        let imm = self.imm as u32;
        (((imm >> 5) & 0x7f) << 25)
            | (self.rs2 << 20)
            | (self.rs1 << 15)
            | (self.funct3 << 12)
            | ((imm & 0x1f) << 7)
            | self.opcode
    }

    pub const fn build_j(self) -> u32 {
        let imm = self.imm as u32;
        (((imm >> 20) & 1) << 31)
            | (((imm >> 1) & 0x3ff) << 21)
            | (((imm >> 11) & 1) << 20)
            | (((imm >> 12) & 0xff) << 12)
            | (self.rd << 7)
            | self.opcode
    }
}

// ──────────────────────────────────────────────────────────
// Base integer
// ──────────────────────────────────────────────────────────

pub const fn addi(rd: u32, rs1: u32, imm: i32) -> u32 {
    InstructionBuilder::new().opcode(OP_IMM).rd(rd).rs1(rs1).imm(imm).build_i()
}

pub const fn add(rd: u32, rs1: u32, rs2: u32) -> u32 {
    InstructionBuilder::new().opcode(OP_REG).rd(rd).rs1(rs1).rs2(rs2).build_r()
}

pub const fn ld(rd: u32, rs1: u32, imm: i32) -> u32 {
    InstructionBuilder::new().opcode(OP_LOAD).funct3(0b011).rd(rd).rs1(rs1).imm(imm).build_i()
}

pub const fn sd(rs2: u32, rs1: u32, imm: i32) -> u32 {
    InstructionBuilder::new().opcode(OP_STORE).funct3(0b011).rs1(rs1).rs2(rs2).imm(imm).build_s()
}

pub const fn jal(rd: u32, imm: i32) -> u32 {
    InstructionBuilder::new().opcode(OP_JAL).rd(rd).imm(imm).build_j()
}

/// `lr.d rd, (rs1)`
pub const fn lr_d(rd: u32, rs1: u32) -> u32 {
    InstructionBuilder::new().opcode(OP_AMO).funct3(0b011).funct7(0b00010 << 2).rd(rd).rs1(rs1).build_r()
}

/// `sc.d rd, rs2, (rs1)`
pub const fn sc_d(rd: u32, rs2: u32, rs1: u32) -> u32 {
    InstructionBuilder::new()
        .opcode(OP_AMO)
        .funct3(0b011)
        .funct7(0b00011 << 2)
        .rd(rd)
        .rs1(rs1)
        .rs2(rs2)
        .build_r()
}

/// `amoadd.d rd, rs2, (rs1)`
pub const fn amoadd_d(rd: u32, rs2: u32, rs1: u32) -> u32 {
    InstructionBuilder::new().opcode(OP_AMO).funct3(0b011).rd(rd).rs1(rs1).rs2(rs2).build_r()
}

// ──────────────────────────────────────────────────────────
// CSR access
// ──────────────────────────────────────────────────────────

pub const fn csrrw(rd: u32, csr: u16, rs1: u32) -> u32 {
    InstructionBuilder::new()
        .opcode(OP_SYSTEM)
        .funct3(CSRRW)
        .rd(rd)
        .rs1(rs1)
        .imm(csr as i32)
        .build_i()
}

pub const fn csrrs(rd: u32, csr: u16, rs1: u32) -> u32 {
    InstructionBuilder::new()
        .opcode(OP_SYSTEM)
        .funct3(CSRRS)
        .rd(rd)
        .rs1(rs1)
        .imm(csr as i32)
        .build_i()
}

/// `csrr rd, csr`
pub const fn csrr(rd: u32, csr: u16) -> u32 {
    csrrs(rd, csr, 0)
}

/// `csrw csr, rs1`
pub const fn csrw(csr: u16, rs1: u32) -> u32 {
    csrrw(0, csr, rs1)
}

// ──────────────────────────────────────────────────────────
// Floating point
// ──────────────────────────────────────────────────────────

/// An `OP-FP` word with `funct7 = funct5 << 2 | fmt` and `rm` in `funct3`.
pub const fn fp_op(funct5: u32, fmt: u32, rd: u32, rs1: u32, rs2: u32, rm: u32) -> u32 {
    InstructionBuilder::new()
        .opcode(OP_FP)
        .funct7((funct5 << 2) | fmt)
        .funct3(rm)
        .rd(rd)
        .rs1(rs1)
        .rs2(rs2)
        .build_r()
}

/// `fadd.d rd, rs1, rs2, rm`
pub const fn fadd_d(rd: u32, rs1: u32, rs2: u32, rm: u32) -> u32 {
    fp_op(0b00000, 0b01, rd, rs1, rs2, rm)
}

/// `fdiv.d rd, rs1, rs2, rm`
pub const fn fdiv_d(rd: u32, rs1: u32, rs2: u32, rm: u32) -> u32 {
    fp_op(0b00011, 0b01, rd, rs1, rs2, rm)
}

/// `fadd.s rd, rs1, rs2, rm`
pub const fn fadd_s(rd: u32, rs1: u32, rs2: u32, rm: u32) -> u32 {
    fp_op(0b00000, 0b00, rd, rs1, rs2, rm)
}

// ──────────────────────────────────────────────────────────
// Vector
// ──────────────────────────────────────────────────────────

/// `vtypei` for the given SEW (8..64), signed `lmul` log2, and policy bits.
pub const fn vtype(sew: u32, lmul_log2: i32, ta: bool, ma: bool) -> u32 {
    let vsew = match sew {
        8 => 0,
        16 => 1,
        32 => 2,
        _ => 3,
    };
    ((ma as u32) << 7) | ((ta as u32) << 6) | (vsew << 3) | (lmul_log2 as u32 & 0b111)
}

pub const fn vsetvli(rd: u32, rs1: u32, vtypei: u32) -> u32 {
    ((vtypei & 0x7ff) << 20) | (rs1 << 15) | (OPCFG << 12) | (rd << 7) | OP_V
}

pub const fn vsetivli(rd: u32, avl: u32, vtypei: u32) -> u32 {
    (0b11 << 30) | ((vtypei & 0x3ff) << 20) | ((avl & 0x1f) << 15) | (OPCFG << 12) | (rd << 7) | OP_V
}

/// An `OP-V` arithmetic word: `funct6 vd, vs2, vs1` in category `funct3`.
pub const fn varith(funct6: u32, funct3: u32, vd: u32, vs2: u32, vs1: u32, masked: bool) -> u32 {
    (funct6 << 26)
        | ((!masked as u32) << 25)
        | (vs2 << 20)
        | (vs1 << 15)
        | (funct3 << 12)
        | (vd << 7)
        | OP_V
}

/// `vadd.vv vd, vs2, vs1[, v0.t]`
pub const fn vadd_vv(vd: u32, vs2: u32, vs1: u32, masked: bool) -> u32 {
    varith(0, OPIVV, vd, vs2, vs1, masked)
}

/// Width code of a unit-stride access of `eew` bits.
const fn vmem_width(eew: u32) -> u32 {
    match eew {
        8 => 0b000,
        16 => 0b101,
        32 => 0b110,
        _ => 0b111,
    }
}

/// `vle<eew>.v vd, (rs1)`, unmasked.
pub const fn vle(eew: u32, vd: u32, rs1: u32) -> u32 {
    (1 << 25) | (rs1 << 15) | (vmem_width(eew) << 12) | (vd << 7) | OP_LOAD_FP
}

/// `vse<eew>.v vs3, (rs1)`, unmasked.
pub const fn vse(eew: u32, vs3: u32, rs1: u32) -> u32 {
    (1 << 25) | (rs1 << 15) | (vmem_width(eew) << 12) | (vs3 << 7) | OP_STORE_FP
}

/// `vle<eew>ff.v vd, (rs1)`, unmasked.
pub const fn vle_ff(eew: u32, vd: u32, rs1: u32) -> u32 {
    vle(eew, vd, rs1) | (0b10000 << 20)
}

/// `vluxei<eew>.v vd, (rs1), vs2`, unmasked.
pub const fn vluxei(eew: u32, vd: u32, rs1: u32, vs2: u32) -> u32 {
    (0b01 << 26) | (1 << 25) | (vs2 << 20) | (rs1 << 15) | (vmem_width(eew) << 12) | (vd << 7) | OP_LOAD_FP
}

/// `vsoxei<eew>.v vs3, (rs1), vs2`, unmasked.
pub const fn vsoxei(eew: u32, vs3: u32, rs1: u32, vs2: u32) -> u32 {
    (0b11 << 26) | (1 << 25) | (vs2 << 20) | (rs1 << 15) | (vmem_width(eew) << 12) | (vs3 << 7) | OP_STORE_FP
}

/// An unmasked `OP-VE` crypto word; `vs1` doubles as the selector or round number.
pub const fn vcrypto(funct6: u32, vd: u32, vs2: u32, vs1: u32) -> u32 {
    (funct6 << 26) | (1 << 25) | (vs2 << 20) | (vs1 << 15) | (OPMVV << 12) | (vd << 7) | OP_VE
}
