//! F and D handlers.
//!
//! Every handler first requires the FPU to be on (`mstatus.FS != Off`). The
//! format comes from `funct2` (`insn[26:25]`), and the dispatch table only routes
//! double-precision encodings here while D is enabled. A reserved static
//! rounding mode, or `rm = DYN` with a reserved `frm`, is illegal. Raised
//! exceptions accrue into `fflags`; writes to `f` registers mark FS dirty.

use super::next_pc;
use crate::common::error::Trap;
use crate::core::Cpu;
use crate::core::arch::csr::{FFLAGS, FRM};
use crate::core::units::fpu::exception_flags::FpFlags;
use crate::core::units::fpu::nan_handling::box_f32;
use crate::core::units::fpu::rounding_modes::RoundingMode;
use crate::core::units::fpu::{FpCompare, FpFormat, FpOp, Fpu, IntKind, SignInjection};
use crate::isa::rvf::{self, FMT_D, FMT_S, WIDTH_D, WIDTH_W};
use crate::isa::{Insn, opcodes};

fn format(insn: Insn) -> Result<FpFormat, Trap> {
    match insn.funct2() {
        FMT_S => Ok(FpFormat::Single),
        FMT_D => Ok(FpFormat::Double),
        _ => Err(Trap::IllegalInstruction(insn.bits())),
    }
}

fn rounding(cpu: &Cpu, insn: Insn) -> Result<RoundingMode, Trap> {
    RoundingMode::resolve(insn.rm(), cpu.state.csrs.get(FRM))
        .ok_or(Trap::IllegalInstruction(insn.bits()))
}

fn accrue(cpu: &mut Cpu, flags: FpFlags) {
    if !flags.is_empty() {
        let fflags = cpu.state.csrs.get(FFLAGS);
        cpu.state.csrs.set(FFLAGS, fflags | flags.bits());
        cpu.mark_fs_dirty();
    }
}

fn int_kind(cpu: &Cpu, insn: Insn) -> Result<IntKind, Trap> {
    match insn.rs2() {
        0 => Ok(IntKind::W),
        1 => Ok(IntKind::Wu),
        2 => cpu.require_rv64(insn).map(|()| IntKind::L),
        3 => cpu.require_rv64(insn).map(|()| IntKind::Lu),
        _ => Err(Trap::IllegalInstruction(insn.bits())),
    }
}

// ── Loads and stores ───────────────────────────────────────────────────────

/// `flw`, `fld`.
pub fn load(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    cpu.require_fp(insn)?;
    let size = match insn.funct3() {
        WIDTH_W => 4,
        WIDTH_D => 8,
        _ => return Err(Trap::IllegalInstruction(insn.bits())),
    };
    let addr = cpu.x(insn.rs1()).wrapping_add(insn.i_imm() as u64);
    let value = cpu.load(addr, size)?;
    let bits = if size == 4 { box_f32(value as u32) } else { value };
    cpu.set_f(insn.rd(), bits);
    Ok(next_pc(insn, pc))
}

/// `fsw`, `fsd`. Stores the raw register bits.
pub fn store(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    cpu.require_fp(insn)?;
    let size = match insn.funct3() {
        WIDTH_W => 4,
        WIDTH_D => 8,
        _ => return Err(Trap::IllegalInstruction(insn.bits())),
    };
    let addr = cpu.x(insn.rs1()).wrapping_add(insn.s_imm() as u64);
    cpu.store(addr, size, cpu.f(insn.rs2()))?;
    Ok(next_pc(insn, pc))
}

// ── Arithmetic ─────────────────────────────────────────────────────────────

/// `fmadd`, `fmsub`, `fnmsub`, `fnmadd`; the major opcode picks the variant.
pub fn fused(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    cpu.require_fp(insn)?;
    let fmt = format(insn)?;
    let rm = rounding(cpu, insn)?;
    let op = match insn.opcode() {
        opcodes::OP_MADD => FpOp::MAdd,
        opcodes::OP_MSUB => FpOp::MSub,
        opcodes::OP_NMSUB => FpOp::NMSub,
        opcodes::OP_NMADD => FpOp::NMAdd,
        _ => return Err(Trap::IllegalInstruction(insn.bits())),
    };
    let (a, b, c) = (cpu.f(insn.rs1()), cpu.f(insn.rs2()), cpu.f(insn.rs3()));
    let (bits, flags) = Fpu::arith(op, fmt, a, b, c, rm);
    accrue(cpu, flags);
    cpu.set_f(insn.rd(), bits);
    Ok(next_pc(insn, pc))
}

/// `fadd`, `fsub`, `fmul`, `fdiv`, `fsqrt`; `funct5` picks the operation.
pub fn arith(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    cpu.require_fp(insn)?;
    let fmt = format(insn)?;
    let rm = rounding(cpu, insn)?;
    let op = match insn.funct7() >> 2 {
        rvf::FADD => FpOp::Add,
        rvf::FSUB => FpOp::Sub,
        rvf::FMUL => FpOp::Mul,
        rvf::FDIV => FpOp::Div,
        rvf::FSQRT if insn.rs2() == 0 => FpOp::Sqrt,
        _ => return Err(Trap::IllegalInstruction(insn.bits())),
    };
    let (bits, flags) = Fpu::arith(op, fmt, cpu.f(insn.rs1()), cpu.f(insn.rs2()), 0, rm);
    accrue(cpu, flags);
    cpu.set_f(insn.rd(), bits);
    Ok(next_pc(insn, pc))
}

/// `fsgnj`, `fsgnjn`, `fsgnjx`.
pub fn sign_inject(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    cpu.require_fp(insn)?;
    let fmt = format(insn)?;
    let kind = match insn.funct3() {
        rvf::SGNJ => SignInjection::Copy,
        rvf::SGNJN => SignInjection::Negate,
        rvf::SGNJX => SignInjection::Xor,
        _ => return Err(Trap::IllegalInstruction(insn.bits())),
    };
    let bits = Fpu::sign_inject(kind, fmt, cpu.f(insn.rs1()), cpu.f(insn.rs2()));
    cpu.set_f(insn.rd(), bits);
    Ok(next_pc(insn, pc))
}

/// `fmin`, `fmax`.
pub fn min_max(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    cpu.require_fp(insn)?;
    let fmt = format(insn)?;
    let max = match insn.funct3() {
        rvf::MIN => false,
        rvf::MAX => true,
        _ => return Err(Trap::IllegalInstruction(insn.bits())),
    };
    let (bits, flags) = Fpu::min_max(fmt, cpu.f(insn.rs1()), cpu.f(insn.rs2()), max);
    accrue(cpu, flags);
    cpu.set_f(insn.rd(), bits);
    Ok(next_pc(insn, pc))
}

/// `feq`, `flt`, `fle`; the result goes to an integer register.
pub fn compare(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    cpu.require_fp(insn)?;
    let fmt = format(insn)?;
    let cmp = match insn.funct3() {
        rvf::EQ => FpCompare::Eq,
        rvf::LT => FpCompare::Lt,
        rvf::LE => FpCompare::Le,
        _ => return Err(Trap::IllegalInstruction(insn.bits())),
    };
    let (value, flags) = Fpu::compare(cmp, fmt, cpu.f(insn.rs1()), cpu.f(insn.rs2()));
    accrue(cpu, flags);
    cpu.set_x(insn.rd(), value);
    Ok(next_pc(insn, pc))
}

// ── Conversions and moves ──────────────────────────────────────────────────

/// `fcvt.{w,wu,l,lu}.{s,d}`.
pub fn to_int(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    cpu.require_fp(insn)?;
    let fmt = format(insn)?;
    let kind = int_kind(cpu, insn)?;
    let rm = rounding(cpu, insn)?;
    let (value, flags) = Fpu::to_int(fmt, kind, cpu.f(insn.rs1()), rm);
    accrue(cpu, flags);
    cpu.set_x(insn.rd(), value);
    Ok(next_pc(insn, pc))
}

/// `fcvt.{s,d}.{w,wu,l,lu}`.
pub fn from_int(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    cpu.require_fp(insn)?;
    let fmt = format(insn)?;
    let kind = int_kind(cpu, insn)?;
    let rm = rounding(cpu, insn)?;
    let (bits, flags) = Fpu::from_int(fmt, kind, cpu.x(insn.rs1()), rm);
    accrue(cpu, flags);
    cpu.set_f(insn.rd(), bits);
    Ok(next_pc(insn, pc))
}

/// `fcvt.s.d`, `fcvt.d.s`; `rs2` names the source format.
pub fn convert(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    cpu.require_fp(insn)?;
    let to = format(insn)?;
    let from = match insn.rs2() as u32 {
        FMT_S => FpFormat::Single,
        FMT_D => FpFormat::Double,
        _ => return Err(Trap::IllegalInstruction(insn.bits())),
    };
    cpu.require(from != to, insn)?;
    let rm = rounding(cpu, insn)?;
    let (bits, flags) = Fpu::convert(from, to, cpu.f(insn.rs1()), rm);
    accrue(cpu, flags);
    cpu.set_f(insn.rd(), bits);
    Ok(next_pc(insn, pc))
}

/// `fmv.x.w`, `fmv.x.d` and `fclass`; `funct3` selects.
pub fn move_to_int(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    cpu.require_fp(insn)?;
    let fmt = format(insn)?;
    let raw = cpu.f(insn.rs1());
    let value = match (insn.funct3(), fmt) {
        (rvf::MV, FpFormat::Single) => raw as i32 as i64 as u64,
        (rvf::MV, FpFormat::Double) => {
            cpu.require_rv64(insn)?;
            raw
        }
        (rvf::CLASS, _) => Fpu::classify(fmt, raw),
        _ => return Err(Trap::IllegalInstruction(insn.bits())),
    };
    cpu.set_x(insn.rd(), value);
    Ok(next_pc(insn, pc))
}

/// `fmv.w.x`, `fmv.d.x`.
pub fn move_from_int(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    cpu.require_fp(insn)?;
    let fmt = format(insn)?;
    let raw = cpu.x(insn.rs1());
    let bits = match fmt {
        FpFormat::Single => box_f32(raw as u32),
        FpFormat::Double => {
            cpu.require_rv64(insn)?;
            raw
        }
    };
    cpu.set_f(insn.rd(), bits);
    Ok(next_pc(insn, pc))
}
