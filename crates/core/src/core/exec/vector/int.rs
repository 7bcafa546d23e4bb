//! Vector integer arithmetic.
//!
//! `vs2` is always the first operand of an element operation and `vs1`,
//! `x[rs1]` or the immediate the second, so `vrsub` and the reversed compares
//! swap them inside the operation.

use super::{done, shamt};
use crate::common::error::Trap;
use crate::core::Cpu;
use crate::core::units::vector::engine::{self, Operand};
use crate::core::units::vector::{sew_mask, sext};
use crate::isa::Insn;
use crate::isa::rvv::{category, opi, opm};

/// Element operation: `(vs2[i], rhs[i], sew) -> vd[i]`.
type ElementOp = fn(u64, u64, u32) -> u64;

/// Element predicate for compares.
type ElementTest = fn(u64, u64, u32) -> bool;

fn is_shift(funct6: u32) -> bool {
    matches!(funct6, opi::VSLL | opi::VSRL | opi::VSRA)
}

/// Second operand for an OPMVV/OPMVX encoding.
fn opm_operand(cpu: &Cpu, insn: Insn) -> Operand {
    match insn.funct3() {
        category::OPMVV => Operand::Vector(insn.rs1()),
        _ => Operand::Scalar(cpu.x(insn.rs1())),
    }
}

fn mulh_signed(a: u64, b: u64, sew: u32) -> u64 {
    let p = i128::from(sext(a, sew)) * i128::from(sext(b, sew));
    (p >> sew) as u64
}

fn mulh_unsigned(a: u64, b: u64, sew: u32) -> u64 {
    let p = u128::from(a & sew_mask(sew)) * u128::from(b & sew_mask(sew));
    (p >> sew) as u64
}

fn mulh_signed_unsigned(a: u64, b: u64, sew: u32) -> u64 {
    let p = i128::from(sext(a, sew)) * (u128::from(b & sew_mask(sew)) as i128);
    (p >> sew) as u64
}

/// Division by zero yields all ones. The most negative SEW value divided by
/// -1 does not overflow the 64-bit signed view, and truncation to SEW turns
/// the quotient back into the dividend.
fn div_signed(a: u64, b: u64, sew: u32) -> u64 {
    let (a, b) = (sext(a, sew), sext(b, sew));
    if b == 0 {
        u64::MAX
    } else {
        a.wrapping_div(b) as u64
    }
}

fn rem_signed(a: u64, b: u64, sew: u32) -> u64 {
    let (a, b) = (sext(a, sew), sext(b, sew));
    if b == 0 { a as u64 } else { a.wrapping_rem(b) as u64 }
}

fn single_width_op(opm_form: bool, funct6: u32) -> Option<ElementOp> {
    let op: ElementOp = match (opm_form, funct6) {
        (true, opm::VMUL) => |a, b, _| a.wrapping_mul(b),
        (true, opm::VMULH) => mulh_signed,
        (true, opm::VMULHU) => mulh_unsigned,
        (true, opm::VMULHSU) => mulh_signed_unsigned,
        (true, opm::VDIVU) => |a, b, _| a.checked_div(b).unwrap_or(u64::MAX),
        (true, opm::VDIV) => div_signed,
        (true, opm::VREMU) => |a, b, _| if b == 0 { a } else { a % b },
        (true, opm::VREM) => rem_signed,
        (false, opi::VADD) => |a, b, _| a.wrapping_add(b),
        (false, opi::VSUB) => |a, b, _| a.wrapping_sub(b),
        (false, opi::VRSUB) => |a, b, _| b.wrapping_sub(a),
        (false, opi::VMINU) => |a, b, _| a.min(b),
        (false, opi::VMIN) => |a, b, sew| if sext(a, sew) <= sext(b, sew) { a } else { b },
        (false, opi::VMAXU) => |a, b, _| a.max(b),
        (false, opi::VMAX) => |a, b, sew| if sext(a, sew) >= sext(b, sew) { a } else { b },
        (false, opi::VAND) => |a, b, _| a & b,
        (false, opi::VOR) => |a, b, _| a | b,
        (false, opi::VXOR) => |a, b, _| a ^ b,
        (false, opi::VSLL) => |a, b, sew| a << shamt(b, sew),
        (false, opi::VSRL) => |a, b, sew| a >> shamt(b, sew),
        (false, opi::VSRA) => |a, b, sew| (sext(a, sew) >> shamt(b, sew)) as u64,
        _ => return None,
    };
    Some(op)
}

/// Single-width integer arithmetic, every OPI and OPM category form.
///
/// Elements arrive zero-extended to 64 bits, so unsigned operations work on
/// them directly and signed ones sign-extend from SEW first.
pub fn arith(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let opm_form = matches!(insn.funct3(), category::OPMVV | category::OPMVX);
    let op = single_width_op(opm_form, insn.v_funct6())
        .ok_or(Trap::IllegalInstruction(insn.bits()))?;
    match insn.funct3() {
        category::OPIVV | category::OPMVV => engine::for_each_vv(cpu, insn, op)?,
        category::OPIVX | category::OPMVX => engine::for_each_vx(cpu, insn, op)?,
        // Shift immediates are unsigned.
        _ if is_shift(insn.v_funct6()) => {
            engine::single_width(cpu, insn, Operand::Scalar(insn.v_zimm5()), op)?;
        }
        _ => engine::for_each_vi(cpu, insn, op)?,
    }
    done(insn, pc)
}

// ── Widening ───────────────────────────────────────────────────────────────

/// The operation and whether `vs2` is already `2*SEW` wide.
fn widening_op(funct6: u32) -> Option<(ElementOp, bool)> {
    let op: ElementOp = match funct6 {
        opm::VWADDU | opm::VWADDU_W => |a, b, _| a.wrapping_add(b),
        opm::VWADD => |a, b, sew| (sext(a, sew) + sext(b, sew)) as u64,
        opm::VWADD_W => |a, b, sew| sext(a, 2 * sew).wrapping_add(sext(b, sew)) as u64,
        opm::VWSUBU | opm::VWSUBU_W => |a, b, _| a.wrapping_sub(b),
        opm::VWSUB => |a, b, sew| (sext(a, sew) - sext(b, sew)) as u64,
        opm::VWSUB_W => |a, b, sew| sext(a, 2 * sew).wrapping_sub(sext(b, sew)) as u64,
        opm::VWMULU => |a, b, _| a.wrapping_mul(b),
        opm::VWMULSU => |a, b, sew| sext(a, sew).wrapping_mul(b as i64) as u64,
        opm::VWMUL => |a, b, sew| sext(a, sew).wrapping_mul(sext(b, sew)) as u64,
        _ => return None,
    };
    let wide_vs2 = matches!(funct6, opm::VWADDU_W | opm::VWADD_W | opm::VWSUBU_W | opm::VWSUB_W);
    Some((op, wide_vs2))
}

/// Widening add, subtract and multiply (`.vv`, `.vx`, `.wv`, `.wx`).
///
/// SEW is at most 32 here, so 64-bit arithmetic on sign-extended operands is exact.
pub fn widen(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let (op, wide_vs2) = widening_op(insn.v_funct6()).ok_or(Trap::IllegalInstruction(insn.bits()))?;
    let rhs = opm_operand(cpu, insn);
    engine::widening(cpu, insn, rhs, wide_vs2, op)?;
    done(insn, pc)
}

// ── Narrowing shifts ───────────────────────────────────────────────────────

/// `vnsrl` and `vnsra` (`.wv`, `.wx`, `.wi`); the shift uses `log2(2*SEW)` bits.
pub fn narrow_shift(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let rhs = match insn.funct3() {
        category::OPIVV => Operand::Vector(insn.rs1()),
        category::OPIVX => Operand::Scalar(cpu.x(insn.rs1())),
        _ => Operand::Scalar(insn.v_zimm5()),
    };
    let op: ElementOp = match insn.v_funct6() {
        opi::VNSRL => |a, b, sew| a >> shamt(b, 2 * sew),
        opi::VNSRA => |a, b, sew| (sext(a, 2 * sew) >> shamt(b, 2 * sew)) as u64,
        _ => return Err(Trap::IllegalInstruction(insn.bits())),
    };
    engine::narrowing(cpu, insn, rhs, op)?;
    done(insn, pc)
}

// ── Compares ───────────────────────────────────────────────────────────────

fn compare_test(funct6: u32) -> Option<ElementTest> {
    let test: ElementTest = match funct6 {
        opi::VMSEQ => |a, b, _| a == b,
        opi::VMSNE => |a, b, _| a != b,
        opi::VMSLTU => |a, b, _| a < b,
        opi::VMSLT => |a, b, sew| sext(a, sew) < sext(b, sew),
        opi::VMSLEU => |a, b, _| a <= b,
        opi::VMSLE => |a, b, sew| sext(a, sew) <= sext(b, sew),
        opi::VMSGTU => |a, b, _| a > b,
        opi::VMSGT => |a, b, sew| sext(a, sew) > sext(b, sew),
        _ => return None,
    };
    Some(test)
}

/// Integer compares writing a mask register.
///
/// `vmsgt`/`vmsgtu` exist only in the scalar and immediate forms; the
/// immediate is sign-extended even for the unsigned compares.
pub fn compare(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let funct6 = insn.v_funct6();
    let vector_form = insn.funct3() == category::OPIVV;
    cpu.require(!(vector_form && matches!(funct6, opi::VMSGT | opi::VMSGTU)), insn)?;
    let test = compare_test(funct6).ok_or(Trap::IllegalInstruction(insn.bits()))?;
    let rhs = match insn.funct3() {
        category::OPIVV => Operand::Vector(insn.rs1()),
        category::OPIVX => Operand::Scalar(cpu.x(insn.rs1())),
        _ => Operand::Scalar(insn.v_simm5() as u64),
    };
    engine::compare(cpu, insn, rhs, test)?;
    done(insn, pc)
}
