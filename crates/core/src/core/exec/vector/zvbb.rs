//! Zvbb: vector basic bit manipulation.

use super::done;
use crate::common::error::Trap;
use crate::core::Cpu;
use crate::core::units::vector::engine::{self, Operand};
use crate::core::units::vector::sew_mask;
use crate::isa::Insn;
use crate::isa::rvv::{category, opi, opm};

fn rotate_left(a: u64, b: u64, sew: u32) -> u64 {
    let n = (b & u64::from(sew - 1)) as u32;
    if n == 0 { a } else { ((a << n) | (a >> (sew - n))) & sew_mask(sew) }
}

fn rotate_right(a: u64, b: u64, sew: u32) -> u64 {
    let n = (b & u64::from(sew - 1)) as u32;
    if n == 0 { a } else { ((a >> n) | (a << (sew - n))) & sew_mask(sew) }
}

fn operand(cpu: &Cpu, insn: Insn) -> Operand {
    match insn.funct3() {
        category::OPIVV => Operand::Vector(insn.rs1()),
        category::OPIVX => Operand::Scalar(cpu.x(insn.rs1())),
        // vror.vi borrows the low funct6 bit as bit 5 of its rotate amount.
        _ => Operand::Scalar(insn.v_zimm5() | u64::from(insn.v_funct6() & 1) << 5),
    }
}

/// `vandn.v{v,x}`: `vs2 & !rhs`.
pub fn vandn(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let rhs = operand(cpu, insn);
    engine::single_width(cpu, insn, rhs, |a, b, _| a & !b)?;
    done(insn, pc)
}

/// `vrol.v{v,x}`, `vror.v{v,x,i}`.
pub fn rotate(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let op: fn(u64, u64, u32) -> u64 = match insn.v_funct6() {
        opi::VROL => rotate_left,
        // vror.vi occupies both 010100 and 010101.
        _ if insn.funct3() == category::OPIVI => rotate_right,
        opi::VROR => rotate_right,
        _ => return Err(Trap::IllegalInstruction(insn.bits())),
    };
    let rhs = operand(cpu, insn);
    engine::single_width(cpu, insn, rhs, op)?;
    done(insn, pc)
}

/// The VXUNARY0 group: `vbrev8`, `vrev8`, `vbrev`, `vclz`, `vctz`, `vcpop.v`, selected by `vs1`.
pub fn unary(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let op: fn(u64, u64, u32) -> u64 = match insn.rs1() as u32 {
        opm::VS1_VBREV8 => |a, _, sew| {
            let bytes = (sew / 8) as usize;
            let mut out = 0;
            for k in 0..bytes {
                let b = ((a >> (8 * k)) as u8).reverse_bits();
                out |= u64::from(b) << (8 * k);
            }
            out
        },
        opm::VS1_VREV8 => |a, _, sew| a.swap_bytes() >> (64 - sew),
        opm::VS1_VBREV => |a, _, sew| a.reverse_bits() >> (64 - sew),
        opm::VS1_VCLZ => |a, _, sew| u64::from(a.leading_zeros() - (64 - sew)),
        opm::VS1_VCTZ => |a, _, sew| u64::from(a.trailing_zeros().min(sew)),
        opm::VS1_VCPOP_V => |a, _, _| u64::from(a.count_ones()),
        _ => return Err(Trap::IllegalInstruction(insn.bits())),
    };
    engine::single_width(cpu, insn, Operand::Scalar(0), op)?;
    done(insn, pc)
}
