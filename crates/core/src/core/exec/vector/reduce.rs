//! Single-width integer reductions.

use super::done;
use crate::common::error::Trap;
use crate::core::Cpu;
use crate::core::units::vector::engine;
use crate::core::units::vector::sext;
use crate::isa::Insn;
use crate::isa::rvv::opm;

/// `vredsum`, `vredand`, `vredor`, `vredxor`, `vredminu`, `vredmin`, `vredmaxu`, `vredmax`.
pub fn reduce(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let op: fn(u64, u64, u32) -> u64 = match insn.v_funct6() {
        opm::VREDSUM => |acc, e, _| acc.wrapping_add(e),
        opm::VREDAND => |acc, e, _| acc & e,
        opm::VREDOR => |acc, e, _| acc | e,
        opm::VREDXOR => |acc, e, _| acc ^ e,
        opm::VREDMINU => |acc, e, _| acc.min(e),
        opm::VREDMIN => |acc, e, sew| if sext(e, sew) < sext(acc, sew) { e } else { acc },
        opm::VREDMAXU => |acc, e, _| acc.max(e),
        opm::VREDMAX => |acc, e, sew| if sext(e, sew) > sext(acc, sew) { e } else { acc },
        _ => return Err(Trap::IllegalInstruction(insn.bits())),
    };
    engine::reduction(cpu, insn, op)?;
    done(insn, pc)
}
