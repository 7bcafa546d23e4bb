//! Zifencei handler.

use super::next_pc;
use crate::common::error::Trap;
use crate::core::Cpu;
use crate::isa::Insn;

/// `fence.i`. Fetches always observe memory, so only the trace sink is told.
pub fn fence_i(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    cpu.tracer.fence_i();
    Ok(next_pc(insn, pc))
}
