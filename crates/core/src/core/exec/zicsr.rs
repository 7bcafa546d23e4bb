//! Zicsr handlers.
//!
//! All six forms share one read-modify-write path. `csrrw`/`csrrwi` with
//! `rd == x0` skip the read, and `csrrs`/`csrrc` (and the immediate forms)
//! with a zero source skip the write, so neither side effect happens.
//! Access is checked once, up front, for the operations that will actually
//! take place.

use super::next_pc;
use crate::common::error::Trap;
use crate::core::Cpu;
use crate::isa::Insn;
use crate::isa::privileged::opcodes::{CSRRC, CSRRCI, CSRRS, CSRRSI, CSRRW, CSRRWI};

#[derive(Clone, Copy)]
enum CsrOp {
    Write,
    Set,
    Clear,
}

fn access(cpu: &mut Cpu, insn: Insn, pc: u64, op: CsrOp, operand: u64) -> Result<u64, Trap> {
    let addr = insn.csr();
    let (reads, writes) = match op {
        CsrOp::Write => (insn.rd() != 0, true),
        CsrOp::Set | CsrOp::Clear => (true, insn.rs1() != 0),
    };
    cpu.check_csr_access(addr, writes, insn)?;

    let old = if reads || !matches!(op, CsrOp::Write) { cpu.read_csr(addr) } else { 0 };
    if writes {
        let new = match op {
            CsrOp::Write => operand,
            CsrOp::Set => old | operand,
            CsrOp::Clear => old & !operand,
        };
        cpu.write_csr(addr, new);
    }
    if reads {
        cpu.set_x(insn.rd(), old);
    }
    Ok(next_pc(insn, pc))
}

/// `csrrw`, `csrrs`, `csrrc` and their immediate forms; `funct3` selects.
pub fn csr(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let reg = cpu.x(insn.rs1());
    let zimm = insn.rs1() as u64;
    match insn.funct3() {
        CSRRW => access(cpu, insn, pc, CsrOp::Write, reg),
        CSRRS => access(cpu, insn, pc, CsrOp::Set, reg),
        CSRRC => access(cpu, insn, pc, CsrOp::Clear, reg),
        CSRRWI => access(cpu, insn, pc, CsrOp::Write, zimm),
        CSRRSI => access(cpu, insn, pc, CsrOp::Set, zimm),
        CSRRCI => access(cpu, insn, pc, CsrOp::Clear, zimm),
        _ => Err(Trap::IllegalInstruction(insn.bits())),
    }
}
