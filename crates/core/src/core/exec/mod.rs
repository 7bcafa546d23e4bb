//! Instruction Handlers.
//!
//! Every handler has the [`Handler`](crate::ext::Handler) signature
//! `(cpu, word, pc) -> next pc`. A handler checks all of its preconditions
//! (extension, privilege, alignment, register-group legality) before writing
//! any architectural state, and reports failures as a [`Trap`]. Handlers never
//! enter the trap model themselves; the execute loop does that.
//!
//! Handlers are grouped by the extension that contributes them:
//! 1. **Integer:** [`rv64i`], [`rv64m`], [`rv64a`], [`bitmanip`], [`zicond`].
//! 2. **Floating point:** [`fp`].
//! 3. **Compressed:** [`rvc`].
//! 4. **System:** [`zicsr`], [`zifencei`], [`system`].
//! 5. **Vector:** [`vector`], including the Zvbb and vector-crypto subsets.

/// Atomic memory operations.
pub mod rv64a;

/// Zba and Zbb bit manipulation.
pub mod bitmanip;

/// Single- and double-precision floating point.
pub mod fp;

/// Base integer instructions.
pub mod rv64i;

/// Integer multiply and divide.
pub mod rv64m;

/// Compressed instructions.
pub mod rvc;

/// Trap return, `wfi`, address-translation fences.
pub mod system;

/// Vector configuration, arithmetic, memory and crypto.
pub mod vector;

/// Conditional zero.
pub mod zicond;

/// CSR access.
pub mod zicsr;

/// Instruction-fetch fence.
pub mod zifencei;

use crate::common::error::Trap;
use crate::core::Cpu;
use crate::core::units::alu::{Alu, AluOp};
use crate::isa::{Insn, Xlen};

/// Address of the instruction after `insn`.
#[inline(always)]
pub(crate) const fn next_pc(insn: Insn, pc: u64) -> u64 {
    pc.wrapping_add(insn.len())
}

/// Returns `true` when full-width operations must use the 32-bit ALU forms.
#[inline(always)]
pub(crate) fn is_rv32(cpu: &Cpu) -> bool {
    cpu.xlen() == Xlen::Rv32
}

/// `x[rd] = op(x[rs1], x[rs2])`, at XLEN or, with `word`, as an RV64 `*W` form.
#[inline]
pub(crate) fn reg_reg(cpu: &mut Cpu, insn: Insn, pc: u64, op: AluOp, word: bool) -> Result<u64, Trap> {
    if word {
        cpu.require_rv64(insn)?;
    }
    let result = Alu::execute(op, cpu.x(insn.rs1()), cpu.x(insn.rs2()), word || is_rv32(cpu));
    cpu.set_x(insn.rd(), result);
    Ok(next_pc(insn, pc))
}

/// `x[rd] = op(x[rs1], imm)`, at XLEN or, with `word`, as an RV64 `*W` form.
#[inline]
pub(crate) fn reg_imm(
    cpu: &mut Cpu,
    insn: Insn,
    pc: u64,
    op: AluOp,
    imm: u64,
    word: bool,
) -> Result<u64, Trap> {
    if word {
        cpu.require_rv64(insn)?;
    }
    let result = Alu::execute(op, cpu.x(insn.rs1()), imm, word || is_rv32(cpu));
    cpu.set_x(insn.rd(), result);
    Ok(next_pc(insn, pc))
}

/// Declares one register-register handler per `name => op` pair.
///
/// The `word` arm produces the RV64 `*W` forms, which are illegal on RV32.
macro_rules! reg_reg_handlers {
    (word: $( $(#[$doc:meta])* $name:ident => $op:expr ),* $(,)?) => {
        $(
            $(#[$doc])*
            pub fn $name(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
                crate::core::exec::reg_reg(cpu, insn, pc, $op, true)
            }
        )*
    };
    ($( $(#[$doc:meta])* $name:ident => $op:expr ),* $(,)?) => {
        $(
            $(#[$doc])*
            pub fn $name(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
                crate::core::exec::reg_reg(cpu, insn, pc, $op, false)
            }
        )*
    };
}

pub(crate) use reg_reg_handlers;
