//! Vector configuration handlers.
//!
//! AVL selection:
//! - `rs1 != x0`: AVL is `x[rs1]` (`vsetivli`: the 5-bit immediate).
//! - `rs1 == x0`, `rd != x0`: AVL is VLMAX.
//! - `rs1 == x0`, `rd == x0`: `vl` is kept, which is only legal when the new
//!   configuration has the same VLMAX; otherwise `vill` is set.
//!
//! `vl` becomes `min(AVL, VLMAX)`. An unsupported `vtype` sets `vill` and `vl = 0`.

use super::done;
use crate::common::error::Trap;
use crate::core::Cpu;
use crate::core::arch::vtype::Vtype;
use crate::isa::Insn;

#[derive(Clone, Copy, Debug)]
enum Avl {
    Value(u64),
    Max,
    Keep,
}

fn reg_avl(cpu: &Cpu, insn: Insn) -> Avl {
    match (insn.rs1(), insn.rd()) {
        (0, 0) => Avl::Keep,
        (0, _) => Avl::Max,
        (rs1, _) => Avl::Value(cpu.x(rs1)),
    }
}

fn configure(cpu: &mut Cpu, insn: Insn, pc: u64, avl: Avl, requested: u64) -> Result<u64, Trap> {
    cpu.require_vector_unit(insn)?;
    let xlen = cpu.xlen().bits();
    let old = cpu.state.vector.vtype;
    let mut vtype = Vtype::decode(requested, xlen, cpu.elen());
    let vlmax = vtype.vlmax(cpu.vlen());

    let vl = match avl {
        _ if vtype.vill => 0,
        Avl::Value(n) => n.min(vlmax),
        Avl::Max => vlmax,
        Avl::Keep if !old.vill && old.vlmax(cpu.vlen()) == vlmax => cpu.state.vector.vl,
        Avl::Keep => {
            vtype = Vtype::illegal(xlen);
            0
        }
    };

    tracing::debug!(
        sew = vtype.sew,
        vlmul = vtype.vlmul,
        vta = vtype.vta,
        vma = vtype.vma,
        vill = vtype.vill,
        vl,
        "vector reconfigured"
    );
    let v = &mut cpu.state.vector;
    v.vtype = vtype;
    v.vl = vl;
    v.vstart = 0;
    cpu.mark_vs_dirty();
    cpu.set_x(insn.rd(), vl);
    done(insn, pc)
}

/// `vsetvli rd, rs1, vtypei`.
pub fn vsetvli(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let avl = reg_avl(cpu, insn);
    configure(cpu, insn, pc, avl, insn.v_zimm11())
}

/// `vsetivli rd, uimm, vtypei`.
pub fn vsetivli(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    configure(cpu, insn, pc, Avl::Value(insn.v_zimm5()), insn.v_zimm10())
}

/// `vsetvl rd, rs1, rs2`.
pub fn vsetvl(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let avl = reg_avl(cpu, insn);
    let requested = cpu.x(insn.rs2());
    configure(cpu, insn, pc, avl, requested)
}
