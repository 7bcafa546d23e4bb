//! Mask-register handlers: the eight mask logicals, `vcpop.m`, `vfirst.m`,
//! `viota.m` and `vid.v`.
//!
//! Mask destinations hold one bit per element; bits past `vl` are left
//! undisturbed.

use super::done;
use crate::common::error::Trap;
use crate::core::Cpu;
use crate::core::units::vector::engine::{self, VectorConfig, aligned, overlaps};
use crate::isa::Insn;
use crate::isa::rvv::opm;

/// `vmand`, `vmnand`, `vmandn`, `vmxor`, `vmor`, `vmnor`, `vmorn`, `vmxnor`.
pub fn logical(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let op: fn(bool, bool) -> bool = match insn.v_funct6() {
        opm::VMANDN => |a, b| a && !b,
        opm::VMAND => |a, b| a && b,
        opm::VMOR => |a, b| a || b,
        opm::VMXOR => |a, b| a ^ b,
        opm::VMORN => |a, b| a || !b,
        opm::VMNAND => |a, b| !(a && b),
        opm::VMNOR => |a, b| !(a || b),
        opm::VMXNOR => |a, b| a == b,
        _ => return Err(Trap::IllegalInstruction(insn.bits())),
    };
    let cfg = VectorConfig::load(cpu, insn)?;
    cpu.require(insn.v_vm(), insn)?;
    let (vd, vs1, vs2) = (insn.rd(), insn.rs1(), insn.rs2());
    for i in cfg.vstart..cfg.vl {
        let vregs = cpu.state.regs.vregs();
        let bit = op(vregs.mask_bit(vs2, i), vregs.mask_bit(vs1, i));
        cpu.state.regs.vregs_mut().set_mask_bit(vd, i, bit);
    }
    engine::finish(cpu);
    done(insn, pc)
}

fn active_bits(cpu: &Cpu, cfg: &VectorConfig, vm: bool, vs2: usize) -> impl Iterator<Item = usize> {
    (0..cfg.vl).filter(move |&i| {
        engine::active(cpu, vm, i) && cpu.state.regs.vregs().mask_bit(vs2, i)
    })
}

/// `vcpop.m rd, vs2`: number of active set bits.
pub fn vcpop(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let cfg = VectorConfig::load(cpu, insn)?;
    cpu.require(cfg.vstart == 0, insn)?;
    let count = active_bits(cpu, &cfg, insn.v_vm(), insn.rs2()).count() as u64;
    cpu.set_x(insn.rd(), count);
    engine::finish(cpu);
    done(insn, pc)
}

/// `vfirst.m rd, vs2`: index of the first active set bit, or -1.
pub fn vfirst(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let cfg = VectorConfig::load(cpu, insn)?;
    cpu.require(cfg.vstart == 0, insn)?;
    let first = active_bits(cpu, &cfg, insn.v_vm(), insn.rs2())
        .next()
        .map_or(u64::MAX, |i| i as u64);
    cpu.set_x(insn.rd(), first);
    engine::finish(cpu);
    done(insn, pc)
}

/// `viota.m vd, vs2`: each active element receives the count of set `vs2`
/// bits at lower active indices.
pub fn viota(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let cfg = VectorConfig::load(cpu, insn)?;
    let (vd, vs2, vm) = (insn.rd(), insn.rs2(), insn.v_vm());
    let regs = cfg.group_regs();
    cpu.require(
        cfg.vstart == 0 && aligned(vd, regs) && !overlaps(vd, regs, vs2, 1) && (vm || vd != 0),
        insn,
    )?;
    let sew = cfg.sew;
    let mut count = 0u64;
    for i in 0..cfg.vl {
        if !engine::active(cpu, vm, i) {
            engine::fill_inactive(cpu, &cfg, vd, i, sew);
            continue;
        }
        let bit = cpu.state.regs.vregs().mask_bit(vs2, i);
        cpu.state.regs.vregs_mut().set_elem(vd, i, sew, count);
        count += u64::from(bit);
    }
    engine::fill_tail(cpu, &cfg, vd, regs, sew, cfg.vl);
    engine::finish(cpu);
    done(insn, pc)
}

/// `vid.v vd`: each active element receives its own index.
pub fn vid(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let cfg = VectorConfig::load(cpu, insn)?;
    let (vd, vm) = (insn.rd(), insn.v_vm());
    let regs = cfg.group_regs();
    cpu.require(insn.rs2() == 0 && aligned(vd, regs) && (vm || vd != 0), insn)?;
    let sew = cfg.sew;
    for i in cfg.vstart..cfg.vl {
        if engine::active(cpu, vm, i) {
            cpu.state.regs.vregs_mut().set_elem(vd, i, sew, i as u64);
        } else {
            engine::fill_inactive(cpu, &cfg, vd, i, sew);
        }
    }
    engine::fill_tail(cpu, &cfg, vd, regs, sew, cfg.vl);
    engine::finish(cpu);
    done(insn, pc)
}
