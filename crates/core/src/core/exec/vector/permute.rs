//! Merges, scalar moves, slides, gathers and compress.
//!
//! Sources are read in full before the destination is written, so the loops
//! do not depend on element order even where the encoding allows `vd` to
//! share registers with a source.

use super::done;
use crate::common::error::Trap;
use crate::core::Cpu;
use crate::core::units::vector::engine::{self, VectorConfig, aligned, overlaps};
use crate::core::units::vector::{sew_mask, sext};
use crate::isa::Insn;
use crate::isa::rvv::category;

fn read_group(cpu: &Cpu, reg: usize, len: usize, sew: u32) -> Vec<u64> {
    let vregs = cpu.state.regs.vregs();
    (0..len).map(|i| vregs.elem(reg, i, sew)).collect()
}

/// Scalar or immediate operand of an OPI encoding.
fn opi_scalar(cpu: &Cpu, insn: Insn, signed_imm: bool) -> u64 {
    match insn.funct3() {
        category::OPIVX => cpu.x(insn.rs1()),
        _ if signed_imm => insn.v_simm5() as u64,
        _ => insn.v_zimm5(),
    }
}

/// `vmerge.v{v,x,i}m` with `vm = 0`, `vmv.v.{v,x,i}` with `vm = 1`.
///
/// Every body element is written; `v0` selects between `vs2` and the operand.
pub fn merge(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let cfg = VectorConfig::load(cpu, insn)?;
    let (vd, vs1, vs2, vm) = (insn.rd(), insn.rs1(), insn.rs2(), insn.v_vm());
    let regs = cfg.group_regs();
    let vector_form = insn.funct3() == category::OPIVV;
    cpu.require(
        aligned(vd, regs)
            && (if vm { vs2 == 0 } else { vd != 0 && aligned(vs2, regs) })
            && (!vector_form || aligned(vs1, regs)),
        insn,
    )?;

    let sew = cfg.sew;
    let scalar = opi_scalar(cpu, insn, true) & sew_mask(sew);
    for i in cfg.vstart..cfg.vl {
        let vregs = cpu.state.regs.vregs();
        let take_operand = vm || vregs.mask_bit(0, i);
        let value = match (take_operand, vector_form) {
            (false, _) => vregs.elem(vs2, i, sew),
            (true, true) => vregs.elem(vs1, i, sew),
            (true, false) => scalar,
        };
        cpu.state.regs.vregs_mut().set_elem(vd, i, sew, value);
    }
    engine::fill_tail(cpu, &cfg, vd, regs, sew, cfg.vl);
    engine::finish(cpu);
    done(insn, pc)
}

/// `vmv.x.s rd, vs2`: element 0 sign-extended to XLEN, regardless of `vl`.
pub fn vmv_x_s(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let cfg = VectorConfig::load(cpu, insn)?;
    cpu.require(insn.v_vm(), insn)?;
    let value = cpu.state.regs.vregs().elem(insn.rs2(), 0, cfg.sew);
    cpu.set_x(insn.rd(), sext(value, cfg.sew) as u64);
    engine::finish(cpu);
    done(insn, pc)
}

/// `vmv.s.x vd, rs1`: writes element 0 when `vstart < vl`.
pub fn vmv_s_x(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let cfg = VectorConfig::load(cpu, insn)?;
    cpu.require(insn.v_vm() && insn.rs2() == 0, insn)?;
    if cfg.vstart < cfg.vl {
        let value = cpu.x(insn.rs1());
        cpu.state.regs.vregs_mut().set_elem(insn.rd(), 0, cfg.sew, value);
        engine::fill_tail(cpu, &cfg, insn.rd(), 1, cfg.sew, 1);
    }
    engine::finish(cpu);
    done(insn, pc)
}

/// Shared checks of the slide family; `up` forbids `vd` overlapping `vs2`.
fn slide_config(cpu: &Cpu, insn: Insn, up: bool) -> Result<VectorConfig, Trap> {
    let cfg = VectorConfig::load(cpu, insn)?;
    let (vd, vs2, vm) = (insn.rd(), insn.rs2(), insn.v_vm());
    let regs = cfg.group_regs();
    cpu.require(
        aligned(vd, regs)
            && aligned(vs2, regs)
            && (vm || vd != 0)
            && !(up && overlaps(vd, regs, vs2, regs)),
        insn,
    )?;
    Ok(cfg)
}

/// Writes `value(i)` to active elements `from..vl` and applies tail policy.
fn write_body(cpu: &mut Cpu, cfg: &VectorConfig, insn: Insn, from: usize, value: impl Fn(usize) -> u64) {
    let (vd, vm, sew) = (insn.rd(), insn.v_vm(), cfg.sew);
    for i in from..cfg.vl {
        if engine::active(cpu, vm, i) {
            cpu.state.regs.vregs_mut().set_elem(vd, i, sew, value(i));
        } else {
            engine::fill_inactive(cpu, cfg, vd, i, sew);
        }
    }
    engine::fill_tail(cpu, cfg, vd, cfg.group_regs(), sew, cfg.vl);
    engine::finish(cpu);
}

/// `vslideup.v{x,i}`: `vd[i] = vs2[i - offset]`; elements below the offset are untouched.
pub fn slideup(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let cfg = slide_config(cpu, insn, true)?;
    let offset = usize::try_from(opi_scalar(cpu, insn, false)).unwrap_or(usize::MAX);
    let src = read_group(cpu, insn.rs2(), cfg.vl, cfg.sew);
    let from = cfg.vstart.max(offset.min(cfg.vl));
    write_body(cpu, &cfg, insn, from, |i| src[i - offset]);
    done(insn, pc)
}

/// `vslidedown.v{x,i}`: `vd[i] = vs2[i + offset]`, zero past VLMAX.
pub fn slidedown(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let cfg = slide_config(cpu, insn, false)?;
    let offset = usize::try_from(opi_scalar(cpu, insn, false)).unwrap_or(usize::MAX);
    let vlmax = cfg.vlmax();
    let src = read_group(cpu, insn.rs2(), vlmax, cfg.sew);
    write_body(cpu, &cfg, insn, cfg.vstart, |i| {
        i.checked_add(offset).and_then(|j| src.get(j).copied()).unwrap_or(0)
    });
    done(insn, pc)
}

/// `vslide1up.vx`: `vd[0] = x[rs1]`, `vd[i] = vs2[i - 1]`.
pub fn slide1up(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let cfg = slide_config(cpu, insn, true)?;
    let scalar = cpu.x(insn.rs1());
    let src = read_group(cpu, insn.rs2(), cfg.vl, cfg.sew);
    write_body(cpu, &cfg, insn, cfg.vstart, |i| if i == 0 { scalar } else { src[i - 1] });
    done(insn, pc)
}

/// `vslide1down.vx`: `vd[i] = vs2[i + 1]`, `vd[vl - 1] = x[rs1]`.
pub fn slide1down(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let cfg = slide_config(cpu, insn, false)?;
    let scalar = cpu.x(insn.rs1());
    let src = read_group(cpu, insn.rs2(), cfg.vl, cfg.sew);
    let last = cfg.vl.saturating_sub(1);
    write_body(cpu, &cfg, insn, cfg.vstart, |i| if i == last { scalar } else { src[i + 1] });
    done(insn, pc)
}

/// `vrgather.v{v,x,i}`: `vd[i] = vs2[index]`, zero when the index is at least VLMAX.
pub fn vrgather(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let cfg = VectorConfig::load(cpu, insn)?;
    let (vd, vs1, vs2, vm) = (insn.rd(), insn.rs1(), insn.rs2(), insn.v_vm());
    let regs = cfg.group_regs();
    let vector_form = insn.funct3() == category::OPIVV;
    cpu.require(
        aligned(vd, regs)
            && aligned(vs2, regs)
            && !overlaps(vd, regs, vs2, regs)
            && (!vector_form || (aligned(vs1, regs) && !overlaps(vd, regs, vs1, regs)))
            && (vm || vd != 0),
        insn,
    )?;

    let (sew, vlmax) = (cfg.sew, cfg.vlmax());
    let src = read_group(cpu, vs2, vlmax, sew);
    let indices = if vector_form {
        read_group(cpu, vs1, cfg.vl, sew)
    } else {
        vec![opi_scalar(cpu, insn, false); cfg.vl]
    };
    write_body(cpu, &cfg, insn, cfg.vstart, |i| {
        usize::try_from(indices[i])
            .ok()
            .and_then(|j| src.get(j).copied())
            .unwrap_or(0)
    });
    done(insn, pc)
}

/// `vcompress.vm vd, vs2, vs1`: packs the elements of `vs2` selected by mask `vs1`.
///
/// Elements past the packed count are tail.
pub fn vcompress(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let cfg = VectorConfig::load(cpu, insn)?;
    let (vd, vs1, vs2) = (insn.rd(), insn.rs1(), insn.rs2());
    let regs = cfg.group_regs();
    cpu.require(
        insn.v_vm()
            && cfg.vstart == 0
            && aligned(vd, regs)
            && aligned(vs2, regs)
            && !overlaps(vd, regs, vs2, regs)
            && !overlaps(vd, regs, vs1, 1),
        insn,
    )?;

    let sew = cfg.sew;
    let packed: Vec<u64> = {
        let vregs = cpu.state.regs.vregs();
        (0..cfg.vl)
            .filter(|&i| vregs.mask_bit(vs1, i))
            .map(|i| vregs.elem(vs2, i, sew))
            .collect()
    };
    for (i, value) in packed.iter().enumerate() {
        cpu.state.regs.vregs_mut().set_elem(vd, i, sew, *value);
    }
    engine::fill_tail(cpu, &cfg, vd, regs, sew, packed.len());
    engine::finish(cpu);
    done(insn, pc)
}
