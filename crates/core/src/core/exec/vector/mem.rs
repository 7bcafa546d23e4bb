//! Vector loads and stores.
//!
//! Supported addressing: unit-stride, fault-only-first, strided and indexed
//! (all with segments), mask (`vlm.v`/`vsm.v`) and whole-register.
//!
//! Every loop starts at `vstart`. A faulting element stops the instruction
//! with `vstart` set to that element's index, so the trap handler can resume
//! it after fixing the fault; elements below the index are already complete.
//! Fault-only-first loads trap only on element 0; a later fault shrinks `vl`
//! to the faulting index and the instruction completes.

use super::done;
use crate::common::error::Trap;
use crate::core::Cpu;
use crate::core::units::vector::engine::{self, VectorConfig, aligned, overlaps};
use crate::isa::Insn;
use crate::isa::rvv::width;

/// Element width encoded in the `width` field.
fn eew(insn: Insn) -> Option<u32> {
    match insn.v_width() {
        width::E8 => Some(8),
        width::E16 => Some(16),
        width::E32 => Some(32),
        width::E64 => Some(64),
        _ => None,
    }
}

/// Layout of one unit-stride or strided access.
#[derive(Clone, Copy, Debug)]
struct Layout {
    eew: u32,
    fields: usize,
    /// Registers per field.
    emul_regs: usize,
}

impl Layout {
    /// Checks EMUL = EEW/SEW * LMUL in `[1/8, 8]`, `EMUL * NF <= 8` and register alignment.
    fn new(cpu: &Cpu, cfg: &VectorConfig, insn: Insn) -> Result<Self, Trap> {
        let eew = eew(insn).ok_or(Trap::IllegalInstruction(insn.bits()))?;
        let fields = insn.v_nf() as usize + 1;
        let emul_log = i32::from(cfg.vlmul) + eew.trailing_zeros() as i32 - cfg.sew.trailing_zeros() as i32;
        let emul_regs = 1usize << emul_log.max(0);
        let vd = insn.rd();
        cpu.require(
            insn.v_mew() == 0
                && eew <= cfg.elen
                && (-3..=3).contains(&emul_log)
                && fields * emul_regs <= 8
                && aligned(vd, emul_regs)
                && vd + fields * emul_regs <= 32,
            insn,
        )?;
        Ok(Self { eew, fields, emul_regs })
    }

    const fn bytes(&self) -> u64 {
        (self.eew / 8) as u64
    }
}

fn strided_load(
    cpu: &mut Cpu,
    insn: Insn,
    pc: u64,
    stride: Option<u64>,
    fault_first: bool,
) -> Result<u64, Trap> {
    let cfg = VectorConfig::load(cpu, insn)?;
    let layout = Layout::new(cpu, &cfg, insn)?;
    let (vd, vm) = (insn.rd(), insn.v_vm());
    cpu.require(vm || vd != 0, insn)?;

    let base = cpu.x(insn.rs1());
    let size = layout.bytes();
    let stride = stride.unwrap_or(size * layout.fields as u64);
    let mut vl = cfg.vl;
    'elements: for i in cfg.vstart..cfg.vl {
        let active = engine::active(cpu, vm, i);
        for f in 0..layout.fields {
            let reg = vd + f * layout.emul_regs;
            if !active {
                engine::fill_inactive(cpu, &cfg, reg, i, layout.eew);
                continue;
            }
            let addr = base
                .wrapping_add((i as u64).wrapping_mul(stride))
                .wrapping_add(f as u64 * size);
            let value = match cpu.load(addr, size as usize) {
                Ok(value) => value,
                Err(trap) if fault_first && i > 0 => {
                    tracing::debug!(%trap, vl = i, "fault-only-first load trimmed vl");
                    cpu.state.vector.vl = i as u64;
                    vl = i;
                    break 'elements;
                }
                Err(trap) => {
                    cpu.state.vector.vstart = i as u64;
                    return Err(trap);
                }
            };
            cpu.state.regs.vregs_mut().set_elem(reg, i, layout.eew, value);
        }
    }
    for f in 0..layout.fields {
        let reg = vd + f * layout.emul_regs;
        engine::fill_tail(cpu, &cfg, reg, layout.emul_regs, layout.eew, vl);
    }
    engine::finish(cpu);
    done(insn, pc)
}

fn strided_store(cpu: &mut Cpu, insn: Insn, pc: u64, stride: Option<u64>) -> Result<u64, Trap> {
    let cfg = VectorConfig::load(cpu, insn)?;
    let layout = Layout::new(cpu, &cfg, insn)?;
    let (vs3, vm) = (insn.rd(), insn.v_vm());

    let base = cpu.x(insn.rs1());
    let size = layout.bytes();
    let stride = stride.unwrap_or(size * layout.fields as u64);
    for i in cfg.vstart..cfg.vl {
        if !engine::active(cpu, vm, i) {
            continue;
        }
        for f in 0..layout.fields {
            let reg = vs3 + f * layout.emul_regs;
            let value = cpu.state.regs.vregs().elem(reg, i, layout.eew);
            let addr = base
                .wrapping_add((i as u64).wrapping_mul(stride))
                .wrapping_add(f as u64 * size);
            if let Err(trap) = cpu.store(addr, size as usize, value) {
                cpu.state.vector.vstart = i as u64;
                return Err(trap);
            }
        }
    }
    engine::finish(cpu);
    done(insn, pc)
}

/// `vle<eew>.v` and `vlseg<nf>e<eew>.v`.
pub fn unit_load(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    strided_load(cpu, insn, pc, None, false)
}

/// `vle<eew>ff.v` and `vlseg<nf>e<eew>ff.v`.
pub fn fault_first_load(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    strided_load(cpu, insn, pc, None, true)
}

/// `vlse<eew>.v` and `vlsseg<nf>e<eew>.v`; the byte stride is `x[rs2]`.
pub fn stride_load(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let stride = cpu.x(insn.rs2());
    strided_load(cpu, insn, pc, Some(stride), false)
}

/// `vse<eew>.v` and `vsseg<nf>e<eew>.v`.
pub fn unit_store(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    strided_store(cpu, insn, pc, None)
}

/// `vsse<eew>.v` and `vssseg<nf>e<eew>.v`; the byte stride is `x[rs2]`.
pub fn stride_store(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let stride = cpu.x(insn.rs2());
    strided_store(cpu, insn, pc, Some(stride))
}

/// Layout of one indexed access: data elements are SEW wide in LMUL groups,
/// offsets come from `vs2` at the EEW of the `width` field.
#[derive(Clone, Copy, Debug)]
struct IndexedLayout {
    index_eew: u32,
    fields: usize,
    /// Registers per data field.
    data_regs: usize,
}

impl IndexedLayout {
    /// Checks the index EMUL, `LMUL * NF <= 8` and register alignment. A
    /// load destination may overlap the index group only when both use the
    /// same element width.
    fn new(cpu: &Cpu, cfg: &VectorConfig, insn: Insn, load: bool) -> Result<Self, Trap> {
        let index_eew = eew(insn).ok_or(Trap::IllegalInstruction(insn.bits()))?;
        let fields = insn.v_nf() as usize + 1;
        let index_log = i32::from(cfg.vlmul) + index_eew.trailing_zeros() as i32 - cfg.sew.trailing_zeros() as i32;
        let index_regs = 1usize << index_log.max(0);
        let data_regs = cfg.group_regs();
        let (vd, vs2) = (insn.rd(), insn.rs2());
        let clash = load && index_eew != cfg.sew && overlaps(vd, fields * data_regs, vs2, index_regs);
        cpu.require(
            insn.v_mew() == 0
                && index_eew <= cfg.elen
                && (-3..=3).contains(&index_log)
                && aligned(vs2, index_regs)
                && fields * data_regs <= 8
                && aligned(vd, data_regs)
                && vd + fields * data_regs <= 32
                && !clash,
            insn,
        )?;
        Ok(Self {
            index_eew,
            fields,
            data_regs,
        })
    }

    fn address(&self, cpu: &Cpu, base: u64, vs2: usize, i: usize, f: usize, size: u64) -> u64 {
        let offset = cpu.state.regs.vregs().elem(vs2, i, self.index_eew);
        base.wrapping_add(offset).wrapping_add(f as u64 * size)
    }
}

/// `vluxei<eew>.v`, `vloxei<eew>.v` and their segment forms.
///
/// Elements complete in index order, so the ordered and unordered forms
/// behave identically.
pub fn indexed_load(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let cfg = VectorConfig::load(cpu, insn)?;
    let layout = IndexedLayout::new(cpu, &cfg, insn, true)?;
    let (vd, vs2, vm) = (insn.rd(), insn.rs2(), insn.v_vm());
    cpu.require(vm || vd != 0, insn)?;

    let base = cpu.x(insn.rs1());
    let size = u64::from(cfg.sew / 8);
    for i in cfg.vstart..cfg.vl {
        let active = engine::active(cpu, vm, i);
        for f in 0..layout.fields {
            let reg = vd + f * layout.data_regs;
            if !active {
                engine::fill_inactive(cpu, &cfg, reg, i, cfg.sew);
                continue;
            }
            let addr = layout.address(cpu, base, vs2, i, f, size);
            match cpu.load(addr, size as usize) {
                Ok(value) => cpu.state.regs.vregs_mut().set_elem(reg, i, cfg.sew, value),
                Err(trap) => {
                    cpu.state.vector.vstart = i as u64;
                    return Err(trap);
                }
            }
        }
    }
    for f in 0..layout.fields {
        let reg = vd + f * layout.data_regs;
        engine::fill_tail(cpu, &cfg, reg, layout.data_regs, cfg.sew, cfg.vl);
    }
    engine::finish(cpu);
    done(insn, pc)
}

/// `vsuxei<eew>.v`, `vsoxei<eew>.v` and their segment forms.
pub fn indexed_store(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let cfg = VectorConfig::load(cpu, insn)?;
    let layout = IndexedLayout::new(cpu, &cfg, insn, false)?;
    let (vs3, vs2, vm) = (insn.rd(), insn.rs2(), insn.v_vm());

    let base = cpu.x(insn.rs1());
    let size = u64::from(cfg.sew / 8);
    for i in cfg.vstart..cfg.vl {
        if !engine::active(cpu, vm, i) {
            continue;
        }
        for f in 0..layout.fields {
            let reg = vs3 + f * layout.data_regs;
            let value = cpu.state.regs.vregs().elem(reg, i, cfg.sew);
            let addr = layout.address(cpu, base, vs2, i, f, size);
            if let Err(trap) = cpu.store(addr, size as usize, value) {
                cpu.state.vector.vstart = i as u64;
                return Err(trap);
            }
        }
    }
    engine::finish(cpu);
    done(insn, pc)
}

/// Byte count of a mask access: `ceil(vl / 8)`.
const fn mask_bytes(vl: usize) -> usize {
    vl.div_ceil(8)
}

/// `vlm.v vd, (rs1)`: loads `ceil(vl / 8)` bytes of mask, unmasked.
pub fn mask_load(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let cfg = VectorConfig::load(cpu, insn)?;
    cpu.require(insn.v_vm() && insn.v_nf() == 0 && insn.v_width() == width::E8, insn)?;
    let (vd, base) = (insn.rd(), cpu.x(insn.rs1()));
    for i in cfg.vstart..mask_bytes(cfg.vl) {
        match cpu.load(base.wrapping_add(i as u64), 1) {
            Ok(byte) => cpu.state.regs.vregs_mut().set_elem(vd, i, 8, byte),
            Err(trap) => {
                cpu.state.vector.vstart = i as u64;
                return Err(trap);
            }
        }
    }
    engine::finish(cpu);
    done(insn, pc)
}

/// `vsm.v vs3, (rs1)`: stores `ceil(vl / 8)` bytes of mask, unmasked.
pub fn mask_store(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let cfg = VectorConfig::load(cpu, insn)?;
    cpu.require(insn.v_vm() && insn.v_nf() == 0 && insn.v_width() == width::E8, insn)?;
    let (vs3, base) = (insn.rd(), cpu.x(insn.rs1()));
    for i in cfg.vstart..mask_bytes(cfg.vl) {
        let byte = cpu.state.regs.vregs().elem(vs3, i, 8);
        if let Err(trap) = cpu.store(base.wrapping_add(i as u64), 1, byte) {
            cpu.state.vector.vstart = i as u64;
            return Err(trap);
        }
    }
    engine::finish(cpu);
    done(insn, pc)
}

/// Registers moved by a whole-register access: `nf + 1` in `{1, 2, 4, 8}`.
fn whole_regs(cpu: &Cpu, insn: Insn) -> Result<usize, Trap> {
    let regs = insn.v_nf() as usize + 1;
    cpu.require(
        insn.v_vm() && insn.v_mew() == 0 && regs.is_power_of_two() && aligned(insn.rd(), regs),
        insn,
    )?;
    Ok(regs)
}

/// `vl<nf>re<eew>.v`: ignores `vtype` and `vl`, loading every element of
/// `nf + 1` registers.
pub fn whole_load(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    cpu.require_vector_unit(insn)?;
    let regs = whole_regs(cpu, insn)?;
    let eew = eew(insn).ok_or(Trap::IllegalInstruction(insn.bits()))?;
    cpu.require(eew <= cpu.elen(), insn)?;
    let size = (eew / 8) as usize;
    let count = regs * cpu.vlen() / eew as usize;
    let (vd, base) = (insn.rd(), cpu.x(insn.rs1()));
    for i in cpu.state.vector.vstart as usize..count {
        match cpu.load(base.wrapping_add((i * size) as u64), size) {
            Ok(value) => cpu.state.regs.vregs_mut().set_elem(vd, i, eew, value),
            Err(trap) => {
                cpu.state.vector.vstart = i as u64;
                return Err(trap);
            }
        }
    }
    engine::finish(cpu);
    done(insn, pc)
}

/// `vs<nf>r.v`: stores `nf + 1` whole registers as bytes.
pub fn whole_store(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    cpu.require_vector_unit(insn)?;
    let regs = whole_regs(cpu, insn)?;
    cpu.require(insn.v_width() == width::E8, insn)?;
    let count = regs * cpu.vlen() / 8;
    let (vs3, base) = (insn.rd(), cpu.x(insn.rs1()));
    for i in cpu.state.vector.vstart as usize..count {
        let byte = cpu.state.regs.vregs().elem(vs3, i, 8);
        if let Err(trap) = cpu.store(base.wrapping_add(i as u64), 1, byte) {
            cpu.state.vector.vstart = i as u64;
            return Err(trap);
        }
    }
    engine::finish(cpu);
    done(insn, pc)
}
