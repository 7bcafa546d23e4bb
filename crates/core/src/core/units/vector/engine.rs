//! Vector Loop Templates.
//!
//! Each template validates every precondition of its instruction family before
//! touching a register, then walks elements `vstart..vl`:
//! 1. **Masking:** With `vm = 0`, inactive elements are left undisturbed, or
//!    overwritten with all ones when `vma` is set.
//! 2. **Tail:** Elements from `vl` to the end of the destination group are left
//!    undisturbed, or overwritten with all ones when `vta` is set.
//! 3. **Completion:** `vstart` returns to zero and `mstatus.VS` becomes dirty.
//!
//! Handlers supply only the element operation. Element operations cannot fail,
//! so templates never leave a partially written destination behind; the
//! resumable memory loops live with the load/store handlers.

use crate::common::error::Trap;
use crate::core::Cpu;
use crate::isa::Insn;

use super::sew_mask;

/// Element-group size of the vector crypto instructions.
pub const EGS: usize = 4;

/// Second operand of a single-width, widening or narrowing operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    /// Element `i` of the register group starting at this register.
    Vector(usize),
    /// A scalar, truncated to SEW.
    Scalar(u64),
}

/// The vector configuration one instruction executes under.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VectorConfig {
    /// Selected element width.
    pub sew: u32,
    /// log2(LMUL).
    pub vlmul: i8,
    /// Active vector length.
    pub vl: usize,
    /// First element to execute.
    pub vstart: usize,
    /// Tail agnostic.
    pub vta: bool,
    /// Mask agnostic.
    pub vma: bool,
    /// VLEN in bits.
    pub vlen: usize,
    /// ELEN in bits.
    pub elen: u32,
}

/// Returns `true` when a group of `regs` registers may start at `reg`.
#[inline]
pub const fn aligned(reg: usize, regs: usize) -> bool {
    reg % regs == 0 && reg + regs <= 32
}

/// Returns `true` when register ranges `[a, a + an)` and `[b, b + bn)` intersect.
#[inline]
pub const fn overlaps(a: usize, an: usize, b: usize, bn: usize) -> bool {
    a < b + bn && b < a + an
}

impl VectorConfig {
    /// Reads the configuration, failing when the vector unit is off or `vill` is set.
    ///
    /// # Errors
    ///
    /// Illegal-instruction.
    pub fn load(cpu: &Cpu, insn: Insn) -> Result<Self, Trap> {
        cpu.require_vector_unit(insn)?;
        let v = &cpu.state.vector;
        cpu.require(!v.vtype.vill, insn)?;
        Ok(Self {
            sew: v.vtype.sew,
            vlmul: v.vtype.vlmul,
            vl: v.vl as usize,
            vstart: v.vstart as usize,
            vta: v.vtype.vta,
            vma: v.vtype.vma,
            vlen: cpu.vlen(),
            elen: cpu.elen(),
        })
    }

    /// Registers in one SEW group (one for fractional LMUL).
    pub const fn group_regs(&self) -> usize {
        if self.vlmul > 0 { 1 << self.vlmul } else { 1 }
    }

    /// Registers in one `2*SEW` group.
    pub const fn wide_group_regs(&self) -> usize {
        if self.vlmul >= 0 { 2 << self.vlmul } else { 1 }
    }

    /// Bits held by one SEW register group (LMUL * VLEN).
    pub const fn group_bits(&self) -> usize {
        if self.vlmul >= 0 {
            self.vlen << self.vlmul
        } else {
            self.vlen >> (-self.vlmul)
        }
    }

    /// VLMAX: SEW elements in one register group.
    pub const fn vlmax(&self) -> usize {
        self.group_bits() / self.sew as usize
    }

    /// Element slots of width `eew` in `regs` registers, tail included.
    pub const fn slots(&self, regs: usize, eew: u32) -> usize {
        regs * self.vlen / eew as usize
    }

    /// Widening is legal: `2*SEW <= ELEN` and `2*LMUL <= 8`.
    pub const fn can_widen(&self) -> bool {
        2 * self.sew <= self.elen && self.vlmul < 3
    }
}

/// Returns `true` when element `i` is active under mask bit `vm`.
#[inline]
pub fn active(cpu: &Cpu, vm: bool, i: usize) -> bool {
    vm || cpu.state.regs.vregs().mask_bit(0, i)
}

/// Applies the mask policy to an inactive element.
#[inline]
pub fn fill_inactive(cpu: &mut Cpu, cfg: &VectorConfig, vd: usize, i: usize, eew: u32) {
    if cfg.vma {
        cpu.state.regs.vregs_mut().set_elem(vd, i, eew, u64::MAX);
    }
}

/// Applies the tail policy to elements `from..` of a `regs`-register group.
pub fn fill_tail(cpu: &mut Cpu, cfg: &VectorConfig, vd: usize, regs: usize, eew: u32, from: usize) {
    if !cfg.vta {
        return;
    }
    let slots = cfg.slots(regs, eew);
    let vregs = cpu.state.regs.vregs_mut();
    for i in from..slots {
        vregs.set_elem(vd, i, eew, u64::MAX);
    }
}

/// Marks the instruction complete: `vstart = 0`, VS dirty.
pub fn finish(cpu: &mut Cpu) {
    cpu.state.vector.vstart = 0;
    cpu.mark_vs_dirty();
}

fn operand_value(cpu: &Cpu, rhs: Operand, i: usize, eew: u32) -> u64 {
    match rhs {
        Operand::Vector(vs1) => cpu.state.regs.vregs().elem(vs1, i, eew),
        Operand::Scalar(x) => x & sew_mask(eew),
    }
}

/// Single-width template: `vd[i] = op(vs2[i], rhs[i], sew)`.
///
/// # Errors
///
/// Illegal-instruction for misaligned register groups, or a masked operation
/// whose destination is `v0`.
pub fn single_width(
    cpu: &mut Cpu,
    insn: Insn,
    rhs: Operand,
    mut op: impl FnMut(u64, u64, u32) -> u64,
) -> Result<(), Trap> {
    let cfg = VectorConfig::load(cpu, insn)?;
    let (vd, vs2, vm) = (insn.rd(), insn.rs2(), insn.v_vm());
    let regs = cfg.group_regs();
    let rhs_ok = match rhs {
        Operand::Vector(vs1) => aligned(vs1, regs),
        Operand::Scalar(_) => true,
    };
    cpu.require(aligned(vd, regs) && aligned(vs2, regs) && rhs_ok && (vm || vd != 0), insn)?;

    let sew = cfg.sew;
    for i in cfg.vstart..cfg.vl {
        if !active(cpu, vm, i) {
            fill_inactive(cpu, &cfg, vd, i, sew);
            continue;
        }
        let a = cpu.state.regs.vregs().elem(vs2, i, sew);
        let b = operand_value(cpu, rhs, i, sew);
        let result = op(a, b, sew) & sew_mask(sew);
        cpu.state.regs.vregs_mut().set_elem(vd, i, sew, result);
    }
    fill_tail(cpu, &cfg, vd, regs, sew, cfg.vl);
    finish(cpu);
    Ok(())
}

/// Vector-vector form of [`single_width`].
///
/// # Errors
///
/// See [`single_width`].
pub fn for_each_vv(cpu: &mut Cpu, insn: Insn, op: impl FnMut(u64, u64, u32) -> u64) -> Result<(), Trap> {
    single_width(cpu, insn, Operand::Vector(insn.rs1()), op)
}

/// Vector-scalar form of [`single_width`]; the scalar is `x[rs1]`.
///
/// # Errors
///
/// See [`single_width`].
pub fn for_each_vx(cpu: &mut Cpu, insn: Insn, op: impl FnMut(u64, u64, u32) -> u64) -> Result<(), Trap> {
    let scalar = cpu.x(insn.rs1());
    single_width(cpu, insn, Operand::Scalar(scalar), op)
}

/// Vector-immediate form of [`single_width`]; the scalar is the sign-extended `simm5`.
///
/// # Errors
///
/// See [`single_width`].
pub fn for_each_vi(cpu: &mut Cpu, insn: Insn, op: impl FnMut(u64, u64, u32) -> u64) -> Result<(), Trap> {
    single_width(cpu, insn, Operand::Scalar(insn.v_simm5() as u64), op)
}

/// Widening template: `vd[i] (2*SEW) = op(vs2[i], rhs[i], sew)`.
///
/// With `wide_vs2`, `vs2` is itself a `2*SEW` group (the `.wv`/`.wx` forms).
///
/// # Errors
///
/// Illegal-instruction when `2*SEW > ELEN` or `2*LMUL > 8`, for misaligned
/// groups, and when the destination overlaps a narrower source anywhere but in
/// its highest-numbered part.
pub fn widening(
    cpu: &mut Cpu,
    insn: Insn,
    rhs: Operand,
    wide_vs2: bool,
    mut op: impl FnMut(u64, u64, u32) -> u64,
) -> Result<(), Trap> {
    let cfg = VectorConfig::load(cpu, insn)?;
    let (vd, vs2, vm) = (insn.rd(), insn.rs2(), insn.v_vm());
    let (regs, wide) = (cfg.group_regs(), cfg.wide_group_regs());
    // A narrow source may share only the top half of the wide destination.
    let narrow_ok = |vs: usize| {
        !overlaps(vd, wide, vs, regs) || (cfg.vlmul >= 0 && vs == vd + wide - regs)
    };
    let vs2_ok = if wide_vs2 {
        aligned(vs2, wide)
    } else {
        aligned(vs2, regs) && narrow_ok(vs2)
    };
    let rhs_ok = match rhs {
        Operand::Vector(vs1) => aligned(vs1, regs) && narrow_ok(vs1),
        Operand::Scalar(_) => true,
    };
    cpu.require(
        cfg.can_widen() && aligned(vd, wide) && vs2_ok && rhs_ok && (vm || vd != 0),
        insn,
    )?;

    let (sew, wsew) = (cfg.sew, 2 * cfg.sew);
    let a_width = if wide_vs2 { wsew } else { sew };
    for i in cfg.vstart..cfg.vl {
        if !active(cpu, vm, i) {
            fill_inactive(cpu, &cfg, vd, i, wsew);
            continue;
        }
        let a = cpu.state.regs.vregs().elem(vs2, i, a_width);
        let b = operand_value(cpu, rhs, i, sew);
        let result = op(a, b, sew) & sew_mask(wsew);
        cpu.state.regs.vregs_mut().set_elem(vd, i, wsew, result);
    }
    fill_tail(cpu, &cfg, vd, wide, wsew, cfg.vl);
    finish(cpu);
    Ok(())
}

/// Narrowing template: `vd[i] (SEW) = op(vs2[i] (2*SEW), rhs[i], sew)`.
///
/// # Errors
///
/// Illegal-instruction when `2*SEW > ELEN` or `2*LMUL > 8`, for misaligned
/// groups, and when the destination overlaps the wide source anywhere but in
/// its lowest-numbered part.
pub fn narrowing(
    cpu: &mut Cpu,
    insn: Insn,
    rhs: Operand,
    mut op: impl FnMut(u64, u64, u32) -> u64,
) -> Result<(), Trap> {
    let cfg = VectorConfig::load(cpu, insn)?;
    let (vd, vs2, vm) = (insn.rd(), insn.rs2(), insn.v_vm());
    let (regs, wide) = (cfg.group_regs(), cfg.wide_group_regs());
    let rhs_ok = match rhs {
        Operand::Vector(vs1) => aligned(vs1, regs),
        Operand::Scalar(_) => true,
    };
    cpu.require(
        cfg.can_widen()
            && aligned(vd, regs)
            && aligned(vs2, wide)
            && (!overlaps(vd, regs, vs2, wide) || vd == vs2)
            && rhs_ok
            && (vm || vd != 0),
        insn,
    )?;

    let (sew, wsew) = (cfg.sew, 2 * cfg.sew);
    for i in cfg.vstart..cfg.vl {
        if !active(cpu, vm, i) {
            fill_inactive(cpu, &cfg, vd, i, sew);
            continue;
        }
        let a = cpu.state.regs.vregs().elem(vs2, i, wsew);
        let b = operand_value(cpu, rhs, i, sew);
        let result = op(a, b, sew) & sew_mask(sew);
        cpu.state.regs.vregs_mut().set_elem(vd, i, sew, result);
    }
    fill_tail(cpu, &cfg, vd, regs, sew, cfg.vl);
    finish(cpu);
    Ok(())
}

/// Compare-to-mask template: bit `i` of `vd` = `op(vs2[i], rhs[i], sew)`.
///
/// Mask-register tails are left undisturbed.
///
/// # Errors
///
/// Illegal-instruction for misaligned sources, or a destination inside a
/// source group other than at its first register.
pub fn compare(
    cpu: &mut Cpu,
    insn: Insn,
    rhs: Operand,
    mut op: impl FnMut(u64, u64, u32) -> bool,
) -> Result<(), Trap> {
    let cfg = VectorConfig::load(cpu, insn)?;
    let (vd, vs2, vm) = (insn.rd(), insn.rs2(), insn.v_vm());
    let regs = cfg.group_regs();
    let dest_ok = |vs: usize| !overlaps(vd, 1, vs, regs) || vd == vs;
    let rhs_ok = match rhs {
        Operand::Vector(vs1) => aligned(vs1, regs) && dest_ok(vs1),
        Operand::Scalar(_) => true,
    };
    cpu.require(aligned(vs2, regs) && dest_ok(vs2) && rhs_ok, insn)?;

    let sew = cfg.sew;
    for i in cfg.vstart..cfg.vl {
        if !active(cpu, vm, i) {
            if cfg.vma {
                cpu.state.regs.vregs_mut().set_mask_bit(vd, i, true);
            }
            continue;
        }
        let a = cpu.state.regs.vregs().elem(vs2, i, sew);
        let b = operand_value(cpu, rhs, i, sew);
        let bit = op(a, b, sew);
        cpu.state.regs.vregs_mut().set_mask_bit(vd, i, bit);
    }
    finish(cpu);
    Ok(())
}

/// Reduction template: `vd[0] = fold(vs1[0], active vs2[0..vl])`.
///
/// Nothing is written when `vl` is zero.
///
/// # Errors
///
/// Illegal-instruction when `vstart != 0` or `vs2` is misaligned.
pub fn reduction(
    cpu: &mut Cpu,
    insn: Insn,
    mut op: impl FnMut(u64, u64, u32) -> u64,
) -> Result<(), Trap> {
    let cfg = VectorConfig::load(cpu, insn)?;
    let (vd, vs1, vs2, vm) = (insn.rd(), insn.rs1(), insn.rs2(), insn.v_vm());
    cpu.require(cfg.vstart == 0 && aligned(vs2, cfg.group_regs()), insn)?;

    let sew = cfg.sew;
    if cfg.vl > 0 {
        let mut acc = cpu.state.regs.vregs().elem(vs1, 0, sew);
        for i in 0..cfg.vl {
            if active(cpu, vm, i) {
                let e = cpu.state.regs.vregs().elem(vs2, i, sew);
                acc = op(acc, e, sew) & sew_mask(sew);
            }
        }
        cpu.state.regs.vregs_mut().set_elem(vd, 0, sew, acc);
        fill_tail(cpu, &cfg, vd, 1, sew, 1);
    }
    finish(cpu);
    Ok(())
}

/// How the element-group template reads `vs2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupSource {
    /// Group `g` of `vs2` for destination group `g` (`.vv`).
    PerGroup,
    /// Group 0 of `vs2` for every destination group (`.vs`).
    Scalar,
}

/// One 128-bit element group as four 32-bit words, element 0 first.
pub type Group = [u32; EGS];

fn read_group(cpu: &Cpu, reg: usize, g: usize) -> Group {
    let vregs = cpu.state.regs.vregs();
    std::array::from_fn(|k| vregs.elem(reg, g * EGS + k, 32) as u32)
}

/// Element-group template over SEW = 32, EGS = 4: `vd[g] = op(vd[g], vs2[g], vs1[g])`.
///
/// Element groups are never masked.
///
/// # Errors
///
/// Illegal-instruction when SEW is not 32, when `vstart` or `vl` is not a
/// multiple of the group size, when LMUL * VLEN is narrower than one group,
/// for misaligned registers, and when a `.vs` source overlaps the destination.
pub fn element_groups(
    cpu: &mut Cpu,
    insn: Insn,
    source: GroupSource,
    reads_vs1: bool,
    mut op: impl FnMut(Group, Group, Group) -> Group,
) -> Result<(), Trap> {
    let cfg = VectorConfig::load(cpu, insn)?;
    let (vd, vs1, vs2) = (insn.rd(), insn.rs1(), insn.rs2());
    let regs = cfg.group_regs();
    let vs2_ok = match source {
        GroupSource::PerGroup => aligned(vs2, regs),
        GroupSource::Scalar => !overlaps(vd, regs, vs2, 1),
    };
    cpu.require(
        cfg.sew == 32
            && cfg.vstart % EGS == 0
            && cfg.vl % EGS == 0
            && cfg.group_bits() >= 32 * EGS
            && aligned(vd, regs)
            && vs2_ok
            && (!reads_vs1 || aligned(vs1, regs)),
        insn,
    )?;

    for g in cfg.vstart / EGS..cfg.vl / EGS {
        let dst = read_group(cpu, vd, g);
        let src2 = match source {
            GroupSource::PerGroup => read_group(cpu, vs2, g),
            GroupSource::Scalar => read_group(cpu, vs2, 0),
        };
        let src1 = if reads_vs1 { read_group(cpu, vs1, g) } else { [0; EGS] };
        let out = op(dst, src2, src1);
        let vregs = cpu.state.regs.vregs_mut();
        for (k, word) in out.iter().enumerate() {
            vregs.set_elem(vd, g * EGS + k, 32, u64::from(*word));
        }
    }
    fill_tail(cpu, &cfg, vd, regs, 32, cfg.vl);
    finish(cpu);
    Ok(())
}
