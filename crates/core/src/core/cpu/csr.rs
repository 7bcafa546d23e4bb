//! CSR Access Logic.
//!
//! This module implements the Control and Status Register access rules for the CPU.
//! It performs the following:
//! 1. **Access Control:** Existence and extension gating, the `addr[9:8]` privilege
//!    rule, the read-only space, debug-only CSRs, FS/VS gating, counter enables and
//!    `TVM`. Failures are illegal-instruction, or virtual-instruction when virtualized.
//! 2. **Views:** Registers that are windows onto others (`sstatus`, `sie`, `sip`,
//!    `fcsr`, the vector CSRs, user counters) and the VS redirection of S-level CSRs.
//! 3. **Legalization:** WARL fields of `misa`, `mstatus`, `xtvec`, `xepc`, `satp`,
//!    delegation registers and `dcsr`.
//!
//! Every write is followed by a refresh of the enabled-extension set, since
//! `misa` and status fields feed the enable predicates.

use super::Cpu;
use crate::common::error::Trap;
use crate::core::arch::csr::*;
use crate::core::arch::mode::PrivilegeMode;
use crate::core::arch::vtype::Vxrm;
use crate::isa::isa_string::misa_bit;
use crate::isa::{Insn, Xlen};

/// Exceptions `hedeleg` may delegate to VS-mode.
const HEDELEG_MASK: u64 = 0x1ff | (1 << 12) | (1 << 13) | (1 << 15);

/// Extensions whose `misa` bit software may clear.
const TOGGLABLE_MISA: [char; 6] = ['m', 'a', 'f', 'd', 'c', 'v'];

impl Cpu {
    /// Reads a CSR on behalf of an instruction, enforcing access rules.
    ///
    /// # Errors
    ///
    /// Illegal-instruction, or virtual-instruction when virtualized, for a CSR that
    /// does not exist, belongs to a disabled extension, or is not accessible at the
    /// current privilege level.
    pub fn csr_read(&self, addr: u16, insn: Insn) -> Result<u64, Trap> {
        self.check_csr_access(addr, false, insn)?;
        Ok(self.read_csr(addr))
    }

    /// Writes a CSR on behalf of an instruction, enforcing access rules.
    ///
    /// # Errors
    ///
    /// As [`Cpu::csr_read`], plus writes to the read-only space.
    pub fn csr_write(&mut self, addr: u16, value: u64, insn: Insn) -> Result<(), Trap> {
        self.check_csr_access(addr, true, insn)?;
        self.write_csr(addr, value);
        Ok(())
    }

    /// Checks whether `insn` may read (and, if `write`, write) CSR `addr`.
    ///
    /// # Errors
    ///
    /// See [`Cpu::csr_read`].
    pub fn check_csr_access(&self, addr: u16, write: bool, insn: Insn) -> Result<(), Trap> {
        let illegal = Trap::IllegalInstruction(insn.bits());
        let virtual_insn = Trap::VirtualInstruction(insn.bits());
        let Some(entry) = self.state.csrs.entry(addr) else {
            return Err(illegal);
        };
        if !self.enabled().contains(&entry.owner) {
            return Err(illegal);
        }
        if (DCSR..=DSCRATCH1).contains(&addr) && !self.state.debug_mode {
            return Err(illegal);
        }

        let virt = self.state.virt;
        let csr_priv = csr_min_privilege(addr);
        // HS-mode ranks above the hypervisor CSR level; VS-mode below it.
        let effective = match self.state.privilege {
            PrivilegeMode::Supervisor if !virt => 2,
            p => p.to_bits(),
        };
        if effective < csr_priv {
            return Err(if virt && csr_priv <= 2 { virtual_insn } else { illegal });
        }
        if write && csr_is_read_only(addr) {
            return Err(illegal);
        }

        let status = self.state.csrs.get(MSTATUS);
        match addr {
            FFLAGS | FRM | FCSR => self.require_fp(insn),
            VSTART | VXSAT | VXRM | VCSR | VL | VTYPE | VLENB => self.require_vector_unit(insn),
            CYCLE | TIME | INSTRET => self.check_counter_access(addr, insn),
            SATP if virt && self.state.csrs.get(HSTATUS) & HSTATUS_VTVM != 0 => Err(virtual_insn),
            SATP | HGATP
                if !virt
                    && self.state.privilege == PrivilegeMode::Supervisor
                    && status & MSTATUS_TVM != 0 =>
            {
                Err(illegal)
            }
            _ => Ok(()),
        }
    }

    fn check_counter_access(&self, addr: u16, insn: Insn) -> Result<(), Trap> {
        let bit = 1u64 << (addr - CYCLE);
        let csrs = &self.state.csrs;
        let privilege = self.state.privilege;
        if privilege < PrivilegeMode::Machine && csrs.get(MCOUNTEREN) & bit == 0 {
            return Err(Trap::IllegalInstruction(insn.bits()));
        }
        if self.state.virt && csrs.contains(HCOUNTEREN) && csrs.get(HCOUNTEREN) & bit == 0 {
            return Err(Trap::VirtualInstruction(insn.bits()));
        }
        if privilege == PrivilegeMode::User
            && self.isa().has_supervisor()
            && csrs.get(SCOUNTEREN) & bit == 0
        {
            return Err(self.virtual_or_illegal(insn));
        }
        Ok(())
    }

    /// Reads a CSR through its view, without access checks.
    ///
    /// Absent registers read as zero.
    pub fn read_csr(&self, addr: u16) -> u64 {
        let b = &self.state.csrs;
        let v = &self.state.vector;
        let virt = self.state.virt;
        let xlen = self.xlen();
        let value = match addr {
            FFLAGS => b.get(FFLAGS) & 0x1f,
            FRM => b.get(FRM) & 0x7,
            FCSR => ((b.get(FRM) & 0x7) << 5) | (b.get(FFLAGS) & 0x1f),
            VSTART => v.vstart,
            VXSAT => u64::from(v.vxsat),
            VXRM => v.vxrm.to_bits(),
            VCSR => v.vcsr(),
            VL => v.vl,
            VTYPE => v.vtype.raw,
            VLENB => (self.vlen() / 8) as u64,
            CYCLE | TIME => b.get(MCYCLE),
            INSTRET => b.get(MINSTRET),
            MSTATUS => self.with_sd(b.get(MSTATUS)),
            SSTATUS if virt => self.with_sd(b.get(VSSTATUS)) & self.sstatus_mask(),
            SSTATUS => self.with_sd(b.get(MSTATUS)) & self.sstatus_mask(),
            VSSTATUS => self.with_sd(b.get(VSSTATUS)) & self.sstatus_mask(),
            SIE if virt => self.vs_view(b.get(MIE)),
            SIE => b.get(MIE) & b.get(MIDELEG),
            SIP if virt => self.vs_view(b.get(MIP)),
            SIP => b.get(MIP) & b.get(MIDELEG),
            VSIE => self.vs_view(b.get(MIE)),
            VSIP => self.vs_view(b.get(MIP)),
            HIE => b.get(MIE) & VS_INTERRUPTS,
            HIP => b.get(MIP) & VS_INTERRUPTS,
            STVEC | SSCRATCH | SEPC | SCAUSE | STVAL | SATP if virt => {
                return self.read_csr(vs_alias(addr));
            }
            MEPC | SEPC | VSEPC | DPC => b.get(addr) & self.epc_mask(),
            _ => b.read(addr).unwrap_or(0),
        };
        if xlen == Xlen::Rv32 { value & 0xffff_ffff } else { value }
    }

    /// Writes a CSR through its view and WARL rules, without access checks.
    ///
    /// Writes to absent or read-only registers are ignored.
    pub fn write_csr(&mut self, addr: u16, value: u64) {
        let value = self.xlen().zext(value);
        let virt = self.state.virt;
        let has_h = self.isa().has("h");
        match addr {
            FFLAGS => {
                self.state.csrs.set(FFLAGS, value & 0x1f);
                self.mark_fs_dirty();
            }
            FRM => {
                self.state.csrs.set(FRM, value & 0x7);
                self.mark_fs_dirty();
            }
            FCSR => {
                self.state.csrs.set(FFLAGS, value & 0x1f);
                self.state.csrs.set(FRM, (value >> 5) & 0x7);
                self.mark_fs_dirty();
            }
            VSTART => {
                self.state.vector.vstart = value & (self.vlen() as u64 - 1);
                self.mark_vs_dirty();
            }
            VXSAT => {
                self.state.vector.vxsat = value & 1 != 0;
                self.mark_vs_dirty();
            }
            VXRM => {
                self.state.vector.vxrm = Vxrm::from_bits(value);
                self.mark_vs_dirty();
            }
            VCSR => {
                self.state.vector.vxsat = value & 1 != 0;
                self.state.vector.vxrm = Vxrm::from_bits(value >> 1);
                self.mark_vs_dirty();
            }
            MSTATUS => {
                let old = self.state.csrs.get(MSTATUS);
                let new = self.legalize_mstatus(old, value);
                self.state.csrs.set(MSTATUS, new);
            }
            SSTATUS if virt => self.masked_write(VSSTATUS, self.sstatus_writable(), value),
            SSTATUS => self.masked_write(MSTATUS, self.sstatus_writable(), value),
            VSSTATUS => self.masked_write(VSSTATUS, self.sstatus_writable(), value),
            SIE if virt => self.write_vs_view(MIE, VS_INTERRUPTS, value),
            SIE => {
                let mask = self.state.csrs.get(MIDELEG) & S_INTERRUPTS;
                self.masked_write(MIE, mask, value);
            }
            SIP if virt => self.write_vs_view(MIP, MIP_VSSIP, value),
            SIP => {
                let mask = self.state.csrs.get(MIDELEG) & MIP_SSIP;
                self.masked_write(MIP, mask, value);
            }
            VSIE => self.write_vs_view(MIE, VS_INTERRUPTS, value),
            VSIP => self.write_vs_view(MIP, MIP_VSSIP, value),
            HIE => self.masked_write(MIE, VS_INTERRUPTS, value),
            HIP => self.masked_write(MIP, MIP_VSSIP, value),
            MIE => {
                let mask = M_INTERRUPTS | S_INTERRUPTS | if has_h { VS_INTERRUPTS } else { 0 };
                self.masked_write(MIE, mask, value);
            }
            MIP => {
                let mask = S_INTERRUPTS | if has_h { MIP_VSSIP } else { 0 };
                self.masked_write(MIP, mask, value);
            }
            MIDELEG => {
                let forced = if has_h { VS_INTERRUPTS } else { 0 };
                self.state.csrs.set(MIDELEG, (value & S_INTERRUPTS) | forced);
            }
            MEDELEG => {
                let mut mask = 0xffff & !(1 << 11) & !(1 << 14) & !(1 << 10);
                if has_h {
                    mask |= (1 << 10) | (0xf << 20);
                }
                self.state.csrs.set(MEDELEG, value & mask);
            }
            HEDELEG => self.state.csrs.set(HEDELEG, value & HEDELEG_MASK),
            HIDELEG => self.state.csrs.set(HIDELEG, value & VS_INTERRUPTS),
            HSTATUS => {
                let mask = HSTATUS_GVA
                    | HSTATUS_SPV
                    | HSTATUS_SPVP
                    | HSTATUS_VTVM
                    | HSTATUS_VTW
                    | HSTATUS_VTSR;
                self.masked_write(HSTATUS, mask, value);
            }
            STVEC | SSCRATCH | SEPC | SCAUSE | STVAL | SATP if virt => {
                self.write_csr(vs_alias(addr), value);
                return;
            }
            MTVEC | STVEC | VSTVEC => {
                let legal = if value & TVEC_MODE_MASK > TVEC_MODE_VECTORED {
                    value & !TVEC_MODE_MASK
                } else {
                    value
                };
                self.state.csrs.set(addr, legal);
            }
            MEPC | SEPC | VSEPC | DPC => self.state.csrs.set(addr, value & !1),
            SATP | VSATP | HGATP => {
                let mode = value >> SATP_MODE_SHIFT;
                let supported = self.xlen() == Xlen::Rv32
                    || matches!(mode, SATP_MODE_BARE | SATP_MODE_SV39 | SATP_MODE_SV48);
                if supported {
                    self.state.csrs.set(addr, value);
                    self.tracer.satp_write(value);
                }
            }
            MISA => {
                let old = self.state.csrs.get(MISA);
                let new = self.legalize_misa(old, value);
                if new != old {
                    tracing::debug!(old = format_args!("{old:#x}"), new = format_args!("{new:#x}"), "misa changed");
                }
                self.state.csrs.set(MISA, new);
            }
            DCSR => {
                let old = self.state.csrs.get(DCSR);
                let mask = DCSR_EBREAKM
                    | DCSR_EBREAKS
                    | DCSR_EBREAKU
                    | DCSR_EBREAKVS
                    | DCSR_EBREAKVU
                    | DCSR_STEP
                    | DCSR_V;
                let mut new = (old & !mask) | (value & mask);
                if self.mode_supported(value & DCSR_PRV) {
                    new = (new & !DCSR_PRV) | (value & DCSR_PRV);
                }
                self.state.csrs.set(DCSR, new);
            }
            _ => {
                let _ = self.state.csrs.write(addr, value);
            }
        }
        self.refresh_dispatch();
    }

    /// Raises interrupt-pending bits (external interrupt controller entry point).
    pub fn set_mip_bits(&mut self, bits: u64) {
        let mip = self.state.csrs.get(MIP);
        self.state.csrs.set(MIP, mip | bits);
    }

    /// Clears interrupt-pending bits (external interrupt controller entry point).
    pub fn clear_mip_bits(&mut self, bits: u64) {
        let mip = self.state.csrs.get(MIP);
        self.state.csrs.set(MIP, mip & !bits);
    }

    /// Returns `true` when the two-bit privilege encoding names an implemented level.
    pub(crate) fn mode_supported(&self, bits: u64) -> bool {
        match PrivilegeMode::from_bits(bits) {
            Some(PrivilegeMode::Machine) => true,
            Some(PrivilegeMode::Supervisor) => self.isa().has_supervisor(),
            Some(PrivilegeMode::User) => self.isa().has_user(),
            None => false,
        }
    }

    /// The lowest implemented privilege level.
    pub(crate) fn least_privileged(&self) -> PrivilegeMode {
        if self.isa().has_user() {
            PrivilegeMode::User
        } else {
            PrivilegeMode::Machine
        }
    }

    fn masked_write(&mut self, addr: u16, mask: u64, value: u64) {
        let old = self.state.csrs.get(addr);
        self.state.csrs.set(addr, (old & !mask) | (value & mask));
    }

    /// VS-level interrupt bits shifted into S positions.
    fn vs_view(&self, reg: u64) -> u64 {
        (reg & self.state.csrs.get(HIDELEG) & VS_INTERRUPTS) >> 1
    }

    fn write_vs_view(&mut self, addr: u16, writable: u64, value: u64) {
        let mask = self.state.csrs.get(HIDELEG) & writable;
        self.masked_write(addr, mask, value << 1);
    }

    fn sd_bit(&self) -> u64 {
        1 << (self.xlen().bits() - 1)
    }

    fn with_sd(&self, status: u64) -> u64 {
        let dirty = |field: u64, shift: u64| (status & field) >> shift == EXT_STATE_DIRTY;
        let status = status & !MSTATUS_SD & !MSTATUS_SD_RV32;
        if dirty(MSTATUS_FS, MSTATUS_FS_SHIFT) || dirty(MSTATUS_VS, MSTATUS_VS_SHIFT) || dirty(MSTATUS_XS, 15) {
            status | self.sd_bit()
        } else {
            status
        }
    }

    fn sstatus_mask(&self) -> u64 {
        let base = SSTATUS_MASK & !MSTATUS_SD;
        let base = if self.xlen() == Xlen::Rv32 { base & !MSTATUS_UXL } else { base };
        base | self.sd_bit()
    }

    fn sstatus_writable(&self) -> u64 {
        let mut mask = MSTATUS_SIE | MSTATUS_SPIE | MSTATUS_SPP | MSTATUS_SUM | MSTATUS_MXR;
        if self.isa().has("f") {
            mask |= MSTATUS_FS;
        }
        if self.isa().has("v") {
            mask |= MSTATUS_VS;
        }
        mask
    }

    fn epc_mask(&self) -> u64 {
        if self.state.csrs.get(MISA) & misa_bit('c') != 0 { !1 } else { !3 }
    }

    fn legalize_mstatus(&self, old: u64, value: u64) -> u64 {
        let isa = self.isa();
        let mut mask = MSTATUS_SIE | MSTATUS_MIE | MSTATUS_SPIE | MSTATUS_MPIE | MSTATUS_MPP;
        if isa.has_supervisor() {
            mask |= MSTATUS_SPP | MSTATUS_SUM | MSTATUS_MXR | MSTATUS_TVM | MSTATUS_TSR;
        }
        if isa.has_user() {
            mask |= MSTATUS_MPRV | MSTATUS_TW;
        }
        if isa.has("f") {
            mask |= MSTATUS_FS;
        }
        if isa.has("v") {
            mask |= MSTATUS_VS;
        }
        if isa.has("h") {
            mask |= MSTATUS_MPV | MSTATUS_GVA;
        }
        let mut new = (old & !mask) | (value & mask);
        if !self.mode_supported((new & MSTATUS_MPP) >> MSTATUS_MPP_SHIFT) {
            new = (new & !MSTATUS_MPP) | (old & MSTATUS_MPP);
        }
        new & !MSTATUS_SD & !MSTATUS_SD_RV32
    }

    fn legalize_misa(&self, old: u64, value: u64) -> u64 {
        let configured = self.isa().misa();
        let togglable = TOGGLABLE_MISA
            .iter()
            .map(|c| misa_bit(*c))
            .fold(0, |acc, b| acc | b)
            & configured;
        let mut new = (old & !togglable) | (value & togglable);
        if new & misa_bit('f') == 0 {
            new &= !misa_bit('d');
        }
        if new & misa_bit('d') == 0 {
            new &= !misa_bit('v');
        }
        // Dropping C is refused while the next instruction is only 2-byte aligned.
        if new & misa_bit('c') == 0 && self.state.pc.wrapping_add(4) & 2 != 0 {
            new |= old & misa_bit('c');
        }
        new
    }
}

/// The VS-level register an S-level CSR is redirected to while virtualized.
const fn vs_alias(addr: u16) -> u16 {
    match addr {
        SSTATUS => VSSTATUS,
        SIE => VSIE,
        STVEC => VSTVEC,
        SSCRATCH => VSSCRATCH,
        SEPC => VSEPC,
        SCAUSE => VSCAUSE,
        STVAL => VSTVAL,
        SIP => VSIP,
        SATP => VSATP,
        other => other,
    }
}
