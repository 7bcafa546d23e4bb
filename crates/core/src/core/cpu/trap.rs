//! Trap Handling Logic.
//!
//! This module implements trap entry and return for the CPU. It performs the following:
//! 1. **Trap Entry:** Chooses the handling level (M, HS or VS) through `medeleg`/`mideleg`
//!    and `hedeleg`/`hideleg`, then updates the cause, epc, tval and status registers of
//!    that level in one step.
//! 2. **Debug Mode:** Entry on `ebreak` (per `dcsr.ebreak*` or an attached debugger),
//!    halt requests and single steps; exceptions inside debug mode go to the debug
//!    exception vector without touching any CSR.
//! 3. **Return Handling:** `mret`, `sret`, `dret` and the `wfi` privilege rules.
//! 4. **Interrupt Selection:** The highest-priority pending and enabled interrupt.

use super::Cpu;
use crate::common::error::Trap;
use crate::core::arch::csr::*;
use crate::core::arch::mode::PrivilegeMode;
use crate::core::arch::trap::{INTERRUPT_PRIORITY, TrapRecord, irq_to_trap};
use crate::isa::Insn;
use crate::isa::privileged::cause::debug;

/// Where a trap is taken.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TrapTarget {
    Machine,
    Hypervisor,
    VirtualSupervisor,
}

/// Handler address for a trap vector register.
const fn vector_target(tvec: u64, interrupt: bool, code: u64) -> u64 {
    let base = tvec & !TVEC_MODE_MASK;
    if interrupt && tvec & TVEC_MODE_MASK == TVEC_MODE_VECTORED {
        base.wrapping_add(4 * code)
    } else {
        base
    }
}

/// `xPIE = xIE; xIE = 0` for the field pair `ie`/`pie`.
const fn stack_interrupt_enable(status: u64, ie: u64, pie: u64) -> u64 {
    let status = if status & ie != 0 { status | pie } else { status & !pie };
    status & !ie
}

/// `xIE = xPIE; xPIE = 1` for the field pair `ie`/`pie`.
const fn unstack_interrupt_enable(status: u64, ie: u64, pie: u64) -> u64 {
    let status = if status & pie != 0 { status | ie } else { status & !ie };
    status | pie
}

impl Cpu {
    /// Takes a trap raised by the instruction at `epc` (or before it, for interrupts).
    ///
    /// All CSR updates happen here, after the handler has returned, so a trapping
    /// instruction never leaves partial architectural effects behind.
    pub fn take_trap(&mut self, trap: Trap, epc: u64) {
        let record = TrapRecord {
            trap,
            epc,
            privilege: self.state.privilege,
            virt: self.state.virt,
        };
        self.tracer.trap(epc, trap);
        self.memory.yield_reservation();
        self.wfi = false;

        if self.state.debug_mode {
            tracing::debug!(%trap, epc = format_args!("{epc:#x}"), "exception in debug mode");
            self.state.pc = self.options.debug_exception_entry;
            return;
        }
        if matches!(trap, Trap::Breakpoint(_)) && self.breakpoint_enters_debug() {
            self.enter_debug_mode(debug::EBREAK, epc);
            return;
        }

        let target = self.trap_target(&record);
        tracing::debug!(
            %trap,
            epc = format_args!("{epc:#x}"),
            from = record.privilege.name(record.virt),
            to = ?target,
            "taking trap"
        );

        let xlen = self.xlen();
        let interrupt = trap.is_interrupt();
        let code = trap.cause();
        let gva = record.virt && trap.has_gva();
        let from_supervisor = record.privilege == PrivilegeMode::Supervisor;
        let has_h = self.isa().has("h");
        let csrs = &mut self.state.csrs;

        match target {
            TrapTarget::VirtualSupervisor => {
                // VS interrupts appear to the guest as their S-level counterparts.
                let (cause, code) = if interrupt && (VS_INTERRUPTS >> code) & 1 != 0 {
                    (record.cause(xlen) - 1, code - 1)
                } else {
                    (record.cause(xlen), code)
                };
                let mut status = csrs.get(VSSTATUS);
                status = stack_interrupt_enable(status, MSTATUS_SIE, MSTATUS_SPIE);
                status = if from_supervisor { status | MSTATUS_SPP } else { status & !MSTATUS_SPP };
                csrs.set(VSEPC, epc);
                csrs.set(VSCAUSE, cause);
                csrs.set(VSTVAL, record.tval());
                csrs.set(VSSTATUS, status);
                self.state.pc = vector_target(csrs.get(VSTVEC), interrupt, code);
                self.state.privilege = PrivilegeMode::Supervisor;
                self.state.virt = true;
            }
            TrapTarget::Hypervisor => {
                if has_h {
                    let mut hstatus = csrs.get(HSTATUS) & !(HSTATUS_SPV | HSTATUS_GVA);
                    if record.virt {
                        hstatus |= HSTATUS_SPV;
                        hstatus = if from_supervisor { hstatus | HSTATUS_SPVP } else { hstatus & !HSTATUS_SPVP };
                    }
                    if gva {
                        hstatus |= HSTATUS_GVA;
                    }
                    csrs.set(HSTATUS, hstatus);
                    csrs.set(HTVAL, 0);
                    csrs.set(HTINST, 0);
                }
                let mut status = csrs.get(MSTATUS);
                status = stack_interrupt_enable(status, MSTATUS_SIE, MSTATUS_SPIE);
                status = if from_supervisor { status | MSTATUS_SPP } else { status & !MSTATUS_SPP };
                csrs.set(SEPC, epc);
                csrs.set(SCAUSE, record.cause(xlen));
                csrs.set(STVAL, record.tval());
                csrs.set(MSTATUS, status);
                self.state.pc = vector_target(csrs.get(STVEC), interrupt, code);
                self.state.privilege = PrivilegeMode::Supervisor;
                self.state.virt = false;
            }
            TrapTarget::Machine => {
                let mut status = csrs.get(MSTATUS);
                status = stack_interrupt_enable(status, MSTATUS_MIE, MSTATUS_MPIE);
                status = (status & !MSTATUS_MPP) | (record.privilege.to_bits() << MSTATUS_MPP_SHIFT);
                if has_h {
                    status &= !(MSTATUS_MPV | MSTATUS_GVA);
                    if record.virt {
                        status |= MSTATUS_MPV;
                    }
                    if gva {
                        status |= MSTATUS_GVA;
                    }
                    csrs.set(MTVAL2, 0);
                    csrs.set(MTINST, 0);
                }
                csrs.set(MEPC, epc);
                csrs.set(MCAUSE, record.cause(xlen));
                csrs.set(MTVAL, record.tval());
                csrs.set(MSTATUS, status);
                self.state.pc = vector_target(csrs.get(MTVEC), interrupt, code);
                self.state.privilege = PrivilegeMode::Machine;
                self.state.virt = false;
            }
        }
        self.refresh_dispatch();
    }

    fn trap_target(&self, record: &TrapRecord) -> TrapTarget {
        let csrs = &self.state.csrs;
        let (deleg, hdeleg) = if record.trap.is_interrupt() {
            (csrs.get(MIDELEG), csrs.get(HIDELEG))
        } else {
            (csrs.get(MEDELEG), csrs.get(HEDELEG))
        };
        let bit = 1u64 << record.trap.cause();
        if record.privilege == PrivilegeMode::Machine || deleg & bit == 0 {
            TrapTarget::Machine
        } else if record.virt && hdeleg & bit != 0 {
            TrapTarget::VirtualSupervisor
        } else {
            TrapTarget::Hypervisor
        }
    }

    fn breakpoint_enters_debug(&self) -> bool {
        if self.options.debugger_attached {
            return true;
        }
        let dcsr = self.state.csrs.get(DCSR);
        let bit = match (self.state.privilege, self.state.virt) {
            (PrivilegeMode::Machine, _) => DCSR_EBREAKM,
            (PrivilegeMode::Supervisor, false) => DCSR_EBREAKS,
            (PrivilegeMode::User, false) => DCSR_EBREAKU,
            (PrivilegeMode::Supervisor, true) => DCSR_EBREAKVS,
            (PrivilegeMode::User, true) => DCSR_EBREAKVU,
        };
        self.state.csrs.contains(DCSR) && dcsr & bit != 0
    }

    /// Enters debug mode with `dcsr.cause = cause`, saving `pc` in `dpc`.
    pub fn enter_debug_mode(&mut self, cause: u64, pc: u64) {
        let csrs = &mut self.state.csrs;
        let mut dcsr = csrs.get(DCSR) & !(DCSR_CAUSE | DCSR_PRV | DCSR_V);
        dcsr |= (cause << DCSR_CAUSE_SHIFT) | self.state.privilege.to_bits();
        if self.state.virt {
            dcsr |= DCSR_V;
        }
        csrs.set(DCSR, dcsr);
        csrs.set(DPC, pc);
        tracing::info!(
            cause,
            dpc = format_args!("{pc:#x}"),
            from = self.state.privilege.name(self.state.virt),
            "entering debug mode"
        );
        self.state.privilege = PrivilegeMode::Machine;
        self.state.virt = false;
        self.state.debug_mode = true;
        self.state.pc = self.options.debug_entry;
        self.wfi = false;
        self.refresh_dispatch();
    }

    /// Halts the hart into debug mode at the current PC, as a debugger halt request would.
    pub fn request_halt(&mut self) {
        if !self.state.debug_mode {
            self.enter_debug_mode(debug::HALT_REQUEST, self.state.pc);
        }
    }

    /// The environment-call exception for the current privilege level.
    pub const fn environment_call(&self) -> Trap {
        match (self.state.privilege, self.state.virt) {
            (PrivilegeMode::User, _) => Trap::EnvironmentCallFromUMode,
            (PrivilegeMode::Supervisor, true) => Trap::EnvironmentCallFromVSMode,
            (PrivilegeMode::Supervisor, false) => Trap::EnvironmentCallFromSMode,
            (PrivilegeMode::Machine, _) => Trap::EnvironmentCallFromMMode,
        }
    }

    /// Returns from a machine-level trap; yields the new PC.
    ///
    /// # Errors
    ///
    /// Illegal-instruction outside M-mode.
    pub fn mret(&mut self, insn: Insn) -> Result<u64, Trap> {
        if self.state.privilege != PrivilegeMode::Machine {
            return Err(self.virtual_or_illegal(insn));
        }
        let status = self.state.csrs.get(MSTATUS);
        let previous = PrivilegeMode::from_bits((status & MSTATUS_MPP) >> MSTATUS_MPP_SHIFT)
            .unwrap_or(PrivilegeMode::Machine);
        let virt = status & MSTATUS_MPV != 0 && previous != PrivilegeMode::Machine;

        let mut status = unstack_interrupt_enable(status, MSTATUS_MIE, MSTATUS_MPIE);
        status = (status & !MSTATUS_MPP) | (self.least_privileged().to_bits() << MSTATUS_MPP_SHIFT);
        status &= !MSTATUS_MPV;
        if previous != PrivilegeMode::Machine {
            status &= !MSTATUS_MPRV;
        }
        self.state.csrs.set(MSTATUS, status);

        let target = self.read_csr(MEPC);
        tracing::trace!(to = previous.name(virt), target = format_args!("{target:#x}"), "mret");
        self.state.privilege = previous;
        self.state.virt = virt;
        self.refresh_dispatch();
        Ok(target)
    }

    /// Returns from a supervisor-level trap; yields the new PC.
    ///
    /// In VS-mode the return uses `vsstatus` and `vsepc`.
    ///
    /// # Errors
    ///
    /// Illegal-instruction in U-mode or when `mstatus.TSR` traps HS-mode;
    /// virtual-instruction in VU-mode or when `hstatus.VTSR` traps VS-mode.
    pub fn sret(&mut self, insn: Insn) -> Result<u64, Trap> {
        let privilege = self.state.privilege;
        let mstatus = self.state.csrs.get(MSTATUS);

        if self.state.virt {
            if privilege == PrivilegeMode::User
                || self.state.csrs.get(HSTATUS) & HSTATUS_VTSR != 0
            {
                return Err(Trap::VirtualInstruction(insn.bits()));
            }
            let status = self.state.csrs.get(VSSTATUS);
            let previous = if status & MSTATUS_SPP != 0 {
                PrivilegeMode::Supervisor
            } else {
                PrivilegeMode::User
            };
            let status = unstack_interrupt_enable(status, MSTATUS_SIE, MSTATUS_SPIE) & !MSTATUS_SPP;
            self.state.csrs.set(VSSTATUS, status);
            let target = self.read_csr(VSEPC);
            tracing::trace!(to = previous.name(true), target = format_args!("{target:#x}"), "sret");
            self.state.privilege = previous;
            self.refresh_dispatch();
            return Ok(target);
        }

        self.require(privilege >= PrivilegeMode::Supervisor, insn)?;
        self.require(
            !(privilege == PrivilegeMode::Supervisor && mstatus & MSTATUS_TSR != 0),
            insn,
        )?;

        let previous = if mstatus & MSTATUS_SPP != 0 {
            PrivilegeMode::Supervisor
        } else {
            PrivilegeMode::User
        };
        let status =
            unstack_interrupt_enable(mstatus, MSTATUS_SIE, MSTATUS_SPIE) & !MSTATUS_SPP & !MSTATUS_MPRV;
        self.state.csrs.set(MSTATUS, status);

        let hstatus = self.state.csrs.get(HSTATUS);
        let virt = self.isa().has("h") && hstatus & HSTATUS_SPV != 0;
        if self.isa().has("h") {
            self.state.csrs.set(HSTATUS, hstatus & !HSTATUS_SPV);
        }

        let target = self.read_csr(SEPC);
        tracing::trace!(to = previous.name(virt), target = format_args!("{target:#x}"), "sret");
        self.state.privilege = previous;
        self.state.virt = virt;
        self.refresh_dispatch();
        Ok(target)
    }

    /// Leaves debug mode; yields `dpc`.
    ///
    /// # Errors
    ///
    /// Illegal-instruction outside debug mode.
    pub fn dret(&mut self, insn: Insn) -> Result<u64, Trap> {
        self.require(self.state.debug_mode, insn)?;
        let dcsr = self.state.csrs.get(DCSR);
        let privilege = PrivilegeMode::from_bits(dcsr & DCSR_PRV).unwrap_or(PrivilegeMode::Machine);
        let virt = self.isa().has("h") && dcsr & DCSR_V != 0 && privilege != PrivilegeMode::Machine;
        if privilege != PrivilegeMode::Machine {
            let status = self.state.csrs.get(MSTATUS);
            self.state.csrs.set(MSTATUS, status & !MSTATUS_MPRV);
        }
        let target = self.read_csr(DPC);
        tracing::info!(to = privilege.name(virt), target = format_args!("{target:#x}"), "leaving debug mode");
        self.state.privilege = privilege;
        self.state.virt = virt;
        self.state.debug_mode = false;
        self.refresh_dispatch();
        Ok(target)
    }

    /// Applies the `wfi` trap rules and, when permitted, parks the hart.
    ///
    /// # Errors
    ///
    /// Virtual-instruction from VU-mode, or from VS-mode under `hstatus.VTW`;
    /// illegal-instruction below M-mode under `mstatus.TW`, and from U-mode
    /// when S-mode exists.
    pub fn wait_for_interrupt(&mut self, insn: Insn, pc: u64) -> Result<u64, Trap> {
        let privilege = self.state.privilege;
        let virt = self.state.virt;
        if virt && privilege == PrivilegeMode::User {
            return Err(Trap::VirtualInstruction(insn.bits()));
        } else if self.state.csrs.get(MSTATUS) & MSTATUS_TW != 0 {
            self.require(privilege == PrivilegeMode::Machine, insn)?;
        } else if virt {
            if self.state.csrs.get(HSTATUS) & HSTATUS_VTW != 0 {
                return Err(Trap::VirtualInstruction(insn.bits()));
            }
        } else if self.isa().has_supervisor() {
            self.require(privilege >= PrivilegeMode::Supervisor, insn)?;
        }
        if !self.state.debug_mode {
            self.wfi = true;
        }
        Ok(pc.wrapping_add(insn.len()))
    }

    /// The highest-priority interrupt that is both pending and enabled, if any.
    ///
    /// Candidates for M-mode are considered before those delegated to HS-mode,
    /// which come before those delegated on to VS-mode.
    pub fn pending_interrupt(&self) -> Option<Trap> {
        if self.state.debug_mode {
            return None;
        }
        let csrs = &self.state.csrs;
        let pending = csrs.get(MIP) & csrs.get(MIE);
        if pending == 0 {
            return None;
        }

        let privilege = self.state.privilege;
        let virt = self.state.virt;
        let mideleg = csrs.get(MIDELEG);
        let hideleg = csrs.get(HIDELEG);
        let mstatus = csrs.get(MSTATUS);

        let m_enabled = privilege < PrivilegeMode::Machine || mstatus & MSTATUS_MIE != 0;
        let hs_enabled = virt
            || privilege < PrivilegeMode::Supervisor
            || (privilege == PrivilegeMode::Supervisor && mstatus & MSTATUS_SIE != 0);
        let vs_enabled = virt
            && (privilege < PrivilegeMode::Supervisor
                || csrs.get(VSSTATUS) & MSTATUS_SIE != 0);

        let gate = |enabled: bool, bits: u64| if enabled { bits } else { 0 };
        let candidates = [
            gate(m_enabled, pending & !mideleg),
            gate(hs_enabled, pending & mideleg & !hideleg),
            gate(vs_enabled, pending & mideleg & hideleg),
        ];

        candidates
            .into_iter()
            .filter(|bits| *bits != 0)
            .find_map(|bits| {
                INTERRUPT_PRIORITY
                    .iter()
                    .find(|irq| bits & **irq != 0)
                    .and_then(|irq| irq_to_trap(*irq))
            })
    }
}
