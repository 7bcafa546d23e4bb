//! Trap Records and Interrupt Mapping.
//!
//! This module provides the transient data the trap model consumes:
//! 1. **Trap Records:** A trap together with the context it was raised in.
//! 2. **Interrupt Mapping:** Conversion between `mip` bits and interrupt traps, in priority order.

use crate::common::error::Trap;
use crate::core::arch::csr;
use crate::core::arch::mode::PrivilegeMode;
use crate::isa::Xlen;
use crate::isa::privileged::cause::INTERRUPT_BIT;

/// Interrupt bits in the order they are taken when several are pending.
pub const INTERRUPT_PRIORITY: [u64; 9] = [
    csr::MIP_MEIP,
    csr::MIP_MSIP,
    csr::MIP_MTIP,
    csr::MIP_SEIP,
    csr::MIP_SSIP,
    csr::MIP_STIP,
    csr::MIP_VSEIP,
    csr::MIP_VSSIP,
    csr::MIP_VSTIP,
];

/// A trap together with the context it was raised in.
///
/// Built by the trap model immediately before entry and then discarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrapRecord {
    /// The trap being taken.
    pub trap: Trap,
    /// PC of the faulting instruction, or of the next instruction for interrupts.
    pub epc: u64,
    /// Privilege level at the time of the trap.
    pub privilege: PrivilegeMode,
    /// Virtualization mode at the time of the trap.
    pub virt: bool,
}

impl TrapRecord {
    /// Value written to `xcause`, including the interrupt bit at `xlen - 1`.
    pub const fn cause(&self, xlen: Xlen) -> u64 {
        if self.trap.is_interrupt() {
            (INTERRUPT_BIT >> (64 - xlen.bits())) | self.trap.cause()
        } else {
            self.trap.cause()
        }
    }

    /// Value written to `xtval`.
    pub const fn tval(&self) -> u64 {
        self.trap.tval()
    }
}

/// Converts an interrupt pending bit to its trap, or `None` for unknown bits.
pub const fn irq_to_trap(bit: u64) -> Option<Trap> {
    match bit {
        csr::MIP_SSIP => Some(Trap::SupervisorSoftwareInterrupt),
        csr::MIP_MSIP => Some(Trap::MachineSoftwareInterrupt),
        csr::MIP_STIP => Some(Trap::SupervisorTimerInterrupt),
        csr::MIP_MTIP => Some(Trap::MachineTimerInterrupt),
        csr::MIP_SEIP => Some(Trap::SupervisorExternalInterrupt),
        csr::MIP_MEIP => Some(Trap::MachineExternalInterrupt),
        csr::MIP_VSSIP => Some(Trap::VirtualSupervisorSoftwareInterrupt),
        csr::MIP_VSTIP => Some(Trap::VirtualSupervisorTimerInterrupt),
        csr::MIP_VSEIP => Some(Trap::VirtualSupervisorExternalInterrupt),
        _ => None,
    }
}
