//! Collaborator traits.
//!
//! The core never owns memory or a debug transport; it talks to them through
//! the traits defined here:
//! 1. **Memory:** Loads, stores, compare-and-swap, LR/SC reservations and TLB flushes.
//!    Faults come back as [`Trap`] values from the shared taxonomy.
//! 2. **TraceSink:** Notification of retired instructions, traps, memory accesses and
//!    translation-affecting events. Every method has a no-op default.

use crate::common::data::{AccessType, MemAccess};
use crate::common::error::Trap;
use crate::isa::Insn;

/// Which translations an `sfence.vma`/`hfence.*` invalidates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlushScope {
    /// Only translations of this virtual address, or all when `None`.
    pub addr: Option<u64>,
    /// Only translations of this ASID (VMID for guest flushes), or all when `None`.
    pub space_id: Option<u64>,
    /// Flush G-stage (guest-physical) translations.
    pub guest: bool,
}

/// Memory and address-translation collaborator.
///
/// Addresses are virtual; translation and physical-memory checks are the
/// implementor's concern. `size` is 1, 2, 4 or 8 bytes.
pub trait Memory {
    /// Loads `size` bytes at `addr`, zero-extended.
    fn load(&mut self, addr: u64, size: usize, kind: AccessType) -> Result<u64, Trap>;

    /// Stores the low `size` bytes of `value` at `addr`.
    fn store(&mut self, addr: u64, size: usize, value: u64) -> Result<(), Trap>;

    /// Stores `new` when memory holds `expected`; returns the old value either way.
    ///
    /// A load fault is reported as the store/AMO equivalent.
    fn compare_and_swap(
        &mut self,
        addr: u64,
        size: usize,
        expected: u64,
        new: u64,
    ) -> Result<u64, Trap> {
        let old = self
            .load(addr, size, AccessType::Read)
            .map_err(|trap| match trap {
                Trap::LoadAccessFault(a) => Trap::StoreAccessFault(a),
                Trap::LoadPageFault(a) => Trap::StorePageFault(a),
                Trap::LoadAddressMisaligned(a) => Trap::StoreAddressMisaligned(a),
                Trap::LoadGuestPageFault(a) => Trap::StoreGuestPageFault(a),
                other => other,
            })?;
        if old == expected {
            self.store(addr, size, new)?;
        }
        Ok(old)
    }

    /// Places a reservation on `addr` (LR).
    fn reserve(&mut self, addr: u64);

    /// Returns `true` when a reservation covering `addr` is held (SC).
    fn check_reservation(&self, addr: u64) -> bool;

    /// Drops any held reservation.
    fn yield_reservation(&mut self);

    /// Invalidates cached translations.
    fn flush_tlb(&mut self, scope: FlushScope) {
        let _ = scope;
    }
}

/// Observer of architecturally visible events.
pub trait TraceSink {
    /// An instruction at `pc` retired.
    fn retired(&mut self, pc: u64, insn: Insn) {
        let _ = (pc, insn);
    }

    /// A trap was taken at `pc`.
    fn trap(&mut self, pc: u64, trap: Trap) {
        let _ = (pc, trap);
    }

    /// A data access completed.
    fn mem_access(&mut self, access: MemAccess) {
        let _ = access;
    }

    /// `fence.i` executed.
    fn fence_i(&mut self) {}

    /// `sfence.vma` or an `hfence` executed.
    fn sfence_vma(&mut self, scope: FlushScope) {
        let _ = scope;
    }

    /// `satp` (or `vsatp`/`hgatp`) was written.
    fn satp_write(&mut self, value: u64) {
        let _ = value;
    }
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl TraceSink for NullSink {}

/// Forwards every event to `tracing` at `trace` level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn retired(&mut self, pc: u64, insn: Insn) {
        tracing::trace!(pc = format_args!("{pc:#x}"), bits = format_args!("{:#x}", insn.bits()), "retire");
    }

    fn trap(&mut self, pc: u64, trap: Trap) {
        tracing::trace!(pc = format_args!("{pc:#x}"), %trap, "trap");
    }

    fn mem_access(&mut self, access: MemAccess) {
        tracing::trace!(
            addr = format_args!("{:#x}", access.addr),
            size = access.size,
            kind = ?access.kind,
            value = format_args!("{:#x}", access.value),
            "mem"
        );
    }

    fn fence_i(&mut self) {
        tracing::trace!("fence.i");
    }

    fn sfence_vma(&mut self, scope: FlushScope) {
        tracing::trace!(?scope, "sfence.vma");
    }

    fn satp_write(&mut self, value: u64) {
        tracing::trace!(satp = format_args!("{value:#x}"), "satp write");
    }
}
