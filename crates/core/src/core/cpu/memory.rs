//! Memory Access Helpers.
//!
//! This module provides the interface between instruction handlers and the memory
//! collaborator. It performs the following:
//! 1. **Fetch:** Reads one instruction, 16 bits at a time, checking PC alignment.
//! 2. **Loads and Stores:** XLEN-relative address wrapping and trace reporting.
//! 3. **Atomics:** Alignment-checked read-modify-write, LR and SC.

use super::Cpu;
use crate::common::data::{AccessType, MemAccess};
use crate::common::error::Trap;
use crate::isa::Insn;

/// Reports a load-side fault of an AMO as its store/AMO equivalent.
const fn as_store_fault(trap: Trap) -> Trap {
    match trap {
        Trap::LoadAccessFault(a) => Trap::StoreAccessFault(a),
        Trap::LoadPageFault(a) => Trap::StorePageFault(a),
        Trap::LoadAddressMisaligned(a) => Trap::StoreAddressMisaligned(a),
        Trap::LoadGuestPageFault(a) => Trap::StoreGuestPageFault(a),
        other => other,
    }
}

impl Cpu {
    /// Fetches the instruction at `pc`.
    ///
    /// # Errors
    ///
    /// Instruction-address-misaligned when `pc` is not 2-byte aligned (4-byte
    /// without C), otherwise whatever the memory collaborator reports.
    pub fn fetch(&mut self, pc: u64) -> Result<Insn, Trap> {
        let align = if self.enabled().contains("c") { 2 } else { 4 };
        if pc % align != 0 {
            return Err(Trap::InstructionAddressMisaligned(pc));
        }
        let low = self.memory.load(pc, 2, AccessType::Fetch)?;
        if low & 0b11 != 0b11 {
            return Ok(Insn::new(low));
        }
        let high = self
            .memory
            .load(pc.wrapping_add(2), 2, AccessType::Fetch)?;
        Ok(Insn::new((high << 16) | low))
    }

    /// Loads `size` bytes, zero-extended.
    ///
    /// # Errors
    ///
    /// Faults reported by the memory collaborator.
    pub fn load(&mut self, addr: u64, size: usize) -> Result<u64, Trap> {
        let addr = self.xlen().zext(addr);
        let value = self.memory.load(addr, size, AccessType::Read)?;
        self.tracer.mem_access(MemAccess {
            addr,
            size,
            kind: AccessType::Read,
            value,
        });
        Ok(value)
    }

    /// Loads `size` bytes, sign-extended to 64 bits.
    ///
    /// # Errors
    ///
    /// As [`Cpu::load`].
    pub fn load_signed(&mut self, addr: u64, size: usize) -> Result<u64, Trap> {
        let value = self.load(addr, size)?;
        let shift = 64 - 8 * size as u32;
        Ok((((value << shift) as i64) >> shift) as u64)
    }

    /// Stores the low `size` bytes of `value`.
    ///
    /// # Errors
    ///
    /// Faults reported by the memory collaborator.
    pub fn store(&mut self, addr: u64, size: usize, value: u64) -> Result<(), Trap> {
        let addr = self.xlen().zext(addr);
        self.memory.store(addr, size, value)?;
        self.tracer.mem_access(MemAccess {
            addr,
            size,
            kind: AccessType::Write,
            value,
        });
        Ok(())
    }

    fn check_atomic_alignment(addr: u64, size: usize, kind: AccessType) -> Result<(), Trap> {
        if addr % size as u64 != 0 {
            return Err(kind.misaligned(addr));
        }
        Ok(())
    }

    /// Atomically replaces the `size`-byte value at `addr` with `op(old)`; returns `old`.
    ///
    /// # Errors
    ///
    /// Store/AMO misaligned for unaligned addresses; any fault is reported as a
    /// store/AMO fault and leaves memory unchanged.
    pub fn amo(&mut self, addr: u64, size: usize, op: impl FnOnce(u64) -> u64) -> Result<u64, Trap> {
        let addr = self.xlen().zext(addr);
        Self::check_atomic_alignment(addr, size, AccessType::Write)?;
        let old = self
            .memory
            .load(addr, size, AccessType::Read)
            .map_err(as_store_fault)?;
        let new = op(old);
        let _ = self
            .memory
            .compare_and_swap(addr, size, old, new)
            .map_err(as_store_fault)?;
        self.tracer.mem_access(MemAccess {
            addr,
            size,
            kind: AccessType::Write,
            value: new,
        });
        Ok(old)
    }

    /// Load-reserved.
    ///
    /// # Errors
    ///
    /// Load-address-misaligned for unaligned addresses, or load faults.
    pub fn load_reserved(&mut self, addr: u64, size: usize) -> Result<u64, Trap> {
        let addr = self.xlen().zext(addr);
        Self::check_atomic_alignment(addr, size, AccessType::Read)?;
        let value = self.load(addr, size)?;
        self.memory.reserve(addr);
        Ok(value)
    }

    /// Store-conditional; returns `true` when the store happened.
    ///
    /// The reservation is released either way.
    ///
    /// # Errors
    ///
    /// Store-address-misaligned for unaligned addresses, or store faults.
    pub fn store_conditional(&mut self, addr: u64, size: usize, value: u64) -> Result<bool, Trap> {
        let addr = self.xlen().zext(addr);
        Self::check_atomic_alignment(addr, size, AccessType::Write)?;
        if !self.memory.check_reservation(addr) {
            self.memory.yield_reservation();
            return Ok(false);
        }
        self.store(addr, size, value)?;
        self.memory.yield_reservation();
        Ok(true)
    }
}
