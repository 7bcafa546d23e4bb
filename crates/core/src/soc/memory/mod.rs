//! Flat RAM.
//!
//! A bounds-checked, byte-addressed RAM mapped at a base address, implementing
//! the [`Memory`] collaborator without translation. It provides:
//! 1. **Storage:** A zero-initialised `Vec<u8>` accessed little-endian.
//! 2. **Reservations:** A single LR/SC reservation slot.
//! 3. **Fault Injection:** Addresses that fail with a chosen access fault, for
//!    exercising trap and resumption paths.

use std::collections::BTreeSet;

use crate::common::data::AccessType;
use crate::common::error::Trap;
use crate::soc::traits::{FlushScope, Memory};

/// Flat physical RAM.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlatMemory {
    base: u64,
    bytes: Vec<u8>,
    reservation: Option<u64>,
    faults: BTreeSet<u64>,
    tlb_flushes: u64,
}

impl FlatMemory {
    /// Creates `size` bytes of zeroed RAM at `base`.
    pub fn new(base: u64, size: usize) -> Self {
        Self {
            base,
            bytes: vec![0; size],
            reservation: None,
            faults: BTreeSet::new(),
            tlb_flushes: 0,
        }
    }

    /// Base address.
    pub const fn base(&self) -> u64 {
        self.base
    }

    /// Size in bytes.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Copies `data` into RAM at `addr`. Out-of-range bytes are dropped.
    pub fn write_bytes(&mut self, addr: u64, data: &[u8]) {
        for (i, b) in data.iter().enumerate() {
            if let Some(off) = self.offset(addr + i as u64, 1) {
                self.bytes[off] = *b;
            }
        }
    }

    /// Copies `len` bytes starting at `addr`; out-of-range bytes read as zero.
    pub fn read_bytes(&self, addr: u64, len: usize) -> Vec<u8> {
        (0..len)
            .map(|i| self.offset(addr + i as u64, 1).map_or(0, |off| self.bytes[off]))
            .collect()
    }

    /// Writes a sequence of 32-bit instruction words starting at `addr`.
    pub fn write_words(&mut self, addr: u64, words: &[u32]) {
        for (i, w) in words.iter().enumerate() {
            self.write_bytes(addr + 4 * i as u64, &w.to_le_bytes());
        }
    }

    /// Makes every access touching `addr` fail with an access fault.
    pub fn inject_fault(&mut self, addr: u64) {
        let _ = self.faults.insert(addr);
    }

    /// Removes every injected fault.
    pub fn clear_faults(&mut self) {
        self.faults.clear();
    }

    /// Number of `flush_tlb` calls observed.
    pub const fn tlb_flushes(&self) -> u64 {
        self.tlb_flushes
    }

    fn offset(&self, addr: u64, size: usize) -> Option<usize> {
        let off = addr.checked_sub(self.base)?;
        let end = off.checked_add(size as u64)?;
        (end <= self.bytes.len() as u64).then_some(off as usize)
    }

    fn check(&self, addr: u64, size: usize, kind: AccessType) -> Result<usize, Trap> {
        if self.faults.range(addr..addr.saturating_add(size as u64)).next().is_some() {
            return Err(kind.access_fault(addr));
        }
        self.offset(addr, size).ok_or(kind.access_fault(addr))
    }
}

impl Memory for FlatMemory {
    fn load(&mut self, addr: u64, size: usize, kind: AccessType) -> Result<u64, Trap> {
        let off = self.check(addr, size, kind)?;
        Ok(self.bytes[off..off + size]
            .iter()
            .rev()
            .fold(0u64, |acc, b| (acc << 8) | u64::from(*b)))
    }

    fn store(&mut self, addr: u64, size: usize, value: u64) -> Result<(), Trap> {
        let off = self.check(addr, size, AccessType::Write)?;
        for (i, b) in self.bytes[off..off + size].iter_mut().enumerate() {
            *b = (value >> (8 * i)) as u8;
        }
        if self
            .reservation
            .is_some_and(|r| r >> 3 == addr >> 3)
        {
            self.reservation = None;
        }
        Ok(())
    }

    fn reserve(&mut self, addr: u64) {
        self.reservation = Some(addr);
    }

    fn check_reservation(&self, addr: u64) -> bool {
        self.reservation == Some(addr)
    }

    fn yield_reservation(&mut self) {
        self.reservation = None;
    }

    fn flush_tlb(&mut self, scope: FlushScope) {
        let _ = scope;
        self.tlb_flushes += 1;
    }
}
