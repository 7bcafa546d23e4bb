//! Memory Access Types.
//!
//! This module defines the classification of memory accesses used throughout the core.
//! These types are used for the following:
//! 1. **Fault Generation:** Choosing the misaligned, access-fault or page-fault trap for an access.
//! 2. **Tracing:** Describing each access to the [`TraceSink`](crate::soc::TraceSink).

use crate::common::error::Trap;

/// Type of memory access operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessType {
    /// Instruction fetch.
    Fetch,

    /// Data read (loads, the read half of AMOs, LR).
    Read,

    /// Data write (stores, the write half of AMOs, SC).
    Write,
}

impl AccessType {
    /// Misaligned-address trap for this access kind.
    pub const fn misaligned(self, addr: u64) -> Trap {
        match self {
            Self::Fetch => Trap::InstructionAddressMisaligned(addr),
            Self::Read => Trap::LoadAddressMisaligned(addr),
            Self::Write => Trap::StoreAddressMisaligned(addr),
        }
    }

    /// Access-fault trap for this access kind.
    pub const fn access_fault(self, addr: u64) -> Trap {
        match self {
            Self::Fetch => Trap::InstructionAccessFault(addr),
            Self::Read => Trap::LoadAccessFault(addr),
            Self::Write => Trap::StoreAccessFault(addr),
        }
    }
}

/// One completed memory access, as reported to the trace collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemAccess {
    /// Virtual address.
    pub addr: u64,
    /// Size in bytes.
    pub size: usize,
    /// Direction.
    pub kind: AccessType,
    /// Value read or written (zero-extended).
    pub value: u64,
}
