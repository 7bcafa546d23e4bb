//! Privileged Architecture Definitions.
//!
//! Trap cause codes and the encodings of the SYSTEM instructions. CSR
//! addresses live with the CSR bank in [`crate::core::arch::csr`].

/// Exception, interrupt and debug cause codes.
pub mod cause;

/// SYSTEM instruction encodings and Zicsr `funct3` codes.
pub mod opcodes;
