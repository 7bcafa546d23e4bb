//! RISC-V architectural state components.
//!
//! This module contains the storage side of the architecture. It includes:
//! 1. **CSRs:** Register addresses, field masks and the polymorphic CSR bank.
//! 2. **FPRs / GPRs / VRegs:** The floating-point, integer and vector register files.
//! 3. **Modes:** Privilege levels.
//! 4. **Traps:** Trap records and interrupt priority.
//! 5. **Vtype:** Vector configuration and context.

/// Control and Status Register (CSR) definitions and storage.
pub mod csr;

/// Floating-Point Register file implementation.
pub mod fpr;

/// General-Purpose Register file implementation.
pub mod gpr;

/// Privilege mode definitions.
pub mod mode;

/// Trap records and interrupt mapping.
pub mod trap;

/// Vector register file.
pub mod vreg;

/// Vector configuration and context.
pub mod vtype;
