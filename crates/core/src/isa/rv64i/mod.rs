//! Base Integer ISA (RV32I/RV64I) function codes.
//!
//! The bit-manipulation subsets (Zba, Zbb) and Zicond share the base opcodes
//! and are distinguished only by `funct7`, so their codes live here as well.

/// `funct3` codes for loads, stores, branches and ALU operations.
pub mod funct3;

/// `funct7` / `funct6` codes for register-register and shift operations.
pub mod funct7;
