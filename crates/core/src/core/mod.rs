//! Core processor implementation.
//!
//! This module contains the hart: architectural state storage, the CPU with
//! its trap model and execute loop, the instruction handlers the dispatch
//! table points at, and the execution units those handlers call.

/// Architecture-specific components (CSRs, register files, privilege modes, traps).
pub mod arch;

/// CPU core implementation and execution orchestration.
pub mod cpu;

/// Instruction handlers, grouped by extension.
pub mod exec;

/// Execution units (ALU, FPU, atomics, vector templates, crypto).
pub mod units;

pub use self::cpu::Cpu;
