//! Load/Store Unit (LSU).
//!
//! Memory-side arithmetic for the A extension. The accesses themselves go
//! through [`Cpu::amo`](crate::core::Cpu::amo), which checks alignment and
//! talks to the memory collaborator.
//! - [`atomic`]: Read-modify-write ALU for AMOs.

/// Atomic memory operation ALU.
pub mod atomic;

pub use atomic::AmoOp;
