//! Instruction Set Architecture (ISA) Definitions.
//!
//! Everything needed to turn raw bits into something a handler can use:
//! the instruction word and its field accessors, the shape classifier, the
//! (mask, match) patterns used by dispatch tables, the ISA string parser,
//! and the opcode and function-code constants, organized by extension.
//!
//! # Extensions
//!
//! * `rv64i`: Base integer ISA plus the Zba, Zbb and Zicond codes sharing its opcodes.
//! * `rv64m`: Integer multiplication and division.
//! * `rv64a`: Atomic memory operations.
//! * `rvf`: Single- and double-precision floating point.
//! * `rvc`: Compressed instructions.
//! * `rvv`: Vector and vector-crypto instructions.
//! * `privileged`: Trap causes and SYSTEM instructions.

/// Instruction shape classification and operand extraction.
pub mod decode;

/// The instruction word and its bit-field accessors.
pub mod instruction;

/// ISA string and privilege-level parsing.
pub mod isa_string;

/// Major opcodes.
pub mod opcodes;

/// (mask, match) encoding patterns.
pub mod pattern;

/// Privileged architecture definitions (trap causes, system instructions).
pub mod privileged;

/// Atomic memory operation function codes.
pub mod rv64a;

/// Base integer function codes.
pub mod rv64i;

/// Multiply/divide function codes.
pub mod rv64m;

/// Compressed instruction quadrants and function codes.
pub mod rvc;

/// Floating-point function codes.
pub mod rvf;

/// Vector function codes.
pub mod rvv;

pub use decode::{Decoded, Operands, Shape, decode};
pub use instruction::{Insn, InsnLength};
pub use isa_string::{IsaProfile, Xlen};
pub use pattern::Pattern;
