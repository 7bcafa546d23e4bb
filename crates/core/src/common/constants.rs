//! Global Constants.
//!
//! This module defines constants shared across the core. It includes:
//! 1. **Instruction Constants:** Encoded sizes.
//! 2. **Vector Limits:** Legal VLEN and ELEN values.
//! 3. **Debug Constants:** Default debug-mode entry points.
//! 4. **Memory Defaults:** Default RAM placement.

/// Size of a compressed (16-bit) instruction in bytes.
pub const INSTRUCTION_SIZE_16: u64 = 2;

/// Size of a standard (32-bit) instruction in bytes.
pub const INSTRUCTION_SIZE_32: u64 = 4;

/// Smallest supported VLEN in bits.
pub const MIN_VLEN: usize = 64;

/// Largest supported VLEN in bits.
pub const MAX_VLEN: usize = 65_536;

/// Default VLEN in bits.
pub const DEFAULT_VLEN: usize = 128;

/// Default ELEN in bits.
pub const DEFAULT_ELEN: u32 = 64;

/// Debug-mode entry address (start of the debug ROM).
pub const DEBUG_ROM_ENTRY: u64 = 0x800;

/// Address taken by exceptions raised while in debug mode.
pub const DEBUG_ROM_TVEC: u64 = 0x808;

/// Default RAM base address.
pub const DEFAULT_RAM_BASE: u64 = 0x8000_0000;

/// Default RAM size in bytes (16 MiB).
pub const DEFAULT_RAM_SIZE: u64 = 16 * 1024 * 1024;
