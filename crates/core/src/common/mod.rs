//! Common utilities and types used throughout the simulator core.
//!
//! This module provides building blocks shared by every component:
//! 1. **Constants:** Instruction sizes, vector limits and debug addresses.
//! 2. **Memory Access:** Classification of memory operations (Fetch/Read/Write).
//! 3. **Error Handling:** The trap taxonomy and configuration-time errors.
//! 4. **Register Management:** The aggregate integer, floating-point and vector register files.

/// Common constants used throughout the core.
pub mod constants;

/// Memory access type definitions.
pub mod data;

/// Error types and trap definitions.
pub mod error;

/// Register file aggregate.
pub mod reg;

pub use data::{AccessType, MemAccess};
pub use error::{ConfigError, DispatchError, IsaError, RegistryError, SimError, Trap};
pub use reg::RegisterFile;
