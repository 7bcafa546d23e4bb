//! Functional RISC-V instruction-set simulator core.
//!
//! This crate executes RISC-V instruction words against one hart's architectural
//! state. It is organized as follows:
//! 1. **ISA:** Instruction words, field extraction, (mask, match) patterns and ISA strings.
//! 2. **Extensions:** Declarative descriptors bundling instructions, CSRs and an
//!    enable predicate, collected in an [`ExtensionRegistry`].
//! 3. **Dispatch:** A table built from the enabled extensions that maps a word to
//!    its handler, rejecting ambiguous encodings at build time.
//! 4. **Core:** Architectural state, handlers, the vector engine, the trap model and
//!    the execute loop.
//! 5. **Collaborators:** The [`Memory`](soc::Memory) and [`TraceSink`](soc::TraceSink)
//!    traits and a flat RAM implementation.
//!
//! # Examples
//!
//! ```
//! use rviss_core::soc::FlatMemory;
//! use rviss_core::{Config, Cpu, ExtensionRegistry};
//!
//! let config = Config::default();
//! let mut ram = FlatMemory::new(config.memory.ram_base, 0x1000);
//! // addi a0, zero, 42
//! ram.write_words(config.memory.ram_base, &[0x02a0_0513]);
//! let registry = ExtensionRegistry::standard().unwrap();
//! let mut cpu = Cpu::new(&config, registry, Box::new(ram)).unwrap();
//! let _ = cpu.step();
//! assert_eq!(cpu.x(10), 42);
//! ```

/// Common types and constants (registers, traps, errors).
pub mod common;
/// Core configuration (defaults, hierarchical config structures, JSON loading).
pub mod config;
/// CPU core (architectural state, handlers, units, trap model, execute loop).
pub mod core;
/// Dispatch table construction and lookup.
pub mod dispatch;
/// Extension descriptors, the registry and the builtin extension list.
pub mod ext;
/// Instruction set (words, fields, patterns, ISA strings, opcode constants).
pub mod isa;
/// External collaborators (memory, tracing).
pub mod soc;

/// Root configuration type; use `Config::default()` or load from JSON.
pub use crate::config::Config;
/// One hart; construct with `Cpu::new`.
pub use crate::core::Cpu;
/// Word-to-handler lookup built from enabled extensions.
pub use crate::dispatch::DispatchTable;
/// Extension descriptor types and the registry.
pub use crate::ext::{CsrDesc, Enablement, ExtensionDesc, ExtensionRegistry, Handler, InsnDesc};
/// Trap taxonomy and configuration-time errors.
pub use crate::common::error::{SimError, Trap};
/// Instruction word and encoding pattern.
pub use crate::isa::{Insn, Pattern};
