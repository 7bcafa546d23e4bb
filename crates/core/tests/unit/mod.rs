//! # Unit Components
//!
//! Tests grouped by the component they exercise.

/// Configuration loading and validation.
pub mod config;

/// Hart state, trap model, CSR access and the execute loop.
pub mod core;

/// Dispatch table construction and lookup.
pub mod dispatch;

/// Extension descriptors and the registry.
pub mod ext;

/// Instruction decoding, patterns and ISA strings.
pub mod isa;
