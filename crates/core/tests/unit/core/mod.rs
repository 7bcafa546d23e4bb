//! # Hart Tests

/// Atomic memory operations and reservations.
pub mod atomic;

/// Compressed instructions and `misa` toggling.
pub mod compressed;

/// CSR access rules and views.
pub mod csr;

/// Debug mode entry and exit.
pub mod debug;

/// The step and run loop.
pub mod execution;

/// Floating-point rounding and flags.
pub mod float;
