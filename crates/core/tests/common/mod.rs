//! Shared test infrastructure.

/// Instruction encoders.
pub mod builder;

/// A `TestContext` owning a hart and a handle to its RAM.
pub mod harness;

/// Mock collaborators.
pub mod mocks;
