//! Execution units and functional components.
//!
//! Pure building blocks the instruction handlers compose: integer and
//! bit-manipulation arithmetic, IEEE 754 arithmetic, atomic read-modify-write
//! operations, the vector loop templates and the crypto round functions.

/// Arithmetic Logic Unit for integer and bit-manipulation operations.
pub mod alu;

/// AES, GHASH and SHA-256 primitives for the vector crypto extensions.
pub mod crypto;

/// Floating-Point Unit for IEEE 754 operations.
pub mod fpu;

/// Load/Store Unit helpers for atomic memory operations.
pub mod lsu;

/// Vector loop templates and fixed-point arithmetic.
pub mod vector;
