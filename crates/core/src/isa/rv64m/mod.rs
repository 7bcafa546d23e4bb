//! Integer Multiply/Divide (M) function codes.
//!
//! All M instructions use OP / OP-32 with `funct7 = 0000001`; `funct3`
//! selects the operation.

/// Low product.
pub const MUL: u32 = 0b000;
/// High product, signed × signed.
pub const MULH: u32 = 0b001;
/// High product, signed × unsigned.
pub const MULHSU: u32 = 0b010;
/// High product, unsigned × unsigned.
pub const MULHU: u32 = 0b011;
/// Signed division.
pub const DIV: u32 = 0b100;
/// Unsigned division.
pub const DIVU: u32 = 0b101;
/// Signed remainder.
pub const REM: u32 = 0b110;
/// Unsigned remainder.
pub const REMU: u32 = 0b111;
