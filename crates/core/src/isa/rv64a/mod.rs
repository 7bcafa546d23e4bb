//! Atomic (A) function codes (`funct5`, `bits[31:27]`).

/// Load-reserved.
pub const LR: u32 = 0b00010;
/// Store-conditional.
pub const SC: u32 = 0b00011;
/// Atomic swap.
pub const AMOSWAP: u32 = 0b00001;
/// Atomic add.
pub const AMOADD: u32 = 0b00000;
/// Atomic xor.
pub const AMOXOR: u32 = 0b00100;
/// Atomic and.
pub const AMOAND: u32 = 0b01100;
/// Atomic or.
pub const AMOOR: u32 = 0b01000;
/// Atomic signed minimum.
pub const AMOMIN: u32 = 0b10000;
/// Atomic signed maximum.
pub const AMOMAX: u32 = 0b10100;
/// Atomic unsigned minimum.
pub const AMOMINU: u32 = 0b11000;
/// Atomic unsigned maximum.
pub const AMOMAXU: u32 = 0b11100;
