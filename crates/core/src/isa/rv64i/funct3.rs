//! `funct3` codes of the base integer ISA.

/// Load byte.
pub const LB: u32 = 0b000;
/// Load halfword.
pub const LH: u32 = 0b001;
/// Load word.
pub const LW: u32 = 0b010;
/// Load doubleword (RV64).
pub const LD: u32 = 0b011;
/// Load byte unsigned.
pub const LBU: u32 = 0b100;
/// Load halfword unsigned.
pub const LHU: u32 = 0b101;
/// Load word unsigned (RV64).
pub const LWU: u32 = 0b110;

/// Store byte.
pub const SB: u32 = 0b000;
/// Store halfword.
pub const SH: u32 = 0b001;
/// Store word.
pub const SW: u32 = 0b010;
/// Store doubleword (RV64).
pub const SD: u32 = 0b011;

/// Branch if equal.
pub const BEQ: u32 = 0b000;
/// Branch if not equal.
pub const BNE: u32 = 0b001;
/// Branch if less than.
pub const BLT: u32 = 0b100;
/// Branch if greater or equal.
pub const BGE: u32 = 0b101;
/// Branch if less than, unsigned.
pub const BLTU: u32 = 0b110;
/// Branch if greater or equal, unsigned.
pub const BGEU: u32 = 0b111;

/// ADD/SUB/ADDI (and MUL in the M space).
pub const ADD_SUB: u32 = 0b000;
/// Shift left logical.
pub const SLL: u32 = 0b001;
/// Set less than.
pub const SLT: u32 = 0b010;
/// Set less than, unsigned.
pub const SLTU: u32 = 0b011;
/// Exclusive or.
pub const XOR: u32 = 0b100;
/// Shift right logical/arithmetic.
pub const SRL_SRA: u32 = 0b101;
/// Or.
pub const OR: u32 = 0b110;
/// And.
pub const AND: u32 = 0b111;

/// FENCE.
pub const FENCE: u32 = 0b000;
/// FENCE.I.
pub const FENCE_I: u32 = 0b001;

/// Word-sized AMO.
pub const AMO_W: u32 = 0b010;
/// Doubleword-sized AMO.
pub const AMO_D: u32 = 0b011;

/// sh1add (Zba).
pub const SH1ADD: u32 = 0b010;
/// sh2add (Zba).
pub const SH2ADD: u32 = 0b100;
/// sh3add (Zba).
pub const SH3ADD: u32 = 0b110;
/// min (Zbb).
pub const MIN: u32 = 0b100;
/// minu (Zbb).
pub const MINU: u32 = 0b101;
/// max (Zbb).
pub const MAX: u32 = 0b110;
/// maxu (Zbb).
pub const MAXU: u32 = 0b111;
/// czero.eqz (Zicond).
pub const CZERO_EQZ: u32 = 0b101;
/// czero.nez (Zicond).
pub const CZERO_NEZ: u32 = 0b111;
