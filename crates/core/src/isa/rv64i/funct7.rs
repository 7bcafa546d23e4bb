//! `funct7` codes of the base integer ISA and its bit-manipulation neighbours.

/// Plain ADD, SRL, SLL, etc.
pub const DEFAULT: u32 = 0b000_0000;
/// SUB and SRA.
pub const SUB_SRA: u32 = 0b010_0000;
/// Integer multiply/divide (M).
pub const MULDIV: u32 = 0b000_0001;
/// Zba shift-and-add and `add.uw`.
pub const ZBA: u32 = 0b001_0000;
/// Zba `add.uw` (OP-32).
pub const ADD_UW: u32 = 0b000_0100;
/// Zbb `andn`, `orn`, `xnor`.
pub const ZBB_NEGATED: u32 = 0b010_0000;
/// Zbb min/max.
pub const ZBB_MINMAX: u32 = 0b000_0101;
/// Zbb rotates.
pub const ZBB_ROTATE: u32 = 0b011_0000;
/// Zbb `zext.h` (OP-32 on RV64, OP on RV32).
pub const ZBB_ZEXT_H: u32 = 0b000_0100;
/// Zicond.
pub const CZERO: u32 = 0b000_0111;

/// RV64 immediate shift `funct6` for SLLI/SRLI.
pub const SHIFT_LOGICAL: u32 = 0b00_0000;
/// RV64 immediate shift `funct6` for SRAI.
pub const SHIFT_ARITH: u32 = 0b01_0000;
/// Zba `slli.uw` `funct6`.
pub const SLLI_UW: u32 = 0b00_0010;
/// Zbb `rori` `funct6`.
pub const RORI: u32 = 0b01_1000;
