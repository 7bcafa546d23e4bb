//! Compressed (C) Extension Encoding Constants.
//!
//! Compressed instructions are split into three quadrants by `bits[1:0]` and
//! then by `funct3` in `bits[15:13]`. Quadrant 3 is the 32-bit space.

/// Quadrant 0 (`bits[1:0] = 00`).
pub const QUADRANT_0: u32 = 0b00;
/// Quadrant 1 (`bits[1:0] = 01`).
pub const QUADRANT_1: u32 = 0b01;
/// Quadrant 2 (`bits[1:0] = 10`).
pub const QUADRANT_2: u32 = 0b10;

/// Quadrant 0 `funct3` codes.
pub mod q0 {
    /// C.ADDI4SPN.
    pub const C_ADDI4SPN: u32 = 0b000;
    /// C.FLD.
    pub const C_FLD: u32 = 0b001;
    /// C.LW.
    pub const C_LW: u32 = 0b010;
    /// C.LD on RV64, C.FLW on RV32.
    pub const C_LD: u32 = 0b011;
    /// C.FSD.
    pub const C_FSD: u32 = 0b101;
    /// C.SW.
    pub const C_SW: u32 = 0b110;
    /// C.SD on RV64, C.FSW on RV32.
    pub const C_SD: u32 = 0b111;
}

/// Quadrant 1 `funct3` codes.
pub mod q1 {
    /// C.ADDI (C.NOP when rd = 0).
    pub const C_ADDI: u32 = 0b000;
    /// C.ADDIW on RV64, C.JAL on RV32.
    pub const C_ADDIW: u32 = 0b001;
    /// C.LI.
    pub const C_LI: u32 = 0b010;
    /// C.LUI, or C.ADDI16SP when rd = x2.
    pub const C_LUI_ADDI16SP: u32 = 0b011;
    /// C.SRLI, C.SRAI, C.ANDI and the CA-form arithmetic.
    pub const C_MISC_ALU: u32 = 0b100;
    /// C.J.
    pub const C_J: u32 = 0b101;
    /// C.BEQZ.
    pub const C_BEQZ: u32 = 0b110;
    /// C.BNEZ.
    pub const C_BNEZ: u32 = 0b111;
}

/// Quadrant 2 `funct3` codes.
pub mod q2 {
    /// C.SLLI.
    pub const C_SLLI: u32 = 0b000;
    /// C.FLDSP.
    pub const C_FLDSP: u32 = 0b001;
    /// C.LWSP.
    pub const C_LWSP: u32 = 0b010;
    /// C.LDSP on RV64.
    pub const C_LDSP: u32 = 0b011;
    /// C.JR, C.MV, C.EBREAK, C.JALR, C.ADD.
    pub const C_MISC_ALU: u32 = 0b100;
    /// C.FSDSP.
    pub const C_FSDSP: u32 = 0b101;
    /// C.SWSP.
    pub const C_SWSP: u32 = 0b110;
    /// C.SDSP on RV64.
    pub const C_SDSP: u32 = 0b111;
}
