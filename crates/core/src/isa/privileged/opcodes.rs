//! System Instruction Encodings.
//!
//! Exact encodings of the fixed SYSTEM instructions and the `funct3` codes of
//! the Zicsr family. All of them live under the SYSTEM major opcode.

/// Environment call.
pub const ECALL: u32 = 0x0000_0073;
/// Environment break.
pub const EBREAK: u32 = 0x0010_0073;
/// Return from an S-mode trap handler.
pub const SRET: u32 = 0x1020_0073;
/// Return from an M-mode trap handler.
pub const MRET: u32 = 0x3020_0073;
/// Return from debug mode.
pub const DRET: u32 = 0x7b20_0073;
/// Wait for interrupt.
pub const WFI: u32 = 0x1050_0073;

/// SFENCE.VMA: `funct7 = 0001001`, rd = 0, funct3 = 0.
pub const SFENCE_VMA_FUNCT7: u32 = 0b000_1001;
/// HFENCE.VVMA: `funct7 = 0010001`.
pub const HFENCE_VVMA_FUNCT7: u32 = 0b001_0001;
/// HFENCE.GVMA: `funct7 = 0110001`.
pub const HFENCE_GVMA_FUNCT7: u32 = 0b011_0001;

/// CSRRW.
pub const CSRRW: u32 = 0b001;
/// CSRRS.
pub const CSRRS: u32 = 0b010;
/// CSRRC.
pub const CSRRC: u32 = 0b011;
/// CSRRWI.
pub const CSRRWI: u32 = 0b101;
/// CSRRSI.
pub const CSRRSI: u32 = 0b110;
/// CSRRCI.
pub const CSRRCI: u32 = 0b111;
