//! Major Opcodes.
//!
//! The seven-bit major opcode of every 32-bit encoding this core understands,
//! laid out as in the base-opcode map (`bits[6:0]`, with `bits[1:0] == 0b11`).

/// Integer loads (LB, LH, LW, LD, LBU, LHU, LWU).
pub const OP_LOAD: u32 = 0b000_0011;
/// Floating-point and vector loads.
pub const OP_LOAD_FP: u32 = 0b000_0111;
/// Custom-0 accelerator space.
pub const OP_CUSTOM_0: u32 = 0b000_1011;
/// FENCE, FENCE.I.
pub const OP_MISC_MEM: u32 = 0b000_1111;
/// Register-immediate arithmetic.
pub const OP_IMM: u32 = 0b001_0011;
/// Add upper immediate to PC.
pub const OP_AUIPC: u32 = 0b001_0111;
/// RV64 32-bit register-immediate arithmetic.
pub const OP_IMM_32: u32 = 0b001_1011;
/// Integer stores.
pub const OP_STORE: u32 = 0b010_0011;
/// Floating-point and vector stores.
pub const OP_STORE_FP: u32 = 0b010_0111;
/// Custom-1 accelerator space.
pub const OP_CUSTOM_1: u32 = 0b010_1011;
/// Atomic memory operations.
pub const OP_AMO: u32 = 0b010_1111;
/// Register-register arithmetic.
pub const OP_REG: u32 = 0b011_0011;
/// Load upper immediate.
pub const OP_LUI: u32 = 0b011_0111;
/// RV64 32-bit register-register arithmetic.
pub const OP_REG_32: u32 = 0b011_1011;
/// Fused multiply-add.
pub const OP_MADD: u32 = 0b100_0011;
/// Fused multiply-subtract.
pub const OP_MSUB: u32 = 0b100_0111;
/// Negated fused multiply-subtract.
pub const OP_NMSUB: u32 = 0b100_1011;
/// Negated fused multiply-add.
pub const OP_NMADD: u32 = 0b100_1111;
/// Floating-point arithmetic.
pub const OP_FP: u32 = 0b101_0011;
/// Vector arithmetic and configuration.
pub const OP_V: u32 = 0b101_0111;
/// Custom-2 accelerator space.
pub const OP_CUSTOM_2: u32 = 0b101_1011;
/// Conditional branches.
pub const OP_BRANCH: u32 = 0b110_0011;
/// Jump and link register.
pub const OP_JALR: u32 = 0b110_0111;
/// Jump and link.
pub const OP_JAL: u32 = 0b110_1111;
/// CSR access, ECALL, EBREAK, xRET, WFI, SFENCE.VMA.
pub const OP_SYSTEM: u32 = 0b111_0011;
/// Vector crypto (OP-VE).
pub const OP_VE: u32 = 0b111_0111;
/// Custom-3 accelerator space.
pub const OP_CUSTOM_3: u32 = 0b111_1011;
