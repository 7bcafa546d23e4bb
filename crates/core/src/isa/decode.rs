//! RISC-V Instruction Decoder.
//!
//! Classifies an instruction word into an encoding [`Shape`] and extracts the
//! operand set that shape defines. The decoder is total: every word yields a
//! [`Decoded`] value, and words that fit no known shape are classified as
//! [`Shape::Unknown`]. Legality is decided later by the dispatch table and the
//! handler preconditions.

use super::instruction::{Insn, InsnLength};
use super::opcodes;
use super::rvc::{QUADRANT_0, QUADRANT_1, QUADRANT_2};

/// Encoding shape of an instruction word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Compressed register form (`c.add`, `c.mv`, `c.jr`).
    Cr,
    /// Compressed immediate form (`c.addi`, `c.li`, `c.lwsp`).
    Ci,
    /// Compressed stack-relative store (`c.swsp`).
    Css,
    /// Compressed wide immediate (`c.addi4spn`).
    Ciw,
    /// Compressed load (`c.lw`).
    Cl,
    /// Compressed store (`c.sw`).
    Cs,
    /// Compressed arithmetic (`c.sub`, `c.and`).
    Ca,
    /// Compressed branch / immediate ALU (`c.beqz`, `c.andi`).
    Cb,
    /// Compressed jump (`c.j`).
    Cj,
    /// Register-register.
    R,
    /// Four-register fused multiply-add.
    R4,
    /// Register-immediate, loads, `jalr`, system.
    I,
    /// Store.
    S,
    /// Conditional branch.
    B,
    /// Upper immediate.
    U,
    /// Jump and link.
    J,
    /// Vector arithmetic (OP-V, `funct3 != 0b111`).
    VArith,
    /// Vector configuration (`vsetvli`, `vsetivli`, `vsetvl`).
    VConfig,
    /// Vector load (LOAD-FP with a vector width code).
    VLoad,
    /// Vector store (STORE-FP with a vector width code).
    VStore,
    /// Custom-accelerator space (custom-0..3), R-type layout.
    Custom,
    /// Does not fit any known shape.
    Unknown,
}

impl Shape {
    /// Selects the shape from the length-determining bits and the major opcode.
    pub const fn classify(insn: Insn) -> Self {
        match insn.length() {
            InsnLength::Compressed => Self::classify_compressed(insn),
            InsnLength::Standard => Self::classify_standard(insn),
            _ => Self::Unknown,
        }
    }

    const fn classify_compressed(insn: Insn) -> Self {
        let funct3 = insn.rvc_funct3();
        match insn.rvc_opcode() {
            QUADRANT_0 => match funct3 {
                0b000 => Self::Ciw,
                0b001..=0b011 => Self::Cl,
                0b101..=0b111 => Self::Cs,
                _ => Self::Unknown,
            },
            QUADRANT_1 => match funct3 {
                0b000..=0b011 => Self::Ci,
                0b100 if (insn.bits() >> 10) & 0b11 == 0b11 => Self::Ca,
                0b100 | 0b110 | 0b111 => Self::Cb,
                _ => Self::Cj,
            },
            QUADRANT_2 => match funct3 {
                0b000..=0b011 => Self::Ci,
                0b100 => Self::Cr,
                _ => Self::Css,
            },
            _ => Self::Unknown,
        }
    }

    const fn classify_standard(insn: Insn) -> Self {
        match insn.opcode() {
            opcodes::OP_LOAD_FP if is_vector_width(insn.v_width()) => Self::VLoad,
            opcodes::OP_STORE_FP if is_vector_width(insn.v_width()) => Self::VStore,
            opcodes::OP_LOAD
            | opcodes::OP_LOAD_FP
            | opcodes::OP_MISC_MEM
            | opcodes::OP_IMM
            | opcodes::OP_IMM_32
            | opcodes::OP_JALR
            | opcodes::OP_SYSTEM => Self::I,
            opcodes::OP_AUIPC | opcodes::OP_LUI => Self::U,
            opcodes::OP_STORE | opcodes::OP_STORE_FP => Self::S,
            opcodes::OP_AMO | opcodes::OP_REG | opcodes::OP_REG_32 | opcodes::OP_FP => Self::R,
            opcodes::OP_MADD | opcodes::OP_MSUB | opcodes::OP_NMSUB | opcodes::OP_NMADD => {
                Self::R4
            }
            opcodes::OP_BRANCH => Self::B,
            opcodes::OP_JAL => Self::J,
            opcodes::OP_V if insn.funct3() == 0b111 => Self::VConfig,
            opcodes::OP_V | opcodes::OP_VE => Self::VArith,
            opcodes::OP_CUSTOM_0
            | opcodes::OP_CUSTOM_1
            | opcodes::OP_CUSTOM_2
            | opcodes::OP_CUSTOM_3 => Self::Custom,
            _ => Self::Unknown,
        }
    }
}

/// Width codes 0, 5, 6 and 7 in LOAD-FP/STORE-FP select vector memory ops.
const fn is_vector_width(width: u32) -> bool {
    matches!(width, 0b000 | 0b101 | 0b110 | 0b111)
}

/// CI immediates are scaled differently per `funct3` and quadrant.
const fn ci_imm(insn: Insn) -> i64 {
    match (insn.rvc_opcode(), insn.rvc_funct3()) {
        (QUADRANT_1, 0b011) if insn.rvc_rd() == 2 => insn.rvc_addi16sp_imm(),
        (QUADRANT_1, 0b011) => insn.rvc_lui_imm(),
        (QUADRANT_2, 0b000) => insn.rvc_zimm() as i64,
        (QUADRANT_2, 0b010) => insn.rvc_lwsp_imm() as i64,
        (QUADRANT_2, 0b001 | 0b011) => insn.rvc_ldsp_imm() as i64,
        _ => insn.rvc_imm(),
    }
}

/// Word-sized CL/CS forms use the `lw` layout; doubleword forms the `ld` one.
const fn cl_cs_imm(insn: Insn) -> i64 {
    if insn.rvc_funct3() & 0b011 == 0b010 {
        insn.rvc_lw_imm() as i64
    } else {
        insn.rvc_ld_imm() as i64
    }
}

/// The operand fields one encoding shape defines.
///
/// Fields a shape does not define are `None`. Compressed register fields are
/// already mapped to their architectural register numbers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Operands {
    /// Destination register.
    pub rd: Option<usize>,
    /// First source register.
    pub rs1: Option<usize>,
    /// Second source register.
    pub rs2: Option<usize>,
    /// Third source register.
    pub rs3: Option<usize>,
    /// Immediate, sign-extended where the shape says so.
    pub imm: Option<i64>,
    /// CSR address.
    pub csr: Option<u16>,
    /// Function code (funct3, funct7 or funct6 packed per shape).
    pub funct: Option<u32>,
    /// Floating-point rounding mode.
    pub rm: Option<u8>,
    /// Vector mask bit (`true` = unmasked).
    pub vm: Option<bool>,
    /// Element-width selector of a vector memory op.
    pub width: Option<u32>,
}

impl Operands {
    /// Extracts the operand set a shape defines.
    pub const fn extract(shape: Shape, insn: Insn) -> Self {
        let none = Self {
            rd: None,
            rs1: None,
            rs2: None,
            rs3: None,
            imm: None,
            csr: None,
            funct: None,
            rm: None,
            vm: None,
            width: None,
        };
        match shape {
            Shape::Cr => Self {
                rd: Some(insn.rvc_rd()),
                rs1: Some(insn.rvc_rs1()),
                rs2: Some(insn.rvc_rs2()),
                funct: Some(((insn.bits() >> 12) & 0xf) as u32),
                ..none
            },
            Shape::Ci => Self {
                rd: Some(insn.rvc_rd()),
                rs1: Some(insn.rvc_rs1()),
                imm: Some(ci_imm(insn)),
                funct: Some(insn.rvc_funct3()),
                ..none
            },
            Shape::Css => Self {
                rs2: Some(insn.rvc_rs2()),
                imm: Some(if insn.rvc_funct3() == 0b110 {
                    insn.rvc_swsp_imm() as i64
                } else {
                    insn.rvc_sdsp_imm() as i64
                }),
                funct: Some(insn.rvc_funct3()),
                ..none
            },
            Shape::Ciw => Self {
                rd: Some(insn.rvc_rs2s()),
                imm: Some(insn.rvc_addi4spn_imm() as i64),
                funct: Some(insn.rvc_funct3()),
                ..none
            },
            Shape::Cl => Self {
                rd: Some(insn.rvc_rs2s()),
                rs1: Some(insn.rvc_rs1s()),
                imm: Some(cl_cs_imm(insn)),
                funct: Some(insn.rvc_funct3()),
                ..none
            },
            Shape::Cs => Self {
                rs1: Some(insn.rvc_rs1s()),
                rs2: Some(insn.rvc_rs2s()),
                imm: Some(cl_cs_imm(insn)),
                funct: Some(insn.rvc_funct3()),
                ..none
            },
            Shape::Ca => Self {
                rd: Some(insn.rvc_rs1s()),
                rs1: Some(insn.rvc_rs1s()),
                rs2: Some(insn.rvc_rs2s()),
                funct: Some((((insn.bits() >> 10) & 0b111_000) | ((insn.bits() >> 5) & 0b11)) as u32),
                ..none
            },
            Shape::Cb => Self {
                rd: Some(insn.rvc_rs1s()),
                rs1: Some(insn.rvc_rs1s()),
                imm: Some(insn.rvc_b_imm()),
                funct: Some(insn.rvc_funct3()),
                ..none
            },
            Shape::Cj => Self {
                imm: Some(insn.rvc_j_imm()),
                funct: Some(insn.rvc_funct3()),
                ..none
            },
            Shape::R | Shape::Custom => Self {
                rd: Some(insn.rd()),
                rs1: Some(insn.rs1()),
                rs2: Some(insn.rs2()),
                funct: Some((insn.funct7() << 3) | insn.funct3()),
                rm: Some(insn.rm()),
                ..none
            },
            Shape::R4 => Self {
                rd: Some(insn.rd()),
                rs1: Some(insn.rs1()),
                rs2: Some(insn.rs2()),
                rs3: Some(insn.rs3()),
                funct: Some(insn.funct2()),
                rm: Some(insn.rm()),
                ..none
            },
            Shape::I => Self {
                rd: Some(insn.rd()),
                rs1: Some(insn.rs1()),
                imm: Some(insn.i_imm()),
                csr: Some(insn.csr()),
                funct: Some(insn.funct3()),
                ..none
            },
            Shape::S => Self {
                rs1: Some(insn.rs1()),
                rs2: Some(insn.rs2()),
                imm: Some(insn.s_imm()),
                funct: Some(insn.funct3()),
                ..none
            },
            Shape::B => Self {
                rs1: Some(insn.rs1()),
                rs2: Some(insn.rs2()),
                imm: Some(insn.sb_imm()),
                funct: Some(insn.funct3()),
                ..none
            },
            Shape::U => Self {
                rd: Some(insn.rd()),
                imm: Some(insn.u_imm()),
                ..none
            },
            Shape::J => Self {
                rd: Some(insn.rd()),
                imm: Some(insn.uj_imm()),
                ..none
            },
            Shape::VArith => Self {
                rd: Some(insn.rd()),
                rs1: Some(insn.rs1()),
                rs2: Some(insn.rs2()),
                imm: Some(insn.v_simm5()),
                funct: Some((insn.v_funct6() << 3) | insn.funct3()),
                vm: Some(insn.v_vm()),
                ..none
            },
            Shape::VConfig => Self {
                rd: Some(insn.rd()),
                rs1: Some(insn.rs1()),
                rs2: Some(insn.rs2()),
                imm: Some(insn.v_zimm11() as i64),
                funct: Some((insn.bits() >> 30) as u32 & 0b11),
                ..none
            },
            Shape::VLoad | Shape::VStore => Self {
                rd: Some(insn.rd()),
                rs1: Some(insn.rs1()),
                rs2: Some(insn.rs2()),
                funct: Some((insn.v_nf() << 3) | (insn.v_mew() << 2) | insn.v_mop()),
                vm: Some(insn.v_vm()),
                width: Some(insn.v_width()),
                ..none
            },
            Shape::Unknown => none,
        }
    }
}

/// A classified instruction and its operand view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decoded {
    /// The raw word.
    pub insn: Insn,
    /// Encoded length.
    pub length: InsnLength,
    /// Encoding shape.
    pub shape: Shape,
    /// Operand fields for `shape`.
    pub operands: Operands,
}

/// Decodes an instruction word.
///
/// Reads the length-determining low bits first, then the shape selectors.
/// Never fails and has no side effects; decoding the same bits twice yields
/// the same value.
pub const fn decode(bits: u64) -> Decoded {
    let insn = Insn::new(bits);
    let shape = Shape::classify(insn);
    Decoded {
        insn,
        length: insn.length(),
        shape,
        operands: Operands::extract(shape, insn),
    }
}
