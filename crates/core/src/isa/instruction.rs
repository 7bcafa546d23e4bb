//! Instruction Word and Bit-Field Accessors.
//!
//! An [`Insn`] is the raw encoded instruction as fetched. It never changes after
//! fetch and carries no interpretation; every field is recovered on demand by an
//! accessor. It provides:
//! 1. **Length Determination:** [`InsnLength::of`] reads only the low bits.
//! 2. **Standard Fields:** register indices, function codes, and the I/S/B/U/J immediates.
//! 3. **Compressed Fields:** the CR/CI/CSS/CIW/CL/CS/CA/CB/CJ register and immediate layouts.
//! 4. **Vector Fields:** mask bit, `funct6`, `vtype` immediates and memory-op selectors.

use std::fmt;

/// Encoded length of an instruction, determined from its lowest bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InsnLength {
    /// 16-bit compressed form (`bits[1:0] != 0b11`).
    Compressed,
    /// 32-bit standard form (`bits[1:0] == 0b11`, `bits[4:2] != 0b111`).
    Standard,
    /// 48-bit form (`bits[5:0] == 0b011111`).
    Extended48,
    /// 64-bit form (`bits[6:0] == 0b0111111`).
    Extended64,
    /// 80-bit or longer; reserved in every supported configuration.
    Reserved,
}

impl InsnLength {
    /// Classifies an instruction by its low-order parcel.
    ///
    /// Only the lowest seven bits are consulted, so the result is identical for
    /// every word sharing the same first parcel.
    #[inline(always)]
    pub const fn of(bits: u64) -> Self {
        if bits & 0x03 != 0x03 {
            Self::Compressed
        } else if bits & 0x1f != 0x1f {
            Self::Standard
        } else if bits & 0x3f != 0x3f {
            Self::Extended48
        } else if bits & 0x7f != 0x7f {
            Self::Extended64
        } else {
            Self::Reserved
        }
    }

    /// Length in bytes. [`InsnLength::Reserved`] reports the minimum of ten bytes.
    pub const fn bytes(self) -> u64 {
        match self {
            Self::Compressed => 2,
            Self::Standard => 4,
            Self::Extended48 => 6,
            Self::Extended64 => 8,
            Self::Reserved => 10,
        }
    }
}

/// A fetched instruction word.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Insn(u64);

impl fmt::Debug for Insn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.length() {
            InsnLength::Compressed => write!(f, "Insn({:#06x})", self.0),
            _ => write!(f, "Insn({:#010x})", self.0),
        }
    }
}

impl From<u32> for Insn {
    fn from(bits: u32) -> Self {
        Self(u64::from(bits))
    }
}

impl From<u16> for Insn {
    fn from(bits: u16) -> Self {
        Self(u64::from(bits))
    }
}

impl Insn {
    /// Wraps raw instruction bits. Bits above the encoded length are discarded.
    pub const fn new(bits: u64) -> Self {
        let len = InsnLength::of(bits).bytes();
        if len >= 8 {
            Self(bits)
        } else {
            Self(bits & ((1u64 << (len * 8)) - 1))
        }
    }

    /// Raw bits (zero-extended).
    #[inline(always)]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Low 32 bits, the unit the dispatch tables match against.
    #[inline(always)]
    pub const fn low32(self) -> u32 {
        self.0 as u32
    }

    /// Encoded length class.
    #[inline(always)]
    pub const fn length(self) -> InsnLength {
        InsnLength::of(self.0)
    }

    /// Encoded length in bytes.
    #[inline(always)]
    pub const fn len(self) -> u64 {
        self.length().bytes()
    }

    /// Returns `true` for 16-bit encodings.
    #[inline(always)]
    pub const fn is_compressed(self) -> bool {
        matches!(self.length(), InsnLength::Compressed)
    }

    #[inline(always)]
    const fn x(self, lo: u32, len: u32) -> u64 {
        (self.0 >> lo) & ((1u64 << len) - 1)
    }

    #[inline(always)]
    const fn xs(self, lo: u32, len: u32) -> i64 {
        ((self.0 << (64 - lo - len)) as i64) >> (64 - len)
    }

    #[inline(always)]
    const fn imm_sign(self) -> i64 {
        self.xs(31, 1)
    }

    // ── Standard 32-bit fields ──────────────────────────────────────────────

    /// Major opcode, `bits[6:0]`.
    #[inline(always)]
    pub const fn opcode(self) -> u32 {
        self.x(0, 7) as u32
    }

    /// Destination register, `bits[11:7]`.
    #[inline(always)]
    pub const fn rd(self) -> usize {
        self.x(7, 5) as usize
    }

    /// First source register, `bits[19:15]`.
    #[inline(always)]
    pub const fn rs1(self) -> usize {
        self.x(15, 5) as usize
    }

    /// Second source register, `bits[24:20]`.
    #[inline(always)]
    pub const fn rs2(self) -> usize {
        self.x(20, 5) as usize
    }

    /// Third source register for R4-type, `bits[31:27]`.
    #[inline(always)]
    pub const fn rs3(self) -> usize {
        self.x(27, 5) as usize
    }

    /// `funct2`, `bits[26:25]` (R4-type format selector).
    #[inline(always)]
    pub const fn funct2(self) -> u32 {
        self.x(25, 2) as u32
    }

    /// `funct3`, `bits[14:12]`.
    #[inline(always)]
    pub const fn funct3(self) -> u32 {
        self.x(12, 3) as u32
    }

    /// `funct7`, `bits[31:25]`.
    #[inline(always)]
    pub const fn funct7(self) -> u32 {
        self.x(25, 7) as u32
    }

    /// Floating-point rounding mode, `bits[14:12]`.
    #[inline(always)]
    pub const fn rm(self) -> u8 {
        self.x(12, 3) as u8
    }

    /// CSR address, `bits[31:20]`.
    #[inline(always)]
    pub const fn csr(self) -> u16 {
        self.x(20, 12) as u16
    }

    /// Shift amount for RV64 immediate shifts, `bits[25:20]`.
    #[inline(always)]
    pub const fn shamt(self) -> u32 {
        self.x(20, 6) as u32
    }

    /// I-type immediate, sign-extended.
    #[inline(always)]
    pub const fn i_imm(self) -> i64 {
        self.xs(20, 12)
    }

    /// S-type immediate, sign-extended.
    #[inline(always)]
    pub const fn s_imm(self) -> i64 {
        (self.x(7, 5) as i64) | (self.xs(25, 7) << 5)
    }

    /// B-type branch offset, sign-extended.
    #[inline(always)]
    pub const fn sb_imm(self) -> i64 {
        ((self.x(8, 4) << 1) as i64)
            | ((self.x(25, 6) << 5) as i64)
            | ((self.x(7, 1) << 11) as i64)
            | (self.imm_sign() << 12)
    }

    /// U-type immediate (`bits[31:12] << 12`), sign-extended.
    #[inline(always)]
    pub const fn u_imm(self) -> i64 {
        self.xs(12, 20) << 12
    }

    /// J-type jump offset, sign-extended.
    #[inline(always)]
    pub const fn uj_imm(self) -> i64 {
        ((self.x(21, 10) << 1) as i64)
            | ((self.x(20, 1) << 11) as i64)
            | ((self.x(12, 8) << 12) as i64)
            | (self.imm_sign() << 20)
    }

    // ── Compressed 16-bit fields ────────────────────────────────────────────

    /// Compressed quadrant, `bits[1:0]`.
    #[inline(always)]
    pub const fn rvc_opcode(self) -> u32 {
        self.x(0, 2) as u32
    }

    /// Compressed `funct3`, `bits[15:13]`.
    #[inline(always)]
    pub const fn rvc_funct3(self) -> u32 {
        self.x(13, 3) as u32
    }

    /// Full-width `rd`/`rs1` of CR/CI forms, `bits[11:7]`.
    #[inline(always)]
    pub const fn rvc_rd(self) -> usize {
        self.x(7, 5) as usize
    }

    /// Alias of [`Insn::rvc_rd`] for the source role.
    #[inline(always)]
    pub const fn rvc_rs1(self) -> usize {
        self.rvc_rd()
    }

    /// Full-width `rs2` of CR/CSS forms, `bits[6:2]`.
    #[inline(always)]
    pub const fn rvc_rs2(self) -> usize {
        self.x(2, 5) as usize
    }

    /// Compact `rs1'`/`rd'` (x8..x15), `bits[9:7]`.
    #[inline(always)]
    pub const fn rvc_rs1s(self) -> usize {
        8 + self.x(7, 3) as usize
    }

    /// Compact `rs2'`/`rd'` (x8..x15), `bits[4:2]`.
    #[inline(always)]
    pub const fn rvc_rs2s(self) -> usize {
        8 + self.x(2, 3) as usize
    }

    /// CI-form 6-bit immediate, sign-extended.
    #[inline(always)]
    pub const fn rvc_imm(self) -> i64 {
        (self.x(2, 5) as i64) | (self.xs(12, 1) << 5)
    }

    /// CI-form 6-bit immediate, zero-extended (shift amounts).
    #[inline(always)]
    pub const fn rvc_zimm(self) -> u32 {
        (self.x(2, 5) | (self.x(12, 1) << 5)) as u32
    }

    /// `c.addi4spn` scaled immediate.
    #[inline(always)]
    pub const fn rvc_addi4spn_imm(self) -> u64 {
        (self.x(6, 1) << 2) | (self.x(5, 1) << 3) | (self.x(11, 2) << 4) | (self.x(7, 4) << 6)
    }

    /// `c.addi16sp` scaled immediate, sign-extended.
    #[inline(always)]
    pub const fn rvc_addi16sp_imm(self) -> i64 {
        ((self.x(6, 1) << 4) as i64)
            | ((self.x(2, 1) << 5) as i64)
            | ((self.x(5, 1) << 6) as i64)
            | ((self.x(3, 2) << 7) as i64)
            | (self.xs(12, 1) << 9)
    }

    /// `c.lui` immediate (already shifted left by 12), sign-extended.
    #[inline(always)]
    pub const fn rvc_lui_imm(self) -> i64 {
        self.rvc_imm() << 12
    }

    /// `c.lwsp`/`c.flwsp` offset.
    #[inline(always)]
    pub const fn rvc_lwsp_imm(self) -> u64 {
        (self.x(4, 3) << 2) | (self.x(12, 1) << 5) | (self.x(2, 2) << 6)
    }

    /// `c.ldsp`/`c.fldsp` offset.
    #[inline(always)]
    pub const fn rvc_ldsp_imm(self) -> u64 {
        (self.x(5, 2) << 3) | (self.x(12, 1) << 5) | (self.x(2, 3) << 6)
    }

    /// `c.swsp` offset.
    #[inline(always)]
    pub const fn rvc_swsp_imm(self) -> u64 {
        (self.x(9, 4) << 2) | (self.x(7, 2) << 6)
    }

    /// `c.sdsp`/`c.fsdsp` offset.
    #[inline(always)]
    pub const fn rvc_sdsp_imm(self) -> u64 {
        (self.x(10, 3) << 3) | (self.x(7, 3) << 6)
    }

    /// `c.lw`/`c.sw` offset.
    #[inline(always)]
    pub const fn rvc_lw_imm(self) -> u64 {
        (self.x(6, 1) << 2) | (self.x(10, 3) << 3) | (self.x(5, 1) << 6)
    }

    /// `c.ld`/`c.sd`/`c.fld`/`c.fsd` offset.
    #[inline(always)]
    pub const fn rvc_ld_imm(self) -> u64 {
        (self.x(10, 3) << 3) | (self.x(5, 2) << 6)
    }

    /// CJ-form jump offset, sign-extended.
    #[inline(always)]
    pub const fn rvc_j_imm(self) -> i64 {
        ((self.x(3, 3) << 1) as i64)
            | ((self.x(11, 1) << 4) as i64)
            | ((self.x(2, 1) << 5) as i64)
            | ((self.x(7, 1) << 6) as i64)
            | ((self.x(6, 1) << 7) as i64)
            | ((self.x(9, 2) << 8) as i64)
            | ((self.x(8, 1) << 10) as i64)
            | (self.xs(12, 1) << 11)
    }

    /// CB-form branch offset, sign-extended.
    #[inline(always)]
    pub const fn rvc_b_imm(self) -> i64 {
        ((self.x(3, 2) << 1) as i64)
            | ((self.x(10, 2) << 3) as i64)
            | ((self.x(2, 1) << 5) as i64)
            | ((self.x(5, 2) << 6) as i64)
            | (self.xs(12, 1) << 8)
    }

    // ── Vector fields ───────────────────────────────────────────────────────

    /// Vector mask bit: `0` means the instruction is masked by `v0`.
    #[inline(always)]
    pub const fn v_vm(self) -> bool {
        self.x(25, 1) == 1
    }

    /// Vector arithmetic `funct6`, `bits[31:26]`.
    #[inline(always)]
    pub const fn v_funct6(self) -> u32 {
        self.x(26, 6) as u32
    }

    /// Unsigned 5-bit immediate in the `vs1` slot.
    #[inline(always)]
    pub const fn v_zimm5(self) -> u64 {
        self.x(15, 5)
    }

    /// Signed 5-bit immediate in the `vs1` slot.
    #[inline(always)]
    pub const fn v_simm5(self) -> i64 {
        self.xs(15, 5)
    }

    /// `vsetivli` vtype immediate, `bits[29:20]`.
    #[inline(always)]
    pub const fn v_zimm10(self) -> u64 {
        self.x(20, 10)
    }

    /// `vsetvli` vtype immediate, `bits[30:20]`.
    #[inline(always)]
    pub const fn v_zimm11(self) -> u64 {
        self.x(20, 11)
    }

    /// Number of fields minus one for segment loads, `bits[31:29]`.
    #[inline(always)]
    pub const fn v_nf(self) -> u32 {
        self.x(29, 3) as u32
    }

    /// Memory addressing mode, `bits[27:26]`.
    #[inline(always)]
    pub const fn v_mop(self) -> u32 {
        self.x(26, 2) as u32
    }

    /// Extended memory element width bit, `bits[28]`.
    #[inline(always)]
    pub const fn v_mew(self) -> u32 {
        self.x(28, 1) as u32
    }

    /// Unit-stride sub-operation, `bits[24:20]`.
    #[inline(always)]
    pub const fn v_lumop(self) -> u32 {
        self.x(20, 5) as u32
    }

    /// Memory element width selector, `bits[14:12]`.
    #[inline(always)]
    pub const fn v_width(self) -> u32 {
        self.x(12, 3) as u32
    }
}
