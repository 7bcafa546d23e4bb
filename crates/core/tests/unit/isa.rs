//! # ISA Tests
//!
//! Decoder shapes and operands, encoding patterns and ISA string parsing.

use crate::common::builder::{addi, fadd_d, sd, vadd_vv, vle, vsetvli, vtype};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rviss_core::common::IsaError;
use rviss_core::isa::isa_string::misa_bit;
use rviss_core::isa::opcodes::{OP_CUSTOM_0, OP_IMM, OP_REG};
use rviss_core::isa::{InsnLength, IsaProfile, Operands, Pattern, Shape, Xlen, decode};
use rstest::rstest;

// ──────────────────────────────────────────────────────────
// Decoding
// ──────────────────────────────────────────────────────────

#[test]
fn test_decode_compressed_register_form() {
    let d = decode(0x952e);

    assert_eq!(d.length, InsnLength::Compressed);
    assert_eq!(d.shape, Shape::Cr);
    assert_eq!(d.operands.rd, Some(10));
    assert_eq!(d.operands.rs2, Some(11));
    assert_eq!(d.insn.len(), 2);
}

#[test]
fn test_decode_compressed_immediate_form() {
    let d = decode(0x0505);

    assert_eq!(d.shape, Shape::Ci);
    assert_eq!(d.operands.rd, Some(10));
    assert_eq!(d.operands.imm, Some(1));
}

#[test]
fn test_decode_i_type_sign_extends_immediate() {
    let d = decode(u64::from(addi(10, 11, -5)));

    assert_eq!(d.length, InsnLength::Standard);
    assert_eq!(d.shape, Shape::I);
    assert_eq!(d.operands.rd, Some(10));
    assert_eq!(d.operands.rs1, Some(11));
    assert_eq!(d.operands.imm, Some(-5));
    assert_eq!(d.operands.rs2, None);
}

#[test]
fn test_decode_s_type_reassembles_split_immediate() {
    let d = decode(u64::from(sd(7, 5, -24)));

    assert_eq!(d.shape, Shape::S);
    assert_eq!(d.operands.rs1, Some(5));
    assert_eq!(d.operands.rs2, Some(7));
    assert_eq!(d.operands.imm, Some(-24));
    assert_eq!(d.operands.rd, None);
}

#[test]
fn test_decode_fp_op_carries_rounding_mode() {
    let d = decode(u64::from(fadd_d(3, 1, 2, 0b011)));

    assert_eq!(d.shape, Shape::R);
    assert_eq!(d.operands.rm, Some(0b011));
}

#[rstest]
#[case::arith(vadd_vv(1, 2, 3, true), Shape::VArith)]
#[case::config(vsetvli(10, 11, vtype(32, 0, true, true)), Shape::VConfig)]
#[case::load(vle(32, 8, 5), Shape::VLoad)]
#[case::scalar_fp_load(0x0003_b087, Shape::I)]
fn test_decode_vector_shapes(#[case] word: u32, #[case] shape: Shape) {
    assert_eq!(decode(u64::from(word)).shape, shape);
}

#[test]
fn test_decode_vector_mask_bit() {
    assert_eq!(decode(u64::from(vadd_vv(1, 2, 3, true))).operands.vm, Some(false));
    assert_eq!(decode(u64::from(vadd_vv(1, 2, 3, false))).operands.vm, Some(true));
}

#[test]
fn test_decode_custom_opcode() {
    let word = (1 << 25) | (3 << 20) | (2 << 15) | (1 << 7) | OP_CUSTOM_0;

    let d = decode(u64::from(word));

    assert_eq!(d.shape, Shape::Custom);
    assert_eq!(d.operands.rd, Some(1));
}

#[rstest]
#[case::bits48(0x1f, InsnLength::Extended48)]
#[case::bits64(0x3f, InsnLength::Extended64)]
#[case::reserved(0x7f, InsnLength::Reserved)]
fn test_long_encodings_are_unknown(#[case] bits: u64, #[case] length: InsnLength) {
    let d = decode(bits);

    assert_eq!(d.length, length);
    assert_eq!(d.shape, Shape::Unknown);
    assert_eq!(d.operands, Operands::default());
}

proptest! {
    #[test]
    fn prop_decode_is_total_and_deterministic(bits in any::<u32>()) {
        let first = decode(u64::from(bits));
        let second = decode(u64::from(bits));
        prop_assert_eq!(first, second);
        prop_assert_eq!(first.length == InsnLength::Compressed, bits & 0b11 != 0b11);
        if first.shape == Shape::Unknown {
            prop_assert_eq!(first.operands, Operands::default());
        }
    }

    #[test]
    fn prop_compressed_decode_ignores_upper_parcel(low in any::<u16>(), high in any::<u16>()) {
        prop_assume!(low & 0b11 != 0b11);
        let word = (u64::from(high) << 16) | u64::from(low);
        prop_assert_eq!(decode(word), decode(u64::from(low)));
    }
}

// ──────────────────────────────────────────────────────────
// Patterns
// ──────────────────────────────────────────────────────────

#[test]
fn test_pattern_builder_matches_fields() {
    let add = Pattern::opcode(OP_REG).funct3(0).funct7(0);

    assert!(add.matches(0x00b5_0533));
    assert!(!add.matches(0x40b5_0533));
    assert!(add.is_well_formed());
    assert_eq!(add.specificity(), 17);
}

#[test]
fn test_pattern_overlap_and_subset() {
    let op_imm = Pattern::opcode(OP_IMM);
    let addi = op_imm.funct3(0);
    let slti = op_imm.funct3(0b010);

    assert!(op_imm.overlaps(addi));
    assert!(addi.is_subset_of(op_imm));
    assert!(!op_imm.is_subset_of(addi));
    assert!(!addi.overlaps(slti));
}

#[test]
fn test_raw_pattern_with_bits_outside_mask_is_malformed() {
    assert!(!Pattern::raw(0x7f, 0x80).is_well_formed());
}

// ──────────────────────────────────────────────────────────
// ISA strings
// ──────────────────────────────────────────────────────────

#[test]
fn test_parse_general_purpose_isa() {
    let isa = IsaProfile::parse("rv64gc", "msu").expect("valid ISA");

    assert_eq!(isa.xlen(), Xlen::Rv64);
    for ext in ["i", "m", "a", "f", "d", "c", "zicsr", "zifencei", "s", "u"] {
        assert!(isa.has(ext), "missing {ext}");
    }
    let misa = isa.misa();
    assert_eq!(misa >> 62, 2);
    assert_ne!(misa & misa_bit('s'), 0);
    assert_eq!(misa & misa_bit('v'), 0);
}

#[test]
fn test_vector_implies_floating_point() {
    let isa = IsaProfile::parse("rv64imacv_zvkned", "m").expect("valid ISA");

    assert!(isa.has("f"));
    assert!(isa.has("d"));
    assert!(isa.has("zvkned"));
    assert!(!isa.has_user());
    assert!(!isa.has_supervisor());
}

#[test]
fn test_custom_extension_sets_misa_x() {
    let isa = IsaProfile::parse("rv32imac_xdouble", "mu").expect("valid ISA");

    assert_eq!(isa.xlen(), Xlen::Rv32);
    assert!(isa.has("xdouble"));
    assert_ne!(isa.misa() & misa_bit('x'), 0);
}

#[rstest]
#[case::bad_base("x86_64", "msu", IsaError::BadBase("x86_64".into()))]
#[case::missing_base("rv64mac", "msu", IsaError::MissingBase("rv64mac".into()))]
#[case::embedded("rv32e", "msu", IsaError::Unsupported("e".into()))]
#[case::duplicate("rv64imm", "msu", IsaError::Duplicate("m".into()))]
#[case::out_of_order("rv64iam", "msu", IsaError::OutOfOrder('m'))]
#[case::unsupported_letter("rv64imaq", "msu", IsaError::Unsupported("q".into()))]
#[case::unknown_multi("rv64gc_zfoo", "msu", IsaError::Unsupported("zfoo".into()))]
#[case::crypto_without_vector(
    "rv64gc_zvkned",
    "msu",
    IsaError::MissingDependency { ext: "zvkned".into(), requires: "v".into() }
)]
#[case::hypervisor_without_supervisor(
    "rv64gch",
    "mu",
    IsaError::MissingDependency { ext: "h".into(), requires: "s".into() }
)]
#[case::bad_privilege("rv64gc", "su", IsaError::BadPrivilegeLevels("su".into()))]
fn test_parse_rejects(#[case] isa: &str, #[case] privilege: &str, #[case] expected: IsaError) {
    assert_eq!(IsaProfile::parse(isa, privilege), Err(expected));
}
