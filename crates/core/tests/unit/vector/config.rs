//! # Vector Configuration Tests
//!
//! `vl` selection at VLEN = 128, `vill` and the keep-`vl` form.

use crate::common::builder::{vadd_vv, vsetivli, vsetvli, vtype};
use crate::common::harness::TestContext;
use pretty_assertions::assert_eq;
use rviss_core::Trap;
use rviss_core::core::arch::csr::{VL, VSTART, VTYPE};
use rviss_core::core::cpu::StepStatus;
use rstest::rstest;

const VILL: u64 = 1 << 63;

fn vector_ctx(program: &[u32]) -> TestContext {
    TestContext::with_isa("rv64gcv").load_program(program)
}

#[rstest]
#[case::e32m1_short(32, 0, 3, 3)]
#[case::e32m1_long(32, 0, 10, 4)]
#[case::e8m1(8, 0, 100, 16)]
#[case::e64m8(64, 3, 20, 16)]
#[case::e16mf2(16, -1, 5, 4)]
fn test_vl_is_min_of_avl_and_vlmax(
    #[case] sew: u32,
    #[case] lmul_log2: i32,
    #[case] avl: u64,
    #[case] expected: u64,
) {
    let mut ctx = vector_ctx(&[vsetvli(10, 11, vtype(sew, lmul_log2, true, true))]);
    ctx.set_reg(11, avl);

    ctx.retire(1);

    assert_eq!(ctx.get_reg(10), expected);
    assert_eq!(ctx.cpu.read_csr(VL), expected);
    assert_eq!(ctx.cpu.read_csr(VTYPE) & VILL, 0);
}

#[test]
fn test_x0_avl_with_nonzero_rd_selects_vlmax() {
    let mut ctx = vector_ctx(&[vsetvli(10, 0, vtype(16, 1, false, false))]);

    ctx.retire(1);

    assert_eq!(ctx.get_reg(10), 16);
}

#[test]
fn test_vsetivli_takes_avl_from_immediate() {
    let mut ctx = vector_ctx(&[vsetivli(10, 7, vtype(32, 1, true, true))]);

    ctx.retire(1);

    assert_eq!(ctx.get_reg(10), 7);
}

#[test]
fn test_keep_vl_when_vlmax_unchanged() {
    let mut ctx = vector_ctx(&[
        vsetvli(0, 11, vtype(32, 0, true, true)),
        vsetvli(0, 0, vtype(16, -1, false, true)),
    ]);
    ctx.set_reg(11, 3);

    ctx.retire(2);

    assert_eq!(ctx.cpu.read_csr(VL), 3);
    assert_eq!(ctx.cpu.read_csr(VTYPE), u64::from(vtype(16, -1, false, true)));
}

#[test]
fn test_keep_vl_with_changed_vlmax_sets_vill() {
    let mut ctx = vector_ctx(&[
        vsetvli(0, 11, vtype(32, 0, true, true)),
        vsetvli(0, 0, vtype(8, 0, true, true)),
    ]);
    ctx.set_reg(11, 3);

    ctx.retire(2);

    assert_eq!(ctx.cpu.read_csr(VTYPE), VILL);
    assert_eq!(ctx.cpu.read_csr(VL), 0);
}

#[test]
fn test_unsupported_sew_sets_vill() {
    // vsew = 0b100 is reserved.
    let mut ctx = vector_ctx(&[vsetvli(10, 11, 0b100 << 3)]);
    ctx.set_reg(11, 4);

    ctx.retire(1);

    assert_eq!(ctx.cpu.read_csr(VTYPE), VILL);
    assert_eq!(ctx.get_reg(10), 0);
}

#[test]
fn test_vector_instruction_before_configuration_is_illegal() {
    let word = vadd_vv(1, 2, 3, false);
    let mut ctx = vector_ctx(&[word]);

    assert_eq!(
        ctx.step(),
        StepStatus::Trapped(Trap::IllegalInstruction(u64::from(word)))
    );
}

#[test]
fn test_configuration_resets_vstart() {
    let mut ctx = vector_ctx(&[vsetvli(10, 11, vtype(32, 0, true, true))]);
    ctx.set_reg(11, 4);
    ctx.cpu.write_csr(VSTART, 2);

    ctx.retire(1);

    assert_eq!(ctx.cpu.read_csr(VSTART), 0);
}
