//! # Vector Arithmetic Tests
//!
//! `vadd.vv` under every combination of tail and mask policy the engine
//! distinguishes, and the scalar and immediate operand forms.

use crate::common::builder::{varith, vadd_vv, vsetivli, vtype};
use crate::common::harness::TestContext;
use pretty_assertions::assert_eq;
use rstest::rstest;
use rviss_core::isa::rvv::category::{OPIVI, OPIVX};
use rviss_core::isa::rvv::opi;

const ONES: u32 = u32::MAX;

fn setup(avl: u32, ta: bool, ma: bool, masked: bool) -> TestContext {
    let mut ctx = TestContext::with_isa("rv64gcv")
        .load_program(&[vsetivli(0, avl, vtype(32, 0, ta, ma)), vadd_vv(1, 2, 3, masked)]);
    ctx.set_velems32(1, &[7, 7, 7, 7]);
    ctx.set_velems32(2, &[1, 2, 3, 4]);
    ctx.set_velems32(3, &[10, 20, 30, 40]);
    ctx.set_velems32(0, &[0b0101, 0, 0, 0]);
    ctx
}

fn elems(ctx: &TestContext, reg: usize) -> Vec<u32> {
    (0..4).map(|i| ctx.velem32(reg, i)).collect()
}

#[rstest]
#[case::agnostic(true, [11, 22, ONES, ONES])]
#[case::undisturbed(false, [11, 22, 7, 7])]
fn test_tail_policy(#[case] ta: bool, #[case] expected: [u32; 4]) {
    let mut ctx = setup(2, ta, false, false);

    ctx.retire(2);

    assert_eq!(elems(&ctx, 1), expected);
}

#[rstest]
#[case::agnostic(true, [11, ONES, 33, ONES])]
#[case::undisturbed(false, [11, 7, 33, 7])]
fn test_mask_policy(#[case] ma: bool, #[case] expected: [u32; 4]) {
    let mut ctx = setup(4, false, ma, true);

    ctx.retire(2);

    assert_eq!(elems(&ctx, 1), expected);
}

#[test]
fn test_unmasked_add_ignores_v0() {
    let mut ctx = setup(4, false, false, false);

    ctx.retire(2);

    assert_eq!(elems(&ctx, 1), [11, 22, 33, 44]);
}

#[test]
fn test_scalar_operand_comes_from_rs1() {
    let mut ctx = TestContext::with_isa("rv64gcv")
        .load_program(&[vsetivli(0, 4, vtype(32, 0, true, true)), varith(opi::VADD, OPIVX, 1, 2, 5, false)]);
    ctx.set_velems32(2, &[1, 2, 3, 4]);
    ctx.set_reg(5, 100);

    ctx.retire(2);

    assert_eq!(elems(&ctx, 1), [101, 102, 103, 104]);
}

#[test]
fn test_immediate_operand_is_sign_extended() {
    // simm5 = -1
    let mut ctx = TestContext::with_isa("rv64gcv")
        .load_program(&[vsetivli(0, 4, vtype(32, 0, true, true)), varith(opi::VADD, OPIVI, 1, 2, 0b1_1111, false)]);
    ctx.set_velems32(2, &[1, 2, 3, 4]);

    ctx.retire(2);

    assert_eq!(elems(&ctx, 1), [0, 1, 2, 3]);
}

#[test]
fn test_shift_immediate_is_unsigned() {
    let mut ctx = TestContext::with_isa("rv64gcv")
        .load_program(&[vsetivli(0, 2, vtype(64, 0, true, true)), varith(opi::VSLL, OPIVI, 1, 2, 16, false)]);
    ctx.cpu.state.regs.vregs_mut().set_elem(2, 0, 64, 1);
    ctx.cpu.state.regs.vregs_mut().set_elem(2, 1, 64, 3);

    ctx.retire(2);

    let vregs = ctx.cpu.state.regs.vregs();
    assert_eq!([vregs.elem(1, 0, 64), vregs.elem(1, 1, 64)], [1 << 16, 3 << 16]);
}
