//! # Floating-Point Tests
//!
//! Rounding-mode selection, accrued exception flags, NaN boxing and FS gating.

use crate::common::builder::{fadd_d, fadd_s, fdiv_d};
use crate::common::harness::{RAM_BASE, TestContext};
use pretty_assertions::assert_eq;
use rviss_core::Trap;
use rviss_core::core::arch::csr::{FFLAGS, FRM, MSTATUS, MSTATUS_FS};
use rviss_core::isa::Insn;
use rstest::rstest;

const ONE: u64 = 0x3ff0_0000_0000_0000;
const ONE_NEXT: u64 = 0x3ff0_0000_0000_0001;
/// 2^-53: exactly half an ulp of 1.0.
const HALF_ULP: u64 = 0x3ca0_0000_0000_0000;
const INFINITY: u64 = 0x7ff0_0000_0000_0000;
const BOXED_ONE_F32: u64 = 0xffff_ffff_3f80_0000;
const BOXED_CANONICAL_NAN_F32: u64 = 0xffff_ffff_7fc0_0000;

const NX: u64 = 1;
const DZ: u64 = 8;

fn run(ctx: &mut TestContext, word: u32) -> Result<u64, Trap> {
    ctx.cpu.execute(Insn::from(word), RAM_BASE)
}

#[rstest]
#[case::rne(0b000, ONE)]
#[case::rtz(0b001, ONE)]
#[case::rdn(0b010, ONE)]
#[case::rup(0b011, ONE_NEXT)]
#[case::rmm(0b100, ONE_NEXT)]
fn test_static_rounding_mode_on_tie(#[case] rm: u32, #[case] expected: u64) {
    let mut ctx = TestContext::new();
    ctx.cpu.set_f(1, ONE);
    ctx.cpu.set_f(2, HALF_ULP);

    assert_eq!(run(&mut ctx, fadd_d(3, 1, 2, rm)), Ok(RAM_BASE + 4));

    assert_eq!(ctx.cpu.f(3), expected);
    assert_eq!(ctx.cpu.read_csr(FFLAGS), NX);
}

#[test]
fn test_dynamic_rounding_mode_reads_frm() {
    let mut ctx = TestContext::new();
    ctx.cpu.write_csr(FRM, 0b011);
    ctx.cpu.set_f(1, ONE);
    ctx.cpu.set_f(2, HALF_ULP);

    let _ = run(&mut ctx, fadd_d(3, 1, 2, 0b111));

    assert_eq!(ctx.cpu.f(3), ONE_NEXT);
}

#[rstest]
#[case::reserved_static(0b101)]
#[case::reserved_static_high(0b110)]
fn test_reserved_rounding_mode_is_illegal(#[case] rm: u32) {
    let mut ctx = TestContext::new();
    let word = fadd_d(3, 1, 2, rm);

    assert_eq!(run(&mut ctx, word), Err(Trap::IllegalInstruction(u64::from(word))));
}

#[test]
fn test_dynamic_rounding_with_reserved_frm_is_illegal() {
    let mut ctx = TestContext::new();
    ctx.cpu.write_csr(FRM, 0b101);
    let word = fadd_d(3, 1, 2, 0b111);

    assert_eq!(run(&mut ctx, word), Err(Trap::IllegalInstruction(u64::from(word))));
}

#[test]
fn test_division_by_zero_sets_dz_and_returns_infinity() {
    let mut ctx = TestContext::new();
    ctx.cpu.set_f(1, ONE);
    ctx.cpu.set_f(2, 0);

    let _ = run(&mut ctx, fdiv_d(3, 1, 2, 0));

    assert_eq!(ctx.cpu.f(3), INFINITY);
    assert_eq!(ctx.cpu.read_csr(FFLAGS), DZ);
}

#[test]
fn test_flags_accumulate_across_instructions() {
    let mut ctx = TestContext::new();
    ctx.cpu.set_f(1, ONE);
    ctx.cpu.set_f(2, HALF_ULP);
    ctx.cpu.set_f(4, 0);

    let _ = run(&mut ctx, fadd_d(3, 1, 2, 0));
    let _ = run(&mut ctx, fdiv_d(5, 1, 4, 0));

    assert_eq!(ctx.cpu.read_csr(FFLAGS), NX | DZ);
}

#[test]
fn test_improperly_boxed_single_reads_as_canonical_nan() {
    let mut ctx = TestContext::new();
    ctx.cpu.set_f(1, 0x0000_0000_3f80_0000);
    ctx.cpu.set_f(2, BOXED_ONE_F32);

    let _ = run(&mut ctx, fadd_s(3, 1, 2, 0));

    assert_eq!(ctx.cpu.f(3), BOXED_CANONICAL_NAN_F32);
}

#[test]
fn test_single_results_are_boxed() {
    let mut ctx = TestContext::new();
    ctx.cpu.set_f(1, BOXED_ONE_F32);
    ctx.cpu.set_f(2, BOXED_ONE_F32);

    let _ = run(&mut ctx, fadd_s(3, 1, 2, 0));

    assert_eq!(ctx.cpu.f(3), 0xffff_ffff_4000_0000);
}

#[test]
fn test_fp_instruction_is_illegal_when_fs_off() {
    let mut ctx = TestContext::new();
    let status = ctx.cpu.read_csr(MSTATUS) & !MSTATUS_FS;
    ctx.cpu.write_csr(MSTATUS, status);
    let word = fadd_d(3, 1, 2, 0);

    assert_eq!(run(&mut ctx, word), Err(Trap::IllegalInstruction(u64::from(word))));
}

#[test]
fn test_fp_write_marks_fs_dirty() {
    let mut ctx = TestContext::new();
    assert_ne!(ctx.cpu.read_csr(MSTATUS) & MSTATUS_FS, MSTATUS_FS);

    let _ = run(&mut ctx, fadd_d(3, 1, 2, 0));

    assert_eq!(ctx.cpu.read_csr(MSTATUS) & MSTATUS_FS, MSTATUS_FS);
}
