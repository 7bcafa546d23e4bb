//! # Vector Instruction Family Tests
//!
//! One or two representative instructions per handler family: widening,
//! narrowing, compares, reductions, slides, gathers, compress, mask logic and
//! Zvbb, plus state preservation when a precondition fails.

use crate::common::builder::{varith, vsetivli, vtype};
use crate::common::harness::{RAM_BASE, TestContext};
use pretty_assertions::assert_eq;
use rviss_core::Trap;
use rviss_core::isa::Insn;
use rviss_core::isa::rvv::category::{OPIVI, OPIVV, OPMVV};
use rviss_core::isa::rvv::{opi, opm};

const ONES: u32 = u32::MAX;

/// Four SEW=32 elements, tail and mask agnostic, with `v1 = [1, 2, 3, 4]`.
fn configured(isa: &str) -> TestContext {
    let mut ctx = TestContext::with_isa(isa).load_program(&[vsetivli(0, 4, vtype(32, 0, true, true))]);
    ctx.retire(1);
    ctx.set_velems32(1, &[1, 2, 3, 4]);
    ctx
}

fn run(ctx: &mut TestContext, word: u32) -> Result<u64, Trap> {
    ctx.cpu.execute(Insn::from(word), RAM_BASE + 4)
}

fn elems(ctx: &TestContext, reg: usize) -> Vec<u32> {
    (0..4).map(|i| ctx.velem32(reg, i)).collect()
}

fn mask_nibble(ctx: &TestContext, reg: usize) -> u64 {
    ctx.cpu.state.regs.vregs().elem(reg, 0, 8) & 0xf
}

// ──────────────────────────────────────────────────────────
// Widening and narrowing
// ──────────────────────────────────────────────────────────

#[test]
fn test_widening_add_produces_double_width_elements() {
    let mut ctx = configured("rv64gcv");
    ctx.set_velems32(1, &[1, 2, ONES, 4]);
    ctx.set_velems32(2, &[10, 20, 1, 40]);

    assert_eq!(run(&mut ctx, varith(opm::VWADDU, OPMVV, 4, 1, 2, false)), Ok(RAM_BASE + 8));

    let wide: Vec<u64> = (0..4).map(|i| ctx.cpu.state.regs.vregs().elem(4, i, 64)).collect();
    assert_eq!(wide, [11, 22, 0x1_0000_0000, 44]);
}

#[test]
fn test_narrowing_shift_truncates_to_sew() {
    let mut ctx = configured("rv64gcv");
    for (i, value) in [0x1_2345_0000, 0xabcd_0000, 0, u64::MAX].into_iter().enumerate() {
        ctx.cpu.state.regs.vregs_mut().set_elem(4, i, 64, value);
    }

    assert_eq!(run(&mut ctx, varith(opi::VNSRL, OPIVI, 2, 4, 16, false)), Ok(RAM_BASE + 8));

    assert_eq!(elems(&ctx, 2), [0x12345, 0xabcd, 0, ONES]);
}

// ──────────────────────────────────────────────────────────
// Compares and reductions
// ──────────────────────────────────────────────────────────

#[test]
fn test_compare_writes_mask_and_keeps_mask_tail() {
    let mut ctx = configured("rv64gcv");
    ctx.set_velems32(2, &[1, 0, 3, 0]);
    ctx.set_velems32(5, &[0xf0, 0, 0, 0]);

    assert_eq!(run(&mut ctx, varith(opi::VMSEQ, OPIVV, 5, 1, 2, false)), Ok(RAM_BASE + 8));

    assert_eq!(ctx.cpu.state.regs.vregs().elem(5, 0, 8), 0xf5);
}

#[test]
fn test_reduction_sum_folds_into_element_zero() {
    let mut ctx = configured("rv64gcv");
    ctx.set_velems32(2, &[100, 0, 0, 0]);

    assert_eq!(run(&mut ctx, varith(opm::VREDSUM, OPMVV, 3, 1, 2, false)), Ok(RAM_BASE + 8));

    assert_eq!(elems(&ctx, 3), [110, ONES, ONES, ONES]);
}

#[test]
fn test_masked_reduction_skips_inactive_elements() {
    let mut ctx = configured("rv64gcv");
    ctx.set_velems32(2, &[100, 0, 0, 0]);
    ctx.set_velems32(0, &[0b0101, 0, 0, 0]);

    assert_eq!(run(&mut ctx, varith(opm::VREDSUM, OPMVV, 3, 1, 2, true)), Ok(RAM_BASE + 8));

    assert_eq!(ctx.velem32(3, 0), 104);
}

// ──────────────────────────────────────────────────────────
// Permutations
// ──────────────────────────────────────────────────────────

#[test]
fn test_slideup_leaves_elements_below_offset() {
    let mut ctx = configured("rv64gcv");
    ctx.set_velems32(3, &[7, 7, 7, 7]);

    assert_eq!(run(&mut ctx, varith(opi::VSLIDEUP, OPIVI, 3, 1, 1, false)), Ok(RAM_BASE + 8));

    assert_eq!(elems(&ctx, 3), [7, 1, 2, 3]);
}

#[test]
fn test_slidedown_zero_fills_past_vlmax() {
    let mut ctx = configured("rv64gcv");

    assert_eq!(run(&mut ctx, varith(opi::VSLIDEDOWN, OPIVI, 3, 1, 1, false)), Ok(RAM_BASE + 8));

    assert_eq!(elems(&ctx, 3), [2, 3, 4, 0]);
}

#[test]
fn test_slideup_onto_its_source_is_illegal() {
    let mut ctx = configured("rv64gcv");
    let word = varith(opi::VSLIDEUP, OPIVI, 1, 1, 1, false);

    assert_eq!(run(&mut ctx, word), Err(Trap::IllegalInstruction(u64::from(word))));
}

#[test]
fn test_gather_reads_indexed_elements() {
    let mut ctx = configured("rv64gcv");
    ctx.set_velems32(2, &[3, 0, 9, 1]);

    assert_eq!(run(&mut ctx, varith(opi::VRGATHER, OPIVV, 3, 1, 2, false)), Ok(RAM_BASE + 8));

    assert_eq!(elems(&ctx, 3), [4, 1, 0, 2]);
}

#[test]
fn test_compress_packs_selected_elements() {
    let mut ctx = configured("rv64gcv");
    ctx.set_velems32(2, &[0b1010, 0, 0, 0]);

    assert_eq!(run(&mut ctx, varith(opm::VCOMPRESS, OPMVV, 3, 1, 2, false)), Ok(RAM_BASE + 8));

    assert_eq!(elems(&ctx, 3), [2, 4, ONES, ONES]);
}

// ──────────────────────────────────────────────────────────
// Mask registers
// ──────────────────────────────────────────────────────────

#[test]
fn test_mask_and_combines_bits() {
    let mut ctx = configured("rv64gcv");
    ctx.set_velems32(1, &[0b1100, 0, 0, 0]);
    ctx.set_velems32(2, &[0b1010, 0, 0, 0]);
    ctx.set_velems32(3, &[0, 0, 0, 0]);

    assert_eq!(run(&mut ctx, varith(opm::VMAND, OPMVV, 3, 1, 2, false)), Ok(RAM_BASE + 8));

    assert_eq!(mask_nibble(&ctx, 3), 0b1000);
}

#[test]
fn test_mask_population_count() {
    let mut ctx = configured("rv64gcv");
    ctx.set_velems32(1, &[0b1011, 0, 0, 0]);

    let word = varith(opm::VWXUNARY0, OPMVV, 10, 1, opm::VS1_VCPOP, false);
    assert_eq!(run(&mut ctx, word), Ok(RAM_BASE + 8));

    assert_eq!(ctx.get_reg(10), 3);
}

// ──────────────────────────────────────────────────────────
// Zvbb
// ──────────────────────────────────────────────────────────

#[test]
fn test_byte_reverse_each_element() {
    let mut ctx = configured("rv64gcv_zvbb");
    ctx.set_velems32(1, &[0x1122_3344, 0xaabb_ccdd, 0, 0x0000_00ff]);

    let word = varith(opm::VXUNARY0, OPMVV, 3, 1, opm::VS1_VREV8, false);
    assert_eq!(run(&mut ctx, word), Ok(RAM_BASE + 8));

    assert_eq!(elems(&ctx, 3), [0x4433_2211, 0xddcc_bbaa, 0, 0xff00_0000]);
}

#[test]
fn test_and_not_clears_selected_bits() {
    let mut ctx = configured("rv64gcv_zvbb");
    ctx.set_velems32(1, &[0xff, 0xff, 0xff, 0xff]);
    ctx.set_velems32(2, &[0x0f, 0xf0, 0, 0xff]);

    assert_eq!(run(&mut ctx, varith(opi::VANDN, OPIVV, 3, 1, 2, false)), Ok(RAM_BASE + 8));

    assert_eq!(elems(&ctx, 3), [0xf0, 0x0f, 0xff, 0]);
}

#[test]
fn test_zvbb_requires_its_extension() {
    let mut ctx = configured("rv64gcv");
    let word = varith(opi::VANDN, OPIVV, 3, 1, 2, false);

    assert_eq!(run(&mut ctx, word), Err(Trap::IllegalInstruction(u64::from(word))));
}

// ──────────────────────────────────────────────────────────
// Failed preconditions
// ──────────────────────────────────────────────────────────

#[test]
fn test_failed_precondition_leaves_state_untouched() {
    let mut ctx = configured("rv64gcv");
    ctx.set_velems32(2, &[5, 6, 7, 8]);
    ctx.set_velems32(3, &[9, 9, 9, 9]);
    let before = ctx.cpu.state.clone();

    // The narrow source v2 overlaps the bottom half of the wide destination v2..v3.
    let word = varith(opm::VWADDU, OPMVV, 2, 2, 1, false);

    assert_eq!(run(&mut ctx, word), Err(Trap::IllegalInstruction(u64::from(word))));
    assert_eq!(ctx.cpu.state, before);
}

#[test]
fn test_widening_beyond_elen_leaves_state_untouched() {
    let mut ctx = TestContext::with_isa("rv64gcv").load_program(&[vsetivli(0, 2, vtype(64, 0, true, true))]);
    ctx.retire(1);
    let before = ctx.cpu.state.clone();
    let word = varith(opm::VWADDU, OPMVV, 4, 1, 2, false);

    assert_eq!(run(&mut ctx, word), Err(Trap::IllegalInstruction(u64::from(word))));
    assert_eq!(ctx.cpu.state, before);
}
