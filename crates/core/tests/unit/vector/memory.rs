//! # Vector Memory Tests
//!
//! Unit-stride, fault-only-first and indexed loads and stores, and
//! resumption of a load from `vstart` after an element fault.

use crate::common::builder::{vle, vle_ff, vluxei, vse, vsetivli, vsoxei, vtype};
use crate::common::harness::{DATA, RAM_BASE, TestContext};
use pretty_assertions::assert_eq;
use rviss_core::Trap;
use rviss_core::core::arch::csr::{VL, VSTART};
use rviss_core::isa::Insn;

fn configured() -> TestContext {
    let mut ctx = TestContext::with_isa("rv64gcv").load_program(&[vsetivli(0, 4, vtype(32, 0, true, true))]);
    ctx.retire(1);
    ctx.set_reg(5, DATA);
    ctx
}

fn elems(ctx: &TestContext, reg: usize) -> Vec<u32> {
    (0..4).map(|i| ctx.velem32(reg, i)).collect()
}

#[test]
fn test_unit_stride_load() {
    let mut ctx = configured();
    ctx.write_u32s(DATA, &[1, 2, 3, 4]);

    let result = ctx.cpu.execute(Insn::from(vle(32, 8, 5)), RAM_BASE);

    assert_eq!(result, Ok(RAM_BASE + 4));
    assert_eq!(elems(&ctx, 8), [1, 2, 3, 4]);
    assert_eq!(ctx.cpu.read_csr(VSTART), 0);
}

#[test]
fn test_unit_stride_store() {
    let mut ctx = configured();
    ctx.set_velems32(8, &[0xa, 0xb, 0xc, 0xd]);

    let result = ctx.cpu.execute(Insn::from(vse(32, 8, 5)), RAM_BASE);

    assert_eq!(result, Ok(RAM_BASE + 4));
    assert_eq!(ctx.read_u32(DATA), 0xa);
    assert_eq!(ctx.read_u32(DATA + 12), 0xd);
}

#[test]
fn test_faulting_element_records_vstart_and_resumes() {
    let mut ctx = configured();
    ctx.write_u32s(DATA, &[1, 2, 3, 4]);
    ctx.ram.borrow_mut().inject_fault(DATA + 8);
    let insn = Insn::from(vle(32, 8, 5));

    let result = ctx.cpu.execute(insn, RAM_BASE);

    assert_eq!(result, Err(Trap::LoadAccessFault(DATA + 8)));
    assert_eq!(ctx.cpu.read_csr(VSTART), 2);
    assert_eq!(ctx.velem32(8, 0), 1);
    assert_eq!(ctx.velem32(8, 1), 2);

    // Completed elements are not reloaded on resumption.
    ctx.ram.borrow_mut().clear_faults();
    ctx.write_u32s(DATA, &[99]);
    let result = ctx.cpu.execute(insn, RAM_BASE);

    assert_eq!(result, Ok(RAM_BASE + 4));
    assert_eq!(elems(&ctx, 8), [1, 2, 3, 4]);
    assert_eq!(ctx.cpu.read_csr(VSTART), 0);
}

#[test]
fn test_faulting_store_records_vstart() {
    let mut ctx = configured();
    ctx.set_velems32(8, &[0xa, 0xb, 0xc, 0xd]);
    ctx.ram.borrow_mut().inject_fault(DATA + 4);

    let result = ctx.cpu.execute(Insn::from(vse(32, 8, 5)), RAM_BASE);

    assert_eq!(result, Err(Trap::StoreAccessFault(DATA + 4)));
    assert_eq!(ctx.cpu.read_csr(VSTART), 1);
    assert_eq!(ctx.read_u32(DATA), 0xa);
}

// ──────────────────────────────────────────────────────────
// Fault-only-first
// ──────────────────────────────────────────────────────────

#[test]
fn test_fault_only_first_trims_vl_past_element_zero() {
    let mut ctx = configured();
    ctx.write_u32s(DATA, &[1, 2, 3, 4]);
    ctx.set_velems32(8, &[9, 9, 9, 9]);
    ctx.ram.borrow_mut().inject_fault(DATA + 8);

    let result = ctx.cpu.execute(Insn::from(vle_ff(32, 8, 5)), RAM_BASE);

    assert_eq!(result, Ok(RAM_BASE + 4));
    assert_eq!(ctx.cpu.read_csr(VL), 2);
    assert_eq!(ctx.cpu.read_csr(VSTART), 0);
    assert_eq!(ctx.velem32(8, 0), 1);
    assert_eq!(ctx.velem32(8, 1), 2);
}

#[test]
fn test_fault_only_first_traps_on_element_zero() {
    let mut ctx = configured();
    ctx.ram.borrow_mut().inject_fault(DATA);

    let result = ctx.cpu.execute(Insn::from(vle_ff(32, 8, 5)), RAM_BASE);

    assert_eq!(result, Err(Trap::LoadAccessFault(DATA)));
    assert_eq!(ctx.cpu.read_csr(VL), 4);
    assert_eq!(ctx.cpu.read_csr(VSTART), 0);
}

#[test]
fn test_fault_only_first_without_fault_keeps_vl() {
    let mut ctx = configured();
    ctx.write_u32s(DATA, &[5, 6, 7, 8]);

    let result = ctx.cpu.execute(Insn::from(vle_ff(32, 8, 5)), RAM_BASE);

    assert_eq!(result, Ok(RAM_BASE + 4));
    assert_eq!(ctx.cpu.read_csr(VL), 4);
    assert_eq!(elems(&ctx, 8), [5, 6, 7, 8]);
}

// ──────────────────────────────────────────────────────────
// Indexed
// ──────────────────────────────────────────────────────────

#[test]
fn test_indexed_load_gathers_by_byte_offset() {
    let mut ctx = configured();
    ctx.write_u32s(DATA, &[1, 2, 3, 4]);
    ctx.set_velems32(2, &[12, 0, 8, 4]);

    let result = ctx.cpu.execute(Insn::from(vluxei(32, 8, 5, 2)), RAM_BASE);

    assert_eq!(result, Ok(RAM_BASE + 4));
    assert_eq!(elems(&ctx, 8), [4, 1, 3, 2]);
}

#[test]
fn test_indexed_store_scatters_by_byte_offset() {
    let mut ctx = configured();
    ctx.set_velems32(8, &[0xa, 0xb, 0xc, 0xd]);
    ctx.set_velems32(2, &[4, 0, 12, 8]);

    let result = ctx.cpu.execute(Insn::from(vsoxei(32, 8, 5, 2)), RAM_BASE);

    assert_eq!(result, Ok(RAM_BASE + 4));
    let stored: Vec<u32> = (0..4).map(|i| ctx.read_u32(DATA + 4 * i)).collect();
    assert_eq!(stored, [0xb, 0xa, 0xd, 0xc]);
}

#[test]
fn test_indexed_load_records_vstart_on_fault() {
    let mut ctx = configured();
    ctx.set_velems32(2, &[0, 4, 8, 12]);
    ctx.ram.borrow_mut().inject_fault(DATA + 8);

    let result = ctx.cpu.execute(Insn::from(vluxei(32, 8, 5, 2)), RAM_BASE);

    assert_eq!(result, Err(Trap::LoadAccessFault(DATA + 8)));
    assert_eq!(ctx.cpu.read_csr(VSTART), 2);
}

#[test]
fn test_indexed_load_rejects_narrow_index_under_destination() {
    let mut ctx = configured();
    let word = vluxei(8, 2, 5, 2);

    let result = ctx.cpu.execute(Insn::from(word), RAM_BASE);

    assert_eq!(result, Err(Trap::IllegalInstruction(u64::from(word))));
}
