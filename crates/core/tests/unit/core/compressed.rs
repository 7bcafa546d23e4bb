//! # Compressed Instruction Tests

use crate::common::harness::{RAM_BASE, TestContext};
use pretty_assertions::assert_eq;
use rviss_core::Trap;
use rviss_core::core::arch::csr::MISA;
use rviss_core::core::cpu::StepStatus;
use rviss_core::isa::isa_string::misa_bit;

/// `c.add a0, a1`
const C_ADD_A0_A1: u16 = 0x952e;
/// `c.addi a0, 1`
const C_ADDI_A0_1: u16 = 0x0505;

#[test]
fn test_compressed_instructions_advance_pc_by_two() {
    let mut ctx = TestContext::new().load_parcels(&[C_ADD_A0_A1, C_ADDI_A0_1]);
    ctx.set_reg(10, 5);
    ctx.set_reg(11, 7);

    ctx.retire(1);
    assert_eq!(ctx.get_reg(10), 12);
    assert_eq!(ctx.cpu.pc(), RAM_BASE + 2);

    ctx.retire(1);
    assert_eq!(ctx.get_reg(10), 13);
    assert_eq!(ctx.cpu.pc(), RAM_BASE + 4);
}

#[test]
fn test_clearing_c_in_misa_disables_compressed_decoding() {
    let mut ctx = TestContext::new().load_parcels(&[C_ADDI_A0_1]);
    let misa = ctx.cpu.read_csr(MISA);

    ctx.cpu.write_csr(MISA, misa & !misa_bit('c'));

    assert!(!ctx.cpu.enabled().contains("c"));
    assert_eq!(
        ctx.step(),
        StepStatus::Trapped(Trap::IllegalInstruction(u64::from(C_ADDI_A0_1)))
    );
}

#[test]
fn test_clearing_c_is_refused_when_next_fetch_would_misalign() {
    let mut ctx = TestContext::new();
    ctx.cpu.state.pc = RAM_BASE + 2;
    let misa = ctx.cpu.read_csr(MISA);

    ctx.cpu.write_csr(MISA, misa & !misa_bit('c'));

    assert_eq!(ctx.cpu.read_csr(MISA), misa);
    assert!(ctx.cpu.enabled().contains("c"));
}

#[test]
fn test_all_zero_parcel_is_illegal() {
    let mut ctx = TestContext::new().load_parcels(&[0x0000]);

    assert_eq!(ctx.step(), StepStatus::Trapped(Trap::IllegalInstruction(0)));
}
