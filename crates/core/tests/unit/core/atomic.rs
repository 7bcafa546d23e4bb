//! # Atomic Memory Operation Tests

use crate::common::builder::{amoadd_d, ld, lr_d, sc_d, sd};
use crate::common::harness::{DATA, RAM_BASE, TestContext};
use pretty_assertions::assert_eq;
use rviss_core::Trap;
use rviss_core::core::arch::csr::MEPC;
use rviss_core::core::cpu::StepStatus;

#[test]
fn test_store_conditional_succeeds_once_after_load_reserved() {
    let mut ctx = TestContext::new().load_program(&[
        lr_d(10, 5),
        sc_d(11, 6, 5),
        sc_d(12, 6, 5),
        ld(13, 5, 0),
    ]);
    ctx.set_reg(5, DATA);
    ctx.set_reg(6, 0xabcd);

    ctx.retire(4);

    assert_eq!(ctx.get_reg(11), 0);
    assert_eq!(ctx.get_reg(12), 1);
    assert_eq!(ctx.get_reg(13), 0xabcd);
}

#[test]
fn test_intervening_store_breaks_reservation() {
    let mut ctx = TestContext::new().load_program(&[lr_d(10, 5), sd(7, 5, 0), sc_d(11, 6, 5), ld(13, 5, 0)]);
    ctx.set_reg(5, DATA);
    ctx.set_reg(6, 0xabcd);
    ctx.set_reg(7, 0x1234);

    ctx.retire(4);

    assert_eq!(ctx.get_reg(11), 1);
    assert_eq!(ctx.get_reg(13), 0x1234);
}

#[test]
fn test_amoadd_returns_old_value_and_adds() {
    let mut ctx = TestContext::new().load_program(&[sd(6, 5, 0), amoadd_d(10, 7, 5), ld(11, 5, 0)]);
    ctx.set_reg(5, DATA);
    ctx.set_reg(6, 40);
    ctx.set_reg(7, 2);

    ctx.retire(3);

    assert_eq!(ctx.get_reg(10), 40);
    assert_eq!(ctx.get_reg(11), 42);
}

#[test]
fn test_misaligned_amo_raises_store_misaligned() {
    let mut ctx = TestContext::new().load_program(&[amoadd_d(10, 7, 5)]);
    ctx.set_reg(5, DATA + 4);

    assert_eq!(
        ctx.step(),
        StepStatus::Trapped(Trap::StoreAddressMisaligned(DATA + 4))
    );
    assert_eq!(ctx.cpu.pc(), 0);
    assert_eq!(ctx.cpu.read_csr(MEPC), RAM_BASE);
}
