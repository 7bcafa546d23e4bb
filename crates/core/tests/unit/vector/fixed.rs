//! # Vector Fixed-Point Tests
//!
//! Averaging under each `vxrm` rounding mode and `vxsat` on saturation.

use crate::common::builder::{varith, vsetivli, vtype};
use crate::common::harness::TestContext;
use pretty_assertions::assert_eq;
use rviss_core::core::arch::csr::{VXRM, VXSAT};
use rviss_core::isa::rvv::category::{OPIVV, OPMVV};
use rviss_core::isa::rvv::{opi, opm};
use rstest::rstest;

const RNU: u64 = 0b00;
const RNE: u64 = 0b01;
const RDN: u64 = 0b10;
const ROD: u64 = 0b11;

fn run(sew: u32, word: u32) -> TestContext {
    TestContext::with_isa("rv64gcv").load_program(&[vsetivli(0, 4, vtype(sew, 0, true, true)), word])
}

/// `vaadd.vv` on `1 + 4`: the halved sum 2.5 sits on a tie between 2 and 3.
#[rstest]
#[case::round_to_nearest_up(RNU, 3)]
#[case::round_to_nearest_even(RNE, 2)]
#[case::round_down(RDN, 2)]
#[case::round_to_odd(ROD, 3)]
fn test_averaging_add_rounds_per_vxrm(#[case] vxrm: u64, #[case] expected: u32) {
    let mut ctx = run(32, varith(opm::VAADD, OPMVV, 1, 2, 3, false));
    ctx.set_velems32(2, &[1, 1, 1, 1]);
    ctx.set_velems32(3, &[4, 4, 4, 4]);
    ctx.cpu.write_csr(VXRM, vxrm);

    ctx.retire(2);

    assert_eq!(ctx.velem32(1, 0), expected);
    assert_eq!(ctx.velem32(1, 3), expected);
}

#[test]
fn test_exact_average_ignores_rounding_mode() {
    let mut ctx = run(32, varith(opm::VAADD, OPMVV, 1, 2, 3, false));
    ctx.set_velems32(2, &[2, 2, 2, 2]);
    ctx.set_velems32(3, &[4, 4, 4, 4]);
    ctx.cpu.write_csr(VXRM, ROD);

    ctx.retire(2);

    assert_eq!(ctx.velem32(1, 0), 3);
}

#[test]
fn test_saturating_add_clamps_and_sets_vxsat() {
    let mut ctx = run(8, varith(opi::VSADDU, OPIVV, 1, 2, 3, false));
    ctx.set_vreg(2, &[0xf0, 1, 2, 3]);
    ctx.set_vreg(3, &[0x20, 2, 2, 2]);

    ctx.retire(2);

    assert_eq!(ctx.vreg(1)[..4], [0xff, 3, 4, 5]);
    assert_eq!(ctx.cpu.read_csr(VXSAT), 1);
}

#[test]
fn test_saturating_add_without_overflow_leaves_vxsat_clear() {
    let mut ctx = run(8, varith(opi::VSADDU, OPIVV, 1, 2, 3, false));
    ctx.set_vreg(2, &[0x10, 1, 2, 3]);
    ctx.set_vreg(3, &[0x20, 2, 2, 2]);

    ctx.retire(2);

    assert_eq!(ctx.vreg(1)[..4], [0x30, 3, 4, 5]);
    assert_eq!(ctx.cpu.read_csr(VXSAT), 0);
}
