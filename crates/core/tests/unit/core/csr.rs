//! # CSR Access Tests
//!
//! Privilege, existence and unit gating of CSR instructions, the register
//! views and WARL legalization.

use crate::common::builder::{csrr, csrrs, csrrw, csrw};
use crate::common::harness::{RAM_BASE, TestContext};
use pretty_assertions::assert_eq;
use rviss_core::Config;
use rviss_core::Trap;
use rviss_core::core::arch::csr::*;
use rviss_core::core::arch::mode::PrivilegeMode;
use rviss_core::isa::Insn;
use rviss_core::isa::isa_string::misa_bit;
use rstest::rstest;

fn run(ctx: &mut TestContext, word: u32) -> Result<u64, Trap> {
    ctx.cpu.execute(Insn::from(word), RAM_BASE)
}

fn illegal(word: u32) -> Result<u64, Trap> {
    Err(Trap::IllegalInstruction(u64::from(word)))
}

// ──────────────────────────────────────────────────────────
// Instruction semantics
// ──────────────────────────────────────────────────────────

#[test]
fn test_csrrw_swaps_register_and_csr() {
    let mut ctx = TestContext::new();
    ctx.cpu.write_csr(MSCRATCH, 0x1111);
    ctx.set_reg(11, 0x2222);

    assert_eq!(run(&mut ctx, csrrw(10, MSCRATCH, 11)), Ok(RAM_BASE + 4));

    assert_eq!(ctx.get_reg(10), 0x1111);
    assert_eq!(ctx.cpu.read_csr(MSCRATCH), 0x2222);
}

#[test]
fn test_csrrs_sets_bits() {
    let mut ctx = TestContext::new();
    ctx.cpu.write_csr(MSCRATCH, 0b0101);
    ctx.set_reg(11, 0b0010);

    let _ = run(&mut ctx, csrrs(10, MSCRATCH, 11));

    assert_eq!(ctx.get_reg(10), 0b0101);
    assert_eq!(ctx.cpu.read_csr(MSCRATCH), 0b0111);
}

#[test]
fn test_hart_id_comes_from_configuration() {
    let mut config = Config::default();
    config.general.hart_id = 3;
    let mut ctx = TestContext::with_config(config);

    let _ = run(&mut ctx, csrr(10, MHARTID));

    assert_eq!(ctx.get_reg(10), 3);
}

// ──────────────────────────────────────────────────────────
// Access control
// ──────────────────────────────────────────────────────────

#[test]
fn test_read_only_csr_is_readable_but_not_writable() {
    let mut ctx = TestContext::new();
    assert!(run(&mut ctx, csrr(10, MVENDORID)).is_ok());
    assert_eq!(run(&mut ctx, csrw(MVENDORID, 10)), illegal(csrw(MVENDORID, 10)));
}

#[rstest]
#[case::mstatus_from_user(PrivilegeMode::User, MSTATUS)]
#[case::mepc_from_supervisor(PrivilegeMode::Supervisor, MEPC)]
#[case::sstatus_from_user(PrivilegeMode::User, SSTATUS)]
fn test_csr_above_current_privilege_is_illegal(#[case] privilege: PrivilegeMode, #[case] csr: u16) {
    let mut ctx = TestContext::new();
    ctx.cpu.state.privilege = privilege;

    assert_eq!(run(&mut ctx, csrr(10, csr)), illegal(csrr(10, csr)));
}

#[test]
fn test_supervisor_reads_its_own_csrs() {
    let mut ctx = TestContext::new();
    ctx.cpu.state.privilege = PrivilegeMode::Supervisor;
    assert!(run(&mut ctx, csrr(10, SSTATUS)).is_ok());
}

#[test]
fn test_absent_csr_is_illegal() {
    let mut ctx = TestContext::new();
    assert_eq!(run(&mut ctx, csrr(10, 0x7ff)), illegal(csrr(10, 0x7ff)));
}

#[test]
fn test_csr_of_unconfigured_extension_is_illegal() {
    let mut ctx = TestContext::with_isa("rv64imac");
    assert_eq!(run(&mut ctx, csrr(10, FFLAGS)), illegal(csrr(10, FFLAGS)));
}

#[test]
fn test_debug_csrs_only_in_debug_mode() {
    let mut ctx = TestContext::new();
    assert_eq!(run(&mut ctx, csrr(10, DCSR)), illegal(csrr(10, DCSR)));

    ctx.cpu.state.debug_mode = true;
    assert!(run(&mut ctx, csrr(10, DCSR)).is_ok());
    assert_ne!(ctx.get_reg(10) & DCSR_XDEBUGVER, 0);
}

#[test]
fn test_vector_csrs_need_vector_unit_on() {
    let mut ctx = TestContext::with_isa("rv64gcv");
    assert!(run(&mut ctx, csrr(10, VLENB)).is_ok());
    assert_eq!(ctx.get_reg(10), 16);

    let status = ctx.cpu.read_csr(MSTATUS) & !MSTATUS_VS;
    ctx.cpu.write_csr(MSTATUS, status);

    assert_eq!(run(&mut ctx, csrr(10, VL)), illegal(csrr(10, VL)));
}

#[test]
fn test_float_csrs_need_fpu_on() {
    let mut ctx = TestContext::new();
    let status = ctx.cpu.read_csr(MSTATUS) & !MSTATUS_FS;
    ctx.cpu.write_csr(MSTATUS, status);

    assert_eq!(run(&mut ctx, csrr(10, FCSR)), illegal(csrr(10, FCSR)));
}

// ──────────────────────────────────────────────────────────
// Counters
// ──────────────────────────────────────────────────────────

#[test]
fn test_cycle_counter_gated_by_counter_enables() {
    let mut ctx = TestContext::new();
    ctx.cpu.write_csr(MCYCLE, 1234);
    assert_eq!(run(&mut ctx, csrr(10, CYCLE)), Ok(RAM_BASE + 4));
    assert_eq!(ctx.get_reg(10), 1234);

    ctx.cpu.state.privilege = PrivilegeMode::User;
    assert_eq!(run(&mut ctx, csrr(10, CYCLE)), illegal(csrr(10, CYCLE)));

    ctx.cpu.write_csr(MCOUNTEREN, 1);
    assert_eq!(run(&mut ctx, csrr(10, CYCLE)), illegal(csrr(10, CYCLE)));

    ctx.cpu.write_csr(SCOUNTEREN, 1);
    assert!(run(&mut ctx, csrr(10, CYCLE)).is_ok());
    assert_eq!(run(&mut ctx, csrr(10, INSTRET)), illegal(csrr(10, INSTRET)));
}

#[test]
fn test_instret_mirrors_minstret() {
    let mut ctx = TestContext::new();
    ctx.cpu.write_csr(MINSTRET, 99);
    assert_eq!(ctx.cpu.read_csr(INSTRET), 99);
}

// ──────────────────────────────────────────────────────────
// Views and legalization
// ──────────────────────────────────────────────────────────

#[test]
fn test_fcsr_is_a_view_of_frm_and_fflags() {
    let mut ctx = TestContext::new();
    ctx.set_reg(11, (0b010 << 5) | 0x1f);

    let _ = run(&mut ctx, csrw(FCSR, 11));

    assert_eq!(ctx.cpu.read_csr(FRM), 0b010);
    assert_eq!(ctx.cpu.read_csr(FFLAGS), 0x1f);
    let status = ctx.cpu.read_csr(MSTATUS);
    assert_eq!(status & MSTATUS_FS, MSTATUS_FS);
    assert_ne!(status & MSTATUS_SD, 0);
}

#[test]
fn test_sstatus_is_a_restricted_view_of_mstatus() {
    let mut ctx = TestContext::new();
    ctx.cpu.write_csr(SSTATUS, MSTATUS_SIE | MSTATUS_MIE);

    let mstatus = ctx.cpu.read_csr(MSTATUS);
    assert_ne!(mstatus & MSTATUS_SIE, 0);
    assert_eq!(mstatus & MSTATUS_MIE, 0);
    assert_eq!(ctx.cpu.read_csr(SSTATUS) & MSTATUS_MPP, 0);
}

#[test]
fn test_mtvec_reserved_mode_is_dropped() {
    let mut ctx = TestContext::new();
    ctx.cpu.write_csr(MTVEC, 0x8000_0102);
    assert_eq!(ctx.cpu.read_csr(MTVEC), 0x8000_0100);
}

#[test]
fn test_mepc_low_bit_is_cleared() {
    let mut ctx = TestContext::new();
    ctx.cpu.write_csr(MEPC, 0x8000_0003);
    assert_eq!(ctx.cpu.read_csr(MEPC), 0x8000_0002);
}

#[test]
fn test_mpp_rejects_unimplemented_level() {
    let mut config = Config::default();
    config.isa.priv_levels = "mu".to_string();
    let mut ctx = TestContext::with_config(config);
    let status = ctx.cpu.read_csr(MSTATUS) & !MSTATUS_MPP;
    ctx.cpu.write_csr(MSTATUS, status);

    let status = ctx.cpu.read_csr(MSTATUS) | (PrivilegeMode::Supervisor.to_bits() << MSTATUS_MPP_SHIFT);
    ctx.cpu.write_csr(MSTATUS, status);

    assert_eq!(ctx.cpu.read_csr(MSTATUS) & MSTATUS_MPP, 0);
}

#[test]
fn test_mip_software_writes_limited_to_supervisor_bits() {
    let mut ctx = TestContext::new();
    ctx.cpu.write_csr(MIP, MIP_MTIP | MIP_SSIP);
    assert_eq!(ctx.cpu.read_csr(MIP), MIP_SSIP);
}

#[test]
fn test_clearing_f_in_misa_also_clears_d() {
    let mut ctx = TestContext::new();
    let misa = ctx.cpu.read_csr(MISA);

    ctx.cpu.write_csr(MISA, misa & !misa_bit('f'));

    let misa = ctx.cpu.read_csr(MISA);
    assert_eq!(misa & misa_bit('f'), 0);
    assert_eq!(misa & misa_bit('d'), 0);
    assert!(!ctx.cpu.enabled().contains("d"));
}

#[test]
fn test_misa_cannot_enable_unconfigured_extension() {
    let mut ctx = TestContext::with_isa("rv64imac");
    let misa = ctx.cpu.read_csr(MISA);

    ctx.cpu.write_csr(MISA, misa | misa_bit('v'));

    assert_eq!(ctx.cpu.read_csr(MISA), misa);
}
