//! # Debug Mode Tests
//!
//! Entry through `ebreak`, single-step and halt requests, exceptions while
//! halted, and `dret`.

use crate::common::builder::{addi, csrr, csrw};
use crate::common::harness::{RAM_BASE, TestContext};
use pretty_assertions::assert_eq;
use rviss_core::Config;
use rviss_core::Trap;
use rviss_core::core::arch::csr::*;
use rviss_core::core::arch::mode::PrivilegeMode;
use rviss_core::core::cpu::StepStatus;
use rviss_core::isa::Insn;
use rviss_core::isa::privileged::cause::debug;
use rviss_core::isa::privileged::opcodes::{DRET, EBREAK};

const DEBUG_ENTRY: u64 = RAM_BASE + 0x800;
const DEBUG_EXCEPTION: u64 = RAM_BASE + 0x900;

fn debug_config(attached: bool) -> Config {
    let mut config = Config::default();
    config.trap.debugger_attached = attached;
    config.trap.debug_entry = DEBUG_ENTRY;
    config.trap.debug_exception_entry = DEBUG_EXCEPTION;
    config
}

fn dcsr_cause(ctx: &TestContext) -> u64 {
    (ctx.cpu.read_csr(DCSR) & DCSR_CAUSE) >> DCSR_CAUSE_SHIFT
}

#[test]
fn test_ebreak_with_debugger_attached_enters_debug_mode() {
    let mut ctx = TestContext::with_config(debug_config(true)).load_program(&[EBREAK]);

    let status = ctx.step();

    assert_eq!(status, StepStatus::Trapped(Trap::Breakpoint(RAM_BASE)));
    assert!(ctx.cpu.state.debug_mode);
    assert_eq!(ctx.cpu.pc(), DEBUG_ENTRY);
    assert_eq!(ctx.cpu.read_csr(DPC), RAM_BASE);
    assert_eq!(dcsr_cause(&ctx), debug::EBREAK);
    assert_eq!(ctx.cpu.read_csr(DCSR) & DCSR_PRV, PrivilegeMode::Machine.to_bits());
    assert_eq!(ctx.cpu.read_csr(MCAUSE), 0);
}

#[test]
fn test_debugger_program_steps_over_ebreak_and_resumes() {
    let mut ctx = TestContext::with_config(debug_config(true)).load_program(&[EBREAK, addi(11, 0, 9)]);
    ctx.write_u32s(DEBUG_ENTRY, &[csrr(10, DPC), addi(10, 10, 4), csrw(DPC, 10), DRET]);

    let _ = ctx.step();
    ctx.retire(4);

    assert!(!ctx.cpu.state.debug_mode);
    assert_eq!(ctx.cpu.pc(), RAM_BASE + 4);
    ctx.retire(1);
    assert_eq!(ctx.get_reg(11), 9);
}

#[test]
fn test_ebreak_without_debugger_raises_breakpoint() {
    let mut ctx = TestContext::with_config(debug_config(false)).load_program(&[EBREAK]);

    let _ = ctx.step();

    assert!(!ctx.cpu.state.debug_mode);
    assert_eq!(ctx.cpu.read_csr(MCAUSE), 3);
    assert_eq!(ctx.cpu.read_csr(MTVAL), RAM_BASE);
}

#[test]
fn test_dcsr_ebreakm_routes_ebreak_to_debug_mode() {
    let mut ctx = TestContext::with_config(debug_config(false)).load_program(&[EBREAK]);
    let dcsr = ctx.cpu.read_csr(DCSR) | DCSR_EBREAKM;
    ctx.cpu.write_csr(DCSR, dcsr);

    let _ = ctx.step();

    assert!(ctx.cpu.state.debug_mode);
    assert_eq!(ctx.cpu.pc(), DEBUG_ENTRY);
}

#[test]
fn test_exception_in_debug_mode_goes_to_exception_entry() {
    let mut ctx = TestContext::with_config(debug_config(true)).load_program(&[EBREAK]);
    ctx.write_u32s(DEBUG_ENTRY, &[0xffff_ffff]);
    let _ = ctx.step();
    let mcause = ctx.cpu.read_csr(MCAUSE);
    let dpc = ctx.cpu.read_csr(DPC);

    let status = ctx.step();

    assert_eq!(status, StepStatus::Trapped(Trap::IllegalInstruction(0xffff_ffff)));
    assert!(ctx.cpu.state.debug_mode);
    assert_eq!(ctx.cpu.pc(), DEBUG_EXCEPTION);
    assert_eq!(ctx.cpu.read_csr(MCAUSE), mcause);
    assert_eq!(ctx.cpu.read_csr(DPC), dpc);
}

#[test]
fn test_single_step_enters_debug_mode_after_one_instruction() {
    let mut ctx = TestContext::with_config(debug_config(false))
        .load_program(&[addi(10, 0, 1), addi(10, 10, 1)]);
    let dcsr = ctx.cpu.read_csr(DCSR) | DCSR_STEP;
    ctx.cpu.write_csr(DCSR, dcsr);

    assert_eq!(ctx.step(), StepStatus::Retired);

    assert_eq!(ctx.get_reg(10), 1);
    assert!(ctx.cpu.state.debug_mode);
    assert_eq!(dcsr_cause(&ctx), debug::STEP);
    assert_eq!(ctx.cpu.read_csr(DPC), RAM_BASE + 4);
    assert_eq!(ctx.cpu.pc(), DEBUG_ENTRY);
}

#[test]
fn test_halt_request_saves_current_pc() {
    let mut ctx = TestContext::with_config(debug_config(false)).load_program(&[addi(10, 0, 1)]);

    ctx.cpu.request_halt();

    assert!(ctx.cpu.state.debug_mode);
    assert_eq!(dcsr_cause(&ctx), debug::HALT_REQUEST);
    assert_eq!(ctx.cpu.read_csr(DPC), RAM_BASE);
}

#[test]
fn test_interrupts_are_masked_in_debug_mode() {
    let mut ctx = TestContext::with_config(debug_config(false));
    ctx.cpu.state.privilege = PrivilegeMode::User;
    ctx.cpu.write_csr(MIE, MIP_MTIP);
    ctx.cpu.set_mip_bits(MIP_MTIP);
    ctx.cpu.request_halt();

    assert_eq!(ctx.cpu.pending_interrupt(), None);
}

#[test]
fn test_dret_outside_debug_mode_is_illegal() {
    let mut ctx = TestContext::new();

    let result = ctx.cpu.execute(Insn::from(DRET), RAM_BASE);

    assert_eq!(result, Err(Trap::IllegalInstruction(u64::from(DRET))));
}

#[test]
fn test_dret_restores_privilege_from_dcsr() {
    let mut ctx = TestContext::with_config(debug_config(false));
    ctx.cpu.request_halt();
    let dcsr = (ctx.cpu.read_csr(DCSR) & !DCSR_PRV) | PrivilegeMode::User.to_bits();
    ctx.cpu.write_csr(DCSR, dcsr);
    ctx.cpu.write_csr(DPC, RAM_BASE + 0x20);

    let result = ctx.cpu.execute(Insn::from(DRET), DEBUG_ENTRY);

    assert_eq!(result, Ok(RAM_BASE + 0x20));
    assert!(!ctx.cpu.state.debug_mode);
    assert_eq!(ctx.cpu.state.privilege, PrivilegeMode::User);
}
