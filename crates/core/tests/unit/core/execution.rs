//! # Execute Loop Tests
//!
//! Fetch, dispatch and commit through `Cpu::step` and `Cpu::run`, including
//! counters, `wfi` parking and the trace and memory collaborators.

use crate::common::builder::*;
use crate::common::harness::{DATA, RAM_BASE, TestContext, standard_registry};
use crate::common::mocks::{MockMemory, MockTracer, program_memory};
use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use rviss_core::core::arch::csr::{MCAUSE, MCYCLE, MEPC, MIE, MINSTRET, MIP_MTIP, MTVAL};
use rviss_core::core::cpu::{Halted, StepStatus};
use rviss_core::isa::opcodes::OP_SYSTEM;
use rviss_core::isa::privileged::cause::exception;
use rviss_core::isa::privileged::opcodes::{EBREAK, SFENCE_VMA_FUNCT7, WFI};
use rviss_core::soc::FlushScope;
use rviss_core::{Config, Cpu, Trap};

// ──────────────────────────────────────────────────────────
// Step and commit
// ──────────────────────────────────────────────────────────

#[test]
fn test_step_retires_and_advances_pc() {
    let mut ctx = TestContext::new().load_program(&[addi(10, 0, 42), addi(11, 10, -2)]);

    ctx.retire(2);

    assert_eq!(ctx.get_reg(10), 42);
    assert_eq!(ctx.get_reg(11), 40);
    assert_eq!(ctx.cpu.pc(), RAM_BASE + 8);
    assert_eq!(ctx.cpu.read_csr(MINSTRET), 2);
    assert_eq!(ctx.cpu.read_csr(MCYCLE), 2);
}

#[test]
fn test_writes_to_x0_are_dropped() {
    let mut ctx = TestContext::new().load_program(&[addi(0, 0, 7)]);
    ctx.retire(1);
    assert_eq!(ctx.get_reg(0), 0);
}

#[test]
fn test_unmatched_word_raises_illegal_instruction() {
    let mut ctx = TestContext::new().load_program(&[0xffff_ffff]);

    let status = ctx.step();

    assert_eq!(status, StepStatus::Trapped(Trap::IllegalInstruction(0xffff_ffff)));
    assert_eq!(ctx.cpu.read_csr(MINSTRET), 0);
    assert_eq!(ctx.cpu.read_csr(MCYCLE), 1);
}

#[test]
fn test_load_and_store_round_trip_through_memory() {
    let mut ctx = TestContext::new().load_program(&[sd(11, 10, 8), ld(12, 10, 8)]);
    ctx.set_reg(10, DATA);
    ctx.set_reg(11, 0x0123_4567_89ab_cdef);

    ctx.retire(2);

    assert_eq!(ctx.get_reg(12), 0x0123_4567_89ab_cdef);
    assert_eq!(ctx.read_u32(DATA + 8), 0x89ab_cdef);
}

#[test]
fn test_load_access_fault_reports_address() {
    let mut ctx = TestContext::new().load_program(&[ld(12, 10, 0)]);
    ctx.set_reg(10, DATA);
    ctx.ram.borrow_mut().inject_fault(DATA + 4);

    let status = ctx.step();

    assert_eq!(status, StepStatus::Trapped(Trap::LoadAccessFault(DATA)));
    assert_eq!(ctx.get_reg(12), 0);
}

#[test]
fn test_misaligned_jump_target_without_compressed() {
    let mut ctx = TestContext::with_isa("rv64ima").load_program(&[jal(0, 2)]);

    let status = ctx.step();

    assert_eq!(status, StepStatus::Trapped(Trap::InstructionAddressMisaligned(RAM_BASE + 2)));
}

// ──────────────────────────────────────────────────────────
// Run
// ──────────────────────────────────────────────────────────

#[test]
fn test_run_summary_counts_steps_retirements_and_traps() {
    // The trap vector is 0, outside RAM, so every step after the trap faults again.
    let mut ctx = TestContext::new().load_program(&[addi(10, 0, 1), addi(10, 10, 1), EBREAK]);

    let summary = ctx.cpu.run(5);

    assert_eq!(summary.steps, 5);
    assert_eq!(summary.retired, 2);
    assert_eq!(summary.traps, 3);
    assert_eq!(summary.halted, None);
    assert_eq!(ctx.get_reg(10), 2);
}

#[test]
fn test_run_stops_at_wfi() {
    let mut ctx = TestContext::new().load_program(&[addi(10, 0, 1), WFI, addi(10, 0, 2)]);

    let summary = ctx.cpu.run(10);

    assert_eq!(summary.halted, Some(Halted::Wfi));
    assert_eq!(summary.retired, 2);
    assert_eq!(ctx.get_reg(10), 1);
    assert!(ctx.cpu.is_waiting());
}

#[test]
fn test_wfi_resumes_on_pending_interrupt_even_when_globally_disabled() {
    let mut ctx = TestContext::new().load_program(&[WFI, addi(10, 0, 5)]);

    assert_eq!(ctx.step(), StepStatus::Halted(Halted::Wfi));
    assert_eq!(ctx.step(), StepStatus::Halted(Halted::Wfi));
    assert_eq!(ctx.cpu.pc(), RAM_BASE + 4);

    ctx.cpu.write_csr(MIE, MIP_MTIP);
    ctx.cpu.set_mip_bits(MIP_MTIP);

    // mstatus.MIE is clear in M-mode: the hart wakes without taking the trap.
    assert_eq!(ctx.step(), StepStatus::Retired);
    assert_eq!(ctx.get_reg(10), 5);
    assert!(!ctx.cpu.is_waiting());
}

// ──────────────────────────────────────────────────────────
// Trace collaborator
// ──────────────────────────────────────────────────────────

#[test]
fn test_tracer_sees_retirements_and_traps() {
    let mut tracer = MockTracer::new();
    let _ = tracer
        .expect_retired()
        .withf(|pc, _| *pc == RAM_BASE)
        .times(1)
        .return_const(());
    let _ = tracer
        .expect_trap()
        .with(eq(RAM_BASE + 4), eq(Trap::Breakpoint(RAM_BASE + 4)))
        .times(1)
        .return_const(());

    let mut ctx = TestContext::new()
        .load_program(&[addi(10, 0, 1), EBREAK])
        .with_tracer(Box::new(tracer));

    assert_eq!(ctx.step(), StepStatus::Retired);
    assert_eq!(ctx.step(), StepStatus::Trapped(Trap::Breakpoint(RAM_BASE + 4)));
}

#[test]
fn test_tracer_sees_data_accesses() {
    let mut tracer = MockTracer::new();
    let _ = tracer.expect_retired().return_const(());
    let _ = tracer
        .expect_mem_access()
        .withf(|access| access.addr == DATA && access.size == 8 && access.value == 0x55)
        .times(1)
        .return_const(());

    let mut ctx = TestContext::new()
        .load_program(&[sd(11, 10, 0)])
        .with_tracer(Box::new(tracer));
    ctx.set_reg(10, DATA);
    ctx.set_reg(11, 0x55);

    ctx.retire(1);
}

// ──────────────────────────────────────────────────────────
// Memory collaborator
// ──────────────────────────────────────────────────────────

/// `sfence.vma a0, zero`.
const SFENCE_VMA_A0: u32 = (SFENCE_VMA_FUNCT7 << 25) | (10 << 15) | OP_SYSTEM;

#[test]
fn test_sfence_vma_flushes_through_memory_collaborator() {
    let mut memory = program_memory(RAM_BASE, &[SFENCE_VMA_A0]);
    let _ = memory
        .expect_flush_tlb()
        .with(eq(FlushScope {
            addr: Some(DATA),
            space_id: None,
            guest: false,
        }))
        .times(1)
        .return_const(());
    let mut cpu = Cpu::new(&Config::default(), standard_registry(), Box::new(memory)).expect("hart builds");
    cpu.set_x(10, DATA);

    assert_eq!(cpu.step(), StepStatus::Retired);
    assert_eq!(cpu.pc(), RAM_BASE + 4);
}

#[test]
fn test_fetch_fault_from_memory_collaborator_is_trapped() {
    let mut memory = MockMemory::new();
    let _ = memory
        .expect_load()
        .returning(|addr, _, _| Err(Trap::InstructionAccessFault(addr)));
    let _ = memory.expect_yield_reservation().times(1).return_const(());
    let mut cpu = Cpu::new(&Config::default(), standard_registry(), Box::new(memory)).expect("hart builds");

    assert_eq!(cpu.step(), StepStatus::Trapped(Trap::InstructionAccessFault(RAM_BASE)));
    assert_eq!(cpu.read_csr(MCAUSE), exception::INSTRUCTION_ACCESS_FAULT);
    assert_eq!(cpu.read_csr(MTVAL), RAM_BASE);
    assert_eq!(cpu.read_csr(MEPC), RAM_BASE);
    assert_eq!(cpu.read_csr(MINSTRET), 0);
}
