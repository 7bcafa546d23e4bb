//! Main Execution Loop.
//!
//! This module implements the execute cycle of the CPU. It performs the following:
//! 1. **Interrupts:** Takes the highest-priority enabled interrupt between instructions.
//! 2. **Fetch and Dispatch:** Fetches one instruction and invokes the handler the dispatch
//!    table resolves for it.
//! 3. **Commit:** Advances the PC and `minstret` on success, or enters the trap model.
//! 4. **Halting:** Reports a hart parked in `wfi`, and single-step entry into debug mode.

use super::Cpu;
use crate::common::error::Trap;
use crate::core::arch::csr::{DCSR, DCSR_STEP, MCYCLE, MIE, MINSTRET, MIP};
use crate::isa::Insn;
use crate::isa::privileged::cause::debug;

/// Why the hart stopped making progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Halted {
    /// Parked in `wfi` with no enabled interrupt pending.
    Wfi,
}

/// Outcome of one [`Cpu::step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepStatus {
    /// One instruction completed.
    Retired,
    /// A trap (exception or interrupt) was taken.
    Trapped(Trap),
    /// Nothing was executed.
    Halted(Halted),
}

/// Totals for one [`Cpu::run`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Steps taken.
    pub steps: u64,
    /// Instructions retired.
    pub retired: u64,
    /// Traps taken.
    pub traps: u64,
    /// Set when the run ended early.
    pub halted: Option<Halted>,
}

impl Cpu {
    /// Executes one instruction, or takes one interrupt.
    pub fn step(&mut self) -> StepStatus {
        if self.wfi {
            if !self.interrupt_waiting() {
                return StepStatus::Halted(Halted::Wfi);
            }
            self.wfi = false;
        }

        let pc = self.state.pc;
        if let Some(irq) = self.pending_interrupt() {
            self.take_trap(irq, pc);
            self.tick();
            return StepStatus::Trapped(irq);
        }

        let in_debug = self.state.debug_mode;
        let outcome = self
            .fetch(pc)
            .and_then(|insn| self.execute(insn, pc).map(|next| (insn, next)));
        let status = match outcome {
            Ok((insn, next)) => {
                self.retire(insn, pc, next, in_debug);
                if self.wfi && !self.interrupt_waiting() {
                    StepStatus::Halted(Halted::Wfi)
                } else {
                    self.wfi = false;
                    StepStatus::Retired
                }
            }
            Err(trap) => {
                self.take_trap(trap, pc);
                StepStatus::Trapped(trap)
            }
        };
        self.tick();
        status
    }

    /// Runs `insn` as if fetched from `pc`, without trap entry or commit.
    ///
    /// Returns the next PC; the caller decides what to do with a trap.
    ///
    /// # Errors
    ///
    /// The trap the handler raised, illegal-instruction for unmatched words.
    pub fn execute(&mut self, insn: Insn, pc: u64) -> Result<u64, Trap> {
        let handler = self.dispatch.resolve(insn);
        handler(self, insn, pc)
    }

    /// Steps until `max_steps` or until the hart halts.
    pub fn run(&mut self, max_steps: u64) -> RunSummary {
        let retired_before = self.state.csrs.get(MINSTRET);
        let mut summary = RunSummary::default();
        while summary.steps < max_steps {
            let status = self.step();
            summary.steps += 1;
            match status {
                StepStatus::Retired => {}
                StepStatus::Trapped(_) => summary.traps += 1,
                StepStatus::Halted(why) => {
                    summary.halted = Some(why);
                    break;
                }
            }
        }
        summary.retired = self.state.csrs.get(MINSTRET).wrapping_sub(retired_before);
        tracing::debug!(
            steps = summary.steps,
            retired = summary.retired,
            traps = summary.traps,
            halted = ?summary.halted,
            "run finished"
        );
        summary
    }

    fn interrupt_waiting(&self) -> bool {
        self.state.csrs.get(MIP) & self.state.csrs.get(MIE) != 0
    }

    fn retire(&mut self, insn: Insn, pc: u64, next: u64, in_debug: bool) {
        self.state.pc = next;
        let instret = self.state.csrs.get(MINSTRET);
        self.state.csrs.set(MINSTRET, instret.wrapping_add(1));
        self.tracer.retired(pc, insn);
        if self.options().trace_instructions {
            tracing::trace!(
                pc = format_args!("{pc:#x}"),
                insn = format_args!("{:#010x}", insn.bits()),
                mode = self.state.privilege.name(self.state.virt),
                "retired"
            );
        }
        let stepping = self.state.csrs.contains(DCSR) && self.state.csrs.get(DCSR) & DCSR_STEP != 0;
        if stepping && !in_debug && !self.state.debug_mode {
            self.enter_debug_mode(debug::STEP, next);
        }
    }

    fn tick(&mut self) {
        let cycle = self.state.csrs.get(MCYCLE);
        self.state.csrs.set(MCYCLE, cycle.wrapping_add(1));
    }
}
