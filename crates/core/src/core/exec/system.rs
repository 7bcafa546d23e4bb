//! Privileged handlers: trap returns, `wfi` and the address-translation fences.
//!
//! The state changes behind `mret`, `sret`, `dret` and `wfi` belong to the trap
//! model on [`Cpu`]; the handlers here only adapt them to the handler contract.

use super::next_pc;
use crate::common::error::Trap;
use crate::core::Cpu;
use crate::core::arch::csr::{HSTATUS, HSTATUS_VTVM, MSTATUS, MSTATUS_TVM};
use crate::core::arch::mode::PrivilegeMode;
use crate::isa::Insn;
use crate::soc::FlushScope;

/// `mret`.
pub fn mret(cpu: &mut Cpu, insn: Insn, _pc: u64) -> Result<u64, Trap> {
    cpu.mret(insn)
}

/// `sret`.
pub fn sret(cpu: &mut Cpu, insn: Insn, _pc: u64) -> Result<u64, Trap> {
    cpu.sret(insn)
}

/// `dret`.
pub fn dret(cpu: &mut Cpu, insn: Insn, _pc: u64) -> Result<u64, Trap> {
    cpu.dret(insn)
}

/// `wfi`.
pub fn wfi(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    cpu.wait_for_interrupt(insn, pc)
}

fn operand(cpu: &Cpu, reg: usize) -> Option<u64> {
    (reg != 0).then(|| cpu.x(reg))
}

/// `sfence.vma`.
///
/// Illegal in U-mode and, under `mstatus.TVM`, in HS-mode. Virtual-instruction
/// in VU-mode and, under `hstatus.VTVM`, in VS-mode.
pub fn sfence_vma(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let privilege = cpu.state.privilege;
    if cpu.state.virt {
        let vtvm = cpu.state.csrs.get(HSTATUS) & HSTATUS_VTVM != 0;
        if privilege == PrivilegeMode::User || vtvm {
            return Err(Trap::VirtualInstruction(insn.bits()));
        }
    } else {
        cpu.require(privilege >= PrivilegeMode::Supervisor, insn)?;
        let tvm = cpu.state.csrs.get(MSTATUS) & MSTATUS_TVM != 0;
        cpu.require(!(privilege == PrivilegeMode::Supervisor && tvm), insn)?;
    }
    let scope = FlushScope {
        addr: operand(cpu, insn.rs1()),
        space_id: operand(cpu, insn.rs2()),
        guest: false,
    };
    cpu.memory.flush_tlb(scope);
    cpu.tracer.sfence_vma(scope);
    Ok(next_pc(insn, pc))
}

fn hfence(cpu: &mut Cpu, insn: Insn, pc: u64, guest: bool) -> Result<u64, Trap> {
    if cpu.state.virt {
        return Err(Trap::VirtualInstruction(insn.bits()));
    }
    let privilege = cpu.state.privilege;
    cpu.require(privilege >= PrivilegeMode::Supervisor, insn)?;
    if guest {
        let tvm = cpu.state.csrs.get(MSTATUS) & MSTATUS_TVM != 0;
        cpu.require(!(privilege == PrivilegeMode::Supervisor && tvm), insn)?;
    }
    let scope = FlushScope {
        addr: operand(cpu, insn.rs1()),
        space_id: operand(cpu, insn.rs2()),
        guest,
    };
    cpu.memory.flush_tlb(scope);
    cpu.tracer.sfence_vma(scope);
    Ok(next_pc(insn, pc))
}

/// `hfence.vvma`: flushes VS-stage translations.
pub fn hfence_vvma(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    hfence(cpu, insn, pc, false)
}

/// `hfence.gvma`: flushes G-stage translations; `mstatus.TVM` traps it in HS-mode.
pub fn hfence_gvma(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    hfence(cpu, insn, pc, true)
}
