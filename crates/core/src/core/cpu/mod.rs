//! CPU Core Definition and Initialization.
//!
//! This module defines the central `Cpu` structure. It coordinates the following:
//! 1. **State Management:** The [`ArchState`] snapshot: registers, CSRs, vector
//!    context, privilege, virtualization flag, PC and debug-mode flag.
//! 2. **Dispatch:** The extension registry, the enabled-extension set and the
//!    dispatch table built from it.
//! 3. **Collaborators:** The [`Memory`] and [`TraceSink`] the core talks to.
//! 4. **Handler Support:** Register accessors and the precondition checks every
//!    handler shares.

/// CSR access rules and views.
pub mod csr;

/// The execute loop.
pub mod execution;

/// Memory access helpers.
pub mod memory;

/// Trap entry, trap return and debug mode.
pub mod trap;

use std::sync::Arc;

use crate::common::RegisterFile;
use crate::common::error::{SimError, Trap};
use crate::config::Config;
use crate::core::arch::csr::{self as csrs, CsrBank, CsrEntry};
use crate::core::arch::mode::PrivilegeMode;
use crate::core::arch::vtype::VectorState;
use crate::dispatch::DispatchTable;
use crate::ext::{EnableContext, EnabledSet, ExtensionRegistry};
use crate::isa::{Insn, IsaProfile, Xlen};
use crate::soc::{Memory, NullSink, TraceSink, TracingSink};

pub use execution::{Halted, RunSummary, StepStatus};

/// Complete architectural state of one hart.
///
/// Comparable and cloneable so tests can snapshot state before a handler runs
/// and check it afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchState {
    /// Integer, floating-point and vector registers.
    pub regs: RegisterFile,
    /// CSR bank.
    pub csrs: CsrBank,
    /// Vector configuration and context.
    pub vector: VectorState,
    /// Current privilege level.
    pub privilege: PrivilegeMode,
    /// Virtualization mode (VS/VU when set).
    pub virt: bool,
    /// Program counter.
    pub pc: u64,
    /// Debug mode.
    pub debug_mode: bool,
}

/// Per-hart options fixed at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CpuOptions {
    /// `mhartid`.
    pub hart_id: u64,
    /// Vector register length in bits.
    pub vlen: usize,
    /// Maximum element width in bits.
    pub elen: u32,
    /// Every `ebreak` enters debug mode.
    pub debugger_attached: bool,
    /// Debug-mode entry PC.
    pub debug_entry: u64,
    /// PC for exceptions raised in debug mode.
    pub debug_exception_entry: u64,
    /// Log every retired instruction.
    pub trace_instructions: bool,
}

/// One hart: architectural state plus its collaborators.
pub struct Cpu {
    /// Architectural state.
    pub state: ArchState,
    /// Memory collaborator.
    pub memory: Box<dyn Memory>,
    /// Trace collaborator.
    pub tracer: Box<dyn TraceSink>,
    registry: Arc<ExtensionRegistry>,
    isa: Arc<IsaProfile>,
    dispatch: Arc<DispatchTable>,
    enabled: EnabledSet,
    options: CpuOptions,
    wfi: bool,
}

impl std::fmt::Debug for Cpu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cpu")
            .field("isa", &self.isa.source())
            .field("pc", &format_args!("{:#x}", self.state.pc))
            .field("privilege", &self.state.privilege.name(self.state.virt))
            .field("dispatch_entries", &self.dispatch.len())
            .finish_non_exhaustive()
    }
}

impl Cpu {
    /// Creates a hart from a configuration and a populated registry.
    ///
    /// # Errors
    ///
    /// Returns [`SimError`] when the configuration is out of range, the ISA
    /// string is malformed, or the enabled extensions claim overlapping encodings.
    pub fn new(
        config: &Config,
        registry: ExtensionRegistry,
        memory: Box<dyn Memory>,
    ) -> Result<Self, SimError> {
        config.validate()?;
        let isa = IsaProfile::parse(&config.isa.isa, &config.isa.priv_levels)?;
        let xlen = isa.xlen();

        let mut bank = CsrBank::new();
        for ext in registry.iter() {
            for desc in &ext.csrs {
                bank.insert(
                    desc.addr,
                    CsrEntry {
                        name: desc.name,
                        kind: desc.kind.clone(),
                        value: desc.reset,
                        owner: ext.key(),
                    },
                );
            }
        }
        bank.set(csrs::MISA, isa.misa());
        bank.set(csrs::MHARTID, config.general.hart_id);
        bank.set(csrs::MTVEC, config.trap.mtvec_reset);
        bank.set(
            csrs::DCSR,
            csrs::DCSR_XDEBUGVER | PrivilegeMode::Machine.to_bits(),
        );
        let mut mstatus = 0;
        if xlen == Xlen::Rv64 && isa.has_user() {
            mstatus |= 2 << 32;
        }
        if xlen == Xlen::Rv64 && isa.has_supervisor() {
            mstatus |= 2 << 34;
        }
        if isa.has("f") {
            mstatus |= csrs::EXT_STATE_INITIAL << csrs::MSTATUS_FS_SHIFT;
        }
        if isa.has("v") {
            mstatus |= csrs::EXT_STATE_INITIAL << csrs::MSTATUS_VS_SHIFT;
        }
        bank.set(csrs::MSTATUS, mstatus);

        let state = ArchState {
            regs: RegisterFile::new(config.isa.vlen),
            csrs: bank,
            vector: VectorState::new(xlen.bits()),
            privilege: PrivilegeMode::Machine,
            virt: false,
            pc: config.general.start_pc,
            debug_mode: false,
        };

        let enabled = registry.enabled_set(&EnableContext {
            isa: &isa,
            misa: isa.misa(),
            privilege: state.privilege,
            virt: false,
        });
        let instructions = registry.instructions_in(&enabled);
        let dispatch = DispatchTable::build(instructions.iter().map(|(e, i)| (e.as_str(), i)))?;

        tracing::info!(
            isa = isa.source(),
            xlen = xlen.bits(),
            vlen = config.isa.vlen,
            extensions = enabled.len(),
            instructions = dispatch.len(),
            "hart {} constructed",
            config.general.hart_id
        );

        let tracer: Box<dyn TraceSink> = if config.general.trace_instructions {
            Box::new(TracingSink)
        } else {
            Box::new(NullSink)
        };

        Ok(Self {
            state,
            memory,
            tracer,
            registry: Arc::new(registry),
            isa: Arc::new(isa),
            dispatch: Arc::new(dispatch),
            enabled,
            options: CpuOptions {
                hart_id: config.general.hart_id,
                vlen: config.isa.vlen,
                elen: config.isa.elen,
                debugger_attached: config.trap.debugger_attached,
                debug_entry: config.trap.debug_entry,
                debug_exception_entry: config.trap.debug_exception_entry,
                trace_instructions: config.general.trace_instructions,
            },
            wfi: false,
        })
    }

    /// Replaces the trace collaborator.
    #[must_use]
    pub fn with_tracer(mut self, tracer: Box<dyn TraceSink>) -> Self {
        self.tracer = tracer;
        self
    }

    /// The parsed ISA.
    pub fn isa(&self) -> &IsaProfile {
        &self.isa
    }

    /// The extension registry.
    pub fn registry(&self) -> &ExtensionRegistry {
        &self.registry
    }

    /// The current dispatch table.
    pub fn dispatch(&self) -> &DispatchTable {
        &self.dispatch
    }

    /// Extensions enabled in the current context.
    pub const fn enabled(&self) -> &EnabledSet {
        &self.enabled
    }

    /// Options fixed at construction.
    pub const fn options(&self) -> &CpuOptions {
        &self.options
    }

    /// Base integer width.
    #[inline]
    pub fn xlen(&self) -> Xlen {
        self.isa.xlen()
    }

    /// VLEN in bits.
    #[inline]
    pub const fn vlen(&self) -> usize {
        self.options.vlen
    }

    /// ELEN in bits.
    #[inline]
    pub const fn elen(&self) -> u32 {
        self.options.elen
    }

    /// Returns `true` while the hart waits in `wfi`.
    pub const fn is_waiting(&self) -> bool {
        self.wfi
    }

    /// Recomputes the enabled-extension set and rebuilds the dispatch table when it changed.
    ///
    /// A set whose encodings conflict keeps the previous table.
    pub fn refresh_dispatch(&mut self) {
        let ctx = EnableContext {
            isa: &self.isa,
            misa: self.state.csrs.get(csrs::MISA),
            privilege: self.state.privilege,
            virt: self.state.virt,
        };
        let enabled = self.registry.enabled_set(&ctx);
        if enabled == self.enabled {
            return;
        }
        let instructions = self.registry.instructions_in(&enabled);
        match DispatchTable::build(instructions.iter().map(|(e, i)| (e.as_str(), i))) {
            Ok(table) => {
                tracing::debug!(
                    extensions = enabled.len(),
                    entries = table.len(),
                    "enabled set changed"
                );
                self.dispatch = Arc::new(table);
                self.enabled = enabled;
            }
            Err(err) => tracing::warn!(%err, "keeping previous dispatch table"),
        }
    }

    // ── Register access ──────────────────────────────────────────────────

    /// Reads integer register `idx`.
    #[inline(always)]
    pub const fn x(&self, idx: usize) -> u64 {
        self.state.regs.read(idx)
    }

    /// Writes integer register `idx`, sign-extending from XLEN. Writes to `x0` are dropped.
    #[inline(always)]
    pub fn set_x(&mut self, idx: usize, val: u64) {
        let val = self.xlen().sext(val);
        self.state.regs.write(idx, val);
    }

    /// Reads the raw bits of floating-point register `idx`.
    #[inline(always)]
    pub const fn f(&self, idx: usize) -> u64 {
        self.state.regs.read_f(idx)
    }

    /// Writes the raw bits of floating-point register `idx` and marks FS dirty.
    #[inline(always)]
    pub fn set_f(&mut self, idx: usize, bits: u64) {
        self.state.regs.write_f(idx, bits);
        self.mark_fs_dirty();
    }

    /// Program counter.
    #[inline]
    pub const fn pc(&self) -> u64 {
        self.state.pc
    }

    // ── Handler preconditions ────────────────────────────────────────────

    /// Fails with illegal-instruction unless `cond` holds.
    #[inline(always)]
    pub const fn require(&self, cond: bool, insn: Insn) -> Result<(), Trap> {
        if cond {
            Ok(())
        } else {
            Err(Trap::IllegalInstruction(insn.bits()))
        }
    }

    /// Fails unless the named extension is currently enabled.
    #[inline]
    pub fn require_extension(&self, insn: Insn, name: &str) -> Result<(), Trap> {
        self.require(self.enabled.contains(name), insn)
    }

    /// Fails unless XLEN is 64.
    #[inline]
    pub fn require_rv64(&self, insn: Insn) -> Result<(), Trap> {
        self.require(self.xlen() == Xlen::Rv64, insn)
    }

    /// Fails unless the floating-point unit is on (`mstatus.FS`, and `vsstatus.FS` when virtualized).
    pub fn require_fp(&self, insn: Insn) -> Result<(), Trap> {
        let off = |status: u64| status & csrs::MSTATUS_FS == 0;
        self.require(
            !off(self.state.csrs.get(csrs::MSTATUS))
                && !(self.state.virt && off(self.state.csrs.get(csrs::VSSTATUS))),
            insn,
        )
    }

    /// Fails unless the vector unit is on (`mstatus.VS`, and `vsstatus.VS` when virtualized).
    pub fn require_vector_unit(&self, insn: Insn) -> Result<(), Trap> {
        let off = |status: u64| status & csrs::MSTATUS_VS == 0;
        self.require(
            self.enabled.contains("v")
                && !off(self.state.csrs.get(csrs::MSTATUS))
                && !(self.state.virt && off(self.state.csrs.get(csrs::VSSTATUS))),
            insn,
        )
    }

    /// Fails with virtual-instruction when virtualized, illegal-instruction otherwise.
    pub const fn virtual_or_illegal(&self, insn: Insn) -> Trap {
        if self.state.virt {
            Trap::VirtualInstruction(insn.bits())
        } else {
            Trap::IllegalInstruction(insn.bits())
        }
    }

    /// Returns the target when it is a legal instruction address.
    ///
    /// Targets must be 4-byte aligned unless C is enabled.
    #[inline]
    pub fn jump_target(&self, target: u64) -> Result<u64, Trap> {
        let target = self.xlen().zext(target) & !1;
        let align = if self.enabled.contains("c") { 2 } else { 4 };
        if target % align != 0 {
            return Err(Trap::InstructionAddressMisaligned(target));
        }
        Ok(target)
    }

    /// Sets `mstatus.FS` (and `vsstatus.FS` when virtualized) to dirty.
    pub fn mark_fs_dirty(&mut self) {
        let dirty = csrs::EXT_STATE_DIRTY << csrs::MSTATUS_FS_SHIFT;
        self.mark_dirty(dirty);
    }

    /// Sets `mstatus.VS` (and `vsstatus.VS` when virtualized) to dirty.
    pub fn mark_vs_dirty(&mut self) {
        let dirty = csrs::EXT_STATE_DIRTY << csrs::MSTATUS_VS_SHIFT;
        self.mark_dirty(dirty);
    }

    fn mark_dirty(&mut self, bits: u64) {
        let mstatus = self.state.csrs.get(csrs::MSTATUS);
        self.state.csrs.set(csrs::MSTATUS, mstatus | bits);
        if self.state.virt {
            let vsstatus = self.state.csrs.get(csrs::VSSTATUS);
            self.state.csrs.set(csrs::VSSTATUS, vsstatus | bits);
        }
    }
}
