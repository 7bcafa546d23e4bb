//! Trap taxonomy and configuration errors.
//!
//! This module defines every failure the core can report. It provides:
//! 1. **Architectural Traps:** The synchronous exceptions and asynchronous interrupts that
//!    handlers raise and the trap model consumes.
//! 2. **Configuration Errors:** `thiserror`-derived errors for ISA strings, the extension
//!    registry, dispatch-table construction and JSON configuration.

use std::fmt;

use crate::isa::privileged::cause::{exception, interrupt};

/// RISC-V trap types representing exceptions and interrupts.
///
/// Traps cause the processor to transfer control to a trap handler at the
/// privilege level chosen by delegation. The payload of an exception is the
/// value written to `xtval`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trap {
    /// Instruction address misaligned; payload is the target address.
    InstructionAddressMisaligned(u64),

    /// Instruction fetch violated a physical-memory check.
    InstructionAccessFault(u64),

    /// No dispatch match, or a handler precondition failed.
    ///
    /// The associated value is the instruction encoding (zero-extended).
    IllegalInstruction(u64),

    /// `ebreak` or a hardware breakpoint; payload is the faulting PC.
    Breakpoint(u64),

    /// Load address misaligned.
    LoadAddressMisaligned(u64),

    /// Load access fault reported by the memory collaborator.
    LoadAccessFault(u64),

    /// Store/AMO address misaligned.
    StoreAddressMisaligned(u64),

    /// Store/AMO access fault reported by the memory collaborator.
    StoreAccessFault(u64),

    /// Environment call from U-mode (or VU-mode).
    EnvironmentCallFromUMode,

    /// Environment call from HS-mode.
    EnvironmentCallFromSMode,

    /// Environment call from VS-mode.
    EnvironmentCallFromVSMode,

    /// Environment call from M-mode.
    EnvironmentCallFromMMode,

    /// Instruction page fault; payload is the faulting virtual address.
    InstructionPageFault(u64),

    /// Load page fault.
    LoadPageFault(u64),

    /// Store/AMO page fault.
    StorePageFault(u64),

    /// Instruction guest-page fault (G-stage translation failure).
    InstructionGuestPageFault(u64),

    /// Load guest-page fault.
    LoadGuestPageFault(u64),

    /// Virtual instruction: legal in HS-mode but not while virtualized.
    ///
    /// The associated value is the instruction encoding.
    VirtualInstruction(u64),

    /// Store/AMO guest-page fault.
    StoreGuestPageFault(u64),

    /// Supervisor software interrupt.
    SupervisorSoftwareInterrupt,

    /// Machine software interrupt.
    MachineSoftwareInterrupt,

    /// Supervisor timer interrupt.
    SupervisorTimerInterrupt,

    /// Machine timer interrupt.
    MachineTimerInterrupt,

    /// Supervisor external interrupt.
    SupervisorExternalInterrupt,

    /// Machine external interrupt.
    MachineExternalInterrupt,

    /// Virtual supervisor software interrupt.
    VirtualSupervisorSoftwareInterrupt,

    /// Virtual supervisor timer interrupt.
    VirtualSupervisorTimerInterrupt,

    /// Virtual supervisor external interrupt.
    VirtualSupervisorExternalInterrupt,
}

impl Trap {
    /// Returns `true` for asynchronous interrupts.
    pub const fn is_interrupt(&self) -> bool {
        matches!(
            self,
            Self::SupervisorSoftwareInterrupt
                | Self::MachineSoftwareInterrupt
                | Self::SupervisorTimerInterrupt
                | Self::MachineTimerInterrupt
                | Self::SupervisorExternalInterrupt
                | Self::MachineExternalInterrupt
                | Self::VirtualSupervisorSoftwareInterrupt
                | Self::VirtualSupervisorTimerInterrupt
                | Self::VirtualSupervisorExternalInterrupt
        )
    }

    /// Returns the cause code written to `xcause` (without the interrupt bit).
    pub const fn cause(&self) -> u64 {
        match self {
            Self::InstructionAddressMisaligned(_) => exception::INSTRUCTION_ADDRESS_MISALIGNED,
            Self::InstructionAccessFault(_) => exception::INSTRUCTION_ACCESS_FAULT,
            Self::IllegalInstruction(_) => exception::ILLEGAL_INSTRUCTION,
            Self::Breakpoint(_) => exception::BREAKPOINT,
            Self::LoadAddressMisaligned(_) => exception::LOAD_ADDRESS_MISALIGNED,
            Self::LoadAccessFault(_) => exception::LOAD_ACCESS_FAULT,
            Self::StoreAddressMisaligned(_) => exception::STORE_AMO_ADDRESS_MISALIGNED,
            Self::StoreAccessFault(_) => exception::STORE_AMO_ACCESS_FAULT,
            Self::EnvironmentCallFromUMode => exception::ENVIRONMENT_CALL_FROM_U_MODE,
            Self::EnvironmentCallFromSMode => exception::ENVIRONMENT_CALL_FROM_S_MODE,
            Self::EnvironmentCallFromVSMode => exception::ENVIRONMENT_CALL_FROM_VS_MODE,
            Self::EnvironmentCallFromMMode => exception::ENVIRONMENT_CALL_FROM_M_MODE,
            Self::InstructionPageFault(_) => exception::INSTRUCTION_PAGE_FAULT,
            Self::LoadPageFault(_) => exception::LOAD_PAGE_FAULT,
            Self::StorePageFault(_) => exception::STORE_AMO_PAGE_FAULT,
            Self::InstructionGuestPageFault(_) => exception::INSTRUCTION_GUEST_PAGE_FAULT,
            Self::LoadGuestPageFault(_) => exception::LOAD_GUEST_PAGE_FAULT,
            Self::VirtualInstruction(_) => exception::VIRTUAL_INSTRUCTION,
            Self::StoreGuestPageFault(_) => exception::STORE_AMO_GUEST_PAGE_FAULT,
            Self::SupervisorSoftwareInterrupt => interrupt::SUPERVISOR_SOFTWARE,
            Self::MachineSoftwareInterrupt => interrupt::MACHINE_SOFTWARE,
            Self::SupervisorTimerInterrupt => interrupt::SUPERVISOR_TIMER,
            Self::MachineTimerInterrupt => interrupt::MACHINE_TIMER,
            Self::SupervisorExternalInterrupt => interrupt::SUPERVISOR_EXTERNAL,
            Self::MachineExternalInterrupt => interrupt::MACHINE_EXTERNAL,
            Self::VirtualSupervisorSoftwareInterrupt => interrupt::VIRTUAL_SUPERVISOR_SOFTWARE,
            Self::VirtualSupervisorTimerInterrupt => interrupt::VIRTUAL_SUPERVISOR_TIMER,
            Self::VirtualSupervisorExternalInterrupt => interrupt::VIRTUAL_SUPERVISOR_EXTERNAL,
        }
    }

    /// Returns the value written to `xtval`.
    pub const fn tval(&self) -> u64 {
        match *self {
            Self::InstructionAddressMisaligned(v)
            | Self::InstructionAccessFault(v)
            | Self::IllegalInstruction(v)
            | Self::Breakpoint(v)
            | Self::LoadAddressMisaligned(v)
            | Self::LoadAccessFault(v)
            | Self::StoreAddressMisaligned(v)
            | Self::StoreAccessFault(v)
            | Self::InstructionPageFault(v)
            | Self::LoadPageFault(v)
            | Self::StorePageFault(v)
            | Self::InstructionGuestPageFault(v)
            | Self::LoadGuestPageFault(v)
            | Self::VirtualInstruction(v)
            | Self::StoreGuestPageFault(v) => v,
            _ => 0,
        }
    }

    /// Returns `true` for the address-carrying fault kinds whose `tval` is a guest
    /// virtual address when raised in a virtualized context.
    pub const fn has_gva(&self) -> bool {
        matches!(
            self,
            Self::InstructionAddressMisaligned(_)
                | Self::InstructionAccessFault(_)
                | Self::Breakpoint(_)
                | Self::LoadAddressMisaligned(_)
                | Self::LoadAccessFault(_)
                | Self::StoreAddressMisaligned(_)
                | Self::StoreAccessFault(_)
                | Self::InstructionPageFault(_)
                | Self::LoadPageFault(_)
                | Self::StorePageFault(_)
                | Self::InstructionGuestPageFault(_)
                | Self::LoadGuestPageFault(_)
                | Self::StoreGuestPageFault(_)
        )
    }
}

impl fmt::Display for Trap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InstructionAddressMisaligned(addr) => {
                write!(f, "InstructionAddressMisaligned({addr:#x})")
            }
            Self::InstructionAccessFault(addr) => write!(f, "InstructionAccessFault({addr:#x})"),
            Self::IllegalInstruction(inst) => write!(f, "IllegalInstruction({inst:#x})"),
            Self::Breakpoint(pc) => write!(f, "Breakpoint({pc:#x})"),
            Self::LoadAddressMisaligned(addr) => write!(f, "LoadAddressMisaligned({addr:#x})"),
            Self::LoadAccessFault(addr) => write!(f, "LoadAccessFault({addr:#x})"),
            Self::StoreAddressMisaligned(addr) => write!(f, "StoreAddressMisaligned({addr:#x})"),
            Self::StoreAccessFault(addr) => write!(f, "StoreAccessFault({addr:#x})"),
            Self::EnvironmentCallFromUMode => write!(f, "EnvironmentCallFromUMode"),
            Self::EnvironmentCallFromSMode => write!(f, "EnvironmentCallFromSMode"),
            Self::EnvironmentCallFromVSMode => write!(f, "EnvironmentCallFromVSMode"),
            Self::EnvironmentCallFromMMode => write!(f, "EnvironmentCallFromMMode"),
            Self::InstructionPageFault(addr) => write!(f, "InstructionPageFault({addr:#x})"),
            Self::LoadPageFault(addr) => write!(f, "LoadPageFault({addr:#x})"),
            Self::StorePageFault(addr) => write!(f, "StorePageFault({addr:#x})"),
            Self::InstructionGuestPageFault(addr) => {
                write!(f, "InstructionGuestPageFault({addr:#x})")
            }
            Self::LoadGuestPageFault(addr) => write!(f, "LoadGuestPageFault({addr:#x})"),
            Self::VirtualInstruction(inst) => write!(f, "VirtualInstruction({inst:#x})"),
            Self::StoreGuestPageFault(addr) => write!(f, "StoreGuestPageFault({addr:#x})"),
            Self::SupervisorSoftwareInterrupt => write!(f, "SupervisorSoftwareInterrupt"),
            Self::MachineSoftwareInterrupt => write!(f, "MachineSoftwareInterrupt"),
            Self::SupervisorTimerInterrupt => write!(f, "SupervisorTimerInterrupt"),
            Self::MachineTimerInterrupt => write!(f, "MachineTimerInterrupt"),
            Self::SupervisorExternalInterrupt => write!(f, "SupervisorExternalInterrupt"),
            Self::MachineExternalInterrupt => write!(f, "MachineExternalInterrupt"),
            Self::VirtualSupervisorSoftwareInterrupt => {
                write!(f, "VirtualSupervisorSoftwareInterrupt")
            }
            Self::VirtualSupervisorTimerInterrupt => write!(f, "VirtualSupervisorTimerInterrupt"),
            Self::VirtualSupervisorExternalInterrupt => {
                write!(f, "VirtualSupervisorExternalInterrupt")
            }
        }
    }
}

impl std::error::Error for Trap {}

/// Errors raised while parsing an ISA string such as `rv64imafdcv_zicsr`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IsaError {
    /// The string does not start with `rv32` or `rv64`.
    #[error("ISA string `{0}` must start with rv32 or rv64")]
    BadBase(String),

    /// The first extension letter was not `i`, `e` or `g`.
    #[error("ISA string `{0}` must name a base integer ISA (i, e or g)")]
    MissingBase(String),

    /// A single-letter extension is not supported.
    #[error("unsupported extension `{0}`")]
    Unsupported(String),

    /// An extension appears twice.
    #[error("extension `{0}` appears more than once")]
    Duplicate(String),

    /// Single-letter extensions must appear in canonical order.
    #[error("extension `{0}` is out of canonical order")]
    OutOfOrder(char),

    /// An extension requires another that is absent.
    #[error("extension `{ext}` requires `{requires}`")]
    MissingDependency {
        /// The dependent extension.
        ext: String,
        /// The extension it requires.
        requires: String,
    },

    /// The privilege-level string is malformed.
    #[error("privilege levels `{0}` must be one of m, mu, msu")]
    BadPrivilegeLevels(String),
}

/// Errors raised while populating the extension registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Two descriptors share a name.
    #[error("extension `{0}` is already registered")]
    Duplicate(String),

    /// A lookup named an extension that was never registered.
    #[error("extension `{0}` is not registered")]
    Unknown(String),

    /// Two descriptors contribute the same CSR address.
    #[error("CSR {addr:#05x} is contributed by both `{first}` and `{second}`")]
    CsrConflict {
        /// CSR address.
        addr: u16,
        /// Extension registered first.
        first: String,
        /// Extension registered second.
        second: String,
    },
}

/// Errors raised while building a dispatch table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// Two simultaneously enabled extensions claim overlapping encodings.
    #[error(
        "`{first}` ({first_ext}) and `{second}` ({second_ext}) claim overlapping encodings \
         (mask {mask:#010x}, match {matched:#010x})"
    )]
    Overlap {
        /// Mnemonic of the first entry.
        first: String,
        /// Extension contributing the first entry.
        first_ext: String,
        /// Mnemonic of the second entry.
        second: String,
        /// Extension contributing the second entry.
        second_ext: String,
        /// Mask of the first entry.
        mask: u32,
        /// Match value of the first entry.
        matched: u32,
    },

    /// A (mask, match) pair has match bits outside its mask.
    #[error("`{0}` sets match bits outside its mask")]
    MalformedEntry(String),
}

/// Errors raised while loading a [`Config`](crate::config::Config).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The JSON document could not be parsed.
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error("cannot read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// A field holds a value outside its legal range.
    #[error("invalid `{field}`: {reason}")]
    Invalid {
        /// Dotted field path.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Top-level error returned while constructing a [`Cpu`](crate::core::Cpu).
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// ISA string error.
    #[error(transparent)]
    Isa(#[from] IsaError),

    /// Registry error.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Dispatch construction error.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
