//! Extension Descriptors.
//!
//! An extension is plain data: a name, a predicate saying when it is enabled,
//! the instructions it contributes as (mask, match) patterns with handlers,
//! and the CSRs it adds. The [`ExtensionRegistry`] holds every descriptor;
//! the dispatch table is built from the ones currently enabled.
//!
//! Custom accelerators are ordinary descriptors registered before the
//! [`Cpu`](crate::core::Cpu) is constructed, normally with encodings in the
//! custom-0..3 opcode space.

/// Builtin declarative extension list.
pub mod builtin;

/// The registry of extension descriptors.
pub mod registry;

use std::fmt;
use std::sync::Arc;

use crate::common::error::Trap;
use crate::core::Cpu;
use crate::core::arch::csr::CsrKind;
use crate::core::arch::mode::PrivilegeMode;
use crate::isa::isa_string::misa_bit;
use crate::isa::{Insn, IsaProfile, Pattern};

pub use registry::{EnabledSet, ExtensionRegistry};

/// Semantic handler: `(cpu, word, pc) -> next pc`.
///
/// A handler validates every precondition before mutating state and reports
/// failures as a [`Trap`]; the execute loop is the sole consumer of traps.
pub type Handler = fn(&mut Cpu, Insn, u64) -> Result<u64, Trap>;

/// Input to enable predicates.
#[derive(Clone, Copy, Debug)]
pub struct EnableContext<'a> {
    /// Parsed ISA string.
    pub isa: &'a IsaProfile,
    /// Current `misa`.
    pub misa: u64,
    /// Current privilege level.
    pub privilege: PrivilegeMode,
    /// Current virtualization mode.
    pub virt: bool,
}

impl EnableContext<'_> {
    /// Returns `true` when `name` is in the ISA string and, for single-letter
    /// extensions, its `misa` bit is set.
    pub fn has(&self, name: &str) -> bool {
        if !self.isa.has(name) {
            return false;
        }
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => self.misa & misa_bit(c) != 0,
            _ => true,
        }
    }
}

/// Custom enable predicate.
pub type EnablePredicate = Arc<dyn Fn(&EnableContext<'_>) -> bool + Send + Sync>;

/// When an extension is enabled.
#[derive(Clone)]
pub enum Enablement {
    /// Always enabled.
    Always,
    /// Enabled when the extension's own name is configured.
    Isa,
    /// Enabled when every listed extension is configured.
    IsaAll(Vec<&'static str>),
    /// Enabled when the predicate holds.
    Custom(EnablePredicate),
}

impl fmt::Debug for Enablement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => write!(f, "Always"),
            Self::Isa => write!(f, "Isa"),
            Self::IsaAll(names) => f.debug_tuple("IsaAll").field(names).finish(),
            Self::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// One instruction contributed by an extension.
#[derive(Clone, Copy, Debug)]
pub struct InsnDesc {
    /// Mnemonic.
    pub name: &'static str,
    /// Encoding.
    pub pattern: Pattern,
    /// Semantics.
    pub handler: Handler,
    /// May overlap entries of other extensions that are also overlap-tolerant.
    pub may_overlap: bool,
}

impl InsnDesc {
    /// An instruction with a strict encoding.
    pub const fn new(name: &'static str, pattern: Pattern, handler: Handler) -> Self {
        Self {
            name,
            pattern,
            handler,
            may_overlap: false,
        }
    }

    /// Marks the entry as an overlap-tolerant sub-match.
    #[must_use]
    pub const fn overlapping(mut self) -> Self {
        self.may_overlap = true;
        self
    }
}

/// One CSR contributed by an extension.
#[derive(Clone, Debug)]
pub struct CsrDesc {
    /// Address.
    pub addr: u16,
    /// Mnemonic.
    pub name: &'static str,
    /// Write semantics.
    pub kind: CsrKind,
    /// Reset value.
    pub reset: u64,
}

impl CsrDesc {
    /// A read/write CSR resetting to zero.
    pub const fn rw(addr: u16, name: &'static str) -> Self {
        Self {
            addr,
            name,
            kind: CsrKind::ReadWrite,
            reset: 0,
        }
    }

    /// A read-only CSR with a fixed value.
    pub const fn ro(addr: u16, name: &'static str, value: u64) -> Self {
        Self {
            addr,
            name,
            kind: CsrKind::ReadOnly,
            reset: value,
        }
    }

    /// A CSR where only `mask` bits are writable.
    pub const fn masked(addr: u16, name: &'static str, mask: u64) -> Self {
        Self {
            addr,
            name,
            kind: CsrKind::Masked(mask),
            reset: 0,
        }
    }

    /// Sets the reset value.
    #[must_use]
    pub const fn with_reset(mut self, reset: u64) -> Self {
        self.reset = reset;
        self
    }
}

/// A named extension.
#[derive(Clone, Debug)]
pub struct ExtensionDesc {
    /// Display name, e.g. `Zicsr`.
    pub name: String,
    /// Enable predicate.
    pub enablement: Enablement,
    /// Contributed instructions, in declaration order.
    pub instructions: Vec<InsnDesc>,
    /// Contributed CSRs.
    pub csrs: Vec<CsrDesc>,
}

impl ExtensionDesc {
    /// A descriptor with no instructions or CSRs.
    pub fn new(name: impl Into<String>, enablement: Enablement) -> Self {
        Self {
            name: name.into(),
            enablement,
            instructions: Vec::new(),
            csrs: Vec::new(),
        }
    }

    /// Adds instructions.
    #[must_use]
    pub fn with_instructions(mut self, instructions: impl IntoIterator<Item = InsnDesc>) -> Self {
        self.instructions.extend(instructions);
        self
    }

    /// Adds CSRs.
    #[must_use]
    pub fn with_csrs(mut self, csrs: impl IntoIterator<Item = CsrDesc>) -> Self {
        self.csrs.extend(csrs);
        self
    }

    /// Registry key: the lowercase name.
    pub fn key(&self) -> String {
        self.name.to_ascii_lowercase()
    }

    /// Evaluates the enable predicate.
    pub fn is_enabled(&self, ctx: &EnableContext<'_>) -> bool {
        match &self.enablement {
            Enablement::Always => true,
            Enablement::Isa => ctx.has(&self.name),
            Enablement::IsaAll(names) => names.iter().all(|n| ctx.has(n)),
            Enablement::Custom(pred) => pred(ctx),
        }
    }
}
