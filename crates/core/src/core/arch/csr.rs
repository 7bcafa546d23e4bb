//! Control and Status Register (CSR) definitions and storage.
//!
//! This module implements the CSR subsystem's data side. It provides:
//! 1. **Address Definitions:** Constants for the user, supervisor, hypervisor,
//!    machine and debug CSRs this core knows about.
//! 2. **Field Masks:** Bitmasks and shifts for status, delegation, debug and
//!    translation control.
//! 3. **Register Storage:** The [`CsrBank`], keyed by 12-bit address, whose
//!    entries are plain read/write, read-only, masked-write or extension-defined.
//!
//! Access control (privilege, read-only space, extension gating) and the
//! registers that are views of others (`sstatus`, `sie`, `fcsr`, `vl`...) are
//! handled by the CPU in [`crate::core::cpu::csr`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

// ── User-level ─────────────────────────────────────────────────────────────

/// Floating-point accrued exceptions.
pub const FFLAGS: u16 = 0x001;
/// Floating-point dynamic rounding mode.
pub const FRM: u16 = 0x002;
/// Floating-point control and status (`frm` and `fflags`).
pub const FCSR: u16 = 0x003;
/// Vector start index.
pub const VSTART: u16 = 0x008;
/// Fixed-point saturation flag.
pub const VXSAT: u16 = 0x009;
/// Fixed-point rounding mode.
pub const VXRM: u16 = 0x00A;
/// Vector control and status (`vxrm` and `vxsat`).
pub const VCSR: u16 = 0x00F;
/// Cycle counter.
pub const CYCLE: u16 = 0xC00;
/// Real-time counter.
pub const TIME: u16 = 0xC01;
/// Instructions-retired counter.
pub const INSTRET: u16 = 0xC02;
/// Vector length.
pub const VL: u16 = 0xC20;
/// Vector data type.
pub const VTYPE: u16 = 0xC21;
/// Vector register length in bytes.
pub const VLENB: u16 = 0xC22;

// ── Supervisor-level ───────────────────────────────────────────────────────

/// Supervisor status (view of `mstatus`).
pub const SSTATUS: u16 = 0x100;
/// Supervisor interrupt enable (view of `mie`).
pub const SIE: u16 = 0x104;
/// Supervisor trap vector.
pub const STVEC: u16 = 0x105;
/// Supervisor counter enable.
pub const SCOUNTEREN: u16 = 0x106;
/// Supervisor scratch.
pub const SSCRATCH: u16 = 0x140;
/// Supervisor exception PC.
pub const SEPC: u16 = 0x141;
/// Supervisor trap cause.
pub const SCAUSE: u16 = 0x142;
/// Supervisor trap value.
pub const STVAL: u16 = 0x143;
/// Supervisor interrupt pending (view of `mip`).
pub const SIP: u16 = 0x144;
/// Supervisor address translation and protection.
pub const SATP: u16 = 0x180;

// ── Hypervisor and virtual-supervisor ──────────────────────────────────────

/// Virtual supervisor status.
pub const VSSTATUS: u16 = 0x200;
/// Virtual supervisor interrupt enable.
pub const VSIE: u16 = 0x204;
/// Virtual supervisor trap vector.
pub const VSTVEC: u16 = 0x205;
/// Virtual supervisor scratch.
pub const VSSCRATCH: u16 = 0x240;
/// Virtual supervisor exception PC.
pub const VSEPC: u16 = 0x241;
/// Virtual supervisor trap cause.
pub const VSCAUSE: u16 = 0x242;
/// Virtual supervisor trap value.
pub const VSTVAL: u16 = 0x243;
/// Virtual supervisor interrupt pending.
pub const VSIP: u16 = 0x244;
/// Virtual supervisor address translation.
pub const VSATP: u16 = 0x280;
/// Hypervisor status.
pub const HSTATUS: u16 = 0x600;
/// Hypervisor exception delegation.
pub const HEDELEG: u16 = 0x602;
/// Hypervisor interrupt delegation.
pub const HIDELEG: u16 = 0x603;
/// Hypervisor interrupt enable.
pub const HIE: u16 = 0x604;
/// Hypervisor counter enable.
pub const HCOUNTEREN: u16 = 0x606;
/// Hypervisor trap value (guest physical address >> 2).
pub const HTVAL: u16 = 0x643;
/// Hypervisor interrupt pending.
pub const HIP: u16 = 0x644;
/// Hypervisor trap instruction.
pub const HTINST: u16 = 0x64A;
/// Hypervisor guest address translation.
pub const HGATP: u16 = 0x680;

// ── Machine-level ──────────────────────────────────────────────────────────

/// Machine status.
pub const MSTATUS: u16 = 0x300;
/// Machine ISA.
pub const MISA: u16 = 0x301;
/// Machine exception delegation.
pub const MEDELEG: u16 = 0x302;
/// Machine interrupt delegation.
pub const MIDELEG: u16 = 0x303;
/// Machine interrupt enable.
pub const MIE: u16 = 0x304;
/// Machine trap vector.
pub const MTVEC: u16 = 0x305;
/// Machine counter enable.
pub const MCOUNTEREN: u16 = 0x306;
/// Machine scratch.
pub const MSCRATCH: u16 = 0x340;
/// Machine exception PC.
pub const MEPC: u16 = 0x341;
/// Machine trap cause.
pub const MCAUSE: u16 = 0x342;
/// Machine trap value.
pub const MTVAL: u16 = 0x343;
/// Machine interrupt pending.
pub const MIP: u16 = 0x344;
/// Machine trap instruction.
pub const MTINST: u16 = 0x34A;
/// Machine second trap value.
pub const MTVAL2: u16 = 0x34B;
/// Machine cycle counter.
pub const MCYCLE: u16 = 0xB00;
/// Machine instructions-retired counter.
pub const MINSTRET: u16 = 0xB02;
/// Vendor ID.
pub const MVENDORID: u16 = 0xF11;
/// Architecture ID.
pub const MARCHID: u16 = 0xF12;
/// Implementation ID.
pub const MIMPID: u16 = 0xF13;
/// Hart ID.
pub const MHARTID: u16 = 0xF14;

// ── Debug ──────────────────────────────────────────────────────────────────

/// Debug control and status.
pub const DCSR: u16 = 0x7B0;
/// Debug PC.
pub const DPC: u16 = 0x7B1;
/// Debug scratch 0.
pub const DSCRATCH0: u16 = 0x7B2;
/// Debug scratch 1.
pub const DSCRATCH1: u16 = 0x7B3;

// ── mstatus / sstatus fields ───────────────────────────────────────────────

/// Supervisor interrupt enable.
pub const MSTATUS_SIE: u64 = 1 << 1;
/// Machine interrupt enable.
pub const MSTATUS_MIE: u64 = 1 << 3;
/// Supervisor previous interrupt enable.
pub const MSTATUS_SPIE: u64 = 1 << 5;
/// User-mode big-endian.
pub const MSTATUS_UBE: u64 = 1 << 6;
/// Machine previous interrupt enable.
pub const MSTATUS_MPIE: u64 = 1 << 7;
/// Supervisor previous privilege.
pub const MSTATUS_SPP: u64 = 1 << 8;
/// Vector state field.
pub const MSTATUS_VS: u64 = 3 << 9;
/// Machine previous privilege field.
pub const MSTATUS_MPP: u64 = 3 << 11;
/// Shift of the `MPP` field.
pub const MSTATUS_MPP_SHIFT: u64 = 11;
/// Floating-point state field.
pub const MSTATUS_FS: u64 = 3 << 13;
/// Extension state summary field.
pub const MSTATUS_XS: u64 = 3 << 15;
/// Modify privilege.
pub const MSTATUS_MPRV: u64 = 1 << 17;
/// Supervisor user-memory access.
pub const MSTATUS_SUM: u64 = 1 << 18;
/// Make executable readable.
pub const MSTATUS_MXR: u64 = 1 << 19;
/// Trap virtual memory.
pub const MSTATUS_TVM: u64 = 1 << 20;
/// Timeout wait.
pub const MSTATUS_TW: u64 = 1 << 21;
/// Trap SRET.
pub const MSTATUS_TSR: u64 = 1 << 22;
/// User XLEN field (RV64).
pub const MSTATUS_UXL: u64 = 3 << 32;
/// Supervisor XLEN field (RV64).
pub const MSTATUS_SXL: u64 = 3 << 34;
/// Guest virtual address recorded in `mtval`.
pub const MSTATUS_GVA: u64 = 1 << 38;
/// Machine previous virtualization mode.
pub const MSTATUS_MPV: u64 = 1 << 39;
/// State dirty summary (RV64 position).
pub const MSTATUS_SD: u64 = 1 << 63;
/// State dirty summary (RV32 position).
pub const MSTATUS_SD_RV32: u64 = 1 << 31;

/// Extension state: off.
pub const EXT_STATE_OFF: u64 = 0;
/// Extension state: initial.
pub const EXT_STATE_INITIAL: u64 = 1;
/// Extension state: clean.
pub const EXT_STATE_CLEAN: u64 = 2;
/// Extension state: dirty.
pub const EXT_STATE_DIRTY: u64 = 3;
/// Shift of the `FS` field.
pub const MSTATUS_FS_SHIFT: u64 = 13;
/// Shift of the `VS` field.
pub const MSTATUS_VS_SHIFT: u64 = 9;

/// Bits of `mstatus` visible through `sstatus`.
pub const SSTATUS_MASK: u64 = MSTATUS_SIE
    | MSTATUS_SPIE
    | MSTATUS_UBE
    | MSTATUS_SPP
    | MSTATUS_VS
    | MSTATUS_FS
    | MSTATUS_XS
    | MSTATUS_SUM
    | MSTATUS_MXR
    | MSTATUS_UXL
    | MSTATUS_SD;

// ── hstatus fields ─────────────────────────────────────────────────────────

/// Guest virtual address recorded in `stval`.
pub const HSTATUS_GVA: u64 = 1 << 6;
/// Supervisor previous virtualization mode.
pub const HSTATUS_SPV: u64 = 1 << 7;
/// Supervisor previous virtual privilege (VS vs VU).
pub const HSTATUS_SPVP: u64 = 1 << 8;
/// Trap virtual memory in VS-mode.
pub const HSTATUS_VTVM: u64 = 1 << 20;
/// Timeout wait in VS-mode.
pub const HSTATUS_VTW: u64 = 1 << 21;
/// Trap SRET in VS-mode.
pub const HSTATUS_VTSR: u64 = 1 << 22;

// ── Interrupt bits (mip / mie) ─────────────────────────────────────────────

/// Supervisor software interrupt.
pub const MIP_SSIP: u64 = 1 << 1;
/// Virtual supervisor software interrupt.
pub const MIP_VSSIP: u64 = 1 << 2;
/// Machine software interrupt.
pub const MIP_MSIP: u64 = 1 << 3;
/// Supervisor timer interrupt.
pub const MIP_STIP: u64 = 1 << 5;
/// Virtual supervisor timer interrupt.
pub const MIP_VSTIP: u64 = 1 << 6;
/// Machine timer interrupt.
pub const MIP_MTIP: u64 = 1 << 7;
/// Supervisor external interrupt.
pub const MIP_SEIP: u64 = 1 << 9;
/// Virtual supervisor external interrupt.
pub const MIP_VSEIP: u64 = 1 << 10;
/// Machine external interrupt.
pub const MIP_MEIP: u64 = 1 << 11;
/// Supervisor-level interrupts visible through `sip`/`sie`.
pub const S_INTERRUPTS: u64 = MIP_SSIP | MIP_STIP | MIP_SEIP;
/// Virtual-supervisor interrupts.
pub const VS_INTERRUPTS: u64 = MIP_VSSIP | MIP_VSTIP | MIP_VSEIP;
/// Machine-level interrupts.
pub const M_INTERRUPTS: u64 = MIP_MSIP | MIP_MTIP | MIP_MEIP;

// ── Trap vector ────────────────────────────────────────────────────────────

/// `xtvec` mode field.
pub const TVEC_MODE_MASK: u64 = 0b11;
/// `xtvec` vectored mode.
pub const TVEC_MODE_VECTORED: u64 = 0b01;

// ── dcsr fields ────────────────────────────────────────────────────────────

/// Privilege level before debug-mode entry.
pub const DCSR_PRV: u64 = 0b11;
/// Single step.
pub const DCSR_STEP: u64 = 1 << 2;
/// Virtualization mode before debug-mode entry.
pub const DCSR_V: u64 = 1 << 5;
/// Debug entry cause field.
pub const DCSR_CAUSE: u64 = 0b111 << 6;
/// Shift of the cause field.
pub const DCSR_CAUSE_SHIFT: u64 = 6;
/// `ebreak` in U-mode enters debug mode.
pub const DCSR_EBREAKU: u64 = 1 << 12;
/// `ebreak` in S-mode enters debug mode.
pub const DCSR_EBREAKS: u64 = 1 << 13;
/// `ebreak` in M-mode enters debug mode.
pub const DCSR_EBREAKM: u64 = 1 << 15;
/// `ebreak` in VU-mode enters debug mode.
pub const DCSR_EBREAKVU: u64 = 1 << 16;
/// `ebreak` in VS-mode enters debug mode.
pub const DCSR_EBREAKVS: u64 = 1 << 17;
/// External debug support version 4, as reported in `xdebugver`.
pub const DCSR_XDEBUGVER: u64 = 4 << 28;

// ── satp ───────────────────────────────────────────────────────────────────

/// Shift of the RV64 `satp.MODE` field.
pub const SATP_MODE_SHIFT: u64 = 60;
/// Bare (no translation).
pub const SATP_MODE_BARE: u64 = 0;
/// Sv39.
pub const SATP_MODE_SV39: u64 = 8;
/// Sv48.
pub const SATP_MODE_SV48: u64 = 9;

/// Lowest privilege able to access a CSR, `addr[9:8]`.
pub const fn csr_min_privilege(addr: u16) -> u64 {
    ((addr >> 8) & 0b11) as u64
}

/// Returns `true` when `addr[11:10] == 0b11` (read-only space).
pub const fn csr_is_read_only(addr: u16) -> bool {
    (addr >> 10) & 0b11 == 0b11
}

/// Extension-defined CSR behaviour.
///
/// Implementations legalize written values (WARL fields) and may present a
/// computed value on read. Both functions are pure over the stored value.
pub trait CsrBehavior: Send + Sync + fmt::Debug {
    /// Value presented on read, given the stored value.
    fn read(&self, stored: u64) -> u64 {
        stored
    }

    /// New stored value after a write of `value` over `stored`.
    fn write(&self, stored: u64, value: u64) -> u64;
}

/// How writes to a bank entry are treated.
#[derive(Clone, Debug)]
pub enum CsrKind {
    /// Plain read/write register.
    ReadWrite,
    /// Read-only; writes are rejected.
    ReadOnly,
    /// Only bits set in the mask are writable; others keep their value.
    Masked(u64),
    /// Extension-provided read/write semantics.
    Extension(Arc<dyn CsrBehavior>),
}

impl PartialEq for CsrKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::ReadWrite, Self::ReadWrite) | (Self::ReadOnly, Self::ReadOnly) => true,
            (Self::Masked(a), Self::Masked(b)) => a == b,
            (Self::Extension(a), Self::Extension(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for CsrKind {}

/// One register in the bank.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsrEntry {
    /// Mnemonic.
    pub name: &'static str,
    /// Write semantics.
    pub kind: CsrKind,
    /// Stored value.
    pub value: u64,
    /// Lowercase name of the contributing extension.
    pub owner: String,
}

/// Control and Status Register bank keyed by 12-bit address.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CsrBank {
    entries: BTreeMap<u16, CsrEntry>,
}

impl CsrBank {
    /// Creates an empty bank.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an entry.
    pub fn insert(&mut self, addr: u16, entry: CsrEntry) {
        let _ = self.entries.insert(addr & 0xfff, entry);
    }

    /// Returns `true` when a register exists at `addr`.
    pub fn contains(&self, addr: u16) -> bool {
        self.entries.contains_key(&addr)
    }

    /// The entry at `addr`.
    pub fn entry(&self, addr: u16) -> Option<&CsrEntry> {
        self.entries.get(&addr)
    }

    /// Reads `addr` through its behaviour, or `None` when absent.
    pub fn read(&self, addr: u16) -> Option<u64> {
        self.entries.get(&addr).map(|e| match &e.kind {
            CsrKind::Extension(behavior) => behavior.read(e.value),
            _ => e.value,
        })
    }

    /// Writes `addr` through its behaviour.
    ///
    /// Returns `false` when the register is absent or read-only.
    pub fn write(&mut self, addr: u16, value: u64) -> bool {
        let Some(entry) = self.entries.get_mut(&addr) else {
            return false;
        };
        entry.value = match &entry.kind {
            CsrKind::ReadWrite => value,
            CsrKind::ReadOnly => return false,
            CsrKind::Masked(mask) => (entry.value & !mask) | (value & mask),
            CsrKind::Extension(behavior) => behavior.write(entry.value, value),
        };
        true
    }

    /// Stored value at `addr`, or zero when absent. Bypasses the behaviour.
    #[inline]
    pub fn get(&self, addr: u16) -> u64 {
        self.entries.get(&addr).map_or(0, |e| e.value)
    }

    /// Stores `value` at `addr`, bypassing write semantics. Absent addresses are ignored.
    #[inline]
    pub fn set(&mut self, addr: u16, value: u64) {
        if let Some(entry) = self.entries.get_mut(&addr) {
            entry.value = value;
        }
    }

    /// Iterates over `(address, entry)` pairs in address order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &CsrEntry)> {
        self.entries.iter().map(|(a, e)| (*a, e))
    }
}
