//! RISC-V Trap Cause Codes.
//!
//! Cause codes written to `mcause`, `scause` and `vscause`. The codes below
//! exclude the interrupt flag; trap entry ORs in [`INTERRUPT_BIT`] for the
//! asynchronous ones.

/// Most-significant bit of `xcause`, set for interrupts (RV64 position).
pub const INTERRUPT_BIT: u64 = 1 << 63;

/// Interrupt cause codes (also bit positions in `mip`/`mie`).
pub mod interrupt {
    /// Supervisor software interrupt.
    pub const SUPERVISOR_SOFTWARE: u64 = 1;

    /// Virtual supervisor software interrupt.
    pub const VIRTUAL_SUPERVISOR_SOFTWARE: u64 = 2;

    /// Machine software interrupt.
    pub const MACHINE_SOFTWARE: u64 = 3;

    /// Supervisor timer interrupt.
    pub const SUPERVISOR_TIMER: u64 = 5;

    /// Virtual supervisor timer interrupt.
    pub const VIRTUAL_SUPERVISOR_TIMER: u64 = 6;

    /// Machine timer interrupt.
    pub const MACHINE_TIMER: u64 = 7;

    /// Supervisor external interrupt.
    pub const SUPERVISOR_EXTERNAL: u64 = 9;

    /// Virtual supervisor external interrupt.
    pub const VIRTUAL_SUPERVISOR_EXTERNAL: u64 = 10;

    /// Machine external interrupt.
    pub const MACHINE_EXTERNAL: u64 = 11;
}

/// Exception cause codes.
pub mod exception {
    /// Instruction address misaligned (0).
    pub const INSTRUCTION_ADDRESS_MISALIGNED: u64 = 0;
    /// Instruction access fault (1).
    pub const INSTRUCTION_ACCESS_FAULT: u64 = 1;
    /// Illegal instruction (2).
    pub const ILLEGAL_INSTRUCTION: u64 = 2;
    /// Breakpoint (3).
    pub const BREAKPOINT: u64 = 3;
    /// Load address misaligned (4).
    pub const LOAD_ADDRESS_MISALIGNED: u64 = 4;
    /// Load access fault (5).
    pub const LOAD_ACCESS_FAULT: u64 = 5;
    /// Store/AMO address misaligned (6).
    pub const STORE_AMO_ADDRESS_MISALIGNED: u64 = 6;
    /// Store/AMO access fault (7).
    pub const STORE_AMO_ACCESS_FAULT: u64 = 7;
    /// Environment call from U-mode or VU-mode (8).
    pub const ENVIRONMENT_CALL_FROM_U_MODE: u64 = 8;
    /// Environment call from HS-mode (9).
    pub const ENVIRONMENT_CALL_FROM_S_MODE: u64 = 9;
    /// Environment call from VS-mode (10).
    pub const ENVIRONMENT_CALL_FROM_VS_MODE: u64 = 10;
    /// Environment call from M-mode (11).
    pub const ENVIRONMENT_CALL_FROM_M_MODE: u64 = 11;
    /// Instruction page fault (12).
    pub const INSTRUCTION_PAGE_FAULT: u64 = 12;
    /// Load page fault (13).
    pub const LOAD_PAGE_FAULT: u64 = 13;
    /// Store/AMO page fault (15).
    pub const STORE_AMO_PAGE_FAULT: u64 = 15;
    /// Instruction guest-page fault (20).
    pub const INSTRUCTION_GUEST_PAGE_FAULT: u64 = 20;
    /// Load guest-page fault (21).
    pub const LOAD_GUEST_PAGE_FAULT: u64 = 21;
    /// Virtual instruction (22).
    pub const VIRTUAL_INSTRUCTION: u64 = 22;
    /// Store/AMO guest-page fault (23).
    pub const STORE_AMO_GUEST_PAGE_FAULT: u64 = 23;
}

/// `dcsr.cause` values recorded on debug-mode entry.
pub mod debug {
    /// Entered because of an `ebreak`.
    pub const EBREAK: u64 = 1;
    /// Entered because of a trigger match.
    pub const TRIGGER: u64 = 2;
    /// Entered on a halt request from the debugger.
    pub const HALT_REQUEST: u64 = 3;
    /// Entered after a single step.
    pub const STEP: u64 = 4;
}
