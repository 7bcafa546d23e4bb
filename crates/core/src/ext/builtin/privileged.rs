use crate::core::arch::csr::*;
use crate::core::exec::{system, zicsr, zifencei};
use crate::ext::{CsrDesc, Enablement, ExtensionDesc, InsnDesc};
use crate::isa::Pattern;
use crate::isa::opcodes::{OP_MISC_MEM, OP_SYSTEM};
use crate::isa::privileged::opcodes::{
    CSRRC, CSRRCI, CSRRS, CSRRSI, CSRRW, CSRRWI, DRET, HFENCE_GVMA_FUNCT7, HFENCE_VVMA_FUNCT7, MRET,
    SFENCE_VMA_FUNCT7, SRET, WFI,
};
use crate::isa::rv64i::funct3::FENCE_I;

/// `SYSTEM` with `funct3 = 0`, `rd = 0` and the given `funct7`: the fences.
const fn system_fence(funct7: u32) -> Pattern {
    Pattern::opcode(OP_SYSTEM).funct3(0).rd(0).funct7(funct7)
}

fn machine() -> ExtensionDesc {
    ExtensionDesc::new("Sm", Enablement::Always)
        .with_instructions([
            InsnDesc::new("mret", Pattern::exact(MRET), system::mret),
            InsnDesc::new("wfi", Pattern::exact(WFI), system::wfi),
        ])
        .with_csrs([
            CsrDesc::rw(MSTATUS, "mstatus"),
            CsrDesc::rw(MISA, "misa"),
            CsrDesc::rw(MIE, "mie"),
            CsrDesc::rw(MTVEC, "mtvec"),
            CsrDesc::masked(MCOUNTEREN, "mcounteren", 0b111),
            CsrDesc::rw(MSCRATCH, "mscratch"),
            CsrDesc::rw(MEPC, "mepc"),
            CsrDesc::rw(MCAUSE, "mcause"),
            CsrDesc::rw(MTVAL, "mtval"),
            CsrDesc::rw(MIP, "mip"),
            CsrDesc::rw(MCYCLE, "mcycle"),
            CsrDesc::rw(MINSTRET, "minstret"),
            CsrDesc::ro(MVENDORID, "mvendorid", 0),
            CsrDesc::ro(MARCHID, "marchid", 0),
            CsrDesc::ro(MIMPID, "mimpid", 0),
            CsrDesc::ro(MHARTID, "mhartid", 0),
        ])
}

fn supervisor() -> ExtensionDesc {
    ExtensionDesc::new("S", Enablement::Isa)
        .with_instructions([
            InsnDesc::new("sret", Pattern::exact(SRET), system::sret),
            InsnDesc::new("sfence.vma", system_fence(SFENCE_VMA_FUNCT7), system::sfence_vma),
        ])
        .with_csrs([
            CsrDesc::rw(SSTATUS, "sstatus"),
            CsrDesc::rw(SIE, "sie"),
            CsrDesc::rw(STVEC, "stvec"),
            CsrDesc::masked(SCOUNTEREN, "scounteren", 0b111),
            CsrDesc::rw(SSCRATCH, "sscratch"),
            CsrDesc::rw(SEPC, "sepc"),
            CsrDesc::rw(SCAUSE, "scause"),
            CsrDesc::rw(STVAL, "stval"),
            CsrDesc::rw(SIP, "sip"),
            CsrDesc::rw(SATP, "satp"),
            CsrDesc::rw(MEDELEG, "medeleg"),
            CsrDesc::rw(MIDELEG, "mideleg"),
        ])
}

fn hypervisor() -> ExtensionDesc {
    ExtensionDesc::new("H", Enablement::Isa)
        .with_instructions([
            InsnDesc::new("hfence.vvma", system_fence(HFENCE_VVMA_FUNCT7), system::hfence_vvma),
            InsnDesc::new("hfence.gvma", system_fence(HFENCE_GVMA_FUNCT7), system::hfence_gvma),
        ])
        .with_csrs([
            CsrDesc::rw(HSTATUS, "hstatus"),
            CsrDesc::rw(HEDELEG, "hedeleg"),
            CsrDesc::rw(HIDELEG, "hideleg"),
            CsrDesc::rw(HIE, "hie"),
            CsrDesc::masked(HCOUNTEREN, "hcounteren", 0b111),
            CsrDesc::rw(HTVAL, "htval"),
            CsrDesc::rw(HIP, "hip"),
            CsrDesc::rw(HTINST, "htinst"),
            CsrDesc::rw(HGATP, "hgatp"),
            CsrDesc::rw(VSSTATUS, "vsstatus"),
            CsrDesc::rw(VSIE, "vsie"),
            CsrDesc::rw(VSTVEC, "vstvec"),
            CsrDesc::rw(VSSCRATCH, "vsscratch"),
            CsrDesc::rw(VSEPC, "vsepc"),
            CsrDesc::rw(VSCAUSE, "vscause"),
            CsrDesc::rw(VSTVAL, "vstval"),
            CsrDesc::rw(VSIP, "vsip"),
            CsrDesc::rw(VSATP, "vsatp"),
            CsrDesc::rw(MTINST, "mtinst"),
            CsrDesc::rw(MTVAL2, "mtval2"),
        ])
}

fn debug() -> ExtensionDesc {
    ExtensionDesc::new("Sdext", Enablement::Isa)
        .with_instructions([InsnDesc::new("dret", Pattern::exact(DRET), system::dret)])
        .with_csrs([
            CsrDesc::rw(DCSR, "dcsr"),
            CsrDesc::rw(DPC, "dpc"),
            CsrDesc::rw(DSCRATCH0, "dscratch0"),
            CsrDesc::rw(DSCRATCH1, "dscratch1"),
        ])
}

fn csr_access() -> ExtensionDesc {
    let csr = |name, funct3| InsnDesc::new(name, Pattern::opcode(OP_SYSTEM).funct3(funct3), zicsr::csr);
    ExtensionDesc::new("Zicsr", Enablement::Isa).with_instructions([
        csr("csrrw", CSRRW),
        csr("csrrs", CSRRS),
        csr("csrrc", CSRRC),
        csr("csrrwi", CSRRWI),
        csr("csrrsi", CSRRSI),
        csr("csrrci", CSRRCI),
    ])
}

fn fetch_fence() -> ExtensionDesc {
    ExtensionDesc::new("Zifencei", Enablement::Isa).with_instructions([InsnDesc::new(
        "fence.i",
        Pattern::opcode(OP_MISC_MEM).funct3(FENCE_I),
        zifencei::fence_i,
    )])
}

/// The user counters are always present; access is gated by the counter-enable CSRs.
fn counters() -> ExtensionDesc {
    ExtensionDesc::new("Zicntr", Enablement::Always).with_csrs([
        CsrDesc::ro(CYCLE, "cycle", 0),
        CsrDesc::ro(TIME, "time", 0),
        CsrDesc::ro(INSTRET, "instret", 0),
    ])
}

/// Machine, supervisor, hypervisor and debug levels plus the CSR, fetch-fence
/// and counter extensions.
pub fn extensions() -> Vec<ExtensionDesc> {
    vec![
        machine(),
        supervisor(),
        hypervisor(),
        debug(),
        csr_access(),
        fetch_fence(),
        counters(),
    ]
}
