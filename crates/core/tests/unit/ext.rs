//! # Extension Registry Tests
//!
//! Registration errors, enable predicates and a custom accelerator plugged in
//! through the registry.

use std::sync::Arc;

use crate::common::builder::{csrr, csrw};
use crate::common::harness::{RAM_BASE, TestContext, standard_registry};
use pretty_assertions::assert_eq;
use rviss_core::common::RegistryError;
use rviss_core::core::arch::csr::MSCRATCH;
use rviss_core::core::arch::mode::PrivilegeMode;
use rviss_core::core::cpu::StepStatus;
use rviss_core::ext::EnableContext;
use rviss_core::isa::isa_string::misa_bit;
use rviss_core::isa::opcodes::OP_CUSTOM_0;
use rviss_core::isa::{Insn, IsaProfile};
use rviss_core::{Config, Cpu, CsrDesc, Enablement, ExtensionDesc, InsnDesc, Pattern, Trap};

/// Scratch CSR of the accelerator, in the custom machine read/write range.
const XDOUBLE_SCRATCH: u16 = 0x7c0;

/// `double rd, rs1`: `rd = rs1 * 2`.
fn double(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let value = cpu.x(insn.rs1()).wrapping_mul(2);
    cpu.set_x(insn.rd(), value);
    Ok(pc + insn.len())
}

fn xdouble() -> ExtensionDesc {
    ExtensionDesc::new("xdouble", Enablement::Isa)
        .with_instructions([InsnDesc::new("double", Pattern::opcode(OP_CUSTOM_0).funct3(0), double)])
        .with_csrs([CsrDesc::rw(XDOUBLE_SCRATCH, "xdscratch")])
}

const fn double_word(rd: u32, rs1: u32) -> u32 {
    (rs1 << 15) | (rd << 7) | OP_CUSTOM_0
}

fn context_for(isa: &str) -> TestContext {
    let mut registry = standard_registry();
    registry.register(xdouble()).expect("xdouble registers");
    let mut config = Config::default();
    config.isa.isa = isa.to_string();
    TestContext::with_registry(config, registry)
}

#[test]
fn test_duplicate_name_is_rejected_case_insensitively() {
    let mut registry = standard_registry();

    let result = registry.register(ExtensionDesc::new("zicsr", Enablement::Always));

    assert_eq!(result, Err(RegistryError::Duplicate("zicsr".into())));
}

#[test]
fn test_csr_claimed_twice_is_rejected() {
    let mut registry = standard_registry();
    let desc = ExtensionDesc::new("Xscratch", Enablement::Always).with_csrs([CsrDesc::rw(MSCRATCH, "mscratch")]);

    let result = registry.register(desc);

    assert!(matches!(
        result,
        Err(RegistryError::CsrConflict { addr: MSCRATCH, ref second, .. }) if second == "xscratch"
    ));
    assert!(registry.get("xscratch").is_none());
}

#[test]
fn test_lookup_is_case_insensitive() {
    let registry = standard_registry();

    assert_eq!(registry.get("zvkned").map(|d| d.name.as_str()), Some("Zvkned"));
    assert_eq!(registry.get("ZVKNED").map(|d| d.name.as_str()), Some("Zvkned"));
}

#[test]
fn test_enable_predicates_follow_isa_and_misa() {
    let registry = standard_registry();
    let isa = IsaProfile::parse("rv64imac", "msu").expect("valid ISA");
    let ctx = EnableContext {
        isa: &isa,
        misa: isa.misa(),
        privilege: PrivilegeMode::Machine,
        virt: false,
    };

    assert_eq!(registry.is_enabled("M", &ctx), Ok(true));
    assert_eq!(registry.is_enabled("F", &ctx), Ok(false));
    assert_eq!(registry.is_enabled("Zvkned", &ctx), Ok(false));

    let without_m = EnableContext {
        misa: isa.misa() & !misa_bit('m'),
        ..ctx
    };
    assert_eq!(registry.is_enabled("M", &without_m), Ok(false));
}

#[test]
fn test_unknown_extension_query_is_an_error() {
    let registry = standard_registry();
    let isa = IsaProfile::parse("rv64gc", "msu").expect("valid ISA");
    let ctx = EnableContext {
        isa: &isa,
        misa: isa.misa(),
        privilege: PrivilegeMode::Machine,
        virt: false,
    };

    assert_eq!(
        registry.is_enabled("Zfoo", &ctx),
        Err(RegistryError::Unknown("Zfoo".into()))
    );
}

#[test]
fn test_custom_predicate_sees_privilege() {
    let desc = ExtensionDesc::new(
        "xmonly",
        Enablement::Custom(Arc::new(|ctx: &EnableContext<'_>| ctx.privilege == PrivilegeMode::Machine)),
    );
    let isa = IsaProfile::parse("rv64gc", "msu").expect("valid ISA");
    let machine = EnableContext {
        isa: &isa,
        misa: isa.misa(),
        privilege: PrivilegeMode::Machine,
        virt: false,
    };
    let user = EnableContext {
        privilege: PrivilegeMode::User,
        ..machine
    };

    assert!(desc.is_enabled(&machine));
    assert!(!desc.is_enabled(&user));
}

#[test]
fn test_enabled_set_lists_active_extensions() {
    let ctx = TestContext::with_isa("rv64imac");
    let enabled = ctx.cpu.enabled();

    for name in ["i", "m", "a", "c", "zicsr", "sm", "s"] {
        assert!(enabled.contains(name), "missing {name}");
    }
    assert!(!enabled.contains("f"));
    assert!(!enabled.contains("v"));
}

// ──────────────────────────────────────────────────────────
// Custom accelerator
// ──────────────────────────────────────────────────────────

#[test]
fn test_custom_instruction_executes_when_configured() {
    let mut ctx = context_for("rv64imac_xdouble").load_program(&[double_word(10, 11)]);
    ctx.set_reg(11, 21);

    assert_eq!(ctx.step(), StepStatus::Retired);
    assert_eq!(ctx.get_reg(10), 42);
}

#[test]
fn test_custom_csr_is_accessible_when_configured() {
    let mut ctx = context_for("rv64imac_xdouble").load_program(&[csrw(XDOUBLE_SCRATCH, 11), csrr(10, XDOUBLE_SCRATCH)]);
    ctx.set_reg(11, 0x5a5a);

    ctx.retire(2);

    assert_eq!(ctx.get_reg(10), 0x5a5a);
}

#[test]
fn test_custom_extension_absent_from_isa_is_illegal() {
    let word = double_word(10, 11);
    let mut ctx = context_for("rv64imac").load_program(&[word, csrr(10, XDOUBLE_SCRATCH)]);

    assert!(!ctx.cpu.enabled().contains("xdouble"));
    assert_eq!(
        ctx.cpu.execute(Insn::from(word), RAM_BASE),
        Err(Trap::IllegalInstruction(u64::from(word)))
    );
    let read = csrr(10, XDOUBLE_SCRATCH);
    assert_eq!(
        ctx.cpu.execute(Insn::from(read), RAM_BASE + 4),
        Err(Trap::IllegalInstruction(u64::from(read)))
    );
}
