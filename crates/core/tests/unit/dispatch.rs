//! # Dispatch Table Tests
//!
//! Overlap detection, candidate ordering and the illegal-instruction fallback.

use std::cell::RefCell;
use std::rc::Rc;

use crate::common::harness::{RAM_BASE, SharedMemory, TestContext, standard_registry};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rviss_core::common::DispatchError;
use rviss_core::core::arch::mode::PrivilegeMode;
use rviss_core::ext::EnableContext;
use rviss_core::isa::opcodes::{OP_CUSTOM_0, OP_IMM};
use rviss_core::isa::IsaProfile;
use rviss_core::soc::FlatMemory;
use rviss_core::{Config, Cpu, DispatchTable, Enablement, ExtensionDesc, Insn, InsnDesc, Pattern, SimError, Trap};

fn first(_: &mut Cpu, _: Insn, _: u64) -> Result<u64, Trap> {
    Ok(1)
}

fn second(_: &mut Cpu, _: Insn, _: u64) -> Result<u64, Trap> {
    Ok(2)
}

const fn custom0(funct3: u32) -> u32 {
    (funct3 << 12) | OP_CUSTOM_0
}

fn build(entries: &[(&str, InsnDesc)]) -> Result<DispatchTable, DispatchError> {
    DispatchTable::build(entries.iter().map(|(ext, desc)| (*ext, desc)))
}

fn matched_name(table: &DispatchTable, word: u32) -> Option<&'static str> {
    table.lookup(Insn::from(word)).map(|e| e.name)
}

#[test]
fn test_overlap_between_extensions_is_rejected() {
    let wide = InsnDesc::new("wide", Pattern::opcode(OP_CUSTOM_0), first);
    let narrow = InsnDesc::new("narrow", Pattern::opcode(OP_CUSTOM_0).funct3(1), second);

    let result = build(&[("xa", wide), ("Xb", narrow)]);

    assert_eq!(
        result.map(|t| t.len()),
        Err(DispatchError::Overlap {
            first: "wide".into(),
            first_ext: "xa".into(),
            second: "narrow".into(),
            second_ext: "xb".into(),
            mask: 0x7f,
            matched: OP_CUSTOM_0,
        })
    );
}

#[test]
fn test_overlap_tolerant_entries_resolve_by_specificity() {
    let wide = InsnDesc::new("wide", Pattern::opcode(OP_CUSTOM_0), first).overlapping();
    let narrow = InsnDesc::new("narrow", Pattern::opcode(OP_CUSTOM_0).funct3(1), second).overlapping();

    let table = build(&[("xa", wide), ("xb", narrow)]).expect("tolerant overlap builds");

    assert_eq!(matched_name(&table, custom0(1)), Some("narrow"));
    assert_eq!(matched_name(&table, custom0(0)), Some("wide"));
    assert_eq!(table.len(), 2);
}

#[test]
fn test_one_sided_tolerance_still_conflicts() {
    let wide = InsnDesc::new("wide", Pattern::opcode(OP_CUSTOM_0), first).overlapping();
    let narrow = InsnDesc::new("narrow", Pattern::opcode(OP_CUSTOM_0).funct3(1), second);

    assert!(matches!(
        build(&[("xa", wide), ("xb", narrow)]),
        Err(DispatchError::Overlap { .. })
    ));
}

#[test]
fn test_same_extension_prefers_more_specific_entry() {
    let wide = InsnDesc::new("wide", Pattern::opcode(OP_CUSTOM_0), first);
    let narrow = InsnDesc::new("narrow", Pattern::opcode(OP_CUSTOM_0).funct3(1), second);

    let table = build(&[("xa", wide), ("xa", narrow)]).expect("same-extension overlap builds");

    assert_eq!(matched_name(&table, custom0(1)), Some("narrow"));
    assert_eq!(matched_name(&table, custom0(2)), Some("wide"));
}

#[test]
fn test_equal_specificity_keeps_declaration_order() {
    let a = InsnDesc::new("a", Pattern::opcode(OP_CUSTOM_0).funct3(1), first);
    let b = InsnDesc::new("b", Pattern::opcode(OP_CUSTOM_0).bits(25, 3, 1), second);

    let table = build(&[("xa", a), ("xa", b)]).expect("builds");

    assert_eq!(matched_name(&table, custom0(1) | (1 << 25)), Some("a"));
    assert_eq!(matched_name(&table, custom0(0) | (1 << 25)), Some("b"));
}

#[test]
fn test_match_bits_outside_mask_are_rejected() {
    let bad = InsnDesc::new("bad", Pattern::raw(0x7f, 0x80 | OP_CUSTOM_0), first);

    assert_eq!(
        build(&[("xa", bad)]).map(|t| t.len()),
        Err(DispatchError::MalformedEntry("bad".into()))
    );
}

#[test]
fn test_entry_with_open_partition_bits_is_found_in_every_partition() {
    let any = InsnDesc::new("any32", Pattern::raw(0b11, 0b11), first);

    let table = build(&[("xa", any)]).expect("builds");

    assert_eq!(matched_name(&table, custom0(0)), Some("any32"));
    assert_eq!(matched_name(&table, 0x0000_0013), Some("any32"));
    assert_eq!(matched_name(&table, 0x0505), None);
}

#[test]
fn test_compressed_pattern_only_matches_its_slot() {
    let addi = InsnDesc::new("c.addi", Pattern::compressed(0b01, 0b000), first);

    let table = build(&[("c", addi)]).expect("builds");

    assert_eq!(matched_name(&table, 0x0505), Some("c.addi"));
    assert_eq!(matched_name(&table, 0x2505), None);
    assert_eq!(matched_name(&table, 0x0000_0513), None);
}

#[test]
fn test_unmatched_word_resolves_to_illegal_instruction() {
    let table = build(&[]).expect("empty table builds");
    let mut ctx = TestContext::new();
    let insn = Insn::from(custom0(0));

    assert!(table.is_empty());
    assert!(table.lookup(insn).is_none());
    let handler = table.resolve(insn);
    assert_eq!(
        handler(&mut ctx.cpu, insn, RAM_BASE),
        Err(Trap::IllegalInstruction(u64::from(custom0(0))))
    );
}

#[test]
fn test_hart_with_conflicting_extension_fails_to_build() {
    let mut registry = standard_registry();
    registry
        .register(
            ExtensionDesc::new("xclash", Enablement::Always)
                .with_instructions([InsnDesc::new("clash", Pattern::opcode(OP_IMM), first)]),
        )
        .expect("name and CSRs are free");
    let ram = Rc::new(RefCell::new(FlatMemory::new(RAM_BASE, 0x1000)));

    let result = Cpu::new(&Config::default(), registry, Box::new(SharedMemory(ram)));

    assert!(matches!(
        result,
        Err(SimError::Dispatch(DispatchError::Overlap { ref second_ext, .. })) if second_ext == "xclash"
    ));
}

#[test]
fn test_builtin_extensions_do_not_conflict() {
    let mut config = Config::default();
    config.isa.isa = "rv64gcv_zba_zbb_zicond_zvbb_zvkned_zvkg_zvknha".to_string();

    let ctx = TestContext::with_config(config);

    assert!(ctx.cpu.enabled().contains("zvknha"));
}

fn builtin_table() -> DispatchTable {
    let registry = standard_registry();
    let isa = IsaProfile::parse("rv64gcv_zba_zbb_zicond_zvbb_zvkned_zvkg_zvknha", "msu").expect("valid ISA");
    let instructions = registry.instructions_for(&EnableContext {
        isa: &isa,
        misa: isa.misa(),
        privilege: PrivilegeMode::Machine,
        virt: false,
    });
    DispatchTable::build(instructions.iter().map(|(e, i)| (e.as_str(), i))).expect("builtin set builds")
}

proptest! {
    #[test]
    fn prop_lookup_is_deterministic_and_matches(bits in any::<u32>()) {
        let table = builtin_table();
        let again = builtin_table();
        let insn = Insn::from(bits);

        let found = table.lookup(insn);
        prop_assert_eq!(found.map(|e| e.name), again.lookup(insn).map(|e| e.name));
        if let Some(entry) = found {
            let word = if insn.len() == 2 { bits & 0xffff } else { bits };
            prop_assert!(entry.pattern.matches(word));
        }
    }
}
