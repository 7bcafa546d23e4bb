//! # Configuration Tests
//!
//! JSON loading, defaults for missing fields, and range validation.

use std::io::Write;

use pretty_assertions::assert_eq;
use rviss_core::Config;
use rviss_core::common::ConfigError;
use rstest::rstest;

#[test]
fn test_empty_document_yields_defaults() {
    let config = Config::from_json("{}").expect("empty document is valid");

    assert_eq!(config.isa.isa, "rv64imafdc_zicsr_zifencei");
    assert_eq!(config.isa.priv_levels, "msu");
    assert_eq!(config.isa.vlen, 128);
    assert_eq!(config.isa.elen, 64);
    assert_eq!(config.general.start_pc, 0x8000_0000);
    assert_eq!(config.general.hart_id, 0);
    assert!(!config.trap.debugger_attached);
    assert_eq!(config.memory.ram_size, 16 * 1024 * 1024);
}

#[test]
fn test_partial_section_keeps_other_defaults() {
    let config = Config::from_json(
        r#"{
            "general": { "hart_id": 2, "trace_instructions": true },
            "isa": { "isa": "rv64gcv_zvkned", "vlen": 256 },
            "trap": { "debugger_attached": true, "debug_entry": 4096 }
        }"#,
    )
    .expect("valid document");

    assert_eq!(config.general.hart_id, 2);
    assert!(config.general.trace_instructions);
    assert_eq!(config.general.start_pc, 0x8000_0000);
    assert_eq!(config.isa.isa, "rv64gcv_zvkned");
    assert_eq!(config.isa.vlen, 256);
    assert_eq!(config.isa.elen, 64);
    assert!(config.trap.debugger_attached);
    assert_eq!(config.trap.debug_entry, 4096);
    assert_eq!(config.trap.debug_exception_entry, 0x808);
}

#[test]
fn test_malformed_json_is_rejected() {
    let result = Config::from_json(r#"{ "isa": { "vlen": "wide" } }"#);

    assert!(matches!(result, Err(ConfigError::Json(_))));
}

#[rstest]
#[case::vlen_not_power_of_two(r#"{ "isa": { "vlen": 96 } }"#, "isa.vlen")]
#[case::vlen_too_small(r#"{ "isa": { "vlen": 32, "elen": 32 } }"#, "isa.vlen")]
#[case::elen_unsupported(r#"{ "isa": { "elen": 16 } }"#, "isa.elen")]
#[case::odd_start_pc(r#"{ "general": { "start_pc": 2147483649 } }"#, "general.start_pc")]
fn test_out_of_range_values_name_the_field(#[case] json: &str, #[case] expected: &str) {
    match Config::from_json(json) {
        Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected),
        other => panic!("expected an invalid `{expected}`, got {other:?}"),
    }
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, r#"{{ "isa": {{ "isa": "rv32imac", "priv_levels": "mu" }} }}"#).expect("write config");

    let config = Config::from_file(file.path()).expect("file loads");

    assert_eq!(config.isa.isa, "rv32imac");
    assert_eq!(config.isa.priv_levels, "mu");
}

#[test]
fn test_missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");

    let result = Config::from_file(dir.path().join("absent.json"));

    assert!(matches!(result, Err(ConfigError::Io(_))));
}
