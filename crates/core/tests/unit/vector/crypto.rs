//! # Vector Crypto Tests
//!
//! AES-128 (FIPS-197 Appendix B), GHASH (GCM test case 2) and the SHA-256
//! message schedule of "abc", driven through the instructions.

use crate::common::builder::{vcrypto, vsetivli, vtype};
use crate::common::harness::{TestContext, hex};
use pretty_assertions::assert_eq;
use rviss_core::Trap;
use rviss_core::core::cpu::StepStatus;
use rviss_core::isa::rvv::crypto::*;

const ISA: &str = "rv64gcv_zvkned_zvkg_zvknha";

const KEY: &str = "2b7e151628aed2a6abf7158809cf4f3c";
const PLAINTEXT: &str = "3243f6a8885a308d313198a2e0370734";
const CIPHERTEXT: &str = "3925841d02dc09fbdc118597196a0b32";

/// Round key `r` of the schedule lives in `v(KEYS + r)`.
const KEYS: u32 = 10;

fn one_group(program: &[u32]) -> TestContext {
    let mut words = vec![vsetivli(0, 4, vtype(32, 0, true, true))];
    words.extend_from_slice(program);
    TestContext::with_isa(ISA).load_program(&words)
}

fn key_schedule() -> Vec<u32> {
    (1..=10).map(|r| vcrypto(VAESKF1, KEYS + r, KEYS + r - 1, r)).collect()
}

#[test]
fn test_aes128_key_schedule() {
    let program = key_schedule();
    let mut ctx = one_group(&program);
    ctx.set_vreg(KEYS as usize, &hex(KEY));

    ctx.retire(1 + program.len());

    assert_eq!(ctx.vreg(KEYS as usize + 1), hex("a0fafe1788542cb123a339392a6c7605"));
    assert_eq!(ctx.vreg(KEYS as usize + 10), hex("d014f9a8c9ee2589e13f0cc8b6630ca6"));
}

#[test]
fn test_aes128_encrypts_known_answer() {
    let mut program = key_schedule();
    program.push(vcrypto(VAES_VS, 1, KEYS, VS1_Z));
    program.extend((1..10).map(|r| vcrypto(VAES_VS, 1, KEYS + r, VS1_EM)));
    program.push(vcrypto(VAES_VS, 1, KEYS + 10, VS1_EF));
    let mut ctx = one_group(&program);
    ctx.set_vreg(KEYS as usize, &hex(KEY));
    ctx.set_vreg(1, &hex(PLAINTEXT));

    ctx.retire(1 + program.len());

    assert_eq!(ctx.vreg(1), hex(CIPHERTEXT));
}

#[test]
fn test_aes128_decrypts_known_answer() {
    let mut program = key_schedule();
    program.push(vcrypto(VAES_VS, 1, KEYS + 10, VS1_Z));
    program.extend((1..10).rev().map(|r| vcrypto(VAES_VS, 1, KEYS + r, VS1_DM)));
    program.push(vcrypto(VAES_VS, 1, KEYS, VS1_DF));
    let mut ctx = one_group(&program);
    ctx.set_vreg(KEYS as usize, &hex(KEY));
    ctx.set_vreg(1, &hex(CIPHERTEXT));

    ctx.retire(1 + program.len());

    assert_eq!(ctx.vreg(1), hex(PLAINTEXT));
}

#[test]
fn test_aes_vv_form_uses_per_group_keys() {
    let mut ctx = one_group(&[vcrypto(VAES_VV, 1, 2, VS1_EF)]);
    ctx.set_vreg(1, &hex(PLAINTEXT));
    ctx.set_vreg(2, &hex(KEY));
    let mut reference = one_group(&[vcrypto(VAES_VS, 1, 2, VS1_EF)]);
    reference.set_vreg(1, &hex(PLAINTEXT));
    reference.set_vreg(2, &hex(KEY));

    ctx.retire(2);
    reference.retire(2);

    assert_eq!(ctx.vreg(1), reference.vreg(1));
}

const GHASH_H: &str = "66e94bd4ef8a2c3b884cfa59ca342b2e";
const GHASH_C: &str = "0388dace60b6a392f328c2b971b2fe78";
const GHASH_X1: &str = "5e2ec746917062882c85b0685353deb7";

#[test]
fn test_vghsh_accumulates_one_block() {
    let mut ctx = one_group(&[vcrypto(VGHSH, 1, 2, 3)]);
    ctx.set_vreg(1, &[0; 16]);
    ctx.set_vreg(2, &hex(GHASH_H));
    ctx.set_vreg(3, &hex(GHASH_C));

    ctx.retire(2);

    assert_eq!(ctx.vreg(1), hex(GHASH_X1));
}

#[test]
fn test_vgmul_multiplies_in_place() {
    let mut ctx = one_group(&[vcrypto(VAES_VV, 1, 2, VS1_GMUL)]);
    ctx.set_vreg(1, &hex(GHASH_C));
    ctx.set_vreg(2, &hex(GHASH_H));

    ctx.retire(2);

    assert_eq!(ctx.vreg(1), hex(GHASH_X1));
}

#[test]
fn test_vsha2ms_extends_the_message_schedule() {
    let mut ctx = one_group(&[vcrypto(VSHA2MS, 1, 2, 3)]);
    ctx.set_velems32(1, &[0x6162_6380, 0, 0, 0]);
    ctx.set_velems32(2, &[0, 0, 0, 0]);
    ctx.set_velems32(3, &[0, 0, 0, 0x18]);

    ctx.retire(2);

    let words: Vec<u32> = (0..4).map(|i| ctx.velem32(1, i)).collect();
    assert_eq!(words, [0x6162_6380, 0x000f_0000, 0x7da8_6405, 0x6000_03c6]);
}

#[test]
fn test_partial_element_group_is_illegal() {
    let word = vcrypto(VAES_VS, 1, 2, VS1_Z);
    let mut ctx = TestContext::with_isa(ISA).load_program(&[vsetivli(0, 2, vtype(32, 0, true, true)), word]);
    ctx.set_vreg(1, &hex(PLAINTEXT));
    ctx.set_vreg(2, &hex(KEY));
    ctx.retire(1);

    assert_eq!(
        ctx.step(),
        StepStatus::Trapped(Trap::IllegalInstruction(u64::from(word)))
    );
    assert_eq!(ctx.vreg(1), hex(PLAINTEXT));
}

#[test]
fn test_scalar_form_rejects_overlapping_destination() {
    let word = vcrypto(VAES_VS, 1, 1, VS1_Z);
    let mut ctx = one_group(&[word]);
    ctx.retire(1);

    assert_eq!(
        ctx.step(),
        StepStatus::Trapped(Trap::IllegalInstruction(u64::from(word)))
    );
}

#[test]
fn test_crypto_requires_its_extension() {
    let word = vcrypto(VAES_VS, 1, 2, VS1_Z);
    let mut ctx = TestContext::with_isa("rv64gcv")
        .load_program(&[vsetivli(0, 4, vtype(32, 0, true, true)), word]);
    ctx.retire(1);

    assert_eq!(
        ctx.step(),
        StepStatus::Trapped(Trap::IllegalInstruction(u64::from(word)))
    );
}
