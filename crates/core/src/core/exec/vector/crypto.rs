//! Vector crypto on 128-bit element groups (Zvkned, Zvkg, Zvknha).
//!
//! Every instruction here runs through the element-group template at SEW = 32:
//! `vd` holds the running state and is written back group by group.

use super::done;
use crate::common::error::Trap;
use crate::core::Cpu;
use crate::core::units::crypto::{aes, from_u128, ghash, sha256, to_u128};
use crate::core::units::vector::engine::{self, GroupSource};
use crate::isa::Insn;
use crate::isa::rvv::crypto;

/// The AES rounds, `.vv` and `.vs`, selected by the `vs1` field.
///
/// The state is in `vd` and the round key in `vs2`.
pub fn aes_round(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let source = if insn.v_funct6() == crypto::VAES_VS { GroupSource::Scalar } else { GroupSource::PerGroup };
    let round: fn([u32; 4], [u32; 4]) -> [u32; 4] = match insn.rs1() as u32 {
        crypto::VS1_DM => |s, k| aes::decrypt_round(s, k, false),
        crypto::VS1_DF => |s, k| aes::decrypt_round(s, k, true),
        crypto::VS1_EM => |s, k| aes::encrypt_round(s, k, false),
        crypto::VS1_EF => |s, k| aes::encrypt_round(s, k, true),
        crypto::VS1_Z if source == GroupSource::Scalar => aes::add_key,
        _ => return Err(Trap::IllegalInstruction(insn.bits())),
    };
    engine::element_groups(cpu, insn, source, false, |state, key, _| round(state, key))?;
    done(insn, pc)
}

/// `vaeskf1.vi vd, vs2, rnd`: the next AES-128 round key.
pub fn vaeskf1(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let rnd = insn.v_zimm5() as u32;
    engine::element_groups(cpu, insn, GroupSource::PerGroup, false, |_, current, _| {
        aes::expand_128(current, rnd)
    })?;
    done(insn, pc)
}

/// `vaeskf2.vi vd, vs2, rnd`: the next AES-256 round key; `vd` holds the key two rounds back.
pub fn vaeskf2(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let rnd = insn.v_zimm5() as u32;
    engine::element_groups(cpu, insn, GroupSource::PerGroup, false, |older, current, _| {
        aes::expand_256(older, current, rnd)
    })?;
    done(insn, pc)
}

/// `vgmul.vv vd, vs2`: `vd = vd * vs2` in GF(2^128).
pub fn vgmul(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    engine::element_groups(cpu, insn, GroupSource::PerGroup, false, |y, h, _| {
        from_u128(ghash::multiply(to_u128(y), to_u128(h)))
    })?;
    done(insn, pc)
}

/// `vghsh.vv vd, vs2, vs1`: `vd = (vd ^ vs1) * vs2` in GF(2^128).
pub fn vghsh(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    engine::element_groups(cpu, insn, GroupSource::PerGroup, true, |y, h, x| {
        from_u128(ghash::multiply_accumulate(to_u128(y), to_u128(x), to_u128(h)))
    })?;
    done(insn, pc)
}

/// `vsha2ms.vv vd, vs2, vs1`: four message-schedule words.
///
/// `vd` holds `W[0..4]`, `vs2` holds `{W4, W9, W10, W11}` and `vs1` holds `W[12..16]`.
pub fn vsha2ms(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    engine::element_groups(cpu, insn, GroupSource::PerGroup, true, sha256::message_schedule)?;
    done(insn, pc)
}

/// `vsha2ch.vv` and `vsha2cl.vv`: two compression rounds using the high or
/// low pair of message words in `vs1`.
///
/// `vs2` holds `{f, e, b, a}` and `vd` holds `{h, g, d, c}`; the new
/// `{f, e, b, a}` replace `vd`.
pub fn vsha2c(cpu: &mut Cpu, insn: Insn, pc: u64) -> Result<u64, Trap> {
    let high = match insn.v_funct6() {
        crypto::VSHA2CH => true,
        crypto::VSHA2CL => false,
        _ => return Err(Trap::IllegalInstruction(insn.bits())),
    };
    engine::element_groups(cpu, insn, GroupSource::PerGroup, true, |cdgh, abef, wk| {
        let words = if high { [wk[2], wk[3]] } else { [wk[0], wk[1]] };
        sha256::compress_two(abef, cdgh, words)
    })?;
    done(insn, pc)
}
