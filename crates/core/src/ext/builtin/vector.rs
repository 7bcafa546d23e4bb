use crate::core::arch::csr::{VCSR, VL, VLENB, VSTART, VTYPE, VXRM, VXSAT};
use crate::core::exec::vector::{config, crypto, fixed, int, mask, mem, permute, reduce, zvbb};
use crate::ext::{CsrDesc, Enablement, ExtensionDesc, Handler, InsnDesc};
use crate::isa::Pattern;
use crate::isa::opcodes::{OP_LOAD_FP, OP_STORE_FP, OP_V, OP_VE};
use crate::isa::rvv::{self, category::*, mop, opi, opm, width};

/// `OP-V` in one category with the given `funct6`.
const fn op(funct3: u32, funct6: u32) -> Pattern {
    Pattern::opcode(OP_V).funct3(funct3).funct6(funct6)
}

/// One entry per listed form, named `<mnemonic>.<suffix>`.
fn forms(
    list: &mut Vec<InsnDesc>,
    funct6: u32,
    variants: &[(&'static str, u32)],
    handler: Handler,
) {
    for &(name, funct3) in variants {
        list.push(InsnDesc::new(name, op(funct3, funct6), handler));
    }
}

fn configuration(list: &mut Vec<InsnDesc>) {
    let cfg = Pattern::opcode(OP_V).funct3(OPCFG);
    list.extend([
        InsnDesc::new("vsetvli", cfg.bits(31, 1, 0), config::vsetvli),
        InsnDesc::new("vsetivli", cfg.bits(30, 2, 0b11), config::vsetivli),
        InsnDesc::new("vsetvl", cfg.funct7(0b100_0000), config::vsetvl),
    ]);
}

fn integer(list: &mut Vec<InsnDesc>) {
    forms(list, opi::VADD, &[("vadd.vv", OPIVV), ("vadd.vx", OPIVX), ("vadd.vi", OPIVI)], int::arith);
    forms(list, opi::VSUB, &[("vsub.vv", OPIVV), ("vsub.vx", OPIVX)], int::arith);
    forms(list, opi::VRSUB, &[("vrsub.vx", OPIVX), ("vrsub.vi", OPIVI)], int::arith);
    forms(list, opi::VMINU, &[("vminu.vv", OPIVV), ("vminu.vx", OPIVX)], int::arith);
    forms(list, opi::VMIN, &[("vmin.vv", OPIVV), ("vmin.vx", OPIVX)], int::arith);
    forms(list, opi::VMAXU, &[("vmaxu.vv", OPIVV), ("vmaxu.vx", OPIVX)], int::arith);
    forms(list, opi::VMAX, &[("vmax.vv", OPIVV), ("vmax.vx", OPIVX)], int::arith);
    forms(list, opi::VAND, &[("vand.vv", OPIVV), ("vand.vx", OPIVX), ("vand.vi", OPIVI)], int::arith);
    forms(list, opi::VOR, &[("vor.vv", OPIVV), ("vor.vx", OPIVX), ("vor.vi", OPIVI)], int::arith);
    forms(list, opi::VXOR, &[("vxor.vv", OPIVV), ("vxor.vx", OPIVX), ("vxor.vi", OPIVI)], int::arith);
    forms(list, opi::VSLL, &[("vsll.vv", OPIVV), ("vsll.vx", OPIVX), ("vsll.vi", OPIVI)], int::arith);
    forms(list, opi::VSRL, &[("vsrl.vv", OPIVV), ("vsrl.vx", OPIVX), ("vsrl.vi", OPIVI)], int::arith);
    forms(list, opi::VSRA, &[("vsra.vv", OPIVV), ("vsra.vx", OPIVX), ("vsra.vi", OPIVI)], int::arith);

    forms(list, opm::VMUL, &[("vmul.vv", OPMVV), ("vmul.vx", OPMVX)], int::arith);
    forms(list, opm::VMULH, &[("vmulh.vv", OPMVV), ("vmulh.vx", OPMVX)], int::arith);
    forms(list, opm::VMULHU, &[("vmulhu.vv", OPMVV), ("vmulhu.vx", OPMVX)], int::arith);
    forms(list, opm::VMULHSU, &[("vmulhsu.vv", OPMVV), ("vmulhsu.vx", OPMVX)], int::arith);
    forms(list, opm::VDIVU, &[("vdivu.vv", OPMVV), ("vdivu.vx", OPMVX)], int::arith);
    forms(list, opm::VDIV, &[("vdiv.vv", OPMVV), ("vdiv.vx", OPMVX)], int::arith);
    forms(list, opm::VREMU, &[("vremu.vv", OPMVV), ("vremu.vx", OPMVX)], int::arith);
    forms(list, opm::VREM, &[("vrem.vv", OPMVV), ("vrem.vx", OPMVX)], int::arith);

    forms(list, opm::VWADDU, &[("vwaddu.vv", OPMVV), ("vwaddu.vx", OPMVX)], int::widen);
    forms(list, opm::VWADD, &[("vwadd.vv", OPMVV), ("vwadd.vx", OPMVX)], int::widen);
    forms(list, opm::VWSUBU, &[("vwsubu.vv", OPMVV), ("vwsubu.vx", OPMVX)], int::widen);
    forms(list, opm::VWSUB, &[("vwsub.vv", OPMVV), ("vwsub.vx", OPMVX)], int::widen);
    forms(list, opm::VWADDU_W, &[("vwaddu.wv", OPMVV), ("vwaddu.wx", OPMVX)], int::widen);
    forms(list, opm::VWADD_W, &[("vwadd.wv", OPMVV), ("vwadd.wx", OPMVX)], int::widen);
    forms(list, opm::VWSUBU_W, &[("vwsubu.wv", OPMVV), ("vwsubu.wx", OPMVX)], int::widen);
    forms(list, opm::VWSUB_W, &[("vwsub.wv", OPMVV), ("vwsub.wx", OPMVX)], int::widen);
    forms(list, opm::VWMULU, &[("vwmulu.vv", OPMVV), ("vwmulu.vx", OPMVX)], int::widen);
    forms(list, opm::VWMULSU, &[("vwmulsu.vv", OPMVV), ("vwmulsu.vx", OPMVX)], int::widen);
    forms(list, opm::VWMUL, &[("vwmul.vv", OPMVV), ("vwmul.vx", OPMVX)], int::widen);

    forms(list, opi::VNSRL, &[("vnsrl.wv", OPIVV), ("vnsrl.wx", OPIVX), ("vnsrl.wi", OPIVI)], int::narrow_shift);
    forms(list, opi::VNSRA, &[("vnsra.wv", OPIVV), ("vnsra.wx", OPIVX), ("vnsra.wi", OPIVI)], int::narrow_shift);

    forms(list, opi::VMSEQ, &[("vmseq.vv", OPIVV), ("vmseq.vx", OPIVX), ("vmseq.vi", OPIVI)], int::compare);
    forms(list, opi::VMSNE, &[("vmsne.vv", OPIVV), ("vmsne.vx", OPIVX), ("vmsne.vi", OPIVI)], int::compare);
    forms(list, opi::VMSLTU, &[("vmsltu.vv", OPIVV), ("vmsltu.vx", OPIVX)], int::compare);
    forms(list, opi::VMSLT, &[("vmslt.vv", OPIVV), ("vmslt.vx", OPIVX)], int::compare);
    forms(list, opi::VMSLEU, &[("vmsleu.vv", OPIVV), ("vmsleu.vx", OPIVX), ("vmsleu.vi", OPIVI)], int::compare);
    forms(list, opi::VMSLE, &[("vmsle.vv", OPIVV), ("vmsle.vx", OPIVX), ("vmsle.vi", OPIVI)], int::compare);
    forms(list, opi::VMSGTU, &[("vmsgtu.vx", OPIVX), ("vmsgtu.vi", OPIVI)], int::compare);
    forms(list, opi::VMSGT, &[("vmsgt.vx", OPIVX), ("vmsgt.vi", OPIVI)], int::compare);
}

fn fixed_point(list: &mut Vec<InsnDesc>) {
    forms(list, opi::VSADDU, &[("vsaddu.vv", OPIVV), ("vsaddu.vx", OPIVX), ("vsaddu.vi", OPIVI)], fixed::saturating);
    forms(list, opi::VSADD, &[("vsadd.vv", OPIVV), ("vsadd.vx", OPIVX), ("vsadd.vi", OPIVI)], fixed::saturating);
    forms(list, opi::VSSUBU, &[("vssubu.vv", OPIVV), ("vssubu.vx", OPIVX)], fixed::saturating);
    forms(list, opi::VSSUB, &[("vssub.vv", OPIVV), ("vssub.vx", OPIVX)], fixed::saturating);
    forms(list, opm::VAADDU, &[("vaaddu.vv", OPMVV), ("vaaddu.vx", OPMVX)], fixed::averaging);
    forms(list, opm::VAADD, &[("vaadd.vv", OPMVV), ("vaadd.vx", OPMVX)], fixed::averaging);
    forms(list, opm::VASUBU, &[("vasubu.vv", OPMVV), ("vasubu.vx", OPMVX)], fixed::averaging);
    forms(list, opm::VASUB, &[("vasub.vv", OPMVV), ("vasub.vx", OPMVX)], fixed::averaging);
    forms(list, opi::VSMUL, &[("vsmul.vv", OPIVV), ("vsmul.vx", OPIVX)], fixed::vsmul);
    forms(list, opi::VSSRL, &[("vssrl.vv", OPIVV), ("vssrl.vx", OPIVX), ("vssrl.vi", OPIVI)], fixed::scaling_shift);
    forms(list, opi::VSSRA, &[("vssra.vv", OPIVV), ("vssra.vx", OPIVX), ("vssra.vi", OPIVI)], fixed::scaling_shift);
    forms(list, opi::VNCLIPU, &[("vnclipu.wv", OPIVV), ("vnclipu.wx", OPIVX), ("vnclipu.wi", OPIVI)], fixed::clip);
    forms(list, opi::VNCLIP, &[("vnclip.wv", OPIVV), ("vnclip.wx", OPIVX), ("vnclip.wi", OPIVI)], fixed::clip);
}

fn reductions(list: &mut Vec<InsnDesc>) {
    for (name, funct6) in [
        ("vredsum.vs", opm::VREDSUM),
        ("vredand.vs", opm::VREDAND),
        ("vredor.vs", opm::VREDOR),
        ("vredxor.vs", opm::VREDXOR),
        ("vredminu.vs", opm::VREDMINU),
        ("vredmin.vs", opm::VREDMIN),
        ("vredmaxu.vs", opm::VREDMAXU),
        ("vredmax.vs", opm::VREDMAX),
    ] {
        list.push(InsnDesc::new(name, op(OPMVV, funct6), reduce::reduce));
    }
}

fn masks(list: &mut Vec<InsnDesc>) {
    for (name, funct6) in [
        ("vmandn.mm", opm::VMANDN),
        ("vmand.mm", opm::VMAND),
        ("vmor.mm", opm::VMOR),
        ("vmxor.mm", opm::VMXOR),
        ("vmorn.mm", opm::VMORN),
        ("vmnand.mm", opm::VMNAND),
        ("vmnor.mm", opm::VMNOR),
        ("vmxnor.mm", opm::VMXNOR),
    ] {
        list.push(InsnDesc::new(name, op(OPMVV, funct6).vm(1), mask::logical));
    }
    let wx = op(OPMVV, opm::VWXUNARY0);
    let unary = op(OPMVV, opm::VMUNARY0);
    list.extend([
        InsnDesc::new("vcpop.m", wx.rs1(opm::VS1_VCPOP), mask::vcpop),
        InsnDesc::new("vfirst.m", wx.rs1(opm::VS1_VFIRST), mask::vfirst),
        InsnDesc::new("viota.m", unary.rs1(opm::VS1_VIOTA), mask::viota),
        InsnDesc::new("vid.v", unary.rs1(opm::VS1_VID).rs2(0), mask::vid),
    ]);
}

fn permutes(list: &mut Vec<InsnDesc>) {
    for (merge, mv, funct3) in [
        ("vmerge.vvm", "vmv.v.v", OPIVV),
        ("vmerge.vxm", "vmv.v.x", OPIVX),
        ("vmerge.vim", "vmv.v.i", OPIVI),
    ] {
        list.push(InsnDesc::new(merge, op(funct3, opi::VMERGE).vm(0), permute::merge));
        list.push(InsnDesc::new(mv, op(funct3, opi::VMERGE).vm(1).rs2(0), permute::merge));
    }
    list.extend([
        InsnDesc::new(
            "vmv.x.s",
            op(OPMVV, opm::VWXUNARY0).rs1(opm::VS1_VMV_X_S).vm(1),
            permute::vmv_x_s,
        ),
        InsnDesc::new("vmv.s.x", op(OPMVX, opm::VWXUNARY0).rs2(0).vm(1), permute::vmv_s_x),
        InsnDesc::new("vcompress.vm", op(OPMVV, opm::VCOMPRESS).vm(1), permute::vcompress),
        InsnDesc::new("vslide1up.vx", op(OPMVX, opm::VSLIDE1UP), permute::slide1up),
        InsnDesc::new("vslide1down.vx", op(OPMVX, opm::VSLIDE1DOWN), permute::slide1down),
    ]);
    forms(list, opi::VSLIDEUP, &[("vslideup.vx", OPIVX), ("vslideup.vi", OPIVI)], permute::slideup);
    forms(list, opi::VSLIDEDOWN, &[("vslidedown.vx", OPIVX), ("vslidedown.vi", OPIVI)], permute::slidedown);
    forms(
        list,
        opi::VRGATHER,
        &[("vrgather.vv", OPIVV), ("vrgather.vx", OPIVX), ("vrgather.vi", OPIVI)],
        permute::vrgather,
    );
}

/// Mnemonics per element width, in `E8, E16, E32, E64` order.
const WIDTHS: [u32; 4] = [width::E8, width::E16, width::E32, width::E64];
const UNIT_LOADS: [&str; 4] = ["vle8.v", "vle16.v", "vle32.v", "vle64.v"];
const UNIT_STORES: [&str; 4] = ["vse8.v", "vse16.v", "vse32.v", "vse64.v"];
const STRIDED_LOADS: [&str; 4] = ["vlse8.v", "vlse16.v", "vlse32.v", "vlse64.v"];
const STRIDED_STORES: [&str; 4] = ["vsse8.v", "vsse16.v", "vsse32.v", "vsse64.v"];
const WHOLE_LOADS: [&str; 4] = ["vl1re8.v", "vl1re16.v", "vl1re32.v", "vl1re64.v"];
const FAULT_FIRST_LOADS: [&str; 4] = ["vle8ff.v", "vle16ff.v", "vle32ff.v", "vle64ff.v"];
const UNORDERED_LOADS: [&str; 4] = ["vluxei8.v", "vluxei16.v", "vluxei32.v", "vluxei64.v"];
const ORDERED_LOADS: [&str; 4] = ["vloxei8.v", "vloxei16.v", "vloxei32.v", "vloxei64.v"];
const UNORDERED_STORES: [&str; 4] = ["vsuxei8.v", "vsuxei16.v", "vsuxei32.v", "vsuxei64.v"];
const ORDERED_STORES: [&str; 4] = ["vsoxei8.v", "vsoxei16.v", "vsoxei32.v", "vsoxei64.v"];

/// Vector loads and stores. `nf` is left free: segment and whole-register
/// counts are decoded by the handlers. Indexed forms leave `vs2` free.
fn memory(list: &mut Vec<InsnDesc>) {
    let access = |opcode: u32, width: u32, mop: u32| {
        Pattern::opcode(opcode).funct3(width).bits(26, 2, mop).bits(28, 1, 0)
    };
    let lumop = |p: Pattern, value: u32| p.bits(20, 5, value);
    for (k, width) in WIDTHS.into_iter().enumerate() {
        let load = access(OP_LOAD_FP, width, mop::UNIT_STRIDE);
        let store = access(OP_STORE_FP, width, mop::UNIT_STRIDE);
        list.extend([
            InsnDesc::new(UNIT_LOADS[k], lumop(load, mop::UNIT), mem::unit_load),
            InsnDesc::new(UNIT_STORES[k], lumop(store, mop::UNIT), mem::unit_store),
            InsnDesc::new(
                STRIDED_LOADS[k],
                access(OP_LOAD_FP, width, mop::STRIDED),
                mem::stride_load,
            ),
            InsnDesc::new(
                STRIDED_STORES[k],
                access(OP_STORE_FP, width, mop::STRIDED),
                mem::stride_store,
            ),
            InsnDesc::new(WHOLE_LOADS[k], lumop(load, mop::WHOLE_REGISTER).vm(1), mem::whole_load),
            InsnDesc::new(FAULT_FIRST_LOADS[k], lumop(load, mop::FAULT_FIRST), mem::fault_first_load),
            InsnDesc::new(
                UNORDERED_LOADS[k],
                access(OP_LOAD_FP, width, mop::INDEXED_UNORDERED),
                mem::indexed_load,
            ),
            InsnDesc::new(
                ORDERED_LOADS[k],
                access(OP_LOAD_FP, width, mop::INDEXED_ORDERED),
                mem::indexed_load,
            ),
            InsnDesc::new(
                UNORDERED_STORES[k],
                access(OP_STORE_FP, width, mop::INDEXED_UNORDERED),
                mem::indexed_store,
            ),
            InsnDesc::new(
                ORDERED_STORES[k],
                access(OP_STORE_FP, width, mop::INDEXED_ORDERED),
                mem::indexed_store,
            ),
        ]);
    }
    let load = access(OP_LOAD_FP, width::E8, mop::UNIT_STRIDE);
    let store = access(OP_STORE_FP, width::E8, mop::UNIT_STRIDE);
    list.extend([
        InsnDesc::new("vlm.v", lumop(load, mop::MASK).vm(1), mem::mask_load),
        InsnDesc::new("vsm.v", lumop(store, mop::MASK).vm(1), mem::mask_store),
        InsnDesc::new("vs1r.v", lumop(store, mop::WHOLE_REGISTER).vm(1), mem::whole_store),
    ]);
}

fn base() -> ExtensionDesc {
    let mut list = Vec::new();
    configuration(&mut list);
    integer(&mut list);
    fixed_point(&mut list);
    reductions(&mut list);
    masks(&mut list);
    permutes(&mut list);
    memory(&mut list);
    ExtensionDesc::new("V", Enablement::Isa)
        .with_instructions(list)
        .with_csrs([
            CsrDesc::rw(VSTART, "vstart"),
            CsrDesc::rw(VXSAT, "vxsat"),
            CsrDesc::rw(VXRM, "vxrm"),
            CsrDesc::rw(VCSR, "vcsr"),
            CsrDesc::ro(VL, "vl", 0),
            CsrDesc::ro(VTYPE, "vtype", 0),
            CsrDesc::ro(VLENB, "vlenb", 0),
        ])
}

fn bit_manipulation() -> ExtensionDesc {
    let mut list = Vec::new();
    forms(&mut list, opi::VANDN, &[("vandn.vv", OPIVV), ("vandn.vx", OPIVX)], zvbb::vandn);
    forms(&mut list, opi::VROL, &[("vrol.vv", OPIVV), ("vrol.vx", OPIVX)], zvbb::rotate);
    forms(&mut list, opi::VROR, &[("vror.vv", OPIVV), ("vror.vx", OPIVX)], zvbb::rotate);
    list.push(InsnDesc::new(
        "vror.vi",
        Pattern::opcode(OP_V).funct3(OPIVI).bits(27, 5, opi::VROR >> 1),
        zvbb::rotate,
    ));
    let unary = op(OPMVV, opm::VXUNARY0);
    for (name, vs1) in [
        ("vbrev8.v", opm::VS1_VBREV8),
        ("vrev8.v", opm::VS1_VREV8),
        ("vbrev.v", opm::VS1_VBREV),
        ("vclz.v", opm::VS1_VCLZ),
        ("vctz.v", opm::VS1_VCTZ),
        ("vcpop.v", opm::VS1_VCPOP_V),
    ] {
        list.push(InsnDesc::new(name, unary.rs1(vs1), zvbb::unary));
    }
    ExtensionDesc::new("Zvbb", Enablement::IsaAll(vec!["v", "zvbb"])).with_instructions(list)
}

/// `OP-VE`, `OPMVV`, unmasked: the encoding space of the crypto subsets.
const fn crypto_op(funct6: u32) -> Pattern {
    Pattern::opcode(OP_VE).funct3(OPMVV).funct6(funct6).vm(1)
}

fn aes() -> ExtensionDesc {
    use rvv::crypto::*;
    let vv = |name, vs1| InsnDesc::new(name, crypto_op(VAES_VV).rs1(vs1), crypto::aes_round);
    let vs = |name, vs1| InsnDesc::new(name, crypto_op(VAES_VS).rs1(vs1), crypto::aes_round);
    ExtensionDesc::new("Zvkned", Enablement::IsaAll(vec!["v", "zvkned"])).with_instructions([
        vv("vaesdm.vv", VS1_DM),
        vv("vaesdf.vv", VS1_DF),
        vv("vaesem.vv", VS1_EM),
        vv("vaesef.vv", VS1_EF),
        vs("vaesdm.vs", VS1_DM),
        vs("vaesdf.vs", VS1_DF),
        vs("vaesem.vs", VS1_EM),
        vs("vaesef.vs", VS1_EF),
        vs("vaesz.vs", VS1_Z),
        InsnDesc::new("vaeskf1.vi", crypto_op(VAESKF1), crypto::vaeskf1),
        InsnDesc::new("vaeskf2.vi", crypto_op(VAESKF2), crypto::vaeskf2),
    ])
}

fn ghash() -> ExtensionDesc {
    use rvv::crypto::*;
    ExtensionDesc::new("Zvkg", Enablement::IsaAll(vec!["v", "zvkg"])).with_instructions([
        InsnDesc::new("vgmul.vv", crypto_op(VAES_VV).rs1(VS1_GMUL), crypto::vgmul),
        InsnDesc::new("vghsh.vv", crypto_op(VGHSH), crypto::vghsh),
    ])
}

fn sha2() -> ExtensionDesc {
    use rvv::crypto::*;
    ExtensionDesc::new("Zvknha", Enablement::IsaAll(vec!["v", "zvknha"])).with_instructions([
        InsnDesc::new("vsha2ms.vv", crypto_op(VSHA2MS), crypto::vsha2ms),
        InsnDesc::new("vsha2ch.vv", crypto_op(VSHA2CH), crypto::vsha2c),
        InsnDesc::new("vsha2cl.vv", crypto_op(VSHA2CL), crypto::vsha2c),
    ])
}

/// V, Zvbb, Zvkned, Zvkg, Zvknha.
pub fn extensions() -> Vec<ExtensionDesc> {
    vec![base(), bit_manipulation(), aes(), ghash(), sha2()]
}
