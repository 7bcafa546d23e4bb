use crate::core::arch::csr::{FCSR, FFLAGS, FRM};
use crate::core::exec::fp;
use crate::ext::{CsrDesc, Enablement, ExtensionDesc, InsnDesc};
use crate::isa::Pattern;
use crate::isa::opcodes::{OP_FP, OP_LOAD_FP, OP_MADD, OP_MSUB, OP_NMADD, OP_NMSUB, OP_STORE_FP};
use crate::isa::rvf::{self, FMT_D, FMT_S, WIDTH_D, WIDTH_W};

/// Mnemonics of one precision; the format itself comes from `funct2`.
struct Mnemonics {
    load: &'static str,
    store: &'static str,
    fused: [&'static str; 4],
    arith: [&'static str; 5],
    sign: [&'static str; 3],
    min_max: [&'static str; 2],
    compare: [&'static str; 3],
    to_int: [&'static str; 4],
    from_int: [&'static str; 4],
    move_to_int: &'static str,
    class: &'static str,
    move_from_int: &'static str,
}

const SINGLE: Mnemonics = Mnemonics {
    load: "flw",
    store: "fsw",
    fused: ["fmadd.s", "fmsub.s", "fnmsub.s", "fnmadd.s"],
    arith: ["fadd.s", "fsub.s", "fmul.s", "fdiv.s", "fsqrt.s"],
    sign: ["fsgnj.s", "fsgnjn.s", "fsgnjx.s"],
    min_max: ["fmin.s", "fmax.s"],
    compare: ["fle.s", "flt.s", "feq.s"],
    to_int: ["fcvt.w.s", "fcvt.wu.s", "fcvt.l.s", "fcvt.lu.s"],
    from_int: ["fcvt.s.w", "fcvt.s.wu", "fcvt.s.l", "fcvt.s.lu"],
    move_to_int: "fmv.x.w",
    class: "fclass.s",
    move_from_int: "fmv.w.x",
};

const DOUBLE: Mnemonics = Mnemonics {
    load: "fld",
    store: "fsd",
    fused: ["fmadd.d", "fmsub.d", "fnmsub.d", "fnmadd.d"],
    arith: ["fadd.d", "fsub.d", "fmul.d", "fdiv.d", "fsqrt.d"],
    sign: ["fsgnj.d", "fsgnjn.d", "fsgnjx.d"],
    min_max: ["fmin.d", "fmax.d"],
    compare: ["fle.d", "flt.d", "feq.d"],
    to_int: ["fcvt.w.d", "fcvt.wu.d", "fcvt.l.d", "fcvt.lu.d"],
    from_int: ["fcvt.d.w", "fcvt.d.wu", "fcvt.d.l", "fcvt.d.lu"],
    move_to_int: "fmv.x.d",
    class: "fclass.d",
    move_from_int: "fmv.d.x",
};

/// OP-FP with `funct7 = funct5 << 2 | fmt`.
const fn op_fp(funct5: u32, fmt: u32) -> Pattern {
    Pattern::opcode(OP_FP).funct7((funct5 << 2) | fmt)
}

fn instructions(fmt: u32, width: u32, n: &Mnemonics) -> Vec<InsnDesc> {
    let mut list = vec![
        InsnDesc::new(n.load, Pattern::opcode(OP_LOAD_FP).funct3(width), fp::load),
        InsnDesc::new(n.store, Pattern::opcode(OP_STORE_FP).funct3(width), fp::store),
    ];
    for (name, op) in n.fused.into_iter().zip([OP_MADD, OP_MSUB, OP_NMSUB, OP_NMADD]) {
        list.push(InsnDesc::new(name, Pattern::opcode(op).funct2(fmt), fp::fused));
    }
    for (name, funct5) in n.arith.into_iter().zip([rvf::FADD, rvf::FSUB, rvf::FMUL, rvf::FDIV]) {
        list.push(InsnDesc::new(name, op_fp(funct5, fmt), fp::arith));
    }
    list.push(InsnDesc::new(n.arith[4], op_fp(rvf::FSQRT, fmt).rs2(0), fp::arith));
    for (name, f3) in n.sign.into_iter().zip([rvf::SGNJ, rvf::SGNJN, rvf::SGNJX]) {
        list.push(InsnDesc::new(name, op_fp(rvf::FSGNJ, fmt).funct3(f3), fp::sign_inject));
    }
    for (name, f3) in n.min_max.into_iter().zip([rvf::MIN, rvf::MAX]) {
        list.push(InsnDesc::new(name, op_fp(rvf::FMIN_MAX, fmt).funct3(f3), fp::min_max));
    }
    for (name, f3) in n.compare.into_iter().zip([rvf::LE, rvf::LT, rvf::EQ]) {
        list.push(InsnDesc::new(name, op_fp(rvf::FCMP, fmt).funct3(f3), fp::compare));
    }
    for (kind, (to, from)) in n.to_int.into_iter().zip(n.from_int).enumerate() {
        let kind = kind as u32;
        list.push(InsnDesc::new(to, op_fp(rvf::FCVT_INT_F, fmt).rs2(kind), fp::to_int));
        list.push(InsnDesc::new(from, op_fp(rvf::FCVT_F_INT, fmt).rs2(kind), fp::from_int));
    }
    list.extend([
        InsnDesc::new(
            n.move_to_int,
            op_fp(rvf::FMV_X_F, fmt).funct3(rvf::MV).rs2(0),
            fp::move_to_int,
        ),
        InsnDesc::new(
            n.class,
            op_fp(rvf::FMV_X_F, fmt).funct3(rvf::CLASS).rs2(0),
            fp::move_to_int,
        ),
        InsnDesc::new(
            n.move_from_int,
            op_fp(rvf::FMV_F_X, fmt).funct3(rvf::MV).rs2(0),
            fp::move_from_int,
        ),
    ]);
    list
}

/// F and D. D also owns the conversions between the two precisions.
pub fn extensions() -> Vec<ExtensionDesc> {
    let single = ExtensionDesc::new("F", Enablement::Isa)
        .with_instructions(instructions(FMT_S, WIDTH_W, &SINGLE))
        .with_csrs([
            CsrDesc::masked(FFLAGS, "fflags", 0x1f),
            CsrDesc::masked(FRM, "frm", 0x7),
            CsrDesc::rw(FCSR, "fcsr"),
        ]);
    let double = ExtensionDesc::new("D", Enablement::Isa)
        .with_instructions(instructions(FMT_D, WIDTH_D, &DOUBLE))
        .with_instructions([
            InsnDesc::new("fcvt.s.d", op_fp(rvf::FCVT_FF, FMT_S).rs2(FMT_D), fp::convert),
            InsnDesc::new("fcvt.d.s", op_fp(rvf::FCVT_FF, FMT_D).rs2(FMT_S), fp::convert),
        ]);
    vec![single, double]
}
