use crate::core::exec::{bitmanip, rv64a, rv64i, rv64m, zicond};
use crate::ext::{Enablement, ExtensionDesc, Handler, InsnDesc};
use crate::isa::Pattern;
use crate::isa::opcodes::{
    OP_AMO, OP_AUIPC, OP_BRANCH, OP_IMM, OP_IMM_32, OP_JAL, OP_JALR, OP_LOAD, OP_LUI, OP_MISC_MEM,
    OP_REG, OP_REG_32, OP_STORE,
};
use crate::isa::privileged::opcodes::{EBREAK, ECALL};
use crate::isa::rv64a as amo;
use crate::isa::rv64i::{funct3 as f3, funct7 as f7};
use crate::isa::rv64m as muldiv;

const fn r(op: u32, funct3: u32, funct7: u32) -> Pattern {
    Pattern::opcode(op).funct3(funct3).funct7(funct7)
}

const fn i(op: u32, funct3: u32) -> Pattern {
    Pattern::opcode(op).funct3(funct3)
}

fn table(entries: &[(&'static str, Pattern, Handler)]) -> Vec<InsnDesc> {
    entries
        .iter()
        .map(|&(name, pattern, handler)| InsnDesc::new(name, pattern, handler))
        .collect()
}

fn base() -> ExtensionDesc {
    ExtensionDesc::new("I", Enablement::Always).with_instructions(table(&[
        ("lui", Pattern::opcode(OP_LUI), rv64i::lui),
        ("auipc", Pattern::opcode(OP_AUIPC), rv64i::auipc),
        ("jal", Pattern::opcode(OP_JAL), rv64i::jal),
        ("jalr", i(OP_JALR, 0), rv64i::jalr),
        ("beq", i(OP_BRANCH, f3::BEQ), rv64i::branch),
        ("bne", i(OP_BRANCH, f3::BNE), rv64i::branch),
        ("blt", i(OP_BRANCH, f3::BLT), rv64i::branch),
        ("bge", i(OP_BRANCH, f3::BGE), rv64i::branch),
        ("bltu", i(OP_BRANCH, f3::BLTU), rv64i::branch),
        ("bgeu", i(OP_BRANCH, f3::BGEU), rv64i::branch),
        ("lb", i(OP_LOAD, f3::LB), rv64i::load),
        ("lh", i(OP_LOAD, f3::LH), rv64i::load),
        ("lw", i(OP_LOAD, f3::LW), rv64i::load),
        ("ld", i(OP_LOAD, f3::LD), rv64i::load),
        ("lbu", i(OP_LOAD, f3::LBU), rv64i::load),
        ("lhu", i(OP_LOAD, f3::LHU), rv64i::load),
        ("lwu", i(OP_LOAD, f3::LWU), rv64i::load),
        ("sb", i(OP_STORE, f3::SB), rv64i::store),
        ("sh", i(OP_STORE, f3::SH), rv64i::store),
        ("sw", i(OP_STORE, f3::SW), rv64i::store),
        ("sd", i(OP_STORE, f3::SD), rv64i::store),
        ("addi", i(OP_IMM, f3::ADD_SUB), rv64i::op_imm),
        ("slti", i(OP_IMM, f3::SLT), rv64i::op_imm),
        ("sltiu", i(OP_IMM, f3::SLTU), rv64i::op_imm),
        ("xori", i(OP_IMM, f3::XOR), rv64i::op_imm),
        ("ori", i(OP_IMM, f3::OR), rv64i::op_imm),
        ("andi", i(OP_IMM, f3::AND), rv64i::op_imm),
        ("slli", i(OP_IMM, f3::SLL).funct6(f7::SHIFT_LOGICAL), rv64i::slli),
        ("srli", i(OP_IMM, f3::SRL_SRA).funct6(f7::SHIFT_LOGICAL), rv64i::srli),
        ("srai", i(OP_IMM, f3::SRL_SRA).funct6(f7::SHIFT_ARITH), rv64i::srai),
        ("addiw", i(OP_IMM_32, f3::ADD_SUB), rv64i::addiw),
        ("slliw", r(OP_IMM_32, f3::SLL, f7::DEFAULT), rv64i::shift_imm_word),
        ("srliw", r(OP_IMM_32, f3::SRL_SRA, f7::DEFAULT), rv64i::shift_imm_word),
        ("sraiw", r(OP_IMM_32, f3::SRL_SRA, f7::SUB_SRA), rv64i::shift_imm_word),
        ("add", r(OP_REG, f3::ADD_SUB, f7::DEFAULT), rv64i::add),
        ("sub", r(OP_REG, f3::ADD_SUB, f7::SUB_SRA), rv64i::sub),
        ("sll", r(OP_REG, f3::SLL, f7::DEFAULT), rv64i::sll),
        ("slt", r(OP_REG, f3::SLT, f7::DEFAULT), rv64i::slt),
        ("sltu", r(OP_REG, f3::SLTU, f7::DEFAULT), rv64i::sltu),
        ("xor", r(OP_REG, f3::XOR, f7::DEFAULT), rv64i::xor),
        ("srl", r(OP_REG, f3::SRL_SRA, f7::DEFAULT), rv64i::srl),
        ("sra", r(OP_REG, f3::SRL_SRA, f7::SUB_SRA), rv64i::sra),
        ("or", r(OP_REG, f3::OR, f7::DEFAULT), rv64i::or),
        ("and", r(OP_REG, f3::AND, f7::DEFAULT), rv64i::and),
        ("addw", r(OP_REG_32, f3::ADD_SUB, f7::DEFAULT), rv64i::addw),
        ("subw", r(OP_REG_32, f3::ADD_SUB, f7::SUB_SRA), rv64i::subw),
        ("sllw", r(OP_REG_32, f3::SLL, f7::DEFAULT), rv64i::sllw),
        ("srlw", r(OP_REG_32, f3::SRL_SRA, f7::DEFAULT), rv64i::srlw),
        ("sraw", r(OP_REG_32, f3::SRL_SRA, f7::SUB_SRA), rv64i::sraw),
        ("fence", i(OP_MISC_MEM, f3::FENCE), rv64i::fence),
        ("ecall", Pattern::exact(ECALL), rv64i::ecall),
        ("ebreak", Pattern::exact(EBREAK), rv64i::ebreak),
    ]))
}

fn multiply() -> ExtensionDesc {
    ExtensionDesc::new("M", Enablement::Isa).with_instructions(table(&[
        ("mul", r(OP_REG, muldiv::MUL, f7::MULDIV), rv64m::mul),
        ("mulh", r(OP_REG, muldiv::MULH, f7::MULDIV), rv64m::mulh),
        ("mulhsu", r(OP_REG, muldiv::MULHSU, f7::MULDIV), rv64m::mulhsu),
        ("mulhu", r(OP_REG, muldiv::MULHU, f7::MULDIV), rv64m::mulhu),
        ("div", r(OP_REG, muldiv::DIV, f7::MULDIV), rv64m::div),
        ("divu", r(OP_REG, muldiv::DIVU, f7::MULDIV), rv64m::divu),
        ("rem", r(OP_REG, muldiv::REM, f7::MULDIV), rv64m::rem),
        ("remu", r(OP_REG, muldiv::REMU, f7::MULDIV), rv64m::remu),
        ("mulw", r(OP_REG_32, muldiv::MUL, f7::MULDIV), rv64m::mulw),
        ("divw", r(OP_REG_32, muldiv::DIV, f7::MULDIV), rv64m::divw),
        ("divuw", r(OP_REG_32, muldiv::DIVU, f7::MULDIV), rv64m::divuw),
        ("remw", r(OP_REG_32, muldiv::REM, f7::MULDIV), rv64m::remw),
        ("remuw", r(OP_REG_32, muldiv::REMU, f7::MULDIV), rv64m::remuw),
    ]))
}

/// `(word name, doubleword name, funct5)` of every AMO.
const AMOS: [(&str, &str, u32); 9] = [
    ("amoswap.w", "amoswap.d", amo::AMOSWAP),
    ("amoadd.w", "amoadd.d", amo::AMOADD),
    ("amoxor.w", "amoxor.d", amo::AMOXOR),
    ("amoand.w", "amoand.d", amo::AMOAND),
    ("amoor.w", "amoor.d", amo::AMOOR),
    ("amomin.w", "amomin.d", amo::AMOMIN),
    ("amomax.w", "amomax.d", amo::AMOMAX),
    ("amominu.w", "amominu.d", amo::AMOMINU),
    ("amomaxu.w", "amomaxu.d", amo::AMOMAXU),
];

fn atomic() -> ExtensionDesc {
    let a = |width: u32, funct5: u32| i(OP_AMO, width).funct5(funct5);
    let mut entries = vec![
        InsnDesc::new("lr.w", a(f3::AMO_W, amo::LR).rs2(0), rv64a::lr),
        InsnDesc::new("lr.d", a(f3::AMO_D, amo::LR).rs2(0), rv64a::lr),
        InsnDesc::new("sc.w", a(f3::AMO_W, amo::SC), rv64a::sc),
        InsnDesc::new("sc.d", a(f3::AMO_D, amo::SC), rv64a::sc),
    ];
    for (word, double, funct5) in AMOS {
        entries.push(InsnDesc::new(word, a(f3::AMO_W, funct5), rv64a::amo));
        entries.push(InsnDesc::new(double, a(f3::AMO_D, funct5), rv64a::amo));
    }
    ExtensionDesc::new("A", Enablement::Isa).with_instructions(entries)
}

fn zba() -> ExtensionDesc {
    ExtensionDesc::new("Zba", Enablement::Isa).with_instructions(table(&[
        ("sh1add", r(OP_REG, f3::SH1ADD, f7::ZBA), bitmanip::sh1add),
        ("sh2add", r(OP_REG, f3::SH2ADD, f7::ZBA), bitmanip::sh2add),
        ("sh3add", r(OP_REG, f3::SH3ADD, f7::ZBA), bitmanip::sh3add),
        ("add.uw", r(OP_REG_32, f3::ADD_SUB, f7::ADD_UW), bitmanip::shadd_uw),
        ("sh1add.uw", r(OP_REG_32, f3::SH1ADD, f7::ZBA), bitmanip::shadd_uw),
        ("sh2add.uw", r(OP_REG_32, f3::SH2ADD, f7::ZBA), bitmanip::shadd_uw),
        ("sh3add.uw", r(OP_REG_32, f3::SH3ADD, f7::ZBA), bitmanip::shadd_uw),
        ("slli.uw", i(OP_IMM_32, f3::SLL).funct6(f7::SLLI_UW), bitmanip::slli_uw),
    ]))
}

fn zbb() -> ExtensionDesc {
    let unary = |imm: u32| i(OP_IMM, f3::SLL).imm12(imm);
    let unary_word = |imm: u32| i(OP_IMM_32, f3::SLL).imm12(imm);
    ExtensionDesc::new("Zbb", Enablement::Isa).with_instructions(table(&[
        ("andn", r(OP_REG, f3::AND, f7::ZBB_NEGATED), bitmanip::andn),
        ("orn", r(OP_REG, f3::OR, f7::ZBB_NEGATED), bitmanip::orn),
        ("xnor", r(OP_REG, f3::XOR, f7::ZBB_NEGATED), bitmanip::xnor),
        ("min", r(OP_REG, f3::MIN, f7::ZBB_MINMAX), bitmanip::min),
        ("minu", r(OP_REG, f3::MINU, f7::ZBB_MINMAX), bitmanip::minu),
        ("max", r(OP_REG, f3::MAX, f7::ZBB_MINMAX), bitmanip::max),
        ("maxu", r(OP_REG, f3::MAXU, f7::ZBB_MINMAX), bitmanip::maxu),
        ("rol", r(OP_REG, f3::SLL, f7::ZBB_ROTATE), bitmanip::rol),
        ("ror", r(OP_REG, f3::SRL_SRA, f7::ZBB_ROTATE), bitmanip::ror),
        ("rolw", r(OP_REG_32, f3::SLL, f7::ZBB_ROTATE), bitmanip::rolw),
        ("rorw", r(OP_REG_32, f3::SRL_SRA, f7::ZBB_ROTATE), bitmanip::rorw),
        ("rori", i(OP_IMM, f3::SRL_SRA).funct6(f7::RORI), bitmanip::rori),
        ("roriw", r(OP_IMM_32, f3::SRL_SRA, f7::ZBB_ROTATE), bitmanip::roriw),
        ("clz", unary(0x600), bitmanip::unary),
        ("ctz", unary(0x601), bitmanip::unary),
        ("cpop", unary(0x602), bitmanip::unary),
        ("sext.b", unary(0x604), bitmanip::unary),
        ("sext.h", unary(0x605), bitmanip::unary),
        ("clzw", unary_word(0x600), bitmanip::unary_word),
        ("ctzw", unary_word(0x601), bitmanip::unary_word),
        ("cpopw", unary_word(0x602), bitmanip::unary_word),
        ("zext.h", r(OP_REG_32, f3::XOR, f7::ZBB_ZEXT_H).rs2(0), bitmanip::zext_h),
        ("zext.h", r(OP_REG, f3::XOR, f7::ZBB_ZEXT_H).rs2(0), bitmanip::zext_h),
        ("orc.b", i(OP_IMM, f3::SRL_SRA).imm12(0x287), bitmanip::orc_b),
        ("rev8", i(OP_IMM, f3::SRL_SRA).imm12(0x6b8), bitmanip::rev8),
        ("rev8", i(OP_IMM, f3::SRL_SRA).imm12(0x698), bitmanip::rev8),
    ]))
}

fn zicond() -> ExtensionDesc {
    ExtensionDesc::new("Zicond", Enablement::Isa).with_instructions(table(&[
        ("czero.eqz", r(OP_REG, f3::CZERO_EQZ, f7::CZERO), zicond::czero_eqz),
        ("czero.nez", r(OP_REG, f3::CZERO_NEZ, f7::CZERO), zicond::czero_nez),
    ]))
}

/// I, M, A, Zba, Zbb, Zicond.
pub fn extensions() -> Vec<ExtensionDesc> {
    vec![base(), multiply(), atomic(), zba(), zbb(), zicond()]
}
