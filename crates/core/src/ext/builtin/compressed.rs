use crate::core::exec::rvc;
use crate::ext::{Enablement, ExtensionDesc, Handler, InsnDesc};
use crate::isa::Pattern;
use crate::isa::rvc::{QUADRANT_0, QUADRANT_1, QUADRANT_2, q0, q1, q2};

/// One slot per quadrant and `funct3`; the handler splits a slot further.
const SLOTS: [(&str, u32, u32, Handler); 23] = [
    ("c.addi4spn", QUADRANT_0, q0::C_ADDI4SPN, rvc::c_addi4spn),
    ("c.fld", QUADRANT_0, q0::C_FLD, rvc::c_fld),
    ("c.lw", QUADRANT_0, q0::C_LW, rvc::c_lw),
    ("c.ld", QUADRANT_0, q0::C_LD, rvc::c_ld),
    ("c.fsd", QUADRANT_0, q0::C_FSD, rvc::c_fsd),
    ("c.sw", QUADRANT_0, q0::C_SW, rvc::c_sw),
    ("c.sd", QUADRANT_0, q0::C_SD, rvc::c_sd),
    ("c.addi", QUADRANT_1, q1::C_ADDI, rvc::c_addi),
    ("c.addiw", QUADRANT_1, q1::C_ADDIW, rvc::c_addiw),
    ("c.li", QUADRANT_1, q1::C_LI, rvc::c_li),
    ("c.lui", QUADRANT_1, q1::C_LUI_ADDI16SP, rvc::c_lui),
    ("c.alu", QUADRANT_1, q1::C_MISC_ALU, rvc::c_misc_alu),
    ("c.j", QUADRANT_1, q1::C_J, rvc::c_j),
    ("c.beqz", QUADRANT_1, q1::C_BEQZ, rvc::c_beqz),
    ("c.bnez", QUADRANT_1, q1::C_BNEZ, rvc::c_bnez),
    ("c.slli", QUADRANT_2, q2::C_SLLI, rvc::c_slli),
    ("c.fldsp", QUADRANT_2, q2::C_FLDSP, rvc::c_fldsp),
    ("c.lwsp", QUADRANT_2, q2::C_LWSP, rvc::c_lwsp),
    ("c.ldsp", QUADRANT_2, q2::C_LDSP, rvc::c_ldsp),
    ("c.jr", QUADRANT_2, q2::C_MISC_ALU, rvc::c_jr_mv_add),
    ("c.fsdsp", QUADRANT_2, q2::C_FSDSP, rvc::c_fsdsp),
    ("c.swsp", QUADRANT_2, q2::C_SWSP, rvc::c_swsp),
    ("c.sdsp", QUADRANT_2, q2::C_SDSP, rvc::c_sdsp),
];

/// C. Enabled while `c` is configured and set in `misa`.
pub fn extension() -> ExtensionDesc {
    ExtensionDesc::new("C", Enablement::Isa).with_instructions(
        SLOTS
            .iter()
            .map(|&(name, quadrant, funct3, handler)| {
                InsnDesc::new(name, Pattern::compressed(quadrant, funct3), handler)
            }),
    )
}
