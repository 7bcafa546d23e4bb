//! Vector (V) and vector-crypto function codes.
//!
//! OP-V selects the operand category with `funct3` and the operation with
//! `funct6`. The same `funct6` value means different operations in the
//! integer (OPI*) and mask/multiply (OPM*) categories.

/// `funct3` operand categories.
pub mod category {
    /// Vector-vector integer.
    pub const OPIVV: u32 = 0b000;
    /// Vector-vector floating-point.
    pub const OPFVV: u32 = 0b001;
    /// Vector-vector mask/multiply.
    pub const OPMVV: u32 = 0b010;
    /// Vector-immediate integer.
    pub const OPIVI: u32 = 0b011;
    /// Vector-scalar integer.
    pub const OPIVX: u32 = 0b100;
    /// Vector-scalar floating-point.
    pub const OPFVF: u32 = 0b101;
    /// Vector-scalar mask/multiply.
    pub const OPMVX: u32 = 0b110;
    /// Configuration (`vsetvl*`).
    pub const OPCFG: u32 = 0b111;
}

/// Integer (`OPIVV`/`OPIVX`/`OPIVI`) `funct6` codes.
pub mod opi {
    /// vadd.
    pub const VADD: u32 = 0b00_0000;
    /// vandn (Zvbb).
    pub const VANDN: u32 = 0b00_0001;
    /// vsub.
    pub const VSUB: u32 = 0b00_0010;
    /// vrsub.
    pub const VRSUB: u32 = 0b00_0011;
    /// vminu.
    pub const VMINU: u32 = 0b00_0100;
    /// vmin.
    pub const VMIN: u32 = 0b00_0101;
    /// vmaxu.
    pub const VMAXU: u32 = 0b00_0110;
    /// vmax.
    pub const VMAX: u32 = 0b00_0111;
    /// vand.
    pub const VAND: u32 = 0b00_1001;
    /// vor.
    pub const VOR: u32 = 0b00_1010;
    /// vxor.
    pub const VXOR: u32 = 0b00_1011;
    /// vrgather.
    pub const VRGATHER: u32 = 0b00_1100;
    /// vslideup (VX/VI).
    pub const VSLIDEUP: u32 = 0b00_1110;
    /// vslidedown (VX/VI).
    pub const VSLIDEDOWN: u32 = 0b00_1111;
    /// vror (Zvbb).
    pub const VROR: u32 = 0b01_0100;
    /// vrol (Zvbb).
    pub const VROL: u32 = 0b01_0101;
    /// vmerge / vmv.v.
    pub const VMERGE: u32 = 0b01_0111;
    /// vmseq.
    pub const VMSEQ: u32 = 0b01_1000;
    /// vmsne.
    pub const VMSNE: u32 = 0b01_1001;
    /// vmsltu.
    pub const VMSLTU: u32 = 0b01_1010;
    /// vmslt.
    pub const VMSLT: u32 = 0b01_1011;
    /// vmsleu.
    pub const VMSLEU: u32 = 0b01_1100;
    /// vmsle.
    pub const VMSLE: u32 = 0b01_1101;
    /// vmsgtu (VX/VI).
    pub const VMSGTU: u32 = 0b01_1110;
    /// vmsgt (VX/VI).
    pub const VMSGT: u32 = 0b01_1111;
    /// vsaddu.
    pub const VSADDU: u32 = 0b10_0000;
    /// vsadd.
    pub const VSADD: u32 = 0b10_0001;
    /// vssubu.
    pub const VSSUBU: u32 = 0b10_0010;
    /// vssub.
    pub const VSSUB: u32 = 0b10_0011;
    /// vsll.
    pub const VSLL: u32 = 0b10_0101;
    /// vsmul (VV/VX).
    pub const VSMUL: u32 = 0b10_0111;
    /// vsrl.
    pub const VSRL: u32 = 0b10_1000;
    /// vsra.
    pub const VSRA: u32 = 0b10_1001;
    /// vssrl.
    pub const VSSRL: u32 = 0b10_1010;
    /// vssra.
    pub const VSSRA: u32 = 0b10_1011;
    /// vnsrl.
    pub const VNSRL: u32 = 0b10_1100;
    /// vnsra.
    pub const VNSRA: u32 = 0b10_1101;
    /// vnclipu.
    pub const VNCLIPU: u32 = 0b10_1110;
    /// vnclip.
    pub const VNCLIP: u32 = 0b10_1111;
}

/// Mask/multiply (`OPMVV`/`OPMVX`) `funct6` codes.
pub mod opm {
    /// vredsum.
    pub const VREDSUM: u32 = 0b00_0000;
    /// vredand.
    pub const VREDAND: u32 = 0b00_0001;
    /// vredor.
    pub const VREDOR: u32 = 0b00_0010;
    /// vredxor.
    pub const VREDXOR: u32 = 0b00_0011;
    /// vredminu.
    pub const VREDMINU: u32 = 0b00_0100;
    /// vredmin.
    pub const VREDMIN: u32 = 0b00_0101;
    /// vredmaxu.
    pub const VREDMAXU: u32 = 0b00_0110;
    /// vredmax.
    pub const VREDMAX: u32 = 0b00_0111;
    /// vaaddu.
    pub const VAADDU: u32 = 0b00_1000;
    /// vaadd.
    pub const VAADD: u32 = 0b00_1001;
    /// vasubu.
    pub const VASUBU: u32 = 0b00_1010;
    /// vasub.
    pub const VASUB: u32 = 0b00_1011;
    /// vslide1up (VX).
    pub const VSLIDE1UP: u32 = 0b00_1110;
    /// vslide1down (VX).
    pub const VSLIDE1DOWN: u32 = 0b00_1111;
    /// vmv.x.s, vcpop.m, vfirst.m (VV); vmv.s.x (VX).
    pub const VWXUNARY0: u32 = 0b01_0000;
    /// vbrev8, vrev8 (Zvbb unary group).
    pub const VXUNARY0: u32 = 0b01_0010;
    /// viota.m, vid.v.
    pub const VMUNARY0: u32 = 0b01_0100;
    /// vcompress.
    pub const VCOMPRESS: u32 = 0b01_0111;
    /// vmandn.
    pub const VMANDN: u32 = 0b01_1000;
    /// vmand.
    pub const VMAND: u32 = 0b01_1001;
    /// vmor.
    pub const VMOR: u32 = 0b01_1010;
    /// vmxor.
    pub const VMXOR: u32 = 0b01_1011;
    /// vmorn.
    pub const VMORN: u32 = 0b01_1100;
    /// vmnand.
    pub const VMNAND: u32 = 0b01_1101;
    /// vmnor.
    pub const VMNOR: u32 = 0b01_1110;
    /// vmxnor.
    pub const VMXNOR: u32 = 0b01_1111;
    /// vdivu.
    pub const VDIVU: u32 = 0b10_0000;
    /// vdiv.
    pub const VDIV: u32 = 0b10_0001;
    /// vremu.
    pub const VREMU: u32 = 0b10_0010;
    /// vrem.
    pub const VREM: u32 = 0b10_0011;
    /// vmulhu.
    pub const VMULHU: u32 = 0b10_0100;
    /// vmul.
    pub const VMUL: u32 = 0b10_0101;
    /// vmulhsu.
    pub const VMULHSU: u32 = 0b10_0110;
    /// vmulh.
    pub const VMULH: u32 = 0b10_0111;
    /// vwaddu.
    pub const VWADDU: u32 = 0b11_0000;
    /// vwadd.
    pub const VWADD: u32 = 0b11_0001;
    /// vwsubu.
    pub const VWSUBU: u32 = 0b11_0010;
    /// vwsub.
    pub const VWSUB: u32 = 0b11_0011;
    /// vwaddu.w.
    pub const VWADDU_W: u32 = 0b11_0100;
    /// vwadd.w.
    pub const VWADD_W: u32 = 0b11_0101;
    /// vwsubu.w.
    pub const VWSUBU_W: u32 = 0b11_0110;
    /// vwsub.w.
    pub const VWSUB_W: u32 = 0b11_0111;
    /// vwmulu.
    pub const VWMULU: u32 = 0b11_1000;
    /// vwmulsu.
    pub const VWMULSU: u32 = 0b11_1010;
    /// vwmul.
    pub const VWMUL: u32 = 0b11_1011;

    /// `vs1` selector of vmv.x.s inside VWXUNARY0.
    pub const VS1_VMV_X_S: u32 = 0b00000;
    /// `vs1` selector of vcpop.m inside VWXUNARY0.
    pub const VS1_VCPOP: u32 = 0b10000;
    /// `vs1` selector of vfirst.m inside VWXUNARY0.
    pub const VS1_VFIRST: u32 = 0b10001;
    /// `vs1` selector of vbrev8.v inside VXUNARY0.
    pub const VS1_VBREV8: u32 = 0b01000;
    /// `vs1` selector of vrev8.v inside VXUNARY0.
    pub const VS1_VREV8: u32 = 0b01001;
    /// `vs1` selector of vbrev.v inside VXUNARY0.
    pub const VS1_VBREV: u32 = 0b01010;
    /// `vs1` selector of vclz.v inside VXUNARY0.
    pub const VS1_VCLZ: u32 = 0b01100;
    /// `vs1` selector of vctz.v inside VXUNARY0.
    pub const VS1_VCTZ: u32 = 0b01101;
    /// `vs1` selector of vcpop.v inside VXUNARY0.
    pub const VS1_VCPOP_V: u32 = 0b01110;
    /// `vs1` selector of viota.m inside VMUNARY0.
    pub const VS1_VIOTA: u32 = 0b10000;
    /// `vs1` selector of vid.v inside VMUNARY0.
    pub const VS1_VID: u32 = 0b10001;
}

/// Vector-crypto (OP-VE, `funct3 = OPMVV`) `funct6` codes.
pub mod crypto {
    /// AES round on element groups, key per group (`.vv` forms, Zvkned) and vgmul (Zvkg).
    pub const VAES_VV: u32 = 0b10_1000;
    /// AES round with a scalar key group (`.vs` forms) and vaesz.
    pub const VAES_VS: u32 = 0b10_1001;
    /// vaeskf1.vi.
    pub const VAESKF1: u32 = 0b10_0010;
    /// vaeskf2.vi.
    pub const VAESKF2: u32 = 0b10_1010;
    /// vghsh.vv.
    pub const VGHSH: u32 = 0b10_1100;
    /// vsha2ms.vv.
    pub const VSHA2MS: u32 = 0b10_1101;
    /// vsha2ch.vv.
    pub const VSHA2CH: u32 = 0b10_1110;
    /// vsha2cl.vv.
    pub const VSHA2CL: u32 = 0b10_1111;

    /// `vs1` selector: middle decryption round.
    pub const VS1_DM: u32 = 0b00000;
    /// `vs1` selector: final decryption round.
    pub const VS1_DF: u32 = 0b00001;
    /// `vs1` selector: middle encryption round.
    pub const VS1_EM: u32 = 0b00010;
    /// `vs1` selector: final encryption round.
    pub const VS1_EF: u32 = 0b00011;
    /// `vs1` selector: round-zero key addition.
    pub const VS1_Z: u32 = 0b00111;
    /// `vs1` selector of vgmul.vv.
    pub const VS1_GMUL: u32 = 0b10001;
}

/// Vector memory `mop` codes.
pub mod mop {
    /// Unit-stride.
    pub const UNIT_STRIDE: u32 = 0b00;
    /// Indexed unordered.
    pub const INDEXED_UNORDERED: u32 = 0b01;
    /// Strided.
    pub const STRIDED: u32 = 0b10;
    /// Indexed ordered.
    pub const INDEXED_ORDERED: u32 = 0b11;

    /// Unit-stride `lumop`/`sumop`: plain element access.
    pub const UNIT: u32 = 0b00000;
    /// Unit-stride `lumop`/`sumop`: whole-register access.
    pub const WHOLE_REGISTER: u32 = 0b01000;
    /// Unit-stride `lumop`/`sumop`: mask access (`vlm.v`, `vsm.v`).
    pub const MASK: u32 = 0b01011;
    /// Unit-stride `lumop`: fault-only-first load.
    pub const FAULT_FIRST: u32 = 0b10000;
}

/// Vector memory width codes (`funct3` of LOAD-FP/STORE-FP).
pub mod width {
    /// 8-bit elements.
    pub const E8: u32 = 0b000;
    /// 16-bit elements.
    pub const E16: u32 = 0b101;
    /// 32-bit elements.
    pub const E32: u32 = 0b110;
    /// 64-bit elements.
    pub const E64: u32 = 0b111;
}
