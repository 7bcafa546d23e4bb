//! Floating-Point (F, D) function codes.
//!
//! OP-FP encodes the operation in `funct5` (`bits[31:27]`) and the operand
//! format in `fmt` (`bits[26:25]`), so single- and double-precision share
//! every code below.

/// `fmt` for single precision.
pub const FMT_S: u32 = 0b00;
/// `fmt` for double precision.
pub const FMT_D: u32 = 0b01;

/// `funct3` width code of FLW/FSW.
pub const WIDTH_W: u32 = 0b010;
/// `funct3` width code of FLD/FSD.
pub const WIDTH_D: u32 = 0b011;

/// Add.
pub const FADD: u32 = 0b00000;
/// Subtract.
pub const FSUB: u32 = 0b00001;
/// Multiply.
pub const FMUL: u32 = 0b00010;
/// Divide.
pub const FDIV: u32 = 0b00011;
/// Square root (`rs2 = 0`).
pub const FSQRT: u32 = 0b01011;
/// Sign injection; `funct3` selects J, JN, JX.
pub const FSGNJ: u32 = 0b00100;
/// Minimum/maximum; `funct3` selects.
pub const FMIN_MAX: u32 = 0b00101;
/// Precision conversion between formats.
pub const FCVT_FF: u32 = 0b01000;
/// Comparisons; `funct3` selects LE, LT, EQ.
pub const FCMP: u32 = 0b10100;
/// Float to integer conversion; `rs2` selects W, WU, L, LU.
pub const FCVT_INT_F: u32 = 0b11000;
/// Integer to float conversion; `rs2` selects W, WU, L, LU.
pub const FCVT_F_INT: u32 = 0b11010;
/// FMV.X.* (`funct3 = 000`) and FCLASS (`funct3 = 001`).
pub const FMV_X_F: u32 = 0b11100;
/// FMV.*.X.
pub const FMV_F_X: u32 = 0b11110;

/// Sign-injection `funct3` codes.
pub const SGNJ: u32 = 0b000;
/// Negated sign injection.
pub const SGNJN: u32 = 0b001;
/// Xor sign injection.
pub const SGNJX: u32 = 0b010;
/// Minimum.
pub const MIN: u32 = 0b000;
/// Maximum.
pub const MAX: u32 = 0b001;
/// Less or equal.
pub const LE: u32 = 0b000;
/// Less than.
pub const LT: u32 = 0b001;
/// Equal.
pub const EQ: u32 = 0b010;
/// FMV.X.W / FMV.X.D.
pub const MV: u32 = 0b000;
/// FCLASS.
pub const CLASS: u32 = 0b001;
