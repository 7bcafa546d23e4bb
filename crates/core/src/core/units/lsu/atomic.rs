//! Atomic memory operation ALU.
//!
//! Given the value in memory and the register operand, computes the value an
//! AMO writes back. Word-sized operations compare and combine the low 32 bits;
//! the memory collaborator stores only the low `size` bytes.

/// Read-modify-write operation of an AMO.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AmoOp {
    /// Store the register value.
    Swap,
    /// Add.
    Add,
    /// Exclusive or.
    Xor,
    /// And.
    And,
    /// Or.
    Or,
    /// Signed minimum.
    Min,
    /// Signed maximum.
    Max,
    /// Unsigned minimum.
    Minu,
    /// Unsigned maximum.
    Maxu,
}

impl AmoOp {
    /// Decodes `funct5` (`insn[31:27]`) of an AMO; `None` for LR, SC and reserved values.
    pub const fn from_funct5(funct5: u32) -> Option<Self> {
        match funct5 {
            0b00001 => Some(Self::Swap),
            0b00000 => Some(Self::Add),
            0b00100 => Some(Self::Xor),
            0b01100 => Some(Self::And),
            0b01000 => Some(Self::Or),
            0b10000 => Some(Self::Min),
            0b10100 => Some(Self::Max),
            0b11000 => Some(Self::Minu),
            0b11100 => Some(Self::Maxu),
            _ => None,
        }
    }

    /// New memory value for `mem` combined with `reg` at `size` bytes (4 or 8).
    pub const fn apply(self, mem: u64, reg: u64, size: usize) -> u64 {
        if size == 4 {
            let (a, b) = (mem as i32, reg as i32);
            let (ua, ub) = (mem as u32, reg as u32);
            let res = match self {
                Self::Swap => b,
                Self::Add => a.wrapping_add(b),
                Self::Xor => a ^ b,
                Self::And => a & b,
                Self::Or => a | b,
                Self::Min => if a < b { a } else { b },
                Self::Max => if a > b { a } else { b },
                Self::Minu => (if ua < ub { ua } else { ub }) as i32,
                Self::Maxu => (if ua > ub { ua } else { ub }) as i32,
            };
            res as u32 as u64
        } else {
            let (a, b) = (mem as i64, reg as i64);
            match self {
                Self::Swap => reg,
                Self::Add => mem.wrapping_add(reg),
                Self::Xor => mem ^ reg,
                Self::And => mem & reg,
                Self::Or => mem | reg,
                Self::Min => (if a < b { a } else { b }) as u64,
                Self::Max => (if a > b { a } else { b }) as u64,
                Self::Minu => if mem < reg { mem } else { reg },
                Self::Maxu => if mem > reg { mem } else { reg },
            }
        }
    }
}
