//! ISA String Parsing.
//!
//! Turns an ISA descriptor such as `rv64imafdcv_zicsr_zvkned` plus a privilege
//! string such as `msu` into an [`IsaProfile`]: the base width, the set of
//! enabled extension names and the reset value of `misa`.
//!
//! Rules:
//! 1. The string starts with `rv32` or `rv64`, followed by `i` or `g`.
//! 2. Single-letter extensions follow in canonical order (`m a f d q c h p v`).
//!    Version suffixes such as `2p0` are accepted and ignored.
//! 3. Multi-letter extensions (`z*`, `s*`, `x*`) follow, separated by `_`.
//! 4. `Zicsr`, `Zifencei` and the debug extension `Sdext` are always present.

use std::collections::BTreeSet;
use std::fmt;

use crate::common::error::IsaError;

/// Canonical order of single-letter extensions after the base.
const SINGLE_LETTER_ORDER: &str = "mafdqchpv";

/// Single-letter extensions this core implements.
const SUPPORTED_SINGLE: &str = "mafdchv";

/// Multi-letter standard extensions this core recognises.
const SUPPORTED_MULTI: &[&str] = &[
    "zicsr",
    "zifencei",
    "zicond",
    "zicntr",
    "zihpm",
    "zihintpause",
    "zba",
    "zbb",
    "zvbb",
    "zvkg",
    "zvkned",
    "zvknha",
    "sstc",
    "svinval",
];

/// Base integer width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Xlen {
    /// 32-bit base.
    Rv32,
    /// 64-bit base.
    Rv64,
}

impl Xlen {
    /// Register width in bits.
    pub const fn bits(self) -> u32 {
        match self {
            Self::Rv32 => 32,
            Self::Rv64 => 64,
        }
    }

    /// Mask selecting the architecturally visible register bits.
    pub const fn mask(self) -> u64 {
        match self {
            Self::Rv32 => 0xffff_ffff,
            Self::Rv64 => u64::MAX,
        }
    }

    /// Sign-extends a value from XLEN to 64 bits.
    #[inline(always)]
    pub const fn sext(self, value: u64) -> u64 {
        match self {
            Self::Rv32 => value as i32 as i64 as u64,
            Self::Rv64 => value,
        }
    }

    /// Zero-extends a value from XLEN to 64 bits.
    #[inline(always)]
    pub const fn zext(self, value: u64) -> u64 {
        value & self.mask()
    }

    /// The `MXL` field encoding placed at the top of `misa`.
    pub const fn mxl(self) -> u64 {
        match self {
            Self::Rv32 => 1,
            Self::Rv64 => 2,
        }
    }
}

impl fmt::Display for Xlen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rv{}", self.bits())
    }
}

/// A parsed ISA configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IsaProfile {
    source: String,
    xlen: Xlen,
    misa: u64,
    extensions: BTreeSet<String>,
    user: bool,
    supervisor: bool,
}

/// Returns the `misa` bit for a single-letter extension.
pub const fn misa_bit(letter: char) -> u64 {
    1u64 << ((letter as u8).to_ascii_lowercase() - b'a')
}

impl IsaProfile {
    /// Parses an ISA string and a privilege-level string.
    ///
    /// # Errors
    ///
    /// Returns [`IsaError`] for a bad base, unsupported or duplicated
    /// extensions, out-of-order letters, unmet dependencies, or a bad
    /// privilege string.
    pub fn parse(isa: &str, privilege: &str) -> Result<Self, IsaError> {
        let lower = isa.to_ascii_lowercase();
        let (xlen, rest) = if let Some(rest) = lower.strip_prefix("rv64") {
            (Xlen::Rv64, rest)
        } else if let Some(rest) = lower.strip_prefix("rv32") {
            (Xlen::Rv32, rest)
        } else {
            return Err(IsaError::BadBase(isa.to_string()));
        };

        let mut extensions = BTreeSet::new();
        let mut misa = misa_bit('i');
        let _ = extensions.insert("i".to_string());

        let rest = match rest.chars().next() {
            Some('g') => {
                for letter in ['m', 'a', 'f', 'd'] {
                    misa |= misa_bit(letter);
                    let _ = extensions.insert(letter.to_string());
                }
                &rest[1..]
            }
            Some('i') => &rest[1..],
            Some('e') => return Err(IsaError::Unsupported("e".to_string())),
            _ => return Err(IsaError::MissingBase(isa.to_string())),
        };
        let rest = skip_version(rest);

        let mut chars = rest.char_indices().peekable();
        let mut order_pos = 0;
        let mut multi_start = rest.len();
        while let Some(&(idx, c)) = chars.peek() {
            if c == '_' {
                let _ = chars.next();
                continue;
            }
            if !c.is_ascii_lowercase() || matches!(c, 'z' | 's' | 'x') {
                multi_start = idx;
                break;
            }
            let Some(pos) = SINGLE_LETTER_ORDER.find(c) else {
                return Err(IsaError::Unsupported(c.to_string()));
            };
            if pos < order_pos {
                if extensions.contains(&c.to_string()) {
                    return Err(IsaError::Duplicate(c.to_string()));
                }
                return Err(IsaError::OutOfOrder(c));
            }
            if !SUPPORTED_SINGLE.contains(c) {
                return Err(IsaError::Unsupported(c.to_string()));
            }
            if !extensions.insert(c.to_string()) {
                return Err(IsaError::Duplicate(c.to_string()));
            }
            order_pos = pos + 1;
            misa |= misa_bit(c);
            let _ = chars.next();
            while let Some(&(_, d)) = chars.peek() {
                if d.is_ascii_digit() || d == 'p' && pos_is_version(rest, idx) {
                    let _ = chars.next();
                } else {
                    break;
                }
            }
        }

        for name in rest[multi_start..].split('_').filter(|s| !s.is_empty()) {
            let name = strip_version(name);
            let known = SUPPORTED_MULTI.contains(&name);
            let custom = name.starts_with('x') && name.len() > 1;
            if !known && !custom {
                return Err(IsaError::Unsupported(name.to_string()));
            }
            if custom {
                misa |= misa_bit('x');
            }
            if !extensions.insert(name.to_string()) {
                return Err(IsaError::Duplicate(name.to_string()));
            }
        }

        // Implied extensions.
        if extensions.contains("v") {
            for letter in ['f', 'd'] {
                misa |= misa_bit(letter);
                let _ = extensions.insert(letter.to_string());
            }
        }
        if extensions.contains("d") && !extensions.contains("f") {
            misa |= misa_bit('f');
            let _ = extensions.insert("f".to_string());
        }
        for always in ["zicsr", "zifencei", "sdext"] {
            let _ = extensions.insert(always.to_string());
        }

        for crypto in ["zvkned", "zvkg", "zvknha", "zvbb"] {
            if extensions.contains(crypto) && !extensions.contains("v") {
                return Err(IsaError::MissingDependency {
                    ext: crypto.to_string(),
                    requires: "v".to_string(),
                });
            }
        }

        let (user, supervisor) = match privilege.to_ascii_lowercase().as_str() {
            "m" => (false, false),
            "mu" => (true, false),
            "msu" => (true, true),
            _ => return Err(IsaError::BadPrivilegeLevels(privilege.to_string())),
        };
        if user {
            misa |= misa_bit('u');
            let _ = extensions.insert("u".to_string());
        }
        if supervisor {
            misa |= misa_bit('s');
            let _ = extensions.insert("s".to_string());
        }
        if extensions.contains("h") && !supervisor {
            return Err(IsaError::MissingDependency {
                ext: "h".to_string(),
                requires: "s".to_string(),
            });
        }

        misa |= xlen.mxl() << (xlen.bits() - 2);

        Ok(Self {
            source: isa.to_string(),
            xlen,
            misa,
            extensions,
            user,
            supervisor,
        })
    }

    /// The string this profile was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Base integer width.
    pub const fn xlen(&self) -> Xlen {
        self.xlen
    }

    /// Reset value of `misa`.
    pub const fn misa(&self) -> u64 {
        self.misa
    }

    /// Returns `true` when the named extension is part of the ISA string.
    ///
    /// Names are compared case-insensitively.
    pub fn has(&self, name: &str) -> bool {
        self.extensions.contains(&name.to_ascii_lowercase())
    }

    /// Enabled extension names, lowercase, in sorted order.
    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }

    /// Returns `true` when U-mode is implemented.
    pub const fn has_user(&self) -> bool {
        self.user
    }

    /// Returns `true` when S-mode is implemented.
    pub const fn has_supervisor(&self) -> bool {
        self.supervisor
    }
}

/// Skips a version suffix (`2p0`, `2`) directly after the base letter.
fn skip_version(s: &str) -> &str {
    let trimmed = s.trim_start_matches(|c: char| c.is_ascii_digit());
    if trimmed.len() != s.len() {
        if let Some(minor) = trimmed.strip_prefix('p') {
            return minor.trim_start_matches(|c: char| c.is_ascii_digit());
        }
    }
    trimmed
}

/// A `p` directly after a digit belongs to a version suffix.
fn pos_is_version(s: &str, letter_idx: usize) -> bool {
    s[letter_idx + 1..].starts_with(|c: char| c.is_ascii_digit())
}

/// Strips a trailing `<major>p<minor>` version from a multi-letter name.
fn strip_version(name: &str) -> &str {
    let bytes = name.as_bytes();
    let mut end = bytes.len();
    while end > 0 && bytes[end - 1].is_ascii_digit() {
        end -= 1;
    }
    if end < bytes.len() && end > 0 && bytes[end - 1] == b'p' {
        let mut major_end = end - 1;
        while major_end > 0 && bytes[major_end - 1].is_ascii_digit() {
            major_end -= 1;
        }
        if major_end < end - 1 {
            end = major_end;
        }
    }
    &name[..end]
}
