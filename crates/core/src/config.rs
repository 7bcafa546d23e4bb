//! Configuration for the simulator core.
//!
//! This module defines the structures that parameterize a [`Cpu`](crate::core::Cpu).
//! It provides:
//! 1. **Defaults:** Baseline values for the ISA, vector unit, debug entry points and RAM.
//! 2. **Structures:** Hierarchical config for general, ISA, trap and memory settings.
//! 3. **Loading:** JSON parsing from a string or a file, followed by range validation.
//!
//! Every section and field is optional in JSON; missing values take their defaults.

use std::path::Path;

use serde::Deserialize;

use crate::common::constants;
use crate::common::error::ConfigError;

/// Default configuration constants.
mod defaults {
    use crate::common::constants;

    /// ISA string used when none is given.
    pub const ISA: &str = "rv64imafdc_zicsr_zifencei";

    /// Privilege levels implemented by default.
    pub const PRIV_LEVELS: &str = "msu";

    /// Reset PC: the start of RAM.
    pub const START_PC: u64 = constants::DEFAULT_RAM_BASE;

    /// Reset value of `mtvec`.
    pub const MTVEC_RESET: u64 = 0;
}

/// Top-level configuration.
///
/// # Examples
///
/// ```
/// use rviss_core::config::Config;
///
/// let config = Config::from_json(r#"{ "isa": { "isa": "rv64gcv", "vlen": 256 } }"#).unwrap();
/// assert_eq!(config.isa.vlen, 256);
/// assert_eq!(config.isa.priv_levels, "msu");
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings.
    pub general: GeneralConfig,
    /// ISA string and vector parameters.
    pub isa: IsaConfig,
    /// Trap and debug policy.
    pub trap: TrapConfig,
    /// RAM placement.
    pub memory: MemoryConfig,
}

impl Config {
    /// Parses and validates a JSON document.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Json`] for malformed JSON and [`ConfigError::Invalid`] for
    /// out-of-range values.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] when the file cannot be read, otherwise as
    /// [`Config::from_json`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let vlen = self.isa.vlen;
        if !vlen.is_power_of_two() || !(constants::MIN_VLEN..=constants::MAX_VLEN).contains(&vlen) {
            return Err(ConfigError::Invalid {
                field: "isa.vlen",
                reason: format!(
                    "{vlen} is not a power of two in [{}, {}]",
                    constants::MIN_VLEN,
                    constants::MAX_VLEN
                ),
            });
        }
        if !matches!(self.isa.elen, 32 | 64) {
            return Err(ConfigError::Invalid {
                field: "isa.elen",
                reason: format!("{} is neither 32 nor 64", self.isa.elen),
            });
        }
        if self.isa.elen as usize > vlen {
            return Err(ConfigError::Invalid {
                field: "isa.elen",
                reason: format!("{} exceeds vlen {vlen}", self.isa.elen),
            });
        }
        if self.general.start_pc & 1 != 0 {
            return Err(ConfigError::Invalid {
                field: "general.start_pc",
                reason: format!("{:#x} is not 2-byte aligned", self.general.start_pc),
            });
        }
        Ok(())
    }
}

/// General settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Reset PC.
    pub start_pc: u64,
    /// Value of `mhartid`.
    pub hart_id: u64,
    /// Log every retired instruction at `trace` level.
    pub trace_instructions: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            start_pc: defaults::START_PC,
            hart_id: 0,
            trace_instructions: false,
        }
    }
}

/// ISA string and vector parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IsaConfig {
    /// ISA string, e.g. `rv64gcv_zvkned`.
    pub isa: String,
    /// Implemented privilege levels: `m`, `mu` or `msu`.
    pub priv_levels: String,
    /// Vector register length in bits.
    pub vlen: usize,
    /// Maximum element width in bits.
    pub elen: u32,
}

impl Default for IsaConfig {
    fn default() -> Self {
        Self {
            isa: defaults::ISA.to_string(),
            priv_levels: defaults::PRIV_LEVELS.to_string(),
            vlen: constants::DEFAULT_VLEN,
            elen: constants::DEFAULT_ELEN,
        }
    }
}

/// Trap and debug-mode policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrapConfig {
    /// Every `ebreak` enters debug mode, regardless of `dcsr.ebreak*`.
    pub debugger_attached: bool,
    /// PC taken on debug-mode entry.
    pub debug_entry: u64,
    /// PC taken by exceptions raised in debug mode.
    pub debug_exception_entry: u64,
    /// Reset value of `mtvec`.
    pub mtvec_reset: u64,
}

impl Default for TrapConfig {
    fn default() -> Self {
        Self {
            debugger_attached: false,
            debug_entry: constants::DEBUG_ROM_ENTRY,
            debug_exception_entry: constants::DEBUG_ROM_TVEC,
            mtvec_reset: defaults::MTVEC_RESET,
        }
    }
}

/// RAM placement, used by embedders constructing a [`FlatMemory`](crate::soc::FlatMemory).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// RAM base address.
    pub ram_base: u64,
    /// RAM size in bytes.
    pub ram_size: u64,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            ram_base: constants::DEFAULT_RAM_BASE,
            ram_size: constants::DEFAULT_RAM_SIZE,
        }
    }
}
