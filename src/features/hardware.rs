//! Hardware feature model
//!
//! `HardwareFeatures` is the immutable description of a candidate machine
//! handed to the decision engine. Every field is populated; unknown probe
//! values are replaced by conservative defaults during extraction.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::persona::Preference;

/// Word widths a device may report.
pub const VALID_WORD_WIDTHS: [u8; 5] = [4, 8, 16, 32, 64];

// ─────────────────────────────────────────────────────────────────
// Architecture
// ─────────────────────────────────────────────────────────────────

/// CPU architecture class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Architecture {
    X86,
    Arm,
    RiscV,
    #[default]
    Other,
}

impl Architecture {
    /// Classify a `std::env::consts::ARCH`-style name
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "x86" | "x86_64" | "amd64" | "i386" | "i486" | "i586" | "i686" => Architecture::X86,
            "arm" | "arm64" | "aarch64" | "armv7" | "armv6" => Architecture::Arm,
            "riscv" | "risc-v" | "riscv32" | "riscv64" => Architecture::RiscV,
            _ => Architecture::Other,
        }
    }

    /// Ordinal used by the feature vector
    pub fn ordinal(&self) -> u8 {
        match self {
            Architecture::X86 => 0,
            Architecture::Arm => 1,
            Architecture::RiscV => 2,
            Architecture::Other => 3,
        }
    }

    /// Architecture of the running host
    pub fn host() -> Self {
        Self::from_name(std::env::consts::ARCH)
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Architecture::X86 => write!(f, "x86"),
            Architecture::Arm => write!(f, "arm"),
            Architecture::RiscV => write!(f, "risc-v"),
            Architecture::Other => write!(f, "other"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Boot Method
// ─────────────────────────────────────────────────────────────────

/// How the device was booted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BootMethod {
    /// Firmware in mask ROM or flash
    Rom,
    /// Legacy PC BIOS
    Bios,
    Uefi,
    /// PXE or other network boot
    Network,
    #[default]
    Unknown,
}

impl BootMethod {
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "rom" | "flash" => BootMethod::Rom,
            "bios" | "legacy" => BootMethod::Bios,
            "uefi" | "efi" => BootMethod::Uefi,
            "network" | "pxe" | "netboot" => BootMethod::Network,
            _ => BootMethod::Unknown,
        }
    }

    /// Ordinal used by the feature vector
    pub fn ordinal(&self) -> u8 {
        match self {
            BootMethod::Rom => 0,
            BootMethod::Bios => 1,
            BootMethod::Uefi => 2,
            BootMethod::Network => 3,
            BootMethod::Unknown => 4,
        }
    }
}

impl fmt::Display for BootMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BootMethod::Rom => "rom",
            BootMethod::Bios => "bios",
            BootMethod::Uefi => "uefi",
            BootMethod::Network => "network",
            BootMethod::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

// ─────────────────────────────────────────────────────────────────
// Hardware Features
// ─────────────────────────────────────────────────────────────────

/// Complete description of a candidate machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwareFeatures {
    /// CPU clock speed in MHz
    pub clock_mhz: u32,
    /// Memory size in KB
    pub memory_kb: u64,
    pub architecture: Architecture,
    /// Native word width in bits
    pub word_width: u8,
    pub has_fpu: bool,
    pub has_mmu: bool,
    pub has_cache: bool,
    pub has_graphics: bool,
    pub has_networking: bool,
    pub has_power_management: bool,
    /// First half of the specialized-hardware pair
    pub quantum_coprocessor: bool,
    /// Second half of the specialized-hardware pair
    pub cryo_controller: bool,
    /// Cache size in KB
    pub cache_kb: u32,
    pub cores: u32,
    pub boot_method: BootMethod,
    /// Explicit persona request, or auto
    #[serde(default)]
    pub preference: Preference,
}

impl Default for HardwareFeatures {
    /// The most conservative device: 1KB, 1MHz, 8-bit, single core, no extras.
    fn default() -> Self {
        Self {
            clock_mhz: 1,
            memory_kb: 1,
            architecture: Architecture::Other,
            word_width: 8,
            has_fpu: false,
            has_mmu: false,
            has_cache: false,
            has_graphics: false,
            has_networking: false,
            has_power_management: false,
            quantum_coprocessor: false,
            cryo_controller: false,
            cache_kb: 0,
            cores: 1,
            boot_method: BootMethod::Unknown,
            preference: Preference::Auto,
        }
    }
}

impl HardwareFeatures {
    /// Both specialized-hardware flags are set
    pub fn has_specialized_pair(&self) -> bool {
        self.quantum_coprocessor && self.cryo_controller
    }

    /// Reject values extraction would never produce
    pub fn validate(&self) -> Result<()> {
        if !VALID_WORD_WIDTHS.contains(&self.word_width) {
            return Err(Error::invalid_input(format!(
                "word width {} is not one of {:?}",
                self.word_width, VALID_WORD_WIDTHS
            )));
        }
        Ok(())
    }

    /// Copy with a different preference
    pub fn with_preference(&self, preference: Preference) -> Self {
        Self {
            preference,
            ..self.clone()
        }
    }
}
