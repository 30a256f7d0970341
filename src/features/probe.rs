//! Raw hardware probe data and host detection
//!
//! Probe data is whatever the boot environment managed to discover; any field
//! may be missing. Extraction turns it into a fully populated
//! `HardwareFeatures`, never failing.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::persona::Preference;

use super::hardware::{Architecture, BootMethod, HardwareFeatures, VALID_WORD_WIDTHS};

// ─────────────────────────────────────────────────────────────────
// Probe Data
// ─────────────────────────────────────────────────────────────────

/// Partially known hardware description, as reported by a probe
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeData {
    pub clock_mhz: Option<u32>,
    pub memory_kb: Option<u64>,
    /// Architecture name, e.g. "x86_64" or "riscv"
    pub architecture: Option<String>,
    pub word_width: Option<u8>,
    pub has_fpu: Option<bool>,
    pub has_mmu: Option<bool>,
    pub has_cache: Option<bool>,
    pub has_graphics: Option<bool>,
    pub has_networking: Option<bool>,
    pub has_power_management: Option<bool>,
    pub quantum_coprocessor: Option<bool>,
    pub cryo_controller: Option<bool>,
    pub cache_kb: Option<u32>,
    pub cores: Option<u32>,
    /// Boot method name, e.g. "uefi"
    pub boot_method: Option<String>,
    /// "auto", a persona slug, or a persona id
    pub preference: Option<String>,
}

impl ProbeData {
    /// Load probe data from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::IoRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(|e| {
            Error::invalid_input(format!("probe file {}: {}", path.display(), e))
        })
    }

    /// Probe the running host
    pub fn detect() -> Self {
        let probe = Self {
            clock_mhz: host_clock_mhz(),
            memory_kb: host_memory_kb(),
            architecture: Some(std::env::consts::ARCH.to_string()),
            word_width: Some(host_word_width()),
            has_fpu: Some(matches!(
                Architecture::host(),
                Architecture::X86 | Architecture::Arm
            )),
            // A hosted OS implies paging hardware
            has_mmu: Some(true),
            has_cache: Some(true),
            has_graphics: Some(Path::new("/sys/class/drm").exists()),
            has_networking: Some(host_has_network_interface()),
            has_power_management: Some(
                Path::new("/sys/power/state").exists()
                    || Path::new("/sys/class/power_supply").exists(),
            ),
            quantum_coprocessor: None,
            cryo_controller: None,
            cache_kb: host_cache_kb(),
            cores: Some(num_cpus::get() as u32),
            boot_method: Some(host_boot_method().to_string()),
            preference: None,
        };
        debug!(
            cores = ?probe.cores,
            memory_kb = ?probe.memory_kb,
            arch = ?probe.architecture,
            "Host probe complete"
        );
        probe
    }

    /// Fill every missing or invalid field with a conservative default
    pub fn extract(&self) -> HardwareFeatures {
        let defaults = HardwareFeatures::default();

        let word_width = match self.word_width {
            Some(w) if VALID_WORD_WIDTHS.contains(&w) => w,
            Some(w) => {
                warn!(word_width = w, "Invalid word width in probe, using default");
                defaults.word_width
            }
            None => defaults.word_width,
        };

        let preference = match self.preference.as_deref() {
            Some(text) => text.parse::<Preference>().unwrap_or_else(|e| {
                warn!(preference = %text, error = %e, "Ignoring unknown persona preference");
                Preference::Auto
            }),
            None => Preference::Auto,
        };

        HardwareFeatures {
            clock_mhz: self.clock_mhz.unwrap_or(defaults.clock_mhz),
            memory_kb: self.memory_kb.unwrap_or(defaults.memory_kb),
            architecture: self
                .architecture
                .as_deref()
                .map(Architecture::from_name)
                .unwrap_or(defaults.architecture),
            word_width,
            has_fpu: self.has_fpu.unwrap_or(defaults.has_fpu),
            has_mmu: self.has_mmu.unwrap_or(defaults.has_mmu),
            has_cache: self.has_cache.unwrap_or(defaults.has_cache),
            has_graphics: self.has_graphics.unwrap_or(defaults.has_graphics),
            has_networking: self.has_networking.unwrap_or(defaults.has_networking),
            has_power_management: self
                .has_power_management
                .unwrap_or(defaults.has_power_management),
            quantum_coprocessor: self
                .quantum_coprocessor
                .unwrap_or(defaults.quantum_coprocessor),
            cryo_controller: self.cryo_controller.unwrap_or(defaults.cryo_controller),
            cache_kb: self.cache_kb.unwrap_or(defaults.cache_kb),
            cores: self.cores.unwrap_or(defaults.cores),
            boot_method: self
                .boot_method
                .as_deref()
                .map(BootMethod::from_name)
                .unwrap_or(defaults.boot_method),
            preference,
        }
    }
}

/// Use the supplied probe data, or probe the host when none is given
pub fn detect_or_accept_features(probe: Option<&ProbeData>) -> HardwareFeatures {
    match probe {
        Some(data) => data.extract(),
        None => ProbeData::detect().extract(),
    }
}

// ─────────────────────────────────────────────────────────────────
// Host Probing
// ─────────────────────────────────────────────────────────────────

fn host_word_width() -> u8 {
    if cfg!(target_pointer_width = "64") {
        64
    } else if cfg!(target_pointer_width = "32") {
        32
    } else {
        16
    }
}

/// Total memory from /proc/meminfo (Linux only)
fn host_memory_kb() -> Option<u64> {
    let content = fs::read_to_string("/proc/meminfo").ok()?;
    content
        .lines()
        .find(|line| line.starts_with("MemTotal:"))
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|kb| kb.parse::<u64>().ok())
}

fn cpuinfo_field(name: &str) -> Option<String> {
    let content = fs::read_to_string("/proc/cpuinfo").ok()?;
    content
        .lines()
        .find(|line| line.starts_with(name))
        .and_then(|line| line.split(':').nth(1))
        .map(|value| value.trim().to_string())
}

fn host_clock_mhz() -> Option<u32> {
    cpuinfo_field("cpu MHz")
        .and_then(|mhz| mhz.parse::<f64>().ok())
        .map(|mhz| mhz.round() as u32)
}

/// Parses lines like "cache size : 8192 KB"
fn host_cache_kb() -> Option<u32> {
    cpuinfo_field("cache size")
        .and_then(|size| size.split_whitespace().next().map(str::to_string))
        .and_then(|kb| kb.parse::<u32>().ok())
}

fn host_has_network_interface() -> bool {
    fs::read_dir("/sys/class/net")
        .map(|entries| {
            entries
                .flatten()
                .any(|entry| entry.file_name().to_string_lossy() != "lo")
        })
        .unwrap_or(false)
}

fn host_boot_method() -> BootMethod {
    if Path::new("/sys/firmware/efi").exists() {
        BootMethod::Uefi
    } else if Architecture::host() == Architecture::X86 && cfg!(target_os = "linux") {
        BootMethod::Bios
    } else {
        BootMethod::Unknown
    }
}
