//! Common test utilities and fixtures
//!
//! Shared by the integration test binaries; not every binary uses every helper.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use persona_engine::features::{Architecture, BootMethod, HardwareFeatures};
use tempfile::TempDir;

/// Get the path to the test fixtures directory
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Get a path to a specific fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

pub fn valid_config_fixture() -> PathBuf {
    fixture_path("valid_config.toml")
}

pub fn invalid_config_fixture() -> PathBuf {
    fixture_path("invalid_config.toml")
}

// ─────────────────────────────────────────────────────────────────
// CLI Sandbox
// ─────────────────────────────────────────────────────────────────

/// Temp directory holding an isolated config and state file
pub struct Sandbox {
    pub dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::copy(valid_config_fixture(), dir.path().join("config.toml")).unwrap();
        Self { dir }
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    pub fn state_path(&self) -> PathBuf {
        self.dir.path().join("state.json")
    }

    /// The binary, pointed at this sandbox's config and state
    pub fn cmd(&self) -> Command {
        let mut cmd = engine_cmd();
        cmd.current_dir(self.dir.path())
            .arg("--config")
            .arg(self.config_path())
            .arg("--state")
            .arg(self.state_path());
        cmd
    }
}

/// The binary with no inherited engine environment
pub fn engine_cmd() -> Command {
    let mut cmd = Command::cargo_bin("persona-engine").unwrap();
    for key in [
        "PERSONA_ENGINE_CONFIG",
        "PERSONA_ENGINE_STATE_FILE",
        "PERSONA_ENGINE_LOG_LEVEL",
        "PERSONA_ENGINE_LOG_FILE",
        "PERSONA_ENGINE_SEED",
        "RUST_LOG",
    ] {
        cmd.env_remove(key);
    }
    cmd
}

pub fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

// ─────────────────────────────────────────────────────────────────
// Hardware Builders
// ─────────────────────────────────────────────────────────────────

/// 1KB, 8-bit x86 with nothing else
pub fn calculator() -> HardwareFeatures {
    HardwareFeatures {
        clock_mhz: 1,
        memory_kb: 1,
        architecture: Architecture::X86,
        word_width: 8,
        ..Default::default()
    }
}

/// 1GB, 8-core, 64-bit x86 desktop
pub fn desktop() -> HardwareFeatures {
    HardwareFeatures {
        clock_mhz: 3000,
        memory_kb: 1024 * 1024,
        architecture: Architecture::X86,
        word_width: 64,
        has_fpu: true,
        has_mmu: true,
        has_cache: true,
        has_graphics: true,
        has_networking: true,
        has_power_management: true,
        cache_kb: 4096,
        cores: 8,
        boot_method: BootMethod::Uefi,
        ..Default::default()
    }
}

/// Desktop-class hardware on another architecture
pub fn board(architecture: Architecture) -> HardwareFeatures {
    HardwareFeatures {
        architecture,
        ..desktop()
    }
}
