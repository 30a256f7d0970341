//! Build metadata for `persona-engine version`
//!
//! Git and toolchain details come from `build.rs`; the model shape and state
//! file format come from the crate itself, so a state file can be matched to
//! the binary that wrote it.

use std::fmt;

use crate::engine::SNAPSHOT_VERSION;
use crate::features::FEATURE_COUNT;
use crate::persona::PERSONA_COUNT;
use crate::scorer::HIDDEN_UNITS;

/// Compile-time description of this binary
#[derive(Debug, Clone, Copy)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    /// Short commit hash, or "unknown" outside a git checkout
    pub git_hash: &'static str,
    git_dirty: &'static str,
    pub built_at: &'static str,
    pub target: &'static str,
    pub profile: &'static str,
    pub rustc: &'static str,
}

impl BuildInfo {
    pub const fn current() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            git_hash: env!("PERSONA_ENGINE_GIT_HASH"),
            git_dirty: env!("PERSONA_ENGINE_GIT_DIRTY"),
            built_at: env!("PERSONA_ENGINE_BUILD_TIMESTAMP"),
            target: env!("PERSONA_ENGINE_TARGET"),
            profile: env!("PERSONA_ENGINE_PROFILE"),
            rustc: env!("PERSONA_ENGINE_RUSTC_VERSION"),
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.git_dirty == "true"
    }

    /// `0.1.0-abc1234`, with `-dirty` appended for uncommitted builds
    pub fn full_version(&self) -> String {
        let dirty = if self.is_dirty() { "-dirty" } else { "" };
        format!("{}-{}{}", self.version, self.git_hash, dirty)
    }

    /// Network shape as `inputs-hidden-outputs`
    pub fn model_shape(&self) -> String {
        format!("{}-{}-{}", FEATURE_COUNT, HIDDEN_UNITS, PERSONA_COUNT)
    }

    fn rows(&self) -> [(&'static str, String); 7] {
        let hash = if self.is_dirty() {
            format!("{} (dirty)", self.git_hash)
        } else {
            self.git_hash.to_string()
        };
        [
            ("Version", self.version.to_string()),
            ("Git Hash", hash),
            ("Built", self.built_at.to_string()),
            ("Profile", self.profile.to_string()),
            ("Target", self.target.to_string()),
            ("Compiler", self.rustc.to_string()),
            (
                "Model",
                format!("{} (state format v{})", self.model_shape(), SNAPSHOT_VERSION),
            ),
        ]
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.name, self.full_version())?;
        writeln!(f)?;
        for (label, value) in self.rows() {
            writeln!(f, "  {:<11} {}", format!("{}:", label), value)?;
        }
        Ok(())
    }
}

pub fn build_info() -> BuildInfo {
    BuildInfo::current()
}
