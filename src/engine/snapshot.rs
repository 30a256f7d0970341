//! Engine state persistence
//!
//! Learned parameters, stored samples and statistics are written as pretty
//! JSON with a format version so a later run can pick up where the last one
//! left off.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::EngineSettings;
use crate::error::{Error, Result};
use crate::scorer::{Scorer, ScorerParameters};
use crate::telemetry::EngineStatistics;
use crate::trainer::{Trainer, TrainingSample};

use super::{EngineState, PersonaEngine};

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

/// Everything needed to rebuild an engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub parameters: ScorerParameters,
    pub samples: Vec<TrainingSample>,
    pub statistics: EngineStatistics,
}

/// Only the version field, read before the full decode
#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

impl EngineSnapshot {
    /// Write as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| Error::IoWrite {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Internal(format!("Failed to encode engine state: {}", e)))?;
        fs::write(path, json).map_err(|e| Error::IoWrite {
            path: path.to_path_buf(),
            source: e,
        })?;

        debug!(path = %path.display(), samples = self.samples.len(), "Engine state saved");
        Ok(())
    }

    /// Read and check a snapshot
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::IoRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        let probe: VersionProbe = serde_json::from_str(&content)
            .map_err(|e| Error::state_corrupted(path, e.to_string()))?;
        if probe.version != SNAPSHOT_VERSION {
            return Err(Error::StateVersion {
                found: probe.version,
                expected: SNAPSHOT_VERSION,
            });
        }

        let snapshot: EngineSnapshot = serde_json::from_str(&content)
            .map_err(|e| Error::state_corrupted(path, e.to_string()))?;
        if !snapshot.parameters.is_finite() {
            return Err(Error::state_corrupted(path, "parameters contain NaN or infinity"));
        }

        Ok(snapshot)
    }
}

impl PersonaEngine {
    /// Capture the current state
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            parameters: self.scorer.params().clone(),
            samples: self.trainer.samples().cloned().collect(),
            statistics: self.statistics(),
        }
    }

    /// Rebuild an engine from a snapshot under the given settings
    ///
    /// Samples beyond the configured capacity are dropped oldest first.
    pub fn restore(settings: &EngineSettings, snapshot: EngineSnapshot) -> Self {
        let mut trainer = Trainer::new(
            settings.sample_capacity,
            settings.overflow_policy,
            settings.learning_rate,
        );
        trainer.restore_samples(snapshot.samples);

        let state = if snapshot.statistics.total_recommendations > 0 {
            EngineState::Decided
        } else {
            EngineState::Idle
        };

        Self {
            settings: settings.clone(),
            scorer: Scorer::new(snapshot.parameters),
            trainer,
            stats: snapshot.statistics,
            state,
        }
    }

    /// Load saved state if present, otherwise start fresh
    pub fn load_or_initialize(settings: &EngineSettings, path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No saved state, initializing");
            return Ok(Self::initialize(settings));
        }

        let snapshot = EngineSnapshot::load(path)?;
        info!(
            path = %path.display(),
            saved_at = %snapshot.saved_at,
            samples = snapshot.samples.len(),
            "Engine state restored"
        );
        Ok(Self::restore(settings, snapshot))
    }

    /// Write the current state to `path`
    pub fn save(&self, path: &Path) -> Result<()> {
        self.snapshot().save(path)
    }
}
