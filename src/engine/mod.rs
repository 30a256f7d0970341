//! Persona decision engine
//!
//! Orchestrates a decision in three stages, first match wins:
//!
//! 1. an explicit user preference is honoured as-is,
//! 2. the specialized hardware pair selects the specialized persona,
//! 3. otherwise the scorer proposes and the constraint policy disposes.
//!
//! The engine also owns the trainer and telemetry counters so feedback and
//! retraining flow through the same value that made the decision.

mod decision;
mod snapshot;

pub use decision::{DecisionResult, Strategy, SPECIALIZED_CONFIDENCE};
pub use snapshot::{EngineSnapshot, SNAPSHOT_VERSION};

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::EngineSettings;
use crate::error::Result;
use crate::features::HardwareFeatures;
use crate::persona::Persona;
use crate::policy;
use crate::scorer::{arg_max, Scorer};
use crate::telemetry::EngineStatistics;
use crate::trainer::{Trainer, TrainingSample};

/// An engine shared between threads; every operation takes the one lock
pub type SharedEngine = Arc<Mutex<PersonaEngine>>;

// ─────────────────────────────────────────────────────────────────
// Engine State
// ─────────────────────────────────────────────────────────────────

/// Where the engine is in its decision lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EngineState {
    /// No recommendation made yet
    Idle,
    /// A recommendation is in progress
    Deciding,
    /// At least one recommendation has been made
    Decided,
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineState::Idle => write!(f, "idle"),
            EngineState::Deciding => write!(f, "deciding"),
            EngineState::Decided => write!(f, "decided"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Persona Engine
// ─────────────────────────────────────────────────────────────────

/// Scorer, policy, trainer and telemetry behind one owned value
#[derive(Debug, Clone)]
pub struct PersonaEngine {
    settings: EngineSettings,
    scorer: Scorer,
    trainer: Trainer,
    stats: EngineStatistics,
    state: EngineState,
}

impl PersonaEngine {
    /// Fresh engine with seeded parameters, empty buffer and zeroed counters
    pub fn initialize(settings: &EngineSettings) -> Self {
        info!(
            seed = settings.seed,
            jitter = settings.init_jitter,
            capacity = settings.sample_capacity,
            overflow = %settings.overflow_policy,
            "Initializing persona engine"
        );
        Self {
            settings: settings.clone(),
            scorer: Scorer::seeded(settings.seed, settings.init_jitter),
            trainer: Trainer::new(
                settings.sample_capacity,
                settings.overflow_policy,
                settings.learning_rate,
            ),
            stats: EngineStatistics::default(),
            state: EngineState::Idle,
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn scorer(&self) -> &Scorer {
        &self.scorer
    }

    pub fn trainer(&self) -> &Trainer {
        &self.trainer
    }

    /// Wrap in `Arc<Mutex<_>>` for sharing between threads
    pub fn into_shared(self) -> SharedEngine {
        Arc::new(Mutex::new(self))
    }

    /// Pick the strategy for these features
    pub fn strategy_for(features: &HardwareFeatures) -> Strategy {
        if let Some(persona) = features.preference.persona() {
            Strategy::Direct(persona)
        } else if features.has_specialized_pair() {
            Strategy::RuleOverride(Persona::Quantum)
        } else {
            Strategy::Learned
        }
    }

    /// Recommend a persona for the given hardware
    pub fn recommend(&mut self, features: &HardwareFeatures) -> Result<DecisionResult> {
        features.validate()?;

        self.state = EngineState::Deciding;
        let strategy = Self::strategy_for(features);

        let result = match strategy {
            Strategy::Direct(persona) => DecisionResult {
                persona,
                confidence: 1.0,
                rationale: Some("user preference".to_string()),
                strategy,
                constraint: None,
            },
            Strategy::RuleOverride(persona) => DecisionResult {
                persona,
                confidence: SPECIALIZED_CONFIDENCE,
                rationale: Some(
                    "quantum coprocessor and cryogenic controller present".to_string(),
                ),
                strategy,
                constraint: None,
            },
            Strategy::Learned => self.decide_learned(features),
        };

        self.stats
            .record_recommendation(result.persona, result.confidence, features);
        self.state = EngineState::Decided;

        info!(
            persona = %result.persona,
            confidence = result.confidence,
            strategy = strategy.label(),
            "Recommendation made"
        );
        Ok(result)
    }

    fn decide_learned(&self, features: &HardwareFeatures) -> DecisionResult {
        let scores = self.scorer.score(&features.to_vector());
        let (proposed, confidence) = arg_max(&scores);
        debug!(?scores, proposed = %proposed, "Scorer output");

        let outcome = policy::evaluate(features, proposed);
        let rationale = outcome.rule.map(|rule| {
            debug!(rule = ?rule, from = %proposed, to = %outcome.persona, "Constraint applied");
            format!("scorer chose {}, but {}", proposed, rule)
        });

        DecisionResult {
            persona: outcome.persona,
            confidence,
            rationale,
            strategy: Strategy::Learned,
            constraint: outcome.rule,
        }
    }

    /// Record how a persona actually performed on some hardware
    pub fn record_feedback(
        &mut self,
        features: &HardwareFeatures,
        persona: Persona,
        satisfaction: f32,
        performance: u32,
    ) -> Result<()> {
        let sample = TrainingSample {
            features: features.clone(),
            persona,
            satisfaction,
            performance,
        };
        if let Err(e) = self.trainer.add_sample(sample) {
            warn!(error = %e, "Feedback not recorded");
            return Err(e);
        }

        if satisfaction >= self.settings.success_threshold
            && self.stats.successful_recommendations < self.stats.total_recommendations
        {
            self.stats.record_success();
        }

        debug!(
            persona = %persona,
            satisfaction,
            performance,
            samples = self.trainer.len(),
            "Feedback recorded"
        );
        Ok(())
    }

    /// Retrain the scorer's output layer on the stored samples
    pub fn train(&mut self, epochs: u32) -> Result<()> {
        self.trainer.train(&mut self.scorer, epochs)?;
        self.stats.record_epochs(epochs);
        Ok(())
    }

    /// Snapshot of the telemetry counters
    pub fn statistics(&self) -> EngineStatistics {
        EngineStatistics {
            training_samples: self.trainer.len(),
            ..self.stats.clone()
        }
    }
}
