//! Online trainer
//!
//! Keeps a bounded buffer of feedback samples and nudges the scorer's output
//! layer toward the satisfaction each sample reports. Hidden-layer weights
//! are never touched.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::features::HardwareFeatures;
use crate::persona::Persona;
use crate::scorer::{Scorer, HIDDEN_UNITS, OUTPUT_WEIGHT_LIMIT};

// ─────────────────────────────────────────────────────────────────
// Samples
// ─────────────────────────────────────────────────────────────────

/// One piece of post-boot feedback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSample {
    pub features: HardwareFeatures,
    /// Persona the device actually ran
    pub persona: Persona,
    /// How well it went, in [0, 1]
    pub satisfaction: f32,
    /// Caller-defined performance figure
    pub performance: u32,
}

/// What to do when the sample buffer is full
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverflowPolicy {
    /// Refuse the new sample with `BufferFull`
    #[default]
    Reject,
    /// Drop the oldest sample to make room
    EvictOldest,
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverflowPolicy::Reject => write!(f, "reject"),
            OverflowPolicy::EvictOldest => write!(f, "evict-oldest"),
        }
    }
}

impl FromStr for OverflowPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Ok(OverflowPolicy::Reject),
            "evict-oldest" | "evict_oldest" => Ok(OverflowPolicy::EvictOldest),
            other => Err(format!(
                "Unknown overflow policy '{}'. Valid: reject, evict-oldest",
                other
            )),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Trainer
// ─────────────────────────────────────────────────────────────────

/// Largest sample buffer a configuration may ask for
pub const MAX_SAMPLE_CAPACITY: usize = 65_536;

/// Bounded sample store plus the output-layer update rule
#[derive(Debug, Clone)]
pub struct Trainer {
    samples: VecDeque<TrainingSample>,
    capacity: usize,
    overflow: OverflowPolicy,
    learning_rate: f32,
}

impl Trainer {
    pub fn new(capacity: usize, overflow: OverflowPolicy, learning_rate: f32) -> Self {
        Self {
            samples: VecDeque::new(),
            capacity,
            overflow,
            learning_rate,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn samples(&self) -> impl Iterator<Item = &TrainingSample> {
        self.samples.iter()
    }

    /// Store a sample, applying the overflow policy when full
    pub fn add_sample(&mut self, sample: TrainingSample) -> Result<()> {
        if !sample.satisfaction.is_finite() || !(0.0..=1.0).contains(&sample.satisfaction) {
            return Err(Error::invalid_input(format!(
                "satisfaction {} is outside [0, 1]",
                sample.satisfaction
            )));
        }
        sample.features.validate()?;

        if self.samples.len() >= self.capacity {
            match self.overflow {
                OverflowPolicy::Reject => {
                    return Err(Error::BufferFull {
                        capacity: self.capacity,
                    })
                }
                OverflowPolicy::EvictOldest => {
                    self.samples.pop_front();
                    debug!(capacity = self.capacity, "Evicted oldest training sample");
                }
            }
        }

        self.samples.push_back(sample);
        Ok(())
    }

    /// Run `epochs` passes over every stored sample
    pub fn train(&self, scorer: &mut Scorer, epochs: u32) -> Result<()> {
        if self.samples.is_empty() {
            return Err(Error::NoTrainingData);
        }

        for epoch in 0..epochs {
            let mut total_error = 0.0f32;
            for sample in &self.samples {
                total_error += self.step(scorer, sample).abs();
            }
            debug!(
                epoch,
                mean_abs_error = total_error / self.samples.len() as f32,
                "Training epoch complete"
            );
        }

        info!(epochs, samples = self.samples.len(), "Training complete");
        Ok(())
    }

    /// One update for one sample; returns the pre-update error
    fn step(&self, scorer: &mut Scorer, sample: &TrainingSample) -> f32 {
        let pass = scorer.forward(&sample.features.to_vector());
        let k = sample.persona.index();
        let error = sample.satisfaction - pass.scores[k];
        let delta = self.learning_rate * error;

        let params = scorer.params_mut();
        for j in 0..HIDDEN_UNITS {
            let w = &mut params.output_weights[j][k];
            *w = (*w + delta * pass.hidden[j]).clamp(-OUTPUT_WEIGHT_LIMIT, OUTPUT_WEIGHT_LIMIT);
        }
        let b = &mut params.output_bias[k];
        *b = (*b + delta).clamp(-OUTPUT_WEIGHT_LIMIT, OUTPUT_WEIGHT_LIMIT);

        error
    }

    /// Replace the stored samples, keeping at most `capacity` of the newest
    pub(crate) fn restore_samples(&mut self, samples: impl IntoIterator<Item = TrainingSample>) {
        self.samples = samples.into_iter().collect();
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }
}
