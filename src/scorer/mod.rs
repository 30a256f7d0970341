//! Persona scorer
//!
//! A one-hidden-layer feed-forward network mapping a feature vector to an
//! affinity score in [0, 1] for every persona. Both layers use the
//! bounded-linear squash, so scores can never leave the unit interval.

mod activation;
mod params;

pub use activation::{squash, SATURATION, SLOPE};
pub use params::{ScorerParameters, HIDDEN_UNITS, OUTPUT_WEIGHT_LIMIT};

use crate::features::FeatureVector;
use crate::persona::{Persona, PERSONA_COUNT};

/// Per-persona affinity scores, indexed by persona id
pub type Scores = [f32; PERSONA_COUNT];

/// Hidden activations and output scores of one forward pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForwardPass {
    pub hidden: [f32; HIDDEN_UNITS],
    pub scores: Scores,
}

/// Feed-forward persona scorer
#[derive(Debug, Clone, PartialEq)]
pub struct Scorer {
    params: ScorerParameters,
}

impl Scorer {
    pub fn new(params: ScorerParameters) -> Self {
        Self { params }
    }

    /// Scorer with the capability prior and seeded jitter
    pub fn seeded(seed: u64, jitter: f32) -> Self {
        Self::new(ScorerParameters::seeded(seed, jitter))
    }

    pub fn params(&self) -> &ScorerParameters {
        &self.params
    }

    /// Only the trainer mutates parameters
    pub(crate) fn params_mut(&mut self) -> &mut ScorerParameters {
        &mut self.params
    }

    /// Run the network, keeping the hidden activations
    pub fn forward(&self, input: &FeatureVector) -> ForwardPass {
        let p = &self.params;

        let mut hidden = [0.0f32; HIDDEN_UNITS];
        for (j, h) in hidden.iter_mut().enumerate() {
            let mut sum = p.hidden_bias[j];
            for (x, weights) in input.iter().zip(p.input_weights.iter()) {
                sum += x * weights[j];
            }
            *h = squash(sum);
        }

        let mut scores = [0.0f32; PERSONA_COUNT];
        for (k, score) in scores.iter_mut().enumerate() {
            let mut sum = p.output_bias[k];
            for (j, h) in hidden.iter().enumerate() {
                sum += h * p.output_weights[j][k];
            }
            *score = squash(sum);
        }

        ForwardPass { hidden, scores }
    }

    /// Affinity score per persona
    pub fn score(&self, input: &FeatureVector) -> Scores {
        self.forward(input).scores
    }
}

/// Highest-scoring persona; ties go to the lowest id
pub fn arg_max(scores: &Scores) -> (Persona, f32) {
    let mut best = 0;
    for (k, &score) in scores.iter().enumerate().skip(1) {
        if score > scores[best] {
            best = k;
        }
    }
    // Scores has exactly PERSONA_COUNT entries so the lookup always succeeds
    let persona = Persona::from_id(best as u8).unwrap_or(Persona::Calculator);
    (persona, scores[best])
}
