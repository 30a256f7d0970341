//! Scorer parameters and their deterministic initialization
//!
//! The initial network is not random noise. It encodes a capability prior:
//!
//! - five staircase units that switch on as an aggregate capability score
//!   crosses successive thresholds,
//! - four architecture detector units reading the architecture ordinal,
//! - one unit that fires only when both specialized-hardware flags are set.
//!
//! Output units combine adjacent staircase steps into capability bands and
//! gate the x86-only and ISA-specific personas on the detector units. Seeded
//! jitter is added on top so different seeds yield distinct but reproducible
//! engines.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::features::{index, FEATURE_COUNT};
use crate::persona::{Persona, PERSONA_COUNT};

/// Width of the hidden layer
pub const HIDDEN_UNITS: usize = 10;

/// Output weights never leave [-OUTPUT_WEIGHT_LIMIT, OUTPUT_WEIGHT_LIMIT]
pub const OUTPUT_WEIGHT_LIMIT: f32 = 16.0;

// ─────────────────────────────────────────────────────────────────
// Prior Layout
// ─────────────────────────────────────────────────────────────────

/// Hidden unit roles in the prior
mod unit {
    pub const STAIR_0: usize = 0;
    pub const STAIR_1: usize = 1;
    pub const STAIR_2: usize = 2;
    pub const STAIR_3: usize = 3;
    pub const STAIR_4: usize = 4;
    pub const X86: usize = 5;
    pub const AT_LEAST_ARM: usize = 6;
    pub const AT_LEAST_RISCV: usize = 7;
    pub const AT_LEAST_OTHER: usize = 8;
    pub const SPECIALIZED_PAIR: usize = 9;
}

/// Contribution of each feature to the aggregate capability score.
///
/// Memory and cores dominate: 1 GB with 8 cores clears the workstation step
/// even with every optional flag off and an 8-bit word.
const CAPABILITY_WEIGHTS: [(usize, f32); 8] = [
    (index::MEMORY, 0.40),
    (index::CORES, 0.36),
    (index::WORD_WIDTH, 0.08),
    (index::FPU, 0.04),
    (index::MMU, 0.04),
    (index::CACHE_PRESENT, 0.02),
    (index::CLOCK, 0.03),
    (index::GRAPHICS, 0.03),
];

/// Capability thresholds for the staircase units
const STAIR_THRESHOLDS: [f32; 5] = [0.05, 0.15, 0.38, 0.48, 0.88];

/// Steepness of each staircase step
const STAIR_GAIN: f32 = 100.0;

/// Gain and offset of the architecture detectors over the ordinal in [0, 1]
const ARCH_GAIN: f32 = 24.0;
const ARCH_DETECTORS: [(usize, f32, f32); 4] = [
    (unit::X86, -ARCH_GAIN, 4.0),
    (unit::AT_LEAST_ARM, ARCH_GAIN, -4.0),
    (unit::AT_LEAST_RISCV, ARCH_GAIN, -12.0),
    (unit::AT_LEAST_OTHER, ARCH_GAIN, -20.0),
];

const PAIR_GAIN: f32 = 8.0;
const PAIR_BIAS: f32 = -12.0;

const BAND: f32 = 2.4;
const GATE: f32 = 1.2;

/// Output unit wiring per persona, in id order: (hidden unit, weight) pairs
/// and the output bias
const OUTPUT_PRIOR: [(&[(usize, f32)], f32); PERSONA_COUNT] = [
    // Calculator
    (&[(unit::STAIR_0, -BAND)], 1.6),
    // Embedded
    (&[(unit::STAIR_0, BAND), (unit::STAIR_1, -BAND)], -0.8),
    // Retro
    (
        &[(unit::STAIR_1, BAND), (unit::STAIR_2, -BAND), (unit::X86, GATE)],
        -2.0,
    ),
    // Classic
    (
        &[(unit::STAIR_2, BAND), (unit::STAIR_3, -BAND), (unit::X86, GATE)],
        -2.0,
    ),
    // Arm64
    (
        &[
            (unit::STAIR_2, GATE),
            (unit::STAIR_4, -GATE),
            (unit::AT_LEAST_ARM, GATE),
            (unit::AT_LEAST_RISCV, -GATE),
        ],
        -0.8,
    ),
    // RiscV
    (
        &[
            (unit::STAIR_2, GATE),
            (unit::STAIR_4, -GATE),
            (unit::AT_LEAST_RISCV, GATE),
            (unit::AT_LEAST_OTHER, -GATE),
        ],
        -0.8,
    ),
    // Workstation
    (
        &[(unit::STAIR_3, BAND), (unit::STAIR_4, -BAND), (unit::X86, GATE)],
        -2.0,
    ),
    // Server
    (&[(unit::STAIR_4, BAND)], -0.8),
    // Quantum
    (&[(unit::SPECIALIZED_PAIR, BAND)], -0.8),
];

// ─────────────────────────────────────────────────────────────────
// Parameters
// ─────────────────────────────────────────────────────────────────

/// Weights and biases of the scorer network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorerParameters {
    /// `input_weights[feature][hidden]`
    pub input_weights: [[f32; HIDDEN_UNITS]; FEATURE_COUNT],
    /// `output_weights[hidden][persona]`
    pub output_weights: [[f32; PERSONA_COUNT]; HIDDEN_UNITS],
    pub hidden_bias: [f32; HIDDEN_UNITS],
    pub output_bias: [f32; PERSONA_COUNT],
}

impl ScorerParameters {
    /// All-zero parameters
    pub fn zeroed() -> Self {
        Self {
            input_weights: [[0.0; HIDDEN_UNITS]; FEATURE_COUNT],
            output_weights: [[0.0; PERSONA_COUNT]; HIDDEN_UNITS],
            hidden_bias: [0.0; HIDDEN_UNITS],
            output_bias: [0.0; PERSONA_COUNT],
        }
    }

    /// The capability prior without jitter
    pub fn prior() -> Self {
        let mut params = Self::zeroed();

        for (stair, threshold) in STAIR_THRESHOLDS.iter().enumerate() {
            for &(feature, weight) in CAPABILITY_WEIGHTS.iter() {
                params.input_weights[feature][stair] = STAIR_GAIN * weight;
            }
            params.hidden_bias[stair] = -STAIR_GAIN * threshold;
        }

        for &(hidden, gain, bias) in ARCH_DETECTORS.iter() {
            params.input_weights[index::ARCHITECTURE][hidden] = gain;
            params.hidden_bias[hidden] = bias;
        }

        params.input_weights[index::QUANTUM_COPROCESSOR][unit::SPECIALIZED_PAIR] = PAIR_GAIN;
        params.input_weights[index::CRYO_CONTROLLER][unit::SPECIALIZED_PAIR] = PAIR_GAIN;
        params.hidden_bias[unit::SPECIALIZED_PAIR] = PAIR_BIAS;

        for persona in Persona::all() {
            let (wiring, bias) = OUTPUT_PRIOR[persona.index()];
            for &(hidden, weight) in wiring {
                params.output_weights[hidden][persona.index()] = weight;
            }
            params.output_bias[persona.index()] = bias;
        }

        params
    }

    /// The prior plus uniform jitter in `[-jitter, jitter]` drawn from `seed`
    pub fn seeded(seed: u64, jitter: f32) -> Self {
        let mut params = Self::prior();
        if jitter <= 0.0 {
            return params;
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut nudge = |value: &mut f32| *value += rng.gen_range(-jitter..=jitter);

        params.input_weights.iter_mut().flatten().for_each(&mut nudge);
        params.hidden_bias.iter_mut().for_each(&mut nudge);
        params.output_weights.iter_mut().flatten().for_each(&mut nudge);
        params.output_bias.iter_mut().for_each(&mut nudge);
        params
    }

    /// No NaN or infinity anywhere
    pub fn is_finite(&self) -> bool {
        self.input_weights.iter().flatten().all(|w| w.is_finite())
            && self.output_weights.iter().flatten().all(|w| w.is_finite())
            && self.hidden_bias.iter().all(|b| b.is_finite())
            && self.output_bias.iter().all(|b| b.is_finite())
    }

    /// Output weights within the clamp limit
    pub fn output_weights_bounded(&self) -> bool {
        self.output_weights
            .iter()
            .flatten()
            .chain(self.output_bias.iter())
            .all(|w| w.abs() <= OUTPUT_WEIGHT_LIMIT)
    }
}

impl Default for ScorerParameters {
    fn default() -> Self {
        Self::prior()
    }
}
