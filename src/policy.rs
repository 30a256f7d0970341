//! Hardware constraint policy
//!
//! Deterministic rules that override the scorer's choice when the hardware
//! cannot run it. Rules are checked in order and the first one that applies
//! is final, which keeps the policy idempotent.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::features::{Architecture, HardwareFeatures};
use crate::persona::Persona;

/// Below this much memory (KB) only the lowest tier fits
pub const TINY_MEMORY_KB: u64 = 8;

/// Below this much memory (KB) nothing above `Embedded` fits
pub const SMALL_MEMORY_KB: u64 = 64;

/// Below this much memory (KB) nothing above `Retro` fits
pub const LEGACY_MEMORY_KB: u64 = 1024;

/// The rule that changed a proposed persona
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConstraintRule {
    /// Memory too small for the proposed tier
    MemoryCap,
    /// x86-only persona proposed for an ARM device
    ArmRedirect,
    /// RISC-V device proposed a lower tier than `RiscV`
    RiscVRaise,
    /// Specialized persona without the full specialized hardware pair
    SpecializedFallback,
}

impl ConstraintRule {
    pub fn description(&self) -> &'static str {
        match self {
            ConstraintRule::MemoryCap => "memory below the proposed tier's minimum",
            ConstraintRule::ArmRedirect => "x86-only persona on ARM hardware",
            ConstraintRule::RiscVRaise => "RISC-V hardware supports the RISC-V tier",
            ConstraintRule::SpecializedFallback => "specialized hardware pair not present",
        }
    }
}

impl fmt::Display for ConstraintRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Result of running the policy over a proposal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyOutcome {
    pub persona: Persona,
    /// Set when the final persona differs from the proposal
    pub rule: Option<ConstraintRule>,
}

/// Highest persona the memory allows, or `None` when memory is not limiting
fn memory_cap(memory_kb: u64) -> Option<Persona> {
    if memory_kb < TINY_MEMORY_KB {
        Some(Persona::Calculator)
    } else if memory_kb < SMALL_MEMORY_KB {
        Some(Persona::Embedded)
    } else if memory_kb < LEGACY_MEMORY_KB {
        Some(Persona::Retro)
    } else {
        None
    }
}

fn changed(proposed: Persona, persona: Persona, rule: ConstraintRule) -> PolicyOutcome {
    PolicyOutcome {
        persona,
        rule: (persona != proposed).then_some(rule),
    }
}

/// Run the rules over a proposed persona
pub fn evaluate(features: &HardwareFeatures, proposed: Persona) -> PolicyOutcome {
    if let Some(cap) = memory_cap(features.memory_kb) {
        return changed(proposed, proposed.min(cap), ConstraintRule::MemoryCap);
    }

    if features.architecture == Architecture::Arm && proposed.is_x86_specific() {
        return changed(proposed, Persona::Arm64, ConstraintRule::ArmRedirect);
    }

    if features.architecture == Architecture::RiscV && proposed.tier() < Persona::RiscV.tier() {
        return changed(proposed, Persona::RiscV, ConstraintRule::RiscVRaise);
    }

    if proposed == Persona::Quantum && !features.has_specialized_pair() {
        return changed(proposed, Persona::Server, ConstraintRule::SpecializedFallback);
    }

    PolicyOutcome {
        persona: proposed,
        rule: None,
    }
}

/// Final persona after constraints
pub fn apply(features: &HardwareFeatures, proposed: Persona) -> Persona {
    evaluate(features, proposed).persona
}
