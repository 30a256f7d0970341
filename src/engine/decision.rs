//! Decision results and the strategies that produce them

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::policy::ConstraintRule;
use crate::persona::Persona;

/// Confidence reported when the specialized hardware pair forces a decision
pub const SPECIALIZED_CONFIDENCE: f32 = 0.95;

/// How a decision is reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind", content = "persona")]
pub enum Strategy {
    /// The user asked for this persona
    Direct(Persona),
    /// A hardware rule picks the persona outright
    RuleOverride(Persona),
    /// Scorer followed by the constraint policy
    Learned,
}

impl Strategy {
    pub fn label(&self) -> &'static str {
        match self {
            Strategy::Direct(_) => "preference",
            Strategy::RuleOverride(_) => "hardware rule",
            Strategy::Learned => "learned",
        }
    }
}

/// Outcome of one recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionResult {
    pub persona: Persona,
    /// In [0, 1]
    pub confidence: f32,
    pub rationale: Option<String>,
    pub strategy: Strategy,
    /// Constraint that replaced the scorer's choice, if any
    pub constraint: Option<ConstraintRule>,
}

impl fmt::Display for DecisionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Recommended persona: {} ({:.0}% confidence, {})",
            self.persona,
            self.confidence * 100.0,
            self.strategy.label()
        )?;
        if let Some(rationale) = &self.rationale {
            write!(f, ": {}", rationale)?;
        }
        Ok(())
    }
}
