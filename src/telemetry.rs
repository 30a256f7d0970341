//! Engine telemetry counters
//!
//! Counters only grow while an engine is alive. They reset when the engine is
//! re-initialized.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::features::HardwareFeatures;
use crate::persona::Persona;

/// The most recent recommendation, kept so feedback can refer back to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastRecommendation {
    pub persona: Persona,
    pub confidence: f32,
    pub features: HardwareFeatures,
    pub at: DateTime<Utc>,
}

/// Read-only view of engine activity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineStatistics {
    pub total_recommendations: u64,
    pub successful_recommendations: u64,
    pub training_samples: usize,
    pub trained_epochs: u64,
    pub last: Option<LastRecommendation>,
}

impl EngineStatistics {
    /// Share of feedback-confirmed recommendations, 0 when nothing was recommended
    pub fn success_rate(&self) -> f32 {
        if self.total_recommendations == 0 {
            0.0
        } else {
            self.successful_recommendations as f32 / self.total_recommendations as f32
        }
    }

    pub fn last_persona(&self) -> Option<Persona> {
        self.last.as_ref().map(|l| l.persona)
    }

    pub fn last_confidence(&self) -> Option<f32> {
        self.last.as_ref().map(|l| l.confidence)
    }

    pub(crate) fn record_recommendation(
        &mut self,
        persona: Persona,
        confidence: f32,
        features: &HardwareFeatures,
    ) {
        self.total_recommendations += 1;
        self.last = Some(LastRecommendation {
            persona,
            confidence,
            features: features.clone(),
            at: Utc::now(),
        });
    }

    pub(crate) fn record_success(&mut self) {
        self.successful_recommendations += 1;
    }

    pub(crate) fn record_epochs(&mut self, epochs: u32) {
        self.trained_epochs += u64::from(epochs);
    }
}

impl fmt::Display for EngineStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Recommendations:  {}", self.total_recommendations)?;
        writeln!(
            f,
            "Successful:       {} ({:.1}%)",
            self.successful_recommendations,
            self.success_rate() * 100.0
        )?;
        writeln!(f, "Training samples: {}", self.training_samples)?;
        writeln!(f, "Trained epochs:   {}", self.trained_epochs)?;
        match &self.last {
            Some(last) => write!(
                f,
                "Last persona:     {} ({:.0}% confidence)",
                last.persona,
                last.confidence * 100.0
            ),
            None => write!(f, "Last persona:     none"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_rate() {
        let mut stats = EngineStatistics::default();
        assert_eq!(stats.success_rate(), 0.0);

        let features = HardwareFeatures::default();
        stats.record_recommendation(Persona::Embedded, 0.6, &features);
        stats.record_recommendation(Persona::Retro, 0.7, &features);
        stats.record_success();
        assert_eq!(stats.success_rate(), 0.5);
        assert_eq!(stats.last_persona(), Some(Persona::Retro));
        assert_eq!(stats.last_confidence(), Some(0.7));
    }

    #[test]
    fn test_epochs_accumulate() {
        let mut stats = EngineStatistics::default();
        stats.record_epochs(3);
        stats.record_epochs(4);
        assert_eq!(stats.trained_epochs, 7);
    }

    #[test]
    fn test_display() {
        let stats = EngineStatistics::default();
        let text = stats.to_string();
        assert!(text.contains("Recommendations:  0"));
        assert!(text.contains("Last persona:     none"));
    }
}
