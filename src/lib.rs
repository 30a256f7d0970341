//! Persona Engine - boot-time persona selection with online learning.
//!
//! A device of unknown capability is described by `HardwareFeatures`. The
//! engine picks the persona it should boot as and learns from the outcomes
//! reported afterwards.
//!
//! - `features`: probe data, host detection, normalized feature vector
//! - `scorer`: one-hidden-layer network producing per-persona affinity
//! - `policy`: hard hardware constraints over the scorer's choice
//! - `engine`: the decision pipeline, persistence and shared handle
//! - `trainer`, `telemetry`: feedback buffer, output-layer updates, counters
//!
//! ```no_run
//! use persona_engine::config::EngineSettings;
//! use persona_engine::engine::PersonaEngine;
//! use persona_engine::features::detect_or_accept_features;
//!
//! let mut engine = PersonaEngine::initialize(&EngineSettings::default());
//! let features = detect_or_accept_features(None);
//! let decision = engine.recommend(&features)?;
//! println!("{}", decision);
//! engine.record_feedback(&features, decision.persona, 0.9, 1200)?;
//! engine.train(10)?;
//! # Ok::<(), persona_engine::error::Error>(())
//! ```

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod features;
pub mod logging;
pub mod persona;
pub mod policy;
pub mod scorer;
pub mod telemetry;
pub mod trainer;
pub mod version;

pub use engine::{DecisionResult, PersonaEngine, SharedEngine};
pub use error::{Error, Result};
pub use features::{HardwareFeatures, ProbeData};
pub use persona::{Persona, Preference};
