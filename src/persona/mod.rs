//! Persona system: the closed set of hardware operating profiles.
//!
//! Each device boots as exactly one persona. Personas are ordered by
//! capability tier, with a single specialized tier on top that requires
//! dedicated hardware.

pub mod types;

pub use types::{Persona, Preference, PERSONA_COUNT};
