//! Feature extraction
//!
//! Turns raw probe data into a populated `HardwareFeatures` and encodes it as
//! the fixed-length vector the scorer consumes.

mod hardware;
mod probe;
mod vector;

pub use hardware::*;
pub use probe::*;
pub use vector::*;
