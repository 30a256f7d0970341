//! Bounded-linear squashing function shared by both network layers.

/// Inputs at or beyond this magnitude saturate.
pub const SATURATION: f32 = 2.0;

/// Slope of the linear segment.
pub const SLOPE: f32 = 0.25;

/// 0 below -2, 1 above 2, a straight line through (0, 0.5) in between.
#[inline]
pub fn squash(x: f32) -> f32 {
    if x <= -SATURATION {
        0.0
    } else if x >= SATURATION {
        1.0
    } else {
        0.5 + SLOPE * x
    }
}
