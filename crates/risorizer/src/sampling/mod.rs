//! Spot sampling inside a region.
//!
//! [`SpotSampler`] rejection-samples positions inside an [`crate::geometry::Outline`], weights
//! them by a [`Distribution`] around a random spark point, and builds a [`Triangle`] per accepted
//! position.
use rand::RngCore;

pub mod distribution;
pub mod spots;
pub mod triangle;

pub use distribution::Distribution;
pub use spots::{SpotSampler, SpotSet};
pub use triangle::{build_triangle, Triangle};

/// Generate a random float in the range [0, 1).
#[inline]
pub(crate) fn rand01(rng: &mut dyn RngCore) -> f64 {
    (rng.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}

/// Generate a random float in the range [lo, hi).
#[inline]
pub(crate) fn rand_range(rng: &mut dyn RngCore, lo: f64, hi: f64) -> f64 {
    lo + (hi - lo) * rand01(rng)
}
