//! Distance falloff used to cluster spots around a spark point.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Acceptance probability at the characteristic distance for the unbounded falloffs.
pub const TAIL_PROBABILITY: f64 = 0.01;

/// Spatial distribution of spots relative to the spark point.
///
/// The numeric codes (0..=4) match the `distribute` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Distribution {
    /// No distance weighting; every candidate is accepted.
    #[default]
    None,
    /// `exp(-d²/2σ²)` with the probability dropping to 1% at the scale distance.
    Gaussian,
    /// Linear falloff reaching zero at the scale distance.
    Uniform,
    /// `exp(-λd)` with the probability dropping to 1% at the scale distance.
    Exponential,
    /// `(1 - √(d/m))²`, zero at the scale distance.
    Smooth,
}

impl Distribution {
    pub const ALL: [Distribution; 5] = [
        Distribution::None,
        Distribution::Gaussian,
        Distribution::Uniform,
        Distribution::Exponential,
        Distribution::Smooth,
    ];

    pub fn from_index(index: i64) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn index(self) -> i64 {
        match self {
            Distribution::None => 0,
            Distribution::Gaussian => 1,
            Distribution::Uniform => 2,
            Distribution::Exponential => 3,
            Distribution::Smooth => 4,
        }
    }

    pub fn is_weighted(self) -> bool {
        self != Distribution::None
    }

    /// Acceptance probability at `distance` from the spark for characteristic scale `scale`.
    ///
    /// With a non-positive scale only distance zero is accepted by the weighted modes.
    pub fn probability(self, distance: f64, scale: f64) -> f64 {
        if self == Distribution::None {
            return 1.0;
        }
        let d = distance.max(0.0);
        if scale.is_nan() || scale <= 0.0 {
            return if d == 0.0 { 1.0 } else { 0.0 };
        }
        match self {
            Distribution::None => 1.0,
            Distribution::Gaussian => {
                let sigma = scale / (-2.0 * TAIL_PROBABILITY.ln()).sqrt();
                (-(d * d) / (2.0 * sigma * sigma)).exp()
            }
            Distribution::Uniform => {
                if d < scale {
                    1.0 - d / scale
                } else {
                    0.0
                }
            }
            Distribution::Exponential => {
                let lambda = -TAIL_PROBABILITY.ln() / scale;
                (-lambda * d).exp()
            }
            Distribution::Smooth => {
                if d < scale {
                    let s = 1.0 - (d / scale).sqrt();
                    s * s
                } else {
                    0.0
                }
            }
        }
    }
}
