//! Randomized triangle construction.
use std::f64::consts::{FRAC_PI_3, FRAC_PI_6, TAU};

use glam::DVec2;
use rand::RngCore;

use crate::geometry::{Bounds, Contour};
use crate::sampling::{rand01, rand_range};

/// Mean angle between the two generated legs.
pub const LEG_ANGLE: f64 = FRAC_PI_3;
/// Maximum deviation from [`LEG_ANGLE`].
pub const LEG_ANGLE_JITTER: f64 = FRAC_PI_6;

/// A triangle spot: the sampled origin followed by two generated vertices, counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub points: [DVec2; 3],
}

impl Triangle {
    pub fn new(a: DVec2, b: DVec2, c: DVec2) -> Self {
        Self { points: [a, b, c] }
    }

    /// The sampled position the triangle was built from.
    #[inline]
    pub fn origin(&self) -> DVec2 {
        self.points[0]
    }

    /// Cross product of the two edge vectors leaving the origin.
    pub fn cross(&self) -> f64 {
        let [a, b, c] = self.points;
        (b - a).perp_dot(c - a)
    }

    pub fn signed_area(&self) -> f64 {
        self.cross() * 0.5
    }

    pub fn is_ccw(&self) -> bool {
        self.cross() >= 0.0
    }

    /// Lengths of the two legs leaving the origin.
    pub fn leg_lengths(&self) -> [f64; 2] {
        let [a, b, c] = self.points;
        [(b - a).length(), (c - a).length()]
    }

    pub fn bounds(&self) -> Bounds {
        let [a, b, c] = self.points;
        Bounds::from_min_max(a.min(b).min(c), a.max(b).max(c))
    }

    /// Inclusive containment, independent of winding.
    pub fn contains(&self, p: DVec2) -> bool {
        let [a, b, c] = self.points;
        let d1 = (b - a).perp_dot(p - a);
        let d2 = (c - b).perp_dot(p - b);
        let d3 = (a - c).perp_dot(p - c);
        let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
        let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
        !(has_neg && has_pos)
    }

    pub fn to_contour(&self) -> Contour {
        Contour::new(self.points.to_vec())
    }
}

/// Build a randomized triangle at `position`.
///
/// Both legs leave `position` with lengths uniform in `[side·(1-variance), side·(1+variance)]`.
/// The first leg points in a uniformly random direction; the second is rotated from it by
/// 60° ± 30°. Variance is clamped to `[0, 1]`. Tiny sides produce degenerate triangles rather
/// than failing.
pub fn build_triangle(
    position: DVec2,
    side: f64,
    variance: f64,
    rng: &mut dyn RngCore,
) -> Triangle {
    let variance = if variance.is_finite() {
        variance.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let side = side.abs();
    let min_len = side * (1.0 - variance);
    let max_len = side * (1.0 + variance);

    let first_angle = rand01(rng) * TAU;
    let first_len = rand_range(rng, min_len, max_len);
    let first = position + DVec2::from_angle(first_angle) * first_len;

    let leg = first - position;
    let heading = leg.y.atan2(leg.x);
    let second_angle = heading
        + rand_range(
            rng,
            LEG_ANGLE - LEG_ANGLE_JITTER,
            LEG_ANGLE + LEG_ANGLE_JITTER,
        );
    let second_len = rand_range(rng, min_len, max_len);
    let second = position + DVec2::from_angle(second_angle) * second_len;

    let triangle = Triangle::new(position, first, second);
    if triangle.cross() < 0.0 {
        Triangle::new(position, second, first)
    } else {
        triangle
    }
}
