//! Outline construction from path commands, flattening curves into line segments.
use glam::DVec2;

use crate::geometry::{Contour, Outline};

/// Default maximum distance between a curve and its flattened polyline, in font units.
pub const DEFAULT_FLATTEN_TOLERANCE: f64 = 0.5;

const MAX_CURVE_SEGMENTS: usize = 256;

/// Builds an [`Outline`] from move/line/quadratic/cubic commands.
///
/// Every contour is closed implicitly when the next `move_to` starts or on [`PathBuilder::build`].
#[derive(Debug, Clone)]
pub struct PathBuilder {
    tolerance: f64,
    current: Vec<DVec2>,
    outline: Outline,
}

impl Default for PathBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::with_tolerance(DEFAULT_FLATTEN_TOLERANCE)
    }

    /// Non-positive or non-finite tolerances fall back to the default.
    pub fn with_tolerance(tolerance: f64) -> Self {
        let tolerance = if tolerance.is_finite() && tolerance > 0.0 {
            tolerance
        } else {
            DEFAULT_FLATTEN_TOLERANCE
        };
        Self {
            tolerance,
            current: Vec::new(),
            outline: Outline::default(),
        }
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.close();
        self.current.push(DVec2::new(x, y));
        self
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.current.push(DVec2::new(x, y));
        self
    }

    pub fn quad_to(&mut self, cx: f64, cy: f64, x: f64, y: f64) -> &mut Self {
        let p0 = self.last_point();
        let p1 = DVec2::new(cx, cy);
        let p2 = DVec2::new(x, y);
        let dd = (p0 - 2.0 * p1 + p2).length();
        let n = segment_count(0.25 * dd, self.tolerance);
        for i in 1..=n {
            let t = i as f64 / n as f64;
            let mt = 1.0 - t;
            self.current
                .push(p0 * (mt * mt) + p1 * (2.0 * mt * t) + p2 * (t * t));
        }
        self
    }

    pub fn curve_to(&mut self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64) -> &mut Self {
        let p0 = self.last_point();
        let p1 = DVec2::new(c1x, c1y);
        let p2 = DVec2::new(c2x, c2y);
        let p3 = DVec2::new(x, y);
        let dd = (p0 - 2.0 * p1 + p2)
            .length()
            .max((p1 - 2.0 * p2 + p3).length());
        let n = segment_count(0.75 * dd, self.tolerance);
        for i in 1..=n {
            let t = i as f64 / n as f64;
            let mt = 1.0 - t;
            self.current.push(
                p0 * (mt * mt * mt)
                    + p1 * (3.0 * mt * mt * t)
                    + p2 * (3.0 * mt * t * t)
                    + p3 * (t * t * t),
            );
        }
        self
    }

    /// Close the current contour. Contours with fewer than three distinct points are dropped.
    pub fn close(&mut self) -> &mut Self {
        let mut points = std::mem::take(&mut self.current);
        points.dedup();
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        if points.len() >= 3 {
            self.outline.push(Contour::new(points));
        }
        self
    }

    pub fn build(mut self) -> Outline {
        self.close();
        self.outline
    }

    fn last_point(&self) -> DVec2 {
        self.current.last().copied().unwrap_or(DVec2::ZERO)
    }
}

/// Wang's bound: segments needed so the polyline stays within `tolerance` of the curve.
fn segment_count(scaled_second_difference: f64, tolerance: f64) -> usize {
    let n = (scaled_second_difference / tolerance).sqrt().ceil();
    if n.is_finite() {
        (n as usize).clamp(1, MAX_CURVE_SEGMENTS)
    } else {
        1
    }
}
