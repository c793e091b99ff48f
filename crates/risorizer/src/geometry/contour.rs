//! Closed polygonal contours and multi-contour outlines.
use glam::DVec2;

use crate::geometry::Bounds;

/// A closed polygon. The closing edge from the last point back to the first is implicit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Contour {
    pub points: Vec<DVec2>,
}

impl Contour {
    pub fn new(points: Vec<DVec2>) -> Self {
        Self { points }
    }

    /// Axis-aligned rectangle, counter-clockwise.
    pub fn rect(left: f64, bottom: f64, width: f64, height: f64) -> Self {
        Self::new(vec![
            DVec2::new(left, bottom),
            DVec2::new(left + width, bottom),
            DVec2::new(left + width, bottom + height),
            DVec2::new(left, bottom + height),
        ])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterate the edges `(start, end)` including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (DVec2, DVec2)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Shoelace area; positive for counter-clockwise contours.
    pub fn signed_area(&self) -> f64 {
        if self.points.len() < 3 {
            return 0.0;
        }
        self.edges().map(|(a, b)| a.perp_dot(b)).sum::<f64>() * 0.5
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    pub fn is_ccw(&self) -> bool {
        self.signed_area() > 0.0
    }

    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    pub fn reversed(mut self) -> Self {
        self.reverse();
        self
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.points.iter().copied())
    }

    pub fn translate(&mut self, delta: DVec2) {
        for p in &mut self.points {
            *p += delta;
        }
    }

    pub fn is_finite(&self) -> bool {
        self.points.iter().all(|p| p.is_finite())
    }

    /// Winding number of the contour around `p`.
    ///
    /// Counter-clockwise loops contribute +1, clockwise loops -1. Points exactly on an edge are
    /// classified by the half-open crossing rule.
    pub fn winding_number(&self, p: DVec2) -> i32 {
        if self.points.len() < 3 {
            return 0;
        }
        let mut wn = 0;
        for (a, b) in self.edges() {
            if a.y <= p.y {
                if b.y > p.y && (b - a).perp_dot(p - a) > 0.0 {
                    wn += 1;
                }
            } else if b.y <= p.y && (b - a).perp_dot(p - a) < 0.0 {
                wn -= 1;
            }
        }
        wn
    }

    /// Nonzero-rule containment.
    pub fn contains(&self, p: DVec2) -> bool {
        self.winding_number(p) != 0
    }

    /// A point strictly inside a simple contour.
    ///
    /// Casts a ray inward from the midpoint of the longest edge and takes the halfway point to the
    /// first boundary it hits.
    pub fn interior_point(&self) -> Option<DVec2> {
        let area = self.signed_area();
        if area == 0.0 || !area.is_finite() {
            return None;
        }
        let (a, b) = self.edges().max_by(|x, y| {
            (x.1 - x.0)
                .length_squared()
                .total_cmp(&(y.1 - y.0).length_squared())
        })?;
        let origin = (a + b) * 0.5;
        let mut dir = (b - a).perp().normalize_or_zero();
        if area < 0.0 {
            dir = -dir;
        }

        let mut nearest = f64::INFINITY;
        for (c, d) in self.edges() {
            let s = d - c;
            let denom = dir.perp_dot(s);
            if denom == 0.0 {
                continue;
            }
            let q = c - origin;
            let t = q.perp_dot(s) / denom;
            let u = q.perp_dot(dir) / denom;
            if t > 1e-12 && (0.0..=1.0).contains(&u) {
                nearest = nearest.min(t);
            }
        }
        nearest.is_finite().then(|| origin + dir * (nearest * 0.5))
    }
}

/// A glyph outline: a set of closed contours filled with the nonzero rule.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Outline {
    pub contours: Vec<Contour>,
}

impl Outline {
    pub fn new(contours: Vec<Contour>) -> Self {
        Self { contours }
    }

    pub fn from_contour(contour: Contour) -> Self {
        Self {
            contours: vec![contour],
        }
    }

    pub fn push(&mut self, contour: Contour) {
        self.contours.push(contour);
    }

    pub fn extend<I>(&mut self, contours: I)
    where
        I: IntoIterator<Item = Contour>,
    {
        self.contours.extend(contours);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.contours.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    pub fn point_count(&self) -> usize {
        self.contours.iter().map(Contour::len).sum()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.contours.iter().flat_map(|c| c.points.iter().copied()))
    }

    /// Sum of signed contour areas. Equals the filled area once overlaps are removed and
    /// directions corrected.
    pub fn signed_area(&self) -> f64 {
        self.contours.iter().map(Contour::signed_area).sum()
    }

    pub fn winding_number(&self, p: DVec2) -> i32 {
        self.contours.iter().map(|c| c.winding_number(p)).sum()
    }

    pub fn contains(&self, p: DVec2) -> bool {
        self.winding_number(p) != 0
    }

    pub fn is_finite(&self) -> bool {
        self.contours.iter().all(Contour::is_finite)
    }

    pub fn translate(&mut self, delta: DVec2) {
        for c in &mut self.contours {
            c.translate(delta);
        }
    }
}

impl FromIterator<Contour> for Outline {
    fn from_iter<T: IntoIterator<Item = Contour>>(iter: T) -> Self {
        Self {
            contours: iter.into_iter().collect(),
        }
    }
}
