//! Conversion between contours and `cavalier_contours` polylines.
//!
//! Contours are straight-edged, so they map onto closed polylines with zero bulge. Offsetting
//! introduces arc segments (non-zero bulge), which are flattened back into points within a chord
//! tolerance.
use cavalier_contours::polyline::{PlineCreation, PlineSource, PlineSourceMut, Polyline};
use glam::DVec2;

use crate::geometry::Contour;

/// Upper bound on the segments a single arc is flattened into.
const MAX_ARC_SEGMENTS: usize = 64;

pub(crate) fn to_pline(contour: &Contour) -> Polyline<f64> {
    let mut pline = Polyline::with_capacity(contour.len(), true);
    for p in &contour.points {
        pline.add(p.x, p.y, 0.0);
    }
    pline
}

pub(crate) fn from_pline(pline: &Polyline<f64>, tolerance: f64) -> Contour {
    let vertices = &pline.vertex_data;
    let n = vertices.len();
    let mut points = Vec::with_capacity(n);
    for (i, v) in vertices.iter().enumerate() {
        let start = DVec2::new(v.x, v.y);
        points.push(start);
        if v.bulge == 0.0 || (i + 1 == n && !pline.is_closed()) {
            continue;
        }
        let next = &vertices[(i + 1) % n];
        push_arc(
            &mut points,
            start,
            DVec2::new(next.x, next.y),
            v.bulge,
            tolerance,
        );
    }
    Contour::new(points)
}

/// Append the interior points of the arc from `start` to `end`.
///
/// `bulge` is the tangent of a quarter of the swept angle; positive bulges turn counter-clockwise.
fn push_arc(points: &mut Vec<DVec2>, start: DVec2, end: DVec2, bulge: f64, tolerance: f64) {
    let chord = end - start;
    if chord.length_squared() == 0.0 || !bulge.is_finite() {
        return;
    }
    let sweep = 4.0 * bulge.atan();
    let center = (start + end) * 0.5 + chord.perp() * ((1.0 - bulge * bulge) / (4.0 * bulge));
    let radius = (start - center).length();

    let max_step = if tolerance > 0.0 && tolerance < radius {
        2.0 * (1.0 - tolerance / radius).acos()
    } else {
        sweep.abs()
    };
    let segments = if max_step > 0.0 {
        ((sweep.abs() / max_step).ceil() as usize).clamp(1, MAX_ARC_SEGMENTS)
    } else {
        MAX_ARC_SEGMENTS
    };

    let offset = start - center;
    let a0 = offset.y.atan2(offset.x);
    for k in 1..segments {
        let a = a0 + sweep * (k as f64 / segments as f64);
        points.push(center + DVec2::from_angle(a) * radius);
    }
}
