//! Path direction correction, grid snapping, and general path cleanup.
use glam::DVec2;

use crate::geometry::{Contour, Outline};

/// Orient contours by nesting depth: even depth counter-clockwise, odd depth clockwise.
///
/// Depth is the number of other contours enclosing a contour's first point. Contours are not
/// merged, so shapes placed inside a filled contour become counters.
pub fn correct_path_direction(outline: &Outline) -> Outline {
    let contours = &outline.contours;
    let bounds: Vec<_> = contours.iter().map(Contour::bounds).collect();
    contours
        .iter()
        .enumerate()
        .map(|(i, contour)| {
            let mut contour = contour.clone();
            let Some(&probe) = contour.points.first() else {
                return contour;
            };
            let depth = contours
                .iter()
                .enumerate()
                .filter(|&(j, other)| {
                    j != i
                        && bounds[j].is_some_and(|b| b.contains(probe))
                        && other.contains(probe)
                })
                .count();
            let want_ccw = depth % 2 == 0;
            if contour.is_ccw() != want_ccw {
                contour.reverse();
            }
            contour
        })
        .collect()
}

/// Snap every point to a multiple of `grid`, then clean up the result.
///
/// Non-positive or non-finite grids leave the outline untouched.
pub fn round_to_grid(outline: &Outline, grid: f64) -> Outline {
    if !grid.is_finite() || grid <= 0.0 {
        return outline.clone();
    }
    let snapped: Outline = outline
        .contours
        .iter()
        .map(|c| Contour::new(c.points.iter().map(|p| (*p / grid).round() * grid).collect()))
        .collect();
    cleanup_outline(&snapped)
}

/// Drop duplicate and collinear points, and contours that no longer enclose any area.
pub fn cleanup_outline(outline: &Outline) -> Outline {
    outline
        .contours
        .iter()
        .filter_map(|c| {
            let cleaned = cleanup_contour(&c.points);
            (cleaned.len() >= 3 && cleaned.signed_area() != 0.0).then_some(cleaned)
        })
        .collect()
}

/// Drop duplicate points and points whose neighbours are collinear with them, including the tip
/// of zero-width spikes.
pub(crate) fn cleanup_contour(points: &[DVec2]) -> Contour {
    let mut pts: Vec<DVec2> = points.to_vec();
    pts.dedup();
    while pts.len() > 1 && pts.first() == pts.last() {
        pts.pop();
    }

    loop {
        let n = pts.len();
        if n < 3 {
            break;
        }
        let redundant = (0..n).find(|&i| {
            let prev = pts[(i + n - 1) % n];
            let next = pts[(i + 1) % n];
            let cur = pts[i];
            (cur - prev).perp_dot(next - cur) == 0.0
        });
        match redundant {
            Some(i) => {
                pts.remove(i);
            }
            None => break,
        }
    }
    Contour::new(pts)
}
