//! Sample glyph outlines.
use risorizer::geometry::{Contour, Outline, PathBuilder};

pub fn square(extent: f64) -> Outline {
    Outline::from_contour(Contour::rect(0.0, 0.0, extent, extent))
}

/// An "O": outer bowl and counter built from cubic quarter arcs.
pub fn letter_o(tolerance: f64) -> Outline {
    let mut b = PathBuilder::with_tolerance(tolerance);
    ellipse(&mut b, 350.0, 350.0, 300.0, 340.0, false);
    ellipse(&mut b, 350.0, 350.0, 170.0, 230.0, true);
    b.build()
}

/// An "H" drawn as three overlapping rectangles, as a decomposed component glyph would be.
pub fn letter_h() -> Outline {
    Outline::new(vec![
        Contour::rect(0.0, 0.0, 120.0, 700.0),
        Contour::rect(480.0, 0.0, 120.0, 700.0),
        Contour::rect(60.0, 300.0, 480.0, 110.0),
    ])
}

fn ellipse(b: &mut PathBuilder, cx: f64, cy: f64, rx: f64, ry: f64, clockwise: bool) {
    let kx = 0.552_284_749_8 * rx;
    let ky = 0.552_284_749_8 * ry;
    let s = if clockwise { -1.0 } else { 1.0 };
    b.move_to(cx + rx, cy)
        .curve_to(cx + rx, cy + s * ky, cx + kx, cy + s * ry, cx, cy + s * ry)
        .curve_to(cx - kx, cy + s * ry, cx - rx, cy + s * ky, cx - rx, cy)
        .curve_to(cx - rx, cy - s * ky, cx - kx, cy - s * ry, cx, cy - s * ry)
        .curve_to(cx + kx, cy - s * ry, cx + rx, cy - s * ky, cx + rx, cy);
}
