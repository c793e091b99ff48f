//! Parallel offsetting of outlines with `cavalier_contours`.
use cavalier_contours::polyline::{PlineOffsetOptions, PlineSource};
use tracing::debug;

use crate::error::Result;
use crate::geometry::pline::{from_pline, to_pline};
use crate::geometry::{fill_region, Contour, FillRule, Outline};

/// Offset `outline` by `distance`: positive values grow the filled area, negative values shrink
/// it.
///
/// Overlaps are removed first, so every boundary has the filled side on its left. Each boundary
/// is then offset by cavalier toward or away from that side; convex corners moving outward and
/// concave corners moving inward are rounded, with arcs flattened to `tolerance`. Loops that
/// collapse while shrinking disappear, so over-shrinking yields an empty outline.
pub fn offset_outline(outline: &Outline, distance: f64, tolerance: f64) -> Result<Outline> {
    let region = fill_region(&outline.contours, FillRule::NonZero)?;
    if distance == 0.0 {
        return Ok(Outline::new(region));
    }

    let options = PlineOffsetOptions {
        handle_self_intersects: true,
        ..Default::default()
    };
    // Cavalier offsets toward the left of travel for positive values.
    let signed = -distance;
    let moved: Vec<Contour> = region
        .iter()
        .flat_map(|c| to_pline(c).parallel_offset_opt(signed, &options))
        .map(|p| from_pline(&p, tolerance))
        .collect();

    // Grown holes may poke out of shrunk outers; only positive winding stays filled.
    let out = fill_region(&moved, FillRule::Positive)?;
    debug!(
        "Offset {} boundaries by {} into {} contours.",
        region.len(),
        distance,
        out.len()
    );
    Ok(Outline::new(out))
}
