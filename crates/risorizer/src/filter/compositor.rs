//! Compositing spots onto the original outline.
use crate::filter::ops::OutlineOps;
use crate::geometry::{round_to_grid, Outline};

/// Append `spots` to `original` and re-normalize path directions.
///
/// With `round` the combined outline is snapped to the integer grid and cleaned up before the
/// direction pass. Spots lying inside filled contours end up as counters.
pub fn composite(
    original: &Outline,
    spots: &Outline,
    round: bool,
    ops: &dyn OutlineOps,
) -> Outline {
    let mut combined = original.clone();
    combined.extend(spots.contours.iter().cloned());
    if round {
        combined = round_to_grid(&combined, 1.0);
    }
    ops.correct_path_direction(&combined)
}
