//! Sampling region preparation.
use tracing::debug;

use crate::error::Result;
use crate::filter::ops::OutlineOps;
use crate::filter::INSET_FACTOR;
use crate::geometry::{cleanup_outline, Outline};

/// Normalize `outline` and shrink it by [`INSET_FACTOR`] × `inset`.
///
/// Overlaps are removed and directions corrected before offsetting, so the result can be used
/// directly for containment tests. A negative inset grows the region instead.
pub fn prepare_region(outline: &Outline, inset: f64, ops: &dyn OutlineOps) -> Result<Outline> {
    let cleaned = cleanup_outline(outline);
    let merged = ops.remove_overlap(&cleaned)?;
    let normalized = ops.correct_path_direction(&merged);
    let region = ops.offset(&normalized, -INSET_FACTOR * inset)?;
    debug!(
        "Prepared region: {} contours in, {} contours after inset {}.",
        outline.len(),
        region.len(),
        inset
    );
    Ok(region)
}
