//! Outline capability used by the filter.
//!
//! Font hosts provide offsetting and overlap removal as native primitives. [`OutlineOps`] is the
//! seam for those host differences; [`PolygonOps`] implements it on flattened polygons.
use crate::error::{Error, Result};
use crate::geometry::path::DEFAULT_FLATTEN_TOLERANCE;
use crate::geometry::{correct_path_direction, fill_region, offset_outline, FillRule, Outline};

/// Outline operations the filter delegates to its host.
pub trait OutlineOps {
    /// Offset the outline by `distance`; negative values shrink it.
    fn offset(&self, outline: &Outline, distance: f64) -> Result<Outline>;

    /// Merge overlapping contours and resolve self-intersections.
    fn remove_overlap(&self, outline: &Outline) -> Result<Outline>;

    /// Orient outer contours counter-clockwise and nested ones alternately.
    fn correct_path_direction(&self, outline: &Outline) -> Outline {
        correct_path_direction(outline)
    }
}

/// Polygon implementation of [`OutlineOps`] backed by `cavalier_contours`.
#[derive(Debug, Clone)]
pub struct PolygonOps {
    /// Maximum distance between a rounded offset corner and its flattened polygon.
    pub tolerance: f64,
}

impl Default for PolygonOps {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_FLATTEN_TOLERANCE,
        }
    }
}

impl PolygonOps {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }
}

fn ensure_finite(outline: &Outline, op: &str) -> Result<()> {
    if outline.is_finite() {
        Ok(())
    } else {
        Err(Error::Geometry(format!(
            "{op}: outline contains non-finite coordinates"
        )))
    }
}

impl OutlineOps for PolygonOps {
    fn offset(&self, outline: &Outline, distance: f64) -> Result<Outline> {
        ensure_finite(outline, "offset")?;
        if !distance.is_finite() {
            return Err(Error::Geometry(format!(
                "offset: distance must be finite, got {distance}"
            )));
        }
        offset_outline(outline, distance, self.tolerance)
    }

    fn remove_overlap(&self, outline: &Outline) -> Result<Outline> {
        ensure_finite(outline, "remove_overlap")?;
        Ok(Outline::new(fill_region(&outline.contours, FillRule::NonZero)?))
    }
}
