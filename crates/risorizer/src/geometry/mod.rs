//! Polygonal outline geometry.
//!
//! Glyph outlines are modeled as [`Outline`]s made of closed [`Contour`]s. Curves are flattened
//! into line segments by [`PathBuilder`]. Overlap removal and offsetting live in [`boolean`] and
//! [`offset`], both built on `cavalier_contours`; direction correction, grid snapping, and cleanup
//! in [`cleanup`].
use glam::DVec2;

pub mod boolean;
pub mod cleanup;
pub mod contour;
pub mod offset;
pub mod path;
mod pline;

pub use boolean::{fill_region, FillRule};
pub use cleanup::{cleanup_outline, correct_path_direction, round_to_grid};
pub use contour::{Contour, Outline};
pub use offset::offset_outline;
pub use path::PathBuilder;

/// Axis-aligned bounding box expressed the way font tools report layer bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(left: f64, bottom: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            bottom,
            width,
            height,
        }
    }

    /// Smallest box containing all `points`, or `None` for an empty iterator.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = DVec2>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self::from_min_max(min, max))
    }

    pub fn from_min_max(min: DVec2, max: DVec2) -> Self {
        Self {
            left: min.x,
            bottom: min.y,
            width: max.x - min.x,
            height: max.y - min.y,
        }
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.bottom + self.height
    }

    #[inline]
    pub fn min(&self) -> DVec2 {
        DVec2::new(self.left, self.bottom)
    }

    #[inline]
    pub fn max(&self) -> DVec2 {
        DVec2::new(self.right(), self.top())
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(
            self.left + self.width * 0.5,
            self.bottom + self.height * 0.5,
        )
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Length of the box diagonal.
    pub fn diagonal(&self) -> f64 {
        self.width.hypot(self.height)
    }

    /// Inclusive containment test.
    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.left && p.x <= self.right() && p.y >= self.bottom && p.y <= self.top()
    }

    pub fn intersects(&self, other: &Bounds) -> bool {
        self.left <= other.right()
            && other.left <= self.right()
            && self.bottom <= other.top()
            && other.bottom <= self.top()
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds::from_min_max(self.min().min(other.min()), self.max().max(other.max()))
    }

    /// Farthest corner of the box from `p`.
    pub fn farthest_corner(&self, p: DVec2) -> DVec2 {
        let x = if (p.x - self.left).abs() > (self.right() - p.x).abs() {
            self.left
        } else {
            self.right()
        };
        let y = if (p.y - self.bottom).abs() > (self.top() - p.y).abs() {
            self.bottom
        } else {
            self.top()
        };
        DVec2::new(x, y)
    }
}
