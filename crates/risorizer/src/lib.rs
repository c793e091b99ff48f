#![forbid(unsafe_code)]
//! risorizer: risograph-style triangle spot texture for glyph outlines.
//!
//! Modules:
//! - geometry: polygonal outlines, curve flattening, overlap removal, offsetting, direction fixes
//! - sampling: spot sampling, triangle building, distance-weighted distributions
//! - filter: configuration, outline capability, region preparation, compositing, per-layer runner
//!
//! The pipeline per layer is: prepare the region (clean up, remove overlap, shrink by twice the
//! inset), sample triangles inside it, merge them, and append them to the original outline.
pub mod error;
pub mod filter;
pub mod geometry;
pub mod sampling;

/// Convenient re-exports for common types. Import with `use risorizer::prelude::*;`.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::filter::compositor::composite;
    pub use crate::filter::config::{ParameterSource, RisoConfig};
    pub use crate::filter::events::{EventSink, FilterEvent, FnSink, VecSink};
    pub use crate::filter::ops::{OutlineOps, PolygonOps};
    pub use crate::filter::region::prepare_region;
    pub use crate::filter::runner::{
        filter_layer, filter_layers, FilterReport, Layer, LayerOutcome, Risorizer,
    };
    pub use crate::geometry::{Bounds, Contour, FillRule, Outline, PathBuilder};
    pub use crate::sampling::{build_triangle, Distribution, SpotSampler, SpotSet, Triangle};
}
