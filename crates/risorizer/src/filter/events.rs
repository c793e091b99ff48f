//! Event types and sinks for observing filter runs.
//!
//! This module defines [`FilterEvent`] and sinks to collect or forward events while running
//! [`crate::filter::runner::filter_layer`] or [`crate::filter::runner::filter_layers`].
use glam::DVec2;

use crate::filter::runner::FilterReport;
use crate::geometry::Bounds;

/// Describes events emitted while filtering layers.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum FilterEvent {
    /// Emitted when a layer starts processing.
    LayerStarted {
        /// Position of the layer in the batch.
        index: usize,
        /// The layer name.
        layer: String,
    },

    /// Emitted once the shrunk sampling region is known.
    RegionPrepared {
        index: usize,
        layer: String,
        /// Number of contours in the shrunk region.
        contours: usize,
        /// Bounds of the shrunk region, if anything is left.
        bounds: Option<Bounds>,
    },

    /// Emitted after sampling, before merging.
    SpotsSampled {
        index: usize,
        layer: String,
        /// Candidate positions drawn.
        attempts: usize,
        /// Triangles accepted.
        accepted: usize,
        /// Reference point for distance weighting.
        spark: Option<DVec2>,
    },

    /// Emitted when a layer was filtered successfully.
    LayerFinished {
        index: usize,
        report: FilterReport,
    },

    /// Emitted when a layer failed; the layer is left unmodified.
    LayerFailed {
        index: usize,
        layer: String,
        /// Human-readable diagnostic.
        message: String,
    },

    /// Non-fatal warning.
    Warning {
        /// Context string (e.g. layer name).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// A generic event sink that accepts [`FilterEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: FilterEvent);
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: FilterEvent) {}
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(FilterEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(FilterEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(FilterEvent),
{
    #[inline]
    fn send(&mut self, event: FilterEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<FilterEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn into_inner(self) -> Vec<FilterEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[FilterEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: FilterEvent) {
        self.events.push(event);
    }
}
