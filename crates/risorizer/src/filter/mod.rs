//! The per-layer filter pipeline.
//!
//! - [`config`]: immutable parameters and their parsing from host key/value overrides
//! - [`ops`]: the outline capability (offset, overlap removal, direction) and its polygon implementation
//! - [`region`]: preparing the shrunk sampling region
//! - [`compositor`]: appending spots to the original outline
//! - [`runner`]: applying the filter to one or many layers and reporting outcomes
//! - [`events`]: observing filter runs
pub mod compositor;
pub mod config;
pub mod events;
pub mod ops;
pub mod region;
pub mod runner;

/// Scale from the user-facing density value to spots per square unit.
pub const DENSITY_SCALE: f64 = 1e-4;

/// The region is shrunk by this multiple of the configured inset.
pub const INSET_FACTOR: f64 = 2.0;
