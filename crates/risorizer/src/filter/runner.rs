//! Applying the filter to glyph layers.
//!
//! [`filter_layer`] runs the pipeline on one layer and returns its report or the error that
//! stopped it; the layer is only modified on success. [`filter_layers`] drives a batch and keeps
//! going past failing layers, reporting a [`LayerOutcome`] per layer.
use glam::DVec2;
use rand::RngCore;
use tracing::{error, info, warn};

use crate::error::Result;
use crate::filter::compositor::composite;
use crate::filter::config::RisoConfig;
use crate::filter::events::{EventSink, FilterEvent};
use crate::filter::ops::{OutlineOps, PolygonOps};
use crate::filter::region::prepare_region;
use crate::geometry::Outline;

/// A named glyph layer owning its shape collection.
#[derive(Debug, Clone, Default)]
pub struct Layer {
    pub name: String,
    pub outline: Outline,
}

impl Layer {
    pub fn new(name: impl Into<String>, outline: Outline) -> Self {
        Self {
            name: name.into(),
            outline,
        }
    }
}

/// Summary of one successfully filtered layer.
#[non_exhaustive]
#[derive(Debug, Clone, Default)]
pub struct FilterReport {
    /// Name of the filtered layer.
    pub layer: String,
    /// Candidate positions drawn.
    pub attempts: usize,
    /// Triangles accepted before merging.
    pub spots: usize,
    /// Contours appended after merging.
    pub contours_added: usize,
    /// Reference point for distance weighting, if sampling ran.
    pub spark: Option<DVec2>,
}

/// Outcome of filtering one layer in a batch.
#[derive(Debug, Clone)]
pub enum LayerOutcome {
    Applied(FilterReport),
    Failed {
        /// Name of the layer that was left unmodified.
        layer: String,
        /// Diagnostic describing the failure.
        message: String,
    },
}

impl LayerOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, LayerOutcome::Applied(_))
    }
}

/// Filter a single layer in place.
///
/// On error the layer is left exactly as it was.
pub fn filter_layer<R: RngCore>(
    layer: &mut Layer,
    config: &RisoConfig,
    ops: &dyn OutlineOps,
    rng: &mut R,
    sink: Option<&mut dyn EventSink>,
) -> Result<FilterReport> {
    if let Some(s) = sink {
        filter_layer_internal(layer, config, ops, rng, s, 0)
    } else {
        filter_layer_internal(layer, config, ops, rng, &mut (), 0)
    }
}

/// Filter every layer, continuing past failures.
pub fn filter_layers<R: RngCore>(
    layers: &mut [Layer],
    config: &RisoConfig,
    ops: &dyn OutlineOps,
    rng: &mut R,
    sink: Option<&mut dyn EventSink>,
) -> Vec<LayerOutcome> {
    if let Some(s) = sink {
        filter_layers_with_events(layers, config, ops, rng, s)
    } else {
        filter_layers_with_events(layers, config, ops, rng, &mut ())
    }
}

fn filter_layers_with_events<R: RngCore>(
    layers: &mut [Layer],
    config: &RisoConfig,
    ops: &dyn OutlineOps,
    rng: &mut R,
    sink: &mut dyn EventSink,
) -> Vec<LayerOutcome> {
    let mut outcomes = Vec::with_capacity(layers.len());
    for (index, layer) in layers.iter_mut().enumerate() {
        match filter_layer_internal(layer, config, ops, rng, sink, index) {
            Ok(report) => outcomes.push(LayerOutcome::Applied(report)),
            Err(e) => outcomes.push(LayerOutcome::Failed {
                layer: layer.name.clone(),
                message: e.to_string(),
            }),
        }
    }
    let failed = outcomes.iter().filter(|o| !o.is_applied()).count();
    info!(
        "Filtered {} layers ({} failed).",
        outcomes.len(),
        failed
    );
    outcomes
}

fn filter_layer_internal<R: RngCore>(
    layer: &mut Layer,
    config: &RisoConfig,
    ops: &dyn OutlineOps,
    rng: &mut R,
    sink: &mut dyn EventSink,
    index: usize,
) -> Result<FilterReport> {
    sink.send(FilterEvent::LayerStarted {
        index,
        layer: layer.name.clone(),
    });

    match run_pipeline(layer, config, ops, rng, sink, index) {
        Ok((outline, report)) => {
            layer.outline = outline;
            sink.send(FilterEvent::LayerFinished {
                index,
                report: report.clone(),
            });
            Ok(report)
        }
        Err(e) => {
            error!("Risorizer failed on layer '{}': {}.", layer.name, e);
            sink.send(FilterEvent::LayerFailed {
                index,
                layer: layer.name.clone(),
                message: e.to_string(),
            });
            Err(e)
        }
    }
}

fn run_pipeline<R: RngCore>(
    layer: &Layer,
    config: &RisoConfig,
    ops: &dyn OutlineOps,
    rng: &mut R,
    sink: &mut dyn EventSink,
    index: usize,
) -> Result<(Outline, FilterReport)> {
    config.validate()?;

    let region = prepare_region(&layer.outline, config.inset, ops)?;
    sink.send(FilterEvent::RegionPrepared {
        index,
        layer: layer.name.clone(),
        contours: region.len(),
        bounds: region.bounds(),
    });

    let mut report = FilterReport {
        layer: layer.name.clone(),
        ..Default::default()
    };

    if region.is_empty() {
        warn!(
            "Layer '{}' has no area left after an inset of {}; no spots added.",
            layer.name, config.inset
        );
        sink.send(FilterEvent::Warning {
            context: format!("layer:{}", layer.name),
            message: "No area left after inset".into(),
        });
        let outline = composite(&layer.outline, &Outline::default(), config.round_to_grid, ops);
        return Ok((outline, report));
    }

    let spots = config.sampler().generate(&region, ops, rng)?;
    sink.send(FilterEvent::SpotsSampled {
        index,
        layer: layer.name.clone(),
        attempts: spots.attempts,
        accepted: spots.len(),
        spark: spots.spark,
    });

    let outline = composite(&layer.outline, &spots.merged, config.round_to_grid, ops);
    report.attempts = spots.attempts;
    report.spots = spots.len();
    report.contours_added = spots.merged.len();
    report.spark = spots.spark;
    Ok((outline, report))
}

/// The filter bound to a configuration and an outline capability.
pub struct Risorizer<O: OutlineOps = PolygonOps> {
    pub config: RisoConfig,
    pub ops: O,
}

impl Risorizer<PolygonOps> {
    /// Create a filter using [`PolygonOps`], validating the configuration.
    pub fn try_new(config: RisoConfig) -> Result<Self> {
        Self::try_with_ops(config, PolygonOps::default())
    }
}

impl<O: OutlineOps> Risorizer<O> {
    pub fn try_with_ops(config: RisoConfig, ops: O) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, ops })
    }

    /// Filter one layer with the thread-local generator.
    pub fn apply(&self, layer: &mut Layer) -> Result<FilterReport> {
        let mut rng = rand::rng();
        self.apply_with_rng(layer, &mut rng)
    }

    pub fn apply_with_rng<R: RngCore>(&self, layer: &mut Layer, rng: &mut R) -> Result<FilterReport> {
        filter_layer(layer, &self.config, &self.ops, rng, None)
    }

    /// Filter all layers with the thread-local generator, continuing past failures.
    pub fn apply_all(&self, layers: &mut [Layer]) -> Vec<LayerOutcome> {
        let mut rng = rand::rng();
        filter_layers(layers, &self.config, &self.ops, &mut rng, None)
    }

    pub fn apply_all_with_events<R: RngCore>(
        &self,
        layers: &mut [Layer],
        rng: &mut R,
        sink: &mut dyn EventSink,
    ) -> Vec<LayerOutcome> {
        filter_layers(layers, &self.config, &self.ops, rng, Some(sink))
    }
}
