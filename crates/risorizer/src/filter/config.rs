//! Filter configuration.
//!
//! [`RisoConfig`] is an immutable parameter set passed into each run. It can be built directly,
//! from host key/value overrides ([`RisoConfig::from_parameters`]), or from an export custom
//! parameter string ([`RisoConfig::from_custom_parameter`]).
use std::collections::HashSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::filter::DENSITY_SCALE;
use crate::sampling::{Distribution, SpotSampler};

/// Filter name leading the custom parameter string.
pub const FILTER_NAME: &str = "Risorizer";

pub const DEFAULT_SIZE: f64 = 15.0;
pub const DEFAULT_DENSITY: f64 = 2.0;
pub const DEFAULT_INSET: f64 = 15.0;
pub const DEFAULT_VARIANCE: f64 = 0.5;

const KEY_SIZE: &str = "size";
const KEY_DENSITY: &str = "density";
const KEY_INSET: &str = "inset";
const KEY_VARIANCE: &str = "variance";
const KEY_DISTRIBUTE: &str = "distribute";
const KEY_ROUND: &str = "round";

/// Where parameter values come from. Controls how loudly fallbacks are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterSource {
    /// Stored preferences of an interactive session; every key is expected.
    Interactive,
    /// Export-time overrides; missing keys are normal.
    Export,
}

/// Parameters of one filter run.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct RisoConfig {
    /// Mean triangle leg length in font units.
    pub size: f64,
    /// Spot density in user units; multiplied by [`DENSITY_SCALE`] when sampling.
    pub density: f64,
    /// Inset from the outline; the sampling region is shrunk by twice this value.
    pub inset: f64,
    /// Relative jitter of triangle legs in [0, 1].
    pub variance: f64,
    /// Distance weighting around the spark point.
    pub distribution: Distribution,
    /// Snap the composited outline to the integer grid.
    pub round_to_grid: bool,
}

impl Default for RisoConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            density: DEFAULT_DENSITY,
            inset: DEFAULT_INSET,
            variance: DEFAULT_VARIANCE,
            distribution: Distribution::None,
            round_to_grid: false,
        }
    }
}

impl RisoConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn with_density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }

    pub fn with_inset(mut self, inset: f64) -> Self {
        self.inset = inset;
        self
    }

    pub fn with_variance(mut self, variance: f64) -> Self {
        self.variance = variance;
        self
    }

    pub fn with_distribution(mut self, distribution: Distribution) -> Self {
        self.distribution = distribution;
        self
    }

    pub fn with_round_to_grid(mut self, round: bool) -> Self {
        self.round_to_grid = round;
        self
    }

    /// Spots per square unit used by the sampler.
    pub fn effective_density(&self) -> f64 {
        self.density * DENSITY_SCALE
    }

    /// Sampler configured from these parameters.
    pub fn sampler(&self) -> SpotSampler {
        SpotSampler::new(self.effective_density(), self.size, self.variance)
            .with_distribution(self.distribution)
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if !self.size.is_finite() || self.size < 0.0 {
            return Err(Error::InvalidConfig(
                "size must be finite and >= 0".into(),
            ));
        }
        if !self.density.is_finite() || self.density < 0.0 {
            return Err(Error::InvalidConfig(
                "density must be finite and >= 0".into(),
            ));
        }
        if !self.inset.is_finite() {
            return Err(Error::InvalidConfig("inset must be finite".into()));
        }
        if !self.variance.is_finite() || !(0.0..=1.0).contains(&self.variance) {
            return Err(Error::InvalidConfig("variance must be in [0, 1]".into()));
        }
        Ok(())
    }

    /// Build a configuration from host key/value pairs.
    ///
    /// Recognized keys are `size`, `density`, `inset`, `variance`, `distribute`, and `round`.
    /// Missing or unparsable values keep their defaults. Fallbacks are logged as warnings for
    /// interactive sources and at debug level for export overrides.
    pub fn from_parameters<I, K, V>(params: I, source: ParameterSource) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();
        let mut seen: HashSet<&'static str> = HashSet::new();

        for (key, value) in params {
            let key = key.as_ref().trim();
            let value = value.as_ref().trim();
            let applied = match key {
                KEY_SIZE => parse_float(key, value).map(|v| config.size = v.abs()),
                KEY_DENSITY => parse_float(key, value).map(|v| config.density = v.max(0.0)),
                KEY_INSET => parse_float(key, value).map(|v| config.inset = v),
                KEY_VARIANCE => {
                    parse_float(key, value).map(|v| config.variance = v.clamp(0.0, 1.0))
                }
                KEY_DISTRIBUTE => parse_distribution(value).map(|d| config.distribution = d),
                KEY_ROUND => parse_flag(key, value).map(|r| config.round_to_grid = r),
                other => {
                    debug!("Ignoring unknown parameter '{}'.", other);
                    continue;
                }
            };
            match applied {
                Ok(()) => {
                    if let Some(k) = known_key(key) {
                        seen.insert(k);
                    }
                }
                Err(e) => report_fallback(source, &format!("{e}; using default")),
            }
        }

        if source == ParameterSource::Interactive {
            for key in [KEY_SIZE, KEY_DENSITY, KEY_INSET] {
                if !seen.contains(key) {
                    report_fallback(
                        source,
                        &format!("missing parameter '{key}'; using default"),
                    );
                }
            }
        }

        config
    }

    /// Parse an export custom parameter string such as
    /// `"Risorizer; size:15; density:2; inset:15"`.
    ///
    /// A leading filter name is skipped. Segments without a `key:value` shape are ignored.
    pub fn from_custom_parameter(text: &str) -> Self {
        let pairs = text.split(';').filter_map(|segment| {
            let segment = segment.trim();
            if segment.is_empty() || segment == FILTER_NAME {
                return None;
            }
            match segment.split_once(':') {
                Some((k, v)) => Some((k.trim().to_owned(), v.trim().to_owned())),
                None => {
                    debug!("Ignoring custom parameter segment '{}'.", segment);
                    None
                }
            }
        });
        Self::from_parameters(pairs, ParameterSource::Export)
    }

    /// Generate the export custom parameter string for this configuration.
    pub fn to_custom_parameter(&self) -> String {
        let mut out = format!(
            "{FILTER_NAME}; {KEY_SIZE}:{}; {KEY_DENSITY}:{}; {KEY_INSET}:{}; {KEY_VARIANCE}:{}; {KEY_DISTRIBUTE}:{}",
            self.size,
            self.density,
            self.inset,
            self.variance,
            self.distribution.index()
        );
        if self.round_to_grid {
            out.push_str(&format!("; {KEY_ROUND}:1"));
        }
        out
    }
}

fn known_key(key: &str) -> Option<&'static str> {
    [
        KEY_SIZE,
        KEY_DENSITY,
        KEY_INSET,
        KEY_VARIANCE,
        KEY_DISTRIBUTE,
        KEY_ROUND,
    ]
    .into_iter()
    .find(|k| *k == key)
}

fn invalid(key: &str, value: &str) -> Error {
    Error::InvalidParameter {
        key: key.to_owned(),
        value: value.to_owned(),
    }
}

fn parse_float(key: &str, value: &str) -> Result<f64> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| invalid(key, value))
}

fn parse_distribution(value: &str) -> Result<Distribution> {
    let index = value
        .parse::<f64>()
        .ok()
        .filter(|v| v.fract() == 0.0)
        .ok_or_else(|| invalid(KEY_DISTRIBUTE, value))?;
    Distribution::from_index(index as i64).ok_or_else(|| invalid(KEY_DISTRIBUTE, value))
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(invalid(key, value)),
    }
}

fn report_fallback(source: ParameterSource, message: &str) {
    match source {
        ParameterSource::Interactive => warn!("{}", message),
        ParameterSource::Export => debug!("{}", message),
    }
}
