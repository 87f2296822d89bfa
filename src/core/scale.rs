use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::serializable_scale::{SERIALIZABLE_SCALE_VERSION, SerializableScale};
use crate::error::{ChartError, ChartResult};

/// Floor used by log scales for non-positive inputs and zero domain bounds.
pub const LOG_EPSILON: f64 = 1e-6;

/// Mapping family of a [`Scale`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ScaleKind {
    /// Uniform spacing in data units.
    #[default]
    Linear,
    /// Uniform spacing in log-space (domain must not cross zero).
    Log,
    /// Categorical slots over an inclusive integer index domain.
    Band,
}

/// Position inside a band slot used when evaluating band scales.
///
/// `StepStart`/`StepEnd` are the slot edges including padding, while
/// `BandStart`/`BandEnd` are the edges of the drawn band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum BandAnchor {
    StepStart,
    BandStart,
    #[default]
    Middle,
    BandEnd,
    StepEnd,
}

/// Construction options for [`Scale::build`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleOptions {
    /// Share of each band step left empty, in `[0, 1)`. Ignored by continuous scales.
    #[serde(default)]
    pub band_padding: f64,
}

impl Default for ScaleOptions {
    fn default() -> Self {
        Self { band_padding: 0.0 }
    }
}

impl ScaleOptions {
    #[must_use]
    pub fn with_band_padding(mut self, band_padding: f64) -> Self {
        self.band_padding = band_padding;
        self
    }

    fn validate(self) -> ChartResult<Self> {
        if !self.band_padding.is_finite() || !(0.0..1.0).contains(&self.band_padding) {
            return Err(ChartError::InvalidData(
                "band padding must be finite and within [0, 1)".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Immutable domain <-> range mapping.
///
/// A scale is rebuilt whenever its inputs change; use [`Scale::to_serializable`]
/// to hand a plain snapshot to a per-frame rendering context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    kind: ScaleKind,
    domain: (f64, f64),
    range: (f64, f64),
    step: f64,
    bandwidth: f64,
}

impl Scale {
    /// Builds and validates a scale.
    pub fn build(
        kind: ScaleKind,
        domain: (f64, f64),
        range: (f64, f64),
        options: ScaleOptions,
    ) -> ChartResult<Self> {
        let options = options.validate()?;
        if !domain.0.is_finite() || !domain.1.is_finite() {
            return Err(ChartError::invalid_domain("domain bounds must be finite"));
        }
        if !range.0.is_finite() || !range.1.is_finite() {
            return Err(ChartError::invalid_domain("range bounds must be finite"));
        }

        let scale = match kind {
            ScaleKind::Linear => Self {
                kind,
                domain,
                range,
                step: 0.0,
                bandwidth: 0.0,
            },
            ScaleKind::Log => Self {
                kind,
                domain: resolve_log_domain(domain)?,
                range,
                step: 0.0,
                bandwidth: 0.0,
            },
            ScaleKind::Band => {
                let count = band_category_count(domain)?;
                let step = (range.1 - range.0).abs() / count as f64;
                Self {
                    kind,
                    domain,
                    range,
                    step,
                    bandwidth: step * (1.0 - options.band_padding),
                }
            }
        };

        debug!(
            kind = ?scale.kind,
            domain_start = scale.domain.0,
            domain_end = scale.domain.1,
            range_start = scale.range.0,
            range_end = scale.range.1,
            "built scale"
        );
        Ok(scale)
    }

    pub fn linear(domain: (f64, f64), range: (f64, f64)) -> ChartResult<Self> {
        Self::build(ScaleKind::Linear, domain, range, ScaleOptions::default())
    }

    pub fn log(domain: (f64, f64), range: (f64, f64)) -> ChartResult<Self> {
        Self::build(ScaleKind::Log, domain, range, ScaleOptions::default())
    }

    /// Band scale over `category_count` categories indexed from zero.
    pub fn band(category_count: usize, range: (f64, f64), band_padding: f64) -> ChartResult<Self> {
        if category_count == 0 {
            return Err(ChartError::invalid_domain(
                "band scale requires at least one category",
            ));
        }
        Self::build(
            ScaleKind::Band,
            (0.0, (category_count - 1) as f64),
            range,
            ScaleOptions::default().with_band_padding(band_padding),
        )
    }

    /// Rebuilds a scale from a snapshot, re-validating every field.
    pub fn from_serializable(record: SerializableScale) -> ChartResult<Self> {
        if record.version != SERIALIZABLE_SCALE_VERSION {
            return Err(ChartError::InvalidData(format!(
                "unsupported serializable scale version: {}",
                record.version
            )));
        }
        let band_padding = match (record.kind, record.step) {
            (ScaleKind::Band, Some(step)) if step > 0.0 => {
                let bandwidth = record.bandwidth.unwrap_or(step);
                (1.0 - bandwidth / step).clamp(0.0, 1.0)
            }
            _ => 0.0,
        };
        Self::build(
            record.kind,
            (record.domain[0], record.domain[1]),
            (record.range[0], record.range[1]),
            ScaleOptions::default().with_band_padding(band_padding),
        )
    }

    #[must_use]
    pub fn kind(self) -> ScaleKind {
        self.kind
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        self.domain
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        self.range
    }

    /// Band step in pixels (`None` for continuous scales).
    #[must_use]
    pub fn step(self) -> Option<f64> {
        (self.kind == ScaleKind::Band).then_some(self.step)
    }

    /// Band width in pixels (`None` for continuous scales).
    #[must_use]
    pub fn bandwidth(self) -> Option<f64> {
        (self.kind == ScaleKind::Band).then_some(self.bandwidth)
    }

    /// Number of categories of a band scale.
    #[must_use]
    pub fn category_count(self) -> Option<usize> {
        (self.kind == ScaleKind::Band).then(|| (self.domain.1 - self.domain.0) as usize + 1)
    }

    /// Maps a data value to a pixel coordinate (band scales use [`BandAnchor::Middle`]).
    #[must_use]
    pub fn evaluate(self, value: f64) -> f64 {
        self.evaluate_anchored(value, BandAnchor::Middle)
    }

    /// Maps a data value to a pixel coordinate using an explicit band anchor.
    ///
    /// Continuous scales ignore `anchor`. Band indices outside the domain
    /// evaluate to `0.0`.
    #[must_use]
    pub fn evaluate_anchored(self, value: f64, anchor: BandAnchor) -> f64 {
        match self.kind {
            ScaleKind::Linear => linear_evaluate(self.domain, self.range, value),
            ScaleKind::Log => log_evaluate(self.domain, self.range, value),
            ScaleKind::Band => {
                band_evaluate(self.domain, self.range, self.step, self.bandwidth, value, anchor)
            }
        }
    }

    /// Maps a pixel coordinate back into data space.
    #[must_use]
    pub fn invert(self, pixel: f64) -> f64 {
        match self.kind {
            ScaleKind::Linear => linear_invert(self.domain, self.range, pixel),
            ScaleKind::Log => log_invert(self.domain, self.range, pixel),
            ScaleKind::Band => band_invert(self.domain, self.range, self.step, pixel),
        }
    }

    /// Projects the scale into a plain snapshot without function references.
    #[must_use]
    pub fn to_serializable(self) -> SerializableScale {
        let is_band = self.kind == ScaleKind::Band;
        SerializableScale {
            version: SERIALIZABLE_SCALE_VERSION,
            kind: self.kind,
            domain: [self.domain.0, self.domain.1],
            range: [self.range.0, self.range.1],
            bandwidth: is_band.then_some(self.bandwidth),
            step: is_band.then_some(self.step),
        }
    }
}

fn resolve_log_domain(domain: (f64, f64)) -> ChartResult<(f64, f64)> {
    let (start, end) = domain;
    if (start < 0.0 && end > 0.0) || (start > 0.0 && end < 0.0) {
        return Err(ChartError::invalid_domain("log scale domain must not straddle zero"));
    }
    if start < 0.0 || end < 0.0 {
        return Err(ChartError::invalid_domain("log scale domain must be positive"));
    }
    let adjust = |bound: f64| if bound == 0.0 { LOG_EPSILON } else { bound };
    Ok((adjust(start), adjust(end)))
}

fn band_category_count(domain: (f64, f64)) -> ChartResult<usize> {
    let (min_index, max_index) = domain;
    if min_index.fract() != 0.0 || max_index.fract() != 0.0 {
        return Err(ChartError::invalid_domain(
            "band scale domain must hold integer category indices",
        ));
    }
    if min_index > max_index {
        return Err(ChartError::invalid_domain(
            "band scale domain must be ascending",
        ));
    }
    Ok((max_index - min_index) as usize + 1)
}

// Interpolates as `a * (1 - t) + b * t` so both endpoints are reproduced exactly.
fn mix(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

pub(crate) fn linear_evaluate(domain: (f64, f64), range: (f64, f64), value: f64) -> f64 {
    let span = domain.1 - domain.0;
    if span == 0.0 {
        return mix(range.0, range.1, 0.5);
    }
    let t = if span.is_finite() {
        (value - domain.0) / span
    } else {
        // Span overflows f64; halves keep the ratio finite.
        (value / 2.0 - domain.0 / 2.0) / (domain.1 / 2.0 - domain.0 / 2.0)
    };
    mix(range.0, range.1, t)
}

pub(crate) fn linear_invert(domain: (f64, f64), range: (f64, f64), pixel: f64) -> f64 {
    let span = range.1 - range.0;
    if span == 0.0 {
        return domain.0;
    }
    mix(domain.0, domain.1, (pixel - range.0) / span)
}

pub(crate) fn log_evaluate(domain: (f64, f64), range: (f64, f64), value: f64) -> f64 {
    let value = if value <= 0.0 { LOG_EPSILON } else { value };
    linear_evaluate((domain.0.ln(), domain.1.ln()), range, value.ln())
}

pub(crate) fn log_invert(domain: (f64, f64), range: (f64, f64), pixel: f64) -> f64 {
    let span = range.1 - range.0;
    if span == 0.0 {
        return domain.0;
    }
    let t = (pixel - range.0) / span;
    if t == 0.0 {
        return domain.0;
    }
    if t == 1.0 {
        return domain.1;
    }
    mix(domain.0.ln(), domain.1.ln(), t).exp()
}

fn range_direction(range: (f64, f64)) -> f64 {
    if range.1 < range.0 { -1.0 } else { 1.0 }
}

pub(crate) fn band_evaluate(
    domain: (f64, f64),
    range: (f64, f64),
    step: f64,
    bandwidth: f64,
    value: f64,
    anchor: BandAnchor,
) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let index = value.round();
    if index < domain.0 || index > domain.1 {
        return 0.0;
    }

    let direction = range_direction(range);
    let step_start = range.0 + direction * (index - domain.0) * step;
    let inset = (step - bandwidth) / 2.0;
    match anchor {
        BandAnchor::StepStart => step_start,
        BandAnchor::BandStart => step_start + direction * inset,
        BandAnchor::Middle => step_start + direction * step / 2.0,
        BandAnchor::BandEnd => step_start + direction * (step - inset),
        BandAnchor::StepEnd => step_start + direction * step,
    }
}

pub(crate) fn band_invert(domain: (f64, f64), range: (f64, f64), step: f64, pixel: f64) -> f64 {
    if step <= 0.0 || !pixel.is_finite() {
        return domain.0;
    }
    let offset = ((pixel - range.0) * range_direction(range) / step).floor();
    (domain.0 + offset).clamp(domain.0, domain.1)
}
