use std::fmt;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::scale::{BandAnchor, Scale, ScaleKind};

/// Tick count used when neither a count nor an interval is requested.
pub const DEFAULT_TICK_COUNT: usize = 5;

// Upper bound on generated ticks so extreme step constraints stay cheap.
const MAX_GENERATED_TICKS: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub value: f64,
    pub position: f64,
}

/// Filter applied to `(value, candidate_index)` pairs.
pub type TickPredicate = Box<dyn Fn(f64, usize) -> bool + Send + Sync>;

/// Where tick values come from.
#[derive(Default)]
pub enum TickSource {
    /// Generate values from the scale and the count/interval request.
    #[default]
    Auto,
    /// Use these values as-is (out-of-domain values are kept).
    Explicit(Vec<f64>),
    /// Keep candidate values accepted by the predicate.
    Predicate(TickPredicate),
}

impl fmt::Debug for TickSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("Auto"),
            Self::Explicit(values) => f.debug_tuple("Explicit").field(values).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Tick generation request.
///
/// Priority is explicit ticks, then `requested_count`, then `interval_px`,
/// then [`DEFAULT_TICK_COUNT`].
#[derive(Debug, Default)]
pub struct TickRequest {
    pub source: TickSource,
    pub requested_count: Option<usize>,
    /// Desired pixel distance between ticks.
    pub interval_px: Option<f64>,
    /// Smallest step between ticks, in data units (categories for band scales).
    pub min_step: Option<f64>,
    /// Largest step between ticks, in data units (categories for band scales).
    pub max_step: Option<f64>,
    pub anchor: BandAnchor,
}

impl TickRequest {
    #[must_use]
    pub fn explicit(values: impl Into<Vec<f64>>) -> Self {
        Self {
            source: TickSource::Explicit(values.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn filtered(predicate: impl Fn(f64, usize) -> bool + Send + Sync + 'static) -> Self {
        Self {
            source: TickSource::Predicate(Box::new(predicate)),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_count(mut self, count: usize) -> Self {
        self.requested_count = Some(count);
        self
    }

    #[must_use]
    pub fn with_interval_px(mut self, interval_px: f64) -> Self {
        self.interval_px = Some(interval_px);
        self
    }

    #[must_use]
    pub fn with_step_bounds(mut self, min_step: Option<f64>, max_step: Option<f64>) -> Self {
        self.min_step = min_step;
        self.max_step = max_step;
        self
    }

    #[must_use]
    pub fn with_anchor(mut self, anchor: BandAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    fn target_count(&self, scale: &Scale) -> usize {
        if let Some(count) = self.requested_count {
            return count;
        }
        if let Some(interval) = self.interval_px.filter(|v| v.is_finite() && *v > 0.0) {
            let (start, end) = scale.range();
            let available = (end - start).abs();
            return ((available / interval).floor() as usize).max(1);
        }
        DEFAULT_TICK_COUNT
    }

    fn step_bounds(&self) -> (Option<f64>, Option<f64>) {
        let valid = |v: &f64| v.is_finite() && *v > 0.0;
        let min_step = self.min_step.filter(valid);
        let max_step = self.max_step.filter(valid);
        match (min_step, max_step) {
            (Some(min), Some(max)) if min > max => (Some(max), Some(max)),
            bounds => bounds,
        }
    }
}

/// Generates ticks for `scale`, ascending in data order.
#[must_use]
pub fn generate_ticks(scale: &Scale, request: &TickRequest) -> Vec<Tick> {
    let values = match &request.source {
        TickSource::Explicit(values) => {
            let mut values: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
            values.sort_by_key(|v| OrderedFloat(*v));
            values.dedup();
            values
        }
        TickSource::Predicate(predicate) => match scale.kind() {
            ScaleKind::Band => {
                let (min_index, _) = scale.domain();
                let count = scale.category_count().unwrap_or(0);
                (0..count)
                    .map(|index| (min_index + index as f64, index))
                    .filter(|(value, index)| predicate(*value, *index))
                    .map(|(value, _)| value)
                    .collect()
            }
            ScaleKind::Linear | ScaleKind::Log => auto_values(scale, request)
                .into_iter()
                .enumerate()
                .filter(|(index, value)| predicate(*value, *index))
                .map(|(_, value)| value)
                .collect(),
        },
        TickSource::Auto => auto_values(scale, request),
    };

    trace!(kind = ?scale.kind(), count = values.len(), "generated tick values");
    values
        .into_iter()
        .map(|value| Tick {
            value,
            position: scale.evaluate_anchored(value, request.anchor),
        })
        .collect()
}

/// Synthetic tick closing the last band slot, for callers placing ticks on edges.
///
/// Its value is the index one past the domain end and its position is the
/// step end of the last category. Continuous scales return `None`.
#[must_use]
pub fn closing_edge_tick(scale: &Scale) -> Option<Tick> {
    if scale.kind() != ScaleKind::Band {
        return None;
    }
    let (_, max_index) = scale.domain();
    Some(Tick {
        value: max_index + 1.0,
        position: scale.evaluate_anchored(max_index, BandAnchor::StepEnd),
    })
}

/// Drops ticks whose positions are closer than `min_spacing_px` to the previous kept tick.
///
/// The tick at the far end is preferred over its predecessor so both axis
/// extremes stay labeled whenever there is room for two labels.
#[must_use]
pub fn thin_ticks_by_spacing(ticks: &[Tick], min_spacing_px: f64) -> Vec<Tick> {
    let mut sorted = ticks.to_vec();
    sorted.sort_by_key(|tick| OrderedFloat(tick.position));
    if sorted.len() < 2 || !min_spacing_px.is_finite() || min_spacing_px <= 0.0 {
        sorted.sort_by_key(|tick| OrderedFloat(tick.value));
        return sorted;
    }

    let mut selected: Vec<Tick> = Vec::with_capacity(sorted.len());
    for tick in &sorted {
        match selected.last() {
            Some(last) if tick.position - last.position < min_spacing_px => {}
            _ => selected.push(*tick),
        }
    }

    if let (Some(&last_tick), Some(&selected_last)) = (sorted.last(), selected.last()) {
        if selected_last != last_tick {
            if selected.len() == 1 {
                // A single label on a cramped axis reads better than two overlapping ones.
                selected[0] = last_tick;
            } else {
                let penultimate = selected[selected.len() - 2];
                if last_tick.position - penultimate.position >= min_spacing_px {
                    let last_index = selected.len() - 1;
                    selected[last_index] = last_tick;
                }
            }
        }
    }

    selected.sort_by_key(|tick| OrderedFloat(tick.value));
    selected
}

fn auto_values(scale: &Scale, request: &TickRequest) -> Vec<f64> {
    let count = request.target_count(scale);
    if count == 0 {
        return Vec::new();
    }
    let (min_step, max_step) = request.step_bounds();
    let (start, end) = scale.domain();
    match scale.kind() {
        ScaleKind::Linear => linear_ticks(start.min(end), start.max(end), count, min_step, max_step),
        ScaleKind::Log => log_ladder_ticks(start.min(end), start.max(end), count),
        ScaleKind::Band => {
            let categories = scale.category_count().unwrap_or(0);
            band_ticks(start, categories, count, min_step, max_step)
        }
    }
}

fn linear_ticks(
    min: f64,
    max: f64,
    count: usize,
    min_step: Option<f64>,
    max_step: Option<f64>,
) -> Vec<f64> {
    if min == max {
        return vec![min];
    }

    let span = max - min;
    let (mut step, mut inverse) = if span.is_finite() {
        nice_step(span, count)
    } else {
        // Span overflows f64: step over half the span in half the intervals.
        nice_step(max / 2.0 - min / 2.0, count.div_ceil(2))
    };
    if let Some(min_step) = min_step.filter(|bound| step < *bound) {
        step = min_step;
        inverse = None;
    }
    if let Some(max_step) = max_step.filter(|bound| step > *bound) {
        step = max_step;
        inverse = None;
    }
    let cap = MAX_GENERATED_TICKS as f64;
    if max / step - min / step > cap {
        step = max / cap - min / cap;
        inverse = None;
    }

    // Indices are computed against the inverse when it is integral to avoid
    // accumulating error on steps like 0.1.
    let (first, last) = match inverse {
        Some(inv) => ((min * inv).ceil() as i64, (max * inv).floor() as i64),
        None => ((min / step).ceil() as i64, (max / step).floor() as i64),
    };
    (first..=last)
        .map(|i| match inverse {
            Some(inv) => i as f64 / inv,
            None => i as f64 * step,
        })
        .collect()
}

/// Returns a 1/2/5 x 10^k step covering `span` in about `count` intervals,
/// plus the integral inverse of the step when it is below one.
fn nice_step(span: f64, count: usize) -> (f64, Option<f64>) {
    let raw = span / count.max(1) as f64;
    let power = raw.log10().floor();
    let error = raw / 10_f64.powf(power);
    let factor = if error >= 50_f64.sqrt() {
        10.0
    } else if error >= 10_f64.sqrt() {
        5.0
    } else if error >= 2_f64.sqrt() {
        2.0
    } else {
        1.0
    };
    if power >= 0.0 {
        (factor * 10_f64.powf(power), None)
    } else {
        let inverse = 10_f64.powf(-power) / factor;
        (1.0 / inverse, (inverse.fract() == 0.0).then_some(inverse))
    }
}

fn band_ticks(
    min_index: f64,
    categories: usize,
    count: usize,
    min_step: Option<f64>,
    max_step: Option<f64>,
) -> Vec<f64> {
    if categories == 0 {
        return Vec::new();
    }
    let mut stride = categories.div_ceil(count).max(1);
    if let Some(min_step) = min_step {
        stride = stride.max(min_step.ceil() as usize);
    }
    if let Some(max_step) = max_step {
        stride = stride.min((max_step.floor() as usize).max(1));
    }
    (0..categories)
        .step_by(stride)
        .map(|index| min_index + index as f64)
        .collect()
}

fn log_ladder_ticks(min: f64, max: f64, count: usize) -> Vec<f64> {
    let min_exp = min.log10().floor() as i32;
    let max_exp = max.log10().ceil() as i32;

    let mut ticks = Vec::new();
    for exp in min_exp..=max_exp {
        let decade = 10_f64.powi(exp);
        for multiplier in [1.0, 2.0, 5.0] {
            let candidate = decade * multiplier;
            if candidate >= min && candidate <= max {
                ticks.push(candidate);
            }
        }
    }
    if !ticks.iter().any(|value| approx_equal(*value, min)) {
        ticks.push(min);
    }
    if !ticks.iter().any(|value| approx_equal(*value, max)) {
        ticks.push(max);
    }

    ticks.sort_by_key(|v| OrderedFloat(*v));
    ticks.dedup_by(|lhs, rhs| approx_equal(*lhs, *rhs));
    evenly_sample(ticks, count)
}

fn evenly_sample(ticks: Vec<f64>, target: usize) -> Vec<f64> {
    if ticks.len() <= target || target == 0 {
        return ticks;
    }
    if target == 1 {
        return vec![ticks[0]];
    }

    let last_index = ticks.len() - 1;
    let mut sampled: Vec<f64> = Vec::with_capacity(target);
    for step in 0..target {
        let ratio = step as f64 / (target - 1) as f64;
        let index = ((ratio * last_index as f64).round() as usize).min(last_index);
        let value = ticks[index];
        if sampled.last().is_some_and(|prev| approx_equal(*prev, value)) {
            continue;
        }
        sampled.push(value);
    }
    sampled
}

fn approx_equal(lhs: f64, rhs: f64) -> bool {
    let scale = lhs.abs().max(rhs.abs()).max(1.0);
    (lhs - rhs).abs() <= scale * 1e-12
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nice_step_prefers_integral_inverse_for_fractions() {
        let (step, inverse) = nice_step(1.0, 5);
        assert!((step - 0.2).abs() <= 1e-12);
        assert_eq!(inverse, Some(5.0));
    }

    #[test]
    fn linear_ticks_land_on_round_values() {
        let ticks = linear_ticks(0.0, 1.0, 5, None, None);
        assert_eq!(ticks, vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
    }

    #[test]
    fn linear_ticks_survive_overflowing_span() {
        let ticks = linear_ticks(-1e308, 1e308, 5, None, None);
        assert!(ticks.len() >= 3);
        assert!(ticks.contains(&0.0));
        assert!(ticks.iter().all(|value| value.is_finite()));
    }

    #[test]
    fn log_ladder_is_sampled_to_target() {
        let ticks = log_ladder_ticks(1.0, 10_000.0, 4);
        assert_eq!(ticks.len(), 4);
        assert_eq!(ticks.first().copied(), Some(1.0));
        assert_eq!(ticks.last().copied(), Some(10_000.0));
    }
}
