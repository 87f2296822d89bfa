use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};
use tracing::warn;

#[cfg(feature = "parallel-projection")]
use rayon::prelude::*;

use crate::core::types::Point;

// Sweeps within this distance of a full turn get the wrap-around gap.
const FULL_CIRCLE_EPSILON: f64 = 1e-9;

/// Angular and radial geometry of one pie/donut slice.
///
/// Angles are in radians, measured the same way as the input degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub start_angle: f64,
    pub end_angle: f64,
    pub padding: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
    /// Position of the source value in the input slice.
    pub index: usize,
    /// Absolute magnitude of the source value.
    pub value: f64,
}

impl Arc {
    /// Signed angular extent (`end_angle - start_angle`).
    #[must_use]
    pub fn sweep(self) -> f64 {
        self.end_angle - self.start_angle
    }

    /// Point halfway along the slice, between the two radii.
    ///
    /// Angle zero points up (12 o'clock) and angles grow clockwise.
    #[must_use]
    pub fn centroid(self, center: Point) -> Point {
        let angle = (self.start_angle + self.end_angle) / 2.0;
        let radius = (self.inner_radius + self.outer_radius) / 2.0;
        polar_to_cartesian(center, radius, angle)
    }
}

/// Converts a polar coordinate (zero angle at 12 o'clock, clockwise) to pixels.
#[must_use]
pub fn polar_to_cartesian(center: Point, radius: f64, angle: f64) -> Point {
    Point::new(center.x + radius * angle.sin(), center.y - radius * angle.cos())
}

/// Splits the `[start_angle_degrees, end_angle_degrees]` sweep into one slice per value.
///
/// Slices are proportional to `|value| / sum(|values|)` after
/// `padding_angle_degrees` is removed between adjacent slices (and between
/// the last and first slice when the sweep is a full circle). A single value
/// always covers the whole sweep.
#[must_use]
pub fn calculate_arc_data(
    values: &[f64],
    inner_radius: f64,
    outer_radius: f64,
    start_angle_degrees: f64,
    end_angle_degrees: f64,
    padding_angle_degrees: f64,
) -> Vec<Arc> {
    if values.is_empty() {
        return Vec::new();
    }

    let start_angle = start_angle_degrees.to_radians();
    let sweep = (end_angle_degrees - start_angle_degrees).to_radians();
    let magnitude = |value: f64| if value.is_finite() { value.abs() } else { 0.0 };

    if values.len() == 1 {
        return vec![Arc {
            start_angle,
            end_angle: start_angle + sweep,
            padding: 0.0,
            inner_radius,
            outer_radius,
            index: 0,
            value: magnitude(values[0]),
        }];
    }

    let direction = if sweep < 0.0 { -1.0 } else { 1.0 };
    let sweep_abs = sweep.abs();
    let is_full_circle = (sweep_abs - TAU).abs() <= FULL_CIRCLE_EPSILON;
    let gaps = if is_full_circle {
        values.len()
    } else {
        values.len() - 1
    };

    let requested_padding = padding_angle_degrees.to_radians().abs();
    let requested_padding = if requested_padding.is_finite() {
        requested_padding
    } else {
        0.0
    };
    let padding = if requested_padding * gaps as f64 > sweep_abs {
        let shrunk = sweep_abs / gaps as f64;
        warn!(
            requested = requested_padding,
            shrunk, "arc padding exceeds sweep; shrinking padding"
        );
        shrunk
    } else {
        requested_padding
    };

    let available = sweep_abs - padding * gaps as f64;
    // Shares are taken over magnitudes scaled by the largest one so the sum stays finite.
    let largest = values.iter().map(|v| magnitude(*v)).fold(0.0, f64::max);
    let scaled = |value: f64| if largest > 0.0 { value / largest } else { 0.0 };
    let total: f64 = values.iter().map(|v| scaled(magnitude(*v))).sum();

    let mut cursor = start_angle;
    let mut arcs = Vec::with_capacity(values.len());
    for (index, raw) in values.iter().enumerate() {
        let value = magnitude(*raw);
        let share = if total > 0.0 { scaled(value) / total } else { 0.0 };
        let end_angle = cursor + direction * share * available;
        arcs.push(Arc {
            start_angle: cursor,
            end_angle,
            padding,
            inner_radius,
            outer_radius,
            index,
            value,
        });
        cursor = end_angle + direction * padding;
    }
    arcs
}

/// One polar series for [`calculate_arc_series`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcSeriesInput {
    pub values: Vec<f64>,
    pub inner_radius: f64,
    pub outer_radius: f64,
    #[serde(default)]
    pub start_angle_degrees: f64,
    #[serde(default = "default_end_angle_degrees")]
    pub end_angle_degrees: f64,
    #[serde(default)]
    pub padding_angle_degrees: f64,
}

fn default_end_angle_degrees() -> f64 {
    360.0
}

impl ArcSeriesInput {
    #[must_use]
    pub fn new(values: Vec<f64>, inner_radius: f64, outer_radius: f64) -> Self {
        Self {
            values,
            inner_radius,
            outer_radius,
            start_angle_degrees: 0.0,
            end_angle_degrees: default_end_angle_degrees(),
            padding_angle_degrees: 0.0,
        }
    }

    #[must_use]
    pub fn with_angles(mut self, start_degrees: f64, end_degrees: f64) -> Self {
        self.start_angle_degrees = start_degrees;
        self.end_angle_degrees = end_degrees;
        self
    }

    #[must_use]
    pub fn with_padding_degrees(mut self, padding_degrees: f64) -> Self {
        self.padding_angle_degrees = padding_degrees;
        self
    }

    fn arcs(&self) -> Vec<Arc> {
        calculate_arc_data(
            &self.values,
            self.inner_radius,
            self.outer_radius,
            self.start_angle_degrees,
            self.end_angle_degrees,
            self.padding_angle_degrees,
        )
    }
}

/// Computes arcs for several independent series, in input order.
pub fn calculate_arc_series(series: &[ArcSeriesInput]) -> Vec<Vec<Arc>> {
    // Series do not share state, so they can fan out across threads.
    #[cfg(feature = "parallel-projection")]
    {
        series.par_iter().map(ArcSeriesInput::arcs).collect()
    }

    #[cfg(not(feature = "parallel-projection"))]
    {
        series.iter().map(ArcSeriesInput::arcs).collect()
    }
}
