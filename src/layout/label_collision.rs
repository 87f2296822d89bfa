use std::ops::Range;

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::Rect;
use crate::error::{ChartError, ChartResult};

// Tolerance for separation/bounds comparisons; keeps resolution a fixed point.
const EPSILON: f64 = 1e-9;

/// Horizontal side labels are attached to, relative to their anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum LabelSide {
    Left,
    #[default]
    Right,
}

/// Candidate label with its preferred anchor (vertical center at `preferred_y`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelBox {
    pub id: String,
    pub width: f64,
    pub height: f64,
    pub preferred_x: f64,
    pub preferred_y: f64,
}

impl LabelBox {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        width: f64,
        height: f64,
        preferred_x: f64,
        preferred_y: f64,
    ) -> Self {
        Self {
            id: id.into(),
            width,
            height,
            preferred_x,
            preferred_y,
        }
    }

    fn validate(&self) -> ChartResult<()> {
        if !self.width.is_finite() || !self.height.is_finite() {
            return Err(ChartError::InvalidData(format!(
                "label `{}` size must be finite",
                self.id
            )));
        }
        if self.width < 0.0 || self.height < 0.0 {
            return Err(ChartError::InvalidData(format!(
                "label `{}` size must be >= 0",
                self.id
            )));
        }
        if !self.preferred_x.is_finite() || !self.preferred_y.is_finite() {
            return Err(ChartError::InvalidData(format!(
                "label `{}` preferred position must be finite",
                self.id
            )));
        }
        Ok(())
    }
}

/// Resolved placement of one label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelAdjustment {
    /// Anchor x, clamped into the bounds.
    pub x: f64,
    /// Resolved vertical center.
    pub y: f64,
    pub side: LabelSide,
    /// Left edge of the label rectangle once attached on `side`.
    pub label_left: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelCollisionConfig {
    pub bounds: Rect,
    /// Minimum vertical gap between two labels.
    #[serde(default = "default_min_gap")]
    pub min_gap: f64,
    /// Horizontal distance between the anchor marker and the label.
    #[serde(default = "default_label_horizontal_inset")]
    pub label_horizontal_inset: f64,
    /// Radius of the anchor marker drawn at the preferred position.
    #[serde(default = "default_anchor_radius")]
    pub anchor_radius: f64,
    #[serde(default = "default_max_relaxation_passes")]
    pub max_relaxation_passes: usize,
}

fn default_min_gap() -> f64 {
    4.0
}

fn default_label_horizontal_inset() -> f64 {
    8.0
}

fn default_anchor_radius() -> f64 {
    4.0
}

fn default_max_relaxation_passes() -> usize {
    10
}

impl LabelCollisionConfig {
    #[must_use]
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            min_gap: default_min_gap(),
            label_horizontal_inset: default_label_horizontal_inset(),
            anchor_radius: default_anchor_radius(),
            max_relaxation_passes: default_max_relaxation_passes(),
        }
    }

    #[must_use]
    pub fn with_min_gap(mut self, min_gap: f64) -> Self {
        self.min_gap = min_gap;
        self
    }

    #[must_use]
    pub fn with_label_horizontal_inset(mut self, inset: f64) -> Self {
        self.label_horizontal_inset = inset;
        self
    }

    #[must_use]
    pub fn with_anchor_radius(mut self, anchor_radius: f64) -> Self {
        self.anchor_radius = anchor_radius;
        self
    }

    #[must_use]
    pub fn with_max_relaxation_passes(mut self, passes: usize) -> Self {
        self.max_relaxation_passes = passes;
        self
    }

    fn validate(self) -> ChartResult<Self> {
        if !self.bounds.is_valid() {
            return Err(ChartError::InvalidData(
                "label bounds must be finite with non-negative size".to_owned(),
            ));
        }
        for (value, name) in [
            (self.min_gap, "min_gap"),
            (self.label_horizontal_inset, "label_horizontal_inset"),
            (self.anchor_radius, "anchor_radius"),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "label config `{name}` must be finite and >= 0"
                )));
            }
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelResolution {
    pub side: LabelSide,
    /// Adjustments keyed by label id, in input order.
    pub adjustments: IndexMap<String, LabelAdjustment>,
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    index: usize,
    half_height: f64,
    y: f64,
    compressed: bool,
    // Connected group of the latest correction round.
    group: usize,
}

impl Slot {
    fn top(self) -> f64 {
        self.y - self.half_height
    }

    fn bottom(self) -> f64 {
        self.y + self.half_height
    }
}

fn required_separation(a: Slot, b: Slot, min_gap: f64) -> f64 {
    a.half_height + b.half_height + min_gap
}

/// Moves labels vertically so they stop overlapping and stay inside `config.bounds`.
///
/// All labels share one side: `Left` as soon as any label would overflow the
/// right edge when attached on the right. Vertical positions are relaxed
/// pairwise, grouped into connected clusters, and each cluster is shifted (or
/// compressed when taller than the bounds) into the bounding rectangle.
pub fn resolve_label_collisions(
    boxes: &[LabelBox],
    config: LabelCollisionConfig,
) -> ChartResult<LabelResolution> {
    let config = config.validate()?;
    if boxes.is_empty() {
        return Ok(LabelResolution {
            side: LabelSide::Right,
            adjustments: IndexMap::new(),
        });
    }
    for label in boxes {
        label.validate()?;
    }

    let bounds = config.bounds;
    let anchors_x: Vec<f64> = boxes
        .iter()
        .map(|label| label.preferred_x.clamp(bounds.x, bounds.right()))
        .collect();
    let attach_offset = config.anchor_radius + config.label_horizontal_inset;
    let overflows_right = boxes
        .iter()
        .zip(&anchors_x)
        .any(|(label, x)| x + attach_offset + label.width > bounds.right() + EPSILON);
    let side = if overflows_right {
        LabelSide::Left
    } else {
        LabelSide::Right
    };

    let mut slots: Vec<Slot> = boxes
        .iter()
        .enumerate()
        .map(|(index, label)| Slot {
            index,
            half_height: label.height / 2.0,
            y: label.preferred_y,
            compressed: false,
            group: 0,
        })
        .collect();
    sort_slots(&mut slots);

    relax(&mut slots, config.min_gap, config.max_relaxation_passes);
    correct_bounds(&mut slots, bounds, config.min_gap);

    let mut resolved_y = vec![0.0; boxes.len()];
    for slot in &slots {
        resolved_y[slot.index] = slot.y;
    }

    let mut adjustments = IndexMap::with_capacity(boxes.len());
    for ((label, x), y) in boxes.iter().zip(anchors_x).zip(resolved_y) {
        let label_left = match side {
            LabelSide::Right => x + attach_offset,
            LabelSide::Left => x - attach_offset - label.width,
        };
        let adjustment = LabelAdjustment {
            x,
            y,
            side,
            label_left,
        };
        if adjustments.insert(label.id.clone(), adjustment).is_some() {
            return Err(ChartError::InvalidData(format!(
                "duplicate label id `{}`",
                label.id
            )));
        }
    }

    debug!(count = boxes.len(), ?side, "resolved label collisions");
    Ok(LabelResolution { side, adjustments })
}

fn sort_slots(slots: &mut [Slot]) {
    slots.sort_by(|a, b| {
        OrderedFloat(a.y)
            .cmp(&OrderedFloat(b.y))
            .then_with(|| a.index.cmp(&b.index))
    });
}

/// Pushes overlapping neighbours apart by half the deficit each, for at most `max_passes`.
fn relax(slots: &mut [Slot], min_gap: f64, max_passes: usize) {
    for pass in 0..max_passes {
        let mut violations = 0usize;
        for i in 1..slots.len() {
            let (upper, lower) = (slots[i - 1], slots[i]);
            let required = required_separation(upper, lower, min_gap);
            let separation = lower.y - upper.y;
            if separation + EPSILON < required {
                let half_deficit = (required - separation) / 2.0;
                slots[i - 1].y -= half_deficit;
                slots[i].y += half_deficit;
                violations += 1;
            }
        }
        trace!(pass, violations, "label relaxation pass");
        if violations == 0 {
            break;
        }
        sort_slots(slots);
    }
}

/// Splits sorted slots into runs whose neighbours are close enough to interact.
fn connected_groups(slots: &[Slot], min_gap: f64) -> Vec<Range<usize>> {
    let mut groups = Vec::new();
    let mut start = 0;
    for i in 1..slots.len() {
        let (upper, lower) = (slots[i - 1], slots[i]);
        let threshold = upper.half_height + lower.half_height + 2.0 * min_gap;
        if lower.y - upper.y > threshold + EPSILON {
            groups.push(start..i);
            start = i;
        }
    }
    if !slots.is_empty() {
        groups.push(start..slots.len());
    }
    groups
}

fn correct_bounds(slots: &mut [Slot], bounds: Rect, min_gap: f64) {
    // Every round without a clean result merges at least two groups.
    for round in 0..slots.len() {
        let groups = connected_groups(slots, min_gap);
        trace!(round, groups = groups.len(), "label bounds correction");
        for (id, range) in groups.iter().enumerate() {
            let group = &mut slots[range.clone()];
            for slot in group.iter_mut() {
                slot.group = id;
            }
            correct_group(group, bounds, min_gap);
        }
        if !has_cross_group_violation(slots, min_gap) {
            return;
        }
    }
}

fn correct_group(group: &mut [Slot], bounds: Rect, min_gap: f64) {
    for i in 1..group.len() {
        let min_y = group[i - 1].y + required_separation(group[i - 1], group[i], min_gap);
        if group[i].y + EPSILON < min_y {
            group[i].y = min_y;
        }
    }

    let required_height: f64 = group.iter().map(|slot| 2.0 * slot.half_height).sum::<f64>()
        + min_gap * group.len().saturating_sub(1) as f64;
    if required_height > bounds.height {
        let ratio = if required_height > 0.0 {
            bounds.height / required_height
        } else {
            0.0
        };
        let mut cursor = bounds.y;
        for slot in group.iter_mut() {
            slot.y = cursor + slot.half_height * ratio;
            slot.compressed = true;
            cursor += (2.0 * slot.half_height + min_gap) * ratio;
        }
        return;
    }

    let (Some(first), Some(last)) = (group.first().copied(), group.last().copied()) else {
        return;
    };
    if last.bottom() - first.top() > bounds.height + EPSILON {
        // Loose spacing alone overflows; pack at minimum separation.
        for i in 1..group.len() {
            group[i].y = group[i - 1].y + required_separation(group[i - 1], group[i], min_gap);
        }
    }
    let (Some(first), Some(last)) = (group.first().copied(), group.last().copied()) else {
        return;
    };
    let shift = if first.top() < bounds.y - EPSILON {
        bounds.y - first.top()
    } else if last.bottom() > bounds.bottom() + EPSILON {
        bounds.bottom() - last.bottom()
    } else {
        0.0
    };
    for slot in group.iter_mut() {
        slot.compressed = false;
        let top = bounds.y + slot.half_height;
        let bottom = (bounds.bottom() - slot.half_height).max(top);
        slot.y = (slot.y + shift).clamp(top, bottom);
    }
}

fn has_cross_group_violation(slots: &[Slot], min_gap: f64) -> bool {
    slots.windows(2).any(|pair| {
        let (upper, lower) = (pair[0], pair[1]);
        if upper.compressed && lower.compressed && upper.group == lower.group {
            return false;
        }
        lower.y - upper.y + EPSILON < required_separation(upper, lower, min_gap)
    })
}
