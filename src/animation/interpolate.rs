//! Structure-preserving interpolation between two paths.
//!
//! Matching happens once, when the interpolator is built: subpath counts are
//! equalized, open/closed state is reconciled, shorter segment lists are
//! padded by splitting segments and lines are promoted to cubics wherever the
//! other path has a cubic. Sampling then only blends a flat list of numbers
//! and writes the string.

use serde::{Deserialize, Serialize};

use crate::animation::path::{PathData, Segment, Subpath};
use crate::core::Point;
use crate::core::path_builder::PathWriter;
use crate::error::ChartResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum SegmentKind {
    Line,
    Cubic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SubpathShape {
    kinds: Vec<SegmentKind>,
    closed: bool,
}

/// Precomputed interpolation between two matched paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathInterpolator {
    shapes: Vec<SubpathShape>,
    from: Vec<f64>,
    to: Vec<f64>,
}

impl PathInterpolator {
    #[must_use]
    pub fn new(from: &PathData, to: &PathData) -> Self {
        let (from, to) = match_paths(from, to);
        let shapes = from
            .subpaths
            .iter()
            .map(|subpath| SubpathShape {
                kinds: subpath
                    .segments
                    .iter()
                    .map(|segment| match segment {
                        Segment::Line(_) => SegmentKind::Line,
                        Segment::Cubic { .. } => SegmentKind::Cubic,
                    })
                    .collect(),
                closed: subpath.closed,
            })
            .collect();
        Self {
            shapes,
            from: flatten(&from),
            to: flatten(&to),
        }
    }

    /// Number of interpolated coordinates (for diagnostics).
    #[must_use]
    pub fn coordinate_count(&self) -> usize {
        self.from.len()
    }

    /// Path string at `t` (0 = from, 1 = to).
    #[must_use]
    pub fn sample(&self, t: f64) -> String {
        let mut values = self
            .from
            .iter()
            .zip(&self.to)
            .map(|(a, b)| a * (1.0 - t) + b * t);
        let mut next_point = || {
            let x = values.next().unwrap_or_default();
            let y = values.next().unwrap_or_default();
            Point::new(x, y)
        };

        let mut writer = PathWriter::default();
        for shape in &self.shapes {
            writer.move_to(next_point());
            for kind in &shape.kinds {
                match kind {
                    SegmentKind::Line => writer.line_to(next_point()),
                    SegmentKind::Cubic => {
                        let c1 = next_point();
                        let c2 = next_point();
                        writer.cubic_to(c1, c2, next_point());
                    }
                }
            }
            if shape.closed {
                writer.close();
            }
        }
        writer.finish()
    }
}

/// Parses both path strings and builds their interpolator.
pub fn interpolate_path(from: &str, to: &str) -> ChartResult<PathInterpolator> {
    let from = PathData::parse(from)?;
    let to = PathData::parse(to)?;
    Ok(PathInterpolator::new(&from, &to))
}

fn flatten(path: &PathData) -> Vec<f64> {
    let mut out = Vec::new();
    for subpath in &path.subpaths {
        out.extend([subpath.start.x, subpath.start.y]);
        for segment in &subpath.segments {
            match *segment {
                Segment::Line(to) => out.extend([to.x, to.y]),
                Segment::Cubic { c1, c2, to } => {
                    out.extend([c1.x, c1.y, c2.x, c2.y, to.x, to.y]);
                }
            }
        }
    }
    out
}

fn match_paths(from: &PathData, to: &PathData) -> (PathData, PathData) {
    let count = from.subpaths.len().max(to.subpaths.len());
    let mut matched_from = Vec::with_capacity(count);
    let mut matched_to = Vec::with_capacity(count);
    for index in 0..count {
        let (a, b) = match (from.subpaths.get(index), to.subpaths.get(index)) {
            (Some(a), Some(b)) => (a.clone(), b.clone()),
            (Some(a), None) => (a.clone(), collapsed(to, a)),
            (None, Some(b)) => (collapsed(from, b), b.clone()),
            (None, None) => break,
        };
        let (a, b) = match_subpaths(a, b);
        matched_from.push(a);
        matched_to.push(b);
    }
    (
        PathData {
            subpaths: matched_from,
        },
        PathData {
            subpaths: matched_to,
        },
    )
}

/// Zero-size stand-in for a subpath missing from `path`.
///
/// It sits on the end of `path`'s last subpath, or on the counterpart's start
/// when `path` is empty, so the missing piece grows out of (or shrinks into)
/// a point.
fn collapsed(path: &PathData, counterpart: &Subpath) -> Subpath {
    let point = path
        .subpaths
        .last()
        .map_or(counterpart.start, Subpath::end);
    Subpath {
        start: point,
        segments: Vec::new(),
        closed: counterpart.closed,
    }
}

fn match_subpaths(mut a: Subpath, mut b: Subpath) -> (Subpath, Subpath) {
    if a.closed != b.closed {
        open_with_explicit_close(&mut a);
        open_with_explicit_close(&mut b);
    }

    let target = a.segments.len().max(b.segments.len());
    pad_segments(&mut a, target);
    pad_segments(&mut b, target);

    let mut from_a = a.start;
    let mut from_b = b.start;
    for (sa, sb) in a.segments.iter_mut().zip(b.segments.iter_mut()) {
        let (end_a, end_b) = (sa.end(), sb.end());
        if matches!(sa, Segment::Line(_)) != matches!(sb, Segment::Line(_)) {
            *sa = sa.to_cubic(from_a);
            *sb = sb.to_cubic(from_b);
        }
        from_a = end_a;
        from_b = end_b;
    }
    (a, b)
}

fn open_with_explicit_close(subpath: &mut Subpath) {
    if !subpath.closed {
        return;
    }
    if subpath.end() != subpath.start {
        subpath.segments.push(Segment::Line(subpath.start));
    }
    subpath.closed = false;
}

/// Splits segments until the subpath holds `target` of them.
///
/// Extra pieces are spread evenly over the existing segments; a subpath
/// without segments is padded with zero-length lines at its start.
fn pad_segments(subpath: &mut Subpath, target: usize) {
    let current = subpath.segments.len();
    if current >= target {
        return;
    }
    if current == 0 {
        subpath.segments = vec![Segment::Line(subpath.start); target];
        return;
    }

    let mut padded = Vec::with_capacity(target);
    let mut from = subpath.start;
    for (i, segment) in subpath.segments.iter().enumerate() {
        let pieces = (i + 1) * target / current - i * target / current;
        padded.extend(segment.split(from, pieces));
        from = segment.end();
    }
    subpath.segments = padded;
}
