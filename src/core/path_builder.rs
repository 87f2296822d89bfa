//! Path-string builders for chart geometry.
//!
//! Outputs are SVG path data using absolute commands only, so they can be fed
//! straight into the transition engine.

use std::f64::consts::{PI, TAU};
use std::fmt::Write as _;

use crate::core::arc::{Arc, polar_to_cartesian};
use crate::core::types::{Point, Rect};

const FULL_TURN_EPSILON: f64 = 1e-9;

/// Incremental writer for absolute SVG path commands.
#[derive(Debug, Default, Clone)]
pub(crate) struct PathWriter {
    out: String,
}

impl PathWriter {
    fn command(&mut self, letter: char) {
        if !self.out.is_empty() {
            self.out.push(' ');
        }
        self.out.push(letter);
    }

    fn coords(&mut self, values: &[f64]) {
        for (i, value) in values.iter().enumerate() {
            self.out.push(if i == 0 { ' ' } else { ',' });
            write_number(&mut self.out, *value);
        }
    }

    pub(crate) fn move_to(&mut self, p: Point) {
        self.command('M');
        self.coords(&[p.x, p.y]);
    }

    pub(crate) fn line_to(&mut self, p: Point) {
        self.command('L');
        self.coords(&[p.x, p.y]);
    }

    pub(crate) fn cubic_to(&mut self, c1: Point, c2: Point, p: Point) {
        self.command('C');
        self.coords(&[c1.x, c1.y, c2.x, c2.y, p.x, p.y]);
    }

    fn arc_to(&mut self, radius: f64, large_arc: bool, sweep: bool, p: Point) {
        self.command('A');
        self.coords(&[
            radius,
            radius,
            0.0,
            f64::from(u8::from(large_arc)),
            f64::from(u8::from(sweep)),
            p.x,
            p.y,
        ]);
    }

    pub(crate) fn close(&mut self) {
        self.command('Z');
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }
}

/// Writes the shortest round-trip form of `value`, normalizing `-0`.
pub(crate) fn write_number(out: &mut String, value: f64) {
    let value = if value == 0.0 { 0.0 } else { value };
    let _ = write!(out, "{value}");
}

/// Polyline through `points`; empty input yields an empty path.
#[must_use]
pub fn line_path(points: &[Point]) -> String {
    let mut writer = PathWriter::default();
    for (i, point) in points.iter().enumerate() {
        if i == 0 {
            writer.move_to(*point);
        } else {
            writer.line_to(*point);
        }
    }
    writer.finish()
}

/// Closed area between the polyline and a horizontal baseline.
#[must_use]
pub fn area_path(points: &[Point], baseline_y: f64) -> String {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return String::new();
    };
    let mut writer = PathWriter::default();
    writer.move_to(*first);
    for point in &points[1..] {
        writer.line_to(*point);
    }
    writer.line_to(Point::new(last.x, baseline_y));
    writer.line_to(Point::new(first.x, baseline_y));
    writer.close();
    writer.finish()
}

#[must_use]
pub fn bar_path(rect: Rect) -> String {
    let mut writer = PathWriter::default();
    writer.move_to(Point::new(rect.x, rect.y));
    writer.line_to(Point::new(rect.right(), rect.y));
    writer.line_to(Point::new(rect.right(), rect.bottom()));
    writer.line_to(Point::new(rect.x, rect.bottom()));
    writer.close();
    writer.finish()
}

/// Pie/donut slice outline around `center`.
///
/// Zero-radius slices yield an empty path; a full-turn slice is drawn as two
/// half arcs (plus an inner ring for donuts).
#[must_use]
pub fn arc_path(arc: Arc, center: Point) -> String {
    let outer = arc.outer_radius.max(0.0);
    let inner = arc.inner_radius.clamp(0.0, outer);
    if outer == 0.0 {
        return String::new();
    }

    let sweep = arc.sweep();
    let clockwise = sweep >= 0.0;
    let mut writer = PathWriter::default();

    if sweep.abs() >= TAU - FULL_TURN_EPSILON {
        let half = arc.start_angle + sweep / 2.0;
        writer.move_to(polar_to_cartesian(center, outer, arc.start_angle));
        writer.arc_to(outer, false, clockwise, polar_to_cartesian(center, outer, half));
        writer.arc_to(outer, false, clockwise, polar_to_cartesian(center, outer, arc.start_angle));
        writer.close();
        if inner > 0.0 {
            writer.move_to(polar_to_cartesian(center, inner, arc.start_angle));
            writer.arc_to(inner, false, !clockwise, polar_to_cartesian(center, inner, half));
            writer.arc_to(inner, false, !clockwise, polar_to_cartesian(center, inner, arc.start_angle));
            writer.close();
        }
        return writer.finish();
    }

    let large_arc = sweep.abs() > PI;
    writer.move_to(polar_to_cartesian(center, outer, arc.start_angle));
    writer.arc_to(outer, large_arc, clockwise, polar_to_cartesian(center, outer, arc.end_angle));
    if inner > 0.0 {
        writer.line_to(polar_to_cartesian(center, inner, arc.end_angle));
        writer.arc_to(inner, large_arc, !clockwise, polar_to_cartesian(center, inner, arc.start_angle));
    } else {
        writer.line_to(center);
    }
    writer.close();
    writer.finish()
}
