//! SVG path data parsing and normalization.
//!
//! Every command is normalized to absolute coordinates and one of two segment
//! kinds (line or cubic), so two paths can be matched and interpolated
//! number-by-number. Quadratics, smooth curves and elliptical arcs are
//! converted to cubics; `H`/`V` become lines.

use std::f64::consts::{FRAC_PI_2, TAU};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::Point;
use crate::core::path_builder::PathWriter;
use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Segment {
    Line(Point),
    Cubic { c1: Point, c2: Point, to: Point },
}

impl Segment {
    #[must_use]
    pub fn end(self) -> Point {
        match self {
            Self::Line(to) | Self::Cubic { to, .. } => to,
        }
    }

    /// Same segment expressed as a cubic starting at `from`.
    #[must_use]
    pub fn to_cubic(self, from: Point) -> Self {
        match self {
            Self::Line(to) => Self::Cubic {
                c1: from.lerp(to, 1.0 / 3.0),
                c2: from.lerp(to, 2.0 / 3.0),
                to,
            },
            cubic @ Self::Cubic { .. } => cubic,
        }
    }

    /// Splits the segment starting at `from` into `pieces` consecutive parts.
    #[must_use]
    pub fn split(self, from: Point, pieces: usize) -> Vec<Self> {
        if pieces <= 1 {
            return vec![self];
        }
        match self {
            Self::Line(to) => (1..=pieces)
                .map(|i| Self::Line(from.lerp(to, i as f64 / pieces as f64)))
                .collect(),
            Self::Cubic { c1, c2, to } => {
                let mut out = Vec::with_capacity(pieces);
                let mut rest = [from, c1, c2, to];
                for remaining in (2..=pieces).rev() {
                    let (head, tail) = split_cubic(rest, 1.0 / remaining as f64);
                    out.push(Self::Cubic {
                        c1: head[1],
                        c2: head[2],
                        to: head[3],
                    });
                    rest = tail;
                }
                out.push(Self::Cubic {
                    c1: rest[1],
                    c2: rest[2],
                    to: rest[3],
                });
                out
            }
        }
    }
}

/// De Casteljau split of a cubic at `t`.
fn split_cubic(p: [Point; 4], t: f64) -> ([Point; 4], [Point; 4]) {
    let p01 = p[0].lerp(p[1], t);
    let p12 = p[1].lerp(p[2], t);
    let p23 = p[2].lerp(p[3], t);
    let p012 = p01.lerp(p12, t);
    let p123 = p12.lerp(p23, t);
    let mid = p012.lerp(p123, t);
    ([p[0], p01, p012, mid], [mid, p123, p23, p[3]])
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subpath {
    pub start: Point,
    pub segments: Vec<Segment>,
    pub closed: bool,
}

impl Subpath {
    #[must_use]
    pub fn end(&self) -> Point {
        self.segments.last().map_or(self.start, |segment| segment.end())
    }
}

/// Normalized path geometry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PathData {
    pub subpaths: Vec<Subpath>,
}

impl PathData {
    /// Parses SVG path data. An empty (or whitespace-only) string is an empty path.
    pub fn parse(input: &str) -> ChartResult<Self> {
        Parser::new(input).parse()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subpaths.is_empty()
    }

    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.subpaths.iter().map(|s| s.segments.len()).sum()
    }

    /// Writes the path back with absolute `M`, `L`, `C` and `Z` commands.
    #[must_use]
    pub fn to_path_string(&self) -> String {
        let mut writer = PathWriter::default();
        for subpath in &self.subpaths {
            writer.move_to(subpath.start);
            for segment in &subpath.segments {
                match *segment {
                    Segment::Line(to) => writer.line_to(to),
                    Segment::Cubic { c1, c2, to } => writer.cubic_to(c1, c2, to),
                }
            }
            if subpath.closed {
                writer.close();
            }
        }
        writer.finish()
    }
}

struct Parser<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    subpaths: Vec<Subpath>,
    current: Point,
    subpath_start: Point,
    last_cubic_control: Option<Point>,
    last_quad_control: Option<Point>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            subpaths: Vec::new(),
            current: Point::default(),
            subpath_start: Point::default(),
            last_cubic_control: None,
            last_quad_control: None,
        }
    }

    fn error(&self, reason: impl Into<String>) -> ChartError {
        ChartError::InvalidPath {
            reason: reason.into(),
            offset: self.pos,
        }
    }

    fn parse(mut self) -> ChartResult<PathData> {
        let mut command: Option<u8> = None;
        loop {
            self.skip_separators();
            let Some(&byte) = self.bytes.get(self.pos) else {
                break;
            };
            let active = if byte.is_ascii_alphabetic() {
                self.pos += 1;
                byte
            } else if let Some(repeat) = command {
                repeat
            } else {
                return Err(self.error("expected a path command"));
            };
            command = self.run_command(active)?;
        }
        Ok(PathData {
            subpaths: self.subpaths,
        })
    }

    /// Executes one command and returns the command used for implicit repeats.
    fn run_command(&mut self, command: u8) -> ChartResult<Option<u8>> {
        let relative = command.is_ascii_lowercase();
        let origin = if relative {
            self.current
        } else {
            Point::default()
        };
        let mut next = Some(command);
        let mut cubic_control = None;
        let mut quad_control = None;

        match command.to_ascii_uppercase() {
            b'M' => {
                let [x, y] = self.numbers::<2>()?;
                let to = Point::new(origin.x + x, origin.y + y);
                self.subpaths.push(Subpath {
                    start: to,
                    segments: Vec::new(),
                    closed: false,
                });
                self.current = to;
                self.subpath_start = to;
                next = Some(if relative { b'l' } else { b'L' });
            }
            b'Z' => {
                if let Some(subpath) = self.subpaths.last_mut() {
                    subpath.closed = true;
                }
                self.current = self.subpath_start;
                next = None;
            }
            b'L' => {
                let [x, y] = self.numbers::<2>()?;
                self.push(Segment::Line(Point::new(origin.x + x, origin.y + y)))?;
            }
            b'H' => {
                let [x] = self.numbers::<1>()?;
                let to = Point::new(origin.x + x, self.current.y);
                self.push(Segment::Line(to))?;
            }
            b'V' => {
                let [y] = self.numbers::<1>()?;
                let to = Point::new(self.current.x, origin.y + y);
                self.push(Segment::Line(to))?;
            }
            b'C' => {
                let [x1, y1, x2, y2, x, y] = self.numbers::<6>()?;
                let c2 = Point::new(origin.x + x2, origin.y + y2);
                self.push(Segment::Cubic {
                    c1: Point::new(origin.x + x1, origin.y + y1),
                    c2,
                    to: Point::new(origin.x + x, origin.y + y),
                })?;
                cubic_control = Some(c2);
            }
            b'S' => {
                let [x2, y2, x, y] = self.numbers::<4>()?;
                let c1 = reflect(self.last_cubic_control, self.current);
                let c2 = Point::new(origin.x + x2, origin.y + y2);
                self.push(Segment::Cubic {
                    c1,
                    c2,
                    to: Point::new(origin.x + x, origin.y + y),
                })?;
                cubic_control = Some(c2);
            }
            b'Q' => {
                let [x1, y1, x, y] = self.numbers::<4>()?;
                let control = Point::new(origin.x + x1, origin.y + y1);
                let to = Point::new(origin.x + x, origin.y + y);
                self.push(quadratic_to_cubic(self.current, control, to))?;
                quad_control = Some(control);
            }
            b'T' => {
                let [x, y] = self.numbers::<2>()?;
                let control = reflect(self.last_quad_control, self.current);
                let to = Point::new(origin.x + x, origin.y + y);
                self.push(quadratic_to_cubic(self.current, control, to))?;
                quad_control = Some(control);
            }
            b'A' => {
                let [rx, ry, rotation] = self.numbers::<3>()?;
                let large_arc = self.flag()?;
                let sweep = self.flag()?;
                let [x, y] = self.numbers::<2>()?;
                let to = Point::new(origin.x + x, origin.y + y);
                let from = self.current;
                let segments = arc_to_cubics(from, rx, ry, rotation, large_arc, sweep, to);
                if segments.is_empty() && from != to {
                    self.push(Segment::Line(to))?;
                }
                for segment in segments {
                    self.push(segment)?;
                }
            }
            other => {
                return Err(self.error(format!("unsupported command `{}`", other as char)));
            }
        }

        self.last_cubic_control = cubic_control;
        self.last_quad_control = quad_control;
        Ok(next)
    }

    fn push(&mut self, segment: Segment) -> ChartResult<()> {
        let needs_subpath = self.subpaths.last().is_none_or(|subpath| subpath.closed);
        if needs_subpath {
            if self.subpaths.is_empty() {
                return Err(self.error("path must start with a moveto command"));
            }
            self.subpaths.push(Subpath {
                start: self.subpath_start,
                segments: Vec::new(),
                closed: false,
            });
        }
        if let Some(subpath) = self.subpaths.last_mut() {
            subpath.segments.push(segment);
        }
        self.current = segment.end();
        Ok(())
    }

    fn skip_separators(&mut self) {
        while let Some(&byte) = self.bytes.get(self.pos) {
            if byte.is_ascii_whitespace() || byte == b',' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn numbers<const N: usize>(&mut self) -> ChartResult<[f64; N]> {
        let mut out = [0.0; N];
        for value in &mut out {
            *value = self.number()?;
        }
        Ok(out)
    }

    fn number(&mut self) -> ChartResult<f64> {
        self.skip_separators();
        let start = self.pos;
        let digits = |bytes: &[u8], mut pos: usize| {
            while bytes.get(pos).is_some_and(u8::is_ascii_digit) {
                pos += 1;
            }
            pos
        };

        let mut pos = start;
        if matches!(self.bytes.get(pos), Some(b'+' | b'-')) {
            pos += 1;
        }
        let int_end = digits(self.bytes, pos);
        let mut end = int_end;
        let mut has_digits = int_end > pos;
        if self.bytes.get(end) == Some(&b'.') {
            let frac_end = digits(self.bytes, end + 1);
            has_digits |= frac_end > end + 1;
            end = frac_end;
        }
        if !has_digits {
            return Err(self.error("expected a number"));
        }
        if matches!(self.bytes.get(end), Some(b'e' | b'E')) {
            let mut exp = end + 1;
            if matches!(self.bytes.get(exp), Some(b'+' | b'-')) {
                exp += 1;
            }
            let exp_end = digits(self.bytes, exp);
            if exp_end > exp {
                end = exp_end;
            }
        }

        let value: f64 = self.input[start..end]
            .parse()
            .map_err(|_| self.error("malformed number"))?;
        if !value.is_finite() {
            return Err(self.error("number must be finite"));
        }
        self.pos = end;
        Ok(value)
    }

    // Arc flags may be packed without separators (`a5 5 0 1150 20`).
    fn flag(&mut self) -> ChartResult<bool> {
        self.skip_separators();
        match self.bytes.get(self.pos) {
            Some(b'0') => {
                self.pos += 1;
                Ok(false)
            }
            Some(b'1') => {
                self.pos += 1;
                Ok(true)
            }
            _ => Err(self.error("expected an arc flag")),
        }
    }
}

fn reflect(control: Option<Point>, current: Point) -> Point {
    control.map_or(current, |c| {
        Point::new(2.0 * current.x - c.x, 2.0 * current.y - c.y)
    })
}

fn quadratic_to_cubic(from: Point, control: Point, to: Point) -> Segment {
    Segment::Cubic {
        c1: from.lerp(control, 2.0 / 3.0),
        c2: to.lerp(control, 2.0 / 3.0),
        to,
    }
}

/// Converts an SVG elliptical arc (endpoint form) to cubic segments of at most 90 degrees.
///
/// Returns no segments when the endpoints coincide or a radius is zero.
fn arc_to_cubics(
    from: Point,
    rx: f64,
    ry: f64,
    rotation_degrees: f64,
    large_arc: bool,
    sweep: bool,
    to: Point,
) -> SmallVec<[Segment; 4]> {
    let (mut rx, mut ry) = (rx.abs(), ry.abs());
    if from == to || rx == 0.0 || ry == 0.0 {
        return SmallVec::new();
    }

    let phi = rotation_degrees.to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();
    let dx = (from.x - to.x) / 2.0;
    let dy = (from.y - to.y) / 2.0;
    let x1p = cos_phi * dx + sin_phi * dy;
    let y1p = -sin_phi * dx + cos_phi * dy;

    let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
    if lambda > 1.0 {
        let scale = lambda.sqrt();
        rx *= scale;
        ry *= scale;
    }

    let numerator = rx * rx * ry * ry - rx * rx * y1p * y1p - ry * ry * x1p * x1p;
    let denominator = rx * rx * y1p * y1p + ry * ry * x1p * x1p;
    let mut coefficient = (numerator / denominator).max(0.0).sqrt();
    if large_arc == sweep {
        coefficient = -coefficient;
    }
    let cxp = coefficient * rx * y1p / ry;
    let cyp = -coefficient * ry * x1p / rx;
    let cx = cos_phi * cxp - sin_phi * cyp + (from.x + to.x) / 2.0;
    let cy = sin_phi * cxp + cos_phi * cyp + (from.y + to.y) / 2.0;

    let angle = |ux: f64, uy: f64, vx: f64, vy: f64| (ux * vy - uy * vx).atan2(ux * vx + uy * vy);
    let ux = (x1p - cxp) / rx;
    let uy = (y1p - cyp) / ry;
    let vx = (-x1p - cxp) / rx;
    let vy = (-y1p - cyp) / ry;
    let theta1 = angle(1.0, 0.0, ux, uy);
    let mut delta = angle(ux, uy, vx, vy);
    if !sweep && delta > 0.0 {
        delta -= TAU;
    } else if sweep && delta < 0.0 {
        delta += TAU;
    }

    let pieces = (delta.abs() / FRAC_PI_2).ceil().max(1.0) as usize;
    let step = delta / pieces as f64;
    let kappa = 4.0 / 3.0 * (step / 4.0).tan();
    let point_at = |theta: f64| {
        let (sin_t, cos_t) = theta.sin_cos();
        Point::new(
            cx + rx * cos_t * cos_phi - ry * sin_t * sin_phi,
            cy + rx * cos_t * sin_phi + ry * sin_t * cos_phi,
        )
    };
    let derivative_at = |theta: f64| {
        let (sin_t, cos_t) = theta.sin_cos();
        Point::new(
            -rx * sin_t * cos_phi - ry * cos_t * sin_phi,
            -rx * sin_t * sin_phi + ry * cos_t * cos_phi,
        )
    };

    let mut segments = SmallVec::with_capacity(pieces);
    let mut theta = theta1;
    let mut start = from;
    for piece in 0..pieces {
        let next_theta = theta + step;
        let end = if piece + 1 == pieces {
            to
        } else {
            point_at(next_theta)
        };
        let d0 = derivative_at(theta);
        let d1 = derivative_at(next_theta);
        segments.push(Segment::Cubic {
            c1: Point::new(start.x + kappa * d0.x, start.y + kappa * d0.y),
            c2: Point::new(end.x - kappa * d1.x, end.y - kappa * d1.y),
            to: end,
        });
        theta = next_theta;
        start = end;
    }
    segments
}
