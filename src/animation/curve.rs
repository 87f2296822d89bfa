//! Progress curves driving transitions: springs and timed easings.

use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Springs that never come to rest (zero damping) are stopped after this long.
pub const MAX_SPRING_SECONDS: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    #[default]
    EaseInOut,
    /// CSS-style cubic bezier through `(0,0)`, `(x1,y1)`, `(x2,y2)`, `(1,1)`.
    CubicBezier { x1: f64, y1: f64, x2: f64, y2: f64 },
}

impl Easing {
    /// Maps linear time `t` in `[0, 1]` to eased progress.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t * t,
            Self::EaseOut => 1.0 - (1.0 - t).powi(3),
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Self::CubicBezier { x1, y1, x2, y2 } => cubic_bezier(x1, y1, x2, y2, t),
        }
    }
}

fn bezier_axis(p1: f64, p2: f64, s: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

fn bezier_axis_derivative(p1: f64, p2: f64, s: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, t: f64) -> f64 {
    if t <= 0.0 || t >= 1.0 {
        return t;
    }
    let (x1, x2) = (x1.clamp(0.0, 1.0), x2.clamp(0.0, 1.0));

    // Newton first, bisection when the slope is too flat to trust.
    let mut s = t;
    for _ in 0..8 {
        let error = bezier_axis(x1, x2, s) - t;
        if error.abs() < 1e-7 {
            return bezier_axis(y1, y2, s);
        }
        let slope = bezier_axis_derivative(x1, x2, s);
        if slope.abs() < 1e-6 {
            break;
        }
        s -= error / slope;
    }

    let (mut lo, mut hi) = (0.0, 1.0);
    s = t;
    for _ in 0..64 {
        let x = bezier_axis(x1, x2, s);
        if (x - t).abs() < 1e-7 {
            break;
        }
        if x < t {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) / 2.0;
    }
    bezier_axis(y1, y2, s)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    pub duration_ms: f64,
    #[serde(default)]
    pub easing: Easing,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            duration_ms: 300.0,
            easing: Easing::EaseInOut,
        }
    }
}

impl TimingConfig {
    #[must_use]
    pub fn new(duration_ms: f64, easing: Easing) -> Self {
        Self {
            duration_ms,
            easing,
        }
    }

    fn validate(self) -> ChartResult<Self> {
        if !self.duration_ms.is_finite() || self.duration_ms < 0.0 {
            return Err(ChartError::InvalidData(
                "timing duration must be finite and >= 0".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Damped harmonic oscillator pulling progress from 0 to 1.
///
/// The default is critically damped, so progress never overshoots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    pub stiffness: f64,
    pub damping: f64,
    #[serde(default = "default_mass")]
    pub mass: f64,
    #[serde(default = "default_rest_threshold")]
    pub rest_displacement: f64,
    #[serde(default = "default_rest_threshold")]
    pub rest_velocity: f64,
}

fn default_mass() -> f64 {
    1.0
}

fn default_rest_threshold() -> f64 {
    0.001
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: 100.0,
            damping: 20.0,
            mass: default_mass(),
            rest_displacement: default_rest_threshold(),
            rest_velocity: default_rest_threshold(),
        }
    }
}

impl SpringConfig {
    #[must_use]
    pub fn new(stiffness: f64, damping: f64) -> Self {
        Self {
            stiffness,
            damping,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    fn validate(self) -> ChartResult<Self> {
        for (value, name) in [
            (self.stiffness, "stiffness"),
            (self.mass, "mass"),
            (self.rest_displacement, "rest_displacement"),
            (self.rest_velocity, "rest_velocity"),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "spring `{name}` must be finite and > 0"
                )));
            }
        }
        if !self.damping.is_finite() || self.damping < 0.0 {
            return Err(ChartError::InvalidData(
                "spring damping must be finite and >= 0".to_owned(),
            ));
        }
        Ok(self)
    }

    /// Displacement from the target and velocity at `t` seconds, starting at rest at -1.
    fn state_at(self, t: f64) -> (f64, f64) {
        let x0 = -1.0;
        let omega = (self.stiffness / self.mass).sqrt();
        let zeta = self.damping / (2.0 * (self.stiffness * self.mass).sqrt());

        if (zeta - 1.0).abs() < 1e-6 {
            let b = omega * x0;
            let envelope = (-omega * t).exp();
            let x = envelope * (x0 + b * t);
            let v = envelope * (b - omega * (x0 + b * t));
            (x, v)
        } else if zeta < 1.0 {
            let omega_d = omega * (1.0 - zeta * zeta).sqrt();
            let a = x0;
            let b = zeta * omega * x0 / omega_d;
            let envelope = (-zeta * omega * t).exp();
            let (sin, cos) = (omega_d * t).sin_cos();
            let oscillation = a * cos + b * sin;
            let x = envelope * oscillation;
            let v = envelope * (-zeta * omega * oscillation + omega_d * (b * cos - a * sin));
            (x, v)
        } else {
            let root = (zeta * zeta - 1.0).sqrt();
            let r1 = -omega * (zeta - root);
            let r2 = -omega * (zeta + root);
            let a = -r2 * x0 / (r1 - r2);
            let b = x0 - a;
            let (e1, e2) = ((r1 * t).exp(), (r2 * t).exp());
            (a * e1 + b * e2, a * r1 * e1 + b * r2 * e2)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TransitionCurve {
    Spring(SpringConfig),
    Timing(TimingConfig),
}

impl Default for TransitionCurve {
    fn default() -> Self {
        Self::Spring(SpringConfig::default())
    }
}

impl TransitionCurve {
    pub fn validate(self) -> ChartResult<Self> {
        match self {
            Self::Spring(config) => config.validate().map(Self::Spring),
            Self::Timing(config) => config.validate().map(Self::Timing),
        }
    }
}

/// Curves used for the first appearance (`enter`) and for later target changes (`update`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionConfig {
    #[serde(default = "default_enter_curve")]
    pub enter: TransitionCurve,
    #[serde(default)]
    pub update: TransitionCurve,
}

fn default_enter_curve() -> TransitionCurve {
    TransitionCurve::Timing(TimingConfig::new(300.0, Easing::EaseOut))
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            enter: default_enter_curve(),
            update: TransitionCurve::default(),
        }
    }
}

impl TransitionConfig {
    #[must_use]
    pub fn new(enter: TransitionCurve, update: TransitionCurve) -> Self {
        Self { enter, update }
    }

    pub fn validate(self) -> ChartResult<Self> {
        Ok(Self {
            enter: self.enter.validate()?,
            update: self.update.validate()?,
        })
    }

    /// Parses and validates a JSON transition config.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse transition config json: {e}"))
        })?;
        config.validate()
    }
}

/// Advances normalized progress along one curve.
///
/// Invalid curve parameters finish immediately instead of failing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveDriver {
    curve: TransitionCurve,
    elapsed_seconds: f64,
    progress: f64,
    finished: bool,
}

impl CurveDriver {
    #[must_use]
    pub fn new(curve: TransitionCurve) -> Self {
        let finished = curve.validate().is_err()
            || matches!(curve, TransitionCurve::Timing(t) if t.duration_ms == 0.0);
        Self {
            curve,
            elapsed_seconds: 0.0,
            progress: if finished { 1.0 } else { 0.0 },
            finished,
        }
    }

    #[must_use]
    pub fn curve(&self) -> TransitionCurve {
        self.curve
    }

    /// Current progress, clamped to `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advances the curve clock by `delta_seconds` (negative or non-finite deltas are ignored).
    pub fn advance(&mut self, delta_seconds: f64) -> f64 {
        if self.finished || !delta_seconds.is_finite() || delta_seconds <= 0.0 {
            return self.progress;
        }
        self.elapsed_seconds += delta_seconds;

        match self.curve {
            TransitionCurve::Timing(config) => {
                let linear = self.elapsed_seconds * 1000.0 / config.duration_ms;
                if linear >= 1.0 {
                    self.finish();
                } else {
                    self.progress = config.easing.apply(linear).clamp(0.0, 1.0);
                }
            }
            TransitionCurve::Spring(config) => {
                let (displacement, velocity) = config.state_at(self.elapsed_seconds);
                let at_rest = displacement.abs() < config.rest_displacement
                    && velocity.abs() < config.rest_velocity;
                if at_rest || self.elapsed_seconds >= MAX_SPRING_SECONDS {
                    self.finish();
                } else {
                    self.progress = (1.0 + displacement).clamp(0.0, 1.0);
                }
            }
        }
        self.progress
    }

    /// Overrides progress directly; values `>= 1` finish the curve.
    pub fn set_progress(&mut self, progress: f64) {
        if !progress.is_finite() {
            return;
        }
        if progress >= 1.0 {
            self.finish();
        } else {
            self.progress = progress.max(0.0);
        }
    }

    fn finish(&mut self) {
        self.progress = 1.0;
        self.finished = true;
    }
}
