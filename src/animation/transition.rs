use std::fmt;

use tracing::{debug, trace, warn};

use crate::animation::curve::{CurveDriver, TransitionConfig, TransitionCurve};
use crate::animation::interpolate::interpolate_path;
use crate::animation::PathInterpolator;
use crate::core::Point;

/// Values a [`Transition`] can blend between.
///
/// The interpolator is built once per target change so that sampling stays
/// cheap; `sample` must reproduce `from` at `t = 0` and `to` at `t = 1`.
pub trait Animatable: Clone + PartialEq + fmt::Debug {
    type Interpolator: Clone + fmt::Debug + Send + Sync;

    fn interpolator(from: &Self, to: &Self) -> Self::Interpolator;

    fn sample(interpolator: &Self::Interpolator, t: f64) -> Self;

    /// `false` makes the transition jump straight to its target.
    fn can_animate(_interpolator: &Self::Interpolator) -> bool {
        true
    }
}

impl Animatable for f64 {
    type Interpolator = (f64, f64);

    fn interpolator(from: &Self, to: &Self) -> Self::Interpolator {
        (*from, *to)
    }

    fn sample(&(from, to): &Self::Interpolator, t: f64) -> Self {
        from * (1.0 - t) + to * t
    }

    fn can_animate(&(from, to): &Self::Interpolator) -> bool {
        from.is_finite() && to.is_finite()
    }
}

impl Animatable for Point {
    type Interpolator = (Point, Point);

    fn interpolator(from: &Self, to: &Self) -> Self::Interpolator {
        (*from, *to)
    }

    fn sample(&(from, to): &Self::Interpolator, t: f64) -> Self {
        from.lerp(to, t)
    }

    fn can_animate(&(from, to): &Self::Interpolator) -> bool {
        from.is_finite() && to.is_finite()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PathPlan {
    Morph(PathInterpolator),
    /// One side failed to parse; the target is shown as-is.
    Snap(String),
}

impl Animatable for String {
    type Interpolator = PathPlan;

    fn interpolator(from: &Self, to: &Self) -> Self::Interpolator {
        match interpolate_path(from, to) {
            Ok(interpolator) => PathPlan::Morph(interpolator),
            Err(err) => {
                warn!(error = %err, "path interpolation unavailable, snapping to target");
                PathPlan::Snap(to.clone())
            }
        }
    }

    fn sample(interpolator: &Self::Interpolator, t: f64) -> Self {
        match interpolator {
            PathPlan::Morph(interpolator) => interpolator.sample(t),
            PathPlan::Snap(target) => target.clone(),
        }
    }

    fn can_animate(interpolator: &Self::Interpolator) -> bool {
        matches!(interpolator, PathPlan::Morph(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPhase {
    Animating,
    Settled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    Enter,
    Update,
}

/// One animated value owned by its call site.
///
/// Progress is driven from outside through [`Transition::advance`] or
/// [`Transition::set_progress`]; nothing here owns a clock.
#[derive(Debug, Clone)]
pub struct Transition<T: Animatable> {
    from: T,
    to: T,
    interpolator: T::Interpolator,
    driver: CurveDriver,
    phase: TransitionPhase,
    kind: TransitionKind,
    config: TransitionConfig,
}

pub type PathTransition = Transition<String>;

impl<T: Animatable> Transition<T> {
    /// Starts an enter transition from `enter_from`, or settles at `current`.
    #[must_use]
    pub fn initialize(current: T, enter_from: Option<T>, config: TransitionConfig) -> Self {
        match enter_from {
            Some(from) => Self::start(from, current, TransitionKind::Enter, config),
            None => Self {
                interpolator: T::interpolator(&current, &current),
                from: current.clone(),
                to: current,
                driver: CurveDriver::new(config.update),
                phase: TransitionPhase::Settled,
                kind: TransitionKind::Enter,
                config,
            },
        }
    }

    fn start(from: T, to: T, kind: TransitionKind, config: TransitionConfig) -> Self {
        let curve = match kind {
            TransitionKind::Enter => config.enter,
            TransitionKind::Update => config.update,
        };
        let interpolator = T::interpolator(&from, &to);
        let driver = CurveDriver::new(curve);
        let phase = if from == to || driver.is_finished() || !T::can_animate(&interpolator) {
            TransitionPhase::Settled
        } else {
            TransitionPhase::Animating
        };
        debug!(?kind, ?phase, curve = curve_name(curve), "transition started");
        Self {
            from,
            to,
            interpolator,
            driver,
            phase,
            kind,
            config,
        }
    }

    /// Retargets the transition; an in-flight animation continues from its live value.
    pub fn update(&mut self, target: T) {
        if target == self.to {
            return;
        }
        let from = if self.is_animating() {
            debug!(progress = self.progress(), "transition interrupted");
            self.sample()
        } else {
            self.to.clone()
        };
        *self = Self::start(from, target, TransitionKind::Update, self.config);
    }

    /// Advances the active curve by `delta_seconds` and returns the new progress.
    pub fn advance(&mut self, delta_seconds: f64) -> f64 {
        if self.is_animating() {
            self.driver.advance(delta_seconds);
            self.settle_if_finished();
        }
        self.progress()
    }

    /// Drives progress manually; values `>= 1` settle the transition.
    pub fn set_progress(&mut self, progress: f64) {
        if self.is_animating() {
            self.driver.set_progress(progress);
            self.settle_if_finished();
        }
    }

    fn settle_if_finished(&mut self) {
        if self.driver.is_finished() {
            trace!(kind = ?self.kind, "transition settled");
            self.phase = TransitionPhase::Settled;
        }
    }

    /// Current value: `from` before any progress, exactly the target once settled.
    #[must_use]
    pub fn sample(&self) -> T {
        let progress = self.progress();
        if progress >= 1.0 {
            self.to.clone()
        } else if progress <= 0.0 {
            self.from.clone()
        } else {
            T::sample(&self.interpolator, progress)
        }
    }

    #[must_use]
    pub fn progress(&self) -> f64 {
        match self.phase {
            TransitionPhase::Settled => 1.0,
            TransitionPhase::Animating => self.driver.progress(),
        }
    }

    #[must_use]
    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    #[must_use]
    pub fn kind(&self) -> TransitionKind {
        self.kind
    }

    #[must_use]
    pub fn target(&self) -> &T {
        &self.to
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.phase == TransitionPhase::Animating
    }

    #[must_use]
    pub fn config(&self) -> TransitionConfig {
        self.config
    }
}

fn curve_name(curve: TransitionCurve) -> &'static str {
    match curve {
        TransitionCurve::Spring(_) => "spring",
        TransitionCurve::Timing(_) => "timing",
    }
}
