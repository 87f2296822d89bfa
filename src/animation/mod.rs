//! Path parsing, shape matching and externally-driven transitions.

pub mod curve;
pub mod interpolate;
pub mod path;
pub mod transition;

pub use curve::{
    CurveDriver, Easing, MAX_SPRING_SECONDS, SpringConfig, TimingConfig, TransitionConfig,
    TransitionCurve,
};
pub use interpolate::{PathInterpolator, interpolate_path};
pub use path::{PathData, Segment, Subpath};
pub use transition::{
    Animatable, PathPlan, PathTransition, Transition, TransitionKind, TransitionPhase,
};
