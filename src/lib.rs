//! chart-motion: geometry and animation core for interactive charts.
//!
//! Scales map data to pixels, tick and arc builders turn scales into axis and
//! pie geometry, the label resolver keeps scrub labels apart, and transitions
//! animate path strings between data updates. Everything is pure over its
//! inputs; hosts own the clock and the render loop.

pub mod animation;
pub mod core;
pub mod error;
pub mod layout;
pub mod telemetry;

pub use crate::animation::{PathTransition, Transition, TransitionConfig};
pub use crate::core::{Scale, ScaleKind, SerializableScale};
pub use crate::error::{ChartError, ChartResult};
