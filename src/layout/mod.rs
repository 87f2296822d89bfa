//! Label placement run once per frame, after scales and geometry are known.

pub mod label_collision;

pub use label_collision::{
    LabelAdjustment, LabelBox, LabelCollisionConfig, LabelResolution, LabelSide,
    resolve_label_collisions,
};
