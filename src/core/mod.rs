pub mod arc;
pub mod path_builder;
pub mod scale;
pub mod serializable_scale;
pub mod ticks;
pub mod types;

pub use arc::{Arc, ArcSeriesInput, calculate_arc_data, calculate_arc_series, polar_to_cartesian};
pub use path_builder::{arc_path, area_path, bar_path, line_path};
pub use scale::{BandAnchor, LOG_EPSILON, Scale, ScaleKind, ScaleOptions};
pub use serializable_scale::{
    SERIALIZABLE_SCALE_JSON_SCHEMA_V1, SERIALIZABLE_SCALE_VERSION, SerializableScale,
    SerializableScaleJsonContractV1,
};
pub use ticks::{
    DEFAULT_TICK_COUNT, Tick, TickPredicate, TickRequest, TickSource, closing_edge_tick,
    generate_ticks, thin_ticks_by_spacing,
};
pub use types::{Point, Rect};
