//! Curated internal API for binaries and benches (UNSTABLE).
//!
//! Important
//! - This is not a public API. Breaking changes are allowed and expected.
//! - Prefer these re-exports over reaching into submodules.

// Geometry
pub use crate::geom::{
    area, contains_point, is_valid_loop, orientation, segments_intersect, select_inside,
    signed_area, Orientation,
};
// Stroke capture and loop detection
pub use crate::stroke::{find_crossing, Stroke, StrokeBuffer, StrokeEvent, StrokePoint};
// Capture resolution
pub use crate::entity::{
    Color, Entity, EntityId, EntityKind, GroupId, LoopContext, LoopResult, PickupEffect, Reaction,
    SiblingPolicy, World,
};
pub use crate::resolve::{dedup_siblings, dispatch, resolve, select, Resolution};
// Scoring, effects, events
pub use crate::combo::{ComboState, ComboTracker};
pub use crate::effects::{EffectKind, Effects, TimeScaleController};
pub use crate::events::{EventQueue, GameEvent, PointerId};
// Configuration
pub use crate::cfg::{ComboCfg, ConfigError, LassoCfg, StrokeCfg, MIN_FADE_DURATION, MIN_MAX_LENGTH};
// Session and synthetic input
pub use crate::session::Session;
pub use crate::synth::{lasso_stroke, target_field, LassoShape, ReplayToken as LassoReplay};
