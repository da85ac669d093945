//! Core of the draw-a-loop game: stroke capture, loop detection, and capture resolution.
//!
//! Pipeline (one tick, strictly in arrival order)
//! - `stroke::StrokeBuffer` keeps the bounded, fading point sequence of one stroke.
//! - `stroke::find_crossing` walks earlier segments backward and reports the
//!   first one the newest segment crosses.
//! - `geom::area` gates the candidate loop by enclosed area.
//! - `entity::World::entities_inside` picks captured entities (ray casting).
//! - `resolve::dispatch` runs each entity's capture reaction and aggregates results.
//! - `combo::ComboTracker` scales rewards with consecutive loops.
//! - `session::Session` owns the world and one stroke per pointer.
//!
//! API Policy
//! - This crate is project-internal. There is no stable public API.
//! - Prefer `api` re-exports from binaries and benches.

pub mod api;
pub mod cfg;
pub mod combo;
pub mod effects;
pub mod entity;
pub mod events;
pub mod geom;
pub mod resolve;
pub mod session;
pub mod stroke;
pub mod synth;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use nalgebra::Vector2 as Vec2;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::cfg::{ComboCfg, ConfigError, LassoCfg, StrokeCfg};
    pub use crate::combo::{ComboState, ComboTracker};
    pub use crate::effects::{EffectKind, Effects, TimeScaleController};
    pub use crate::entity::{
        Color, Entity, EntityId, EntityKind, GroupId, LoopResult, PickupEffect, SiblingPolicy,
        World,
    };
    pub use crate::events::{EventQueue, GameEvent, PointerId};
    pub use crate::session::Session;
    pub use crate::stroke::{Stroke, StrokeEvent};
    pub use nalgebra::Vector2 as Vec2;
}
