//! Capturable entities, their capture reactions, and the world registry.
//!
//! Purpose
//! - `EntityKind` is a closed set of reactions dispatched by `match`, so the
//!   resolution loop stays exhaustive.
//! - `World` owns entity lifetime; the core only reads positions and runs
//!   `Entity::handle_looped`.
//! - Sibling groups (coin faces) carry a tie-break `SiblingPolicy` used when
//!   more than one member is captured at once.

mod react;
mod world;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

pub use react::{LoopContext, Reaction};
pub use world::World;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupId(pub u32);

/// Linear RGBA.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const RED: Color = Color::rgb(1.0, 0.2, 0.2);
    pub const ORANGE: Color = Color::rgb(1.0, 0.6, 0.1);
    pub const GOLD: Color = Color::rgb(1.0, 0.84, 0.0);
    pub const CYAN: Color = Color::rgb(0.3, 0.9, 1.0);
    pub const PURPLE: Color = Color::rgb(0.7, 0.4, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

/// Outcome of one capture, for scoring and floating text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoopResult {
    pub score_delta: i64,
    /// Empty means scoring-only (nothing to display).
    pub display_text: String,
    pub color: Color,
    pub position: Vector2<f64>,
}

impl LoopResult {
    pub fn new(
        score_delta: i64,
        display_text: impl Into<String>,
        color: Color,
        position: Vector2<f64>,
    ) -> Self {
        Self {
            score_delta,
            display_text: display_text.into(),
            color,
            position,
        }
    }

    #[inline]
    pub fn has_display(&self) -> bool {
        !self.display_text.is_empty()
    }
}

/// World-wide effect applied by a one-shot pickup.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum PickupEffect {
    SlowTime { scale: f64, duration: f64 },
    Ghost { duration: f64 },
    PauseDecay { duration: f64 },
    Bonus { amount: f64, duration: f64 },
}

impl PickupEffect {
    pub fn label(&self) -> &'static str {
        match self {
            PickupEffect::SlowTime { .. } => "Slow-mo!",
            PickupEffect::Ghost { .. } => "Ghost!",
            PickupEffect::PauseDecay { .. } => "Freeze!",
            PickupEffect::Bonus { .. } => "Bonus!",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntityKind {
    /// Plain health pool.
    Health { health: i64, loop_damage: i64 },
    /// Health pool whose death flags the level and may clear the minions.
    Boss {
        health: i64,
        loop_damage: i64,
        clears_minions: bool,
    },
    /// One face of a two-state coin; capturing the armed face breaks the stroke.
    Coin { armed: bool, reward: i64 },
    /// Splits into two half-health children when dropping through 50 %.
    Splitter {
        health: i64,
        max_health: i64,
        loop_damage: i64,
        splits_left: u32,
        split_offset: f64,
    },
    /// Applies its effect once, then removes itself.
    Pickup { effect: PickupEffect },
}

/// Tie-break when several members of one sibling group are captured together.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiblingPolicy {
    /// Keep an inactive (unarmed) sibling; active ones drop out.
    #[default]
    KeepInactive,
    KeepActive,
    /// Keep the earliest registered sibling.
    KeepFirst,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub position: Vector2<f64>,
    pub kind: EntityKind,
    #[serde(default)]
    pub group: Option<GroupId>,
}

impl Entity {
    pub fn new(position: Vector2<f64>, kind: EntityKind) -> Self {
        Self {
            position,
            kind,
            group: None,
        }
    }

    pub fn health(position: Vector2<f64>, health: i64, loop_damage: i64) -> Self {
        Self::new(
            position,
            EntityKind::Health {
                health,
                loop_damage,
            },
        )
    }

    pub fn boss(position: Vector2<f64>, health: i64, loop_damage: i64) -> Self {
        Self::new(
            position,
            EntityKind::Boss {
                health,
                loop_damage,
                clears_minions: true,
            },
        )
    }

    pub fn coin(position: Vector2<f64>, group: GroupId, armed: bool, reward: i64) -> Self {
        Self::new(position, EntityKind::Coin { armed, reward }).with_group(group)
    }

    pub fn splitter(position: Vector2<f64>, health: i64, loop_damage: i64, splits: u32) -> Self {
        Self::new(
            position,
            EntityKind::Splitter {
                health,
                max_health: health,
                loop_damage,
                splits_left: splits,
                split_offset: 0.5,
            },
        )
    }

    pub fn pickup(position: Vector2<f64>, effect: PickupEffect) -> Self {
        Self::new(position, EntityKind::Pickup { effect })
    }

    pub fn with_group(mut self, group: GroupId) -> Self {
        self.group = Some(group);
        self
    }

    /// "Armed" state used by sibling tie-breaks; only coins can be active.
    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self.kind, EntityKind::Coin { armed: true, .. })
    }

    #[inline]
    pub fn is_boss(&self) -> bool {
        matches!(self.kind, EntityKind::Boss { .. })
    }

    /// Remaining health for health-bearing kinds.
    pub fn health_points(&self) -> Option<i64> {
        match self.kind {
            EntityKind::Health { health, .. }
            | EntityKind::Boss { health, .. }
            | EntityKind::Splitter { health, .. } => Some(health),
            EntityKind::Coin { .. } | EntityKind::Pickup { .. } => None,
        }
    }
}
