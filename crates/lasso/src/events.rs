//! Per-frame notifications for presentation collaborators.
//!
//! Producers push during a tick; the owner drains once per frame. Nothing is
//! delivered re-entrantly.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::effects::EffectKind;
use crate::entity::EntityId;

/// Identifies one active pointer gesture.
pub type PointerId = u32;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    LineDrawingStarted {
        pointer: PointerId,
        position: Vector2<f64>,
    },
    LineDrawingEnded {
        pointer: PointerId,
    },
    /// A loop captured at least one entity.
    LoopCompleted {
        pointer: PointerId,
        captured: usize,
        multiplier: f64,
        score: i64,
    },
    /// A wrong-state capture ended the stroke early.
    StrokeBroken {
        pointer: PointerId,
    },
    EntitySpawned {
        id: EntityId,
        parent: Option<EntityId>,
    },
    EntityDefeated {
        id: EntityId,
        position: Vector2<f64>,
    },
    BossSpawned {
        id: EntityId,
    },
    BossDefeated {
        id: EntityId,
    },
    EffectStarted {
        effect: EffectKind,
        duration: f64,
    },
    EffectEnded {
        effect: EffectKind,
    },
}

#[derive(Clone, Debug, Default)]
pub struct EventQueue {
    events: Vec<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take every queued event in push order.
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GameEvent> {
        self.events.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
