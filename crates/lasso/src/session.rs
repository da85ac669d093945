//! Session coordinator: one stroke per active pointer over a shared world.
//!
//! Frame order: input (`pointer_*`) → `update(real_dt)` → `drain_events()`.
//! `update` advances the clock through the time scale, expires effects, then
//! ticks each stroke in pointer order.

use std::collections::BTreeMap;

use nalgebra::Vector2;

use crate::cfg::{ConfigError, LassoCfg};
use crate::effects::Effects;
use crate::entity::{Entity, EntityId, World};
use crate::events::{EventQueue, GameEvent, PointerId};
use crate::stroke::{Stroke, StrokeEvent};

#[derive(Clone, Debug)]
pub struct Session {
    cfg: LassoCfg,
    world: World,
    effects: Effects,
    events: EventQueue,
    strokes: BTreeMap<PointerId, Stroke>,
    now: f64,
    score: i64,
    loops: u32,
}

impl Session {
    pub fn new(cfg: LassoCfg) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            world: World::new(),
            effects: Effects::new(),
            events: EventQueue::new(),
            strokes: BTreeMap::new(),
            now: 0.0,
            score: 0,
            loops: 0,
        })
    }

    #[inline]
    pub fn cfg(&self) -> &LassoCfg {
        &self.cfg
    }

    /// Simulation time (seconds, scaled).
    #[inline]
    pub fn now(&self) -> f64 {
        self.now
    }

    #[inline]
    pub fn score(&self) -> i64 {
        self.score
    }

    /// Validated loops across all strokes so far.
    #[inline]
    pub fn loops(&self) -> u32 {
        self.loops
    }

    #[inline]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[inline]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[inline]
    pub fn effects(&self) -> &Effects {
        &self.effects
    }

    #[inline]
    pub fn effects_mut(&mut self) -> &mut Effects {
        &mut self.effects
    }

    /// Register an entity and announce it.
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let is_boss = entity.is_boss();
        let id = self.world.register(entity);
        self.events.push(GameEvent::EntitySpawned { id, parent: None });
        if is_boss {
            self.events.push(GameEvent::BossSpawned { id });
        }
        id
    }

    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        self.world.unregister(id)
    }

    /// Start a stroke; an existing stroke on the same pointer is replaced.
    pub fn pointer_down(&mut self, pointer: PointerId, position: Vector2<f64>) {
        let mut stroke = Stroke::new(&self.cfg);
        stroke.append(position, self.now);
        if let Some(old) = self.strokes.insert(pointer, stroke) {
            tracing::debug!(pointer, "stroke replaced by new pointer-down");
            if old.is_drawing() {
                self.events.push(GameEvent::LineDrawingEnded { pointer });
            }
        }
        self.events
            .push(GameEvent::LineDrawingStarted { pointer, position });
    }

    /// Feed a sample for `pointer` at the current sim time.
    pub fn pointer_move(&mut self, pointer: PointerId, position: Vector2<f64>) -> bool {
        match self.strokes.get_mut(&pointer) {
            Some(stroke) => stroke.append(position, self.now),
            None => false,
        }
    }

    pub fn pointer_up(&mut self, pointer: PointerId) {
        if let Some(stroke) = self.strokes.get_mut(&pointer) {
            if stroke.is_drawing() {
                stroke.release();
                self.events.push(GameEvent::LineDrawingEnded { pointer });
            }
        }
    }

    /// Advance one frame. Returns the non-idle stroke events of this frame.
    pub fn update(&mut self, real_dt: f64) -> Vec<(PointerId, StrokeEvent)> {
        let dt = self.effects.advance_clock(real_dt, &mut self.events);
        self.now += dt;
        self.effects.expire(self.now, &mut self.events);

        let mut out = Vec::new();
        let mut ended = Vec::new();
        for (&pointer, stroke) in self.strokes.iter_mut() {
            let was_drawing = stroke.is_drawing();
            let ev = stroke.tick(self.now, &mut self.world, &mut self.effects, &mut self.events);
            match &ev {
                StrokeEvent::Idle => continue,
                StrokeEvent::PointAdded => {}
                StrokeEvent::LoopDetected {
                    captured,
                    multiplier,
                    broken,
                    ..
                } => {
                    let gained: i64 = captured.iter().map(|r| r.score_delta).sum();
                    self.score += gained;
                    self.loops += 1;
                    // Empty captures give no feedback.
                    if !captured.is_empty() {
                        self.events.push(GameEvent::LoopCompleted {
                            pointer,
                            captured: captured.len(),
                            multiplier: *multiplier,
                            score: gained,
                        });
                    }
                    if *broken {
                        self.events.push(GameEvent::StrokeBroken { pointer });
                        if was_drawing {
                            self.events.push(GameEvent::LineDrawingEnded { pointer });
                        }
                    }
                }
                StrokeEvent::StrokeEnded => {
                    if was_drawing {
                        self.events.push(GameEvent::LineDrawingEnded { pointer });
                    }
                    ended.push(pointer);
                }
            }
            out.push((pointer, ev));
        }
        for pointer in ended {
            self.strokes.remove(&pointer);
        }
        out
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    #[inline]
    pub fn stroke(&self, pointer: PointerId) -> Option<&Stroke> {
        self.strokes.get(&pointer)
    }

    #[inline]
    pub fn active_strokes(&self) -> usize {
        self.strokes.len()
    }

    /// Combo multiplier of the stroke on `pointer`, for HUD display.
    pub fn current_multiplier(&self, pointer: PointerId) -> Option<f64> {
        self.strokes.get(&pointer).map(|s| s.combo().current_multiplier())
    }

    /// Level restart: drop strokes, entities and effects; keep config.
    pub fn reset(&mut self) {
        self.world = World::new();
        self.effects.clear();
        self.events = EventQueue::new();
        self.strokes.clear();
        self.now = 0.0;
        self.score = 0;
        self.loops = 0;
    }
}
