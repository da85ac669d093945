//! One pointer-down gesture: point capture, loop detection, and resolution.
//!
//! `append` queues samples; `tick` moves them into the buffer one at a time,
//! in arrival order, and scans right after each one:
//! 1. scan the newest segment against earlier valid segments;
//! 2. gate the candidate polygon by area (sub-threshold: no effect, no retirement);
//! 3. retire consumed points, select captured entities, bump the combo,
//!    dispatch `handle_looped`;
//! 4. after a loop, leave the rest of the queue for the next tick; otherwise
//!    continue with the next queued sample;
//! 5. evict faded points (skipped while decay is paused); the stroke ends
//!    once two or fewer remain.
//!
//! An empty capture still consumes the loop geometry but leaves the combo as is.

mod buffer;
mod scan;

use std::collections::VecDeque;

use nalgebra::Vector2;

pub use buffer::{StrokeBuffer, StrokePoint};
pub use scan::find_crossing;

use crate::cfg::LassoCfg;
use crate::combo::ComboTracker;
use crate::effects::Effects;
use crate::entity::{LoopResult, World};
use crate::events::EventQueue;
use crate::geom;
use crate::resolve;

/// What a tick produced.
#[derive(Clone, Debug, PartialEq)]
pub enum StrokeEvent {
    /// Nothing new this frame.
    Idle,
    PointAdded,
    /// A validated loop. `captured` may be empty: the geometry is still
    /// consumed, but the combo is untouched and `Session` emits no
    /// `LoopCompleted` for it.
    LoopDetected {
        polygon: Vec<Vector2<f64>>,
        captured: Vec<LoopResult>,
        multiplier: f64,
        /// A captured entity ended the stroke.
        broken: bool,
    },
    /// The owner should drop the stroke.
    StrokeEnded,
}

#[derive(Clone, Debug)]
pub struct Stroke {
    buffer: StrokeBuffer,
    combo: ComboTracker,
    min_area: f64,
    drawing: bool,
    /// Accepted samples not yet moved into the buffer.
    pending: VecDeque<(Vector2<f64>, f64)>,
    loops: u32,
}

impl Stroke {
    pub fn new(cfg: &LassoCfg) -> Self {
        Self {
            buffer: StrokeBuffer::new(cfg.stroke),
            combo: ComboTracker::new(cfg.combo),
            min_area: cfg.stroke.min_area,
            drawing: true,
            pending: VecDeque::new(),
            loops: 0,
        }
    }

    /// Queue one sampled position for the next `tick`. Ignored after release
    /// or death, and when within `drawing_threshold` of the previous sample.
    pub fn append(&mut self, position: Vector2<f64>, time: f64) -> bool {
        if !self.drawing || self.buffer.is_dead() {
            return false;
        }
        let last = self
            .pending
            .back()
            .map(|(p, _)| *p)
            .or_else(|| self.buffer.last_position());
        if last.is_some_and(|l| (position - l).norm() < self.buffer.cfg().drawing_threshold) {
            return false;
        }
        self.pending.push_back((position, time));
        true
    }

    /// Pointer released; the stroke keeps fading until dead.
    pub fn release(&mut self) {
        self.drawing = false;
        if self.buffer.len() + self.pending.len() < 3 {
            self.pending.clear();
            self.buffer.kill();
        }
    }

    /// Samples queued by `append` and not yet scanned.
    #[inline]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    #[inline]
    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.buffer.is_dead()
    }

    #[inline]
    pub fn buffer(&self) -> &StrokeBuffer {
        &self.buffer
    }

    #[inline]
    pub fn combo(&self) -> &ComboTracker {
        &self.combo
    }

    /// Validated loops drawn by this stroke.
    #[inline]
    pub fn loops(&self) -> u32 {
        self.loops
    }

    pub fn tick(
        &mut self,
        now: f64,
        world: &mut World,
        effects: &mut Effects,
        events: &mut EventQueue,
    ) -> StrokeEvent {
        if self.buffer.is_dead() {
            return StrokeEvent::StrokeEnded;
        }
        self.combo.set_bonus(effects.bonus_multiplier(now));
        let mut event = StrokeEvent::Idle;
        while let Some((position, time)) = self.pending.pop_front() {
            if !self.buffer.append(position, time) {
                continue;
            }
            if let Some(found) = self.detect(now, world, effects, events) {
                event = found;
                break;
            }
            event = StrokeEvent::PointAdded;
        }
        if !effects.is_decay_paused(now) {
            self.buffer.evict_expired(now);
        }
        if self.buffer.is_dead() && matches!(event, StrokeEvent::Idle | StrokeEvent::PointAdded) {
            tracing::info!(loops = self.loops, "stroke faded out");
            return StrokeEvent::StrokeEnded;
        }
        event
    }

    fn detect(
        &mut self,
        now: f64,
        world: &mut World,
        effects: &mut Effects,
        events: &mut EventQueue,
    ) -> Option<StrokeEvent> {
        let index = self.buffer.find_crossing()?;
        let polygon = self.buffer.loop_polygon(index);
        let area = geom::area(&polygon);
        if !geom::is_valid_loop(&polygon, self.min_area) {
            tracing::debug!(index, area, min_area = self.min_area, "loop below minimum area");
            return None;
        }
        let retired = self.buffer.invalidate_consumed();
        let selected = resolve::select(&polygon, world);
        let multiplier = self.combo.on_loop_completed(selected.len());
        let resolution = resolve::dispatch(&selected, multiplier, now, world, effects, events);
        self.loops += 1;
        if resolution.broke {
            self.pending.clear();
            self.buffer.kill();
            self.drawing = false;
        }
        tracing::info!(
            index,
            area,
            retired,
            captured = resolution.results.len(),
            skipped = resolution.skipped,
            multiplier,
            score = resolution.score(),
            broken = resolution.broke,
            "loop resolved"
        );
        Some(StrokeEvent::LoopDetected {
            polygon,
            captured: resolution.results,
            multiplier,
            broken: resolution.broke,
        })
    }
}
