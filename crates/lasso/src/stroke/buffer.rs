//! Bounded, time-decaying point buffer for one stroke.

use std::collections::VecDeque;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use super::scan::find_crossing_with;
use crate::cfg::{StrokeCfg, RETAIN_RECENT};

/// One sampled pointer position.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrokePoint {
    pub position: Vector2<f64>,
    pub timestamp: f64,
    /// False once the point was consumed by a loop; it can no longer anchor a crossing.
    pub valid_for_loop: bool,
}

/// Ring buffer of stroke points.
///
/// Invariants:
/// - `len() <= cfg.max_length`.
/// - Points are in arrival order (oldest at index 0).
/// - Once dead, the buffer ignores appends.
#[derive(Clone, Debug)]
pub struct StrokeBuffer {
    points: VecDeque<StrokePoint>,
    cfg: StrokeCfg,
    dead: bool,
}

impl StrokeBuffer {
    pub fn new(cfg: StrokeCfg) -> Self {
        Self {
            points: VecDeque::with_capacity(cfg.max_length),
            cfg,
            dead: false,
        }
    }

    /// Append a sample. Returns false when the buffer is dead or the point is
    /// within `drawing_threshold` of the previous one.
    pub fn append(&mut self, position: Vector2<f64>, time: f64) -> bool {
        if self.dead {
            return false;
        }
        if let Some(last) = self.points.back() {
            if (position - last.position).norm() < self.cfg.drawing_threshold {
                return false;
            }
        }
        while self.points.len() >= self.cfg.max_length.max(1) {
            self.points.pop_front();
        }
        self.points.push_back(StrokePoint {
            position,
            timestamp: time,
            valid_for_loop: true,
        });
        true
    }

    /// Drop the leading run of points older than `fade_duration` at `now`.
    /// Returns the number of evicted points; marks the buffer dead if that
    /// leaves two or fewer.
    pub fn evict_expired(&mut self, now: f64) -> usize {
        let mut removed = 0;
        while let Some(front) = self.points.front() {
            if now - front.timestamp > self.cfg.fade_duration {
                self.points.pop_front();
                removed += 1;
            } else {
                break;
            }
        }
        if removed > 0 && self.points.len() <= 2 {
            self.dead = true;
        }
        removed
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Mark dead immediately (stroke broken or released too short).
    pub fn kill(&mut self) {
        self.dead = true;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn last_position(&self) -> Option<Vector2<f64>> {
        self.points.back().map(|p| p.position)
    }

    pub fn points(&self) -> impl ExactSizeIterator<Item = &StrokePoint> + '_ {
        self.points.iter()
    }

    pub fn positions(&self) -> Vec<Vector2<f64>> {
        self.points.iter().map(|p| p.position).collect()
    }

    pub fn valid_flags(&self) -> Vec<bool> {
        self.points.iter().map(|p| p.valid_for_loop).collect()
    }

    #[inline]
    pub fn cfg(&self) -> &StrokeCfg {
        &self.cfg
    }

    /// Crossing index for the newest segment, if any.
    pub fn find_crossing(&self) -> Option<usize> {
        find_crossing_with(
            self.points.len(),
            |i| self.points[i].position,
            |i| self.points[i].valid_for_loop,
        )
    }

    /// Points `[from ..= end]` as a closed polygon.
    pub fn loop_polygon(&self, from: usize) -> Vec<Vector2<f64>> {
        self.points.range(from.min(self.points.len())..).map(|p| p.position).collect()
    }

    /// Retire points after a valid loop: walk backward from just before the
    /// `RETAIN_RECENT` newest points, stopping at the first already-retired one.
    /// Returns how many points were retired.
    pub fn invalidate_consumed(&mut self) -> usize {
        let count = self.points.len();
        if count <= RETAIN_RECENT {
            return 0;
        }
        let mut retired = 0;
        for p in self.points.range_mut(..count - RETAIN_RECENT).rev() {
            if !p.valid_for_loop {
                break;
            }
            p.valid_for_loop = false;
            retired += 1;
        }
        retired
    }
}
