//! Time-limited world effects as explicit, owned state.
//!
//! Every effect is an expiry checked once per tick; cancelling is clearing the
//! state early. Nothing blocks or sleeps.

use serde::{Deserialize, Serialize};

use crate::events::{EventQueue, GameEvent};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    SlowTime,
    Ghost,
    DecayPause,
    Bonus,
}

/// Scales the simulation clock for a real-time duration, then restores 1.0.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeScaleController {
    active_scale: f64,
    /// Remaining real (unscaled) seconds.
    remaining: f64,
}

impl Default for TimeScaleController {
    fn default() -> Self {
        Self {
            active_scale: 1.0,
            remaining: 0.0,
        }
    }
}

impl TimeScaleController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or overwrite) a scaled period.
    pub fn apply(&mut self, scale: f64, duration: f64) {
        if !scale.is_finite() || scale < 0.0 || duration.is_nan() || duration <= 0.0 {
            return;
        }
        self.active_scale = scale;
        self.remaining = duration;
    }

    pub fn cancel(&mut self) {
        *self = Self::default();
    }

    #[inline]
    pub fn scale(&self) -> f64 {
        self.active_scale
    }

    #[inline]
    pub fn remaining(&self) -> f64 {
        self.remaining
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    /// Advance by `real_dt` and return the scaled simulation delta. A period
    /// ending mid-step contributes its scaled part; the rest runs at 1.0.
    pub fn advance(&mut self, real_dt: f64) -> f64 {
        if real_dt <= 0.0 {
            return 0.0;
        }
        if !self.is_active() {
            return real_dt;
        }
        let scaled_part = real_dt.min(self.remaining);
        self.remaining -= scaled_part;
        let out = scaled_part * self.active_scale + (real_dt - scaled_part);
        if self.remaining <= 0.0 {
            self.cancel();
        }
        out
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Bonus {
    amount: f64,
    until: f64,
}

/// World-wide scheduled effects. Expiries other than the time scale are in
/// simulation time.
#[derive(Clone, Debug, Default)]
pub struct Effects {
    pub time_scale: TimeScaleController,
    ghost_until: Option<f64>,
    decay_paused_until: Option<f64>,
    bonus: Option<Bonus>,
}

impl Effects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slow_time(&mut self, scale: f64, duration: f64, events: &mut EventQueue) {
        self.time_scale.apply(scale, duration);
        events.push(GameEvent::EffectStarted {
            effect: EffectKind::SlowTime,
            duration,
        });
    }

    pub fn start_ghost(&mut self, now: f64, duration: f64, events: &mut EventQueue) {
        self.ghost_until = Some(now + duration);
        events.push(GameEvent::EffectStarted {
            effect: EffectKind::Ghost,
            duration,
        });
    }

    pub fn pause_decay(&mut self, now: f64, duration: f64, events: &mut EventQueue) {
        self.decay_paused_until = Some(now + duration);
        events.push(GameEvent::EffectStarted {
            effect: EffectKind::DecayPause,
            duration,
        });
    }

    pub fn set_bonus(&mut self, now: f64, amount: f64, duration: f64, events: &mut EventQueue) {
        self.bonus = Some(Bonus {
            amount,
            until: now + duration,
        });
        events.push(GameEvent::EffectStarted {
            effect: EffectKind::Bonus,
            duration,
        });
    }

    #[inline]
    pub fn is_ghost(&self, now: f64) -> bool {
        matches!(self.ghost_until, Some(t) if now < t)
    }

    #[inline]
    pub fn is_decay_paused(&self, now: f64) -> bool {
        matches!(self.decay_paused_until, Some(t) if now < t)
    }

    /// Active additive combo bonus at `now` (0 when none).
    #[inline]
    pub fn bonus_multiplier(&self, now: f64) -> f64 {
        match self.bonus {
            Some(b) if now < b.until => b.amount,
            _ => 0.0,
        }
    }

    /// Advance the time scale by `real_dt` and return the simulation delta.
    pub fn advance_clock(&mut self, real_dt: f64, events: &mut EventQueue) -> f64 {
        let was_active = self.time_scale.is_active();
        let dt = self.time_scale.advance(real_dt);
        if was_active && !self.time_scale.is_active() {
            events.push(GameEvent::EffectEnded {
                effect: EffectKind::SlowTime,
            });
        }
        dt
    }

    /// Clear every sim-time effect whose expiry has passed.
    pub fn expire(&mut self, now: f64, events: &mut EventQueue) {
        if matches!(self.ghost_until, Some(t) if now >= t) {
            self.ghost_until = None;
            events.push(GameEvent::EffectEnded {
                effect: EffectKind::Ghost,
            });
        }
        if matches!(self.decay_paused_until, Some(t) if now >= t) {
            self.decay_paused_until = None;
            events.push(GameEvent::EffectEnded {
                effect: EffectKind::DecayPause,
            });
        }
        if matches!(self.bonus, Some(b) if now >= b.until) {
            self.bonus = None;
            events.push(GameEvent::EffectEnded {
                effect: EffectKind::Bonus,
            });
        }
    }

    /// Cancel everything at once (level restart).
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
