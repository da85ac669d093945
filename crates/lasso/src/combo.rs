//! Consecutive-loop combo and score multiplier.
//!
//! `multiplier = 1 + (consecutive_loops - 1) * per_loop_rate + bonus_multiplier`,
//! with the `(n - 1)` term saturating at zero before the first loop.

use serde::{Deserialize, Serialize};

use crate::cfg::ComboCfg;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ComboState {
    pub consecutive_loops: u32,
    /// Additive term owned by time-limited power-ups.
    pub bonus_multiplier: f64,
}

impl ComboState {
    #[inline]
    pub fn multiplier(&self, per_loop_rate: f64) -> f64 {
        1.0 + f64::from(self.consecutive_loops.saturating_sub(1)) * per_loop_rate
            + self.bonus_multiplier
    }
}

/// Per-stroke combo counter.
#[derive(Clone, Debug, Default)]
pub struct ComboTracker {
    state: ComboState,
    cfg: ComboCfg,
}

impl ComboTracker {
    pub fn new(cfg: ComboCfg) -> Self {
        Self {
            state: ComboState::default(),
            cfg,
        }
    }

    /// Record a validated loop and return the multiplier to apply to it.
    ///
    /// An empty capture neither increments nor resets the combo.
    pub fn on_loop_completed(&mut self, captured_count: usize) -> f64 {
        if captured_count > 0 {
            self.state.consecutive_loops = self.state.consecutive_loops.saturating_add(1);
        }
        self.current_multiplier()
    }

    #[inline]
    pub fn current_multiplier(&self) -> f64 {
        self.state.multiplier(self.cfg.per_loop_rate)
    }

    pub fn set_bonus(&mut self, bonus: f64) {
        self.state.bonus_multiplier = bonus;
    }

    #[inline]
    pub fn state(&self) -> ComboState {
        self.state
    }

    #[inline]
    pub fn consecutive_loops(&self) -> u32 {
        self.state.consecutive_loops
    }

    pub fn reset(&mut self) {
        self.state = ComboState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker(rate: f64) -> ComboTracker {
        ComboTracker::new(ComboCfg {
            per_loop_rate: rate,
        })
    }

    #[test]
    fn first_loop_is_unscaled() {
        let mut c = tracker(0.1);
        assert!((c.current_multiplier() - 1.0).abs() < 1e-12);
        let m = c.on_loop_completed(2);
        assert_eq!(c.consecutive_loops(), 1);
        assert!((m - 1.0).abs() < 1e-12);
    }

    #[test]
    fn consecutive_loops_scale_linearly() {
        let mut c = tracker(0.25);
        c.on_loop_completed(1);
        c.on_loop_completed(1);
        let m = c.on_loop_completed(3);
        assert_eq!(c.consecutive_loops(), 3);
        assert!((m - 1.5).abs() < 1e-12);
    }

    #[test]
    fn empty_capture_neither_increments_nor_resets() {
        let mut c = tracker(0.1);
        c.on_loop_completed(1);
        c.on_loop_completed(1);
        let before = c.state();
        let m = c.on_loop_completed(0);
        assert_eq!(c.state(), before);
        assert!((m - 1.1).abs() < 1e-12);
    }

    #[test]
    fn bonus_is_additive_and_removable() {
        let mut c = tracker(0.1);
        c.set_bonus(0.5);
        assert!((c.current_multiplier() - 1.5).abs() < 1e-12);
        c.on_loop_completed(1);
        c.on_loop_completed(1);
        assert!((c.current_multiplier() - 1.6).abs() < 1e-12);
        c.set_bonus(0.0);
        assert!((c.current_multiplier() - 1.1).abs() < 1e-12);
        c.reset();
        assert_eq!(c.consecutive_loops(), 0);
    }
}
