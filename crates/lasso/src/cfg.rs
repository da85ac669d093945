//! Stroke and scoring configuration.
//!
//! Policy
//! - Values the detector depends on structurally (scan window, retention
//!   window, collinearity tolerance) are fixed crate constants.
//! - Gameplay tuning lives in `LassoCfg` and is validated once, up front.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The scanner stays idle until the stroke holds this many points.
pub(crate) const MIN_POINTS_FOR_SCAN: usize = 15;
/// Candidates start at `count - SCAN_TAIL_SKIP`; the 13 newest points never anchor a crossing.
pub(crate) const SCAN_TAIL_SKIP: usize = 14;
/// Newest points left valid after a loop so they can close the next one.
pub(crate) const RETAIN_RECENT: usize = 10;
/// Orientation values below this magnitude count as collinear.
pub(crate) const ORIENT_EPS: f64 = 1e-9;

/// Lower bound for `StrokeCfg::max_length`.
pub const MIN_MAX_LENGTH: usize = 150;
/// Lower bound (seconds) for `StrokeCfg::fade_duration`.
pub const MIN_FADE_DURATION: f64 = 1.0;

/// Per-stroke buffer and loop gate settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeCfg {
    /// Ring capacity; the oldest point is dropped on overflow.
    pub max_length: usize,
    /// Points older than this (seconds, sim time) fade out.
    pub fade_duration: f64,
    /// Minimum distance from the previous point for an append to count.
    pub drawing_threshold: f64,
    /// Loops must enclose strictly more than this area.
    pub min_area: f64,
}

impl Default for StrokeCfg {
    fn default() -> Self {
        Self {
            max_length: MIN_MAX_LENGTH,
            fade_duration: 1.5,
            drawing_threshold: 0.1,
            min_area: 1.0,
        }
    }
}

/// Combo scaling.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComboCfg {
    pub per_loop_rate: f64,
}

impl Default for ComboCfg {
    fn default() -> Self {
        Self { per_loop_rate: 0.1 }
    }
}

/// Top-level configuration handed to `Session` and `Stroke`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LassoCfg {
    pub stroke: StrokeCfg,
    pub combo: ComboCfg,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("max_length {got} is below the minimum of {min}")]
    MaxLengthTooSmall { got: usize, min: usize },
    #[error("fade_duration {got}s is below the minimum of {min}s")]
    FadeTooShort { got: f64, min: f64 },
    #[error("drawing_threshold must be finite and non-negative (got {0})")]
    BadThreshold(f64),
    #[error("min_area must be finite and non-negative (got {0})")]
    BadMinArea(f64),
    #[error("per_loop_rate must be finite and non-negative (got {0})")]
    BadRate(f64),
}

#[inline]
fn finite_non_negative(x: f64) -> bool {
    x.is_finite() && x >= 0.0
}

impl LassoCfg {
    /// Check bounds; call once before constructing strokes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.stroke;
        if s.max_length < MIN_MAX_LENGTH {
            return Err(ConfigError::MaxLengthTooSmall {
                got: s.max_length,
                min: MIN_MAX_LENGTH,
            });
        }
        if s.fade_duration.is_nan() || s.fade_duration < MIN_FADE_DURATION {
            return Err(ConfigError::FadeTooShort {
                got: s.fade_duration,
                min: MIN_FADE_DURATION,
            });
        }
        if !finite_non_negative(s.drawing_threshold) {
            return Err(ConfigError::BadThreshold(s.drawing_threshold));
        }
        if !finite_non_negative(s.min_area) {
            return Err(ConfigError::BadMinArea(s.min_area));
        }
        if !finite_non_negative(self.combo.per_loop_rate) {
            return Err(ConfigError::BadRate(self.combo.per_loop_rate));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(LassoCfg::default().validate(), Ok(()));
    }

    #[test]
    fn short_buffer_and_fade_are_rejected() {
        let mut cfg = LassoCfg::default();
        cfg.stroke.max_length = 40;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::MaxLengthTooSmall { got: 40, min: 150 })
        );
        let mut cfg = LassoCfg::default();
        cfg.stroke.fade_duration = 0.5;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::FadeTooShort { .. })
        ));
        cfg.stroke.fade_duration = f64::NAN;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::FadeTooShort { .. })
        ));
    }

    #[test]
    fn negative_rate_is_rejected() {
        let mut cfg = LassoCfg::default();
        cfg.combo.per_loop_rate = -0.5;
        assert_eq!(cfg.validate(), Err(ConfigError::BadRate(-0.5)));
    }
}
