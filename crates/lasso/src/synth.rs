//! Synthetic lasso gestures (radial jitter + replay tokens).
//!
//! Model
//! - A lead-in point below the start, `samples` points around a circle, and a
//!   tail that cuts back across the lead-in. The only crossing is the closing one.
//! - Radial jitter only pulls samples inward: the circle stays star-shaped
//!   and inside the lead-in line, so nothing crosses early.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG.

use nalgebra::{Rotation2, Vector2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Fewest circle samples that still reach the scan window.
pub const MIN_SAMPLES: usize = 16;
/// Upper clamp for `LassoShape::radial_jitter`.
pub const MAX_RADIAL_JITTER: f64 = 0.1;

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    pub fn new(seed: u64, index: u64) -> Self {
        Self { seed, index }
    }

    /// Same seed, next draw.
    #[inline]
    pub fn next(self) -> Self {
        Self {
            index: self.index.wrapping_add(1),
            ..self
        }
    }

    #[inline]
    pub(crate) fn to_std_rng(self) -> StdRng {
        // SplitMix64-style mixing.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct LassoShape {
    pub center: Vector2<f64>,
    pub radius: f64,
    /// Circle samples; clamped to at least `MIN_SAMPLES`.
    pub samples: usize,
    /// Relative inward radial amplitude, clamped to `[0, MAX_RADIAL_JITTER]`.
    pub radial_jitter: f64,
    /// Seconds between samples.
    pub dt: f64,
    /// Rotate the whole gesture by a random phase.
    pub random_phase: bool,
}

impl Default for LassoShape {
    fn default() -> Self {
        Self {
            center: Vector2::zeros(),
            radius: 1.5,
            samples: 18,
            radial_jitter: 0.05,
            dt: 1.0 / 60.0,
            random_phase: true,
        }
    }
}

/// Draw one lasso as `(position, timestamp)` samples starting at t = 0.
///
/// The closing crossing happens on the last sample, against the segment
/// between the first two.
pub fn lasso_stroke(shape: &LassoShape, tok: ReplayToken) -> Vec<(Vector2<f64>, f64)> {
    let mut rng = tok.to_std_rng();
    let n = shape.samples.max(MIN_SAMPLES);
    let r = shape.radius.max(1e-6);
    let rj = shape.radial_jitter.clamp(0.0, MAX_RADIAL_JITTER);
    let delta = std::f64::consts::TAU / n as f64;
    let phase = if shape.random_phase {
        rng.gen::<f64>() * std::f64::consts::TAU
    } else {
        0.0
    };

    let mut local = Vec::with_capacity(n + 2);
    local.push(Vector2::new(r, -1.5 * r * delta.sin()));
    for k in 0..n {
        // The start sample joins the lead-in and stays on the circle.
        let u = if k == 0 { 0.0 } else { -rng.gen::<f64>() * rj };
        let (s, c) = (k as f64 * delta).sin_cos();
        local.push(Vector2::new(c, s) * r * (1.0 + u));
    }
    local.push(Vector2::new(1.3 * r, 0.0));

    let rot = Rotation2::new(phase);
    local
        .into_iter()
        .enumerate()
        .map(|(i, p)| (shape.center + rot * p, i as f64 * shape.dt))
        .collect()
}

/// `count` target positions on a jittered row-major grid with pitch `spacing`.
pub fn target_field(count: usize, spacing: f64, tok: ReplayToken) -> Vec<Vector2<f64>> {
    let mut rng = tok.to_std_rng();
    let cols = (count as f64).sqrt().ceil().max(1.0) as usize;
    let wiggle = 0.1 * spacing;
    (0..count)
        .map(|i| {
            let (row, col) = (i / cols, i % cols);
            let jitter = Vector2::new(
                rng.gen_range(-wiggle..=wiggle),
                rng.gen_range(-wiggle..=wiggle),
            );
            Vector2::new(col as f64 * spacing, row as f64 * spacing) + jitter
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfg::LassoCfg;
    use crate::effects::Effects;
    use crate::entity::{Entity, World};
    use crate::events::EventQueue;
    use crate::stroke::{Stroke, StrokeEvent};
    use nalgebra::vector;
    use proptest::prelude::*;

    fn run(samples: &[(Vector2<f64>, f64)], world: &mut World) -> Vec<(usize, usize)> {
        let mut stroke = Stroke::new(&LassoCfg::default());
        let mut fx = Effects::new();
        let mut q = EventQueue::new();
        let mut loops = Vec::new();
        for (i, (p, t)) in samples.iter().enumerate() {
            assert!(stroke.append(*p, *t), "sample {i} rejected");
            if let StrokeEvent::LoopDetected { captured, .. } = stroke.tick(*t, world, &mut fx, &mut q) {
                loops.push((i, captured.len()));
            }
        }
        loops
    }

    #[test]
    fn same_token_same_stroke() {
        let shape = LassoShape::default();
        let a = lasso_stroke(&shape, ReplayToken::new(5, 2));
        let b = lasso_stroke(&shape, ReplayToken::new(5, 2));
        let c = lasso_stroke(&shape, ReplayToken::new(5, 2).next());
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), shape.samples + 2);
    }

    #[test]
    fn sample_count_is_clamped() {
        let shape = LassoShape {
            samples: 3,
            ..LassoShape::default()
        };
        assert_eq!(lasso_stroke(&shape, ReplayToken::new(0, 0)).len(), MIN_SAMPLES + 2);
    }

    #[test]
    fn lasso_captures_its_center() {
        let center = vector![-4.0, 2.5];
        let mut world = World::new();
        let id = world.register(Entity::health(center, 100, 1));
        world.register(Entity::health(center + vector![10.0, 0.0], 100, 1));
        let shape = LassoShape {
            center,
            ..LassoShape::default()
        };
        let samples = lasso_stroke(&shape, ReplayToken::new(42, 0));
        let loops = run(&samples, &mut world);
        assert_eq!(loops, vec![(samples.len() - 1, 1)]);
        assert_eq!(world.get(id).and_then(|e| e.health_points()), Some(99));
    }

    #[test]
    fn targets_are_spread_out() {
        let pts = target_field(9, 5.0, ReplayToken::new(1, 0));
        assert_eq!(pts.len(), 9);
        for (i, a) in pts.iter().enumerate() {
            for b in &pts[i + 1..] {
                assert!((a - b).norm() > 3.0);
            }
        }
    }

    proptest! {
        #[test]
        fn exactly_one_loop_on_the_last_sample(
            seed in any::<u64>(),
            samples in 16usize..48,
            radius in 1.0f64..6.0,
            jitter in 0.0f64..0.2,
        ) {
            let shape = LassoShape {
                center: vector![1.0, -1.0],
                radius,
                samples,
                radial_jitter: jitter,
                ..LassoShape::default()
            };
            let pts = lasso_stroke(&shape, ReplayToken::new(seed, 0));
            let mut world = World::new();
            world.register(Entity::health(shape.center, 1000, 1));
            let loops = run(&pts, &mut world);
            prop_assert_eq!(loops, vec![(pts.len() - 1, 1)]);
        }
    }
}
