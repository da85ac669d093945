//! Recorded scenarios: entities plus pointer strokes, replayed through a `Session`.
//!
//! Strokes are sampled one point per frame at 60 Hz. A stroke starts at
//! `start_frame`, receives its remaining points on the following frames, and
//! is released on the frame after its last point unless `release` is false.
//! The run continues `settle_frames` past the last input so fading completes.

use anyhow::{bail, Context, Result};
use lasso::api::{
    Entity, EntityId, GameEvent, GroupId, LassoCfg, PointerId, Session, SiblingPolicy,
};
use lasso::Vec2;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const FRAME_DT: f64 = 1.0 / 60.0;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GroupPolicy {
    pub group: GroupId,
    pub policy: SiblingPolicy,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecordedStroke {
    pub pointer: PointerId,
    #[serde(default)]
    pub start_frame: u64,
    pub points: Vec<Vec2<f64>>,
    #[serde(default = "default_release")]
    pub release: bool,
}

fn default_release() -> bool {
    true
}

fn default_settle() -> u64 {
    120
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub config: Option<LassoCfg>,
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub policies: Vec<GroupPolicy>,
    #[serde(default)]
    pub strokes: Vec<RecordedStroke>,
    #[serde(default = "default_settle")]
    pub settle_frames: u64,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("reading scenario {}", path.display()))?;
        let scenario: Scenario = serde_json::from_slice(&bytes)
            .with_context(|| format!("parsing scenario {}", path.display()))?;
        scenario.check()?;
        Ok(scenario)
    }

    fn check(&self) -> Result<()> {
        for (i, s) in self.strokes.iter().enumerate() {
            if s.points.is_empty() {
                bail!("stroke {i} (pointer {}) has no points", s.pointer);
            }
        }
        Ok(())
    }

    fn last_input_frame(&self) -> u64 {
        self.strokes
            .iter()
            .map(|s| s.start_frame + s.points.len() as u64)
            .max()
            .unwrap_or(0)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FrameEvent {
    pub frame: u64,
    #[serde(flatten)]
    pub event: GameEvent,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FinalEntity {
    pub id: EntityId,
    #[serde(flatten)]
    pub entity: Entity,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Report {
    pub version: String,
    pub frames: u64,
    pub loops: u32,
    pub score: i64,
    pub boss_defeated: bool,
    pub events: Vec<FrameEvent>,
    pub entities: Vec<FinalEntity>,
}

/// Replay `scenario`; `cfg` overrides the scenario's own config.
pub fn run(scenario: &Scenario, cfg: Option<LassoCfg>) -> Result<Report> {
    let cfg = cfg.or(scenario.config).unwrap_or_default();
    let mut session = Session::new(cfg).context("invalid lasso config")?;
    for p in &scenario.policies {
        session.world_mut().set_group_policy(p.group, p.policy);
    }
    for e in &scenario.entities {
        session.spawn(e.clone());
    }

    let frames = scenario.last_input_frame() + 1 + scenario.settle_frames;
    let mut events = Vec::new();
    for frame in 0..frames {
        for s in &scenario.strokes {
            feed(&mut session, s, frame);
        }
        session.update(FRAME_DT);
        events.extend(
            session
                .drain_events()
                .into_iter()
                .map(|event| FrameEvent { frame, event }),
        );
    }

    tracing::info!(
        frames,
        loops = session.loops(),
        score = session.score(),
        events = events.len(),
        "scenario replayed"
    );
    Ok(Report {
        version: lasso::VERSION.to_string(),
        frames,
        loops: session.loops(),
        score: session.score(),
        boss_defeated: session.world().boss_defeated(),
        events,
        entities: session
            .world()
            .iter()
            .map(|(id, e)| FinalEntity {
                id,
                entity: e.clone(),
            })
            .collect(),
    })
}

fn feed(session: &mut Session, s: &RecordedStroke, frame: u64) {
    let Some(k) = frame.checked_sub(s.start_frame) else {
        return;
    };
    let k = k as usize;
    match s.points.get(k) {
        Some(&p) if k == 0 => session.pointer_down(s.pointer, p),
        Some(&p) => {
            session.pointer_move(s.pointer, p);
        }
        None if k == s.points.len() && s.release => session.pointer_up(s.pointer),
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lasso::api::{lasso_stroke, LassoReplay, LassoShape};
    use serde_json::json;
    use std::io::Write;

    fn lasso_points(center: Vec2<f64>, seed: u64) -> Vec<Vec2<f64>> {
        let shape = LassoShape {
            center,
            ..LassoShape::default()
        };
        lasso_stroke(&shape, LassoReplay::new(seed, 0))
            .into_iter()
            .map(|(p, _)| p)
            .collect()
    }

    fn write_json(value: &serde_json::Value) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(&serde_json::to_vec(value).unwrap()).unwrap();
        f
    }

    #[test]
    fn replays_a_lasso_over_a_target() {
        let points = lasso_points(Vec2::new(2.0, 2.0), 8);
        let file = write_json(&json!({
            "entities": [
                { "position": [2.0, 2.0], "kind": { "kind": "health", "health": 3, "loop_damage": 3 } },
                { "position": [9.0, 9.0], "kind": { "kind": "health", "health": 3, "loop_damage": 3 } }
            ],
            "strokes": [ { "pointer": 4, "points": points } ]
        }));
        let scenario = Scenario::load(file.path()).unwrap();
        let report = run(&scenario, None).unwrap();
        assert_eq!(report.loops, 1);
        assert_eq!(report.score, 3);
        assert_eq!(report.entities.len(), 1);
        assert_eq!(report.entities[0].entity.position, Vec2::new(9.0, 9.0));
        assert!(report.events.iter().any(|e| matches!(
            e.event,
            GameEvent::LoopCompleted { pointer: 4, captured: 1, .. }
        )));
        assert!(report
            .events
            .iter()
            .any(|e| matches!(e.event, GameEvent::EntityDefeated { .. })));
        // Released and fully faded within the settle window.
        assert!(report
            .events
            .iter()
            .any(|e| e.event == GameEvent::LineDrawingEnded { pointer: 4 }));
    }

    #[test]
    fn group_policy_is_applied() {
        let points = lasso_points(Vec2::zeros(), 1);
        let file = write_json(&json!({
            "entities": [
                { "position": [0.1, 0.0], "kind": { "kind": "coin", "armed": true, "reward": 5 }, "group": 2 },
                { "position": [-0.1, 0.0], "kind": { "kind": "coin", "armed": false, "reward": 5 }, "group": 2 }
            ],
            "policies": [ { "group": 2, "policy": "keep_active" } ],
            "strokes": [ { "pointer": 0, "points": points } ]
        }));
        let report = run(&Scenario::load(file.path()).unwrap(), None).unwrap();
        assert!(report
            .events
            .iter()
            .any(|e| e.event == GameEvent::StrokeBroken { pointer: 0 }));
        assert_eq!(report.score, 0);
    }

    #[test]
    fn empty_stroke_is_rejected() {
        let file = write_json(&json!({ "strokes": [ { "pointer": 0, "points": [] } ] }));
        let err = Scenario::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("no points"));
    }

    #[test]
    fn bad_config_override_is_an_error() {
        let scenario: Scenario = serde_json::from_value(json!({})).unwrap();
        let mut cfg = LassoCfg::default();
        cfg.stroke.fade_duration = 0.1;
        assert!(run(&scenario, Some(cfg)).is_err());
    }
}
