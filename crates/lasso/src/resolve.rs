//! Loop resolution: select captured entities, de-duplicate sibling groups,
//! dispatch `handle_looped` one entity at a time, and aggregate results.

use std::collections::BTreeMap;

use nalgebra::Vector2;

use crate::effects::Effects;
use crate::entity::{Entity, EntityId, GroupId, LoopContext, LoopResult, SiblingPolicy, World};
use crate::events::EventQueue;

/// Aggregated outcome of one dispatch batch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Resolution {
    /// One entry per dispatched entity, in dispatch order.
    pub results: Vec<LoopResult>,
    /// Some entity asked to end the capturing stroke.
    pub broke: bool,
    /// Selected ids that were gone by the time their turn came.
    pub skipped: usize,
}

impl Resolution {
    pub fn score(&self) -> i64 {
        self.results.iter().map(|r| r.score_delta).sum()
    }

    /// Results worth showing; empty texts are scoring-only.
    pub fn display(&self) -> impl Iterator<Item = &LoopResult> + '_ {
        self.results.iter().filter(|r| r.has_display())
    }
}

#[inline]
fn prefers(policy: SiblingPolicy, candidate: &Entity, current: &Entity) -> bool {
    match policy {
        SiblingPolicy::KeepInactive => current.is_active() && !candidate.is_active(),
        SiblingPolicy::KeepActive => !current.is_active() && candidate.is_active(),
        SiblingPolicy::KeepFirst => false,
    }
}

/// Keep at most one member per sibling group, chosen by the group's policy.
/// Ungrouped ids pass through; relative order is preserved.
pub fn dedup_siblings(ids: Vec<EntityId>, world: &World) -> Vec<EntityId> {
    let mut chosen: BTreeMap<GroupId, EntityId> = BTreeMap::new();
    for &id in &ids {
        let Some(e) = world.get(id) else { continue };
        let Some(g) = e.group else { continue };
        let keep = match chosen.get(&g).and_then(|cur| world.get(*cur)) {
            None => true,
            Some(cur) => prefers(world.group_policy(g), e, cur),
        };
        if keep {
            chosen.insert(g, id);
        }
    }
    let before = ids.len();
    let out: Vec<EntityId> = ids
        .into_iter()
        .filter(|id| match world.get(*id).and_then(|e| e.group) {
            Some(g) => chosen.get(&g) == Some(id),
            None => true,
        })
        .collect();
    if out.len() < before {
        tracing::debug!(dropped = before - out.len(), "sibling captures dropped");
    }
    out
}

/// Captured ids for `polygon`, after sibling de-duplication.
pub fn select(polygon: &[Vector2<f64>], world: &World) -> Vec<EntityId> {
    dedup_siblings(world.entities_inside(polygon), world)
}

/// Run the capture reaction on each id in order. Ids removed earlier in the
/// batch (by a sibling's side effect) are skipped.
pub fn dispatch(
    ids: &[EntityId],
    multiplier: f64,
    now: f64,
    world: &mut World,
    effects: &mut Effects,
    events: &mut EventQueue,
) -> Resolution {
    let mut out = Resolution::default();
    for &id in ids {
        let Some(entity) = world.get_mut(id) else {
            tracing::debug!(?id, "captured entity vanished before dispatch; skipping");
            out.skipped += 1;
            continue;
        };
        let mut ctx = LoopContext::new(id, now, effects, events);
        let result = entity.handle_looped(&mut ctx, multiplier);
        let reaction = ctx.into_reaction();
        out.broke |= reaction.break_stroke;
        world.apply_reaction(id, reaction, events);
        out.results.push(result);
    }
    out
}

/// `select` followed by `dispatch`.
pub fn resolve(
    polygon: &[Vector2<f64>],
    multiplier: f64,
    now: f64,
    world: &mut World,
    effects: &mut Effects,
    events: &mut EventQueue,
) -> Resolution {
    let ids = select(polygon, world);
    dispatch(&ids, multiplier, now, world, effects, events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityKind, PickupEffect};
    use crate::events::GameEvent;
    use nalgebra::vector;

    fn square(side: f64) -> Vec<Vector2<f64>> {
        let h = side * 0.5;
        vec![
            vector![-h, -h],
            vector![h, -h],
            vector![h, h],
            vector![-h, h],
        ]
    }

    fn run(world: &mut World, polygon: &[Vector2<f64>], multiplier: f64) -> Resolution {
        let mut fx = Effects::new();
        let mut q = EventQueue::new();
        resolve(polygon, multiplier, 0.0, world, &mut fx, &mut q)
    }

    #[test]
    fn sibling_pair_dispatches_only_inactive_face() {
        let mut w = World::new();
        let g = GroupId(1);
        let armed = w.register(Entity::coin(vector![-0.5, 0.0], g, true, 10));
        let safe = w.register(Entity::coin(vector![0.5, 0.0], g, false, 10));

        let ids = select(&square(4.0), &w);
        assert_eq!(ids, vec![safe]);

        let res = run(&mut w, &square(4.0), 1.0);
        assert_eq!(res.results.len(), 1);
        assert!(!res.broke);
        assert_eq!(res.score(), 10);
        // Faces flipped.
        assert!(w.get(armed).is_some_and(|e| !e.is_active()));
        assert!(w.get(safe).is_some_and(|e| e.is_active()));
    }

    #[test]
    fn keep_active_policy_picks_armed_face_and_breaks() {
        let mut w = World::new();
        let g = GroupId(2);
        w.set_group_policy(g, SiblingPolicy::KeepActive);
        let armed = w.register(Entity::coin(vector![-0.5, 0.0], g, true, 10));
        w.register(Entity::coin(vector![0.5, 0.0], g, false, 10));
        assert_eq!(select(&square(4.0), &w), vec![armed]);
        let res = run(&mut w, &square(4.0), 1.0);
        assert!(res.broke);
        assert_eq!(res.score(), 0);
    }

    #[test]
    fn keep_first_policy_uses_registration_order() {
        let mut w = World::new();
        let g = GroupId(3);
        w.set_group_policy(g, SiblingPolicy::KeepFirst);
        let first = w.register(Entity::coin(vector![0.0, 0.0], g, true, 1));
        w.register(Entity::coin(vector![0.1, 0.0], g, false, 1));
        assert_eq!(select(&square(4.0), &w), vec![first]);
    }

    #[test]
    fn ungrouped_and_outside_entities() {
        let mut w = World::new();
        let a = w.register(Entity::health(vector![0.0, 0.0], 10, 2));
        w.register(Entity::health(vector![10.0, 10.0], 10, 2));
        let b = w.register(Entity::health(vector![1.0, 1.0], 10, 2));
        assert_eq!(select(&square(4.0), &w), vec![a, b]);
    }

    #[test]
    fn multiplier_scales_damage_and_score() {
        let mut w = World::new();
        let id = w.register(Entity::health(vector![0.0, 0.0], 20, 4));
        let res = run(&mut w, &square(2.0), 1.5);
        assert_eq!(res.score(), 6);
        assert_eq!(w.get(id).and_then(|e| e.health_points()), Some(14));
    }

    #[test]
    fn boss_death_clears_minions_later_in_batch_are_skipped() {
        let mut w = World::new();
        let boss = w.register(Entity::boss(vector![0.0, 0.0], 3, 5));
        let minion = w.register(Entity::health(vector![0.5, 0.5], 10, 1));
        let far = w.register(Entity::health(vector![50.0, 0.0], 10, 1));
        let mut fx = Effects::new();
        let mut q = EventQueue::new();
        let res = resolve(&square(4.0), 1.0, 0.0, &mut w, &mut fx, &mut q);
        assert_eq!(res.results.len(), 1);
        assert_eq!(res.skipped, 1);
        assert!(w.boss_defeated());
        assert!(!w.contains(boss));
        assert!(!w.contains(minion));
        assert!(!w.contains(far));
        assert!(q.iter().any(|e| *e == GameEvent::BossDefeated { id: boss }));
    }

    #[test]
    fn splitter_conserves_health_across_children() {
        let mut w = World::new();
        let parent = w.register(Entity::splitter(vector![0.0, 0.0], 10, 6, 1));
        let mut fx = Effects::new();
        let mut q = EventQueue::new();
        let res = resolve(&square(4.0), 1.0, 0.0, &mut w, &mut fx, &mut q);
        assert_eq!(res.score(), 6);
        assert!(!w.contains(parent));
        let children: Vec<i64> = w.iter().filter_map(|(_, e)| e.health_points()).collect();
        assert_eq!(children.len(), 2);
        assert_eq!(children.iter().sum::<i64>(), 4);
        let spawned = q
            .iter()
            .filter(|e| matches!(e, GameEvent::EntitySpawned { parent: Some(p), .. } if *p == parent))
            .count();
        assert_eq!(spawned, 2);
        // Children cannot split again.
        assert!(w
            .iter()
            .all(|(_, e)| matches!(e.kind, EntityKind::Splitter { splits_left: 0, .. })));
    }

    #[test]
    fn splitter_above_half_does_not_split() {
        let mut w = World::new();
        let id = w.register(Entity::splitter(vector![0.0, 0.0], 10, 2, 1));
        run(&mut w, &square(4.0), 1.0);
        assert_eq!(w.len(), 1);
        assert_eq!(w.get(id).and_then(|e| e.health_points()), Some(8));
    }

    #[test]
    fn pickup_applies_effect_and_removes_itself() {
        let mut w = World::new();
        let id = w.register(Entity::pickup(
            vector![0.0, 0.0],
            PickupEffect::SlowTime {
                scale: 0.5,
                duration: 2.0,
            },
        ));
        let mut fx = Effects::new();
        let mut q = EventQueue::new();
        let res = resolve(&square(2.0), 1.0, 0.0, &mut w, &mut fx, &mut q);
        assert!(!w.contains(id));
        assert_eq!(res.score(), 0);
        assert_eq!(res.display().count(), 1);
        assert!(fx.time_scale.is_active());
        assert_eq!(fx.time_scale.scale(), 0.5);
    }

    #[test]
    fn ghost_mode_lets_armed_coin_through() {
        let mut w = World::new();
        w.register(Entity::coin(vector![0.0, 0.0], GroupId(9), true, 5));
        let mut fx = Effects::new();
        let mut q = EventQueue::new();
        fx.start_ghost(0.0, 3.0, &mut q);
        let res = resolve(&square(2.0), 1.0, 1.0, &mut w, &mut fx, &mut q);
        assert!(!res.broke);
        assert_eq!(res.score(), 0);
    }

    #[test]
    fn stale_ids_are_skipped() {
        let mut w = World::new();
        let a = w.register(Entity::health(vector![0.0, 0.0], 5, 1));
        let gone = w.register(Entity::health(vector![0.2, 0.0], 5, 1));
        w.unregister(gone);
        let mut fx = Effects::new();
        let mut q = EventQueue::new();
        let res = dispatch(&[gone, a], 1.0, 0.0, &mut w, &mut fx, &mut q);
        assert_eq!(res.skipped, 1);
        assert_eq!(res.results.len(), 1);
    }
}
