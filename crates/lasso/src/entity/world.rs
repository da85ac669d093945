//! Registry of capturable entities.

use std::collections::BTreeMap;

use nalgebra::Vector2;

use super::{Entity, EntityId, EntityKind, GroupId, Reaction, SiblingPolicy};
use crate::events::{EventQueue, GameEvent};
use crate::geom::select_inside;

/// World-wide capturable set. Iteration order is registration order
/// (ids are monotonic), which keeps capture resolution deterministic.
#[derive(Clone, Debug, Default)]
pub struct World {
    entities: BTreeMap<EntityId, Entity>,
    policies: BTreeMap<GroupId, SiblingPolicy>,
    next_id: u64,
    boss_defeated: bool,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, entity: Entity) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.insert(id, entity);
        id
    }

    pub fn unregister(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    #[inline]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    #[inline]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Move an entity (AI and spawners own movement). False if unknown.
    pub fn set_position(&mut self, id: EntityId, position: Vector2<f64>) -> bool {
        match self.entities.get_mut(&id) {
            Some(e) => {
                e.position = position;
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> + '_ {
        self.entities.iter().map(|(id, e)| (*id, e))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn set_group_policy(&mut self, group: GroupId, policy: SiblingPolicy) {
        self.policies.insert(group, policy);
    }

    /// Configured policy, or `SiblingPolicy::default()`.
    pub fn group_policy(&self, group: GroupId) -> SiblingPolicy {
        self.policies.get(&group).copied().unwrap_or_default()
    }

    #[inline]
    pub fn boss_defeated(&self) -> bool {
        self.boss_defeated
    }

    /// Ids of entities whose position is inside `polygon`, in registration order.
    pub fn entities_inside(&self, polygon: &[Vector2<f64>]) -> Vec<EntityId> {
        select_inside(polygon, self.iter().map(|(id, e)| (id, e.position)))
    }

    /// Toggle the armed state of every coin in `group`.
    pub fn flip_group(&mut self, group: GroupId) {
        for e in self.entities.values_mut() {
            if e.group != Some(group) {
                continue;
            }
            if let EntityKind::Coin { armed, .. } = &mut e.kind {
                *armed = !*armed;
            }
        }
    }

    /// Apply the structural part of a capture reaction for entity `id`.
    pub fn apply_reaction(&mut self, id: EntityId, reaction: Reaction, events: &mut EventQueue) {
        if let Some(g) = reaction.flip_group {
            self.flip_group(g);
        }
        if reaction.despawn_self {
            self.entities.remove(&id);
        }
        if reaction.boss_defeated {
            self.boss_defeated = true;
        }
        if reaction.clear_minions {
            let minions: Vec<EntityId> = self
                .entities
                .iter()
                .filter(|(_, e)| matches!(e.kind, EntityKind::Health { .. }))
                .map(|(id, _)| *id)
                .collect();
            for m in minions {
                if let Some(e) = self.entities.remove(&m) {
                    events.push(GameEvent::EntityDefeated {
                        id: m,
                        position: e.position,
                    });
                }
            }
        }
        for child in reaction.spawns {
            let child_id = self.register(child);
            events.push(GameEvent::EntitySpawned {
                id: child_id,
                parent: Some(id),
            });
        }
    }
}
