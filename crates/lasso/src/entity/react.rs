//! Capture reactions (`handle_looped`) for each entity kind.

use nalgebra::Vector2;

use super::{Color, Entity, EntityId, EntityKind, GroupId, LoopResult, PickupEffect};
use crate::effects::Effects;
use crate::events::{EventQueue, GameEvent};

/// Structural consequences of one capture, applied by `World` after the call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Reaction {
    pub despawn_self: bool,
    pub break_stroke: bool,
    pub flip_group: Option<GroupId>,
    pub spawns: Vec<Entity>,
    pub clear_minions: bool,
    pub boss_defeated: bool,
}

/// What an entity may touch while reacting: world effects, the event queue,
/// and its own pending `Reaction`.
pub struct LoopContext<'a> {
    pub id: EntityId,
    pub now: f64,
    pub effects: &'a mut Effects,
    pub events: &'a mut EventQueue,
    reaction: Reaction,
}

impl<'a> LoopContext<'a> {
    pub fn new(
        id: EntityId,
        now: f64,
        effects: &'a mut Effects,
        events: &'a mut EventQueue,
    ) -> Self {
        Self {
            id,
            now,
            effects,
            events,
            reaction: Reaction::default(),
        }
    }

    pub fn despawn(&mut self) {
        self.reaction.despawn_self = true;
    }

    pub fn break_stroke(&mut self) {
        self.reaction.break_stroke = true;
    }

    pub fn spawn(&mut self, entity: Entity) {
        self.reaction.spawns.push(entity);
    }

    pub fn reaction(&self) -> &Reaction {
        &self.reaction
    }

    pub fn into_reaction(self) -> Reaction {
        self.reaction
    }

    fn defeated(&mut self, position: Vector2<f64>) {
        self.despawn();
        self.events.push(GameEvent::EntityDefeated {
            id: self.id,
            position,
        });
    }
}

#[inline]
fn scaled(base: i64, multiplier: f64) -> i64 {
    (base as f64 * multiplier).round() as i64
}

impl PickupEffect {
    pub fn apply(&self, now: f64, effects: &mut Effects, events: &mut EventQueue) {
        match *self {
            PickupEffect::SlowTime { scale, duration } => effects.slow_time(scale, duration, events),
            PickupEffect::Ghost { duration } => effects.start_ghost(now, duration, events),
            PickupEffect::PauseDecay { duration } => effects.pause_decay(now, duration, events),
            PickupEffect::Bonus { amount, duration } => {
                effects.set_bonus(now, amount, duration, events)
            }
        }
    }
}

impl Entity {
    /// React to being enclosed by a loop scored at `multiplier`.
    pub fn handle_looped(&mut self, ctx: &mut LoopContext<'_>, multiplier: f64) -> LoopResult {
        let position = self.position;
        let group = self.group;
        match &mut self.kind {
            EntityKind::Health {
                health,
                loop_damage,
            } => {
                let dmg = scaled(*loop_damage, multiplier);
                *health = health.saturating_sub(dmg);
                if *health <= 0 {
                    ctx.defeated(position);
                }
                LoopResult::new(dmg, format!("-{dmg}"), Color::WHITE, position)
            }
            EntityKind::Boss {
                health,
                loop_damage,
                clears_minions,
            } => {
                let dmg = scaled(*loop_damage, multiplier);
                *health = health.saturating_sub(dmg);
                if *health > 0 {
                    return LoopResult::new(dmg, format!("-{dmg}"), Color::ORANGE, position);
                }
                ctx.despawn();
                ctx.reaction.boss_defeated = true;
                ctx.reaction.clear_minions = *clears_minions;
                ctx.events.push(GameEvent::BossDefeated { id: ctx.id });
                LoopResult::new(dmg, "BOSS DOWN!", Color::GOLD, position)
            }
            EntityKind::Coin { armed, reward } => {
                if *armed {
                    if ctx.effects.is_ghost(ctx.now) {
                        return LoopResult::new(0, "Phased", Color::CYAN, position);
                    }
                    ctx.break_stroke();
                    return LoopResult::new(0, "Wrong side!", Color::RED, position);
                }
                let gain = scaled(*reward, multiplier);
                match group {
                    Some(g) => ctx.reaction.flip_group = Some(g),
                    None => *armed = true,
                }
                LoopResult::new(gain, format!("+{gain}"), Color::GOLD, position)
            }
            EntityKind::Splitter {
                health,
                max_health,
                loop_damage,
                splits_left,
                split_offset,
            } => {
                let before = *health;
                let dmg = scaled(*loop_damage, multiplier);
                *health = health.saturating_sub(dmg);
                if *health <= 0 {
                    ctx.defeated(position);
                    return LoopResult::new(dmg, format!("-{dmg}"), Color::WHITE, position);
                }
                let half = *max_health / 2;
                let crossed_half = before > half && *health <= half;
                if !crossed_half || *splits_left == 0 || *health < 2 {
                    return LoopResult::new(dmg, format!("-{dmg}"), Color::WHITE, position);
                }
                // Children share the parent's remaining health exactly.
                let h = *health;
                let halves = [h / 2, h - h / 2];
                for (child_hp, dir) in halves.into_iter().zip([-1.0, 1.0]) {
                    ctx.spawn(Entity {
                        position: position + Vector2::new(dir * *split_offset, 0.0),
                        kind: EntityKind::Splitter {
                            health: child_hp,
                            max_health: child_hp,
                            loop_damage: *loop_damage,
                            splits_left: *splits_left - 1,
                            split_offset: *split_offset,
                        },
                        group,
                    });
                }
                ctx.despawn();
                LoopResult::new(dmg, "Split!", Color::PURPLE, position)
            }
            EntityKind::Pickup { effect } => {
                effect.apply(ctx.now, ctx.effects, ctx.events);
                ctx.despawn();
                LoopResult::new(0, effect.label(), Color::CYAN, position)
            }
        }
    }
}
