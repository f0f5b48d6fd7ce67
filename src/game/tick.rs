//! Authoritative Simulation Tick
//!
//! One bounded, synchronous step of the arena. Phase order:
//! player update and containment, aura pulses, PvP contact, pellet pickup.

use crate::game::collision::{can_absorb, players_collide};
use crate::game::effects::{apply_aura, Aura};
use crate::game::events::{DeathCause, GameEvent};
use crate::game::player::PlayerId;
use crate::game::world::World;

/// Cooldown applied to both players after a PvP hit.
pub const COLLISION_COOLDOWN: f64 = 0.5;

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this tick
    pub events: Vec<GameEvent>,
}

/// Run one simulation tick of `dt` seconds.
///
/// Iteration follows player-id and pellet-id order, so the same seed,
/// inputs and deltas always produce the same world.
pub fn tick(world: &mut World, dt: f64) -> TickResult {
    world.tick += 1;

    let ids: Vec<PlayerId> = world.players.keys().copied().collect();

    update_players(world, &ids, dt);
    process_auras(world, &ids, dt);
    process_player_collisions(world, &ids);
    process_pellets(world, &ids);

    TickResult {
        events: world.take_events(),
    }
}

fn update_players(world: &mut World, ids: &[PlayerId], dt: f64) {
    for id in ids {
        let Some(player) = world.players.get_mut(id) else {
            continue;
        };
        let kill = player.update(dt);
        world.clamp_player(id);

        if let Some(kill) = kill {
            world.handle_death(*id, Some(kill.source), DeathCause::Effect);
        }
    }
}

fn process_auras(world: &mut World, ids: &[PlayerId], dt: f64) {
    for emitter_id in ids {
        let fired: Vec<Aura> = match world.players.get_mut(emitter_id) {
            Some(emitter) => {
                let mut fired = Vec::new();
                for aura in emitter.auras.iter_mut() {
                    if aura.advance(dt) {
                        fired.push(aura.clone());
                    }
                }
                fired
            }
            None => continue,
        };

        for aura in &fired {
            pulse_aura(world, ids, *emitter_id, aura);
        }
    }
}

fn pulse_aura(world: &mut World, ids: &[PlayerId], emitter_id: PlayerId, aura: &Aura) {
    let Some(emitter) = world.players.get(&emitter_id) else {
        return;
    };
    let origin = emitter.position;
    let reach = aura.reach(emitter.size);

    for target_id in ids {
        if *target_id == emitter_id {
            continue;
        }
        let Some(target) = world.players.get_mut(target_id) else {
            continue;
        };
        if !target.is_alive() || target.position.distance_squared(origin) > reach * reach {
            continue;
        }

        let hit = apply_aura(aura, emitter_id, target);

        if hit.emitter_heal > 0.0 {
            if let Some(emitter) = world.players.get_mut(&emitter_id) {
                emitter.heal(hit.emitter_heal);
            }
        }
        if hit.killed {
            world.handle_death(*target_id, Some(emitter_id), DeathCause::Aura);
        }
    }
}

fn process_player_collisions(world: &mut World, ids: &[PlayerId]) {
    for (i, a_id) in ids.iter().enumerate() {
        for b_id in &ids[i + 1..] {
            let (Some(a), Some(b)) = (world.players.get(a_id), world.players.get(b_id)) else {
                continue;
            };
            if !players_collide(a, b) {
                continue;
            }

            // Both hits use pre-exchange damage
            let damage_to_a = b.damage;
            let damage_to_b = a.damage;

            #[cfg(feature = "debug-tracing")]
            tracing::trace!(a = %a_id, b = %b_id, damage_to_a, damage_to_b, "PvP contact");

            let a_died = match world.players.get_mut(a_id) {
                Some(a) => {
                    a.collision_cooldown = COLLISION_COOLDOWN;
                    a.take_damage(damage_to_a)
                }
                None => false,
            };
            let b_died = match world.players.get_mut(b_id) {
                Some(b) => {
                    b.collision_cooldown = COLLISION_COOLDOWN;
                    b.take_damage(damage_to_b)
                }
                None => false,
            };

            if a_died {
                world.handle_death(*a_id, Some(*b_id), DeathCause::Collision);
            }
            if b_died {
                world.handle_death(*b_id, Some(*a_id), DeathCause::Collision);
            }
        }
    }
}

fn process_pellets(world: &mut World, ids: &[PlayerId]) {
    for id in ids {
        let Some(player) = world.players.get(id) else {
            continue;
        };
        if !player.is_alive() {
            continue;
        }

        // At most one pellet per player per tick
        let Some(pellet_id) = world
            .pellets
            .values()
            .find(|pellet| can_absorb(player, pellet))
            .map(|pellet| pellet.id)
        else {
            continue;
        };

        let Some(pellet) = world.pellets.remove(&pellet_id) else {
            continue;
        };
        let Some(player) = world.players.get_mut(id) else {
            continue;
        };
        player.score = player.score.saturating_add(pellet.value);
        player.heal(pellet.value as f64);
        let new_score = player.score;

        world.spawn_pellet();
        let event = GameEvent::pellet_consumed(world.tick, *id, pellet_id, new_score);
        world.push_event(event);
    }
}
