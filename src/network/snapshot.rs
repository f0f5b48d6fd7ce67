//! Snapshot Builder
//!
//! Converts the world into the client-facing `game_state` DTO. Runs under
//! the world read lock; serialization and delivery happen after release.

use crate::game::pellet::Pellet;
use crate::game::player::Player;
use crate::game::world::World;
use crate::network::protocol::{ActiveEffectView, AuraView, GameStateView, PelletView, PlayerView};

impl From<&Player> for PlayerView {
    fn from(p: &Player) -> Self {
        Self {
            id: p.id.to_uuid_string(),
            x: p.position.x,
            y: p.position.y,
            size: p.size,
            speed: p.speed,
            score: p.score,
            health: p.health,
            max_health: p.max_health,
            damage: p.damage,
            barrier: p.barrier,
            max_barrier: p.max_barrier,
            next_card_threshold: p.next_card_threshold,
            card_offer_pending: p.card_offer_pending,
            applied_cards: p.applied_cards.clone(),
            auras: p
                .auras
                .iter()
                .map(|a| AuraView {
                    kind: a.kind.as_tag().to_string(),
                    radius: a.radius,
                    strength: a.strength,
                })
                .collect(),
            active_effects: p
                .active_effects
                .iter()
                .map(|e| ActiveEffectView {
                    kind: e.kind.as_tag().to_string(),
                    remaining: e.remaining,
                })
                .collect(),
        }
    }
}

impl From<&Pellet> for PelletView {
    fn from(p: &Pellet) -> Self {
        Self {
            id: p.id,
            x: p.position.x,
            y: p.position.y,
            size: p.size,
        }
    }
}

/// Build a full snapshot of `world`.
pub fn build_snapshot(world: &World) -> GameStateView {
    GameStateView {
        players: world.players.values().map(PlayerView::from).collect(),
        pellets: world.pellets.values().map(PelletView::from).collect(),
    }
}
