//! World State
//!
//! The single shared arena: players, pellets and the seeded RNG that
//! places them. Uses BTreeMap for deterministic iteration order.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::core::rng::DeterministicRng;
use crate::core::vec2::Vec2;
use crate::game::cards::{Card, CardCatalog};
use crate::game::events::{DeathCause, GameEvent};
use crate::game::input::PlayerInput;
use crate::game::pellet::{initial_pellet_count, Pellet};
use crate::game::player::{Player, PlayerId};

/// Complete arena state.
#[derive(Clone, Debug)]
pub struct World {
    /// Edge length of the square arena centred on the origin
    pub world_size: f64,

    /// Ticks simulated so far
    pub tick: u64,

    /// All players (BTreeMap for deterministic iteration)
    pub players: BTreeMap<PlayerId, Player>,

    /// All pellets keyed by id
    pub pellets: BTreeMap<u64, Pellet>,

    /// RNG for spawns and drafts
    pub rng: DeterministicRng,

    next_pellet_id: u64,

    /// Events pending collection
    events: Vec<GameEvent>,
}

impl World {
    /// Create a world and scatter its initial pellets.
    pub fn new(world_size: f64, seed: u64) -> Self {
        Self::with_rng(world_size, DeterministicRng::new(seed))
    }

    /// Create a world seeded from a random UUID.
    pub fn from_entropy(world_size: f64) -> Self {
        Self::with_rng(world_size, DeterministicRng::from_entropy())
    }

    fn with_rng(world_size: f64, rng: DeterministicRng) -> Self {
        let mut world = Self {
            world_size,
            tick: 0,
            players: BTreeMap::new(),
            pellets: BTreeMap::new(),
            rng,
            next_pellet_id: 0,
            events: Vec::new(),
        };

        for _ in 0..initial_pellet_count(world_size) {
            world.spawn_pellet();
        }

        world
    }

    // ===== PLAYERS =====

    /// Add a player at a random position with baseline stats.
    ///
    /// Re-adding an existing id resets that player.
    pub fn add_player(&mut self, id: PlayerId) -> &Player {
        let position = self.random_spawn(crate::game::player::BASE_SIZE);
        info!(player = %id, position = %position, "Player joined");
        self.players.insert(id, Player::new(id, position));
        &self.players[&id]
    }

    /// Remove a player. Returns the final state if it existed.
    pub fn remove_player(&mut self, id: &PlayerId) -> Option<Player> {
        let removed = self.players.remove(id);
        if removed.is_some() {
            info!(player = %id, "Player left");
        }
        removed
    }

    /// Replace a player's held keys. Unknown ids are ignored.
    pub fn set_input(&mut self, id: &PlayerId, input: PlayerInput) -> bool {
        match self.players.get_mut(id) {
            Some(player) => {
                player.input = input;
                true
            }
            None => {
                debug!(player = %id, "Input for unknown player");
                false
            }
        }
    }

    /// Clamp a player's full radius inside the arena.
    pub fn clamp_player(&mut self, id: &PlayerId) {
        let half = self.world_size / 2.0;
        if let Some(player) = self.players.get_mut(id) {
            player.position = player
                .position
                .clamp_components(-half + player.size, half - player.size);
        }
    }

    /// Kill `victim`: reward the killer (if any, and still present), then
    /// respawn the victim at a random position with baseline stats.
    pub fn handle_death(&mut self, victim: PlayerId, killer: Option<PlayerId>, cause: DeathCause) {
        let Some(victim_score) = self.players.get(&victim).map(|p| p.score) else {
            return;
        };

        let killer = killer.filter(|k| *k != victim && self.players.contains_key(k));
        if let Some(killer_id) = killer {
            if let Some(k) = self.players.get_mut(&killer_id) {
                k.reward_kill(victim_score);
            }
        }

        let position = self.random_spawn(crate::game::player::BASE_SIZE);
        if let Some(player) = self.players.get_mut(&victim) {
            player.respawn(position);
        }

        self.push_event(GameEvent::player_killed(self.tick, victim, killer, cause, victim_score));
    }

    fn random_spawn(&mut self, radius: f64) -> Vec2 {
        let half = self.world_size / 2.0;
        self.rng
            .random_position(self.world_size)
            .clamp_components(-half + radius, half - radius)
    }

    // ===== PELLETS =====

    /// Spawn one pellet at a random position. Returns its id.
    pub fn spawn_pellet(&mut self) -> u64 {
        let id = self.next_pellet_id;
        self.next_pellet_id += 1;
        let position = self.rng.random_position(self.world_size);
        self.pellets.insert(id, Pellet::new(id, position));
        id
    }

    // ===== CARDS =====

    /// Players due a card offer.
    pub fn players_due_cards(&self) -> Vec<PlayerId> {
        self.players
            .values()
            .filter(|p| p.should_offer_cards())
            .map(|p| p.id)
            .collect()
    }

    /// Draft an offer for `id` and mark it pending.
    ///
    /// Returns `None` if the player is gone, no longer due, or the draft
    /// came back empty (nothing left to offer; pending stays clear).
    pub fn draft_offer(&mut self, id: &PlayerId, catalog: &CardCatalog, count: usize) -> Option<Vec<Card>> {
        let player = self.players.get(id)?;
        if !player.should_offer_cards() {
            return None;
        }

        let cards = catalog.draft(count, &player.applied_cards, &mut self.rng);
        if cards.is_empty() {
            debug!(player = %id, "No cards left to offer");
            return None;
        }

        if let Some(player) = self.players.get_mut(id) {
            player.card_offer_pending = true;
        }
        Some(cards)
    }

    /// Apply a chosen card and escalate the player's threshold.
    ///
    /// The choice is not checked against the last offer.
    pub fn choose_card(&mut self, id: &PlayerId, card: &Card, catalog: &CardCatalog) -> bool {
        let Some(player) = self.players.get_mut(id) else {
            debug!(player = %id, "Card choice for unknown player");
            return false;
        };

        catalog.apply_card(player, card);
        player.advance_card_threshold();

        let event = GameEvent::card_applied(self.tick, *id, card.id, card.name.clone());
        self.push_event(event);
        true
    }

    // ===== EVENTS =====

    /// Add an event.
    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all pending events.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::cards::Rarity;
    use crate::game::events::GameEventData;

    fn pid(n: u8) -> PlayerId {
        PlayerId::new([n; 16])
    }

    fn catalog() -> CardCatalog {
        let cards = (1..=5)
            .map(|id| Card {
                id,
                name: format!("Card {id}"),
                description: String::new(),
                rarity: Rarity::Common,
                effects: Vec::new(),
                set: None,
            })
            .collect();
        CardCatalog::new(cards, CardCatalog::builtin_sets()).unwrap()
    }

    #[test]
    fn test_initial_pellets() {
        let world = World::new(200.0, 1);
        assert_eq!(world.pellets.len(), 100);
        for pellet in world.pellets.values() {
            assert!(pellet.position.x.abs() <= 100.0);
            assert!(pellet.position.y.abs() <= 100.0);
        }
    }

    #[test]
    fn test_same_seed_same_world() {
        let a = World::new(500.0, 42);
        let b = World::new(500.0, 42);
        let pa: Vec<Vec2> = a.pellets.values().map(|p| p.position).collect();
        let pb: Vec<Vec2> = b.pellets.values().map(|p| p.position).collect();
        assert_eq!(pa, pb);
    }

    #[test]
    fn test_add_remove_player() {
        let mut world = World::new(1000.0, 1);
        let position = world.add_player(pid(1)).position;
        assert!(position.x.abs() <= 460.0 && position.y.abs() <= 460.0);

        assert!(world.set_input(&pid(1), PlayerInput::new(true, false, false, false)));
        assert!(!world.set_input(&pid(2), PlayerInput::NEUTRAL));

        assert!(world.remove_player(&pid(1)).is_some());
        assert!(world.remove_player(&pid(1)).is_none());
    }

    #[test]
    fn test_clamp_player() {
        let mut world = World::new(1000.0, 1);
        world.add_player(pid(1));
        world.players.get_mut(&pid(1)).unwrap().position = Vec2::new(900.0, -900.0);

        world.clamp_player(&pid(1));
        assert_eq!(world.players[&pid(1)].position, Vec2::new(460.0, -460.0));
    }

    #[test]
    fn test_handle_death_rewards_and_respawns() {
        let mut world = World::new(1000.0, 3);
        world.add_player(pid(1));
        world.add_player(pid(2));
        world.players.get_mut(&pid(2)).unwrap().score = 30;
        world.players.get_mut(&pid(2)).unwrap().health = 0.0;

        world.handle_death(pid(2), Some(pid(1)), DeathCause::Collision);

        assert_eq!(world.players[&pid(1)].score, 30);
        assert!((world.players[&pid(1)].size - 44.0).abs() < 1e-9);
        assert_eq!(world.players[&pid(2)].score, 0);
        assert_eq!(world.players[&pid(2)].health, 100.0);

        let events = world.take_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0].data,
            GameEventData::PlayerKilled { killer_id: Some(k), victim_score: 30, .. } if k == pid(1)
        ));
        assert!(world.take_events().is_empty());
    }

    #[test]
    fn test_handle_death_missing_killer() {
        let mut world = World::new(1000.0, 3);
        world.add_player(pid(1));
        world.players.get_mut(&pid(1)).unwrap().score = 5;

        world.handle_death(pid(1), Some(pid(9)), DeathCause::Effect);
        assert_eq!(world.players[&pid(1)].score, 0);
        let events = world.take_events();
        assert!(matches!(events[0].data, GameEventData::PlayerKilled { killer_id: None, .. }));
    }

    #[test]
    fn test_offer_and_choose_card() {
        let catalog = catalog();
        let mut world = World::new(1000.0, 5);
        world.add_player(pid(1));
        assert!(world.players_due_cards().is_empty());

        world.players.get_mut(&pid(1)).unwrap().score = 10;
        assert_eq!(world.players_due_cards(), vec![pid(1)]);

        let offer = world.draft_offer(&pid(1), &catalog, 3).unwrap();
        assert_eq!(offer.len(), 3);
        assert!(world.players[&pid(1)].card_offer_pending);
        assert!(world.players_due_cards().is_empty());
        assert!(world.draft_offer(&pid(1), &catalog, 3).is_none());

        assert!(world.choose_card(&pid(1), &offer[0], &catalog));
        let player = &world.players[&pid(1)];
        assert!(!player.card_offer_pending);
        assert_eq!(player.next_card_threshold, 20);
        assert_eq!(player.applied_cards, vec![offer[0].name.clone()]);

        assert!(!world.choose_card(&pid(7), &offer[1], &catalog));
    }

    #[test]
    fn test_empty_draft_leaves_offer_clear() {
        let catalog = CardCatalog::default();
        let mut world = World::new(1000.0, 5);
        world.add_player(pid(1));
        world.players.get_mut(&pid(1)).unwrap().score = 10;

        assert!(world.draft_offer(&pid(1), &catalog, 3).is_none());
        assert!(!world.players[&pid(1)].card_offer_pending);
    }
}
