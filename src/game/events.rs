//! Game Events
//!
//! Events generated during simulation, drained and logged by the hub each step.

use serde::{Deserialize, Serialize};

use crate::game::player::PlayerId;

/// What killed a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathCause {
    /// PvP collision
    Collision,
    /// Aura pulse
    Aura,
    /// Damage-over-time effect
    Effect,
}

/// Game event data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEventData {
    /// Player ate a pellet
    PelletConsumed {
        /// Player that ate it
        player_id: PlayerId,
        /// Consumed pellet
        pellet_id: u64,
        /// Score after the pickup
        new_score: u64,
    },

    /// Player died and respawned
    PlayerKilled {
        /// Player that died
        victim_id: PlayerId,
        /// Credited player, if still present
        killer_id: Option<PlayerId>,
        /// Damage source
        cause: DeathCause,
        /// Score awarded to the killer
        victim_score: u64,
    },

    /// Player accepted a card
    CardApplied {
        /// Player that chose it
        player_id: PlayerId,
        /// Chosen card
        card_id: u64,
        /// Card display name
        card_name: String,
    },
}

/// A game event stamped with the tick it happened on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Tick when event occurred
    pub tick: u64,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(tick: u64, data: GameEventData) -> Self {
        Self { tick, data }
    }

    /// Create pellet consumed event.
    pub fn pellet_consumed(tick: u64, player_id: PlayerId, pellet_id: u64, new_score: u64) -> Self {
        Self::new(
            tick,
            GameEventData::PelletConsumed {
                player_id,
                pellet_id,
                new_score,
            },
        )
    }

    /// Create player killed event.
    pub fn player_killed(
        tick: u64,
        victim_id: PlayerId,
        killer_id: Option<PlayerId>,
        cause: DeathCause,
        victim_score: u64,
    ) -> Self {
        Self::new(
            tick,
            GameEventData::PlayerKilled {
                victim_id,
                killer_id,
                cause,
                victim_score,
            },
        )
    }

    /// Create card applied event.
    pub fn card_applied(tick: u64, player_id: PlayerId, card_id: u64, card_name: String) -> Self {
        Self::new(
            tick,
            GameEventData::CardApplied {
                player_id,
                card_id,
                card_name,
            },
        )
    }

    /// Player the event is about.
    pub fn player_id(&self) -> PlayerId {
        match &self.data {
            GameEventData::PelletConsumed { player_id, .. } => *player_id,
            GameEventData::PlayerKilled { victim_id, .. } => *victim_id,
            GameEventData::CardApplied { player_id, .. } => *player_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_player_id() {
        let victim = PlayerId::new([1; 16]);
        let killer = PlayerId::new([2; 16]);
        let event = GameEvent::player_killed(7, victim, Some(killer), DeathCause::Collision, 12);
        assert_eq!(event.tick, 7);
        assert_eq!(event.player_id(), victim);

        let event = GameEvent::pellet_consumed(8, killer, 3, 13);
        assert_eq!(event.player_id(), killer);
    }
}
