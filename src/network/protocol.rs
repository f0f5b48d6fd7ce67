//! Protocol Messages
//!
//! Wire format for client-server communication over WebSocket.
//! Every frame is a JSON text message shaped `{"type": ..., "data": ...}`.

use serde::{Deserialize, Serialize};

use crate::game::cards::Card;
use crate::game::input::PlayerInput;

// =============================================================================
// CLIENT -> SERVER MESSAGES
// =============================================================================

/// Messages sent from client to server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Held directional keys.
    Input(PlayerInput),

    /// Pick a card from an offer.
    CardChoice(CardChoice),
}

/// Card selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardChoice {
    /// Catalog id of the chosen card.
    pub card_id: u64,
}

// =============================================================================
// SERVER -> CLIENT MESSAGES
// =============================================================================

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Sent once after the connection is registered.
    Welcome(Welcome),

    /// Cards to choose from.
    CardOffer(CardOffer),

    /// Full arena snapshot.
    GameState(GameStateView),

    /// Server is shutting down.
    Shutdown {
        /// Human-readable cause.
        reason: String,
    },
}

/// Join acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Welcome {
    /// Player id as a UUID string.
    pub player_id: String,
}

/// Card offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardOffer {
    /// Offered cards, at most one of each.
    pub cards: Vec<Card>,
}

/// Snapshot of every player and pellet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStateView {
    /// All players.
    pub players: Vec<PlayerView>,
    /// All pellets.
    pub pellets: Vec<PelletView>,
}

/// Client-facing player state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    /// Player id as a UUID string.
    pub id: String,
    /// Centre x.
    pub x: f64,
    /// Centre y.
    pub y: f64,
    /// Radius.
    pub size: f64,
    /// Current speed.
    pub speed: f64,
    /// Current score.
    pub score: u64,
    /// Current health.
    pub health: f64,
    /// Health cap.
    pub max_health: f64,
    /// Collision damage.
    pub damage: f64,
    /// Current barrier.
    pub barrier: f64,
    /// Barrier cap.
    pub max_barrier: f64,
    /// Score that triggers the next offer.
    pub next_card_threshold: u64,
    /// An offer is awaiting a choice.
    pub card_offer_pending: bool,
    /// Applied card names in acquisition order.
    pub applied_cards: Vec<String>,
    /// Auras this player emits.
    pub auras: Vec<AuraView>,
    /// Effects afflicting this player.
    pub active_effects: Vec<ActiveEffectView>,
}

/// Client-facing aura.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuraView {
    /// Aura kind tag.
    #[serde(rename = "type")]
    pub kind: String,
    /// Reach.
    pub radius: f64,
    /// Per-pulse strength.
    pub strength: f64,
}

/// Client-facing timed effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffectView {
    /// Effect kind tag.
    #[serde(rename = "type")]
    pub kind: String,
    /// Seconds left.
    pub remaining: f64,
}

/// Client-facing pellet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PelletView {
    /// Pellet id.
    pub id: u64,
    /// Centre x.
    pub x: f64,
    /// Centre y.
    pub y: f64,
    /// Radius.
    pub size: f64,
}

// =============================================================================
// SERIALIZATION
// =============================================================================

impl ClientMessage {
    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl ServerMessage {
    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::cards::Rarity;

    #[test]
    fn test_parse_input() {
        let msg = ClientMessage::from_json(r#"{"type":"input","data":{"w":true,"a":false,"s":false,"d":true}}"#)
            .unwrap();
        assert_eq!(msg, ClientMessage::Input(PlayerInput::new(true, false, false, true)));
    }

    #[test]
    fn test_parse_card_choice() {
        let msg = ClientMessage::from_json(r#"{"type":"card_choice","data":{"card_id":42}}"#).unwrap();
        assert_eq!(msg, ClientMessage::CardChoice(CardChoice { card_id: 42 }));
    }

    #[test]
    fn test_malformed_frames_rejected() {
        assert!(ClientMessage::from_json("not json").is_err());
        assert!(ClientMessage::from_json(r#"{"type":"teleport","data":{}}"#).is_err());
        assert!(ClientMessage::from_json(r#"{"type":"card_choice","data":{"card_id":"x"}}"#).is_err());
    }

    #[test]
    fn test_welcome_envelope() {
        let msg = ServerMessage::Welcome(Welcome {
            player_id: "abc".into(),
        });
        let value: serde_json::Value = serde_json::from_str(&msg.to_json().unwrap()).unwrap();
        assert_eq!(value["type"], "welcome");
        assert_eq!(value["data"]["player_id"], "abc");
    }

    #[test]
    fn test_card_offer_envelope() {
        let msg = ServerMessage::CardOffer(CardOffer {
            cards: vec![Card {
                id: 7,
                name: "Swift Feet".into(),
                description: "Faster".into(),
                rarity: Rarity::Uncommon,
                effects: Vec::new(),
                set: None,
            }],
        });
        let value: serde_json::Value = serde_json::from_str(&msg.to_json().unwrap()).unwrap();
        assert_eq!(value["type"], "card_offer");
        assert_eq!(value["data"]["cards"][0]["id"], 7);
        assert_eq!(value["data"]["cards"][0]["rarity"], "Uncommon");
    }

    #[test]
    fn test_game_state_field_names() {
        let msg = ServerMessage::GameState(GameStateView {
            players: vec![PlayerView {
                id: "p".into(),
                x: 1.0,
                y: 2.0,
                size: 40.0,
                speed: 5.0,
                score: 3,
                health: 90.0,
                max_health: 100.0,
                damage: 10.0,
                barrier: 0.0,
                max_barrier: 0.0,
                next_card_threshold: 10,
                card_offer_pending: false,
                applied_cards: vec![],
                auras: vec![AuraView {
                    kind: "slow".into(),
                    radius: 50.0,
                    strength: 0.3,
                }],
                active_effects: vec![ActiveEffectView {
                    kind: "poison".into(),
                    remaining: 1.5,
                }],
            }],
            pellets: vec![PelletView {
                id: 9,
                x: 0.0,
                y: 0.0,
                size: 4.0,
            }],
        });

        let value: serde_json::Value = serde_json::from_str(&msg.to_json().unwrap()).unwrap();
        assert_eq!(value["type"], "game_state");
        let player = &value["data"]["players"][0];
        assert_eq!(player["max_health"], 100.0);
        assert_eq!(player["auras"][0]["type"], "slow");
        assert_eq!(player["active_effects"][0]["type"], "poison");
        assert_eq!(value["data"]["pellets"][0]["id"], 9);
    }
}
