//! Game Logic Module
//!
//! The arena simulation. Synchronous and lock-free; the hub owns locking.
//!
//! ## Module Structure
//!
//! - `input`: Directional key flags sent by clients
//! - `player`: Player state, damage and progression counters
//! - `pellet`: Food pellets
//! - `effects`: Auras and timed effects
//! - `cards`: Card catalog, draft and set bonuses
//! - `world`: Arena state, spawns and deaths
//! - `tick`: Authoritative simulation step
//! - `collision`: Circle overlap tests
//! - `events`: Game events for logging

pub mod input;
pub mod player;
pub mod pellet;
pub mod effects;
pub mod cards;
pub mod world;
pub mod tick;
pub mod collision;
pub mod events;

// Re-export key types
pub use input::PlayerInput;
pub use player::{Player, PlayerId};
pub use pellet::Pellet;
pub use effects::{Aura, AuraKind, ActiveEffect, EffectKind};
pub use cards::{Card, CardCatalog, CardEffect, CardSet, CatalogError, Rarity, Stat};
pub use world::World;
pub use tick::{tick, TickResult};
pub use events::{GameEvent, GameEventData, DeathCause};
