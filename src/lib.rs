//! # Orb Arena Server
//!
//! Authoritative real-time arena server. Players steer orbs, eat pellets,
//! fight on contact and build up through cards, auras and set bonuses.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    ORB ARENA SERVER                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Primitives                                │
//! │  ├── vec2.rs     - 2D vector                                 │
//! │  └── rng.rs      - Seeded Xorshift128+ PRNG                  │
//! │                                                              │
//! │  game/           - Simulation (synchronous)                  │
//! │  ├── player.rs   - Stats, damage, barrier, progression       │
//! │  ├── effects.rs  - Auras and timed effects                   │
//! │  ├── cards.rs    - Catalog, draft, set bonuses               │
//! │  ├── world.rs    - Arena, spawns, deaths                     │
//! │  └── tick.rs     - Authoritative simulation step             │
//! │                                                              │
//! │  network/        - Networking (async)                        │
//! │  ├── hub.rs      - Shared world, session loops               │
//! │  ├── session.rs  - Bounded outbound queues                   │
//! │  ├── protocol.rs - Message types                             │
//! │  └── server.rs   - WebSocket server                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//!
//! One `World` behind one `RwLock`. The simulation loop writes, the
//! broadcast and progression loops read and deliver after releasing it.
//! A client that cannot drain its queue is disconnected rather than
//! stalling everyone else.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod network;

// Re-export commonly used types
pub use core::vec2::Vec2;
pub use core::rng::DeterministicRng;
pub use game::cards::CardCatalog;
pub use game::player::{Player, PlayerId};
pub use game::world::World;
pub use network::{GameServer, ServerConfig};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Simulation tick rate (Hz)
pub const TICK_RATE: u32 = 60;

/// Snapshot broadcast rate (Hz)
pub const BROADCAST_RATE: u32 = 30;

/// Default arena side length
pub const DEFAULT_WORLD_SIZE: f64 = 8000.0;
