//! Network Layer
//!
//! WebSocket server for real-time multiplayer communication.
//! All gameplay runs through `game/`; this layer owns locking, queues and I/O.

pub mod protocol;
pub mod session;
pub mod snapshot;
pub mod hub;
pub mod server;

pub use protocol::{ClientMessage, ServerMessage, GameStateView, PlayerView, PelletView};
pub use session::{Frame, Session, SessionError, SessionManager};
pub use snapshot::build_snapshot;
pub use hub::Hub;
pub use server::{GameServer, ServerConfig, GameServerError};
