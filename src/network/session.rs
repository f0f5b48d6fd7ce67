//! Session Management
//!
//! One session per connected client. Each session owns the sending half of
//! a bounded outbound queue; the connection's write pump owns the other.
//! A full queue means the client is not keeping up and the session is
//! dropped, which closes the queue and ends the write pump.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};
use tracing::warn;

use crate::game::player::PlayerId;

/// A serialized frame shared by every recipient of a broadcast.
pub type Frame = Arc<str>;

/// Session errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Outbound queue is full.
    #[error("Outbound queue full")]
    QueueFull,

    /// Outbound queue is closed.
    #[error("Session closed")]
    Closed,

    /// No session with that id.
    #[error("Session not found")]
    NotFound,
}

/// A connected client.
#[derive(Debug)]
pub struct Session {
    /// Player controlled by this session.
    pub player_id: PlayerId,
    /// Outbound queue.
    sender: mpsc::Sender<Frame>,
}

impl Session {
    /// Create a session around an outbound queue.
    pub fn new(player_id: PlayerId, sender: mpsc::Sender<Frame>) -> Self {
        Self { player_id, sender }
    }

    /// Enqueue a frame without waiting.
    pub fn try_deliver(&self, frame: Frame) -> Result<(), SessionError> {
        self.sender.try_send(frame).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => SessionError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => SessionError::Closed,
        })
    }
}

// =============================================================================
// SESSION MANAGER
// =============================================================================

/// Registry of connected sessions.
pub struct SessionManager {
    sessions: RwLock<BTreeMap<PlayerId, Session>>,
}

impl SessionManager {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(BTreeMap::new()),
        }
    }

    /// Register a session, replacing any previous one for the same player.
    pub async fn register(&self, session: Session) {
        let mut sessions = self.sessions.write().await;
        sessions.insert(session.player_id, session);
    }

    /// Remove a session. Dropping it closes the outbound queue.
    pub async fn unregister(&self, player_id: &PlayerId) -> bool {
        let mut sessions = self.sessions.write().await;
        sessions.remove(player_id).is_some()
    }

    /// Check if a session is registered.
    pub async fn contains(&self, player_id: &PlayerId) -> bool {
        self.sessions.read().await.contains_key(player_id)
    }

    /// Number of registered sessions.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Deliver a frame to one session.
    ///
    /// On failure the session is removed.
    pub async fn send_to(&self, player_id: &PlayerId, frame: Frame) -> Result<(), SessionError> {
        let result = {
            let sessions = self.sessions.read().await;
            match sessions.get(player_id) {
                Some(session) => session.try_deliver(frame),
                None => return Err(SessionError::NotFound),
            }
        };

        if let Err(e) = &result {
            warn!(player = %player_id, error = %e, "Dropping unresponsive session");
            self.unregister(player_id).await;
        }
        result
    }

    /// Deliver a frame to every session without blocking.
    ///
    /// Sessions whose queue is full or closed are removed; their ids are
    /// returned.
    pub async fn broadcast(&self, frame: &Frame) -> Vec<PlayerId> {
        let failed: Vec<PlayerId> = {
            let sessions = self.sessions.read().await;
            sessions
                .values()
                .filter_map(|s| s.try_deliver(Arc::clone(frame)).err().map(|e| (s.player_id, e)))
                .map(|(id, e)| {
                    warn!(player = %id, error = %e, "Dropping unresponsive session");
                    id
                })
                .collect()
        };

        if !failed.is_empty() {
            let mut sessions = self.sessions.write().await;
            for id in &failed {
                sessions.remove(id);
            }
        }
        failed
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}
