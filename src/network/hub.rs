//! Session Hub
//!
//! Owns the single shared world behind one `RwLock` and the session
//! registry behind another. Three loops drive it:
//!
//! - simulation: write lock, advance by the wall-clock delta
//! - broadcast: read lock for the snapshot, deliver after release
//! - progression: read lock to find due players, then draft per player
//!
//! The world lock and the session lock are never held at the same time.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{broadcast, mpsc, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::game::cards::CardCatalog;
use crate::game::events::{GameEvent, GameEventData};
use crate::game::player::PlayerId;
use crate::game::tick::{tick, TickResult};
use crate::game::world::World;
use crate::network::protocol::{CardOffer, ClientMessage, ServerMessage, Welcome};
use crate::network::server::ServerConfig;
use crate::network::session::{Frame, Session, SessionManager};
use crate::network::snapshot::build_snapshot;

/// Largest delta fed to one simulation step, in seconds.
///
/// A stalled runtime resumes with one bounded step instead of a jump.
const MAX_STEP: f64 = 0.25;

/// Shared server state.
pub struct Hub {
    world: RwLock<World>,
    catalog: Arc<CardCatalog>,
    sessions: SessionManager,
    config: ServerConfig,
}

impl Hub {
    /// Create a hub around an existing world.
    pub fn new(world: World, catalog: Arc<CardCatalog>, config: ServerConfig) -> Self {
        Self {
            world: RwLock::new(world),
            catalog,
            sessions: SessionManager::new(),
            config,
        }
    }

    /// Shared world lock.
    pub fn world(&self) -> &RwLock<World> {
        &self.world
    }

    /// Session registry.
    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Card catalog.
    pub fn catalog(&self) -> &CardCatalog {
        &self.catalog
    }

    // ===== SESSIONS =====

    /// Register a new connection: spawn its player, open its queue and
    /// send `welcome`. Returns the id and the receiving end of the queue.
    pub async fn connect(&self) -> (PlayerId, mpsc::Receiver<Frame>) {
        let player_id = PlayerId::random();
        let (tx, rx) = mpsc::channel(self.config.queue_capacity.max(1));

        // Queued before registration so no snapshot can overtake it
        let welcome = ServerMessage::Welcome(Welcome {
            player_id: player_id.to_uuid_string(),
        });
        match welcome.to_json() {
            Ok(json) => {
                let _ = tx.try_send(Frame::from(json));
            }
            Err(e) => error!("Failed to serialize welcome: {}", e),
        }

        self.world.write().await.add_player(player_id);
        self.sessions.register(Session::new(player_id, tx)).await;

        let count = self.sessions.session_count().await;
        info!(player = %player_id, sessions = count, "Session registered");

        (player_id, rx)
    }

    /// Remove a session and its player.
    pub async fn disconnect(&self, player_id: &PlayerId) {
        self.sessions.unregister(player_id).await;
        self.world.write().await.remove_player(player_id);
        debug!(player = %player_id, "Session unregistered");
    }

    /// Serialize and enqueue one message for one session.
    ///
    /// A session that cannot take it is dropped along with its player.
    pub async fn send_message(&self, player_id: &PlayerId, message: &ServerMessage) {
        let frame: Frame = match message.to_json() {
            Ok(json) => json.into(),
            Err(e) => {
                error!("Failed to serialize message: {}", e);
                return;
            }
        };
        if self.sessions.send_to(player_id, frame).await.is_err() {
            self.world.write().await.remove_player(player_id);
        }
    }

    // ===== INTENTS =====

    /// Handle a raw text frame. Malformed frames are dropped.
    pub async fn handle_frame(&self, player_id: &PlayerId, text: &str) {
        match ClientMessage::from_json(text) {
            Ok(message) => self.handle_message(player_id, message).await,
            Err(e) => debug!(player = %player_id, error = %e, "Dropping malformed frame"),
        }
    }

    /// Apply a decoded client intent.
    pub async fn handle_message(&self, player_id: &PlayerId, message: ClientMessage) {
        match message {
            ClientMessage::Input(input) => {
                self.world.write().await.set_input(player_id, input);
            }
            ClientMessage::CardChoice(choice) => {
                self.handle_card_choice(player_id, choice.card_id).await;
            }
        }
    }

    /// Apply the chosen card. Unknown cards and players are ignored.
    pub async fn handle_card_choice(&self, player_id: &PlayerId, card_id: u64) -> bool {
        let Some(card) = self.catalog.get(card_id) else {
            warn!(player = %player_id, card_id, "Unknown card chosen");
            return false;
        };
        self.world
            .write()
            .await
            .choose_card(player_id, card, &self.catalog)
    }

    // ===== PERIODIC WORK =====

    /// Advance the simulation by `dt` seconds.
    ///
    /// Drained events are logged after the world lock is released.
    pub async fn step(&self, dt: f64) -> TickResult {
        let result = {
            let mut world = self.world.write().await;
            tick(&mut world, dt)
        };
        log_events(&result.events);
        result
    }

    /// Snapshot the world and push it to every session.
    ///
    /// Sessions that cannot keep up are dropped along with their players.
    pub async fn broadcast_state(&self) {
        let snapshot = {
            let world = self.world.read().await;
            build_snapshot(&world)
        };

        let frame: Frame = match ServerMessage::GameState(snapshot).to_json() {
            Ok(json) => json.into(),
            Err(e) => {
                error!("Failed to serialize state: {}", e);
                return;
            }
        };

        let dropped = self.sessions.broadcast(&frame).await;
        if !dropped.is_empty() {
            let mut world = self.world.write().await;
            for id in &dropped {
                world.remove_player(id);
            }
        }
    }

    /// Offer cards to every player whose score crossed its threshold.
    pub async fn check_card_offers(&self) {
        let due = self.world.read().await.players_due_cards();

        for player_id in due {
            let offer = {
                let mut world = self.world.write().await;
                world.draft_offer(&player_id, &self.catalog, self.config.offer_size)
            };

            if let Some(cards) = offer {
                info!(player = %player_id, cards = cards.len(), "Card offer sent");
                self.send_message(&player_id, &ServerMessage::CardOffer(CardOffer { cards }))
                    .await;
            }
        }
    }

    // ===== LOOPS =====

    /// Spawn the simulation, broadcast and progression loops.
    ///
    /// Each loop exits when `shutdown` fires.
    pub fn spawn_loops(self: &Arc<Self>, shutdown: &broadcast::Sender<()>) -> Vec<JoinHandle<()>> {
        vec![
            tokio::spawn(Arc::clone(self).run_simulation(shutdown.subscribe())),
            tokio::spawn(Arc::clone(self).run_broadcast(shutdown.subscribe())),
            tokio::spawn(Arc::clone(self).run_progression(shutdown.subscribe())),
        ]
    }

    async fn run_simulation(self: Arc<Self>, mut shutdown: broadcast::Receiver<()>) {
        let period = Duration::from_secs_f64(1.0 / f64::from(self.config.tick_rate.max(1)));
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut last = Instant::now();

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let now = Instant::now();
                    let dt = now.duration_since(last).as_secs_f64().min(MAX_STEP);
                    last = now;
                    self.step(dt).await;
                }
                _ = shutdown.recv() => break,
            }
        }
        debug!("Simulation loop stopped");
    }

    async fn run_broadcast(self: Arc<Self>, mut shutdown: broadcast::Receiver<()>) {
        let period = Duration::from_secs_f64(1.0 / f64::from(self.config.broadcast_rate.max(1)));
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => self.broadcast_state().await,
                _ = shutdown.recv() => break,
            }
        }
        debug!("Broadcast loop stopped");
    }

    async fn run_progression(self: Arc<Self>, mut shutdown: broadcast::Receiver<()>) {
        let mut ticker = interval(self.config.progression_interval.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => self.check_card_offers().await,
                _ = shutdown.recv() => break,
            }
        }
        debug!("Progression loop stopped");
    }
}

fn log_events(events: &[GameEvent]) {
    for event in events {
        let player = event.player_id();
        match &event.data {
            GameEventData::PelletConsumed {
                pellet_id,
                new_score,
                ..
            } => {
                debug!(tick = event.tick, %player, pellet = pellet_id, score = new_score, "Pellet consumed");
            }
            GameEventData::PlayerKilled {
                killer_id,
                cause,
                victim_score,
                ..
            } => {
                info!(
                    tick = event.tick,
                    victim = %player,
                    killer = ?killer_id.map(|k| k.short()),
                    ?cause,
                    victim_score,
                    "Player killed"
                );
            }
            GameEventData::CardApplied { card_id, card_name, .. } => {
                info!(tick = event.tick, %player, card_id, card = %card_name, "Card applied");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::cards::{Card, CardEffect, Rarity, Stat};
    use crate::game::input::PlayerInput;
    use crate::network::protocol::CardChoice;

    fn catalog() -> Arc<CardCatalog> {
        let cards = (1..=4)
            .map(|id| Card {
                id,
                name: format!("Card {id}"),
                description: String::new(),
                rarity: Rarity::Common,
                effects: vec![CardEffect::stat(Stat::Damage, 2.0)],
                set: None,
            })
            .collect();
        Arc::new(CardCatalog::new(cards, CardCatalog::builtin_sets()).unwrap())
    }

    fn hub_with_queue(capacity: usize) -> Hub {
        let config = ServerConfig {
            queue_capacity: capacity,
            ..ServerConfig::default()
        };
        Hub::new(World::new(200.0, 8), catalog(), config)
    }

    fn parse(frame: Frame) -> serde_json::Value {
        serde_json::from_str(&frame).unwrap()
    }

    #[tokio::test]
    async fn test_connect_sends_welcome() {
        let hub = hub_with_queue(8);
        let (id, mut rx) = hub.connect().await;

        let welcome = parse(rx.recv().await.unwrap());
        assert_eq!(welcome["type"], "welcome");
        assert_eq!(welcome["data"]["player_id"], id.to_uuid_string());
        assert!(hub.world().read().await.players.contains_key(&id));

        hub.disconnect(&id).await;
        assert!(!hub.world().read().await.players.contains_key(&id));
        assert_eq!(hub.sessions().session_count().await, 0);
    }

    #[tokio::test]
    async fn test_input_frame_and_malformed_frame() {
        let hub = hub_with_queue(8);
        let (id, _rx) = hub.connect().await;

        hub.handle_frame(&id, r#"{"type":"input","data":{"w":true,"a":false,"s":false,"d":false}}"#)
            .await;
        assert_eq!(
            hub.world().read().await.players[&id].input,
            PlayerInput::new(true, false, false, false)
        );

        hub.handle_frame(&id, "garbage").await;
        hub.handle_frame(&id, r#"{"type":"input","data":7}"#).await;
        assert_eq!(
            hub.world().read().await.players[&id].input,
            PlayerInput::new(true, false, false, false)
        );
    }

    #[tokio::test]
    async fn test_card_offer_and_choice() {
        let hub = hub_with_queue(8);
        let (id, mut rx) = hub.connect().await;
        let _welcome = rx.recv().await.unwrap();

        hub.check_card_offers().await;
        assert!(rx.try_recv().is_err());

        hub.world().write().await.players.get_mut(&id).unwrap().score = 10;
        hub.check_card_offers().await;

        let offer = parse(rx.recv().await.unwrap());
        assert_eq!(offer["type"], "card_offer");
        let cards = offer["data"]["cards"].as_array().unwrap();
        assert_eq!(cards.len(), 3);
        let card_id = cards[0]["id"].as_u64().unwrap();

        // Pending offers are not repeated
        hub.check_card_offers().await;
        assert!(rx.try_recv().is_err());

        hub.handle_message(&id, ClientMessage::CardChoice(CardChoice { card_id }))
            .await;
        let world = hub.world().read().await;
        let player = &world.players[&id];
        assert_eq!(player.damage, 20.0);
        assert_eq!(player.next_card_threshold, 20);
        assert!(!player.card_offer_pending);
    }

    #[tokio::test]
    async fn test_unknown_card_choice_ignored() {
        let hub = hub_with_queue(8);
        let (id, _rx) = hub.connect().await;

        assert!(!hub.handle_card_choice(&id, 999).await);
        assert_eq!(hub.world().read().await.players[&id].damage, 10.0);

        assert!(!hub.handle_card_choice(&PlayerId::new([0; 16]), 1).await);
    }

    #[tokio::test]
    async fn test_step_advances_world() {
        let hub = hub_with_queue(8);
        let (id, _rx) = hub.connect().await;
        hub.handle_message(&id, ClientMessage::Input(PlayerInput::new(false, false, false, true)))
            .await;

        hub.step(1.0 / 60.0).await;
        let world = hub.world().read().await;
        assert_eq!(world.tick, 1);
        assert!(world.players[&id].velocity.x > 0.0);
    }

    #[tokio::test]
    async fn test_step_drains_card_event() {
        let hub = hub_with_queue(8);
        let (id, _rx) = hub.connect().await;
        assert!(hub.handle_card_choice(&id, 1).await);

        let result = hub.step(1.0 / 60.0).await;
        assert!(result.events.iter().any(|event| matches!(
            &event.data,
            GameEventData::CardApplied { player_id, card_id: 1, .. } if *player_id == id
        )));

        // Drained events are not reported twice
        let result = hub.step(1.0 / 60.0).await;
        assert!(!result
            .events
            .iter()
            .any(|event| matches!(event.data, GameEventData::CardApplied { .. })));
        assert!(hub.world().write().await.take_events().is_empty());
    }

    #[tokio::test]
    async fn test_slow_session_dropped_without_blocking() {
        let hub = hub_with_queue(2);
        let (fast, mut fast_rx) = hub.connect().await;
        let (slow, _slow_rx) = hub.connect().await;

        let result = tokio::time::timeout(Duration::from_secs(5), async {
            for _ in 0..4 {
                hub.broadcast_state().await;
                while fast_rx.try_recv().is_ok() {}
            }
        })
        .await;
        assert!(result.is_ok(), "broadcast blocked on a full queue");

        assert!(hub.sessions().contains(&fast).await);
        assert!(!hub.sessions().contains(&slow).await);
        let world = hub.world().read().await;
        assert!(world.players.contains_key(&fast));
        assert!(!world.players.contains_key(&slow));
    }

    #[tokio::test]
    async fn test_loops_stop_on_shutdown() {
        let hub = Arc::new(hub_with_queue(8));
        let (shutdown_tx, _) = broadcast::channel(1);
        let handles = hub.spawn_loops(&shutdown_tx);

        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown_tx.send(()).unwrap();

        for handle in handles {
            tokio::time::timeout(Duration::from_secs(2), handle)
                .await
                .unwrap()
                .unwrap();
        }
        assert!(hub.world().read().await.tick > 0);
    }
}
