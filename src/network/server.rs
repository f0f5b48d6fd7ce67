//! WebSocket Game Server
//!
//! Accepts WebSocket connections, registers each one with the hub and runs
//! its read and write pumps. The hub's loops run alongside the accept loop
//! until shutdown.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, OwnedSemaphorePermit, Semaphore};
use tokio::time::timeout;
use tokio_tungstenite::{accept_async, tungstenite::Message};
use tracing::{debug, error, info, instrument, warn};

use crate::game::cards::{CardCatalog, CatalogError};
use crate::game::world::World;
use crate::network::hub::Hub;
use crate::network::protocol::ServerMessage;

/// How long a closing connection may spend flushing its queue.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(1);

/// How long an accepted socket may take to finish the WebSocket handshake.
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address.
    pub bind_addr: SocketAddr,
    /// Maximum concurrent connections.
    pub max_connections: usize,
    /// Simulation rate (Hz).
    pub tick_rate: u32,
    /// Snapshot rate (Hz).
    pub broadcast_rate: u32,
    /// Period of the card offer check.
    pub progression_interval: Duration,
    /// Outbound frames buffered per session before it is dropped.
    pub queue_capacity: usize,
    /// Side length of the square arena.
    pub world_size: f64,
    /// Card catalog file.
    pub catalog_path: PathBuf,
    /// Cards per offer.
    pub offer_size: usize,
    /// Server version string.
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 6767)),
            max_connections: 1000,
            tick_rate: crate::TICK_RATE,
            broadcast_rate: crate::BROADCAST_RATE,
            progression_interval: Duration::from_millis(500),
            queue_capacity: 256,
            world_size: crate::DEFAULT_WORLD_SIZE,
            catalog_path: PathBuf::from("./cards.json"),
            offer_size: 3,
            version: crate::VERSION.to_string(),
        }
    }
}

impl ServerConfig {
    /// Defaults overlaid with `ORB_ARENA_*` environment variables.
    pub fn from_env() -> Result<Self, GameServerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`.
    ///
    /// Recognized keys: `ORB_ARENA_BIND`, `ORB_ARENA_MAX_CONNECTIONS`,
    /// `ORB_ARENA_TICK_RATE`, `ORB_ARENA_BROADCAST_RATE`,
    /// `ORB_ARENA_PROGRESSION_MS`, `ORB_ARENA_QUEUE_CAPACITY`,
    /// `ORB_ARENA_WORLD_SIZE`, `ORB_ARENA_CARDS`, `ORB_ARENA_OFFER_SIZE`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, GameServerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = parse_var(&lookup, "ORB_ARENA_BIND")? {
            config.bind_addr = addr;
        }
        if let Some(n) = parse_var(&lookup, "ORB_ARENA_MAX_CONNECTIONS")? {
            config.max_connections = n;
        }
        if let Some(hz) = parse_var(&lookup, "ORB_ARENA_TICK_RATE")? {
            config.tick_rate = hz;
        }
        if let Some(hz) = parse_var(&lookup, "ORB_ARENA_BROADCAST_RATE")? {
            config.broadcast_rate = hz;
        }
        if let Some(ms) = parse_var(&lookup, "ORB_ARENA_PROGRESSION_MS")? {
            config.progression_interval = Duration::from_millis(ms);
        }
        if let Some(n) = parse_var(&lookup, "ORB_ARENA_QUEUE_CAPACITY")? {
            config.queue_capacity = n;
        }
        if let Some(size) = parse_var::<f64, _>(&lookup, "ORB_ARENA_WORLD_SIZE")? {
            if !size.is_finite() || size <= 0.0 {
                return Err(GameServerError::InvalidConfig {
                    key: "ORB_ARENA_WORLD_SIZE",
                    value: size.to_string(),
                });
            }
            config.world_size = size;
        }
        if let Some(path) = lookup("ORB_ARENA_CARDS") {
            config.catalog_path = PathBuf::from(path);
        }
        if let Some(n) = parse_var(&lookup, "ORB_ARENA_OFFER_SIZE")? {
            config.offer_size = n;
        }

        Ok(config)
    }
}

fn parse_var<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, GameServerError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| GameServerError::InvalidConfig { key, value: raw }),
    }
}

/// Game server errors.
#[derive(Debug, thiserror::Error)]
pub enum GameServerError {
    /// Failed to bind to address.
    #[error("Failed to bind: {0}")]
    BindFailed(#[from] std::io::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// Card catalog could not be loaded.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// A configuration value did not parse.
    #[error("Invalid value for {key}: {value:?}")]
    InvalidConfig {
        /// Variable name.
        key: &'static str,
        /// Raw value.
        value: String,
    },
}

/// The game server.
pub struct GameServer {
    /// Server configuration.
    config: ServerConfig,
    /// Shared world and sessions.
    hub: Arc<Hub>,
    /// One permit per accepted socket, held from accept until the connection task ends.
    connection_slots: Arc<Semaphore>,
    /// Shutdown signal.
    shutdown_tx: broadcast::Sender<()>,
}

impl GameServer {
    /// Create a server around a fresh world and a loaded catalog.
    pub fn new(config: ServerConfig, catalog: Arc<CardCatalog>) -> Self {
        let world = World::from_entropy(config.world_size);
        let hub = Arc::new(Hub::new(world, catalog, config.clone()));
        let (shutdown_tx, _) = broadcast::channel(1);
        let connection_slots = Arc::new(Semaphore::new(connection_limit(&config)));

        Self {
            config,
            hub,
            connection_slots,
            shutdown_tx,
        }
    }

    /// Load the catalog named by `config` and create a server.
    pub fn from_config(config: ServerConfig) -> Result<Self, GameServerError> {
        let catalog = CardCatalog::from_json_file(&config.catalog_path)?;
        info!(
            cards = catalog.cards().len(),
            path = %config.catalog_path.display(),
            "Card catalog loaded"
        );
        Ok(Self::new(config, Arc::new(catalog)))
    }

    /// Shared hub.
    pub fn hub(&self) -> &Arc<Hub> {
        &self.hub
    }

    /// Bind the configured address and serve until shutdown.
    #[instrument(skip(self), fields(addr = %self.config.bind_addr))]
    pub async fn run(&self) -> Result<(), GameServerError> {
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener until shutdown.
    pub async fn serve(&self, listener: TcpListener) -> Result<(), GameServerError> {
        info!(
            "Game server v{} listening on {}",
            self.config.version,
            listener.local_addr()?
        );

        let loops = self.hub.spawn_loops(&self.shutdown_tx);
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, addr)) => {
                            let Ok(slot) = Arc::clone(&self.connection_slots).try_acquire_owned() else {
                                warn!("Connection limit reached, rejecting {}", addr);
                                continue;
                            };

                            debug!("New connection from {}", addr);
                            self.handle_connection(stream, addr, slot);
                        }
                        Err(e) => {
                            error!("Accept error: {}", e);
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }

        for handle in loops {
            if let Err(e) = handle.await {
                error!("Loop task failed: {}", e);
            }
        }

        Ok(())
    }

    /// Run one connection: register it, pump frames both ways, clean up.
    ///
    /// `slot` is released when the task ends, whether or not the handshake succeeded.
    fn handle_connection(&self, stream: TcpStream, addr: SocketAddr, slot: OwnedSemaphorePermit) {
        let hub = Arc::clone(&self.hub);
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        tokio::spawn(async move {
            let _slot = slot;
            let ws_stream = match timeout(HANDSHAKE_TIMEOUT, accept_async(stream)).await {
                Ok(Ok(ws)) => ws,
                Ok(Err(e)) => {
                    warn!("WebSocket handshake failed for {}: {}", addr, e);
                    return;
                }
                Err(_) => {
                    warn!("WebSocket handshake timed out for {}", addr);
                    return;
                }
            };

            let (mut ws_sender, mut ws_receiver) = ws_stream.split();
            let (player_id, mut frame_rx) = hub.connect().await;
            info!(player = %player_id, %addr, "Client joined");

            // Ends when the session is dropped or the socket fails
            let mut writer = tokio::spawn(async move {
                while let Some(frame) = frame_rx.recv().await {
                    if ws_sender.send(Message::Text(frame.to_string())).await.is_err() {
                        break;
                    }
                }
                let _ = ws_sender.close().await;
            });
            let mut writer_done = false;

            loop {
                tokio::select! {
                    msg = ws_receiver.next() => {
                        match msg {
                            Some(Ok(Message::Text(text))) => {
                                hub.handle_frame(&player_id, &text).await;
                            }
                            Some(Ok(Message::Binary(_))) => {
                                debug!(player = %player_id, "Ignoring binary frame");
                            }
                            Some(Ok(Message::Close(_))) | None => {
                                debug!("Client {} disconnected", addr);
                                break;
                            }
                            Some(Err(e)) => {
                                debug!("WebSocket error for {}: {}", addr, e);
                                break;
                            }
                            _ => {}
                        }
                    }
                    _ = &mut writer => {
                        writer_done = true;
                        debug!(player = %player_id, "Outbound pump closed");
                        break;
                    }
                    _ = shutdown_rx.recv() => {
                        let notice = ServerMessage::Shutdown {
                            reason: "Server shutting down".to_string(),
                        };
                        hub.send_message(&player_id, &notice).await;
                        break;
                    }
                }
            }

            // Dropping the session closes the queue; the writer drains what is left
            hub.disconnect(&player_id).await;
            if !writer_done && timeout(DRAIN_TIMEOUT, &mut writer).await.is_err() {
                writer.abort();
            }

            info!(player = %player_id, %addr, "Client left");
        });
    }

    /// Shutdown the server.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }

    /// Accepted sockets still holding a connection slot, handshakes in progress included.
    pub fn connection_count(&self) -> usize {
        connection_limit(&self.config).saturating_sub(self.connection_slots.available_permits())
    }
}

fn connection_limit(config: &ServerConfig) -> usize {
    config.max_connections.min(Semaphore::MAX_PERMITS)
}
