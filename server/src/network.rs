//! Server network layer: UDP transport for commands and game notifications

use crate::config::ServerConfig;
use crate::engine::ActionEngine;
use crate::notifier::ChannelNotifier;
use crate::observers::ObserverManager;
use crate::rng::Randomness;
use crate::store::GameStore;
use bincode::{deserialize, serialize};
use log::{debug, error, info, warn};
use shared::{Game, Packet, MAX_DATAGRAM_SIZE, PROTOCOL_VERSION};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::{mpsc, RwLock};
use tokio::time::interval;
use uuid::Uuid;

pub type NetworkError = Box<dyn std::error::Error + Send + Sync>;

/// Messages sent from network tasks to main server loop
#[derive(Debug)]
pub enum ServerMessage {
    PacketReceived { packet: Packet, addr: SocketAddr },
    ObserverTimeout { observer_id: u32 },
    Shutdown,
}

/// Messages queued for the sender task
#[derive(Debug)]
pub enum GameMessage {
    SendPacket { packet: Packet, addr: SocketAddr },
    /// Fan a snapshot out to the game's subscribers
    Publish { game: Box<Game> },
}

/// Main server coordinating networking and the action engine
pub struct Server {
    socket: Arc<UdpSocket>,
    observers: Arc<RwLock<ObserverManager>>,
    engine: Arc<ActionEngine>,

    // Communication channels
    server_tx: mpsc::UnboundedSender<ServerMessage>,
    server_rx: mpsc::UnboundedReceiver<ServerMessage>,
    game_tx: mpsc::UnboundedSender<GameMessage>,
    game_rx: mpsc::UnboundedReceiver<GameMessage>,
}

impl Server {
    pub async fn new(
        config: &ServerConfig,
        randomness: Box<dyn Randomness>,
    ) -> Result<Self, NetworkError> {
        let socket = Arc::new(UdpSocket::bind(config.bind_address()).await?);
        info!("Server listening on {}", socket.local_addr()?);

        let (server_tx, server_rx) = mpsc::unbounded_channel();
        let (game_tx, game_rx) = mpsc::unbounded_channel();

        let engine = ActionEngine::new(
            Arc::new(GameStore::new()),
            config.engine_config(),
            Arc::new(ChannelNotifier::new(game_tx.clone())),
            randomness,
        );

        Ok(Server {
            socket,
            observers: Arc::new(RwLock::new(ObserverManager::new(
                config.max_observers,
                config.observer_timeout(),
            ))),
            engine: Arc::new(engine),
            server_tx,
            server_rx,
            game_tx,
            game_rx,
        })
    }

    pub fn engine(&self) -> Arc<ActionEngine> {
        Arc::clone(&self.engine)
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Sender that stops [`Server::run`] when given [`ServerMessage::Shutdown`].
    pub fn control(&self) -> mpsc::UnboundedSender<ServerMessage> {
        self.server_tx.clone()
    }

    /// Spawns task that continuously listens for incoming packets
    fn spawn_network_receiver(&self) {
        let socket = Arc::clone(&self.socket);
        let server_tx = self.server_tx.clone();

        tokio::spawn(async move {
            let mut buffer = vec![0u8; MAX_DATAGRAM_SIZE];

            loop {
                match socket.recv_from(&mut buffer).await {
                    Ok((len, addr)) => {
                        if let Ok(packet) = deserialize::<Packet>(&buffer[0..len]) {
                            if let Err(e) =
                                server_tx.send(ServerMessage::PacketReceived { packet, addr })
                            {
                                error!("Failed to send packet to main loop: {}", e);
                                break;
                            }
                        } else {
                            warn!("Failed to deserialize packet from {}", addr);
                        }
                    }
                    Err(e) => {
                        error!("Error receiving packet: {}", e);
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    }
                }
            }
        });
    }

    /// Spawns task that processes outgoing packet queue
    fn spawn_network_sender(&mut self) {
        let socket = Arc::clone(&self.socket);
        let observers = Arc::clone(&self.observers);
        let mut game_rx = std::mem::replace(&mut self.game_rx, mpsc::unbounded_channel().1);

        tokio::spawn(async move {
            while let Some(message) = game_rx.recv().await {
                match message {
                    GameMessage::SendPacket { packet, addr } => {
                        if let Err(e) = Self::send_packet_impl(&socket, &packet, addr).await {
                            error!("Failed to send packet to {}: {}", addr, e);
                        }
                    }
                    GameMessage::Publish { game } => {
                        let subscribers = {
                            let observers_guard = observers.read().await;
                            observers_guard.subscribers(&game.id)
                        };
                        if subscribers.is_empty() {
                            continue;
                        }

                        let game_id = game.id;
                        let data = match encode(&Packet::GameStateUpdated { game: *game }) {
                            Ok(data) => data,
                            Err(e) => {
                                error!("Dropping update for game {}: {}", game_id, e);
                                continue;
                            }
                        };

                        for (observer_id, addr) in subscribers {
                            if let Err(e) = socket.send_to(&data, addr).await {
                                error!("Failed to send update to observer {}: {}", observer_id, e);
                            }
                        }
                        debug!("Published game {} ({} bytes)", game_id, data.len());
                    }
                }
            }
        });
    }

    /// Spawns task that monitors observer timeouts
    fn spawn_timeout_checker(&self) {
        let observers = Arc::clone(&self.observers);
        let server_tx = self.server_tx.clone();

        tokio::spawn(async move {
            let mut interval = interval(Duration::from_secs(1));

            loop {
                interval.tick().await;

                let timed_out = {
                    let mut observers_guard = observers.write().await;
                    observers_guard.check_timeouts()
                };

                for observer_id in timed_out {
                    if let Err(e) = server_tx.send(ServerMessage::ObserverTimeout { observer_id }) {
                        error!("Failed to send timeout message: {}", e);
                        return;
                    }
                }
            }
        });
    }

    async fn send_packet_impl(
        socket: &UdpSocket,
        packet: &Packet,
        addr: SocketAddr,
    ) -> Result<(), NetworkError> {
        let data = encode(packet)?;
        socket.send_to(&data, addr).await?;
        Ok(())
    }

    fn send_packet(&self, packet: Packet, addr: SocketAddr) {
        if let Err(e) = self.game_tx.send(GameMessage::SendPacket { packet, addr }) {
            error!("Failed to queue packet for sending: {}", e);
        }
    }

    /// Looks up the sender and records activity.
    async fn touch(&self, addr: SocketAddr) -> Option<u32> {
        let mut observers = self.observers.write().await;
        let observer_id = observers.find_observer_by_addr(addr)?;
        observers.touch(observer_id);
        Some(observer_id)
    }

    /// Processes one incoming packet
    async fn handle_packet(&mut self, packet: Packet, addr: SocketAddr) {
        match packet {
            Packet::Connect { client_version } => {
                info!(
                    "Observer connecting from {} (version: {})",
                    addr, client_version
                );

                if client_version != PROTOCOL_VERSION {
                    self.send_packet(
                        Packet::Disconnected {
                            reason: "Protocol version mismatch".to_string(),
                        },
                        addr,
                    );
                    return;
                }

                let observer_id = {
                    let mut observers = self.observers.write().await;
                    if let Some(existing_id) = observers.find_observer_by_addr(addr) {
                        info!("Removing existing observer {} from {}", existing_id, addr);
                        observers.remove_observer(&existing_id);
                    }
                    observers.add_observer(addr)
                };

                let response = match observer_id {
                    Some(client_id) => Packet::Connected { client_id },
                    None => Packet::Disconnected {
                        reason: "Server full".to_string(),
                    },
                };
                self.send_packet(response, addr);
            }

            Packet::Heartbeat => {
                if self.touch(addr).await.is_none() {
                    debug!("Heartbeat from unknown address {}", addr);
                }
            }

            Packet::Disconnect => {
                let mut observers = self.observers.write().await;
                if let Some(observer_id) = observers.find_observer_by_addr(addr) {
                    observers.remove_observer(&observer_id);
                }
            }

            Packet::Subscribe { game_id } => {
                let Some(observer_id) = self.touch(addr).await else {
                    self.reject(addr, "Connect before subscribing");
                    return;
                };
                let Ok(game_id) = Uuid::parse_str(game_id.trim()) else {
                    warn!("Observer {} sent invalid game id {:?}", observer_id, game_id);
                    self.reject(addr, format!("{} is not a valid game id", game_id));
                    return;
                };
                let Some(game) = self.engine.get_game(&game_id).await else {
                    self.reject(addr, format!("Game {} not found", game_id));
                    return;
                };

                self.observers.write().await.subscribe(observer_id, game_id);
                info!("Observer {} subscribed to game {}", observer_id, game_id);
                self.send_packet(Packet::Subscribed { game_id }, addr);
                self.send_packet(Packet::GameStateUpdated { game }, addr);
            }

            Packet::Unsubscribe { game_id } => {
                let Some(observer_id) = self.touch(addr).await else {
                    return;
                };
                match Uuid::parse_str(game_id.trim()) {
                    Ok(game_id) => {
                        if self.observers.write().await.unsubscribe(observer_id, &game_id) {
                            info!("Observer {} left game {}", observer_id, game_id);
                        }
                    }
                    Err(_) => warn!("Observer {} sent invalid game id {:?}", observer_id, game_id),
                }
            }

            Packet::Request {
                request_id,
                command,
            } => {
                let Some(observer_id) = self.touch(addr).await else {
                    self.reject(addr, "Connect before sending commands");
                    return;
                };

                let engine = Arc::clone(&self.engine);
                let game_tx = self.game_tx.clone();
                tokio::spawn(async move {
                    let name = command.name();
                    let reply = engine.execute(command).await;
                    debug!(
                        "Observer {} request {} {}: {}",
                        observer_id,
                        request_id,
                        name,
                        if reply.is_success() { "ok" } else { "rejected" }
                    );

                    let packet = Packet::Response { request_id, reply };
                    if let Err(e) = game_tx.send(GameMessage::SendPacket { packet, addr }) {
                        error!("Failed to queue response for observer {}: {}", observer_id, e);
                    }
                });
            }

            _ => {
                warn!("Unexpected packet type from observer at {}", addr);
            }
        }
    }

    fn reject(&self, addr: SocketAddr, reason: impl Into<String>) {
        self.send_packet(
            Packet::Rejected {
                reason: reason.into(),
            },
            addr,
        );
    }

    /// Main server loop dispatching packets until shut down
    pub async fn run(&mut self) -> Result<(), NetworkError> {
        self.spawn_network_receiver();
        self.spawn_network_sender();
        self.spawn_timeout_checker();

        let mut status_interval = interval(Duration::from_secs(60));

        info!("Server started successfully");

        loop {
            tokio::select! {
                message = self.server_rx.recv() => {
                    match message {
                        Some(ServerMessage::PacketReceived { packet, addr }) => {
                            self.handle_packet(packet, addr).await;
                        },
                        Some(ServerMessage::ObserverTimeout { observer_id }) => {
                            info!("Observer {} timed out", observer_id);
                        },
                        Some(ServerMessage::Shutdown) | None => {
                            info!("Server shutting down");
                            break;
                        }
                    }
                },

                _ = status_interval.tick() => {
                    let (observer_count, topic_count) = {
                        let observers = self.observers.read().await;
                        (observers.len(), observers.topic_count())
                    };
                    let game_count = self.engine.store().len().await;
                    debug!(
                        "{} games, {} observers, {} watched games",
                        game_count, observer_count, topic_count
                    );
                },
            }
        }

        Ok(())
    }
}

/// Serializes a packet, refusing anything that cannot fit in one datagram.
pub fn encode(packet: &Packet) -> Result<Vec<u8>, NetworkError> {
    let data = serialize(packet)?;
    if data.len() > MAX_DATAGRAM_SIZE {
        return Err(format!(
            "packet of {} bytes exceeds the {} byte datagram limit",
            data.len(),
            MAX_DATAGRAM_SIZE
        )
        .into());
    }
    Ok(data)
}
