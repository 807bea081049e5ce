use crate::game::{ClientSession, Step};
use crate::input::parse_line;
use bincode::{deserialize, serialize};
use log::{error, info, warn};
use shared::{Packet, PlayerId, MAX_DATAGRAM_SIZE};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UdpSocket;
use tokio::time::interval;

pub type ClientError = Box<dyn std::error::Error + Send + Sync>;

/// Sent well inside the server's observer timeout.
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(2);

pub struct Client {
    socket: UdpSocket,
    server_addr: SocketAddr,
    session: ClientSession,
    join_on_connect: Option<String>,
}

impl Client {
    pub async fn new(
        server_addr: &str,
        player: Option<PlayerId>,
        game: Option<String>,
    ) -> Result<Self, ClientError> {
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        let server_addr = server_addr.parse()?;

        Ok(Client {
            socket,
            server_addr,
            session: ClientSession::new(player),
            join_on_connect: game,
        })
    }

    async fn send_packet(&self, packet: &Packet) -> Result<(), ClientError> {
        let data = serialize(packet)?;
        self.socket.send_to(&data, self.server_addr).await?;
        Ok(())
    }

    /// Carries out session steps; returns false once the client should stop.
    async fn perform(&self, steps: Vec<Step>) -> bool {
        for step in steps {
            match step {
                Step::Send(packet) => {
                    if let Err(e) = self.send_packet(&packet).await {
                        error!("Error sending packet: {}", e);
                    }
                }
                Step::Show(text) => println!("{}", text),
                Step::Quit => return false,
            }
        }
        true
    }

    pub async fn run(&mut self) -> Result<(), ClientError> {
        info!("Connecting to server at {}...", self.server_addr);
        self.send_packet(&ClientSession::connect_packet()).await?;

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut heartbeat = interval(HEARTBEAT_INTERVAL);
        let mut buffer = vec![0u8; MAX_DATAGRAM_SIZE];

        loop {
            tokio::select! {
                result = self.socket.recv_from(&mut buffer) => {
                    match result {
                        Ok((len, addr)) if addr == self.server_addr => {
                            let Ok(packet) = deserialize::<Packet>(&buffer[0..len]) else {
                                warn!("Failed to deserialize packet from server");
                                continue;
                            };
                            let connecting = !self.session.is_connected();
                            let steps = self.session.on_packet(packet);
                            if !self.perform(steps).await {
                                break;
                            }
                            if connecting && self.session.is_connected() {
                                if let Some(game_id) = self.join_on_connect.take() {
                                    let join = Packet::Subscribe { game_id };
                                    self.send_packet(&join).await?;
                                }
                            }
                        },
                        Ok((_, addr)) => warn!("Ignoring packet from {}", addr),
                        Err(e) => error!("Error receiving packet: {}", e),
                    }
                },

                line = lines.next_line() => {
                    let Some(line) = line? else {
                        break;
                    };
                    let steps = match parse_line(&line) {
                        Ok(Some(command)) => self.session.prepare(command),
                        Ok(None) => continue,
                        Err(e) => Err(e.to_string()),
                    };
                    match steps {
                        Ok(steps) => {
                            if !self.perform(steps).await {
                                break;
                            }
                        }
                        Err(message) => println!("{}", message),
                    }
                },

                _ = heartbeat.tick() => {
                    if self.session.is_connected() {
                        self.send_packet(&Packet::Heartbeat).await?;
                    }
                },
            }
        }

        if self.session.is_connected() {
            let _ = self.send_packet(&Packet::Disconnect).await;
        }

        Ok(())
    }
}
