//! Client connection handling and the per-connection state machine.

use crate::game::World;
use crate::input::InputManager;
use crate::rendering::Renderer;
use bincode::{deserialize, serialize};
use log::{error, info, warn};
use shared::{Direction, Packet, ProtocolError, DEFAULT_SPEED};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::interval;

/// Connection lifecycle. `Disconnected` is terminal: reconnecting means a
/// brand-new connection with a fresh identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Active,
    Disconnected,
}

pub struct Client {
    socket: UdpSocket,
    server_addr: SocketAddr,
    state: ConnectionState,

    world: World,
    input: InputManager,
    renderer: Renderer,
}

impl Client {
    pub async fn new(
        server_addr: &str,
        width: usize,
        height: usize,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        let server_addr = server_addr.parse()?;

        let renderer = Renderer::new(width, height)?;

        Ok(Client {
            socket,
            server_addr,
            state: ConnectionState::Connecting,
            world: World::new(),
            input: InputManager::new(),
            renderer,
        })
    }

    async fn connect(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        info!("Connecting to server...");
        self.send_packet(&Packet::Connect { client_version: 1 })
            .await
    }

    async fn send_packet(&self, packet: &Packet) -> Result<(), Box<dyn std::error::Error>> {
        let data = serialize(packet)?;
        self.socket.send_to(&data, self.server_addr).await?;
        Ok(())
    }

    async fn send_init(&mut self) {
        // The reference client proposes its whole locally-guessed state;
        // the server treats everything but the spawn hint as advisory
        let packet = Packet::Init {
            players: self.world.players.clone(),
            local_player: self.world.make_proposal(),
            goal: self.world.make_goal_guess(),
        };
        if let Err(e) = self.send_packet(&packet).await {
            error!("Error sending join proposal: {}", e);
        }
    }

    async fn send_move(&mut self, direction: Direction) {
        let packet = Packet::MoveIntent {
            direction,
            speed: DEFAULT_SPEED,
        };
        // Fire and forget: a lost intent is resynced by the next broadcast
        if let Err(e) = self.send_packet(&packet).await {
            error!("Error sending move intent: {}", e);
        }
    }

    async fn handle_packet(&mut self, packet: Packet) {
        match packet {
            Packet::Connected { msg, connections } => {
                info!("{}, currently {} player(s)", msg, connections);
                self.world.connections = connections;

                if self.state == ConnectionState::Connecting {
                    self.state = ConnectionState::Active;
                    self.send_init().await;
                }
            }

            Packet::Joined { player_id } => {
                info!("Joined as player {}", player_id);
                self.world.set_local_id(player_id);
            }

            Packet::StateUpdate { players, goal } => {
                self.world.apply_update(players, goal);
            }

            Packet::Disconnected { msg, connections } => {
                info!("{}, currently {} player(s)", msg, connections);
                self.world.connections = connections;

                // A rejection while still connecting ends this client;
                // otherwise it is news about another peer
                if self.state == ConnectionState::Connecting {
                    warn!("Connection rejected by server");
                    self.state = ConnectionState::Disconnected;
                }
            }

            _ => {
                warn!("Unexpected packet type from server");
            }
        }
    }

    pub async fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.connect().await?;

        let mut input_interval = interval(Duration::from_millis(16));
        let mut render_interval = interval(Duration::from_millis(16));

        let mut buffer = [0u8; 2048];

        while self.state != ConnectionState::Disconnected {
            tokio::select! {
                result = self.socket.recv_from(&mut buffer) => {
                    match result {
                        Ok((len, _)) => match deserialize::<Packet>(&buffer[0..len]) {
                            Ok(packet) => self.handle_packet(packet).await,
                            Err(e) => warn!("Dropping malformed packet: {}", e),
                        },
                        Err(e) => {
                            // Transport failure is the one teardown path;
                            // in-flight intents are lost, not retried
                            let err = ProtocolError::TransportFailure(e.to_string());
                            error!("{}", err);
                            self.state = ConnectionState::Disconnected;
                        }
                    }
                },

                _ = input_interval.tick() => {
                    if self.state == ConnectionState::Active {
                        if let Some(direction) = self.input.update() {
                            self.send_move(direction).await;
                        }
                    }
                },

                _ = render_interval.tick() => {
                    if !self.renderer.is_open() {
                        break;
                    }
                    self.renderer.render(&self.world);
                },
            }
        }

        if self.state == ConnectionState::Active {
            let _ = self.send_packet(&Packet::Disconnect).await;
        }

        Ok(())
    }
}
