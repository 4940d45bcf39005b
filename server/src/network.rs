//! Server network layer: UDP transport and the broadcast dispatcher.
//!
//! The dispatcher is the only writer of the arena. Each inbound message is
//! handled to completion (validate, mutate, broadcast the fresh snapshot)
//! before the next is processed, so every connected client observes a
//! sequence of complete states and never a partial roster update. Two
//! simultaneous pickup attempts therefore serialize here: the first one
//! processed wins the score, the second sees the already-replaced
//! collectible.

use crate::arena::Arena;
use crate::client_manager::ClientManager;
use bincode::{deserialize, serialize};
use log::{debug, error, info, warn};
use shared::{Packet, ProtocolError};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::{mpsc, RwLock};

/// Messages sent from network tasks to the main dispatcher loop.
#[derive(Debug)]
pub enum ServerMessage {
    PacketReceived {
        packet: Packet,
        addr: SocketAddr,
    },
    ClientTimeout {
        client_id: u32,
        player_id: Option<u32>,
    },
    #[allow(dead_code)]
    Shutdown,
}

/// Messages sent from the dispatcher to the network sender task.
#[derive(Debug)]
pub enum GameMessage {
    SendPacket { packet: Packet, addr: SocketAddr },
    BroadcastPacket { packet: Packet },
}

/// Main server coordinating the transport and the authoritative arena.
pub struct Server {
    socket: Arc<UdpSocket>,
    clients: Arc<RwLock<ClientManager>>,
    arena: Arena,

    // Communication channels
    server_tx: mpsc::UnboundedSender<ServerMessage>,
    server_rx: mpsc::UnboundedReceiver<ServerMessage>,
    game_tx: mpsc::UnboundedSender<GameMessage>,
    game_rx: mpsc::UnboundedReceiver<GameMessage>,
}

impl Server {
    pub async fn new(
        addr: &str,
        max_clients: usize,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let socket = Arc::new(UdpSocket::bind(addr).await?);
        info!("Server listening on {}", addr);

        let (server_tx, server_rx) = mpsc::unbounded_channel();
        let (game_tx, game_rx) = mpsc::unbounded_channel();

        Ok(Server {
            socket,
            clients: Arc::new(RwLock::new(ClientManager::new(max_clients))),
            arena: Arena::new(),
            server_tx,
            server_rx,
            game_tx,
            game_rx,
        })
    }

    /// Spawns the task that continuously listens for incoming datagrams.
    fn spawn_network_receiver(&self) {
        let socket = Arc::clone(&self.socket);
        let server_tx = self.server_tx.clone();

        tokio::spawn(async move {
            let mut buffer = [0u8; 2048];

            loop {
                match socket.recv_from(&mut buffer).await {
                    Ok((len, addr)) => match deserialize::<Packet>(&buffer[0..len]) {
                        Ok(packet) => {
                            if let Err(e) =
                                server_tx.send(ServerMessage::PacketReceived { packet, addr })
                            {
                                error!("Failed to send packet to main loop: {}", e);
                                break;
                            }
                        }
                        Err(e) => {
                            // Malformed input: the datagram is dropped, the
                            // sender stays connected, no state changes
                            let err = ProtocolError::MalformedInput(e.to_string());
                            warn!("Dropping packet from {}: {}", addr, err);
                        }
                    },
                    Err(e) => {
                        error!("Error receiving packet: {}", e);
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    }
                }
            }
        });
    }

    /// Spawns the task that drains the outgoing packet queue.
    fn spawn_network_sender(&mut self) {
        let socket = Arc::clone(&self.socket);
        let clients = Arc::clone(&self.clients);
        let mut game_rx = std::mem::replace(&mut self.game_rx, mpsc::unbounded_channel().1);

        tokio::spawn(async move {
            while let Some(message) = game_rx.recv().await {
                match message {
                    GameMessage::SendPacket { packet, addr } => {
                        if let Err(e) = Self::send_packet_impl(&socket, &packet, addr).await {
                            error!("Failed to send packet to {}: {}", addr, e);
                        }
                    }
                    GameMessage::BroadcastPacket { packet } => {
                        let client_addrs = {
                            let clients_guard = clients.read().await;
                            clients_guard.client_addrs()
                        };

                        for (client_id, addr) in client_addrs {
                            if let Err(e) = Self::send_packet_impl(&socket, &packet, addr).await {
                                error!("Failed to send to client {}: {}", client_id, e);
                            }
                        }
                    }
                }
            }
        });
    }

    /// Spawns the task that watches for silently dropped connections.
    fn spawn_timeout_checker(&self) {
        let clients = Arc::clone(&self.clients);
        let server_tx = self.server_tx.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));

            loop {
                interval.tick().await;

                let timed_out = {
                    let mut clients_guard = clients.write().await;
                    clients_guard.check_timeouts()
                };

                for (client_id, player_id) in timed_out {
                    if let Err(e) = server_tx.send(ServerMessage::ClientTimeout {
                        client_id,
                        player_id,
                    }) {
                        error!("Failed to send timeout message: {}", e);
                        break;
                    }
                }
            }
        });
    }

    async fn send_packet_impl(
        socket: &UdpSocket,
        packet: &Packet,
        addr: SocketAddr,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let data = serialize(packet)?;
        socket.send_to(&data, addr).await?;
        Ok(())
    }

    fn send_packet(&self, packet: &Packet, addr: SocketAddr) {
        if let Err(e) = self.game_tx.send(GameMessage::SendPacket {
            packet: packet.clone(),
            addr,
        }) {
            error!("Failed to queue packet for sending: {}", e);
        }
    }

    fn broadcast_packet(&self, packet: &Packet) {
        if let Err(e) = self.game_tx.send(GameMessage::BroadcastPacket {
            packet: packet.clone(),
        }) {
            error!("Failed to queue broadcast packet: {}", e);
        }
    }

    /// Pushes the current authoritative snapshot to every connection.
    fn broadcast_snapshot(&self) {
        let (players, goal) = self.arena.snapshot();
        self.broadcast_packet(&Packet::StateUpdate { players, goal });
    }

    /// Processes one inbound packet against the arena.
    async fn handle_packet(&mut self, packet: Packet, addr: SocketAddr) {
        match packet {
            Packet::Connect { client_version } => {
                info!(
                    "Client connecting from {} (version: {})",
                    addr, client_version
                );

                // A reconnect from the same address is a new identity:
                // drop the old connection and free its arena slot first
                let existing = {
                    let clients = self.clients.read().await;
                    clients.find_client_by_addr(addr)
                };
                if let Some(existing_id) = existing {
                    info!("Replacing existing client {} from {}", existing_id, addr);
                    let player_id = {
                        let mut clients = self.clients.write().await;
                        clients.remove_client(existing_id)
                    };
                    if let Some(player_id) = player_id {
                        self.arena.leave(player_id);
                    }
                }

                let (client_id, connections) = {
                    let mut clients = self.clients.write().await;
                    let id = clients.add_client(addr);
                    (id, clients.len())
                };

                if client_id.is_some() {
                    self.broadcast_packet(&Packet::Connected {
                        msg: "A new player has connected".to_string(),
                        connections,
                    });
                    // Let the newcomer render the arena before it joins
                    let (players, goal) = self.arena.snapshot();
                    self.send_packet(&Packet::StateUpdate { players, goal }, addr);
                } else {
                    self.send_packet(
                        &Packet::Disconnected {
                            msg: "Server is full".to_string(),
                            connections,
                        },
                        addr,
                    );
                }
            }

            Packet::Init { local_player, .. } => {
                let client_id = {
                    let clients = self.clients.read().await;
                    clients.find_client_by_addr(addr)
                };
                let Some(client_id) = client_id else {
                    warn!("Init from unknown address {}", addr);
                    return;
                };

                let player_id = {
                    let mut clients = self.clients.write().await;
                    clients.touch(client_id);
                    clients.player_of(client_id)
                };

                // A repeated Init re-acknowledges the existing player
                // instead of creating a duplicate
                let player_id = match player_id {
                    Some(existing) => existing,
                    None => {
                        let assigned = self.arena.join(Some(&local_player));
                        let mut clients = self.clients.write().await;
                        clients.assign_player(client_id, assigned);
                        assigned
                    }
                };

                self.send_packet(&Packet::Joined { player_id }, addr);
                self.broadcast_snapshot();
            }

            Packet::MoveIntent { direction, speed } => {
                let client_id = {
                    let clients = self.clients.read().await;
                    clients.find_client_by_addr(addr)
                };
                let Some(client_id) = client_id else {
                    debug!("Move intent from unknown address {}", addr);
                    return;
                };

                let player_id = {
                    let mut clients = self.clients.write().await;
                    clients.touch(client_id);
                    clients.player_of(client_id)
                };
                let Some(player_id) = player_id else {
                    warn!("Move intent from client {} before join", client_id);
                    return;
                };

                match self.arena.apply_move(player_id, direction, speed) {
                    Ok(outcome) => {
                        if outcome.collided {
                            debug!("Player {} scored on move", player_id);
                        }
                        self.broadcast_snapshot();
                    }
                    // Stale intent referencing a removed player: drop it
                    Err(e) => warn!("Dropping stale move intent: {}", e),
                }
            }

            Packet::Disconnect => {
                let client_id = {
                    let clients = self.clients.read().await;
                    clients.find_client_by_addr(addr)
                };
                if let Some(client_id) = client_id {
                    self.drop_client(client_id).await;
                }
            }

            _ => {
                warn!("Unexpected packet type from client at {}", addr);
            }
        }
    }

    /// Removes a connection and its player, then notifies the survivors.
    async fn drop_client(&mut self, client_id: u32) {
        let (player_id, connections) = {
            let mut clients = self.clients.write().await;
            let player_id = clients.remove_client(client_id);
            (player_id, clients.len())
        };

        if let Some(player_id) = player_id {
            self.arena.leave(player_id);
        }

        self.broadcast_packet(&Packet::Disconnected {
            msg: "A player has disconnected".to_string(),
            connections,
        });
        self.broadcast_snapshot();
    }

    /// Main dispatcher loop. Messages are processed strictly one at a time,
    /// which is what makes arena mutations atomic per message.
    pub async fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.spawn_network_receiver();
        self.spawn_network_sender();
        self.spawn_timeout_checker();

        info!("Server started successfully");

        while let Some(message) = self.server_rx.recv().await {
            match message {
                ServerMessage::PacketReceived { packet, addr } => {
                    self.handle_packet(packet, addr).await;
                }
                ServerMessage::ClientTimeout {
                    client_id,
                    player_id,
                } => {
                    info!("Client {} timed out", client_id);
                    if let Some(player_id) = player_id {
                        self.arena.leave(player_id);
                    }
                    let connections = {
                        let clients = self.clients.read().await;
                        clients.len()
                    };
                    self.broadcast_packet(&Packet::Disconnected {
                        msg: "A player has disconnected".to_string(),
                        connections,
                    });
                    self.broadcast_snapshot();
                }
                ServerMessage::Shutdown => {
                    info!("Server shutting down");
                    break;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Direction, Player};
    use std::net::{IpAddr, Ipv4Addr};

    fn test_addr(port: u16) -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), port)
    }

    async fn test_server() -> Server {
        Server::new("127.0.0.1:0", 8).await.unwrap()
    }

    fn drain_sent(server: &mut Server) -> Vec<GameMessage> {
        let mut sent = Vec::new();
        while let Ok(message) = server.game_rx.try_recv() {
            sent.push(message);
        }
        sent
    }

    #[tokio::test]
    async fn test_connect_broadcasts_count_and_unicasts_snapshot() {
        let mut server = test_server().await;
        let addr = test_addr(9001);

        server
            .handle_packet(Packet::Connect { client_version: 1 }, addr)
            .await;

        let sent = drain_sent(&mut server);
        assert_eq!(sent.len(), 2);

        match &sent[0] {
            GameMessage::BroadcastPacket {
                packet: Packet::Connected { connections, .. },
            } => assert_eq!(*connections, 1),
            other => panic!("Expected Connected broadcast, got {:?}", other),
        }
        match &sent[1] {
            GameMessage::SendPacket {
                packet: Packet::StateUpdate { players, .. },
                addr: target,
            } => {
                assert!(players.is_empty());
                assert_eq!(*target, addr);
            }
            other => panic!("Expected StateUpdate unicast, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_server_full_rejection() {
        let mut server = Server::new("127.0.0.1:0", 1).await.unwrap();

        server
            .handle_packet(Packet::Connect { client_version: 1 }, test_addr(9001))
            .await;
        drain_sent(&mut server);

        server
            .handle_packet(Packet::Connect { client_version: 1 }, test_addr(9002))
            .await;

        let sent = drain_sent(&mut server);
        assert_eq!(sent.len(), 1);
        match &sent[0] {
            GameMessage::SendPacket {
                packet: Packet::Disconnected { connections, .. },
                addr,
            } => {
                assert_eq!(*connections, 1);
                assert_eq!(*addr, test_addr(9002));
            }
            other => panic!("Expected rejection unicast, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_init_assigns_player_and_broadcasts() {
        let mut server = test_server().await;
        let addr = test_addr(9001);

        server
            .handle_packet(Packet::Connect { client_version: 1 }, addr)
            .await;
        drain_sent(&mut server);

        let proposal = Player::new(0, 100, 100);
        let (_, goal) = server.arena.snapshot();
        server
            .handle_packet(
                Packet::Init {
                    players: vec![],
                    local_player: proposal,
                    goal,
                },
                addr,
            )
            .await;

        let sent = drain_sent(&mut server);
        assert_eq!(sent.len(), 2);

        let assigned = match &sent[0] {
            GameMessage::SendPacket {
                packet: Packet::Joined { player_id },
                ..
            } => *player_id,
            other => panic!("Expected Joined unicast, got {:?}", other),
        };
        match &sent[1] {
            GameMessage::BroadcastPacket {
                packet: Packet::StateUpdate { players, .. },
            } => {
                assert_eq!(players.len(), 1);
                assert_eq!(players[0].id, assigned);
            }
            other => panic!("Expected StateUpdate broadcast, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_move_intent_from_unknown_address_is_dropped() {
        let mut server = test_server().await;

        server
            .handle_packet(
                Packet::MoveIntent {
                    direction: Direction::Up,
                    speed: 10,
                },
                test_addr(9050),
            )
            .await;

        assert!(drain_sent(&mut server).is_empty());
        assert_eq!(server.arena.player_count(), 0);
    }

    #[tokio::test]
    async fn test_disconnect_frees_slot_and_notifies() {
        let mut server = test_server().await;
        let addr = test_addr(9001);

        server
            .handle_packet(Packet::Connect { client_version: 1 }, addr)
            .await;
        let (_, goal) = server.arena.snapshot();
        server
            .handle_packet(
                Packet::Init {
                    players: vec![],
                    local_player: Player::new(0, 50, 50),
                    goal,
                },
                addr,
            )
            .await;
        drain_sent(&mut server);
        assert_eq!(server.arena.player_count(), 1);

        server.handle_packet(Packet::Disconnect, addr).await;

        assert_eq!(server.arena.player_count(), 0);
        let sent = drain_sent(&mut server);
        assert_eq!(sent.len(), 2);
        match &sent[0] {
            GameMessage::BroadcastPacket {
                packet: Packet::Disconnected { connections, .. },
            } => assert_eq!(*connections, 0),
            other => panic!("Expected Disconnected broadcast, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_reconnect_is_a_fresh_identity() {
        let mut server = test_server().await;
        let addr = test_addr(9001);

        server
            .handle_packet(Packet::Connect { client_version: 1 }, addr)
            .await;
        let (_, goal) = server.arena.snapshot();
        server
            .handle_packet(
                Packet::Init {
                    players: vec![],
                    local_player: Player::new(0, 50, 50),
                    goal: goal.clone(),
                },
                addr,
            )
            .await;
        drain_sent(&mut server);

        // Second Connect from the same address replaces the old identity
        server
            .handle_packet(Packet::Connect { client_version: 1 }, addr)
            .await;
        drain_sent(&mut server);
        assert_eq!(server.arena.player_count(), 0);

        server
            .handle_packet(
                Packet::Init {
                    players: vec![],
                    local_player: Player::new(0, 50, 50),
                    goal,
                },
                addr,
            )
            .await;

        let sent = drain_sent(&mut server);
        match &sent[0] {
            GameMessage::SendPacket {
                packet: Packet::Joined { player_id },
                ..
            } => assert_eq!(*player_id, 2),
            other => panic!("Expected Joined unicast, got {:?}", other),
        }
    }
}
