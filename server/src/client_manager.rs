//! Connection lifecycle management for the arena server.
//!
//! Tracks who is connected, maps network addresses to connection ids and
//! connection ids to arena player ids, enforces the capacity limit, and
//! detects silently dropped peers via timeouts. The live connection count
//! maintained here is surfaced verbatim in the `Connected` / `Disconnected`
//! notifications. There are no reconnection semantics: a dropped connection
//! that comes back is a brand-new identity.

use log::info;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

const CLIENT_TIMEOUT: Duration = Duration::from_secs(5);

/// A connected client.
#[derive(Debug)]
pub struct Client {
    pub id: u32,
    pub addr: SocketAddr,
    /// Last time any packet arrived from this address.
    pub last_seen: Instant,
    /// The arena player this connection controls, assigned once the client
    /// sends its join proposal.
    pub player_id: Option<u32>,
}

impl Client {
    pub fn new(id: u32, addr: SocketAddr) -> Self {
        Self {
            id,
            addr,
            last_seen: Instant::now(),
            player_id: None,
        }
    }

    pub fn is_timed_out(&self, timeout: Duration) -> bool {
        self.last_seen.elapsed() > timeout
    }
}

/// Manages all connected clients.
pub struct ClientManager {
    clients: HashMap<u32, Client>,
    next_client_id: u32,
    max_clients: usize,
}

impl ClientManager {
    pub fn new(max_clients: usize) -> Self {
        Self {
            clients: HashMap::new(),
            next_client_id: 1,
            max_clients,
        }
    }

    /// Attempts to register a new connection. Returns `None` when the
    /// server is at capacity.
    pub fn add_client(&mut self, addr: SocketAddr) -> Option<u32> {
        if self.clients.len() >= self.max_clients {
            return None;
        }

        let client_id = self.next_client_id;
        self.next_client_id += 1;

        info!("Client {} connected from {}", client_id, addr);
        self.clients.insert(client_id, Client::new(client_id, addr));

        Some(client_id)
    }

    /// Removes a connection. Returns the player id it controlled, if any,
    /// so the caller can free the arena slot. Removing an absent client is
    /// a no-op.
    pub fn remove_client(&mut self, client_id: u32) -> Option<u32> {
        let client = self.clients.remove(&client_id)?;
        info!("Client {} disconnected", client.id);
        client.player_id
    }

    pub fn find_client_by_addr(&self, addr: SocketAddr) -> Option<u32> {
        self.clients
            .iter()
            .find(|(_, client)| client.addr == addr)
            .map(|(id, _)| *id)
    }

    /// Records that a packet arrived from this client.
    pub fn touch(&mut self, client_id: u32) {
        if let Some(client) = self.clients.get_mut(&client_id) {
            client.last_seen = Instant::now();
        }
    }

    /// Binds a connection to the arena player it was granted on join.
    pub fn assign_player(&mut self, client_id: u32, player_id: u32) {
        if let Some(client) = self.clients.get_mut(&client_id) {
            client.player_id = Some(player_id);
        }
    }

    pub fn player_of(&self, client_id: u32) -> Option<u32> {
        self.clients.get(&client_id).and_then(|c| c.player_id)
    }

    /// Removes clients that have gone silent past the timeout threshold.
    /// Returns the removed connections as (client id, player id) pairs so
    /// the dispatcher can free arena slots and notify the survivors.
    pub fn check_timeouts(&mut self) -> Vec<(u32, Option<u32>)> {
        let timed_out: Vec<u32> = self
            .clients
            .iter()
            .filter(|(_, client)| client.is_timed_out(CLIENT_TIMEOUT))
            .map(|(id, _)| *id)
            .collect();

        timed_out
            .into_iter()
            .map(|client_id| (client_id, self.remove_client(client_id)))
            .collect()
    }

    /// All connections as (client id, address) pairs, for broadcast.
    pub fn client_addrs(&self) -> Vec<(u32, SocketAddr)> {
        self.clients
            .iter()
            .map(|(id, client)| (*id, client.addr))
            .collect()
    }

    /// Live connection count, surfaced in lifecycle notifications.
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
