//! Wire catalog for the event channel between client and server.
//!
//! Packets are bincode-framed over UDP. Client-to-server messages carry
//! intents; server-to-client messages carry lifecycle notifications and
//! authoritative full-state snapshots. There are no deltas: every
//! state-changing action results in a complete `StateUpdate`, and clients
//! replace their roster and collectible wholesale (last write wins).

use crate::collectible::Collectible;
use crate::player::{Direction, Player};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub enum Packet {
    // Client -> server
    /// Transport-level hello, sent once before anything else.
    Connect {
        client_version: u32,
    },
    /// Join proposal carrying the client's full locally-guessed state. The
    /// server uses the proposed player only as a spawn hint and assigns the
    /// identity itself; the rest of the payload is advisory.
    Init {
        players: Vec<Player>,
        local_player: Player,
        goal: Collectible,
    },
    /// Movement intent. Only what the server validates travels: the
    /// authoritative roster never takes client state at face value.
    MoveIntent {
        direction: Direction,
        speed: i32,
    },
    /// Explicit leave.
    Disconnect,

    // Server -> client
    /// A connection was established somewhere in the arena.
    Connected {
        msg: String,
        connections: usize,
    },
    /// A connection went away somewhere in the arena.
    Disconnected {
        msg: String,
        connections: usize,
    },
    /// The server's answer to `Init`: the identity it assigned to this
    /// connection's player.
    Joined {
        player_id: u32,
    },
    /// Authoritative full snapshot of the roster and the collectible.
    StateUpdate {
        players: Vec<Player>,
        goal: Collectible,
    },
}
