//! # Arena Server Library
//!
//! Authoritative server for the multiplayer arena game. It owns the single
//! source of truth (the player roster plus the one active collectible) and
//! keeps every connected client consistent by pushing a full snapshot
//! after each state-changing action.
//!
//! ## Architecture
//!
//! The server is message-driven rather than tick-driven: there is no
//! simulation clock. Each inbound intent (join proposal, movement,
//! disconnect) is read, validated, applied to the arena and answered with
//! a broadcast before the next message is touched. That single-writer
//! discipline is the whole concurrency story: the arena needs no locking
//! of its own, and no client can ever observe a half-applied update.
//!
//! Collision detection, scoring and collectible respawn all happen inside
//! `apply_move`, as a side effect of an accepted movement. There is no
//! other path by which a score can change.
//!
//! ## Module Organization
//!
//! - [`arena`]: the authoritative aggregate with join/leave/apply_move/snapshot.
//! - [`client_manager`]: connection lifecycle, capacity, timeouts, and the
//!   connection count surfaced in lifecycle notifications.
//! - [`network`]: UDP transport tasks and the broadcast dispatcher.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::network::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut server = Server::new("127.0.0.1:8080", 16).await?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

pub mod arena;
pub mod client_manager;
pub mod network;
