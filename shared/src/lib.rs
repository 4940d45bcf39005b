//! Shared game model and wire protocol for the arena sync core.
//!
//! Everything in here is pure data and computation with no I/O: the
//! geometry primitives, the player and collectible entities, the ranking
//! calculator, and the bincode packet catalog spoken between server and
//! client. Both halves depend on this crate so that movement clamping and
//! overlap rules are byte-identical on each side of the wire.

pub mod collectible;
pub mod error;
pub mod geometry;
pub mod player;
pub mod protocol;
pub mod ranking;

pub use collectible::Collectible;
pub use error::ProtocolError;
pub use geometry::{clamp_axis, move_along_axis, overlaps, Aabb};
pub use player::{Direction, Player};
pub use protocol::Packet;
pub use ranking::rank_of;

pub const ARENA_MIN_X: i32 = 0;
pub const ARENA_MIN_Y: i32 = 0;
pub const ARENA_MAX_X: i32 = 640;
pub const ARENA_MAX_Y: i32 = 480;
pub const PLAYER_SIZE: i32 = 10;
pub const COLLECTIBLE_SIZE: i32 = 15;
pub const COLLECTIBLE_VALUE: u32 = 1;
pub const DEFAULT_SPEED: i32 = 10;
