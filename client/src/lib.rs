//! # Arena Client Library
//!
//! Client half of the multiplayer arena game. The client holds no
//! authority: it captures directional input, sends intents to the server,
//! and mirrors whatever authoritative snapshot comes back. Every
//! `StateUpdate` replaces the local roster and collectible wholesale:
//! there is no prediction or merging, because the server is the sole
//! source of truth.
//!
//! ## Module Organization
//!
//! - [`game`]: the advisory world mirror and rank-line derivation.
//! - [`input`]: directional key sampling with repeat cadence; unmapped
//!   keys are ignored.
//! - [`network`]: the `Connecting -> Active -> Disconnected` connection
//!   state machine over UDP.
//! - [`rendering`]: macroquad drawing; green local player, purple remote
//!   players, red collectible, rank and connection-count text.

pub mod game;
pub mod input;
pub mod network;
pub mod rendering;
