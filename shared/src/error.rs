//! Error taxonomy for the sync core.
//!
//! None of these are fatal to the process: a single connection's malformed
//! input or drop must never affect other connections' view of the arena.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// An intent that failed validation before reaching arena state. The
    /// connection is kept open and no state changes occur.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// A mutation request referencing an identity that has already left,
    /// e.g. a move that arrived after the disconnect. Callers drop the
    /// stale message instead of failing.
    #[error("unknown player {0}")]
    UnknownPlayer(u32),

    /// Loss of the event channel itself. Surfaced to clients only as a
    /// disconnect; in-flight intents are lost and never retried.
    #[error("transport failure: {0}")]
    TransportFailure(String),
}
