//! Error types for the lobby layer.
//!
//! Only failures that are surfaced to a client live here. Unauthorized
//! host-only calls are deliberately silent no-ops and never produce an
//! error (see `LobbyService`).

use parlor_protocol::{ConnectionId, RoomCode};

/// Errors that can occur during lobby operations.
#[derive(Debug, thiserror::Error)]
pub enum LobbyError {
    /// The join target doesn't exist, or its round has already started.
    #[error("room {0} not found or game already started")]
    RoomUnavailable(RoomCode),

    /// The connection is already a member of a lobby. One lobby per
    /// connection is an enforced invariant, not an assumption.
    #[error("{0} is already in room {1}")]
    AlreadyInRoom(ConnectionId, RoomCode),

    /// Neither the configured category nor the fallback category has any
    /// words. A configuration defect — fatal to that round start only,
    /// the room is left untouched.
    #[error("no words available for category {0:?} or its fallback")]
    NoWords(String),
}
