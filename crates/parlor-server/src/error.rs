//! Unified error type for the server crate.

use parlor_lobby::{LobbyError, WordBankError};
use parlor_protocol::ProtocolError;
use parlor_transport::TransportError;

/// Top-level error that wraps all layer-specific errors.
///
/// The `#[from]` attribute on each variant generates the `From` impls,
/// so `?` converts layer errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum ParlorError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A lobby-level error (unavailable room, bad word bank).
    #[error(transparent)]
    Lobby(#[from] LobbyError),

    /// The word-bank file couldn't be loaded.
    #[error(transparent)]
    WordBank(#[from] WordBankError),
}
