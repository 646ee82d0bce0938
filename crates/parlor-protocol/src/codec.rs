//! Codec trait and implementations for serializing wire messages.
//!
//! The transport and handler layers don't care how messages become
//! bytes — they go through the [`Codec`] trait. [`JsonCodec`] is the
//! only implementation today; a binary codec can be added behind a
//! feature flag without touching the rest of the stack.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Encodes Rust types to bytes and decodes bytes back.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

/// A [`Codec`] that uses JSON via `serde_json`.
///
/// Human-readable, directly consumable by browser clients, and
/// inspectable in DevTools. Behind the `json` feature (on by default).
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{ClientMessage, RoomCode};

    #[test]
    fn test_json_codec_round_trip() {
        let codec = JsonCodec;
        let msg = ClientMessage::JoinLobby {
            room_code: RoomCode::from("1234567890"),
        };
        let bytes = codec.encode(&msg).unwrap();
        let decoded: ClientMessage = codec.decode(&bytes).unwrap();
        assert_eq!(msg, decoded);
    }

    #[test]
    fn test_json_codec_decode_failure_is_decode_error() {
        let codec = JsonCodec;
        let result: Result<ClientMessage, _> = codec.decode(b"{broken");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }
}
