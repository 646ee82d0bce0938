//! The room registry: owns every live room and the reverse index from
//! connections to the room they're in.
//!
//! An explicit object injected into [`LobbyService`](crate::LobbyService)
//! rather than ambient state, so tests can run against isolated
//! instances.

use std::collections::HashMap;

use parlor_protocol::{ConnectionId, RoomCode, Settings};
use rand::Rng;

use crate::Room;

/// Process-local mapping from room code to room state.
///
/// The reverse index (`member_rooms`) carries the one-room-per-connection
/// invariant: a connection appears in it exactly while it is a member of
/// some room, which makes disconnect handling a single lookup instead of
/// a scan over every room.
#[derive(Default)]
pub struct Registry {
    rooms: HashMap<RoomCode, Room>,
    member_rooms: HashMap<ConnectionId, RoomCode>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh room with the given host and settings.
    ///
    /// Codes are 10-digit decimal strings; on the (negligible-probability)
    /// collision with a live room the draw repeats rather than
    /// overwriting the existing room.
    pub fn create(&mut self, host_id: ConnectionId, settings: Settings) -> RoomCode {
        let mut rng = rand::rng();
        let code = loop {
            let candidate =
                RoomCode(rng.random_range(1_000_000_000u64..=9_999_999_999).to_string());
            if !self.rooms.contains_key(&candidate) {
                break candidate;
            }
        };
        self.rooms
            .insert(code.clone(), Room::new(code.clone(), host_id, settings));
        tracing::info!(room = %code, "room created");
        code
    }

    /// Looks up a room.
    pub fn get(&self, code: &RoomCode) -> Option<&Room> {
        self.rooms.get(code)
    }

    /// Looks up a room for mutation.
    pub fn get_mut(&mut self, code: &RoomCode) -> Option<&mut Room> {
        self.rooms.get_mut(code)
    }

    /// Destroys a room. Called exactly once, when its last player leaves.
    pub fn remove(&mut self, code: &RoomCode) -> Option<Room> {
        let room = self.rooms.remove(code);
        if room.is_some() {
            tracing::info!(room = %code, "room destroyed");
        }
        room
    }

    /// The room a connection is currently in, if any.
    pub fn room_of(&self, id: ConnectionId) -> Option<&RoomCode> {
        self.member_rooms.get(&id)
    }

    /// Records that a connection joined a room.
    pub fn index_member(&mut self, id: ConnectionId, code: RoomCode) {
        self.member_rooms.insert(id, code);
    }

    /// Records that a connection left its room.
    pub fn unindex_member(&mut self, id: ConnectionId) {
        self.member_rooms.remove(&id);
    }

    /// Number of live rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_allocates_ten_digit_codes() {
        let mut registry = Registry::new();
        let code = registry.create(ConnectionId(1), Settings::for_category("Vehicles"));
        assert_eq!(code.0.len(), 10);
        assert!(code.0.chars().all(|c| c.is_ascii_digit()));
        assert!(registry.get(&code).is_some());
    }

    #[test]
    fn test_create_codes_are_distinct() {
        let mut registry = Registry::new();
        let a = registry.create(ConnectionId(1), Settings::for_category("Vehicles"));
        let b = registry.create(ConnectionId(2), Settings::for_category("Vehicles"));
        assert_ne!(a, b);
        assert_eq!(registry.room_count(), 2);
    }

    #[test]
    fn test_remove_unknown_room_is_none() {
        let mut registry = Registry::new();
        assert!(registry.remove(&RoomCode::from("0000000000")).is_none());
    }

    #[test]
    fn test_member_index_round_trip() {
        let mut registry = Registry::new();
        let code = registry.create(ConnectionId(1), Settings::for_category("Vehicles"));

        registry.index_member(ConnectionId(1), code.clone());
        assert_eq!(registry.room_of(ConnectionId(1)), Some(&code));

        registry.unindex_member(ConnectionId(1));
        assert_eq!(registry.room_of(ConnectionId(1)), None);
    }
}
