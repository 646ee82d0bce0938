//! Per-lobby state: the player roster, settings, and outbound channels.
//!
//! A `Room` never exists with zero players for longer than a single
//! service operation — the registry destroys it the moment the last
//! player leaves.

use std::collections::{HashMap, HashSet};

use parlor_protocol::{
    ConnectionId, LobbySnapshot, PlayerSnapshot, RoomCode, ServerMessage,
    Settings,
};
use tokio::sync::mpsc;

/// Channel sender for delivering outbound messages to one connection.
pub type LobbySender = mpsc::UnboundedSender<ServerMessage>;

/// One member of a lobby.
#[derive(Debug, Clone)]
pub struct Player {
    /// The connection this player lives on.
    pub id: ConnectionId,
    /// Display name, `Player<N>` by join order. Not renameable.
    pub name: String,
    /// Whether this player holds host authority. Exactly one member has
    /// this set at any time the room exists.
    pub is_host: bool,
}

/// A lobby and everything in it.
///
/// `players` keeps insertion order — join order determines default names
/// and who inherits the host role when the host leaves.
pub struct Room {
    code: RoomCode,
    players: Vec<Player>,
    host_id: ConnectionId,
    is_playing: bool,
    settings: Settings,
    /// Connections that acknowledged the current round's reveal. A set,
    /// so repeated acknowledgments from one connection count once.
    ready: HashSet<ConnectionId>,
    /// Per-player outbound channels.
    senders: HashMap<ConnectionId, LobbySender>,
}

impl Room {
    /// Creates an empty room owned by `host_id`. The host still has to
    /// be admitted as a player like everyone else.
    pub fn new(code: RoomCode, host_id: ConnectionId, settings: Settings) -> Self {
        Self {
            code,
            players: Vec::new(),
            host_id,
            is_playing: false,
            settings,
            ready: HashSet::new(),
            senders: HashMap::new(),
        }
    }

    /// The room's code.
    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    /// The connection currently holding host authority.
    pub fn host_id(&self) -> ConnectionId {
        self.host_id
    }

    /// `true` once a round has started.
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Marks the start of a round and resets the readiness barrier.
    pub fn begin_round(&mut self) {
        self.is_playing = true;
        self.ready.clear();
    }

    /// Current settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Mutable settings, for host-gated updates.
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// All members in join order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Number of members.
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Whether the connection is a member.
    pub fn contains(&self, id: ConnectionId) -> bool {
        self.players.iter().any(|p| p.id == id)
    }

    /// Member connection ids in join order.
    pub fn player_ids(&self) -> Vec<ConnectionId> {
        self.players.iter().map(|p| p.id).collect()
    }

    /// Admits a new player, assigning the next `Player<N>` name.
    /// Returns the assigned name.
    pub fn add_player(
        &mut self,
        id: ConnectionId,
        is_host: bool,
        sender: LobbySender,
    ) -> String {
        let name = format!("Player{}", self.players.len() + 1);
        if is_host {
            self.host_id = id;
        }
        self.players.push(Player {
            id,
            name: name.clone(),
            is_host,
        });
        self.senders.insert(id, sender);
        name
    }

    /// Removes a player, their outbound channel, and any readiness mark.
    pub fn remove_player(&mut self, id: ConnectionId) -> Option<Player> {
        let index = self.players.iter().position(|p| p.id == id)?;
        let player = self.players.remove(index);
        self.senders.remove(&id);
        self.ready.remove(&id);
        Some(player)
    }

    /// Hands host authority to the earliest remaining joiner.
    ///
    /// Call only after the previous host has been removed. Returns the
    /// new host's name for logging.
    pub fn promote_oldest(&mut self) -> Option<String> {
        let player = self.players.first_mut()?;
        player.is_host = true;
        self.host_id = player.id;
        Some(player.name.clone())
    }

    /// Records a readiness acknowledgment.
    ///
    /// Returns `true` only for the first acknowledgment from a member
    /// connection; duplicates and non-members don't count.
    pub fn mark_ready(&mut self, id: ConnectionId) -> bool {
        self.contains(id) && self.ready.insert(id)
    }

    /// Number of distinct members that acknowledged the current round.
    pub fn ready_count(&self) -> usize {
        self.ready.len()
    }

    /// The public state of this lobby, for `updateLobbyUI` broadcasts.
    pub fn snapshot(&self) -> LobbySnapshot {
        LobbySnapshot {
            room_code: self.code.clone(),
            players: self
                .players
                .iter()
                .map(|p| PlayerSnapshot {
                    name: p.name.clone(),
                    is_host: p.is_host,
                })
                .collect(),
            settings: self.settings.clone(),
            is_playing: self.is_playing,
            ready_count: self.ready.len(),
        }
    }

    /// Sends a message to every member.
    pub fn broadcast(&self, msg: ServerMessage) {
        for player in &self.players {
            self.send_to(player.id, msg.clone());
        }
    }

    /// Sends a message to a single member. Silently drops if the
    /// receiver is gone (connection already closed).
    pub fn send_to(&self, id: ConnectionId, msg: ServerMessage) {
        if let Some(sender) = self.senders.get(&id) {
            let _ = sender.send(msg);
        }
    }
}
