//! Core protocol types for Parlor's wire format.
//!
//! Every structure in this module is part of the client-facing JSON
//! protocol. Client events and server events are internally tagged
//! (`"type"` field) with camelCase names, so a join request looks like
//! `{"type":"joinLobby","roomCode":"1234567890"}` and can be produced
//! directly from a browser client.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a connected client.
///
/// Connection identity doubles as player identity: a player exists for
/// exactly the lifetime of its connection, and there is no account or
/// token layer behind it. Ids are allocated by the transport when a
/// connection is accepted and are never reused within a process.
///
/// `#[serde(transparent)]` makes a `ConnectionId(42)` serialize as the
/// plain number `42`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// The code identifying a lobby, e.g. `"4819203746"`.
///
/// Codes are 10-digit decimal strings so they can be read out loud and
/// typed on a phone. Uniqueness among live rooms is the registry's job;
/// this type is just the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(pub String);

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RoomCode {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

// ---------------------------------------------------------------------------
// Word payloads
// ---------------------------------------------------------------------------

/// A secret-word payload dealt to non-imposters.
///
/// The `hint` is optional flavor text shown under the word; categories
/// without hints simply omit it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    /// The secret word itself.
    pub text: String,
    /// Optional hint displayed alongside the word.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl Word {
    /// Creates a word with no hint.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            hint: None,
        }
    }

    /// Creates a word with a hint.
    pub fn with_hint(text: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            hint: Some(hint.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Lobby settings
// ---------------------------------------------------------------------------

/// Host-tunable settings for a lobby.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// How many imposters the host wants. Clamped against the player
    /// count at round start, not here.
    pub imposter_count: u32,
    /// The word category for the next round. An unknown name falls back
    /// to the built-in default category at round start.
    pub category: String,
    /// Length of the post-reveal discussion timer, in seconds.
    pub timer_duration_seconds: u64,
}

impl Settings {
    /// Default settings for a fresh lobby: one imposter, a ten-minute
    /// timer, and the given starting category.
    pub fn for_category(category: impl Into<String>) -> Self {
        Self {
            imposter_count: 1,
            category: category.into(),
            timer_duration_seconds: 600,
        }
    }

    /// Applies a single host-requested change.
    pub fn apply(&mut self, change: SettingChange) {
        match change {
            SettingChange::ImposterCount(n) => self.imposter_count = n,
            SettingChange::Category(c) => self.category = c,
            SettingChange::TimerDurationSeconds(s) => {
                self.timer_duration_seconds = s;
            }
        }
    }
}

/// One settings mutation, as sent by the host inside `updateSettings`.
///
/// Adjacently tagged so that on the wire it reads
/// `{"setting":"imposterCount","value":3}`. Typing the value per key
/// means a string where a number belongs is rejected at decode time;
/// range problems (e.g. more imposters than players) are deferred to
/// round start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "setting", content = "value", rename_all = "camelCase")]
pub enum SettingChange {
    /// Change the requested imposter count.
    ImposterCount(u32),
    /// Change the word category.
    Category(String),
    /// Change the discussion timer, in seconds.
    TimerDurationSeconds(u64),
}

// ---------------------------------------------------------------------------
// Lobby snapshot — broadcast to every member on any lobby change
// ---------------------------------------------------------------------------

/// A player as seen by other lobby members.
///
/// Connection ids are deliberately not part of the snapshot; clients
/// identify players by their assigned display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    /// Display name, `Player<N>` by join order.
    pub name: String,
    /// Whether this player currently holds host authority.
    pub is_host: bool,
}

/// The full public state of a lobby.
///
/// Sent as the body of every `updateLobbyUI` broadcast so clients can
/// redraw the lobby screen from scratch rather than patching it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbySnapshot {
    /// The lobby's room code.
    pub room_code: RoomCode,
    /// All members in join order.
    pub players: Vec<PlayerSnapshot>,
    /// Current settings.
    pub settings: Settings,
    /// `true` once a round has started.
    pub is_playing: bool,
    /// Number of distinct players that acknowledged the current round's
    /// reveal.
    pub ready_count: usize,
}

// ---------------------------------------------------------------------------
// Client → server events
// ---------------------------------------------------------------------------

/// Everything a client can send.
///
/// `#[serde(tag = "type")]` produces internally tagged JSON:
/// `{"type":"startGame","roomCode":"..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    /// Create a fresh lobby and join it as host.
    CreateLobby,

    /// Join an existing lobby that hasn't started playing.
    JoinLobby { room_code: RoomCode },

    /// Host only: change one lobby setting. The change is flattened, so
    /// the wire shape is `{"type":"updateSettings","roomCode":...,
    /// "setting":...,"value":...}`.
    UpdateSettings {
        room_code: RoomCode,
        #[serde(flatten)]
        change: SettingChange,
    },

    /// Host only: deal roles and start a round.
    StartGame { room_code: RoomCode },

    /// Acknowledge the role reveal; the round timer starts once every
    /// member has done this.
    PlayerReady { room_code: RoomCode },

    /// Leave the lobby and return to the home screen.
    LeaveRoom { room_code: RoomCode },
}

// ---------------------------------------------------------------------------
// Server → client events
// ---------------------------------------------------------------------------

/// Everything the server can send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// To the creator only: the lobby exists and you're its host.
    LobbyCreated {
        room_code: RoomCode,
        categories: Vec<String>,
    },

    /// To the joiner only: you're in, here's your assigned name.
    JoinedRoom {
        room_code: RoomCode,
        player_name: String,
        is_host: bool,
        categories: Vec<String>,
    },

    /// Broadcast to every lobby member whenever membership, settings, or
    /// play state changes.
    #[serde(rename = "updateLobbyUI")]
    UpdateLobbyUi {
        #[serde(flatten)]
        lobby: LobbySnapshot,
    },

    /// Private per-player deal at round start. `word_data` is `null` for
    /// imposters — the secret never travels to an imposter's client.
    GameStarted {
        is_imposter: bool,
        category: String,
        word_data: Option<Word>,
        starting_player: String,
    },

    /// Broadcast once every member has acknowledged the reveal; clients
    /// start a shared countdown of `duration` seconds.
    AllReady { duration: u64 },

    /// To the offending connection only.
    Error { message: String },
}

// =========================================================================
// Tests
// =========================================================================
