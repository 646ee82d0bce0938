//! The lobby service: every operation a connected client can trigger.
//!
//! This is the entry point for the server's connection handlers. All
//! methods take `&mut self` and complete synchronously, so whoever owns
//! the service (one async mutex in the server) serializes operations and
//! no room is ever observed mid-mutation. Disconnects go through the
//! same path as explicit leaves.
//!
//! Authorization model: host-only operations (`update_settings`,
//! `start_game`) silently ignore calls from anyone else — no error event
//! is produced. Join failures and configuration defects do surface as
//! errors so the handler can report them to the offending connection.

use std::collections::HashSet;

use parlor_protocol::{
    ConnectionId, RoomCode, ServerMessage, SettingChange, Settings,
};
use rand::Rng;

use crate::{LobbyError, LobbySender, Registry, WordBank};

/// Coordinates every lobby: creation, membership, settings, rounds, and
/// the readiness barrier.
pub struct LobbyService {
    registry: Registry,
    words: WordBank,
}

impl LobbyService {
    /// Creates a service with an empty registry and the given dataset.
    pub fn new(words: WordBank) -> Self {
        Self {
            registry: Registry::new(),
            words,
        }
    }

    /// All category names, for acknowledgment payloads.
    pub fn categories(&self) -> Vec<String> {
        self.words.category_names()
    }

    /// Number of live rooms. Exposed for tests and introspection.
    pub fn room_count(&self) -> usize {
        self.registry.room_count()
    }

    /// The room a connection is currently in, if any.
    pub fn room_of(&self, conn: ConnectionId) -> Option<RoomCode> {
        self.registry.room_of(conn).cloned()
    }

    /// The public snapshot of a room, if it exists.
    pub fn snapshot(&self, code: &RoomCode) -> Option<parlor_protocol::LobbySnapshot> {
        self.registry.get(code).map(|room| room.snapshot())
    }

    /// Creates a fresh lobby and admits the creator as its host.
    ///
    /// The creator receives `lobbyCreated`, then the usual join
    /// acknowledgment and lobby broadcast.
    pub fn create_lobby(
        &mut self,
        conn: ConnectionId,
        sender: LobbySender,
    ) -> Result<RoomCode, LobbyError> {
        if let Some(existing) = self.registry.room_of(conn) {
            return Err(LobbyError::AlreadyInRoom(conn, existing.clone()));
        }

        let settings = Settings::for_category(self.words.default_category());
        let code = self.registry.create(conn, settings);

        let _ = sender.send(ServerMessage::LobbyCreated {
            room_code: code.clone(),
            categories: self.words.category_names(),
        });
        self.admit(conn, &code, true, sender);
        Ok(code)
    }

    /// Joins an existing lobby.
    ///
    /// Fails with [`LobbyError::RoomUnavailable`] when the room doesn't
    /// exist or its round has already started; no state changes in that
    /// case.
    pub fn join_lobby(
        &mut self,
        conn: ConnectionId,
        code: RoomCode,
        sender: LobbySender,
    ) -> Result<(), LobbyError> {
        if let Some(existing) = self.registry.room_of(conn) {
            return Err(LobbyError::AlreadyInRoom(conn, existing.clone()));
        }
        match self.registry.get(&code) {
            Some(room) if !room.is_playing() => {}
            _ => return Err(LobbyError::RoomUnavailable(code)),
        }
        self.admit(conn, &code, false, sender);
        Ok(())
    }

    /// Shared admission path for creators and joiners: roster append,
    /// join acknowledgment, lobby broadcast, reverse-index entry.
    fn admit(
        &mut self,
        conn: ConnectionId,
        code: &RoomCode,
        is_host: bool,
        sender: LobbySender,
    ) {
        let categories = self.words.category_names();
        let Some(room) = self.registry.get_mut(code) else {
            return;
        };

        let name = room.add_player(conn, is_host, sender);
        tracing::info!(
            room = %code,
            %conn,
            player = %name,
            players = room.player_count(),
            "player joined"
        );

        room.send_to(
            conn,
            ServerMessage::JoinedRoom {
                room_code: code.clone(),
                player_name: name,
                is_host,
                categories,
            },
        );
        let snapshot = room.snapshot();
        room.broadcast(ServerMessage::UpdateLobbyUi { lobby: snapshot });

        self.registry.index_member(conn, code.clone());
    }

    /// Applies a settings change and rebroadcasts the lobby.
    ///
    /// Host only; calls from anyone else (or for an unknown room) are
    /// silent no-ops. Values aren't range-checked here — an oversized
    /// imposter count is clamped at round start.
    pub fn update_settings(
        &mut self,
        conn: ConnectionId,
        code: &RoomCode,
        change: SettingChange,
    ) {
        let Some(room) = self.registry.get_mut(code) else {
            return;
        };
        if room.host_id() != conn {
            tracing::debug!(room = %code, %conn, "settings update from non-host, ignoring");
            return;
        }

        room.settings_mut().apply(change);
        let snapshot = room.snapshot();
        room.broadcast(ServerMessage::UpdateLobbyUi { lobby: snapshot });
    }

    /// Starts a round: deals one secret word to everyone except a
    /// randomly drawn set of imposters, then flips the room into play.
    ///
    /// Host only; non-host calls and unknown rooms are silent no-ops.
    /// Role deals are strictly per-player private messages — no
    /// aggregate broadcast ever carries the secret.
    pub fn start_game(
        &mut self,
        conn: ConnectionId,
        code: &RoomCode,
    ) -> Result<(), LobbyError> {
        let Some(room) = self.registry.get_mut(code) else {
            return Ok(());
        };
        if room.host_id() != conn {
            tracing::debug!(room = %code, %conn, "start request from non-host, ignoring");
            return Ok(());
        }

        // Resolve the word list before touching any room state, so a
        // misconfigured bank can't leave the room half-started.
        let configured = room.settings().category.clone();
        let (category, pool) = self
            .words
            .resolve(&configured)
            .ok_or_else(|| LobbyError::NoWords(configured.clone()))?;
        let category = category.to_string();

        let mut rng = rand::rng();
        let secret = pool[rng.random_range(0..pool.len())].clone();

        // Sample imposters without replacement from a shrinking pool.
        // At least one non-imposter survives whenever the room has two
        // or more players.
        let mut candidates = room.player_ids();
        let max_imposters = candidates.len().saturating_sub(1).max(1);
        let imposter_count =
            (room.settings().imposter_count.max(1) as usize).min(max_imposters);
        let mut imposters = HashSet::with_capacity(imposter_count);
        for _ in 0..imposter_count {
            let index = rng.random_range(0..candidates.len());
            imposters.insert(candidates.swap_remove(index));
        }

        // The narrator draw is independent of the imposter draw.
        let starting_player =
            room.players()[rng.random_range(0..room.player_count())]
                .name
                .clone();

        for player in room.players() {
            let is_imposter = imposters.contains(&player.id);
            room.send_to(
                player.id,
                ServerMessage::GameStarted {
                    is_imposter,
                    category: category.clone(),
                    word_data: (!is_imposter).then(|| secret.clone()),
                    starting_player: starting_player.clone(),
                },
            );
        }

        room.begin_round();
        tracing::info!(
            room = %code,
            %category,
            imposters = imposter_count,
            players = room.player_count(),
            "round started"
        );
        Ok(())
    }

    /// Records a round-reveal acknowledgment; when every member has
    /// acknowledged, broadcasts `allReady` with the configured timer
    /// duration.
    ///
    /// Idempotent per connection: duplicate calls and calls from
    /// non-members never advance the barrier, so `allReady` fires
    /// exactly once per round.
    pub fn player_ready(&mut self, conn: ConnectionId, code: &RoomCode) {
        let Some(room) = self.registry.get_mut(code) else {
            return;
        };
        if !room.mark_ready(conn) {
            return;
        }

        if room.ready_count() == room.player_count() {
            tracing::info!(room = %code, players = room.player_count(), "all players ready");
            room.broadcast(ServerMessage::AllReady {
                duration: room.settings().timer_duration_seconds,
            });
        }
    }

    /// Removes a player from a room.
    ///
    /// Destroys the room when it empties; otherwise migrates host
    /// authority to the earliest remaining joiner if needed and
    /// rebroadcasts the lobby. Unknown rooms and non-members are no-ops.
    pub fn leave_room(&mut self, conn: ConnectionId, code: &RoomCode) {
        let (was_host, now_empty) = {
            let Some(room) = self.registry.get_mut(code) else {
                return;
            };
            let Some(player) = room.remove_player(conn) else {
                return;
            };
            tracing::info!(
                room = %code,
                %conn,
                player = %player.name,
                players = room.player_count(),
                "player left"
            );
            (player.is_host, room.player_count() == 0)
        };

        self.registry.unindex_member(conn);

        if now_empty {
            self.registry.remove(code);
            return;
        }

        if let Some(room) = self.registry.get_mut(code) {
            if was_host {
                if let Some(name) = room.promote_oldest() {
                    tracing::info!(room = %code, new_host = %name, "host migrated");
                }
            }
            let snapshot = room.snapshot();
            room.broadcast(ServerMessage::UpdateLobbyUi { lobby: snapshot });
        }
    }

    /// Handles a dropped connection: leaves whatever room the connection
    /// was in. O(1) via the reverse index; a connection is in at most
    /// one room.
    pub fn disconnect(&mut self, conn: ConnectionId) {
        if let Some(code) = self.registry.room_of(conn).cloned() {
            tracing::debug!(room = %code, %conn, "connection dropped, leaving room");
            self.leave_room(conn, &code);
        }
    }
}
