//! Per-connection handler: message routing and disconnect cleanup.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Register an outbound channel and spawn a writer task for it
//!   2. Loop: receive frames → decode → dispatch to the lobby service
//!   3. On exit (clean close, error, or panic) the drop guard leaves
//!      whatever room the connection was in

use std::sync::Arc;

use parlor_lobby::LobbyError;
use parlor_protocol::{ClientMessage, Codec, ConnectionId, ServerMessage};
use parlor_transport::{Connection, WebSocketConnection};
use tokio::sync::mpsc;

use crate::ParlorError;
use crate::server::ServerState;

/// Drop guard that removes a connection from its room when the handler
/// exits.
///
/// This ensures cleanup happens even if the handler panics. Since `Drop`
/// is synchronous, we spawn a fire-and-forget task for the async lock.
struct DisconnectGuard {
    conn_id: ConnectionId,
    state: Arc<ServerState>,
}

impl Drop for DisconnectGuard {
    fn drop(&mut self) {
        let conn_id = self.conn_id;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            state.lobbies.lock().await.disconnect(conn_id);
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    conn: WebSocketConnection,
    state: Arc<ServerState>,
) -> Result<(), ParlorError> {
    let conn_id = conn.id();
    tracing::debug!(%conn_id, "handling new connection");

    // Outbound path: lobby code pushes `ServerMessage`s onto this
    // channel from wherever it runs; the writer task owns the socket
    // sends so broadcasts never block on this handler's read loop.
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    let conn = Arc::new(conn);

    // The writer exits on its own once every sender is gone: this
    // handler's `tx` drops below, and the room's clone drops when the
    // guard's disconnect removes the player.
    {
        let conn = Arc::clone(&conn);
        let codec = state.codec;
        tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                let bytes = match codec.encode(&msg) {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        tracing::error!(%conn_id, error = %e, "failed to encode event");
                        continue;
                    }
                };
                if conn.send(&bytes).await.is_err() {
                    break;
                }
            }
        });
    }

    let _guard = DisconnectGuard {
        conn_id,
        state: Arc::clone(&state),
    };

    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::debug!(%conn_id, "connection closed cleanly");
                break;
            }
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                break;
            }
        };

        let message: ClientMessage = match state.codec.decode(&data) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "failed to decode message");
                let _ = tx.send(ServerMessage::Error {
                    message: format!("invalid message: {e}"),
                });
                continue;
            }
        };

        dispatch(conn_id, message, &state, &tx).await;
    }

    // _guard drops here → room cleanup fires, which also releases the
    // room's sender clone and ends the writer task.
    Ok(())
}

/// Routes one decoded client message into the lobby service.
///
/// Lobby failures are reported back to the offending connection only;
/// they never tear the connection down.
async fn dispatch(
    conn_id: ConnectionId,
    message: ClientMessage,
    state: &Arc<ServerState>,
    tx: &mpsc::UnboundedSender<ServerMessage>,
) {
    let result: Result<(), LobbyError> = {
        let mut lobbies = state.lobbies.lock().await;
        match message {
            ClientMessage::CreateLobby => {
                lobbies.create_lobby(conn_id, tx.clone()).map(|_| ())
            }
            ClientMessage::JoinLobby { room_code } => {
                lobbies.join_lobby(conn_id, room_code, tx.clone())
            }
            ClientMessage::UpdateSettings { room_code, change } => {
                lobbies.update_settings(conn_id, &room_code, change);
                Ok(())
            }
            ClientMessage::StartGame { room_code } => {
                lobbies.start_game(conn_id, &room_code)
            }
            ClientMessage::PlayerReady { room_code } => {
                lobbies.player_ready(conn_id, &room_code);
                Ok(())
            }
            ClientMessage::LeaveRoom { room_code } => {
                lobbies.leave_room(conn_id, &room_code);
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        tracing::debug!(%conn_id, error = %e, "lobby operation failed");
        let _ = tx.send(ServerMessage::Error {
            message: e.to_string(),
        });
    }
}
