//! `ParlorServer` builder and accept loop.
//!
//! The server owns one [`LobbyService`] behind an async mutex. Every
//! client operation locks it for the full duration of the mutation, so
//! room-state transitions are serialized exactly as the lobby core
//! requires; disconnect cleanup goes through the same lock and can't
//! race an in-flight request.

use std::sync::Arc;

use parlor_lobby::{LobbyService, WordBank};
use parlor_protocol::JsonCodec;
use parlor_transport::{Transport, WebSocketTransport};
use tokio::sync::Mutex;

use crate::ParlorError;
use crate::handler::handle_connection;

/// Shared server state passed to each connection handler task.
pub(crate) struct ServerState {
    pub(crate) lobbies: Mutex<LobbyService>,
    pub(crate) codec: JsonCodec,
}

/// Builder for configuring and starting a Parlor server.
///
/// # Example
///
/// ```rust,ignore
/// let server = ParlorServerBuilder::new()
///     .bind("0.0.0.0:3000")
///     .build()
///     .await?;
/// server.run().await
/// ```
pub struct ParlorServerBuilder {
    bind_addr: String,
    words: WordBank,
}

impl ParlorServerBuilder {
    /// Creates a new builder with the default bind address and the
    /// compiled-in word bank.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            words: WordBank::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Replaces the word bank.
    pub fn word_bank(mut self, words: WordBank) -> Self {
        self.words = words;
        self
    }

    /// Binds the transport and builds the server.
    pub async fn build(self) -> Result<ParlorServer, ParlorError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let state = Arc::new(ServerState {
            lobbies: Mutex::new(LobbyService::new(self.words)),
            codec: JsonCodec,
        });

        Ok(ParlorServer { transport, state })
    }
}

impl Default for ParlorServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Parlor server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct ParlorServer {
    transport: WebSocketTransport,
    state: Arc<ServerState>,
}

impl ParlorServer {
    /// Creates a new builder.
    pub fn builder() -> ParlorServerBuilder {
        ParlorServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the server accept loop.
    ///
    /// Accepts incoming connections and spawns a handler task for each.
    /// Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), ParlorError> {
        tracing::info!("Parlor server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
