//! Parlor server binary.
//!
//! Binds the WebSocket transport and serves lobbies until killed.
//! Configuration is deliberately small: `PARLOR_ADDR` picks the bind
//! address, and an optional first argument names a word-bank JSON file
//! to load instead of the compiled-in bank.

use parlor_lobby::WordBank;
use parlor_server::{ParlorError, ParlorServerBuilder};

#[tokio::main]
async fn main() -> Result<(), ParlorError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    "parlor_server=info,parlor_lobby=info,parlor_transport=info"
                        .into()
                }),
        )
        .init();

    let addr = std::env::var("PARLOR_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    let words = match std::env::args().nth(1) {
        Some(path) => {
            tracing::info!(%path, "loading word bank");
            WordBank::from_path(&path)?
        }
        None => WordBank::default(),
    };

    let server = ParlorServerBuilder::new()
        .bind(&addr)
        .word_bank(words)
        .build()
        .await?;

    server.run().await
}
