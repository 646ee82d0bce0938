//! # Parlor server
//!
//! The WebSocket server for Parlor, a hidden-role "imposter" word party
//! game. Clients create or join lobbies by room code, the host tunes
//! settings and starts rounds, and the server privately deals one secret
//! word to everyone except a randomly chosen set of imposters.
//!
//! This crate ties the layers together: transport (WebSocket frames) →
//! protocol (tagged JSON events) → lobby core (rooms, roles, readiness).

mod error;
mod handler;
mod server;

pub use error::ParlorError;
pub use server::{ParlorServer, ParlorServerBuilder};
