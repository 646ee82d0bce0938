//! Lobby lifecycle and round engine for Parlor.
//!
//! This crate is the game core: it owns every room, decides who may join
//! or leave, applies host-gated settings changes, deals secret roles at
//! round start, and runs the all-players-ready barrier that kicks off
//! the shared round timer.
//!
//! # Key types
//!
//! - [`LobbyService`] — every operation a connected client can trigger
//! - [`Registry`] — the room map plus the connection→room reverse index
//! - [`Room`] / [`Player`] — per-lobby state
//! - [`WordBank`] — category → secret-word dataset with a fixed fallback
//!
//! All mutation goes through `&mut LobbyService`; callers serialize
//! operations (the server holds the service behind one async mutex), so
//! every operation here is atomic with respect to every other.

mod error;
mod registry;
mod room;
mod service;
mod words;

pub use error::LobbyError;
pub use registry::Registry;
pub use room::{LobbySender, Player, Room};
pub use service::LobbyService;
pub use words::{Category, FALLBACK_CATEGORY, WordBank, WordBankError};
