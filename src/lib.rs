//! Client-side synchronization for the Automacorp rooms API.
//!
//! [`api`] talks HTTP, [`sync`] keeps the observable room state that a
//! presentation layer renders and drives through [`sync::Intent`]s.

#[macro_use]
extern crate log;

pub mod api;
pub mod config;
pub mod options;
pub mod sync;

pub use api::{Room, RoomsTransport};
pub use sync::{Intent, RoomCollectionState, RoomSyncClient, SyncError};
