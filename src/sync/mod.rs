//! Room state synchronization.
//!
//! [`RoomSyncClient`] turns the rooms REST API into two observable state
//! slots: the room list and the currently selected room. Each operation
//! performs one round trip and settles into at most one state write.
//! Transport failures never escape as panics; they become state plus an
//! `Err` for callers that await the operation.

mod error;
mod intent;
mod state;

use std::sync::Arc;
use tokio::sync::watch;

pub use error::{SyncError, SyncResult};
pub use intent::Intent;
pub use state::{RoomCollectionState, Ticket};

use crate::api::{CommandDefaults, Room, RoomCommand, RoomsTransport};
use state::Slot;

/// Target temperatures the editor accepts.
pub const TARGET_TEMPERATURE_RANGE: std::ops::RangeInclusive<f64> = 10.0..=28.0;

#[derive(Clone)]
pub struct RoomSyncClient {
    inner: Arc<Inner>,
}

struct Inner {
    transport: Arc<dyn RoomsTransport>,
    defaults: CommandDefaults,
    rooms: Slot<RoomCollectionState>,
    selected: Slot<Option<Room>>,
}

impl RoomSyncClient {
    pub fn new(transport: Arc<dyn RoomsTransport>, defaults: CommandDefaults) -> Self {
        Self {
            inner: Arc::new(Inner {
                transport,
                defaults,
                rooms: Slot::new("room list", RoomCollectionState::default()),
                selected: Slot::new("selected room", None),
            }),
        }
    }

    pub fn subscribe_rooms(&self) -> watch::Receiver<RoomCollectionState> {
        self.inner.rooms.subscribe()
    }

    pub fn subscribe_selected(&self) -> watch::Receiver<Option<Room>> {
        self.inner.selected.subscribe()
    }

    pub fn rooms(&self) -> RoomCollectionState {
        self.inner.rooms.snapshot()
    }

    pub fn selected(&self) -> Option<Room> {
        self.inner.selected.snapshot()
    }

    /// Replaces the room list with the server's, or with an error.
    pub async fn load_all(&self) -> SyncResult<Vec<Room>> {
        let ticket = self.inner.rooms.ticket();
        info!("Loading rooms");

        match self.inner.transport.find_all().await {
            Ok(body) => {
                let rooms = body.unwrap_or_default();
                self.inner.rooms.publish(ticket, RoomCollectionState::loaded(rooms.clone()))?;
                info!("Loaded {} rooms", rooms.len());
                Ok(rooms)
            }
            Err(e) => {
                let err = SyncError::from(e);
                warn!("Failed to load rooms: {}", err);
                self.inner.rooms.publish(ticket, RoomCollectionState::failed(err.diagnostic()))?;
                Err(err)
            }
        }
    }

    /// Selects the room with `id` as the server currently has it.
    pub async fn load_one(&self, id: i64) -> SyncResult<Option<Room>> {
        let ticket = self.inner.selected.ticket();
        info!("Loading room {}", id);

        let result = self.inner.transport.find_by_id(id).await;
        self.settle_selected(ticket, result, "load room", id)
    }

    /// Saves `room` under `id` and selects the server's representation.
    ///
    /// On failure the selection is cleared, dropping any local edits.
    pub async fn update(&self, id: i64, room: Room) -> SyncResult<Option<Room>> {
        let ticket = self.inner.selected.ticket();
        let command = RoomCommand::from_room(&room, self.inner.defaults);
        info!("Updating room {} (target {:?})", id, command.target_temperature);

        let result = self.inner.transport.update(id, &command).await;
        self.settle_selected(ticket, result, "update room", id)
    }

    /// Creates `room` and selects the created one. `room.id` is ignored.
    pub async fn create(&self, room: Room) -> SyncResult<Option<Room>> {
        let ticket = self.inner.selected.ticket();
        let command = RoomCommand::from_room(&room, self.inner.defaults);
        info!("Creating room {:?}", command.name);

        let result = self.inner.transport.create(&command).await;
        self.settle_selected(ticket, result, "create room", room.id)
    }

    /// Deletes the room and clears the selection.
    ///
    /// On failure the selection is left as it was.
    pub async fn delete(&self, id: i64) -> SyncResult<()> {
        let ticket = self.inner.selected.ticket();
        info!("Deleting room {}", id);

        match self.inner.transport.delete(id).await {
            Ok(()) => {
                self.inner.selected.publish(ticket, None)?;
                info!("Room {} deleted", id);
                Ok(())
            }
            Err(e) => {
                let err = SyncError::from(e);
                warn!("Failed to delete room {}: {}", id, err);
                Err(err)
            }
        }
    }

    /// Replaces the selected room with an edited copy, locally.
    pub fn edit(&self, room: Room) {
        let ticket = self.inner.selected.ticket();
        // Always the latest ticket unless another request races this call.
        if self.inner.selected.publish(ticket, Some(room)).is_err() {
            debug!("Local edit superseded");
        }
    }

    pub fn rename(&self, name: impl Into<String>) -> Option<Room> {
        let room = Room { name: name.into(), ..self.selected()? };
        self.edit(room.clone());
        Some(room)
    }

    /// Sets the selected room's target, clamped to [`TARGET_TEMPERATURE_RANGE`].
    pub fn set_target_temperature(&self, target: f64) -> Option<Room> {
        let target = target.clamp(*TARGET_TEMPERATURE_RANGE.start(), *TARGET_TEMPERATURE_RANGE.end());
        let room = Room { target_temperature: Some(target), ..self.selected()? };
        self.edit(room.clone());
        Some(room)
    }

    fn settle_selected(
        &self,
        ticket: Ticket,
        result: anyhow::Result<Option<Room>>,
        what: &str,
        id: i64,
    ) -> SyncResult<Option<Room>> {
        match result {
            Ok(room) => {
                self.inner.selected.publish(ticket, room.clone())?;
                info!("{} {}: ok", what, id);
                Ok(room)
            }
            Err(e) => {
                let err = SyncError::from(e);
                warn!("Failed to {} {}: {}", what, id, err);
                self.inner.selected.publish(ticket, None)?;
                Err(err)
            }
        }
    }
}
