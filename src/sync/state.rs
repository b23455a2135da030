use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

use super::error::{SyncError, SyncResult};
use crate::api::Room;

/// What the room list screen renders.
///
/// Both fields empty means nothing has been loaded yet.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoomCollectionState {
    pub rooms: Vec<Room>,
    pub error: Option<String>,
}

impl RoomCollectionState {
    pub fn loaded(rooms: Vec<Room>) -> Self {
        Self { rooms, error: None }
    }

    pub fn failed(error: String) -> Self {
        Self { rooms: Vec::new(), error: Some(error) }
    }

    pub fn is_pending(&self) -> bool {
        self.rooms.is_empty() && self.error.is_none()
    }
}

/// Identifies one request against a [`Slot`]. Larger is newer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// A watched value that only the most recently issued request may write.
pub(crate) struct Slot<T> {
    name: &'static str,
    tx: watch::Sender<T>,
    issued: AtomicU64,
}

impl<T> Slot<T> {
    pub fn new(name: &'static str, initial: T) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { name, tx, issued: AtomicU64::new(0) }
    }

    pub fn ticket(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Writes `value` if `ticket` is still the latest one issued.
    ///
    /// The check runs under the channel's write lock, so a stale writer can
    /// never land after a newer one.
    pub fn publish(&self, ticket: Ticket, value: T) -> SyncResult<()> {
        let mut value = Some(value);
        let applied = self.tx.send_if_modified(|current| {
            if self.issued.load(Ordering::SeqCst) != ticket.0 {
                return false;
            }
            if let Some(v) = value.take() {
                *current = v;
            }
            true
        });

        if applied {
            Ok(())
        } else {
            debug!("Dropped stale {} response (ticket {})", self.name, ticket.0);
            Err(SyncError::Superseded)
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

impl<T: Clone> Slot<T> {
    pub fn snapshot(&self) -> T {
        self.tx.borrow().clone()
    }
}
