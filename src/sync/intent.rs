use tokio::task::JoinHandle;

use super::RoomSyncClient;
use crate::api::Room;

/// User actions forwarded by a presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Refresh,
    Select(i64),
    Save(i64, Room),
    Create(Room),
    Delete(i64),
}

impl RoomSyncClient {
    /// Runs the intent on the tokio runtime without blocking the caller.
    /// Results land in the watched state; failures are only logged here.
    pub fn dispatch(&self, intent: Intent) -> JoinHandle<()> {
        let client = self.clone();

        tokio::spawn(async move {
            let result = match intent {
                Intent::Refresh => client.load_all().await.map(drop),
                Intent::Select(id) => client.load_one(id).await.map(drop),
                Intent::Save(id, room) => client.update(id, room).await.map(drop),
                Intent::Create(room) => client.create(room).await.map(drop),
                Intent::Delete(id) => client.delete(id).await,
            };

            if let Err(e) = result {
                error!("Intent failed: {}", e);
            }
        })
    }
}
