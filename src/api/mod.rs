pub(crate) mod client;
pub(crate) mod models;

use anyhow::Result;
use async_trait::async_trait;

pub use client::{Credentials, RoomsApiClient};
pub use models::{CommandDefaults, Room, RoomCommand, Window, WindowCommand, WindowStatus};

use crate::options::ClientOptions;

/// The rooms REST API as seen by the sync client.
///
/// A missing or `null` response body is reported as `Ok(None)`; transport
/// errors, non-2xx statuses and undecodable bodies are all `Err`.
#[async_trait]
pub trait RoomsTransport: Send + Sync {
    /// `GET /rooms`
    async fn find_all(&self) -> Result<Option<Vec<Room>>>;
    /// `GET /rooms/{id}`
    async fn find_by_id(&self, id: i64) -> Result<Option<Room>>;
    /// `PUT /rooms/{id}`
    async fn update(&self, id: i64, command: &RoomCommand) -> Result<Option<Room>>;
    /// `POST /rooms`
    async fn create(&self, command: &RoomCommand) -> Result<Option<Room>>;
    /// `DELETE /rooms/{id}`
    async fn delete(&self, id: i64) -> Result<()>;
}

pub fn init(url: String, credentials: Option<Credentials>, options: &ClientOptions) -> Result<RoomsApiClient> {
    RoomsApiClient::new(url, credentials, options.timeout_secs, options.connect_timeout_secs)
}
