use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{header, Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::models::{Room, RoomCommand};
use super::RoomsTransport;

/// Basic credentials for the rooms API.
#[derive(Clone, Debug)]
pub struct Credentials {
    pub user: String,
    pub password: Option<String>,
}

pub struct RoomsApiClient {
    url: String,
    client: Client,
    credentials: Option<Credentials>,
}

impl RoomsApiClient {
    pub fn new(
        url: String,
        credentials: Option<Credentials>,
        timeout_secs: u64,
        connect_timeout: u64,
    ) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(connect_timeout))
            .build()
            .context("Failed to build rooms API HTTP client")?;

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            client,
            credentials,
        })
    }

    pub fn rooms_url(&self) -> String {
        format!("{}/rooms", self.url)
    }

    pub fn room_url(&self, id: i64) -> String {
        format!("{}/rooms/{}", self.url, id)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        debug!("{} {}", method, url);
        let builder = self.client.request(method, url);
        match &self.credentials {
            Some(c) => builder.basic_auth(&c.user, c.password.as_ref()),
            None => builder,
        }
    }

    /// Sends the request and fails on transport errors and non-2xx statuses.
    async fn execute(&self, builder: RequestBuilder, what: &str) -> Result<Response> {
        let res = builder
            .send()
            .await
            .with_context(|| format!("Failed to send {} request", what))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(anyhow!("Rooms API error {}: {}", status, body));
        }

        Ok(res)
    }

    /// Reads an optional JSON body. Empty bodies and `null` become `None`.
    async fn read_body<T: DeserializeOwned>(res: Response, what: &str) -> Result<Option<T>> {
        let bytes = res
            .bytes()
            .await
            .with_context(|| format!("Failed to read {} response", what))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        serde_json::from_slice::<Option<T>>(&bytes)
            .with_context(|| format!("Failed to parse {} response", what))
    }
}

#[async_trait]
impl RoomsTransport for RoomsApiClient {
    async fn find_all(&self) -> Result<Option<Vec<Room>>> {
        let res = self
            .execute(self.request(Method::GET, &self.rooms_url()), "list rooms")
            .await?;
        Self::read_body(res, "list rooms").await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Room>> {
        let res = self
            .execute(self.request(Method::GET, &self.room_url(id)), "get room")
            .await?;
        Self::read_body(res, "get room").await
    }

    async fn update(&self, id: i64, command: &RoomCommand) -> Result<Option<Room>> {
        let builder = self.request(Method::PUT, &self.room_url(id)).json(command);
        let res = self.execute(builder, "update room").await?;
        Self::read_body(res, "update room").await
    }

    async fn create(&self, command: &RoomCommand) -> Result<Option<Room>> {
        let builder = self.request(Method::POST, &self.rooms_url()).json(command);
        let res = self.execute(builder, "create room").await?;
        Self::read_body(res, "create room").await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.execute(self.request(Method::DELETE, &self.room_url(id)), "delete room")
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::CommandDefaults;
    use crate::sync::{RoomSyncClient, SyncError};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Local HTTP server answering every request with the same response.
    async fn serve(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else { return };
                tokio::spawn(async move {
                    let mut buf = Vec::new();
                    let mut chunk = [0u8; 1024];
                    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                        match socket.read(&mut chunk).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => buf.extend_from_slice(&chunk[..n]),
                        }
                    }
                    let response = format!(
                        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        status,
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        format!("http://{}/api", addr)
    }

    fn client(url: &str) -> RoomsApiClient {
        RoomsApiClient::new(url.to_string(), None, 10, 5).unwrap()
    }

    /// Client for the local stub; ignores any proxy set in the environment.
    fn local_client(url: &str) -> RoomsApiClient {
        RoomsApiClient {
            url: url.to_string(),
            client: Client::builder().no_proxy().build().unwrap(),
            credentials: None,
        }
    }

    #[test]
    fn test_urls_trim_trailing_slash() {
        let api = client("http://localhost:8080/api/");

        assert_eq!(api.rooms_url(), "http://localhost:8080/api/rooms");
        assert_eq!(api.room_url(7), "http://localhost:8080/api/rooms/7");
    }

    #[test]
    fn test_update_request_carries_command_body() {
        let api = client("http://localhost:8080/api");
        let room = Room {
            id: 7,
            name: "Hall".into(),
            current_temperature: None,
            target_temperature: Some(21.37),
            windows: None,
        };
        let command = RoomCommand::from_room(&room, CommandDefaults::default());

        let request = api
            .request(Method::PUT, &api.room_url(room.id))
            .json(&command)
            .build()
            .unwrap();

        assert_eq!(request.method(), &Method::PUT);
        assert_eq!(request.url().path(), "/api/rooms/7");

        let body: serde_json::Value =
            serde_json::from_slice(request.body().unwrap().as_bytes().unwrap()).unwrap();
        assert_eq!(body["targetTemperature"], 21.4);
        assert_eq!(body["buildingId"], -10);
        assert!(body.get("id").is_none());
    }

    #[test]
    fn test_basic_auth_is_attached() {
        let api = RoomsApiClient::new(
            "http://localhost:8080/api".into(),
            Some(Credentials { user: "user".into(), password: Some("password".into()) }),
            10,
            5,
        )
        .unwrap();

        let request = api.request(Method::GET, &api.rooms_url()).build().unwrap();

        let auth = request.headers().get(header::AUTHORIZATION).unwrap();
        assert!(auth.is_sensitive());
        assert_eq!(auth.to_str().unwrap(), "Basic dXNlcjpwYXNzd29yZA==");
    }

    #[tokio::test]
    async fn test_empty_and_null_bodies_are_absent() {
        for (status, body) in [("200 OK", ""), ("200 OK", "null"), ("204 No Content", "")] {
            let api = local_client(&serve(status, body).await);

            assert_eq!(api.find_all().await.unwrap(), None, "{} {:?}", status, body);
            assert_eq!(api.find_by_id(1).await.unwrap(), None, "{} {:?}", status, body);
        }
    }

    #[tokio::test]
    async fn test_empty_bodies_through_sync_client() {
        let api = local_client(&serve("200 OK", "").await);
        let sync = RoomSyncClient::new(Arc::new(api), CommandDefaults::default());

        assert_eq!(sync.load_all().await.unwrap(), vec![]);
        assert_eq!(sync.rooms().rooms, vec![]);
        assert_eq!(sync.rooms().error, None);

        assert_eq!(sync.load_one(1).await.unwrap(), None);
        assert_eq!(sync.selected(), None);
    }

    #[tokio::test]
    async fn test_decodes_room_list() {
        let api = local_client(&serve(
            "200 OK",
            r#"[{"id":1,"name":"A","currentTemperature":20.1,"targetTemperature":21.0,"windows":null}]"#,
        )
        .await);

        let rooms = api.find_all().await.unwrap().unwrap();
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].name, "A");
    }

    #[tokio::test]
    async fn test_non_2xx_is_transport_failure() {
        let api = local_client(&serve("404 Not Found", "{}").await);

        let err = api.find_all().await.unwrap_err();
        assert_eq!(err.to_string(), "Rooms API error 404 Not Found: {}");

        let sync = RoomSyncClient::new(Arc::new(api), CommandDefaults::default());
        assert!(matches!(sync.load_all().await, Err(SyncError::Transport(_))));
        assert!(sync.rooms().rooms.is_empty());
        assert!(sync.rooms().error.unwrap().contains("404"));
    }

    #[tokio::test]
    async fn test_undecodable_body_is_transport_failure() {
        let api = local_client(&serve("200 OK", "garbage").await);

        let err = api.find_all().await.unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse list rooms response"));
        assert!(api.find_by_id(1).await.is_err());
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_selection() {
        let api = local_client(&serve("500 Internal Server Error", "").await);
        let sync = RoomSyncClient::new(Arc::new(api), CommandDefaults::default());
        let selected = Room {
            id: 3,
            name: "Lab".into(),
            current_temperature: Some(19.0),
            target_temperature: Some(20.0),
            windows: None,
        };
        sync.edit(selected.clone());

        assert!(matches!(sync.delete(3).await, Err(SyncError::Transport(_))));
        assert_eq!(sync.selected(), Some(selected));
    }
}
