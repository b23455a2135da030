use std::env;
use std::path::PathBuf;
use anyhow::{Result, ensure};
use log::{info, warn};

use crate::api::Credentials;

pub struct EnvConfig {
    pub api_url: String,
    pub api_user: Option<String>,
    pub api_password: Option<String>,
    pub options: PathBuf,
    /// Room to open after the list is loaded.
    pub room_id: Option<i64>,
}

impl EnvConfig {
    pub fn load() -> Self {
        dotenvy::dotenv().ok();

        Self {
            api_url: env::var("AUTOMACORP_API_URL")
                .unwrap_or_else(|_| "http://localhost:8080/api".to_string()),

            api_user: env::var("AUTOMACORP_API_USER").ok().filter(|s| !s.is_empty()),

            api_password: env::var("AUTOMACORP_API_PASSWORD").ok().filter(|s| !s.is_empty()),

            options: env::var("OPTIONS_PATH")
                .unwrap_or_else(|_| "options.json".to_string())
                .into(),

            room_id: env::var("ROOM_ID").ok().and_then(|s| s.trim().parse().ok()),
        }
    }

    pub fn validate(self) -> Result<Self> {
        info!("--- Checking env variables ---");
        info!("🔗 API URL: {}", self.api_url);
        info!("📄 Options: {:?}", self.options);
        info!("👤 API user: {}", self.api_user.as_deref().unwrap_or("<anonymous>"));

        ensure!(
            self.api_url.starts_with("http://") || self.api_url.starts_with("https://"),
            "Critical Error: AUTOMACORP_API_URL must be an http(s) URL, got {}",
            self.api_url
        );

        ensure!(
            self.api_password.is_none() || self.api_user.is_some(),
            "AUTOMACORP_API_PASSWORD is set without AUTOMACORP_API_USER"
        );

        if !self.options.exists() {
            warn!("⚠️ Options file not found {:?}", self.options);
        }

        Ok(self)
    }

    pub fn credentials(&self) -> Option<Credentials> {
        self.api_user.as_ref().map(|user| Credentials {
            user: user.clone(),
            password: self.api_password.clone(),
        })
    }
}
