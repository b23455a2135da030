use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::Path;

use crate::api::CommandDefaults;

/// Client tuning read from `options.json`. Every field is optional.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ClientOptions {
    #[serde(default = "default_timeout", deserialize_with = "flexible_u64")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout", deserialize_with = "flexible_u64")]
    pub connect_timeout_secs: u64,

    /// Floor sent with every create/update. Can come as `1` or `"1"`.
    #[serde(default = "default_floor", deserialize_with = "flexible_i64")]
    pub default_floor: i64,

    #[serde(default = "default_building_id", deserialize_with = "flexible_i64")]
    pub default_building_id: i64,
}

fn default_timeout() -> u64 { 10 }
fn default_connect_timeout() -> u64 { 5 }
fn default_floor() -> i64 { CommandDefaults::default().floor as i64 }
fn default_building_id() -> i64 { CommandDefaults::default().building_id }

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            default_floor: default_floor(),
            default_building_id: default_building_id(),
        }
    }
}

impl ClientOptions {
    /// Loads and validates the options file. A missing file means defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            warn!("Options file {:?} not found, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read options file: {:?}", path))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let options: ClientOptions = serde_json::from_str(content)
            .context("JSON schema mismatch in options file")?;

        ensure!(options.timeout_secs > 0, "timeout_secs must be positive");
        ensure!(options.connect_timeout_secs > 0, "connect_timeout_secs must be positive");
        ensure!(
            i32::try_from(options.default_floor).is_ok(),
            "default_floor out of range: {}",
            options.default_floor
        );

        Ok(options)
    }

    pub fn command_defaults(&self) -> CommandDefaults {
        CommandDefaults {
            floor: self.default_floor as i32,
            building_id: self.default_building_id,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrInt<T> {
    Str(String),
    Int(T),
}

/// Accepts `12345` and `"12345"`.
fn flexible_u64<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match StringOrInt::<u64>::deserialize(deserializer)? {
        StringOrInt::Int(i) => Ok(i),
        StringOrInt::Str(s) => s.trim().parse::<u64>().map_err(serde::de::Error::custom),
    }
}

fn flexible_i64<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match StringOrInt::<i64>::deserialize(deserializer)? {
        StringOrInt::Int(i) => Ok(i),
        StringOrInt::Str(s) => s.trim().parse::<i64>().map_err(serde::de::Error::custom),
    }
}
