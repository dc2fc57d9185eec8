use anyhow::{Result, anyhow};
use config::{Config, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub auth: Auth,
    pub verification: Verification,
    pub store: Store,
    pub mail: Mail,
    pub log: Log,
}

#[derive(Debug, Deserialize)]
pub struct Auth {
    pub backend: String, // "fake" or "real"
    pub signing_key: String,
    pub access_token_lifetime_secs: u64,
    pub refresh_token_ttl_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct Verification {
    pub email_confirm_ttl_secs: u64,
    pub password_reset_ttl_secs: u64,
    pub token_length: usize,
    pub token_digits: usize,
    pub token_symbols: usize,
}

#[derive(Debug, Deserialize)]
pub struct Store {
    pub backend: String, // "memory" or "redis"
    pub redis_url: String,
    pub key_prefix: String,
    pub op_timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct Mail {
    pub queue_capacity: usize,
    pub workers: usize,
}

#[derive(Debug, Deserialize)]
pub struct Log {
    pub filter: String,
}

#[cfg(debug_assertions)]
const SETTINGS_PATH: &str = "settings/dev.toml";
#[cfg(not(debug_assertions))]
const SETTINGS_PATH: &str = "settings/release.toml";

pub fn parse_settings(path: Option<&str>) -> Result<Settings> {
    let path = path.unwrap_or(SETTINGS_PATH);

    let settings: Settings = Config::builder()
        .add_source(File::with_name(path))
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))?;

    Ok(settings)
}
