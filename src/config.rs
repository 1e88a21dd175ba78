//! Application configuration
//!
//! Read from `.config/videokit-samples.json` when present. Every field has a
//! default, and `VIDEOKIT_APP_TOKEN` overrides the token from the file.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

const CONFIG_FILE: &str = ".config/videokit-samples.json";
const APP_TOKEN_ENV: &str = "VIDEOKIT_APP_TOKEN";

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub app_token: String,
    pub identity: String,
    /// Slots kept bound on each side of the focused one
    pub offscreen_limit: usize,
    /// Defaults to one handle per slot of the window
    pub pool_capacity: Option<usize>,
    pub catalog_size: usize,
    pub recorder_start_latency_ms: u64,
    pub busy_debounce_ms: u64,
    pub timer_refresh_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_token: String::new(),
            identity: default_identity(),
            offscreen_limit: 1,
            pool_capacity: None,
            catalog_size: 12,
            recorder_start_latency_ms: 300,
            busy_debounce_ms: 400,
            timer_refresh_ms: 100,
        }
    }
}

fn default_identity() -> String {
    let host = hostname::get()
        .map(|h| h.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "unknown".to_string());
    format!("videokit-samples-{}", host)
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(Path::new(CONFIG_FILE))?;
        if let Ok(token) = std::env::var(APP_TOKEN_ENV) {
            tracing::debug!("App token taken from {}", APP_TOKEN_ENV);
            config.app_token = token;
        }
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("parsing {}", path.display()))
    }

    fn parse(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn pool_capacity(&self) -> usize {
        self.pool_capacity.unwrap_or(2 * self.offscreen_limit + 1)
    }

    pub fn recorder_start_latency(&self) -> Duration {
        Duration::from_millis(self.recorder_start_latency_ms)
    }

    pub fn busy_debounce(&self) -> Duration {
        Duration::from_millis(self.busy_debounce_ms)
    }

    pub fn timer_refresh(&self) -> Duration {
        Duration::from_millis(self.timer_refresh_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = AppConfig::parse(r#"{ "app_token": "abc", "offscreen_limit": 2 }"#).unwrap();
        assert_eq!(config.app_token, "abc");
        assert_eq!(config.offscreen_limit, 2);
        assert_eq!(config.pool_capacity(), 5);
        assert_eq!(config.catalog_size, 12);
        assert!(config.identity.starts_with("videokit-samples-"));
    }

    #[test]
    fn explicit_capacity_wins() {
        let config = AppConfig::parse(r#"{ "pool_capacity": 2 }"#).unwrap();
        assert_eq!(config.pool_capacity(), 2);
    }

    #[test]
    fn missing_file_is_default() {
        let config = AppConfig::load_from(Path::new("does/not/exist.json")).unwrap();
        assert_eq!(config.busy_debounce(), Duration::from_millis(400));
        assert!(config.app_token.is_empty());
    }
}
