use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::CoreError;

/// Client configuration. Every field has a default, so a settings file only
/// needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the REST backend, including the API prefix
    pub api_base_url: String,

    /// Streaming channel URL
    pub ws_url: String,

    /// Fixed delay between push-feed reconnect attempts
    pub reconnect_interval_ms: u64,

    /// Keep-alive ping interval on the push feed
    pub ping_interval_ms: u64,

    /// Timeout of the single guarded call made at startup
    pub startup_check_timeout_ms: u64,

    /// Number of recent fills kept, newest first
    pub recent_fills_capacity: usize,

    /// Raw events shown when a daily window is too sparse
    pub daily_fallback_events: usize,

    /// Raw events shown when a weekly window is too sparse
    pub weekly_fallback_events: usize,

    /// Capacity of the push-message and engine-input channels
    pub channel_buffer_size: usize,

    /// `tracing` filter directive used by the binary
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000/api/v1".to_string(),
            ws_url: "ws://127.0.0.1:8000/ws".to_string(),
            reconnect_interval_ms: 3_000,
            ping_interval_ms: 25_000,
            startup_check_timeout_ms: 3_000,
            recent_fills_capacity: 20,
            daily_fallback_events: 20,
            weekly_fallback_events: 50,
            channel_buffer_size: 1_024,
            log_filter: "info".to_string(),
        }
    }
}

impl Settings {
    /// Parse settings from JSON; absent fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let settings: Settings = serde_json::from_str(json)
            .map_err(|e| CoreError::Config(format!("Failed to parse settings: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load_from_file(path: &str) -> Result<Self, CoreError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.api_base_url.trim().is_empty() {
            return Err(CoreError::Config("api_base_url must not be empty".into()));
        }
        if self.ws_url.trim().is_empty() {
            return Err(CoreError::Config("ws_url must not be empty".into()));
        }
        if self.ping_interval_ms == 0 {
            return Err(CoreError::Config("ping_interval_ms must be at least 1".into()));
        }
        if self.recent_fills_capacity == 0 {
            return Err(CoreError::Config("recent_fills_capacity must be at least 1".into()));
        }
        if self.channel_buffer_size == 0 {
            return Err(CoreError::Config("channel_buffer_size must be at least 1".into()));
        }
        Ok(())
    }

    pub fn reconnect_interval(&self) -> Duration {
        Duration::from_millis(self.reconnect_interval_ms)
    }

    pub fn ping_interval(&self) -> Duration {
        Duration::from_millis(self.ping_interval_ms)
    }

    pub fn fetch_policy(&self) -> FetchPolicy {
        FetchPolicy {
            startup_check_timeout: Duration::from_millis(self.startup_check_timeout_ms),
        }
    }
}

/// Network call policy.
///
/// Nothing is retried. The startup existence check is the only call with a
/// timeout; every other fetch runs untimed and its failure leaves state as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPolicy {
    pub startup_check_timeout: Duration,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Settings::default().fetch_policy()
    }
}
