use crate::history::DEFAULT_HISTORY_CAPACITY;
use crate::params::SimulationParameters;
use crate::stream::{HEALTH_PATH, STREAM_PATH};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client-side settings for a streaming session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    pub base_url: String,
    pub history_capacity: usize,
    pub connect_timeout_ms: u64,
    pub channel_capacity: usize,
    pub parameters: SimulationParameters,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".into(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            connect_timeout_ms: 10_000,
            channel_capacity: 64,
            parameters: SimulationParameters::default(),
        }
    }
}

impl SessionConfig {
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn stream_url(&self) -> String {
        format!("{}{}", self.base(), STREAM_PATH)
    }

    pub fn health_url(&self) -> String {
        format!("{}{}", self.base(), HEALTH_PATH)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms.max(1))
    }
}
