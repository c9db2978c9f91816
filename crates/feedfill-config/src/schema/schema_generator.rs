//! Generator and fill configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::strings;

/// Remote comment generator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Base URLs in priority order. Later entries are only tried after a
    /// transport failure on the earlier ones.
    #[serde(default = "default_endpoints")]
    pub endpoints: Vec<String>,

    /// Request path appended to every base URL.
    #[serde(default = "default_path")]
    pub path: String,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Per-endpoint request timeout.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            endpoints: default_endpoints(),
            path: default_path(),
            connect_timeout_secs: default_connect_timeout(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl GeneratorConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_endpoints() -> Vec<String> {
    strings(&["https://127.0.0.1:5000", "http://127.0.0.1:5000"])
}

fn default_path() -> String {
    "/generate_comment".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    30
}

/// Fill coordinator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillConfig {
    /// Attribute set on a target once it has been filled.
    #[serde(default = "default_marker_attribute")]
    pub marker_attribute: String,

    /// Upper bound for one generation call, across all endpoints.
    #[serde(default = "default_generation_timeout")]
    pub generation_timeout_secs: u64,

    /// Written into the target when a user-initiated generation fails.
    #[serde(default = "default_fallback_message")]
    pub fallback_message: String,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            marker_attribute: default_marker_attribute(),
            generation_timeout_secs: default_generation_timeout(),
            fallback_message: default_fallback_message(),
        }
    }
}

impl FillConfig {
    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }
}

fn default_marker_attribute() -> String {
    "data-assistant-filled".to_string()
}

fn default_generation_timeout() -> u64 {
    60
}

fn default_fallback_message() -> String {
    "Sorry, I couldn't generate a comment at this time. Please try again later.".to_string()
}
