//! Remote REST API connection settings.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Where and how the browser talks to the remote item store.
///
/// Timeouts are `0` by default, which leaves the transport's own
/// defaults in place.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ApiConfig {
    /// Base URL of the REST API, e.g. `https://crm.example.com/api`.
    #[serde(default = "default_base_url")]
    #[validate(length(min = 1))]
    pub base_url: String,
    /// Whole-request timeout in seconds (0 = transport default).
    #[serde(default)]
    #[validate(range(max = 3600))]
    pub request_timeout_seconds: u64,
    /// Connect timeout in seconds (0 = transport default).
    #[serde(default)]
    #[validate(range(max = 600))]
    pub connect_timeout_seconds: u64,
    /// `User-Agent` header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_seconds: 0,
            connect_timeout_seconds: 0,
            user_agent: default_user_agent(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080/api".to_string()
}

fn default_user_agent() -> String {
    format!("crm-files/{}", env!("CARGO_PKG_VERSION"))
}
