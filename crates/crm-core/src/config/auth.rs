//! Credential source configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Where the bearer credential comes from.
///
/// Sources are consulted in order: an inline `token`, then the
/// environment variable named by `token_env`, then `token_file`.
/// Having none of them is allowed; requests then go out without an
/// `Authorization` header and fail the way the server decides.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AuthConfig {
    /// Inline bearer token.
    #[serde(default)]
    pub token: Option<String>,
    /// Name of an environment variable holding the token.
    #[serde(default = "default_token_env")]
    pub token_env: Option<String>,
    /// Path of a file whose trimmed contents are the token.
    #[serde(default)]
    pub token_file: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token: None,
            token_env: default_token_env(),
            token_file: None,
        }
    }
}

impl AuthConfig {
    /// A copy with the inline token masked, for display.
    pub fn redacted(&self) -> Self {
        Self {
            token: self.token.as_ref().map(|_| "********".to_string()),
            ..self.clone()
        }
    }
}

fn default_token_env() -> Option<String> {
    Some("CRM_TOKEN".to_string())
}
