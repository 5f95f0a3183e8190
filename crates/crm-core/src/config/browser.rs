//! Browser behaviour configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Defaults and switches for the item browser.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BrowserConfig {
    /// Category filter applied when a browser is created (`"all"` for none).
    #[serde(default = "default_filter")]
    #[validate(length(min = 1))]
    pub default_category: String,
    /// Status filter applied when a browser is created (`"all"` for none).
    #[serde(default = "default_filter")]
    #[validate(length(min = 1))]
    pub default_status: String,
    /// Reject drops that would obviously make a folder its own ancestor
    /// before contacting the server.
    #[serde(default = "default_true")]
    pub reject_cyclic_drops: bool,
    /// Directory downloads are saved into.
    #[serde(default = "default_download_dir")]
    pub download_dir: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            default_category: default_filter(),
            default_status: default_filter(),
            reject_cyclic_drops: default_true(),
            download_dir: default_download_dir(),
        }
    }
}

fn default_filter() -> String {
    "all".to_string()
}

fn default_true() -> bool {
    true
}

fn default_download_dir() -> String {
    ".".to_string()
}
