//! The two item kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Discriminates files from folders.
///
/// The two kinds live behind different endpoints, so every operation
/// that talks to the store matches on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// A stored document.
    File,
    /// A container of files and folders.
    Folder,
}

impl ItemKind {
    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Folder => "folder",
        }
    }

    /// Collection path segment on the REST API.
    pub fn collection(&self) -> &'static str {
        match self {
            Self::File => "files",
            Self::Folder => "folders",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = crm_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "file" => Ok(Self::File),
            "folder" => Ok(Self::Folder),
            _ => Err(crm_core::AppError::validation(format!(
                "Invalid item kind: '{s}'. Expected one of: file, folder"
            ))),
        }
    }
}
