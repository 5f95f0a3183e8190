//! Item lifecycle status.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::kind::ItemKind;

/// Lifecycle status of a file or folder.
///
/// Items are created `active`. From `active` they may move to any other
/// status the kind accepts, and every other status may only move back to
/// `active`. Deletion is terminal and has no status of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// Live and in use.
    #[default]
    Active,
    /// Temporarily out of use.
    Inactive,
    /// Kept for reference only.
    Archived,
    /// Work in progress. Folders only.
    Draft,
}

impl ItemStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Archived => "archived",
            Self::Draft => "draft",
        }
    }

    /// Whether an item of `kind` may carry this status.
    pub fn is_allowed_for(&self, kind: ItemKind) -> bool {
        match (self, kind) {
            (Self::Draft, ItemKind::File) => false,
            _ => true,
        }
    }

    /// Whether an item may move from `self` to `next`.
    pub fn can_transition_to(&self, next: ItemStatus) -> bool {
        *self == next || *self == Self::Active || next == Self::Active
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = crm_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "archived" => Ok(Self::Archived),
            "draft" => Ok(Self::Draft),
            _ => Err(crm_core::AppError::validation(format!(
                "Invalid status: '{s}'. Expected one of: active, inactive, archived, draft"
            ))),
        }
    }
}
