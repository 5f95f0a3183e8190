//! File and folder records as returned by the remote store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crm_core::types::ItemId;

use super::kind::ItemKind;
use super::status::ItemStatus;

/// A stored document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct File {
    /// Unique identifier.
    pub id: ItemId,
    /// Display name, also used as the saved file name on download.
    pub name: String,
    /// Lifecycle status.
    #[serde(default)]
    pub status: ItemStatus,
    /// Ordered free-text tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// When the file was uploaded.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Content length in bytes, when the store reports it.
    #[serde(default)]
    pub size: Option<u64>,
    /// Free-text category label.
    #[serde(default)]
    pub category: String,
    /// Short description (at most 100 words).
    #[serde(default)]
    pub description: Option<String>,
    /// Associated contact label.
    #[serde(default)]
    pub contact: Option<String>,
    /// Associated deal label.
    #[serde(default)]
    pub deal: Option<String>,
    /// Containing folder (None at root).
    #[serde(default)]
    pub folder_id: Option<ItemId>,
}

/// A container of files and folders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    /// Unique identifier.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Lifecycle status.
    #[serde(default)]
    pub status: ItemStatus,
    /// Ordered free-text tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// When the folder was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Short description (at most 100 words).
    #[serde(default)]
    pub description: Option<String>,
    /// Parent folder (None at root).
    #[serde(default)]
    pub parent_id: Option<ItemId>,
}

impl Folder {
    /// Check if this folder sits at root.
    pub fn is_root_level(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// A file or a folder, tagged with its kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Item {
    /// A file record.
    File(File),
    /// A folder record.
    Folder(Folder),
}

impl Item {
    /// The item's identifier.
    pub fn id(&self) -> &ItemId {
        match self {
            Self::File(f) => &f.id,
            Self::Folder(f) => &f.id,
        }
    }

    /// The item's display name.
    pub fn name(&self) -> &str {
        match self {
            Self::File(f) => &f.name,
            Self::Folder(f) => &f.name,
        }
    }

    /// Which kind of item this is.
    pub fn kind(&self) -> ItemKind {
        match self {
            Self::File(_) => ItemKind::File,
            Self::Folder(_) => ItemKind::Folder,
        }
    }

    /// The item's lifecycle status.
    pub fn status(&self) -> ItemStatus {
        match self {
            Self::File(f) => f.status,
            Self::Folder(f) => f.status,
        }
    }

    /// The item's tags.
    pub fn tags(&self) -> &[String] {
        match self {
            Self::File(f) => &f.tags,
            Self::Folder(f) => &f.tags,
        }
    }

    /// When the item was created, if known.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::File(f) => f.created_at,
            Self::Folder(f) => f.created_at,
        }
    }

    /// The containing folder: `folder_id` for files, `parent_id` for folders.
    pub fn containment(&self) -> Option<&ItemId> {
        match self {
            Self::File(f) => f.folder_id.as_ref(),
            Self::Folder(f) => f.parent_id.as_ref(),
        }
    }

    /// The file category; folders have none.
    pub fn category(&self) -> Option<&str> {
        match self {
            Self::File(f) => Some(&f.category),
            Self::Folder(_) => None,
        }
    }

    /// Check if this is a folder.
    pub fn is_folder(&self) -> bool {
        matches!(self, Self::Folder(_))
    }

    /// Borrow the folder record, if this is one.
    pub fn as_folder(&self) -> Option<&Folder> {
        match self {
            Self::Folder(f) => Some(f),
            Self::File(_) => None,
        }
    }

    /// Borrow the file record, if this is one.
    pub fn as_file(&self) -> Option<&File> {
        match self {
            Self::File(f) => Some(f),
            Self::Folder(_) => None,
        }
    }
}

impl From<File> for Item {
    fn from(value: File) -> Self {
        Self::File(value)
    }
}

impl From<Folder> for Item {
    fn from(value: Folder) -> Self {
        Self::Folder(value)
    }
}
