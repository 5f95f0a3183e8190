//! Payloads sent to the remote store for creates and updates.

use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serialize};

use crm_core::types::ItemId;

use crate::item::{File, Folder, ItemStatus};

/// Data required to create a folder (`POST /folders`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewFolder {
    /// Folder name.
    pub name: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Initial tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Initial status.
    #[serde(default)]
    pub status: ItemStatus,
    /// Parent folder (None for root).
    #[serde(default)]
    pub parent_id: Option<ItemId>,
}

impl NewFolder {
    /// A folder with just a name; everything else defaulted.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Data required to upload a file (`POST /files`, multipart).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewFile {
    /// File name.
    pub name: String,
    /// Category label.
    pub category: String,
    /// Optional description.
    pub description: Option<String>,
    /// Initial tags.
    pub tags: Vec<String>,
    /// Initial status.
    pub status: ItemStatus,
    /// Associated contact label.
    pub contact: Option<String>,
    /// Associated deal label.
    pub deal: Option<String>,
    /// Containing folder (None for root).
    pub folder_id: Option<ItemId>,
    /// File content.
    pub content: Bytes,
    /// MIME type of the content, if known.
    pub content_type: Option<String>,
}

impl NewFile {
    /// A file with a name, category and content; everything else defaulted.
    pub fn new(name: impl Into<String>, category: impl Into<String>, content: Bytes) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            content,
            ..Self::default()
        }
    }
}

/// Edits to an existing item. `None` fields are left unchanged.
///
/// Containment is not part of an edit; moves go through
/// [`FolderPatch::move_to`] / [`FilePatch::move_to`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemUpdate {
    /// New name.
    pub name: Option<String>,
    /// New category. Ignored for folders.
    pub category: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// Replacement tag list.
    pub tags: Option<Vec<String>>,
    /// New status.
    pub status: Option<ItemStatus>,
}

impl ItemUpdate {
    /// An update that only renames.
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Check if nothing would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.tags.is_none()
            && self.status.is_none()
    }

    /// Wire body for the folder-update endpoint.
    pub fn into_folder_patch(self) -> FolderPatch {
        FolderPatch {
            name: self.name,
            description: self.description,
            tags: self.tags,
            status: self.status,
            parent_id: None,
        }
    }

    /// Wire body for the file-update endpoint.
    pub fn into_file_patch(self) -> FilePatch {
        FilePatch {
            name: self.name,
            category: self.category,
            description: self.description,
            tags: self.tags,
            status: self.status,
            folder_id: None,
        }
    }
}

/// Body of `PUT /folders/:id`.
///
/// `parent_id` distinguishes "unchanged" (`None`, omitted on the wire)
/// from "move to root" (`Some(None)`, sent as `null`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FolderPatch {
    /// New name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Replacement tag list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// New status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
    /// New parent folder; `Some(None)` moves to root.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_id: Option<Option<ItemId>>,
}

impl FolderPatch {
    /// A patch that only changes the parent.
    pub fn move_to(parent_id: Option<ItemId>) -> Self {
        Self {
            parent_id: Some(parent_id),
            ..Self::default()
        }
    }

    /// Apply the patch to a folder record.
    pub fn apply_to(&self, folder: &mut Folder) {
        if let Some(name) = &self.name {
            folder.name = name.clone();
        }
        if let Some(description) = &self.description {
            folder.description = Some(description.clone());
        }
        if let Some(tags) = &self.tags {
            folder.tags = tags.clone();
        }
        if let Some(status) = self.status {
            folder.status = status;
        }
        if let Some(parent_id) = &self.parent_id {
            folder.parent_id = parent_id.clone();
        }
    }
}

/// Body of `PUT /files/:id`. See [`FolderPatch`] for `folder_id` semantics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilePatch {
    /// New name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// New description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Replacement tag list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// New status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
    /// New containing folder; `Some(None)` moves to root.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub folder_id: Option<Option<ItemId>>,
}

impl FilePatch {
    /// A patch that only changes the containing folder.
    pub fn move_to(folder_id: Option<ItemId>) -> Self {
        Self {
            folder_id: Some(folder_id),
            ..Self::default()
        }
    }

    /// Apply the patch to a file record.
    pub fn apply_to(&self, file: &mut File) {
        if let Some(name) = &self.name {
            file.name = name.clone();
        }
        if let Some(category) = &self.category {
            file.category = category.clone();
        }
        if let Some(description) = &self.description {
            file.description = Some(description.clone());
        }
        if let Some(tags) = &self.tags {
            file.tags = tags.clone();
        }
        if let Some(status) = self.status {
            file.status = status;
        }
        if let Some(folder_id) = &self.folder_id {
            file.folder_id = folder_id.clone();
        }
    }
}

/// A key that is present deserializes to `Some(value)`, including `null`.
/// Absent keys fall back to `None` via `#[serde(default)]`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
