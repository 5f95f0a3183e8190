//! Breadcrumb path from root to the open folder.

use serde::{Deserialize, Serialize};

use crm_core::types::ItemId;

use crate::item::Folder;

/// One breadcrumb entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crumb {
    /// Folder id.
    pub id: ItemId,
    /// Folder name at the time it was opened.
    pub name: String,
}

impl From<&Folder> for Crumb {
    fn from(folder: &Folder) -> Self {
        Self {
            id: folder.id.clone(),
            name: folder.name.clone(),
        }
    }
}

/// Ordered breadcrumbs; `crumbs[i]` is the parent of `crumbs[i + 1]`.
///
/// An empty path means the root is open.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FolderPath {
    crumbs: Vec<Crumb>,
}

impl FolderPath {
    /// An empty (root) path.
    pub fn root() -> Self {
        Self::default()
    }

    /// The breadcrumbs, root first.
    pub fn crumbs(&self) -> &[Crumb] {
        &self.crumbs
    }

    /// Number of folders between root and the open folder, inclusive.
    pub fn len(&self) -> usize {
        self.crumbs.len()
    }

    /// Check if the root is open.
    pub fn is_empty(&self) -> bool {
        self.crumbs.is_empty()
    }

    /// The open folder's crumb, if not at root.
    pub fn last(&self) -> Option<&Crumb> {
        self.crumbs.last()
    }

    /// Whether `id` is the open folder or one of its ancestors.
    pub fn contains(&self, id: &ItemId) -> bool {
        self.position(id).is_some()
    }

    /// Index of `id` in the path, root first.
    pub fn position(&self, id: &ItemId) -> Option<usize> {
        self.crumbs.iter().position(|c| &c.id == id)
    }

    /// Append a crumb.
    pub fn push(&mut self, crumb: Crumb) {
        self.crumbs.push(crumb);
    }

    /// Keep only the first `len` crumbs.
    pub fn truncate(&mut self, len: usize) {
        self.crumbs.truncate(len);
    }

    /// Remove every crumb.
    pub fn clear(&mut self) {
        self.crumbs.clear();
    }

    /// Render as `/A/B/C` for display.
    pub fn display(&self) -> String {
        if self.crumbs.is_empty() {
            return "/".to_string();
        }
        self.crumbs.iter().fold(String::new(), |mut acc, c| {
            acc.push('/');
            acc.push_str(&c.name);
            acc
        })
    }
}
