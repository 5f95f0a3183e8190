//! Open-folder tracking and breadcrumb navigation.
//!
//! None of these operations touch the network; the browser refreshes
//! after a navigation succeeds.

use crm_core::error::AppError;
use crm_core::result::AppResult;
use crm_core::types::ItemId;
use crm_entity::folder::{Crumb, FolderPath};
use crm_entity::item::{Folder, Item};

/// Tracks the open folder as a breadcrumb path from root.
///
/// The cursor is always the id of the last crumb, or root when the path
/// is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigator {
    path: FolderPath,
}

impl Navigator {
    /// A navigator positioned at root.
    pub fn new() -> Self {
        Self::default()
    }

    /// The open folder, or `None` at root.
    pub fn cursor(&self) -> Option<&ItemId> {
        self.path.last().map(|c| &c.id)
    }

    /// The breadcrumb path, root first.
    pub fn path(&self) -> &FolderPath {
        &self.path
    }

    /// Check if the root is open.
    pub fn is_at_root(&self) -> bool {
        self.path.is_empty()
    }

    /// Open a folder below the current one.
    ///
    /// Files cannot be opened; the navigator is left unchanged.
    pub fn open_folder(&mut self, item: &Item) -> AppResult<()> {
        let Some(folder) = item.as_folder() else {
            return Err(AppError::validation(format!(
                "'{}' is a file and cannot be opened",
                item.name()
            )));
        };
        self.open(folder);
        Ok(())
    }

    /// Push `folder` onto the path.
    pub fn open(&mut self, folder: &Folder) {
        self.path.push(Crumb::from(folder));
    }

    /// Truncate the path to its first `index` crumbs.
    ///
    /// `0` goes to root; `path().len()` is a no-op.
    pub fn navigate_to_breadcrumb(&mut self, index: usize) -> AppResult<()> {
        if index > self.path.len() {
            return Err(AppError::validation(format!(
                "Breadcrumb {index} is out of range (path has {} entries)",
                self.path.len()
            )));
        }
        self.path.truncate(index);
        Ok(())
    }

    /// Clear the path.
    pub fn go_to_root(&mut self) {
        self.path.clear();
    }

    /// The parent of the open folder (root at the top two levels).
    pub fn parent_of_current(&self) -> Option<&ItemId> {
        let crumbs = self.path.crumbs();
        crumbs.len().checked_sub(2).map(|i| &crumbs[i].id)
    }

    /// Whether moving folder `source` into `destination` would place it
    /// inside itself, as far as the open path shows.
    ///
    /// True when `destination` is `source`, or when both lie on the path
    /// with `destination` at or below `source`. Anything the path cannot
    /// settle is left to the store.
    pub fn would_nest(&self, source: &ItemId, destination: Option<&ItemId>) -> bool {
        let Some(destination) = destination else {
            return false;
        };
        if destination == source {
            return true;
        }
        match (self.path.position(source), self.path.position(destination)) {
            (Some(source_at), Some(destination_at)) => destination_at >= source_at,
            _ => false,
        }
    }
}
