//! In-process item store.
//!
//! Holds folders, files and file contents in memory and enforces the
//! rules the remote store is authoritative for: containment pointers
//! must reference existing folders, folder names are unique per parent,
//! and a folder can never be moved into itself or a descendant. Used as
//! the backing store of test backends and for offline runs.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crm_core::error::AppError;
use crm_core::result::AppResult;
use crm_core::types::ItemId;
use crm_entity::item::{File, Folder, ItemKind};
use crm_entity::request::{FilePatch, FolderPatch, NewFile, NewFolder};

use crate::store::{ByteStream, ItemStore};

#[derive(Debug, Default)]
struct Inner {
    /// Folders in creation order.
    folders: Vec<Folder>,
    /// Files in creation order.
    files: Vec<File>,
    /// File contents keyed by file id.
    contents: HashMap<ItemId, Bytes>,
}

impl Inner {
    fn folder(&self, id: &ItemId) -> Option<&Folder> {
        self.folders.iter().find(|f| &f.id == id)
    }

    fn folder_mut(&mut self, id: &ItemId) -> Option<&mut Folder> {
        self.folders.iter_mut().find(|f| &f.id == id)
    }

    fn file_mut(&mut self, id: &ItemId) -> Option<&mut File> {
        self.files.iter_mut().find(|f| &f.id == id)
    }

    fn require_folder(&self, id: Option<&ItemId>) -> AppResult<()> {
        match id {
            Some(id) if self.folder(id).is_none() => {
                Err(AppError::not_found(format!("Folder '{id}' not found")))
            }
            _ => Ok(()),
        }
    }

    /// Whether `candidate` is `ancestor` or lies somewhere below it.
    fn is_within(&self, candidate: &ItemId, ancestor: &ItemId) -> bool {
        let mut current = Some(candidate.clone());
        // The hop bound guards against a cycle already present in the data.
        for _ in 0..=self.folders.len() {
            let Some(id) = current else {
                return false;
            };
            if &id == ancestor {
                return true;
            }
            current = self.folder(&id).and_then(|f| f.parent_id.clone());
        }
        false
    }

    fn name_taken(&self, parent: Option<&ItemId>, name: &str, except: Option<&ItemId>) -> bool {
        self.folders.iter().any(|f| {
            f.parent_id.as_ref() == parent && f.name == name && Some(&f.id) != except
        })
    }

    /// Every folder id in the subtree rooted at `root`, root included.
    fn subtree(&self, root: &ItemId) -> Vec<ItemId> {
        self.folders
            .iter()
            .filter(|f| self.is_within(&f.id, root))
            .map(|f| f.id.clone())
            .collect()
    }
}

/// An [`ItemStore`] that lives entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryItemStore {
    inner: Arc<RwLock<Inner>>,
    offline: Arc<AtomicBool>,
    requests: Arc<AtomicU64>,
}

impl MemoryItemStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail as if the network were down.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of calls made against the store so far, failed ones included.
    pub fn request_count(&self) -> u64 {
        self.requests.load(Ordering::SeqCst)
    }

    /// Look up a folder by id.
    pub async fn folder(&self, id: &ItemId) -> Option<Folder> {
        self.inner.read().await.folder(id).cloned()
    }

    /// Look up a file by id.
    pub async fn file(&self, id: &ItemId) -> Option<File> {
        self.inner
            .read()
            .await
            .files
            .iter()
            .find(|f| &f.id == id)
            .cloned()
    }

    fn begin(&self, op: &str) -> AppResult<()> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        debug!(operation = op, "Memory store call");
        if self.offline.load(Ordering::SeqCst) {
            return Err(AppError::network(format!("{op} request failed: store offline")));
        }
        Ok(())
    }

    fn next_id(kind: ItemKind) -> ItemId {
        ItemId::new(format!("{}-{}", kind.as_str(), Uuid::new_v4().simple()))
    }
}

#[async_trait]
impl ItemStore for MemoryItemStore {
    fn store_type(&self) -> &str {
        "memory"
    }

    async fn list_folders(&self, parent: Option<&ItemId>) -> AppResult<Vec<Folder>> {
        self.begin("List folders")?;
        let inner = self.inner.read().await;
        Ok(inner
            .folders
            .iter()
            .filter(|f| f.parent_id.as_ref() == parent)
            .cloned()
            .collect())
    }

    async fn list_files(&self, category: Option<&str>) -> AppResult<Vec<File>> {
        self.begin("List files")?;
        let inner = self.inner.read().await;
        Ok(inner
            .files
            .iter()
            .filter(|f| category.is_none_or(|c| f.category == c))
            .cloned()
            .collect())
    }

    async fn create_folder(&self, folder: &NewFolder) -> AppResult<Folder> {
        self.begin("Create folder")?;
        if folder.name.trim().is_empty() {
            return Err(AppError::validation("Folder name cannot be empty"));
        }

        let mut inner = self.inner.write().await;
        inner.require_folder(folder.parent_id.as_ref())?;
        if inner.name_taken(folder.parent_id.as_ref(), &folder.name, None) {
            return Err(AppError::conflict(format!(
                "A folder named '{}' already exists here",
                folder.name
            )));
        }

        let created = Folder {
            id: Self::next_id(ItemKind::Folder),
            name: folder.name.clone(),
            status: folder.status,
            tags: folder.tags.clone(),
            created_at: Some(Utc::now()),
            description: folder.description.clone(),
            parent_id: folder.parent_id.clone(),
        };
        inner.folders.push(created.clone());
        Ok(created)
    }

    async fn upload_file(&self, file: NewFile) -> AppResult<File> {
        self.begin("Upload file")?;
        if file.name.trim().is_empty() {
            return Err(AppError::validation("File name cannot be empty"));
        }

        let mut inner = self.inner.write().await;
        inner.require_folder(file.folder_id.as_ref())?;

        let created = File {
            id: Self::next_id(ItemKind::File),
            name: file.name,
            status: file.status,
            tags: file.tags,
            created_at: Some(Utc::now()),
            size: Some(file.content.len() as u64),
            category: file.category,
            description: file.description,
            contact: file.contact,
            deal: file.deal,
            folder_id: file.folder_id,
        };
        inner.contents.insert(created.id.clone(), file.content);
        inner.files.push(created.clone());
        Ok(created)
    }

    async fn update_folder(&self, id: &ItemId, patch: &FolderPatch) -> AppResult<Folder> {
        self.begin("Update folder")?;
        let mut inner = self.inner.write().await;
        let current = inner
            .folder(id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Folder '{id}' not found")))?;

        let parent = match &patch.parent_id {
            Some(target) => {
                inner.require_folder(target.as_ref())?;
                if let Some(target) = target {
                    if inner.is_within(target, id) {
                        return Err(AppError::conflict(
                            "Cannot move a folder into itself or one of its subfolders",
                        ));
                    }
                }
                target.clone()
            }
            None => current.parent_id.clone(),
        };
        let name = patch.name.as_deref().unwrap_or(&current.name);
        if inner.name_taken(parent.as_ref(), name, Some(id)) {
            return Err(AppError::conflict(format!(
                "A folder named '{name}' already exists here"
            )));
        }

        let folder = inner
            .folder_mut(id)
            .ok_or_else(|| AppError::not_found(format!("Folder '{id}' not found")))?;
        patch.apply_to(folder);
        Ok(folder.clone())
    }

    async fn update_file(&self, id: &ItemId, patch: &FilePatch) -> AppResult<File> {
        self.begin("Update file")?;
        let mut inner = self.inner.write().await;
        if let Some(target) = &patch.folder_id {
            inner.require_folder(target.as_ref())?;
        }
        let file = inner
            .file_mut(id)
            .ok_or_else(|| AppError::not_found(format!("File '{id}' not found")))?;
        patch.apply_to(file);
        Ok(file.clone())
    }

    async fn delete_folder(&self, id: &ItemId) -> AppResult<()> {
        self.begin("Delete folder")?;
        let mut inner = self.inner.write().await;
        if inner.folder(id).is_none() {
            return Err(AppError::not_found(format!("Folder '{id}' not found")));
        }

        let doomed = inner.subtree(id);
        let orphaned: Vec<ItemId> = inner
            .files
            .iter()
            .filter(|f| f.folder_id.as_ref().is_some_and(|p| doomed.contains(p)))
            .map(|f| f.id.clone())
            .collect();
        for file_id in &orphaned {
            inner.contents.remove(file_id);
        }
        inner.files.retain(|f| !orphaned.contains(&f.id));
        inner.folders.retain(|f| !doomed.contains(&f.id));
        debug!(folder_id = %id, folders = doomed.len(), files = orphaned.len(), "Deleted folder subtree");
        Ok(())
    }

    async fn delete_file(&self, id: &ItemId) -> AppResult<()> {
        self.begin("Delete file")?;
        let mut inner = self.inner.write().await;
        let before = inner.files.len();
        inner.files.retain(|f| &f.id != id);
        if inner.files.len() == before {
            return Err(AppError::not_found(format!("File '{id}' not found")));
        }
        inner.contents.remove(id);
        Ok(())
    }

    async fn download_file(&self, id: &ItemId) -> AppResult<ByteStream> {
        self.begin("Download file")?;
        let inner = self.inner.read().await;
        let content = inner
            .contents
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("File '{id}' not found")))?;
        Ok(Box::pin(futures::stream::once(async move { Ok(content) })))
    }
}
