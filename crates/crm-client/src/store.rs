//! Remote item store trait.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crm_core::result::AppResult;
use crm_core::types::ItemId;
use crm_entity::item::{File, Folder};
use crm_entity::request::{FilePatch, FolderPatch, NewFile, NewFolder};

/// A byte stream used for file downloads.
pub type ByteStream = Pin<Box<dyn Stream<Item = AppResult<Bytes>> + Send>>;

/// The authoritative store of files and folders.
///
/// Files and folders live behind separate operations; callers dispatch
/// on [`crm_entity::item::ItemKind`] to pick the right one.
#[async_trait]
pub trait ItemStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the store type name (e.g., "http", "memory").
    fn store_type(&self) -> &str;

    /// List folders directly inside `parent` (root when `None`).
    async fn list_folders(&self, parent: Option<&ItemId>) -> AppResult<Vec<Folder>>;

    /// List files with the given category (every category when `None`).
    async fn list_files(&self, category: Option<&str>) -> AppResult<Vec<File>>;

    /// Create a folder.
    async fn create_folder(&self, folder: &NewFolder) -> AppResult<Folder>;

    /// Upload a file.
    async fn upload_file(&self, file: NewFile) -> AppResult<File>;

    /// Update a folder's fields or parent.
    async fn update_folder(&self, id: &ItemId, patch: &FolderPatch) -> AppResult<Folder>;

    /// Update a file's fields or containing folder.
    async fn update_file(&self, id: &ItemId, patch: &FilePatch) -> AppResult<File>;

    /// Delete a folder.
    async fn delete_folder(&self, id: &ItemId) -> AppResult<()>;

    /// Delete a file.
    async fn delete_file(&self, id: &ItemId) -> AppResult<()>;

    /// Stream a file's content.
    async fn download_file(&self, id: &ItemId) -> AppResult<ByteStream>;

    /// Read a file's content into memory.
    async fn download_file_bytes(&self, id: &ItemId) -> AppResult<Bytes> {
        use futures::TryStreamExt;

        let chunks: Vec<Bytes> = self.download_file(id).await?.try_collect().await?;
        Ok(chunks.concat().into())
    }
}
