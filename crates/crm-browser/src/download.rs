//! Downloaded file content.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use tracing::info;

use crm_core::result::AppResult;

/// Name used when a suggested file name has no usable final component.
const FALLBACK_FILE_NAME: &str = "download";

/// A file fetched from the store, ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    /// Suggested name: the record's name, or its id when unknown.
    pub file_name: String,
    /// File content.
    pub content: Bytes,
}

impl DownloadedFile {
    /// Content size in bytes.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Check if the file is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Write the content into `dir` under its suggested name.
    ///
    /// Only the final component of the name is used, so a name containing
    /// separators cannot escape `dir`. An existing file is overwritten.
    pub async fn save_into(&self, dir: impl AsRef<Path>) -> AppResult<PathBuf> {
        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir).await?;
        let target = dir.join(self.safe_file_name());
        tokio::fs::write(&target, &self.content).await?;
        info!(path = %target.display(), bytes = self.content.len(), "File saved");
        Ok(target)
    }

    fn safe_file_name(&self) -> String {
        let name = self.file_name.replace('\\', "/");
        Path::new(&name)
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(FALLBACK_FILE_NAME)
            .to_string()
    }
}
