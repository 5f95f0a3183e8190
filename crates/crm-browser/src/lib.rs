//! # crm-browser
//!
//! A read-through, write-through view over a remote [`ItemStore`]. The
//! [`ItemBrowser`] keeps the last fetched files and folders, the open
//! folder and its breadcrumb path, and the active filters. Every change
//! is written to the store first and followed by a full refresh; nothing
//! is updated optimistically.
//!
//! [`ItemStore`]: crm_client::ItemStore

pub mod browser;
pub mod confirm;
pub mod download;
pub mod drag;
pub mod filter;
pub mod navigator;
pub mod notify;
pub mod validation;

pub use browser::ItemBrowser;
pub use confirm::Confirmer;
pub use download::DownloadedFile;
pub use drag::{DragPayload, DropTarget};
pub use filter::{ItemFilter, apply_filters, parse_category};
pub use navigator::Navigator;
pub use notify::{Notice, NoticeLevel, Notifier};
