//! Folder navigation structures.

pub mod path;

pub use path::{Crumb, FolderPath};
