//! Core type definitions used across the workspace.

pub mod filter;
pub mod id;

pub use filter::Selection;
pub use id::ItemId;
