//! # crm-entity
//!
//! Domain models for the CRM file browser. An [`item::Item`] is either a
//! file or a folder as returned by the remote store; [`folder::FolderPath`]
//! is the breadcrumb from root to the open folder; [`request`] holds the
//! payloads sent back for creates and updates.

pub mod folder;
pub mod item;
pub mod request;
