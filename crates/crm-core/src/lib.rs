//! # crm-core
//!
//! Core crate for the CRM file browser. Contains configuration schemas,
//! the opaque item identifier, filter selections, the credential
//! provider trait, and the unified error system.
//!
//! This crate has **no** internal dependencies on other workspace crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
