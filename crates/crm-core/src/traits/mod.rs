//! Core traits defined in `crm-core` and implemented by other crates.

pub mod credential;

pub use credential::CredentialProvider;
