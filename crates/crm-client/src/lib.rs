//! # crm-client
//!
//! The [`store::ItemStore`] trait is the seam between the browser and the
//! remote store. [`http::HttpItemStore`] speaks the REST API with
//! `reqwest`; [`memory::MemoryItemStore`] keeps everything in process and
//! enforces the same rules the server does. [`credential`] holds the
//! bearer-token sources.

pub mod credential;
pub mod http;
pub mod memory;
pub mod store;

pub use http::HttpItemStore;
pub use memory::MemoryItemStore;
pub use store::{ByteStream, ItemStore};
