//! File and folder records.

pub mod kind;
pub mod model;
pub mod status;

pub use kind::ItemKind;
pub use model::{File, Folder, Item};
pub use status::ItemStatus;
