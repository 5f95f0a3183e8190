//! Drag-and-drop move payloads and drop targets.

use std::collections::HashMap;

use crm_core::result::AppResult;
use crm_core::types::ItemId;
use crm_entity::item::{Item, ItemKind};

use crate::navigator::Navigator;

/// Transfer key carrying the dragged item's id.
pub const ITEM_ID_KEY: &str = "itemId";

/// Transfer key carrying the dragged item's kind.
pub const ITEM_TYPE_KEY: &str = "itemType";

/// The string data carried by a drag operation.
///
/// The ids inside are trusted as-is when the drop lands; they are never
/// re-checked against the browser's cached items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DragPayload {
    data: HashMap<String, String>,
}

impl DragPayload {
    /// The payload set when dragging `item` starts.
    pub fn for_item(item: &Item) -> Self {
        let mut payload = Self::default();
        payload.set(ITEM_ID_KEY, item.id().as_str());
        payload.set(ITEM_TYPE_KEY, item.kind().as_str());
        payload
    }

    /// Wrap raw transfer data.
    pub fn from_transfer(data: HashMap<String, String>) -> Self {
        Self { data }
    }

    /// Set one transfer entry.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.data.insert(key.into(), value.into());
    }

    /// Raw transfer data.
    pub fn as_transfer(&self) -> &HashMap<String, String> {
        &self.data
    }

    /// The dragged item's id, if present and not blank.
    pub fn item_id(&self) -> Option<ItemId> {
        self.data.get(ITEM_ID_KEY)?.parse().ok()
    }

    /// The dragged item's kind.
    pub fn item_kind(&self) -> AppResult<ItemKind> {
        self.data
            .get(ITEM_TYPE_KEY)
            .map(String::as_str)
            .unwrap_or_default()
            .parse()
    }
}

/// Where an item can be dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// A folder card; the item moves into it.
    Folder(ItemId),
    /// The breadcrumb bar; the item moves to the open folder's parent.
    BreadcrumbBar,
}

impl DropTarget {
    /// The drop target offered by a card, if any. Only folders accept drops.
    pub fn for_item(item: &Item) -> Option<Self> {
        match item {
            Item::Folder(folder) => Some(Self::Folder(folder.id.clone())),
            Item::File(_) => None,
        }
    }

    /// The containment pointer a drop here assigns (`None` for root).
    pub fn destination(&self, navigator: &Navigator) -> Option<ItemId> {
        match self {
            Self::Folder(id) => Some(id.clone()),
            Self::BreadcrumbBar => navigator.parent_of_current().cloned(),
        }
    }
}
