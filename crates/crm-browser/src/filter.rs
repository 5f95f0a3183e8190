//! Client-side visibility rules over fetched items.

use serde::{Deserialize, Serialize};

use crm_core::types::{ItemId, Selection};
use crm_entity::item::{Item, ItemStatus};

/// The user's current search text and filter selections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFilter {
    /// Search text matched against names and tags.
    pub query: String,
    /// File category filter. Also sent to the server on refresh.
    pub category: Selection<String>,
    /// File status filter. Applied locally only.
    pub status: Selection<ItemStatus>,
}

impl ItemFilter {
    /// Visible subset of `items` for the folder `cursor`.
    pub fn apply<'a>(&self, items: &'a [Item], cursor: Option<&ItemId>) -> Vec<&'a Item> {
        apply_filters(items, &self.query, &self.category, &self.status, cursor)
    }
}

/// Parse a category filter. `"all"` (any case) or blank means no filter.
pub fn parse_category(raw: &str) -> Selection<String> {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("all") {
        Selection::All
    } else {
        Selection::Only(raw.to_string())
    }
}

/// Visible subset of `items`, in input order.
///
/// Rules run in order and short-circuit: containment (pointer equals
/// `cursor`, root included), search (case-insensitive substring of the
/// name or any tag), category, status. Folders skip the last two.
/// The query is matched as typed; one made only of whitespace matches
/// everything.
pub fn apply_filters<'a>(
    items: &'a [Item],
    query: &str,
    category: &Selection<String>,
    status: &Selection<ItemStatus>,
    cursor: Option<&ItemId>,
) -> Vec<&'a Item> {
    let needle = if query.trim().is_empty() {
        String::new()
    } else {
        query.to_lowercase()
    };
    items
        .iter()
        .filter(|item| item.containment() == cursor)
        .filter(|item| matches_query(item, &needle))
        .filter(|item| match item {
            Item::Folder(_) => true,
            Item::File(file) => category.admits(&file.category),
        })
        .filter(|item| match item {
            Item::Folder(_) => true,
            Item::File(file) => status.admits(&file.status),
        })
        .collect()
}

fn matches_query(item: &Item, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    item.name().to_lowercase().contains(needle)
        || item
            .tags()
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle))
}
