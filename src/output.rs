//! Table and JSON output formatting for CLI commands.

use serde::Serialize;
use tabled::{Table, Tabled};

use crm_browser::notify::{Notice, NoticeLevel, Notifier};
use crm_entity::item::Item;

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Item display row
#[derive(Debug, Serialize, Tabled)]
pub struct ItemRow {
    /// File or folder
    kind: String,
    /// Item ID
    id: String,
    /// Name
    name: String,
    /// Status
    status: String,
    /// Category (files only)
    category: String,
    /// Tags
    tags: String,
    /// Size in bytes (files only)
    size: String,
    /// Created at
    created_at: String,
}

impl From<&Item> for ItemRow {
    fn from(item: &Item) -> Self {
        let size = item
            .as_file()
            .and_then(|f| f.size)
            .map(|s| s.to_string())
            .unwrap_or_default();
        Self {
            kind: item.kind().to_string(),
            id: item.id().to_string(),
            name: item.name().to_string(),
            status: item.status().to_string(),
            category: item.category().unwrap_or_default().to_string(),
            tags: item.tags().join(", "),
            size,
            created_at: item
                .created_at()
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
        }
    }
}

/// Print items in the selected format. JSON output keeps full records.
pub fn print_items(items: &[&Item], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            let rows: Vec<ItemRow> = items.iter().map(|i| ItemRow::from(*i)).collect();
            print_list(&rows, format);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string());
            println!("{}", json);
        }
    }
}

/// Print a list of rows in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No items.");
            } else {
                let table = Table::new(items).to_string();
                println!("{}", table);
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string());
            println!("{}", json);
        }
    }
}

/// Print a single value in the selected format
pub fn print_item<T: Serialize + std::fmt::Debug>(item: &T, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            println!("{:#?}", item);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(item).unwrap_or_else(|_| "{}".to_string());
            println!("{}", json);
        }
    }
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {}", msg);
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {}", msg);
}

/// Prints browser notices to the terminal.
#[derive(Debug, Clone, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => print_success(&notice.message),
            NoticeLevel::Error => print_error(&notice.message),
        }
    }
}
