//! One-shot folder listing.

use std::sync::Arc;

use clap::Args;

use crm_browser::filter::parse_category;
use crm_browser::notify::TracingNotifier;
use crm_core::config::AppConfig;
use crm_core::result::AppResult;

use crate::output::{self, OutputFormat};

/// Arguments for the ls command
#[derive(Debug, Args)]
pub struct LsArgs {
    /// Folder to list as `A/B/C` from root (root when omitted)
    #[arg(short, long)]
    pub path: Option<String>,
    /// Case-insensitive search over names and tags
    #[arg(short, long)]
    pub query: Option<String>,
    /// File category (`all` for every category)
    #[arg(long)]
    pub category: Option<String>,
    /// File status (`all` for every status)
    #[arg(long)]
    pub status: Option<String>,
}

/// Execute the ls command
pub async fn execute(args: &LsArgs, config: &AppConfig, format: OutputFormat) -> AppResult<()> {
    let mut browser = super::open_browser(config, Arc::new(TracingNotifier))?;

    if let Some(category) = &args.category {
        browser.set_category(parse_category(category));
    }
    if let Some(status) = &args.status {
        browser.set_status(status.parse()?);
    }

    match &args.path {
        Some(path) => super::walk_path(&mut browser, path).await?,
        None => browser.refresh().await?,
    }

    if let Some(query) = &args.query {
        browser.set_query(query.clone());
    }

    if format == OutputFormat::Table {
        println!("{}", browser.path().display());
    }
    output::print_items(&browser.visible(), format);
    Ok(())
}
