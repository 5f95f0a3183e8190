//! CLI command definitions and dispatch.

pub mod config;
pub mod ls;
pub mod shell;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::debug;

use crm_browser::{ItemBrowser, Notifier};
use crm_client::HttpItemStore;
use crm_client::credential::ChainedCredentials;
use crm_core::config::AppConfig;
use crm_core::error::AppError;
use crm_core::result::AppResult;
use crm_entity::item::Item;

use crate::output::OutputFormat;

/// Config file used when neither `--config` nor `CRM_CONFIG` is set.
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Environment overlay used when `CRM_ENV` is not set.
const DEFAULT_ENV: &str = "development";

/// Browse and manage CRM files and folders
#[derive(Debug, Parser)]
#[command(name = "crm-files", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (falls back to $CRM_CONFIG)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List a folder's contents
    Ls(ls::LsArgs),
    /// Interactive browser session
    Shell,
    /// Show the effective configuration
    Config,
}

impl Cli {
    /// Load configuration from the selected file, its environment overlay
    /// and `CRM__*` variables.
    pub fn load_config(&self) -> AppResult<AppConfig> {
        let path = self
            .config
            .clone()
            .or_else(|| std::env::var("CRM_CONFIG").ok())
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
        let env = std::env::var("CRM_ENV").unwrap_or_else(|_| DEFAULT_ENV.to_string());
        AppConfig::load(&path, &env)
    }

    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> AppResult<()> {
        match &self.command {
            Commands::Ls(args) => ls::execute(args, &config, self.format).await,
            Commands::Shell => shell::execute(&config, self.format).await,
            Commands::Config => config::execute(&config, self.format),
        }
    }
}

/// Build a browser over the configured REST API.
pub fn open_browser(config: &AppConfig, notifier: Arc<dyn Notifier>) -> AppResult<ItemBrowser> {
    let credentials = Arc::new(ChainedCredentials::from_config(&config.auth));
    let store = Arc::new(HttpItemStore::new(&config.api, credentials)?);
    let browser = ItemBrowser::new(store, notifier, &config.browser)?;
    debug!(
        store = browser.store_type(),
        base_url = %config.api.base_url,
        "Browser ready"
    );
    Ok(browser)
}

/// Find a visible item by exact name, preferring folders.
pub fn find_visible(browser: &ItemBrowser, name: &str) -> AppResult<Item> {
    let visible = browser.visible();
    visible
        .iter()
        .find(|i| i.is_folder() && i.name() == name)
        .or_else(|| visible.iter().find(|i| i.name() == name))
        .map(|i| (*i).clone())
        .ok_or_else(|| {
            AppError::not_found(format!(
                "No item named '{name}' in {}",
                browser.path().display()
            ))
        })
}

/// Open each `/`-separated folder name in turn, starting from root.
pub async fn walk_path(browser: &mut ItemBrowser, path: &str) -> AppResult<()> {
    browser.go_to_root().await?;
    for segment in path.split('/').filter(|s| !s.trim().is_empty()) {
        let item = find_visible(browser, segment.trim())?;
        if !item.is_folder() {
            return Err(AppError::validation(format!(
                "'{}' is a file, not a folder",
                item.name()
            )));
        }
        browser.open_folder(&item).await?;
    }
    Ok(())
}
