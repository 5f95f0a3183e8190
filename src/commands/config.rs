//! Effective configuration display.

use crm_core::config::AppConfig;
use crm_core::result::AppResult;

use crate::output::{self, OutputFormat};

/// Print the loaded configuration with credentials masked.
pub fn execute(config: &AppConfig, format: OutputFormat) -> AppResult<()> {
    output::print_item(&config.redacted(), format);
    Ok(())
}
