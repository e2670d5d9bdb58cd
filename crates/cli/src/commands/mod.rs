pub mod ask;
pub mod doctor;
pub mod init;
pub mod serve;

use std::path::Path;

use askdesk_config::AppConfig;
use tracing::debug;

/// Load config from `path` (or the default location), with a readable error.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let config = AppConfig::load(path).map_err(|e| format!("Failed to load config: {e}"))?;
    debug!(?config, "Config loaded");
    Ok(config)
}
