use crate::error::{AppError, AppResult};
use crate::models::AppConfig;
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Loads the config file, writing a default template when it does not exist
/// yet so the user has something to fill in.
pub fn load_app_config(path: &Path) -> AppResult<AppConfig> {
    if !path.exists() {
        let config = AppConfig::new();
        save_app_config(path, &config)?;
        tracing::warn!(
            "Config file {} not found; wrote a default template",
            path.display()
        );
        return Ok(config);
    }

    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| AppError::Config(format!("failed to parse {}: {}", path.display(), e)))
}

pub fn save_app_config(path: &Path, config: &AppConfig) -> AppResult<()> {
    let content = serde_json::to_string_pretty(config)
        .map_err(|e| AppError::Config(format!("failed to serialize config: {}", e)))?;
    fs::write(path, content)?;
    Ok(())
}
