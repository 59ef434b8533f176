//! Host configuration management.
//!
//! Loads the host settings from a TOML file, creating a default file when
//! none exists, and validates them before the plugin starts.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

fn default_purge_interval_secs() -> u64 {
    60
}

fn default_starting_balance() -> f64 {
    0.0
}

/// Application configuration loaded from TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging configuration settings
    pub logging: LoggingSettings,
    /// Plugin configuration settings
    pub plugin: PluginSettings,
    /// In-memory economy settings
    #[serde(default)]
    pub economy: EconomySettings,
    /// Limiter maintenance settings
    #[serde(default)]
    pub maintenance: MaintenanceSettings,
}

/// Logging system configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level filter (trace, debug, info, warn, error)
    pub level: String,
    /// Whether to output logs in JSON format
    pub json_format: bool,
}

/// Plugin configuration location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginSettings {
    /// Path of the plugin's own configuration file
    pub config_path: String,
}

/// Settings for the in-memory economy provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconomySettings {
    /// Whether an economy provider is attached to the plugin
    pub enabled: bool,
    /// Balance a player's account opens with
    #[serde(default = "default_starting_balance")]
    pub starting_balance: f64,
}

impl Default for EconomySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            starting_balance: default_starting_balance(),
        }
    }
}

/// Periodic limiter record garbage collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceSettings {
    /// Seconds between purges of expired limiter records
    #[serde(default = "default_purge_interval_secs")]
    pub purge_interval_secs: u64,
}

impl Default for MaintenanceSettings {
    fn default() -> Self {
        Self {
            purge_interval_secs: default_purge_interval_secs(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: LoggingSettings {
                level: "info".to_string(),
                json_format: false,
            },
            plugin: PluginSettings {
                config_path: "rewardable_activities.toml".to_string(),
            },
            economy: EconomySettings::default(),
            maintenance: MaintenanceSettings::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    ///
    /// If the file doesn't exist, creates a default configuration file at the
    /// specified path and returns the default configuration.
    pub async fn load_from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if path.exists() {
            let content = tokio::fs::read_to_string(path).await?;
            let config: AppConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            let default_config = AppConfig::default();
            let toml_content = toml::to_string_pretty(&default_config)?;
            tokio::fs::write(path, toml_content).await?;
            info!("Created default configuration file: {}", path.display());
            Ok(default_config)
        }
    }

    /// Path of the plugin configuration file.
    pub fn plugin_config_path(&self) -> PathBuf {
        PathBuf::from(&self.plugin.config_path)
    }

    /// Validates the configuration for consistency and correctness.
    pub fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(format!(
                "Invalid log level: {}. Must be one of: {valid_levels:?}",
                &self.logging.level
            ));
        }

        if self.plugin.config_path.trim().is_empty() {
            return Err("Plugin config path cannot be empty".to_string());
        }

        if !self.economy.starting_balance.is_finite() || self.economy.starting_balance < 0.0 {
            return Err(format!(
                "Invalid starting balance: {}",
                self.economy.starting_balance
            ));
        }

        if self.maintenance.purge_interval_secs == 0 {
            return Err("maintenance.purge_interval_secs must be greater than 0".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();

        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json_format);
        assert_eq!(config.plugin.config_path, "rewardable_activities.toml");
        assert!(config.economy.enabled);
        assert_eq!(config.maintenance.purge_interval_secs, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_failures() {
        let mut config = AppConfig::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.plugin.config_path = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.economy.starting_balance = -1.0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.maintenance.purge_interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[tokio::test]
    async fn test_load_from_nonexistent_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("host.toml");

        let config = AppConfig::load_from_file(&path).await.unwrap();
        assert_eq!(config.logging.level, "info");
        assert!(path.exists());

        let written = tokio::fs::read_to_string(&path).await.unwrap();
        let reparsed: AppConfig = toml::from_str(&written).unwrap();
        assert_eq!(reparsed.plugin.config_path, config.plugin.config_path);
    }

    #[tokio::test]
    async fn test_load_from_existing_file() {
        let toml_content = r#"
[logging]
level = "debug"
json_format = true

[plugin]
config_path = "/etc/rewards.toml"

[economy]
enabled = false
"#;
        let file = tempfile::NamedTempFile::new().unwrap();
        tokio::fs::write(file.path(), toml_content).await.unwrap();

        let config = AppConfig::load_from_file(file.path()).await.unwrap();
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json_format);
        assert_eq!(config.plugin_config_path(), PathBuf::from("/etc/rewards.toml"));
        assert!(!config.economy.enabled);
        assert_eq!(config.economy.starting_balance, 0.0);
        assert_eq!(config.maintenance.purge_interval_secs, 60);
    }

    #[tokio::test]
    async fn test_load_rejects_invalid_toml() {
        let file = tempfile::NamedTempFile::new().unwrap();
        tokio::fs::write(file.path(), "[logging\nlevel = ").await.unwrap();

        assert!(AppConfig::load_from_file(file.path()).await.is_err());
    }
}
