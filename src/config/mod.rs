//! Configuration management for framebox
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Usage
//!
//! ```no_run
//! use framebox::config::Config;
//!
//! let config = Config::load().expect("Failed to load configuration");
//! println!("Server listening on: {}", config.server.bind_addr);
//! ```
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `FRAMEBOX__<section>__<key>`
//!
//! Examples:
//! - `FRAMEBOX__SERVER__BIND_ADDR=0.0.0.0:9000`
//! - `FRAMEBOX__PANEL__HOST_ORIGIN=https://panel.example.com`
//! - `FRAMEBOX__SEARCH__DEBOUNCE_MS=200`
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/framebox.toml`.
//! This can be overridden using the `FRAMEBOX_CONFIG` environment variable.

mod models;
mod sources;
mod validation;

// Re-export public types
pub use models::{Config, PanelConfig, SearchConfig, ServerConfig};
pub use validation::ValidationError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables (`FRAMEBOX__*`)
    /// 2. TOML file (default: `config/framebox.toml`)
    /// 3. Default values
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration file is malformed
    /// - Validation fails (bad host origin, zero timeouts, etc.)
    pub fn load() -> Result<Self, ConfigError> {
        let config = sources::load()?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific path
    ///
    /// Useful for testing with custom configuration files.
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_minimal_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[panel]
host_origin = "https://host.app"
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = Config::load_from_path(config_path).unwrap();
        assert_eq!(config.panel.host_origin, "https://host.app");
        assert_eq!(config.panel.load_timeout_ms, 5000);
    }

    #[test]
    fn test_validation_catches_bad_origin() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[panel]
host_origin = "data:text/html,hi"
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let result = Config::load_from_path(config_path);
        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::ValidationError(ValidationError::InvalidHostOrigin { .. })
        ));
    }

    #[test]
    fn test_full_config_example() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[server]
bind_addr = "0.0.0.0:8080"
store_path = "data/settings"
max_import_bytes = 1048576

[panel]
host_origin = "https://panel.example.com"
load_timeout_ms = 5000
retry_delay_ms = 100

[search]
endpoint = "https://nominatim.openstreetmap.org"
debounce_ms = 300
min_query_len = 2
max_results = 5
user_agent = "framebox/0.1.0"
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = Config::load_from_path(config_path).unwrap();

        // Verify all sections loaded correctly
        assert_eq!(config.server.bind_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(config.panel.host_origin, "https://panel.example.com");
        assert_eq!(config.search.max_results, 5);
        assert_eq!(config.search.user_agent, "framebox/0.1.0");
    }
}
