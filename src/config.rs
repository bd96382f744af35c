//! Environment-based configuration module
//!
//! Configuration is resolved from, in order of priority:
//! 1. Environment variables
//! 2. Default values
//!
//! Development defaults point at a local API and log verbosely; production
//! expects a real API base URL and logs JSON at warn level.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::env;

/// Application environment mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }

    /// Get environment from APP_ENV variable or default to Development
    pub fn from_env() -> Self {
        match env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()).as_str() {
            "production" => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        *self == Environment::Production
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Environment mode
    pub environment: Environment,

    /// Application name
    pub app_name: String,

    /// Application version
    pub version: String,

    /// REST API configuration
    pub api: ApiConfig,

    /// Auth snapshot configuration
    pub auth: AuthConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// REST API client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the MyAppleCare API
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,

    /// Maximum results requested from the server search endpoint
    pub search_limit: u32,

    /// Page size used by paginated listings
    pub page_size: u32,
}

/// Auth snapshot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Snapshot file name under the app data directory (the fixed storage key)
    pub snapshot_file: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    pub level: String,

    /// Log to file
    pub log_to_file: bool,

    /// Log to stdout
    pub log_to_stdout: bool,

    /// Use JSON format (true for production)
    pub json_format: bool,

    /// Maximum log file size in MB
    pub max_file_size_mb: u64,

    /// Maximum number of log files to keep
    pub max_log_files: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        let environment = Environment::from_env();

        Self {
            environment,
            app_name: env::var("APP_NAME").unwrap_or_else(|_| "MyAppleCare".to_string()),
            version: env!("CARGO_PKG_VERSION").to_string(),

            api: ApiConfig {
                base_url: env::var("API_BASE_URL")
                    .unwrap_or_else(|_| "http://localhost:8000/api".to_string()),
                timeout_secs: env::var("API_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(15),
                connect_timeout_secs: 10,
                search_limit: 100,
                page_size: 20,
            },

            auth: AuthConfig {
                snapshot_file: "auth.json".to_string(),
            },

            logging: LoggingConfig {
                level: env::var("RUST_LOG").unwrap_or_else(|_| {
                    if environment.is_production() { "warn".to_string() } else { "debug".to_string() }
                }),
                log_to_file: true,
                log_to_stdout: env::var("LOG_TO_STDOUT")
                    .map(|s| s == "true")
                    .unwrap_or(true),
                json_format: environment.is_production(),
                max_file_size_mb: 10,
                max_log_files: 5,
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from environment and defaults
    pub fn load() -> Self {
        Self::default()
    }

    /// Get the auth snapshot path
    pub fn get_auth_snapshot_path(&self, app_data_dir: &Path) -> PathBuf {
        app_data_dir.join(&self.auth.snapshot_file)
    }

    pub fn is_production(&self) -> bool {
        self.environment.is_production()
    }

    /// Validate configuration for production
    pub fn validate(&self) -> Result<(), String> {
        if self.is_production() && self.api.base_url.contains("localhost") {
            return Err(
                "API_BASE_URL must point at the production API when APP_ENV=production".to_string(),
            );
        }

        if self.api.timeout_secs == 0 {
            return Err("API_TIMEOUT_SECS must be greater than zero".to_string());
        }

        Ok(())
    }
}

/// Global configuration instance
static GLOBAL_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Initialize the global configuration
pub fn init_config() -> &'static AppConfig {
    GLOBAL_CONFIG.get_or_init(AppConfig::load)
}

/// Get the global configuration
pub fn get_config() -> &'static AppConfig {
    GLOBAL_CONFIG.get().expect("Configuration not initialized. Call init_config() first.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid_in_development() {
        let config = AppConfig::default();
        if !config.is_production() {
            assert!(config.validate().is_ok());
        }
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut config = AppConfig::default();
        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
