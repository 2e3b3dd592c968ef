use std::path::PathBuf;

use cardhook_logging::{LogFormat, LogSettings};

/// Runtime settings for the `cardhook` binary. Webhook settings live in
/// `cardhook_config::WebhookConfig`.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server bind address
    pub bind_address: String,
    /// HTTP server port
    pub port: u16,
    /// Log level
    pub log_level: String,
    pub log_format: LogFormat,
    /// Directory for rolling log files
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            log_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_address: std::env::var("CARDHOOK_BIND").unwrap_or(defaults.bind_address),
            port: std::env::var("CARDHOOK_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: std::env::var("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: std::env::var("CARDHOOK_LOG_FORMAT")
                .ok()
                .and_then(|f| f.parse().ok())
                .unwrap_or(defaults.log_format),
            log_dir: std::env::var("CARDHOOK_LOG_DIR").ok().map(PathBuf::from),
        }
    }

    pub fn log_settings(&self) -> LogSettings {
        LogSettings {
            level: self.log_level.clone(),
            format: self.log_format,
            directory: self.log_dir.clone(),
        }
    }
}
