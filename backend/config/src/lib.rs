//! `cardhook-config`: webhook configuration for the card hooks.
//!
//! Provides:
//! - Typed `WebhookConfig` (endpoint, API key, optional timeout)
//! - Loading from the process environment
//! - Validation with warnings for risky-but-usable settings
//! - Secret redaction for safe logging/display

pub mod env;
pub mod redact;
pub mod schema;
pub mod validation;

pub use env::{EnvError, API_KEY_VAR, ENDPOINT_VAR, TIMEOUT_VAR};
pub use redact::{redact, redact_secret};
pub use schema::WebhookConfig;
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use std::collections::HashMap;

/// Load and validate the webhook config from the process environment.
///
/// This is the main entry point for loading a config at runtime.
pub fn load_from_env() -> Result<WebhookConfig> {
    load_from_env_with(&std::env::vars().collect())
}

/// Same as [`load_from_env`] with an explicit variable map.
pub fn load_from_env_with(env: &HashMap<String, String>) -> Result<WebhookConfig> {
    let config = WebhookConfig::from_env_with(env).context("Failed to read webhook config")?;

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if !report.is_valid() {
        bail!(
            "Invalid webhook config: {}",
            report
                .errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ")
        );
    }

    Ok(config)
}
