//! Loading [`WebhookConfig`] from the process environment.
//!
//! Variable names match the card platform's environment:
//! `webhook_endpoint`, `webhook_api_key` and the optional
//! `webhook_timeout_ms`.

use std::collections::HashMap;

use thiserror::Error;

use crate::schema::WebhookConfig;

pub const ENDPOINT_VAR: &str = "webhook_endpoint";
pub const API_KEY_VAR: &str = "webhook_api_key";
pub const TIMEOUT_VAR: &str = "webhook_timeout_ms";

/// Error returned when the environment cannot produce a config.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("missing env var \"{var_name}\"")]
    Missing { var_name: &'static str },

    #[error("invalid value {value:?} for env var \"{var_name}\": {reason}")]
    Invalid {
        var_name: &'static str,
        value: String,
        reason: String,
    },
}

impl WebhookConfig {
    /// Read the config from the process environment.
    pub fn from_env() -> Result<Self, EnvError> {
        Self::from_env_with(&std::env::vars().collect())
    }

    /// Read the config from a provided map (useful for testing).
    pub fn from_env_with(env: &HashMap<String, String>) -> Result<Self, EnvError> {
        let endpoint = required(env, ENDPOINT_VAR)?;
        let api_key = required(env, API_KEY_VAR)?;
        let timeout_ms = match env.get(TIMEOUT_VAR).map(|v| v.trim()) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<u64>().map_err(|e| EnvError::Invalid {
                var_name: TIMEOUT_VAR,
                value: raw.to_string(),
                reason: e.to_string(),
            })?),
        };

        Ok(Self {
            endpoint,
            api_key,
            timeout_ms,
        })
    }
}

fn required(env: &HashMap<String, String>, var_name: &'static str) -> Result<String, EnvError> {
    match env.get(var_name) {
        // Whitespace-only counts as unset; anything else is used verbatim
        Some(val) if !val.trim().is_empty() => Ok(val.clone()),
        _ => Err(EnvError::Missing { var_name }),
    }
}
