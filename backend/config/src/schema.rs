//! Typed webhook configuration.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::redact::redact_secret;

/// Destination and credentials for the approved-transaction webhook.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookConfig {
    /// Destination URL the transaction is POSTed to.
    pub endpoint: String,
    /// Secret sent in the `X-API-Key` header.
    pub api_key: String,
    /// Upper bound on a single webhook call. `None` leaves the call unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl WebhookConfig {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            timeout_ms: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Endpoint safe for logs and error messages: userinfo is stripped.
    pub fn redacted_endpoint(&self) -> String {
        match Url::parse(&self.endpoint) {
            Ok(mut url) => {
                // Fails only for URLs that cannot carry credentials anyway
                let _ = url.set_password(None);
                let _ = url.set_username("");
                url.to_string()
            }
            Err(_) => "<invalid url>".to_string(),
        }
    }
}

// Never print the key in full; configs end up in logs.
impl fmt::Debug for WebhookConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookConfig")
            .field("endpoint", &self.redacted_endpoint())
            .field("api_key", &redact_secret(&self.api_key))
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}
