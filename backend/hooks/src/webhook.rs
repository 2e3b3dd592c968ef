/// Webhook forwarding.
///
/// Approved transactions are POSTed verbatim to a third-party endpoint. The
/// call is made exactly once; there is no retry, and every failure mode
/// (transport, non-2xx status, malformed body) collapses into
/// `HookError::Webhook`.
use async_trait::async_trait;
use cardhook_config::WebhookConfig;
use cardhook_core::{HookError, Transaction};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tracing::debug;

/// Header carrying the static webhook secret.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Longest slice of an error response body copied into the error message.
const ERROR_BODY_PREVIEW: usize = 256;

// ---------------------------------------------------------------------------
// Forwarder trait
// ---------------------------------------------------------------------------

/// Something that can deliver an approved transaction to the webhook.
#[async_trait]
pub trait WebhookForwarder: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Deliver the transaction and return the parsed response body.
    async fn invoke_webhook(&self, transaction: &Transaction) -> Result<Value, HookError>;
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

pub struct HttpWebhook {
    client: Client,
    endpoint: String,
    /// `endpoint` with userinfo stripped; the only form that reaches logs.
    display_endpoint: String,
    api_key: String,
}

impl HttpWebhook {
    pub fn new(config: &WebhookConfig) -> Result<Self, HookError> {
        let client = Client::builder()
            .build()
            .map_err(|e| HookError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(client, config))
    }

    /// Reuse an existing client (connection pool shared with the caller).
    pub fn with_client(client: Client, config: &WebhookConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
            display_endpoint: config.redacted_endpoint(),
            api_key: config.api_key.clone(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.display_endpoint
    }
}

#[async_trait]
impl WebhookForwarder for HttpWebhook {
    fn name(&self) -> &str {
        "http_webhook"
    }

    async fn invoke_webhook(&self, transaction: &Transaction) -> Result<Value, HookError> {
        let body = transaction.to_json()?;
        debug!("[Webhook] POST {} ({} bytes)", self.display_endpoint, body.len());

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, &self.api_key)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                HookError::Webhook(format!(
                    "request to {} failed: {}",
                    self.display_endpoint,
                    e.without_url()
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let preview: String = text.chars().take(ERROR_BODY_PREVIEW).collect();
            return Err(HookError::Webhook(format!(
                "{} returned status {status}: {preview}",
                self.display_endpoint
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| {
                HookError::Webhook(format!(
                    "malformed response body from {}: {}",
                    self.display_endpoint,
                    e.without_url()
                ))
            })
    }
}
