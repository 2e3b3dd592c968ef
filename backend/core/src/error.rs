use thiserror::Error;

/// Top-level error type for hook execution.
#[derive(Debug, Error)]
pub enum HookError {
    /// Any failure of the outbound webhook call: transport error, non-2xx
    /// status or a response body that is not JSON.
    #[error("webhook call failed: {0}")]
    Webhook(String),

    #[error("webhook call cancelled: {0}")]
    Cancelled(String),

    #[error("failed to serialize payload: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HookError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }
}
