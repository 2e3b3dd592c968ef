//! Hook Event Logger
//!
//! Every hook input and webhook response is recorded as a structured event on
//! the `hook_events` target, after redaction.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::redact::redact_sensitive_data;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HookEvent {
    AuthorizationReceived { payload: String },
    TransactionApproved { payload: String },
    TransactionDeclined { payload: String },
    WebhookResponse { body: String },
    WebhookFailed { error_msg: String },
}

impl HookEvent {
    pub fn authorization(payload: &Value) -> Self {
        Self::AuthorizationReceived { payload: payload.to_string() }
    }

    pub fn approved(payload: &Value) -> Self {
        Self::TransactionApproved { payload: payload.to_string() }
    }

    pub fn declined(payload: &Value) -> Self {
        Self::TransactionDeclined { payload: payload.to_string() }
    }

    pub fn response(body: &Value) -> Self {
        Self::WebhookResponse { body: body.to_string() }
    }

    pub fn failed(error: impl ToString) -> Self {
        Self::WebhookFailed { error_msg: error.to_string() }
    }

    fn redact(&mut self) {
        match self {
            Self::AuthorizationReceived { payload }
            | Self::TransactionApproved { payload }
            | Self::TransactionDeclined { payload } => {
                *payload = redact_sensitive_data(payload);
            }
            Self::WebhookResponse { body } => {
                *body = redact_sensitive_data(body);
            }
            Self::WebhookFailed { error_msg } => {
                *error_msg = redact_sensitive_data(error_msg);
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub invocation_id: String,
    pub timestamp: DateTime<Utc>,
    pub event: HookEvent,
}

pub struct EventLogger;

impl EventLogger {
    /// Redact the event and emit it through `tracing`. Returns the entry as logged.
    pub fn log_event(invocation_id: &str, mut event: HookEvent) -> EventLogEntry {
        event.redact();

        let entry = EventLogEntry {
            invocation_id: invocation_id.into(),
            timestamp: Utc::now(),
            event,
        };

        match serde_json::to_string(&entry) {
            Ok(json) => info!(target: "hook_events", invocation_id, entry = %json, "Hook event"),
            Err(_) => info!(target: "hook_events", invocation_id, entry = ?entry, "Hook event"),
        }
        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn logged_payload_is_redacted() {
        let payload = json!({"card": {"number": "4111111111111111"}, "merchant": "Shop"});
        let entry = EventLogger::log_event("inv-1", HookEvent::authorization(&payload));
        let HookEvent::AuthorizationReceived { payload } = &entry.event else {
            panic!("unexpected event {:?}", entry.event);
        };
        assert!(!payload.contains("4111111111111111"));
        assert!(payload.contains("Shop"));
        assert_eq!(entry.invocation_id, "inv-1");
    }

    #[test]
    fn serializes_with_type_tag() {
        let entry = EventLogEntry {
            invocation_id: "inv-2".into(),
            timestamp: Utc::now(),
            event: HookEvent::declined(&json!({"id": "t1"})),
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["event"]["type"], "transaction_declined");
        assert_eq!(value["event"]["payload"], r#"{"id":"t1"}"#);
    }
}
