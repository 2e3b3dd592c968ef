//! Structured logging for cardhook.
//!
//! Handles subscriber setup (console + optional rolling NDJSON file), secret
//! redaction, and the hook event log that records every hook input/output.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{EventLogEntry, EventLogger, HookEvent};
pub use logger::{LogFormat, LogSettings, init_logger};
pub use redact::redact_sensitive_data;
