pub mod dispatcher;
pub mod types;
pub mod webhook;

pub use dispatcher::HookDispatcher;
pub use types::{HookOutcome, HookPayload, HookPhase};
pub use webhook::{HttpWebhook, WebhookForwarder, API_KEY_HEADER};
