/// Hook dispatcher.
///
/// The dispatcher is the public API surface the card platform calls into:
/// 1. Card swiped → `before_transaction(...)` → always allow
/// 2. Charge approved → `after_transaction(...)` → forward to the webhook
/// 3. Charge declined → `after_decline(...)` → log only
///
/// Entry points share nothing mutable; a dispatcher can be cloned freely and
/// called concurrently.
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use cardhook_config::WebhookConfig;
use cardhook_core::{Authorization, HookError, Transaction};
use cardhook_logging::{EventLogger, HookEvent};
use serde_json::Value;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::types::{HookOutcome, HookPayload, HookPhase};
use crate::webhook::{HttpWebhook, WebhookForwarder};

#[derive(Clone)]
pub struct HookDispatcher {
    forwarder: Option<Arc<dyn WebhookForwarder>>,
    timeout: Option<Duration>,
}

impl HookDispatcher {
    /// Build a dispatcher that forwards over HTTP using `config`.
    pub fn new(config: &WebhookConfig) -> Result<Self, HookError> {
        let forwarder = HttpWebhook::new(config)?;
        Ok(Self::with_forwarder(Arc::new(forwarder)).with_timeout(config.timeout()))
    }

    pub fn with_forwarder(forwarder: Arc<dyn WebhookForwarder>) -> Self {
        Self { forwarder: Some(forwarder), timeout: None }
    }

    /// A dispatcher without a webhook. The pre-authorization and decline
    /// hooks work as usual; approvals fail with `HookError::Config`.
    pub fn log_only() -> Self {
        Self { forwarder: None, timeout: None }
    }

    /// Bound every webhook call; `None` removes the bound.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Pre-authorization hook. Logs the authorization and never blocks it.
    pub async fn before_transaction(&self, authorization: &Authorization) -> bool {
        let invocation_id = Uuid::new_v4().to_string();
        let span = info_span!("hook", phase = %HookPhase::BeforeTransaction, %invocation_id);
        async {
            EventLogger::log_event(&invocation_id, HookEvent::authorization(authorization.as_value()));
            debug!("[Hooks] before_transaction allowed");
            true
        }
        .instrument(span)
        .await
    }

    /// Post-approval hook. Forwards the transaction to the webhook once and
    /// returns the parsed response. Failures propagate unchanged.
    pub async fn after_transaction(&self, transaction: &Transaction) -> Result<Value, HookError> {
        self.after_transaction_until(transaction, std::future::pending()).await
    }

    /// Like [`Self::after_transaction`], but gives up with
    /// `HookError::Cancelled` as soon as `cancel` completes.
    pub async fn after_transaction_until<F>(
        &self,
        transaction: &Transaction,
        cancel: F,
    ) -> Result<Value, HookError>
    where
        F: Future<Output = ()> + Send,
    {
        let invocation_id = Uuid::new_v4().to_string();
        let span = info_span!("hook", phase = %HookPhase::AfterTransaction, %invocation_id);
        async {
            let summary = transaction.summary();
            info!(
                reference = ?summary.reference,
                card_id = ?summary.card_id,
                cents_amount = ?summary.cents_amount,
                currency = ?summary.currency_code,
                merchant = ?summary.merchant_name,
                simulated = summary.is_simulated(),
                "Transaction approved"
            );
            EventLogger::log_event(&invocation_id, HookEvent::approved(transaction.as_value()));

            let result = tokio::select! {
                result = self.forward(transaction) => result,
                _ = cancel => Err(HookError::Cancelled("cancelled by caller".to_string())),
            };

            match &result {
                Ok(body) => {
                    EventLogger::log_event(&invocation_id, HookEvent::response(body));
                }
                Err(e) => {
                    warn!(error = %e, "Webhook call failed");
                    EventLogger::log_event(&invocation_id, HookEvent::failed(e));
                }
            }
            result
        }
        .instrument(span)
        .await
    }

    /// Post-decline hook. Logs the transaction; no outbound call.
    pub async fn after_decline(&self, transaction: &Transaction) {
        let invocation_id = Uuid::new_v4().to_string();
        let span = info_span!("hook", phase = %HookPhase::AfterDecline, %invocation_id);
        async {
            let summary = transaction.summary();
            info!(
                reference = ?summary.reference,
                card_id = ?summary.card_id,
                merchant = ?summary.merchant_name,
                simulated = summary.is_simulated(),
                "Transaction declined"
            );
            EventLogger::log_event(&invocation_id, HookEvent::declined(transaction.as_value()));
        }
        .instrument(span)
        .await
    }

    /// Route a decoded payload to the entry point for its phase.
    pub async fn dispatch(&self, payload: HookPayload) -> Result<HookOutcome, HookError> {
        debug!("[Hooks] dispatch phase={}", payload.phase());
        match payload {
            HookPayload::BeforeTransaction(authorization) => {
                Ok(HookOutcome::Allowed(self.before_transaction(&authorization).await))
            }
            HookPayload::AfterTransaction(transaction) => {
                self.after_transaction(&transaction).await.map(HookOutcome::Forwarded)
            }
            HookPayload::AfterDecline(transaction) => {
                self.after_decline(&transaction).await;
                Ok(HookOutcome::Recorded)
            }
        }
    }

    async fn forward(&self, transaction: &Transaction) -> Result<Value, HookError> {
        let Some(forwarder) = &self.forwarder else {
            return Err(HookError::Config("no webhook configured".to_string()));
        };
        debug!("[Hooks] forwarding via {}", forwarder.name());
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, forwarder.invoke_webhook(transaction))
                .await
                .map_err(|_| HookError::Cancelled(format!("no webhook response within {}ms", limit.as_millis())))?,
            None => forwarder.invoke_webhook(transaction).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Records every forwarded body and answers with a canned result.
    struct RecordingForwarder {
        calls: Mutex<Vec<Value>>,
        reply: fn() -> Result<Value, HookError>,
        delay: Duration,
    }

    impl RecordingForwarder {
        fn replying(reply: fn() -> Result<Value, HookError>) -> Arc<Self> {
            Arc::new(Self { calls: Mutex::new(Vec::new()), reply, delay: Duration::ZERO })
        }

        fn slow(delay: Duration) -> Arc<Self> {
            Arc::new(Self { calls: Mutex::new(Vec::new()), reply: || Ok(json!({"ok": true})), delay })
        }

        fn calls(&self) -> Vec<Value> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl WebhookForwarder for RecordingForwarder {
        fn name(&self) -> &str {
            "recording"
        }

        async fn invoke_webhook(&self, transaction: &Transaction) -> Result<Value, HookError> {
            self.calls.lock().unwrap().push(transaction.as_value().clone());
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            (self.reply)()
        }
    }

    #[tokio::test]
    async fn before_transaction_always_allows() {
        let forwarder = RecordingForwarder::replying(|| Ok(json!({})));
        let dispatcher = HookDispatcher::with_forwarder(forwarder.clone());

        for auth in [json!({"centsAmount": 100}), json!(null), json!([1, 2]), json!("x")] {
            assert!(dispatcher.before_transaction(&Authorization::new(auth)).await);
        }
        assert!(forwarder.calls().is_empty());
    }

    #[tokio::test]
    async fn after_decline_never_forwards() {
        let forwarder = RecordingForwarder::replying(|| Ok(json!({})));
        let dispatcher = HookDispatcher::with_forwarder(forwarder.clone());

        dispatcher.after_decline(&Transaction::new(json!({"id": "t1", "amount": 500}))).await;
        assert!(forwarder.calls().is_empty());
    }

    #[tokio::test]
    async fn after_transaction_forwards_once_and_returns_response() {
        let forwarder = RecordingForwarder::replying(|| Ok(json!({"received": true})));
        let dispatcher = HookDispatcher::with_forwarder(forwarder.clone());

        let tx = Transaction::new(json!({"id": "t1", "amount": 500}));
        let response = dispatcher.after_transaction(&tx).await.unwrap();

        assert_eq!(response, json!({"received": true}));
        assert_eq!(forwarder.calls(), vec![json!({"id": "t1", "amount": 500})]);
    }

    #[tokio::test]
    async fn forwarder_errors_propagate_without_retry() {
        let forwarder = RecordingForwarder::replying(|| Err(HookError::Webhook("status 500".into())));
        let dispatcher = HookDispatcher::with_forwarder(forwarder.clone());

        let err = dispatcher
            .after_transaction(&Transaction::new(json!({"id": "t1"})))
            .await
            .unwrap_err();
        assert!(matches!(err, HookError::Webhook(_)));
        assert_eq!(forwarder.calls().len(), 1);
    }

    #[tokio::test]
    async fn timeout_surfaces_as_cancelled() {
        let forwarder = RecordingForwarder::slow(Duration::from_secs(5));
        let dispatcher = HookDispatcher::with_forwarder(forwarder)
            .with_timeout(Some(Duration::from_millis(20)));

        let err = dispatcher
            .after_transaction(&Transaction::new(json!({"id": "t1"})))
            .await
            .unwrap_err();
        assert!(err.is_cancelled(), "unexpected error: {err:?}");
    }

    #[tokio::test]
    async fn caller_cancellation_surfaces_as_cancelled() {
        let forwarder = RecordingForwarder::slow(Duration::from_secs(5));
        let dispatcher = HookDispatcher::with_forwarder(forwarder);

        let err = dispatcher
            .after_transaction_until(
                &Transaction::new(json!({"id": "t1"})),
                tokio::time::sleep(Duration::from_millis(20)),
            )
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn dispatch_routes_by_phase() {
        let forwarder = RecordingForwarder::replying(|| Ok(json!({"status": "stored"})));
        let dispatcher = HookDispatcher::with_forwarder(forwarder.clone());

        let before = dispatcher
            .dispatch(HookPayload::for_phase(HookPhase::BeforeTransaction, json!({})))
            .await
            .unwrap();
        assert_eq!(before, HookOutcome::Allowed(true));

        let declined = dispatcher
            .dispatch(HookPayload::for_phase(HookPhase::AfterDecline, json!({"id": "t2"})))
            .await
            .unwrap();
        assert_eq!(declined, HookOutcome::Recorded);
        assert!(forwarder.calls().is_empty());

        let approved = dispatcher
            .dispatch(HookPayload::for_phase(HookPhase::AfterTransaction, json!({"id": "t3"})))
            .await
            .unwrap();
        assert_eq!(approved, HookOutcome::Forwarded(json!({"status": "stored"})));
        assert_eq!(forwarder.calls().len(), 1);
    }

    #[tokio::test]
    async fn log_only_dispatcher_rejects_approvals() {
        let dispatcher = HookDispatcher::log_only();
        assert!(dispatcher.before_transaction(&Authorization::new(json!({}))).await);
        dispatcher.after_decline(&Transaction::new(json!({"id": "t1"}))).await;

        let err = dispatcher
            .after_transaction(&Transaction::new(json!({"id": "t1"})))
            .await
            .unwrap_err();
        assert!(matches!(err, HookError::Config(_)));
    }

    #[test]
    fn new_takes_timeout_from_config() {
        let config = WebhookConfig::new("https://hooks.example.com/tx", "k123")
            .with_timeout(Duration::from_millis(750));
        let dispatcher = HookDispatcher::new(&config).unwrap();
        assert_eq!(dispatcher.timeout(), Some(Duration::from_millis(750)));
    }
}
