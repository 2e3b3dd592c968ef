/// Hook lifecycle phases.
///
/// The card platform calls into cardhook at three fixed points of a
/// transaction's life.
use std::fmt;
use std::str::FromStr;

use anyhow::bail;
use cardhook_core::{Authorization, Transaction};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Hook phases
// ---------------------------------------------------------------------------

/// The lifecycle phase at which a hook fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookPhase {
    /// Before the card is charged. Must stay short-running.
    BeforeTransaction,
    /// After the platform approved the transaction.
    AfterTransaction,
    /// After the platform declined the transaction.
    AfterDecline,
}

impl HookPhase {
    pub const ALL: [HookPhase; 3] = [Self::BeforeTransaction, Self::AfterTransaction, Self::AfterDecline];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BeforeTransaction => "before_transaction",
            Self::AfterTransaction => "after_transaction",
            Self::AfterDecline => "after_decline",
        }
    }
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts both `after_transaction` and `after-transaction`.
impl FromStr for HookPhase {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let normalized = s.trim().replace('-', "_");
        match Self::ALL.iter().find(|p| p.as_str() == normalized) {
            Some(phase) => Ok(*phase),
            None => bail!("unknown hook phase '{s}'"),
        }
    }
}

// ---------------------------------------------------------------------------
// Payload carried into each hook
// ---------------------------------------------------------------------------

/// Union payload type routed by [`crate::HookDispatcher::dispatch`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "record", rename_all = "snake_case")]
pub enum HookPayload {
    BeforeTransaction(Authorization),
    AfterTransaction(Transaction),
    AfterDecline(Transaction),
}

impl HookPayload {
    /// Wrap a raw record for the given phase.
    pub fn for_phase(phase: HookPhase, record: Value) -> Self {
        match phase {
            HookPhase::BeforeTransaction => Self::BeforeTransaction(Authorization::new(record)),
            HookPhase::AfterTransaction => Self::AfterTransaction(Transaction::new(record)),
            HookPhase::AfterDecline => Self::AfterDecline(Transaction::new(record)),
        }
    }

    pub fn phase(&self) -> HookPhase {
        match self {
            Self::BeforeTransaction(_) => HookPhase::BeforeTransaction,
            Self::AfterTransaction(_) => HookPhase::AfterTransaction,
            Self::AfterDecline(_) => HookPhase::AfterDecline,
        }
    }
}

// ---------------------------------------------------------------------------
// Hook outcome
// ---------------------------------------------------------------------------

/// What a dispatched hook produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "value", rename_all = "snake_case")]
pub enum HookOutcome {
    /// Pre-transaction verdict; `true` lets the charge proceed.
    Allowed(bool),
    /// Parsed webhook response for an approved transaction.
    Forwarded(Value),
    /// The event was logged and nothing else happened.
    Recorded,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn phase_parses_both_spellings() {
        assert_eq!("after-transaction".parse::<HookPhase>().unwrap(), HookPhase::AfterTransaction);
        assert_eq!("after_decline".parse::<HookPhase>().unwrap(), HookPhase::AfterDecline);
        assert!("refund".parse::<HookPhase>().is_err());
    }

    #[test]
    fn payload_round_trips_phase_tag() {
        let payload = HookPayload::for_phase(HookPhase::AfterDecline, json!({"id": "t1"}));
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value, json!({"phase": "after_decline", "record": {"id": "t1"}}));
        let back: HookPayload = serde_json::from_value(value).unwrap();
        assert_eq!(back.phase(), HookPhase::AfterDecline);
    }

    #[test]
    fn outcome_serializes_tagged() {
        assert_eq!(
            serde_json::to_value(HookOutcome::Allowed(true)).unwrap(),
            json!({"outcome": "allowed", "value": true})
        );
        assert_eq!(
            serde_json::to_value(HookOutcome::Recorded).unwrap(),
            json!({"outcome": "recorded"})
        );
    }
}
