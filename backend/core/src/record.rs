//! Records handed to the hooks by the card platform.
//!
//! Both records are opaque: the hooks never validate their shape, they only
//! log them and (for approved transactions) forward them unchanged.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reference the card platform stamps on simulated transactions.
pub const SIMULATION_REFERENCE: &str = "simulation";

/// Pre-charge record presented to the pre-transaction hook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Authorization(Value);

impl Authorization {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for Authorization {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl fmt::Display for Authorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Finalized (approved or declined) charge record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transaction(Value);

impl Transaction {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// JSON body forwarded to the webhook. Key order follows the input.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.0)
    }

    pub fn summary(&self) -> TransactionSummary {
        TransactionSummary::from_value(&self.0)
    }
}

impl From<Value> for Transaction {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Best-effort projection of the well-known card transaction fields, used
/// for structured log fields. Missing or oddly typed fields become `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransactionSummary {
    pub reference: Option<String>,
    pub card_id: Option<String>,
    pub account_number: Option<String>,
    pub cents_amount: Option<i64>,
    pub currency_code: Option<String>,
    pub merchant_name: Option<String>,
    pub date_time: Option<String>,
    pub kind: Option<String>,
}

impl TransactionSummary {
    pub fn from_value(value: &Value) -> Self {
        Self {
            reference: text_at(value, &["reference"]),
            card_id: text_at(value, &["card", "id"]),
            account_number: text_at(value, &["accountNumber"]),
            cents_amount: integer_at(value, &["centsAmount"]),
            currency_code: text_at(value, &["currencyCode"]).map(|c| c.to_uppercase()),
            merchant_name: text_at(value, &["merchant", "name"]),
            date_time: text_at(value, &["dateTime"]),
            kind: text_at(value, &["type"]),
        }
    }

    pub fn is_simulated(&self) -> bool {
        self.reference.as_deref() == Some(SIMULATION_REFERENCE)
    }
}

fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, key| current.get(key))
}

/// Strings come back as-is; numbers are rendered so numeric card ids still show up.
fn text_at(value: &Value, path: &[&str]) -> Option<String> {
    match lookup(value, path)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn integer_at(value: &Value, path: &[&str]) -> Option<i64> {
    match lookup(value, path)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
