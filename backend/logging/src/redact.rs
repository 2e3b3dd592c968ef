//! Log Redaction Layer
//!
//! Scrubs API keys, bearer tokens and card numbers from strings prior to logging.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static CARD_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(?:\d[ -]?){12,18}\d\b").unwrap());
static BEARER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Bearer\s+[a-zA-Z0-9\-\._~+/]+=*").unwrap());
static API_KEY_FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)("?(?:x-api-key|api_key|apikey|webhook_api_key)"?\s*[:=]\s*"?)[^"\s,}]+"#).unwrap()
});

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    // Only digit runs that pass the Luhn check are card numbers; timestamps
    // and long account references stay readable.
    let mut redacted = CARD_NUMBER_RE
        .replace_all(input, |caps: &Captures| {
            let matched = &caps[0];
            if passes_luhn(matched) {
                "[REDACTED_PAN]".to_string()
            } else {
                matched.to_string()
            }
        })
        .to_string();

    redacted = BEARER_RE.replace_all(&redacted, "[REDACTED_TOKEN]").to_string();

    // Keep the field name, drop the value
    redacted = API_KEY_FIELD_RE
        .replace_all(&redacted, "${1}[REDACTED_TOKEN]")
        .to_string();

    redacted
}

/// Luhn checksum over the digits of `candidate`, ignoring separators.
fn passes_luhn(candidate: &str) -> bool {
    let mut sum = 0;
    for (i, digit) in candidate
        .chars()
        .rev()
        .filter_map(|c| c.to_digit(10))
        .enumerate()
    {
        sum += if i % 2 == 1 {
            let doubled = digit * 2;
            if doubled > 9 { doubled - 9 } else { doubled }
        } else {
            digit
        };
    }
    sum % 10 == 0
}
