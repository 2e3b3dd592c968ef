//! Masking of secrets before configuration is displayed or logged.

use serde_json::Value;

/// Keys whose string values are treated as secrets.
static SECRET_KEYS: &[&str] = &[
    "apiKey",
    "api_key",
    "apikey",
    "webhook_api_key",
    "x-api-key",
    "token",
    "secret",
    "password",
];

/// Mask a secret, keeping a short prefix as a hint.
pub fn redact_secret(secret: &str) -> String {
    if secret.chars().count() > 8 {
        format!("{}***", secret.chars().take(4).collect::<String>())
    } else {
        "***".to_string()
    }
}

/// Redact a config JSON value, replacing sensitive fields with masked hints.
pub fn redact(value: &Value) -> Value {
    redact_recursive(value, "")
}

fn is_sensitive_key(key: &str) -> bool {
    SECRET_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

fn redact_recursive(value: &Value, key: &str) -> Value {
    match value {
        Value::String(s) if is_sensitive_key(key) && !s.is_empty() => {
            Value::String(redact_secret(s))
        }
        Value::Array(arr) => Value::Array(arr.iter().map(|v| redact_recursive(v, key)).collect()),
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                result.insert(k.clone(), redact_recursive(v, k));
            }
            Value::Object(result)
        }
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn short_secrets_are_fully_masked() {
        assert_eq!(redact_secret("k123"), "***");
        assert_eq!(redact_secret(""), "***");
    }

    #[test]
    fn long_secrets_keep_a_hint() {
        assert_eq!(redact_secret("abcd-1234-efgh"), "abcd***");
    }

    #[test]
    fn redacts_api_key_field() {
        let v = json!({"endpoint": "https://hooks.example.com/tx", "apiKey": "k123-secret-value"});
        let redacted = redact(&v);
        assert_eq!(redacted["endpoint"], "https://hooks.example.com/tx");
        assert_eq!(redacted["apiKey"], "k123***");
    }
}
