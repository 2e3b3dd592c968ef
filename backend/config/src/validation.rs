//! Config validation with field paths in every message.

use crate::schema::WebhookConfig;
use thiserror::Error;
use url::Url;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &WebhookConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_endpoint(config, &mut report);
    validate_api_key(config, &mut report);
    validate_timeout(config, &mut report);
    report
}

fn validate_endpoint(config: &WebhookConfig, report: &mut ValidationReport) {
    if config.endpoint.trim().is_empty() {
        report.error("endpoint", "Webhook endpoint cannot be empty");
        return;
    }
    let url = match Url::parse(&config.endpoint) {
        Ok(url) => url,
        Err(e) => {
            report.error("endpoint", format!("Invalid webhook URL: {e}"));
            return;
        }
    };
    match url.scheme() {
        "https" => {}
        "http" => {
            report.warn("endpoint", "Webhook endpoint is plain http; the API key is sent unencrypted");
        }
        other => {
            report.error("endpoint", format!("Unsupported URL scheme '{other}', expected http(s)"));
            return;
        }
    }
    if !url.host_str().is_some_and(|host| !host.is_empty()) {
        report.error("endpoint", "Webhook endpoint has no host");
    }
}

fn validate_api_key(config: &WebhookConfig, report: &mut ValidationReport) {
    if config.api_key.trim().is_empty() {
        report.error("apiKey", "API key cannot be empty");
    } else if config.api_key.contains(['\r', '\n']) {
        report.error("apiKey", "API key cannot contain line breaks");
    }
}

fn validate_timeout(config: &WebhookConfig, report: &mut ValidationReport) {
    if config.timeout_ms == Some(0) {
        report.error("timeoutMs", "Timeout must be greater than zero");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn https_endpoint_is_valid() {
        let report = validate(&WebhookConfig::new("https://hooks.example.com/tx", "k123"));
        assert!(report.is_valid());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn plain_http_warns() {
        let report = validate(&WebhookConfig::new("http://127.0.0.1:9000/tx", "k123"));
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].path, "endpoint");
    }

    #[test]
    fn scheme_is_case_insensitive() {
        let report = validate(&WebhookConfig::new("HTTPS://hooks.example.com/tx", "k123"));
        assert!(report.is_valid(), "errors: {:?}", report.errors);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn rejects_other_schemes() {
        let report = validate(&WebhookConfig::new("ftp://hooks.example.com", "k123"));
        assert!(!report.is_valid());
        assert!(report.errors[0].message.contains("ftp"));
    }

    #[test]
    fn rejects_missing_host() {
        let report = validate(&WebhookConfig::new("https://:443/tx", "k123"));
        assert!(!report.is_valid());
        assert_eq!(report.errors[0].path, "endpoint");
    }

    #[test]
    fn rejects_relative_urls() {
        let report = validate(&WebhookConfig::new("hooks.example.com/tx", "k123"));
        assert!(!report.is_valid());
        assert!(report.errors[0].message.starts_with("Invalid webhook URL"));
    }

    #[test]
    fn rejects_blank_key_and_zero_timeout() {
        let config = WebhookConfig {
            endpoint: "https://hooks.example.com/tx".into(),
            api_key: " ".into(),
            timeout_ms: Some(0),
        };
        let report = validate(&config);
        let paths: Vec<_> = report.errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["apiKey", "timeoutMs"]);
    }
}
