//! Structured Logger
//!
//! Wraps `tracing` with console output (pretty or JSON), an optional daily
//! rolling NDJSON file, and environment-based level control.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::bail;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Console output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => bail!("unknown log format '{other}', expected 'pretty' or 'json'"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LogSettings {
    /// Fallback filter when `RUST_LOG` is unset.
    pub level: String,
    pub format: LogFormat,
    /// Directory for `cardhook.log.YYYY-MM-DD`; no file output when `None`.
    pub directory: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
            directory: None,
        }
    }
}

/// Initialize the global structured logger.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logger(settings: &LogSettings) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.level));

    // Logs go to stderr so hook results printed on stdout stay machine-readable
    let console_layer = match settings.format {
        LogFormat::Pretty => fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_ansi(true)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed(),
    };

    let file_layer = settings.directory.as_ref().map(|dir| {
        let file_appender = RollingFileAppender::new(Rotation::DAILY, dir, "cardhook.log");
        fmt::layer()
            .json()
            .with_writer(file_appender)
            .with_ansi(false)
    });

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_formats() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("Pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn init_twice_is_harmless() {
        let settings = LogSettings::default();
        init_logger(&settings);
        init_logger(&settings);
    }
}
