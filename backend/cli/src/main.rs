mod api;
mod config;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;
use tracing::info;

use cardhook_config::WebhookConfig;
use cardhook_core::{Authorization, Transaction};
use cardhook_hooks::HookDispatcher;
use cardhook_logging::{init_logger, LogFormat};

use api::AppState;
use config::Config;

#[derive(Parser)]
#[command(name = "cardhook")]
#[command(about = "Card transaction hooks with webhook forwarding")]
#[command(version)]
struct Cli {
    /// Console log format (pretty or json)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pre-authorization hook; prints `true`
    BeforeTransaction {
        /// JSON file holding the authorization (stdin when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Run the post-approval hook; prints the webhook response
    AfterTransaction {
        /// JSON file holding the transaction (stdin when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Abort the webhook call after this many milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
    /// Run the post-decline hook
    AfterDecline {
        /// JSON file holding the transaction (stdin when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Serve the hooks over HTTP
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Print the webhook config with secrets masked
    ShowConfig,
    /// Check whether a local server is running
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }

    init_logger(&config.log_settings());

    match cli.command {
        Commands::BeforeTransaction { input } => {
            let authorization = Authorization::new(read_record(input.as_ref()).await?);
            let allowed = HookDispatcher::log_only()
                .before_transaction(&authorization)
                .await;
            println!("{allowed}");
        }
        Commands::AfterTransaction { input, timeout_ms } => {
            let mut webhook = cardhook_config::load_from_env()?;
            if let Some(ms) = timeout_ms {
                webhook = webhook.with_timeout(Duration::from_millis(ms));
            }
            let transaction = Transaction::new(read_record(input.as_ref()).await?);
            let response = HookDispatcher::new(&webhook)?
                .after_transaction(&transaction)
                .await
                .context("after_transaction hook failed")?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::AfterDecline { input } => {
            let transaction = Transaction::new(read_record(input.as_ref()).await?);
            HookDispatcher::log_only().after_decline(&transaction).await;
        }
        Commands::Serve { port } => {
            let config = Config {
                port: port.unwrap_or(config.port),
                ..config
            };
            let webhook = cardhook_config::load_from_env()?;
            run_server(config, webhook).await?;
        }
        Commands::ShowConfig => {
            let webhook = WebhookConfig::from_env()?;
            let shown = WebhookConfig {
                endpoint: webhook.redacted_endpoint(),
                ..webhook.clone()
            };
            let redacted = cardhook_config::redact(&serde_json::to_value(&shown)?);
            println!("{}", serde_json::to_string_pretty(&redacted)?);
            let report = cardhook_config::validate(&webhook);
            for warning in &report.warnings {
                println!("warning: {warning}");
            }
            for error in &report.errors {
                println!("error: {error}");
            }
        }
        Commands::Status => {
            let client = reqwest::Client::new();
            match client
                .get(format!("http://localhost:{}/health", config.port))
                .send()
                .await
            {
                Ok(resp) => {
                    let body: Value = resp.json().await?;
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                Err(_) => {
                    println!("cardhook is not running on port {}", config.port);
                }
            }
        }
    }

    Ok(())
}

/// Read one JSON record from `path`, or from stdin when no path is given.
async fn read_record(path: Option<&PathBuf>) -> Result<Value> {
    let raw = match path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("Failed to read stdin")?;
            buf
        }
    };
    serde_json::from_str(&raw).context("Input is not valid JSON")
}

async fn run_server(config: Config, webhook: WebhookConfig) -> Result<()> {
    info!(
        port = config.port,
        bind = %config.bind_address,
        endpoint = %webhook.redacted_endpoint(),
        "Starting cardhook"
    );

    let dispatcher = HookDispatcher::new(&webhook)?;
    let app = api::build_router(Arc::new(AppState { dispatcher }));
    let addr = format!("{}:{}", config.bind_address, config.port);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(addr = %addr, "HTTP API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;

    Ok(())
}
