use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use commitmail::config::Config;
use commitmail::delivery::Delivery;
use commitmail::notifications::SmtpMailer;
use commitmail::AppState;

#[derive(Parser, Debug)]
#[command(name = "commitmail")]
#[command(author, version, about = "Sends an email for every pushed commit", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "COMMITMAIL_CONFIG", default_value = "commitmail.toml")]
    config: PathBuf,

    /// Override log level
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config)?;

    // Initialize logging
    let log_level = cli
        .log_level
        .as_ref()
        .unwrap_or(&config.logging.level)
        .clone();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting commitmail v{}", env!("CARGO_PKG_VERSION"));
    if cli.config.exists() {
        tracing::info!("Loaded configuration from {}", cli.config.display());
    } else {
        tracing::info!("No config file found, using defaults");
    }
    tracing::info!(
        sender = %config.mail.sender,
        recipient = %config.mail.recipient,
        smtp = %format!("{}:{}", config.smtp.hostname, config.smtp.port),
        smtp_auth = config.smtp.credentials().is_some(),
        delivery = ?config.delivery.mode,
        "Mail settings"
    );

    let mailer = Arc::new(SmtpMailer::new(config.smtp.clone()));
    let delivery = Delivery::from_config(&config.delivery, mailer);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config, delivery));
    let app = commitmail::api::create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Webhook server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
