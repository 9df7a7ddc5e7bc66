//! Watchtower daemon
//!
//! Run with: cargo run -- --config-path config.yaml
//!
//! Environment variables:
//! - WATCHTOWER_CONFIG: Config file path (default: ./config.yaml)
//! - RUST_LOG: Log level (default: watchtower=info)

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use watchtower::alerts::{NotifyChannel, TelegramChannel};
use watchtower::{Config, HttpFetcher, MonitorContext, Notifier, Scheduler};

#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Path to the config file
    #[arg(long, env = "WATCHTOWER_CONFIG", default_value = "config.yaml")]
    config_path: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "watchtower=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config_path = std::path::absolute(&args.config_path)?;

    let config = Config::from_file(&config_path).map_err(|e| {
        tracing::error!("Error loading config: {}", e);
        e
    })?;

    tracing::info!("Watchtower v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("  Config: {}", config_path.display());
    tracing::info!("  Check interval: {} seconds", config.check_interval.as_secs());
    tracing::info!("  Alert cooldown: {} seconds", config.alert_cooldown.as_secs());
    log_targets(&config);

    let notifier = connect_notifier(&config).await;
    let fetcher = HttpFetcher::with_timeout(config.request_timeout)?;

    let shutdown = CancellationToken::new();
    let ctx = Arc::new(MonitorContext::new(
        notifier,
        config.alert_cooldown,
        shutdown.clone(),
    ));

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
            shutdown.cancel();
        }
    });

    let scheduler = Scheduler::from_config(&config, &fetcher, ctx);
    tracing::info!(
        "Monitoring {} items in {} groups",
        config.item_count(),
        scheduler.group_count()
    );
    scheduler.run().await;

    tracing::info!("Watchtower stopped");
    Ok(())
}

/// Bring up Telegram if configured; any failure falls back to log-only mode
async fn connect_notifier(config: &Config) -> Notifier {
    let Some(telegram) = &config.telegram else {
        tracing::info!("Running in log-only mode (no Telegram notifications)");
        return Notifier::log_only();
    };

    let channel = match TelegramChannel::new(
        telegram.bot_token.clone(),
        telegram.chat_id,
        config.request_timeout,
    ) {
        Ok(channel) => channel,
        Err(e) => {
            tracing::warn!("Failed to initialize Telegram channel: {}", e);
            tracing::warn!("Continuing in log-only mode");
            return Notifier::log_only();
        }
    };

    if let Err(e) = channel.send("🚀 Monitor started").await {
        tracing::warn!("Failed to send test message to Telegram: {}", e);
        tracing::warn!("Make sure the bot has been started in the chat and the chat ID is correct");
        tracing::warn!("Continuing in log-only mode");
        return Notifier::log_only();
    }

    tracing::info!("Telegram notifications enabled and tested successfully");
    Notifier::new(Arc::new(channel))
}

fn log_targets(config: &Config) {
    for group in &config.addresses {
        tracing::info!("  Address group: {} (endpoint: {})", group.name, group.rest_endpoint);
        for item in &group.addresses {
            tracing::info!(
                "    - {} ({}), threshold: {} {}",
                item.name,
                item.address,
                item.threshold,
                item.denom
            );
        }
    }

    for group in &config.metrics {
        tracing::info!("  Metric group: {} (endpoint: {})", group.name, group.rest_endpoint);
        for item in &group.metrics {
            tracing::info!("    - {} ({}), threshold: {}", item.name, item.metric, item.threshold);
        }
    }

    for group in &config.health {
        tracing::info!("  Health group: {}", group.name);
        for item in &group.endpoints {
            tracing::info!("    - {} ({})", item.name, item.endpoint);
        }
    }

    for group in &config.validators {
        tracing::info!("  Validator group: {}", group.name);
        for item in &group.nodes {
            tracing::info!("    - {} ({})", item.name, item.url);
        }
    }
}
