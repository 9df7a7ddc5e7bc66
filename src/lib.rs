//! Watchtower: threshold monitor with cooldown-gated alerts
//!
//! Periodically polls configured targets and alerts to the log, and
//! optionally a Telegram chat, when one crosses its threshold.
//!
//! # Targets
//!
//! - **Balances**: Cosmos bank balances compared with arbitrary precision
//! - **Metrics**: Prometheus-style plaintext scrapes with an upper threshold
//! - **Health**: JSON-RPC health endpoints reporting `isHealthy`
//! - **Validators**: liveness pings that must answer HTTP 200
//!
//! Every alert is gated by a cooldown. Metric, health and validator items
//! additionally get a recovery watcher that polls every five seconds while
//! the item is unhealthy and announces recovery exactly once.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use watchtower::alerts::{MonitorContext, Notifier};
//! use watchtower::fetch::HttpFetcher;
//! use watchtower::{Config, Scheduler};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_file("config.yaml")?;
//! let fetcher = HttpFetcher::with_timeout(config.request_timeout)?;
//! let ctx = MonitorContext::new(
//!     Notifier::log_only(),
//!     config.alert_cooldown,
//!     CancellationToken::new(),
//! );
//!
//! Scheduler::from_config(&config, &fetcher, Arc::new(ctx)).run().await;
//! # Ok(())
//! # }
//! ```

pub mod alerts;
pub mod checks;
pub mod config;
pub mod fetch;
pub mod scheduler;

pub use alerts::{MonitorContext, Notifier, NotifyError};
pub use config::{Config, ConfigError};
pub use fetch::{FetchError, HttpFetcher};
pub use scheduler::{MonitorGroup, Scheduler};
