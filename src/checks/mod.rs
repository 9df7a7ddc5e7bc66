//! The four monitored item kinds
//!
//! Each kind pairs one fetcher with its breach predicate and message
//! formatting. Balances re-alert after every cooldown; the other kinds hand
//! recovery detection to a watcher.

pub mod balance;
pub mod health;
pub mod liveness;
pub mod metric;

pub use balance::{balance_breached, BalanceCheck};
pub use health::HealthCheck;
pub use liveness::LivenessCheck;
pub use metric::{metric_breached, MetricCheck};
