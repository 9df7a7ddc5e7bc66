//! The capability shared by every monitored item kind

use std::time::Duration;

use async_trait::async_trait;

use crate::fetch::FetchError;

/// How an item gets back to healthy once it has alerted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryPolicy {
    /// Re-alert every cooldown while breached, never announce recovery
    CooldownOnly,
    /// Start a recovery watcher on the first alert of an unhealthy period
    Watched,
}

/// Result of fetching an item and applying its breach predicate
#[derive(Debug)]
pub enum Observation {
    /// Fetched and within threshold
    Healthy { summary: String },
    /// Breach condition holds; `detail` is the body of the alert message
    Breached { summary: String, detail: String },
    /// Fetch failed and the failure is not itself a breach
    Failed(FetchError),
}

impl Observation {
    pub fn is_healthy(&self) -> bool {
        matches!(self, Observation::Healthy { .. })
    }
}

/// A monitored item: one fetch plus one breach predicate.
///
/// Implementations hold only static configuration; all mutable alert state
/// lives in [`AlertState`](super::AlertState) next to the check.
#[async_trait]
pub trait Check: Send + Sync + 'static {
    /// Short label of the item kind, used in log lines
    const KIND: &'static str;

    /// Display name of the item
    fn name(&self) -> &str;

    /// How the item leaves the alerting state
    fn recovery(&self) -> RecoveryPolicy;

    /// Per-item cooldown override
    fn cooldown(&self) -> Option<Duration>;

    /// Fetch the current value and classify it
    async fn observe(&self) -> Observation;

    /// Text sent when the item alerts
    fn alert_message(&self, group: &str, detail: &str) -> String;

    /// Text sent when a watcher sees the item healthy again
    fn recovery_message(&self, group: &str, summary: &str) -> String {
        format!(
            "✅ Recovered: [{}] `{}` is healthy again\n{}",
            group,
            self.name(),
            summary
        )
    }
}

/// Item override when set and non-zero, else the process-wide default
pub fn effective_cooldown(item: Option<Duration>, default: Duration) -> Duration {
    item.filter(|c| !c.is_zero()).unwrap_or(default)
}
