//! One evaluation of one monitored item

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::check::{effective_cooldown, Check, Observation};
use super::notifier::Notifier;
use super::state::{AlertState, Fire};
use super::watcher::{self, RECOVERY_INTERVAL};

/// Read-only context shared by every group loop and watcher
#[derive(Debug, Clone)]
pub struct MonitorContext {
    pub notifier: Notifier,
    /// Cooldown for items without an override
    pub alert_cooldown: Duration,
    /// Poll period of recovery watchers
    pub recovery_interval: Duration,
    /// Cancelled at process shutdown; parent of every watcher stop token
    pub shutdown: CancellationToken,
}

impl MonitorContext {
    /// Context with the default recovery interval
    pub fn new(notifier: Notifier, alert_cooldown: Duration, shutdown: CancellationToken) -> Self {
        Self {
            notifier,
            alert_cooldown,
            recovery_interval: RECOVERY_INTERVAL,
            shutdown,
        }
    }

    /// Override the watcher poll period
    pub fn with_recovery_interval(mut self, recovery_interval: Duration) -> Self {
        self.recovery_interval = recovery_interval;
        self
    }

    /// Best-effort delivery; failures are logged and otherwise ignored
    pub(crate) async fn notify(&self, group: &str, item: &str, text: &str) {
        if let Err(e) = self.notifier.notify(text).await {
            tracing::error!(
                group = %group,
                item = %item,
                error = %e,
                "Failed to send notification"
            );
        }
    }
}

/// A check together with its alert state
#[derive(Debug)]
pub struct Monitored<C> {
    pub group: String,
    pub check: C,
    pub state: AlertState,
}

impl<C: Check> Monitored<C> {
    /// Wrap `check` with fresh state, shared between its group and watcher
    pub fn new(group: impl Into<String>, check: C) -> Arc<Self> {
        Arc::new(Self {
            group: group.into(),
            check,
            state: AlertState::new(),
        })
    }
}

/// What a single evaluation did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Ok,
    Alerted { watcher_started: bool },
    Suppressed { remaining: Duration },
    Error,
}

/// Fetch an item, classify it and act on the result.
///
/// Produces one log line per call. Alerts additionally make one notify
/// attempt and may start the item's recovery watcher.
pub async fn evaluate<C: Check>(item: &Arc<Monitored<C>>, ctx: &Arc<MonitorContext>) -> Verdict {
    let group = item.group.as_str();
    let name = item.check.name();

    let (summary, detail) = match item.check.observe().await {
        Observation::Failed(e) => {
            tracing::error!(
                group = %group,
                item = %name,
                kind = C::KIND,
                "[{}] Error checking {}: {}",
                group,
                name,
                e
            );
            return Verdict::Error;
        }
        Observation::Healthy { summary } => {
            tracing::info!(group = %group, item = %name, "[{}] {}", group, summary);
            return Verdict::Ok;
        }
        Observation::Breached { summary, detail } => (summary, detail),
    };

    let cooldown = effective_cooldown(item.check.cooldown(), ctx.alert_cooldown);
    let watcher = match item
        .state
        .fire(Instant::now(), cooldown, item.check.recovery(), &ctx.shutdown)
    {
        Fire::Suppressed { remaining } => {
            tracing::info!(
                group = %group,
                item = %name,
                "[{}] {}: still breached, in alert cooldown ({}s remaining)",
                group,
                summary,
                remaining.as_secs()
            );
            return Verdict::Suppressed { remaining };
        }
        Fire::Alert { watcher } => watcher,
    };

    let message = item.check.alert_message(group, &detail);
    tracing::warn!(group = %group, item = %name, "[{}] {}: ALERT\n{}", group, summary, message);
    ctx.notify(group, name, &message).await;

    let watcher_started = watcher.is_some();
    if let Some(stop) = watcher {
        watcher::spawn(Arc::clone(item), Arc::clone(ctx), stop);
    }

    Verdict::Alerted { watcher_started }
}
