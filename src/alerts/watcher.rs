//! Recovery watchers
//!
//! A watcher is started by the evaluator when an item enters its unhealthy
//! period and is the only place that announces recovery. It exits after the
//! first healthy observation or when its stop token is cancelled.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::check::{Check, Observation};
use super::evaluator::{MonitorContext, Monitored};

/// Poll period of a recovery watcher
pub const RECOVERY_INTERVAL: Duration = Duration::from_secs(5);

/// Spawn the watcher for `item`
pub fn spawn<C: Check>(
    item: Arc<Monitored<C>>,
    ctx: Arc<MonitorContext>,
    stop: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move { run(item, ctx, stop).await })
}

async fn run<C: Check>(item: Arc<Monitored<C>>, ctx: Arc<MonitorContext>, stop: CancellationToken) {
    let group = item.group.as_str();
    let name = item.check.name();
    let period = ctx.recovery_interval;

    tracing::debug!(group = %group, item = %name, "Recovery watcher started");

    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = stop.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let observation = item.check.observe().await;
        if stop.is_cancelled() {
            break;
        }

        match observation {
            Observation::Healthy { summary } => {
                if item.state.recover() {
                    let message = item.check.recovery_message(group, &summary);
                    tracing::warn!(
                        group = %group,
                        item = %name,
                        "[{}] {}: RECOVERED\n{}",
                        group,
                        summary,
                        message
                    );
                    ctx.notify(group, name, &message).await;
                }
                return;
            }
            Observation::Breached { summary, .. } => {
                tracing::debug!(
                    group = %group,
                    item = %name,
                    "[{}] {}: not recovered yet",
                    group,
                    summary
                );
            }
            Observation::Failed(e) => {
                tracing::debug!(group = %group, item = %name, error = %e, "Recovery probe failed");
            }
        }
    }

    // Stopped from outside: no notice, but leave the item consistent
    item.state.recover();
    tracing::debug!(group = %group, item = %name, "Recovery watcher stopped");
}
