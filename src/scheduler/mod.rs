//! Group scheduling
//!
//! Every configured group gets its own task. Groups never wait on each
//! other; items inside a group are polled one after another.

pub mod group;

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

pub use group::MonitorGroup;

use crate::alerts::{Check, MonitorContext};
use crate::checks::{BalanceCheck, HealthCheck, LivenessCheck, MetricCheck};
use crate::config::Config;
use crate::fetch::HttpFetcher;

/// Owns the group tasks of a running monitor
pub struct Scheduler {
    ctx: Arc<MonitorContext>,
    check_interval: Duration,
    tasks: Vec<JoinHandle<()>>,
}

impl Scheduler {
    /// Empty scheduler; groups are added with [`Scheduler::spawn_group`]
    pub fn new(ctx: Arc<MonitorContext>, check_interval: Duration) -> Self {
        Self {
            ctx,
            check_interval,
            tasks: Vec::new(),
        }
    }

    /// Build and start one task per group in `config`
    pub fn from_config(config: &Config, fetcher: &HttpFetcher, ctx: Arc<MonitorContext>) -> Self {
        let mut scheduler = Self::new(ctx, config.check_interval);

        for group in &config.metrics {
            let checks = group
                .metrics
                .iter()
                .map(|item| MetricCheck::new(item, &group.rest_endpoint, fetcher.clone()));
            scheduler.spawn_group(MonitorGroup::new(&group.name, checks));
        }

        for group in &config.addresses {
            let checks = group
                .addresses
                .iter()
                .map(|item| BalanceCheck::new(item, &group.rest_endpoint, fetcher.clone()));
            scheduler.spawn_group(MonitorGroup::new(&group.name, checks));
        }

        for group in &config.health {
            let checks = group
                .endpoints
                .iter()
                .map(|item| HealthCheck::new(item, fetcher.clone()));
            scheduler.spawn_group(MonitorGroup::new(&group.name, checks));
        }

        for group in &config.validators {
            let checks = group
                .nodes
                .iter()
                .map(|item| LivenessCheck::new(item, fetcher.clone()));
            scheduler.spawn_group(MonitorGroup::new(&group.name, checks));
        }

        scheduler
    }

    /// Start polling `group` on its own task
    pub fn spawn_group<C: Check>(&mut self, group: MonitorGroup<C>) {
        let ctx = Arc::clone(&self.ctx);
        let check_interval = self.check_interval;
        self.tasks
            .push(tokio::spawn(async move { group.run(ctx, check_interval).await }));
    }

    /// Number of running group tasks
    pub fn group_count(&self) -> usize {
        self.tasks.len()
    }

    /// Wait until every group loop has exited
    pub async fn run(self) {
        for result in futures::future::join_all(self.tasks).await {
            if let Err(e) = result {
                tracing::error!(error = %e, "Group task failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerts::testing::{RecordingChannel, Script, ScriptedCheck};
    use crate::alerts::{Notifier, RecoveryPolicy};
    use tokio_util::sync::CancellationToken;

    fn context() -> (Arc<MonitorContext>, Arc<RecordingChannel>) {
        let channel = Arc::new(RecordingChannel::default());
        let ctx = MonitorContext::new(
            Notifier::new(channel.clone()),
            Duration::from_secs(3600),
            CancellationToken::new(),
        );
        (Arc::new(ctx), channel)
    }

    #[tokio::test(start_paused = true)]
    async fn test_groups_run_independently() {
        let (ctx, _) = context();

        let fast = MonitorGroup::new("A", vec![ScriptedCheck::new("a", RecoveryPolicy::Watched)]);
        let slow = MonitorGroup::new(
            "B",
            vec![
                ScriptedCheck::new("b", RecoveryPolicy::Watched).with_delay(Duration::from_secs(3)),
            ],
        );
        let fast_item = Arc::clone(&fast.items[0]);
        let slow_item = Arc::clone(&slow.items[0]);

        let a = tokio::spawn(fast.run(Arc::clone(&ctx), Duration::from_secs(1)));
        let b = tokio::spawn(slow.run(Arc::clone(&ctx), Duration::from_secs(5)));

        tokio::time::sleep(Duration::from_millis(6_100)).await;
        ctx.shutdown.cancel();
        a.await.unwrap();
        b.await.unwrap();

        assert!(fast_item.check.probes() >= 6, "A probed {} times", fast_item.check.probes());
        assert!(slow_item.check.probes() >= 2, "B probed {} times", slow_item.check.probes());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pass_is_sequential_in_order() {
        let (ctx, channel) = context();
        let checks = ["first", "second", "third"].map(|name| {
            let check = ScriptedCheck::new(name, RecoveryPolicy::CooldownOnly);
            check.set(Script::Breached);
            check
        });
        let group = MonitorGroup::new("g", checks);

        group.run_pass(&ctx).await;
        assert_eq!(
            channel.sent(),
            vec![
                "ALERT [g] first: Got: too much",
                "ALERT [g] second: Got: too much",
                "ALERT [g] third: Got: too much",
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_item_does_not_stop_group() {
        let (ctx, _) = context();
        let broken = ScriptedCheck::new("broken", RecoveryPolicy::CooldownOnly);
        broken.set(Script::Failed);
        let group = MonitorGroup::new(
            "g",
            vec![broken, ScriptedCheck::new("fine", RecoveryPolicy::CooldownOnly)],
        );
        let fine = Arc::clone(&group.items[1]);

        let mut scheduler = Scheduler::new(Arc::clone(&ctx), Duration::from_secs(1));
        scheduler.spawn_group(group);
        assert_eq!(scheduler.group_count(), 1);

        tokio::time::sleep(Duration::from_millis(3_500)).await;
        ctx.shutdown.cancel();
        scheduler.run().await;

        assert_eq!(fine.check.probes(), 4);
    }

    #[tokio::test]
    async fn test_from_config_spawns_every_group() {
        let config = Config::from_yaml(
            r#"
alert_cooldown: 60
addresses:
  - rest_endpoint: http://127.0.0.1:1
    addresses:
      - address: cosmos1a
        threshold: { denom: uatom, amount: "1" }
metrics:
  - rest_endpoint: http://127.0.0.1:1/metrics
    metrics:
      - metric: m
        threshold: 1
health:
  - endpoints:
      - endpoint: http://127.0.0.1:1/health
validators:
  - nodes:
      - url: http://127.0.0.1:1/status
"#,
        )
        .unwrap();

        let (ctx, _) = context();
        let fetcher = HttpFetcher::with_timeout(Duration::from_millis(200)).unwrap();
        ctx.shutdown.cancel();

        let scheduler = Scheduler::from_config(&config, &fetcher, ctx);
        assert_eq!(scheduler.group_count(), 4);
        scheduler.run().await;
    }
}
