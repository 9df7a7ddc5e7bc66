//! One group of items of a single kind and its poll loop

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};

use crate::alerts::{evaluate, Check, MonitorContext, Monitored};

/// A named, fixed list of items polled together
pub struct MonitorGroup<C> {
    pub name: String,
    pub items: Vec<Arc<Monitored<C>>>,
}

impl<C: Check> MonitorGroup<C> {
    /// Group of `checks` evaluated in order on every pass
    pub fn new(name: impl Into<String>, checks: impl IntoIterator<Item = C>) -> Self {
        let name = name.into();
        let items = checks
            .into_iter()
            .map(|check| Monitored::new(name.clone(), check))
            .collect();
        Self { name, items }
    }

    /// Evaluate every item once, in configuration order
    pub async fn run_pass(&self, ctx: &Arc<MonitorContext>) {
        for item in &self.items {
            evaluate(item, ctx).await;
        }
    }

    /// Poll immediately, then every `check_interval`, until shutdown
    pub async fn run(self, ctx: Arc<MonitorContext>, check_interval: Duration) {
        tracing::info!(
            group = %self.name,
            kind = C::KIND,
            "Started monitoring {} group '{}' with {} items",
            C::KIND,
            self.name,
            self.items.len()
        );

        let mut ticker = interval(check_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = ctx.shutdown.cancelled() => break,
                _ = ticker.tick() => {}
            }
            self.run_pass(&ctx).await;
        }

        tracing::info!(group = %self.name, "Stopped monitoring group '{}'", self.name);
    }
}
