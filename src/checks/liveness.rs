use std::time::Duration;

use async_trait::async_trait;

use crate::alerts::{escape_markdown, Check, Observation, RecoveryPolicy};
use crate::config::ValidatorItem;
use crate::fetch::HttpFetcher;

/// Validator liveness: alive iff the URL answers 200
#[derive(Debug, Clone)]
pub struct LivenessCheck {
    pub name: String,
    pub url: String,
    pub alert_cooldown: Option<Duration>,
    fetcher: HttpFetcher,
}

impl LivenessCheck {
    /// Liveness check for one validator URL
    pub fn new(item: &ValidatorItem, fetcher: HttpFetcher) -> Self {
        Self {
            name: item.name.clone(),
            url: item.url.clone(),
            alert_cooldown: item.alert_cooldown,
            fetcher,
        }
    }
}

#[async_trait]
impl Check for LivenessCheck {
    const KIND: &'static str = "liveness";

    fn name(&self) -> &str {
        &self.name
    }

    fn recovery(&self) -> RecoveryPolicy {
        RecoveryPolicy::Watched
    }

    fn cooldown(&self) -> Option<Duration> {
        self.alert_cooldown
    }

    async fn observe(&self) -> Observation {
        match self.fetcher.ping(&self.url).await {
            Ok(()) => Observation::Healthy {
                summary: format!("{} is alive (URL: {})", self.name, self.url),
            },
            Err(e) => Observation::Breached {
                summary: format!("{} is not responding (URL: {})", self.name, self.url),
                detail: format!("Reason: {}", e),
            },
        }
    }

    fn alert_message(&self, group: &str, detail: &str) -> String {
        format!(
            "🚨 Alert: [{}] validator `{}` is down!\nURL: `{}`\n{}",
            group, self.name, self.url, escape_markdown(detail)
        )
    }

    fn recovery_message(&self, group: &str, _summary: &str) -> String {
        format!(
            "✅ Recovered: [{}] validator `{}` is responding again\nURL: `{}`",
            group, self.name, self.url
        )
    }
}
