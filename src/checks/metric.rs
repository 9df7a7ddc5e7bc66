use std::time::Duration;

use async_trait::async_trait;

use crate::alerts::{escape_markdown, Check, Observation, RecoveryPolicy};
use crate::config::MetricItem;
use crate::fetch::HttpFetcher;

/// Breach iff the value reaches the threshold (inclusive)
pub fn metric_breached(value: f64, threshold: f64) -> bool {
    value >= threshold
}

/// Upper bound on one scraped metric
#[derive(Debug, Clone)]
pub struct MetricCheck {
    pub name: String,
    pub metric: String,
    pub endpoint: String,
    pub threshold: f64,
    pub alert_cooldown: Option<Duration>,
    fetcher: HttpFetcher,
}

impl MetricCheck {
    /// Metric check scraping `endpoint`
    pub fn new(item: &MetricItem, endpoint: &str, fetcher: HttpFetcher) -> Self {
        Self {
            name: item.name.clone(),
            metric: item.metric.clone(),
            endpoint: endpoint.to_string(),
            threshold: item.threshold,
            alert_cooldown: item.alert_cooldown,
            fetcher,
        }
    }

    fn classify(&self, value: f64) -> Observation {
        let summary = format!(
            "{} ({}): {:.2} (Threshold: {})",
            self.name, self.metric, value, self.threshold
        );

        if metric_breached(value, self.threshold) {
            Observation::Breached {
                summary,
                detail: format!("Expected: below {}\nGot: {:.2}", self.threshold, value),
            }
        } else {
            Observation::Healthy { summary }
        }
    }
}

#[async_trait]
impl Check for MetricCheck {
    const KIND: &'static str = "metric";

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
        match self.fetcher.metric(&self.endpoint, &self.metric).await {
            Ok(value) => self.classify(value),
            Err(e) => Observation::Failed(e),
        }
    }

    fn alert_message(&self, group: &str, detail: &str) -> String {
        format!(
            "🔴 Alert: [{}] {} `{}` is above threshold\n{}",
            group, self.name, self.metric, escape_markdown(detail)
        )
    }

    fn recovery_message(&self, group: &str, summary: &str) -> String {
        format!(
            "✅ Recovered: [{}] {} `{}` is back below threshold\n{}",
            group, self.name, self.metric, summary
        )
    }
}
