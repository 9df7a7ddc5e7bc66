use std::time::Duration;

use async_trait::async_trait;

use crate::alerts::{escape_markdown, Check, Observation, RecoveryPolicy};
use crate::config::HealthItem;
use crate::fetch::{HealthStatus, HttpFetcher};

/// JSON-RPC health endpoint; unreachable counts as unhealthy
#[derive(Debug, Clone)]
pub struct HealthCheck {
    pub name: String,
    pub endpoint: String,
    pub alert_cooldown: Option<Duration>,
    fetcher: HttpFetcher,
}

impl HealthCheck {
    /// Health check for one JSON-RPC node
    pub fn new(item: &HealthItem, fetcher: HttpFetcher) -> Self {
        Self {
            name: item.name.clone(),
            endpoint: item.endpoint.clone(),
            alert_cooldown: item.alert_cooldown,
            fetcher,
        }
    }

    fn classify(&self, status: HealthStatus) -> Observation {
        let summary = format!(
            "{} Health: {} (Endpoint: {})",
            self.name, status.is_healthy, self.endpoint
        );

        if status.is_healthy {
            return Observation::Healthy { summary };
        }

        let detail = match status.error {
            Some(error) => format!("IsHealthy: false\nError: {}", error),
            None => "IsHealthy: false".to_string(),
        };
        Observation::Breached { summary, detail }
    }
}

#[async_trait]
impl Check for HealthCheck {
    const KIND: &'static str = "health";

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
        match self.fetcher.health(&self.endpoint).await {
            Ok(status) => self.classify(status),
            Err(e) => Observation::Breached {
                summary: format!(
                    "{} health check failed (Endpoint: {})",
                    self.name, self.endpoint
                ),
                detail: format!("Reason: {}", e),
            },
        }
    }

    fn alert_message(&self, group: &str, detail: &str) -> String {
        format!(
            "⚠️ Alert: [{}] `{}` health is unhealthy!\nEndpoint: `{}`\n{}",
            group, self.name, self.endpoint, escape_markdown(detail)
        )
    }

    fn recovery_message(&self, group: &str, _summary: &str) -> String {
        format!(
            "✅ Recovered: [{}] `{}` is healthy again\nEndpoint: `{}`",
            group, self.name, self.endpoint
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn observe_with(response: ResponseTemplate) -> (HealthCheck, Observation) {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(response)
            .mount(&server)
            .await;

        let item = HealthItem {
            name: "rpc-1".to_string(),
            endpoint: format!("{}/health", server.uri()),
            alert_cooldown: None,
        };
        let fetcher = HttpFetcher::with_timeout(Duration::from_secs(5)).unwrap();
        let check = HealthCheck::new(&item, fetcher);
        let observation = check.observe().await;
        (check, observation)
    }

    #[tokio::test]
    async fn test_healthy() {
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "result": {"isHealthy": true, "error": ""},
            "id": 1
        });
        let (_, observation) =
            observe_with(ResponseTemplate::new(200).set_body_json(body)).await;
        assert!(observation.is_healthy());
    }

    #[tokio::test]
    async fn test_unhealthy_body_surfaces_error() {
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "result": {"isHealthy": false, "error": "x"},
            "id": 1
        });
        let (check, observation) =
            observe_with(ResponseTemplate::new(200).set_body_json(body)).await;

        match observation {
            Observation::Breached { detail, .. } => {
                let message = check.alert_message("RPC", &detail);
                assert!(message.contains("Error: x"));
                assert!(message.contains("IsHealthy: false"));
            }
            other => panic!("expected breach, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_server_error_text_is_escaped() {
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "result": {"isHealthy": false, "error": "peer_count *low*"},
            "id": 1
        });
        let (check, observation) =
            observe_with(ResponseTemplate::new(200).set_body_json(body)).await;

        match observation {
            Observation::Breached { detail, .. } => {
                let message = check.alert_message("RPC", &detail);
                assert!(message.contains("Error: peer\\_count \\*low\\*"));
                assert!(message.contains("Endpoint: `http://"));
            }
            other => panic!("expected breach, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_server_error_is_breach_without_error_text() {
        let (check, observation) = observe_with(ResponseTemplate::new(500)).await;

        match observation {
            Observation::Breached { summary, detail } => {
                assert!(summary.contains("health check failed"));
                let message = check.alert_message("RPC", &detail);
                assert!(message.contains("status 500"));
                assert!(!message.contains("Error:"));
            }
            other => panic!("expected breach, got {:?}", other),
        }
    }
}
