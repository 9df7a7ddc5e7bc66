//! JSON-RPC shaped health endpoints

use serde::Deserialize;

use super::{FetchError, HttpFetcher};

/// Parsed health report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthStatus {
    pub is_healthy: bool,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    #[serde(default)]
    result: HealthResult,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HealthResult {
    #[serde(default)]
    is_healthy: bool,
    #[serde(default)]
    error: Option<String>,
}

impl HttpFetcher {
    /// Query a health endpoint.
    ///
    /// A reachable endpoint reporting `isHealthy: false` is a successful fetch.
    pub async fn health(&self, endpoint: &str) -> Result<HealthStatus, FetchError> {
        let body = self.get_ok(endpoint).await?;
        parse_health(&body)
    }
}

/// Decode a JSON-RPC health body; a missing result counts as unhealthy
pub fn parse_health(body: &str) -> Result<HealthStatus, FetchError> {
    let response: HealthResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::Parse(format!("error parsing health response: {}", e)))?;

    Ok(HealthStatus {
        is_healthy: response.result.is_healthy,
        error: response.result.error.filter(|e| !e.is_empty()),
    })
}
