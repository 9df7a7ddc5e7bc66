//! HTTP fetchers for every target kind
//!
//! Each fetcher is a single request/parse round trip with no retained state.
//! Response parsing lives in plain functions so it can be exercised without
//! a network.

pub mod balance;
pub mod health;
pub mod metric;
pub mod ping;

use std::time::Duration;

pub use balance::{find_balance, BalanceResponse};
pub use health::{parse_health, HealthStatus};
pub use metric::find_metric;

/// Longest response body excerpt kept in a status error
const MAX_ERROR_BODY: usize = 256;

/// Shared HTTP client for all fetchers
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http_client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a fetcher whose requests are bounded by `timeout`
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self { http_client })
    }

    /// GET `url`, returning the status code and the full body
    async fn get_text(&self, url: &str) -> Result<(reqwest::StatusCode, String), FetchError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(format!("error reading response: {}", e)))?;

        Ok((status, body))
    }

    /// GET `url` and fail unless the endpoint answered 200
    async fn get_ok(&self, url: &str) -> Result<String, FetchError> {
        let (status, body) = self.get_text(url).await?;
        if status != reqwest::StatusCode::OK {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: truncate(&body),
            });
        }
        Ok(body)
    }
}

fn truncate(body: &str) -> String {
    let body = body.trim();
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

/// Fetch errors
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response: {0}")]
    Parse(String),

    #[error("Denomination {0} not found in balances")]
    DenomNotFound(String),

    #[error("Metric {0} not found")]
    MetricNotFound(String),
}
