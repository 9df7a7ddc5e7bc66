//! Plaintext metrics scrapes

use super::{FetchError, HttpFetcher};

impl HttpFetcher {
    /// Scrape `endpoint` and return the value of `metric`
    pub async fn metric(&self, endpoint: &str, metric: &str) -> Result<f64, FetchError> {
        let body = self.get_ok(endpoint).await?;
        find_metric(&body, metric)
    }
}

/// Find the first sample line for `metric` and parse its value.
///
/// The first whitespace-delimited token must equal `metric` exactly, so a
/// labelled series is matched by configuring the full `name{labels}` token.
pub fn find_metric(body: &str, metric: &str) -> Result<f64, FetchError> {
    for line in body.lines() {
        let line = line.trim_start();
        if line.starts_with('#') {
            continue;
        }

        let mut tokens = line.split_whitespace();
        if tokens.next() != Some(metric) {
            continue;
        }
        if let Some(raw) = tokens.next() {
            return raw.parse::<f64>().map_err(|_| {
                FetchError::Parse(format!("error parsing metric value {:?}", raw))
            });
        }
    }

    Err(FetchError::MetricNotFound(metric.to_string()))
}
