//! Liveness pings

use super::{FetchError, HttpFetcher};

impl HttpFetcher {
    /// GET `url`; only an HTTP 200 counts as alive
    pub async fn ping(&self, url: &str) -> Result<(), FetchError> {
        self.get_ok(url).await.map(|_| ())
    }
}
