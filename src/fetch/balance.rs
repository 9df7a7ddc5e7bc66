//! Bank balance queries against a Cosmos REST endpoint

use num_bigint::BigUint;
use serde::Deserialize;

use super::{FetchError, HttpFetcher};

/// Body of `/cosmos/bank/v1beta1/balances/{address}`
#[derive(Debug, Deserialize)]
pub struct BalanceResponse {
    #[serde(default)]
    pub balances: Vec<Coin>,
}

#[derive(Debug, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: String,
}

impl HttpFetcher {
    /// Fetch the `denom` balance held by `address`
    pub async fn balance(
        &self,
        rest_endpoint: &str,
        address: &str,
        denom: &str,
    ) -> Result<BigUint, FetchError> {
        let url = format!(
            "{}/cosmos/bank/v1beta1/balances/{}",
            rest_endpoint.trim_end_matches('/'),
            address
        );
        let body = self.get_ok(&url).await?;
        find_balance(&body, denom)
    }
}

/// Parse a balances body and pick out the amount for `denom`
pub fn find_balance(body: &str, denom: &str) -> Result<BigUint, FetchError> {
    let response: BalanceResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::Parse(format!("error parsing balances: {}", e)))?;

    let coin = response
        .balances
        .iter()
        .find(|c| c.denom == denom)
        .ok_or_else(|| FetchError::DenomNotFound(denom.to_string()))?;

    coin.amount
        .parse::<BigUint>()
        .map_err(|_| FetchError::Parse(format!("invalid balance amount: {}", coin.amount)))
}
