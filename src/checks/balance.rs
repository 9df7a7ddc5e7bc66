use std::time::Duration;

use async_trait::async_trait;
use num_bigint::BigUint;

use crate::alerts::{escape_markdown, Check, Observation, RecoveryPolicy};
use crate::config::AddressItem;
use crate::fetch::HttpFetcher;

/// Breach iff the balance is strictly below the threshold
pub fn balance_breached(current: &BigUint, threshold: &BigUint) -> bool {
    current < threshold
}

/// Minimum balance of one denomination held by an address
#[derive(Debug, Clone)]
pub struct BalanceCheck {
    pub name: String,
    pub address: String,
    pub rest_endpoint: String,
    pub denom: String,
    pub threshold: BigUint,
    pub alert_cooldown: Option<Duration>,
    fetcher: HttpFetcher,
}

impl BalanceCheck {
    /// Balance check for `item` against the bank API at `rest_endpoint`
    pub fn new(item: &AddressItem, rest_endpoint: &str, fetcher: HttpFetcher) -> Self {
        Self {
            name: item.name.clone(),
            address: item.address.clone(),
            rest_endpoint: rest_endpoint.to_string(),
            denom: item.denom.clone(),
            threshold: item.threshold.clone(),
            alert_cooldown: item.alert_cooldown,
            fetcher,
        }
    }

    fn classify(&self, current: &BigUint) -> Observation {
        let summary = format!(
            "{} Balance: {} {} (Threshold: {} {})",
            self.name, current, self.denom, self.threshold, self.denom
        );

        if balance_breached(current, &self.threshold) {
            Observation::Breached {
                summary,
                detail: format!(
                    "Current balance: {} {}\nThreshold: {} {}",
                    current, self.denom, self.threshold, self.denom
                ),
            }
        } else {
            Observation::Healthy { summary }
        }
    }
}

#[async_trait]
impl Check for BalanceCheck {
    const KIND: &'static str = "balance";

    fn name(&self) -> &str {
        &self.name
    }

    fn recovery(&self) -> RecoveryPolicy {
        RecoveryPolicy::CooldownOnly
    }

    fn cooldown(&self) -> Option<Duration> {
        self.alert_cooldown
    }

    async fn observe(&self) -> Observation {
        match self
            .fetcher
            .balance(&self.rest_endpoint, &self.address, &self.denom)
            .await
        {
            Ok(current) => self.classify(&current),
            Err(e) => Observation::Failed(e),
        }
    }

    fn alert_message(&self, group: &str, detail: &str) -> String {
        format!(
            "📉 Alert: [{}] `{}` balance is below threshold!\nAddress: `{}`\n{}",
            group, self.name, self.address, escape_markdown(detail)
        )
    }
}
