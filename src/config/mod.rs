//! Monitor configuration
//!
//! The YAML file is read once at startup, defaults are filled in and every
//! field is validated. The resulting [`Config`] never changes afterwards.

mod file;

use std::path::{Path, PathBuf};
use std::time::Duration;

use num_bigint::BigUint;

use file::ConfigFile;

/// Default poll interval of every group
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(600);

/// Default per-request timeout of fetchers and the Telegram channel
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Validated configuration snapshot
#[derive(Debug, Clone)]
pub struct Config {
    pub check_interval: Duration,
    pub alert_cooldown: Duration,
    pub request_timeout: Duration,
    pub telegram: Option<TelegramConfig>,
    pub addresses: Vec<AddressGroup>,
    pub metrics: Vec<MetricGroup>,
    pub health: Vec<HealthGroup>,
    pub validators: Vec<ValidatorGroup>,
}

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: i64,
}

#[derive(Debug, Clone)]
pub struct AddressGroup {
    pub name: String,
    pub rest_endpoint: String,
    pub addresses: Vec<AddressItem>,
}

#[derive(Debug, Clone)]
pub struct AddressItem {
    pub name: String,
    pub address: String,
    pub denom: String,
    pub threshold: BigUint,
    pub alert_cooldown: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct MetricGroup {
    pub name: String,
    pub rest_endpoint: String,
    pub metrics: Vec<MetricItem>,
}

#[derive(Debug, Clone)]
pub struct MetricItem {
    /// Display name, the metric name when not configured
    pub name: String,
    pub metric: String,
    pub threshold: f64,
    pub alert_cooldown: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct HealthGroup {
    pub name: String,
    pub endpoints: Vec<HealthItem>,
}

#[derive(Debug, Clone)]
pub struct HealthItem {
    pub name: String,
    pub endpoint: String,
    pub alert_cooldown: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct ValidatorGroup {
    pub name: String,
    pub nodes: Vec<ValidatorItem>,
}

#[derive(Debug, Clone)]
pub struct ValidatorItem {
    pub name: String,
    pub url: String,
    pub alert_cooldown: Option<Duration>,
}

impl Config {
    /// Load and validate the YAML file at `path`
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&contents)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let raw: ConfigFile = serde_yaml::from_str(contents)?;
        Self::validate(raw)
    }

    /// Total number of monitored items across all groups
    pub fn item_count(&self) -> usize {
        self.addresses.iter().map(|g| g.addresses.len()).sum::<usize>()
            + self.metrics.iter().map(|g| g.metrics.len()).sum::<usize>()
            + self.health.iter().map(|g| g.endpoints.len()).sum::<usize>()
            + self.validators.iter().map(|g| g.nodes.len()).sum::<usize>()
    }

    fn validate(raw: ConfigFile) -> Result<Self, ConfigError> {
        let alert_cooldown = raw
            .alert_cooldown
            .map(Duration::from_secs)
            .ok_or_else(|| ConfigError::Missing("alert_cooldown".to_string()))?;

        let check_interval = match raw.check_interval {
            0 => DEFAULT_CHECK_INTERVAL,
            secs => Duration::from_secs(secs),
        };

        let request_timeout = match raw.request_timeout {
            None | Some(0) => DEFAULT_REQUEST_TIMEOUT,
            Some(secs) => Duration::from_secs(secs),
        };

        let telegram = if raw.telegram.bot_token.is_empty() {
            None
        } else if raw.telegram.chat_id == 0 {
            return Err(ConfigError::Invalid(
                "telegram chat ID is required when bot token is provided".to_string(),
            ));
        } else {
            Some(TelegramConfig {
                bot_token: raw.telegram.bot_token,
                chat_id: raw.telegram.chat_id,
            })
        };

        let addresses = raw
            .addresses
            .into_iter()
            .enumerate()
            .map(|(i, group)| {
                let name = default_name(group.name, "Address Group", i);
                if group.rest_endpoint.is_empty() {
                    return Err(ConfigError::Invalid(format!(
                        "REST endpoint is required for address group '{}'",
                        name
                    )));
                }
                let addresses = group
                    .addresses
                    .into_iter()
                    .enumerate()
                    .map(|(j, item)| validate_address(item, j, &name))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(AddressGroup {
                    name,
                    rest_endpoint: group.rest_endpoint,
                    addresses,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let metrics = raw
            .metrics
            .into_iter()
            .enumerate()
            .map(|(i, group)| {
                let name = default_name(group.name, "Metric Group", i);
                if group.rest_endpoint.is_empty() {
                    return Err(ConfigError::Invalid(format!(
                        "REST endpoint is required for metric group '{}'",
                        name
                    )));
                }
                let metrics = group
                    .metrics
                    .into_iter()
                    .enumerate()
                    .map(|(j, item)| {
                        if item.metric.is_empty() {
                            return Err(ConfigError::Invalid(format!(
                                "metric name is required for metric #{} in group '{}'",
                                j + 1,
                                name
                            )));
                        }
                        if !item.threshold.is_finite() {
                            return Err(ConfigError::Invalid(format!(
                                "threshold for metric '{}' in group '{}' must be a finite number",
                                item.metric, name
                            )));
                        }
                        Ok(MetricItem {
                            name: if item.name.is_empty() {
                                item.metric.clone()
                            } else {
                                item.name
                            },
                            metric: item.metric,
                            threshold: item.threshold,
                            alert_cooldown: cooldown(item.alert_cooldown),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(MetricGroup {
                    name,
                    rest_endpoint: group.rest_endpoint,
                    metrics,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let health = raw
            .health
            .into_iter()
            .enumerate()
            .map(|(i, group)| {
                let name = default_name(group.name, "Health Group", i);
                let endpoints = group
                    .endpoints
                    .into_iter()
                    .enumerate()
                    .map(|(j, item)| {
                        let item_name = default_name(item.name, "Endpoint", j);
                        if item.endpoint.is_empty() {
                            return Err(ConfigError::Invalid(format!(
                                "endpoint is required for '{}' in health group '{}'",
                                item_name, name
                            )));
                        }
                        Ok(HealthItem {
                            name: item_name,
                            endpoint: item.endpoint,
                            alert_cooldown: cooldown(item.alert_cooldown),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(HealthGroup { name, endpoints })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let validators = raw
            .validators
            .into_iter()
            .enumerate()
            .map(|(i, group)| {
                let name = default_name(group.name, "Validator Group", i);
                let nodes = group
                    .nodes
                    .into_iter()
                    .enumerate()
                    .map(|(j, item)| {
                        let item_name = default_name(item.name, "Validator", j);
                        if item.url.is_empty() {
                            return Err(ConfigError::Invalid(format!(
                                "url is required for '{}' in validator group '{}'",
                                item_name, name
                            )));
                        }
                        Ok(ValidatorItem {
                            name: item_name,
                            url: item.url,
                            alert_cooldown: cooldown(item.alert_cooldown),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(ValidatorGroup { name, nodes })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let config = Self {
            check_interval,
            alert_cooldown,
            request_timeout,
            telegram,
            addresses,
            metrics,
            health,
            validators,
        };

        if config.addresses.is_empty()
            && config.metrics.is_empty()
            && config.health.is_empty()
            && config.validators.is_empty()
        {
            return Err(ConfigError::NothingToMonitor);
        }

        Ok(config)
    }
}

fn validate_address(
    item: file::AddressFile,
    index: usize,
    group: &str,
) -> Result<AddressItem, ConfigError> {
    if item.address.is_empty() {
        return Err(ConfigError::Invalid(format!(
            "address is required for address item #{} in group '{}'",
            index + 1,
            group
        )));
    }
    if item.threshold.denom.is_empty() {
        return Err(ConfigError::Invalid(format!(
            "threshold denom is required for address '{}' in group '{}'",
            item.address, group
        )));
    }
    if item.threshold.amount.is_empty() {
        return Err(ConfigError::Invalid(format!(
            "threshold amount is required for address '{}' in group '{}'",
            item.address, group
        )));
    }
    let threshold = item.threshold.amount.parse::<BigUint>().map_err(|_| {
        ConfigError::Invalid(format!(
            "invalid threshold amount for address '{}' in group '{}': {}",
            item.address, group, item.threshold.amount
        ))
    })?;

    Ok(AddressItem {
        name: default_name(item.name, "Wallet", index),
        address: item.address,
        denom: item.threshold.denom,
        threshold,
        alert_cooldown: cooldown(item.alert_cooldown),
    })
}

fn default_name(name: String, prefix: &str, index: usize) -> String {
    if name.is_empty() {
        format!("{} {}", prefix, index + 1)
    } else {
        name
    }
}

fn cooldown(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// Configuration errors, all fatal at startup
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("error reading config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error parsing config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("missing required setting: {0}")]
    Missing(String),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("no addresses, metrics, health endpoints or validators configured to monitor")]
    NothingToMonitor,
}
