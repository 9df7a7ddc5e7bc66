//! On-disk YAML layout, before defaults and validation

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub check_interval: u64,
    pub alert_cooldown: Option<u64>,
    pub request_timeout: Option<u64>,
    #[serde(default)]
    pub telegram: TelegramFile,
    #[serde(default)]
    pub addresses: Vec<AddressGroupFile>,
    #[serde(default)]
    pub metrics: Vec<MetricGroupFile>,
    #[serde(default)]
    pub health: Vec<HealthGroupFile>,
    #[serde(default)]
    pub validators: Vec<ValidatorGroupFile>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TelegramFile {
    #[serde(default)]
    pub bot_token: String,
    #[serde(default)]
    pub chat_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct AddressGroupFile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rest_endpoint: String,
    #[serde(default)]
    pub addresses: Vec<AddressFile>,
}

#[derive(Debug, Deserialize)]
pub struct AddressFile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub alert_cooldown: u64,
    #[serde(default)]
    pub threshold: ThresholdFile,
}

#[derive(Debug, Default, Deserialize)]
pub struct ThresholdFile {
    #[serde(default)]
    pub denom: String,
    #[serde(default)]
    pub amount: String,
}

#[derive(Debug, Deserialize)]
pub struct MetricGroupFile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rest_endpoint: String,
    #[serde(default)]
    pub metrics: Vec<MetricFile>,
}

#[derive(Debug, Deserialize)]
pub struct MetricFile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub metric: String,
    pub threshold: f64,
    #[serde(default)]
    pub alert_cooldown: u64,
}

#[derive(Debug, Deserialize)]
pub struct HealthGroupFile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub endpoints: Vec<HealthFile>,
}

#[derive(Debug, Deserialize)]
pub struct HealthFile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub alert_cooldown: u64,
}

#[derive(Debug, Deserialize)]
pub struct ValidatorGroupFile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<ValidatorFile>,
}

#[derive(Debug, Deserialize)]
pub struct ValidatorFile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub alert_cooldown: u64,
}
