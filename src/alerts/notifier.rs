//! Notification channels for alerts and recovery notices

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

const TELEGRAM_API: &str = "https://api.telegram.org";

/// A destination for alert text
#[async_trait]
pub trait NotifyChannel: Send + Sync {
    /// Get the name of this channel
    fn name(&self) -> &'static str;

    /// Deliver `text` to this channel
    async fn send(&self, text: &str) -> Result<(), NotifyError>;
}

/// Best-effort dispatcher used by the evaluator and the recovery watchers.
///
/// Without a channel every alert still reaches the log; `notify` then
/// succeeds without doing anything.
#[derive(Clone, Default)]
pub struct Notifier {
    channel: Option<Arc<dyn NotifyChannel>>,
}

impl Notifier {
    /// Log-only mode
    pub fn log_only() -> Self {
        Self { channel: None }
    }

    /// Deliver through `channel`
    pub fn new(channel: Arc<dyn NotifyChannel>) -> Self {
        Self {
            channel: Some(channel),
        }
    }

    /// Whether a channel is configured
    pub fn is_enabled(&self) -> bool {
        self.channel.is_some()
    }

    /// Send `text` to the configured channel, if any
    pub async fn notify(&self, text: &str) -> Result<(), NotifyError> {
        let Some(channel) = &self.channel else {
            return Ok(());
        };

        channel.send(text).await?;
        tracing::debug!(channel = channel.name(), "Notification sent");
        Ok(())
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("channel", &self.channel.as_ref().map(|c| c.name()))
            .finish()
    }
}

/// Telegram Bot API channel
pub struct TelegramChannel {
    client: reqwest::Client,
    api_base: String,
    bot_token: String,
    chat_id: i64,
}

#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl TelegramChannel {
    /// Build a channel posting to `chat_id` with requests bounded by `timeout`
    pub fn new(
        bot_token: impl Into<String>,
        chat_id: i64,
        timeout: Duration,
    ) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NotifyError::Http(e.to_string()))?;

        Ok(Self {
            client,
            api_base: TELEGRAM_API.to_string(),
            bot_token: bot_token.into(),
            chat_id,
        })
    }

    /// Point the channel at another Bot API server
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

#[async_trait]
impl NotifyChannel for TelegramChannel {
    fn name(&self) -> &'static str {
        "telegram"
    }

    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        let url = format!(
            "{}/bot{}/sendMessage",
            self.api_base.trim_end_matches('/'),
            self.bot_token
        );
        let payload = serde_json::json!({
            "chat_id": self.chat_id,
            "text": text,
            "parse_mode": "Markdown",
        });

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                NotifyError::Http(format!("Failed to reach Telegram: {}", e.without_url()))
            })?;

        let status = response.status();
        let body: Option<TelegramResponse> = response.json().await.ok();

        match body {
            Some(TelegramResponse { ok: true, .. }) if status.is_success() => Ok(()),
            Some(TelegramResponse { description, .. }) => Err(NotifyError::Rejected {
                status: status.as_u16(),
                description: description.unwrap_or_else(|| "no description".to_string()),
            }),
            None => Err(NotifyError::Rejected {
                status: status.as_u16(),
                description: "unparseable response".to_string(),
            }),
        }
    }
}

/// Escape text for Telegram's legacy Markdown mode.
///
/// Alert details carry text from monitored endpoints (error strings, body
/// excerpts, URLs). An unbalanced entity character there makes Telegram
/// reject the whole message.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '_' | '*' | '`' | '[') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Notifier errors
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Telegram rejected message (status {status}): {description}")]
    Rejected { status: u16, description: String },
}
