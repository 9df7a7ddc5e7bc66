//! Scripted checks and recording channels for tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::check::{Check, Observation, RecoveryPolicy};
use super::notifier::{NotifyChannel, NotifyError};
use crate::fetch::FetchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    Healthy,
    Breached,
    Failed,
}

/// Check whose observations are set by the test
pub struct ScriptedCheck {
    name: String,
    policy: RecoveryPolicy,
    cooldown: Option<Duration>,
    delay: Duration,
    script: Mutex<Script>,
    probes: AtomicUsize,
}

impl ScriptedCheck {
    pub fn new(name: &str, policy: RecoveryPolicy) -> Self {
        Self {
            name: name.to_string(),
            policy,
            cooldown: None,
            delay: Duration::ZERO,
            script: Mutex::new(Script::Healthy),
            probes: AtomicUsize::new(0),
        }
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = Some(cooldown);
        self
    }

    /// Sleep this long inside every probe
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn set(&self, script: Script) {
        *self.script.lock() = script;
    }

    pub fn probes(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Check for ScriptedCheck {
    const KIND: &'static str = "scripted";

    fn name(&self) -> &str {
        &self.name
    }

    fn recovery(&self) -> RecoveryPolicy {
        self.policy
    }

    fn cooldown(&self) -> Option<Duration> {
        self.cooldown
    }

    async fn observe(&self) -> Observation {
        self.probes.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let script = *self.script.lock();
        match script {
            Script::Healthy => Observation::Healthy {
                summary: format!("{} ok", self.name),
            },
            Script::Breached => Observation::Breached {
                summary: format!("{} breached", self.name),
                detail: "Got: too much".to_string(),
            },
            Script::Failed => {
                Observation::Failed(FetchError::Network("connection refused".to_string()))
            }
        }
    }

    fn alert_message(&self, group: &str, detail: &str) -> String {
        format!("ALERT [{}] {}: {}", group, self.name, detail)
    }

    fn recovery_message(&self, group: &str, summary: &str) -> String {
        format!("RECOVERED [{}] {}: {}", group, self.name, summary)
    }
}

/// Channel that keeps every message it is asked to send
#[derive(Default)]
pub struct RecordingChannel {
    sent: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingChannel {
    /// A channel that records and then reports failure
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().clone()
    }

    pub fn count_prefix(&self, prefix: &str) -> usize {
        self.sent.lock().iter().filter(|m| m.starts_with(prefix)).count()
    }
}

#[async_trait]
impl NotifyChannel for RecordingChannel {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        self.sent.lock().push(text.to_string());
        if self.fail {
            return Err(NotifyError::Http("channel down".to_string()));
        }
        Ok(())
    }
}
