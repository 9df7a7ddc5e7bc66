//! Per-item alert state
//!
//! Both actors that touch an item, its group loop and its recovery watcher,
//! go through the single lock in [`AlertState`]. The lock is never held
//! across an await point.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::check::RecoveryPolicy;

/// Watcher lifecycle of an item
#[derive(Debug, Default)]
pub enum Health {
    #[default]
    Healthy,
    /// A recovery watcher is running and stops when `stop` is cancelled
    Unhealthy { stop: CancellationToken },
}

#[derive(Debug, Default)]
struct Inner {
    last_alert: Option<Instant>,
    health: Health,
}

/// Outcome of the cooldown gate for a breached item
#[derive(Debug)]
pub enum Fire {
    /// Still inside the cooldown window
    Suppressed { remaining: Duration },
    /// Alert now; `watcher` is set when this alert opened an unhealthy period
    Alert { watcher: Option<CancellationToken> },
}

/// Mutable state of one monitored item
#[derive(Debug, Default)]
pub struct AlertState {
    inner: Mutex<Inner>,
}

impl AlertState {
    /// Healthy state with no prior alert
    pub fn new() -> Self {
        Self::default()
    }

    /// When the item last alerted, if ever
    pub fn last_alert(&self) -> Option<Instant> {
        self.inner.lock().last_alert
    }

    /// Whether a recovery watcher is currently running
    pub fn is_unhealthy(&self) -> bool {
        matches!(self.inner.lock().health, Health::Unhealthy { .. })
    }

    /// Apply the cooldown gate to a breach observed at `now`.
    ///
    /// On alert the last-alert time moves to `now`. If the policy uses a
    /// watcher and none is running, the item becomes unhealthy and a child
    /// of `shutdown` is returned as the new watcher's stop token.
    pub fn fire(
        &self,
        now: Instant,
        cooldown: Duration,
        policy: RecoveryPolicy,
        shutdown: &CancellationToken,
    ) -> Fire {
        let mut inner = self.inner.lock();

        if let Some(last) = inner.last_alert {
            let elapsed = now.saturating_duration_since(last);
            if elapsed < cooldown {
                return Fire::Suppressed {
                    remaining: cooldown - elapsed,
                };
            }
        }

        inner.last_alert = Some(now);

        let opens_period =
            policy == RecoveryPolicy::Watched && matches!(inner.health, Health::Healthy);
        let watcher = opens_period.then(|| {
            let stop = shutdown.child_token();
            inner.health = Health::Unhealthy { stop: stop.clone() };
            stop
        });

        Fire::Alert { watcher }
    }

    /// Leave the unhealthy state. Returns false if the item was not unhealthy.
    ///
    /// Recovery also clears the last-alert time, so the next breach opens a
    /// new unhealthy period with an immediate alert.
    pub fn recover(&self) -> bool {
        let mut inner = self.inner.lock();
        match std::mem::take(&mut inner.health) {
            Health::Unhealthy { .. } => {
                inner.last_alert = None;
                true
            }
            Health::Healthy => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COOLDOWN: Duration = Duration::from_secs(60);

    #[tokio::test(start_paused = true)]
    async fn test_first_breach_alerts_and_opens_watcher() {
        let state = AlertState::new();
        let shutdown = CancellationToken::new();

        let fire = state.fire(Instant::now(), COOLDOWN, RecoveryPolicy::Watched, &shutdown);
        assert!(matches!(fire, Fire::Alert { watcher: Some(_) }));
        assert!(state.is_unhealthy());
        assert!(state.last_alert().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cooldown_window() {
        let state = AlertState::new();
        let shutdown = CancellationToken::new();
        let start = Instant::now();

        state.fire(start, COOLDOWN, RecoveryPolicy::CooldownOnly, &shutdown);

        match state.fire(
            start + Duration::from_secs(20),
            COOLDOWN,
            RecoveryPolicy::CooldownOnly,
            &shutdown,
        ) {
            Fire::Suppressed { remaining } => assert_eq!(remaining, Duration::from_secs(40)),
            other => panic!("expected suppression, got {:?}", other),
        }

        let fire = state.fire(
            start + COOLDOWN,
            COOLDOWN,
            RecoveryPolicy::CooldownOnly,
            &shutdown,
        );
        assert!(matches!(fire, Fire::Alert { watcher: None }));
        assert_eq!(state.last_alert(), Some(start + COOLDOWN));
    }

    #[tokio::test(start_paused = true)]
    async fn test_realert_keeps_single_watcher() {
        let state = AlertState::new();
        let shutdown = CancellationToken::new();
        let start = Instant::now();

        state.fire(start, COOLDOWN, RecoveryPolicy::Watched, &shutdown);
        let fire = state.fire(start + COOLDOWN, COOLDOWN, RecoveryPolicy::Watched, &shutdown);
        assert!(matches!(fire, Fire::Alert { watcher: None }));
        assert!(state.is_unhealthy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cooldown_only_never_unhealthy() {
        let state = AlertState::new();
        let shutdown = CancellationToken::new();

        state.fire(Instant::now(), COOLDOWN, RecoveryPolicy::CooldownOnly, &shutdown);
        assert!(!state.is_unhealthy());
        assert!(!state.recover());
    }

    #[tokio::test(start_paused = true)]
    async fn test_recover_once() {
        let state = AlertState::new();
        let shutdown = CancellationToken::new();

        state.fire(Instant::now(), COOLDOWN, RecoveryPolicy::Watched, &shutdown);
        assert!(state.recover());
        assert!(!state.recover());
        assert!(!state.is_unhealthy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovery_reopens_cooldown_gate() {
        let state = AlertState::new();
        let shutdown = CancellationToken::new();
        let start = Instant::now();
        let cooldown = Duration::from_secs(3600);

        state.fire(start, cooldown, RecoveryPolicy::Watched, &shutdown);
        assert!(state.recover());
        assert!(state.last_alert().is_none());

        let fire = state.fire(
            start + Duration::from_secs(5),
            cooldown,
            RecoveryPolicy::Watched,
            &shutdown,
        );
        assert!(matches!(fire, Fire::Alert { watcher: Some(_) }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cooldown_only_keeps_last_alert() {
        let state = AlertState::new();
        let shutdown = CancellationToken::new();
        let start = Instant::now();

        state.fire(start, COOLDOWN, RecoveryPolicy::CooldownOnly, &shutdown);
        assert!(!state.recover());
        assert_eq!(state.last_alert(), Some(start));
    }

    #[tokio::test(start_paused = true)]
    async fn test_watcher_token_follows_shutdown() {
        let state = AlertState::new();
        let shutdown = CancellationToken::new();

        let stop = match state.fire(Instant::now(), COOLDOWN, RecoveryPolicy::Watched, &shutdown) {
            Fire::Alert { watcher: Some(stop) } => stop,
            other => panic!("expected a watcher token, got {:?}", other),
        };
        assert!(!stop.is_cancelled());
        shutdown.cancel();
        assert!(stop.is_cancelled());
    }
}
