//! Per-item alert state machine
//!
//! The evaluator runs one poll of one item, gates alerts by cooldown and
//! starts a recovery watcher when an item with watcher support becomes
//! unhealthy. The watcher is the only place a recovery is announced.

pub mod check;
pub mod evaluator;
pub mod notifier;
pub mod state;
pub mod watcher;

#[cfg(test)]
pub(crate) mod testing;

pub use check::{effective_cooldown, Check, Observation, RecoveryPolicy};
pub use evaluator::{evaluate, MonitorContext, Monitored, Verdict};
pub use notifier::{escape_markdown, Notifier, NotifyChannel, NotifyError, TelegramChannel};
pub use state::{AlertState, Fire, Health};
pub use watcher::RECOVERY_INTERVAL;
