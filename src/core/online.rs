//! Connectivity state as an owned, injectable service.
//!
//! The monitor is the single writer of the process-wide online/offline
//! state. Consumers either take a snapshot or subscribe to the watch
//! channel; the orchestrator uses the latter to refresh rates when the
//! connection comes back.

use chrono::Utc;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OnlineState {
    pub online: bool,
    /// Epoch milliseconds of the last transition; `None` until the first.
    pub last_changed_at: Option<i64>,
}

pub struct OnlineMonitor {
    sender: watch::Sender<OnlineState>,
}

impl OnlineMonitor {
    pub fn new(initial_online: bool) -> Self {
        let (sender, _) = watch::channel(OnlineState {
            online: initial_online,
            last_changed_at: None,
        });
        Self { sender }
    }

    pub fn state(&self) -> OnlineState {
        *self.sender.borrow()
    }

    pub fn is_online(&self) -> bool {
        self.sender.borrow().online
    }

    /// Record a connectivity change. Repeated signals with the same value
    /// do not move the transition timestamp or wake subscribers.
    pub fn set_online(&self, online: bool) {
        self.sender.send_if_modified(|state| {
            if state.online == online {
                return false;
            }
            state.online = online;
            state.last_changed_at = Some(Utc::now().timestamp_millis());
            true
        });
    }

    pub fn subscribe(&self) -> watch::Receiver<OnlineState> {
        self.sender.subscribe()
    }
}
