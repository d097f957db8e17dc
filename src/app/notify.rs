//! Toast notifications shown in the status line

use crate::api::Notifier;
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use std::collections::VecDeque;
use tracing::{info, warn};

/// Maximum number of toasts retained at once
const MAX_TOASTS: usize = 5;

/// Severity of a toast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    /// Something failed
    Error,
    /// Something succeeded
    Success,
}

/// A transient notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Severity
    pub level: ToastLevel,
    /// Message text
    pub message: String,
    /// When the toast was raised
    pub created_at: DateTime<Utc>,
}

/// Queue of toasts with a fixed time-to-live
#[derive(Debug)]
pub struct Toasts {
    queue: Mutex<VecDeque<Toast>>,
    ttl: Duration,
}

impl Default for Toasts {
    fn default() -> Self {
        Self::new(Duration::seconds(4))
    }
}

impl Toasts {
    /// Create an empty queue whose toasts live for `ttl`
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            ttl,
        }
    }

    fn push(&self, level: ToastLevel, message: &str) {
        let mut queue = self.queue.lock();
        if queue.len() == MAX_TOASTS {
            queue.pop_front();
        }
        queue.push_back(Toast {
            level,
            message: message.to_string(),
            created_at: Utc::now(),
        });
    }

    /// Drop toasts older than the TTL as of `now`
    pub fn prune(&self, now: DateTime<Utc>) {
        let ttl = self.ttl;
        self.queue.lock().retain(|t| now - t.created_at < ttl);
    }

    /// Toasts currently queued, oldest first
    #[must_use]
    pub fn all(&self) -> Vec<Toast> {
        self.queue.lock().iter().cloned().collect()
    }

    /// Most recent toast, if any
    #[must_use]
    pub fn latest(&self) -> Option<Toast> {
        self.queue.lock().back().cloned()
    }

    /// Remove every toast
    pub fn clear(&self) {
        self.queue.lock().clear();
    }
}

impl Notifier for Toasts {
    fn notify_error(&self, message: &str) {
        warn!("{message}");
        self.push(ToastLevel::Error, message);
    }

    fn notify_success(&self, message: &str) {
        info!("{message}");
        self.push(ToastLevel::Success, message);
    }
}
