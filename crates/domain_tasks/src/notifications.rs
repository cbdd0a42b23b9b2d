//! User-visible notifications
//!
//! The dashboard surfaces every outcome of a backend operation as a transient,
//! non-blocking notification. How they are presented (toast, terminal line)
//! is up to the [`Notifier`] implementation.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A transient message for the user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
    /// The user can re-trigger the operation that failed
    pub retryable: bool,
    pub raised_at: DateTime<Utc>,
}

impl Notification {
    fn new(level: NotificationLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
            retryable: false,
            raised_at: Utc::now(),
        }
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, title, message)
    }

    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, title, message)
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Warning, title, message)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, title, message)
    }

    /// Marks the notification as offering a retry
    pub fn retryable(mut self) -> Self {
        self.retryable = true;
        self
    }
}

/// Sink for user-visible notifications
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// In-memory notification queue
///
/// Front ends drain it after each user action; tests inspect it directly.
#[derive(Debug, Default)]
pub struct NotificationQueue {
    pending: Mutex<Vec<Notification>>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns all pending notifications, oldest first
    pub fn drain(&self) -> Vec<Notification> {
        match self.pending.lock() {
            Ok(mut pending) => std::mem::take(&mut *pending),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    /// Copies the pending notifications without removing them
    pub fn snapshot(&self) -> Vec<Notification> {
        match self.pending.lock() {
            Ok(pending) => pending.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        match self.pending.lock() {
            Ok(pending) => pending.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for NotificationQueue {
    fn notify(&self, notification: Notification) {
        match self.pending.lock() {
            Ok(mut pending) => pending.push(notification),
            Err(poisoned) => poisoned.into_inner().push(notification),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_drains_in_order() {
        let queue = NotificationQueue::new();
        queue.notify(Notification::info("Loaded", "5 tasks"));
        queue.notify(Notification::error("Generation failed", "backend down").retryable());

        assert_eq!(queue.len(), 2);
        let drained = queue.drain();
        assert_eq!(drained[0].level, NotificationLevel::Info);
        assert!(drained[1].retryable);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_len_counts_pending_without_draining() {
        let queue = NotificationQueue::new();
        assert!(queue.is_empty());

        queue.notify(Notification::warning("Nothing to execute", "Approve a task first."));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.drain().len(), 1);
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn test_constructors_default_to_not_retryable() {
        assert!(!Notification::success("Done", "ok").retryable);
        assert_eq!(Notification::warning("Nothing approved", "").level, NotificationLevel::Warning);
    }
}
