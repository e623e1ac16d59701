//! Notification emitter.
//!
//! Notifications are fire-and-forget: emitting one never fails, and a sink
//! that drops it has no effect on the operation being reported.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;
use uuid::Uuid;

use crate::config::DEFAULT_NOTIFICATION_TTL;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationId(Uuid);

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub message: String,
    pub ttl: Duration,
    created_at: Instant,
}

impl Notification {
    pub fn expires_at(&self) -> Instant {
        self.created_at + self.ttl
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at()
    }
}

/// Where emitted notifications are rendered.
pub trait NotificationSink: Send + Sync + std::fmt::Debug {
    fn deliver(&self, notification: &Notification);
}

/// Renders notifications as log events.
#[derive(Debug, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn deliver(&self, notification: &Notification) {
        match notification.kind {
            NotificationKind::Error => tracing::error!("{}", notification.message),
            NotificationKind::Success | NotificationKind::Info => {
                tracing::info!("{}", notification.message)
            }
        }
    }
}

/// Emits notifications and tracks the ones still visible.
#[derive(Debug, Clone)]
pub struct Notifier {
    active: Arc<Mutex<Vec<Notification>>>,
    ttl: Duration,
    sink: Arc<dyn NotificationSink>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_TTL)
    }
}

impl Notifier {
    pub fn new(ttl: Duration) -> Self {
        Self::with_sink(ttl, Arc::new(TracingSink))
    }

    pub fn with_sink(ttl: Duration, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            active: Arc::new(Mutex::new(Vec::new())),
            ttl,
            sink,
        }
    }

    pub fn emit(&self, kind: NotificationKind, message: impl Into<String>) -> NotificationId {
        let now = Instant::now();
        let notification = Notification {
            id: NotificationId(Uuid::new_v4()),
            kind,
            message: message.into(),
            ttl: self.ttl,
            created_at: now,
        };
        let id = notification.id;

        self.sink.deliver(&notification);

        let mut active = self.active();
        active.retain(|n| !n.is_expired(now));
        active.push(notification);
        id
    }

    pub fn success(&self, message: impl Into<String>) -> NotificationId {
        self.emit(NotificationKind::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> NotificationId {
        self.emit(NotificationKind::Error, message)
    }

    pub fn info(&self, message: impl Into<String>) -> NotificationId {
        self.emit(NotificationKind::Info, message)
    }

    /// Dismiss a notification before it expires. Returns whether it was still
    /// visible.
    pub fn dismiss(&self, id: NotificationId) -> bool {
        let mut active = self.active();
        let before = active.len();
        active.retain(|n| n.id != id);
        active.len() != before
    }

    /// Notifications that are neither expired nor dismissed, oldest first.
    pub fn active_notifications(&self) -> Vec<Notification> {
        let now = Instant::now();
        let mut active = self.active();
        active.retain(|n| !n.is_expired(now));
        active.clone()
    }

    fn active(&self) -> MutexGuard<'_, Vec<Notification>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
