//! Transient user notifications.
//!
//! [`Notifier::notify`] publishes a message that clears itself after a fixed
//! window. A newer notification is never cleared by an older one's timer.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::watch;

use crate::config::TrackerConfig;

/// Default auto-clear window.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3);

/// Outcome a notification reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// The action succeeded.
    Success,
    /// The action failed.
    Error,
}

impl NotificationKind {
    /// Returns the kind as a lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A visible notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    sequence: u64,
    message: String,
    kind: NotificationKind,
}

impl Notification {
    /// Returns the notification text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the notification kind.
    #[must_use]
    pub const fn kind(&self) -> NotificationKind {
        self.kind
    }

    /// Returns the publication sequence number.
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }
}

#[derive(Debug)]
struct NotifierState {
    counter: AtomicU64,
    sender: watch::Sender<Option<Notification>>,
}

/// Publishes notifications and clears them after a window.
///
/// Clones share the same channel.
#[derive(Debug, Clone)]
pub struct Notifier {
    ttl: Duration,
    state: Arc<NotifierState>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl Notifier {
    /// Creates a notifier clearing messages after `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            ttl,
            state: Arc::new(NotifierState {
                counter: AtomicU64::new(0),
                sender,
            }),
        }
    }

    /// Creates a notifier using the configured window.
    #[must_use]
    pub fn from_config(config: &TrackerConfig) -> Self {
        Self::new(config.notification_ttl())
    }

    /// Returns the auto-clear window.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Shows `message`, replacing any current notification.
    ///
    /// The clear timer runs on the ambient Tokio runtime. Without one the
    /// notification stays until replaced.
    pub fn notify(&self, message: impl Into<String>, kind: NotificationKind) {
        let sequence = self
            .state
            .counter
            .fetch_add(1, Ordering::Relaxed)
            .wrapping_add(1);
        let notification = Notification {
            sequence,
            message: message.into(),
            kind,
        };
        tracing::debug!(sequence, kind = kind.as_str(), "notification shown");
        self.state.sender.send_replace(Some(notification));

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::debug!(sequence, "no runtime; notification will not auto-clear");
            return;
        };
        let state = Arc::clone(&self.state);
        let ttl = self.ttl;
        drop(handle.spawn(async move {
            tokio::time::sleep(ttl).await;
            state.sender.send_if_modified(|current| {
                let expired = current
                    .as_ref()
                    .is_some_and(|shown| shown.sequence == sequence);
                if expired {
                    *current = None;
                }
                expired
            });
        }));
    }

    /// Returns the notification currently shown.
    #[must_use]
    pub fn current(&self) -> Option<Notification> {
        self.state.sender.borrow().clone()
    }

    /// Subscribes to notification changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Notification>> {
        self.state.sender.subscribe()
    }
}
