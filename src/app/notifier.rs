use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

#[derive(Debug)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub expires_at: Instant,
}

/// Transient toasts shown in the bottom-right corner of the viewer.
#[derive(Debug, Default)]
pub struct Notifier {
    notifications: VecDeque<Notification>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.add(message.into(), NotificationKind::Success, 3);
    }

    pub fn info(&mut self, message: impl Into<String>, duration_secs: u64) {
        self.add(message.into(), NotificationKind::Info, duration_secs);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.add(message.into(), NotificationKind::Error, 3);
    }

    pub fn recent(&self) -> Option<&Notification> {
        self.notifications.back()
    }

    pub fn prune_expired(&mut self, now: Instant) {
        self.notifications.retain(|n| n.expires_at > now);
    }

    fn add(&mut self, message: String, kind: NotificationKind, duration_secs: u64) {
        let expires_at = Instant::now() + Duration::from_secs(duration_secs);
        self.notifications.push_back(Notification {
            message,
            kind,
            expires_at,
        });
    }
}
