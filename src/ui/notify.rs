use std::time::{Duration, Instant};

/// How long a notification stays on screen.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    expires_at: Instant,
}

/// Holds at most one visible notification.
///
/// A new notification replaces the current one along with its dismissal
/// deadline, so an older message's timer can never hide a newer message.
#[derive(Debug, Default)]
pub struct Notifier {
    current: Option<Notification>,
}

impl Notifier {
    pub fn show(&mut self, message: impl Into<String>, kind: NotificationKind, now: Instant) {
        self.current = Some(Notification {
            message: message.into(),
            kind,
            expires_at: now + NOTIFICATION_TTL,
        });
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.show(message, NotificationKind::Success, Instant::now());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.show(message, NotificationKind::Error, Instant::now());
    }

    /// Dismiss the notification once its deadline has passed.
    pub fn tick(&mut self, now: Instant) {
        if self.current.as_ref().is_some_and(|n| now >= n.expires_at) {
            self.current = None;
        }
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dismissed_after_ttl() {
        let start = Instant::now();
        let mut notifier = Notifier::default();

        notifier.show("Client added successfully", NotificationKind::Success, start);
        notifier.tick(start + Duration::from_millis(2999));
        assert_eq!(
            notifier.current().map(|n| n.message.as_str()),
            Some("Client added successfully")
        );

        notifier.tick(start + NOTIFICATION_TTL);
        assert!(notifier.current().is_none());
    }

    #[test]
    fn newer_notification_keeps_its_own_deadline() {
        let start = Instant::now();
        let mut notifier = Notifier::default();

        notifier.show("Editing client...", NotificationKind::Success, start);
        notifier.show(
            "Failed to save client",
            NotificationKind::Error,
            start + Duration::from_secs(2),
        );

        notifier.tick(start + Duration::from_secs(3));
        let current = notifier.current().unwrap();
        assert_eq!(current.message, "Failed to save client");
        assert_eq!(current.kind, NotificationKind::Error);

        notifier.tick(start + Duration::from_secs(5));
        assert!(notifier.current().is_none());
    }
}
