//! In-memory sink.

use parking_lot::Mutex;
use twinwatch_types::{Notification, NotificationKind};

use super::NotificationSink;

/// Collects notifications in memory.
///
/// Used by the export mode and by tests that inspect what was raised.
#[derive(Debug, Default)]
pub struct MemorySink {
    notifications: Mutex<Vec<Notification>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything received so far, in arrival order.
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().clone()
    }

    /// Drain everything received so far.
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.notifications.lock())
    }

    /// Number of notifications held.
    pub fn len(&self) -> usize {
        self.notifications.lock().len()
    }

    /// Whether no notifications are held.
    pub fn is_empty(&self) -> bool {
        self.notifications.lock().is_empty()
    }

    /// Number of held notifications of `kind`.
    pub fn count(&self, kind: NotificationKind) -> usize {
        self.notifications
            .lock()
            .iter()
            .filter(|n| n.kind == kind)
            .count()
    }
}

impl NotificationSink for MemorySink {
    fn save_notification(&self, notification: Notification) {
        self.notifications.lock().push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn keeps_arrival_order() {
        let sink = MemorySink::new();
        let at = Utc.timestamp_millis_opt(0).unwrap();
        sink.save_notification(Notification::crash("a", at));
        sink.save_notification(Notification::threshold("b", 10, at));

        let all = sink.notifications();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].kind, NotificationKind::Crash);
        assert_eq!(all[1].kind, NotificationKind::Threshold);
        assert_eq!(sink.count(NotificationKind::Crash), 1);
    }

    #[test]
    fn take_drains() {
        let sink = MemorySink::new();
        let at = Utc.timestamp_millis_opt(0).unwrap();
        sink.save_notification(Notification::crash("a", at));

        assert_eq!(sink.take().len(), 1);
        assert!(sink.is_empty());
    }
}
