//! Notification sinks.
//!
//! The analyzers hand every notification they raise to a [`NotificationSink`].
//! Delivery and storage are the sink's business: a sink never reports failure
//! back to the analyzer, it logs and moves on.

mod channel;
mod json_lines;
mod memory;

pub use channel::ChannelSink;
pub use json_lines::JsonLinesSink;
pub use memory::MemorySink;

use std::sync::Arc;

use twinwatch_types::Notification;

/// Destination for notifications raised by the analyzers.
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use twinwatch::{MemorySink, NotificationSink};
/// use twinwatch_types::Notification;
///
/// let sink = MemorySink::new();
/// sink.save_notification(Notification::crash("aa:bb", Utc::now()));
/// assert_eq!(sink.len(), 1);
/// ```
pub trait NotificationSink: Send + Sync {
    /// Accept a notification. Must not block the caller for long.
    fn save_notification(&self, notification: Notification);
}

impl<S: NotificationSink + ?Sized> NotificationSink for Arc<S> {
    fn save_notification(&self, notification: Notification) {
        (**self).save_notification(notification)
    }
}

impl<S: NotificationSink + ?Sized> NotificationSink for &S {
    fn save_notification(&self, notification: Notification) {
        (**self).save_notification(notification)
    }
}
