//! Channel sink for handing notifications to another task.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::warn;
use twinwatch_types::Notification;

use super::NotificationSink;

/// Forwards notifications over a bounded tokio channel.
///
/// Sends are best effort: when the channel is full or the receiver is gone,
/// the notification is dropped and logged rather than blocking the analyzer.
///
/// # Example
///
/// ```
/// use twinwatch::ChannelSink;
///
/// let (sink, mut rx) = ChannelSink::create(16);
/// // Later, on the consuming task:
/// // while let Some(notification) = rx.recv().await { ... }
/// ```
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::Sender<Notification>,
}

impl ChannelSink {
    /// Wrap an existing sender.
    pub fn new(sender: mpsc::Sender<Notification>) -> Self {
        Self { sender }
    }

    /// Create a channel with room for `buffer` notifications.
    pub fn create(buffer: usize) -> (Self, mpsc::Receiver<Notification>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self::new(tx), rx)
    }
}

impl NotificationSink for ChannelSink {
    fn save_notification(&self, notification: Notification) {
        match self.sender.try_send(notification) {
            Ok(()) => {}
            Err(TrySendError::Full(n)) => {
                warn!("Notification channel full, dropping: {}", n.message);
            }
            Err(TrySendError::Closed(n)) => {
                warn!("Notification channel closed, dropping: {}", n.message);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[tokio::test]
    async fn forwards_to_receiver() {
        let (sink, mut rx) = ChannelSink::create(4);
        let at = Utc.timestamp_millis_opt(0).unwrap();
        sink.save_notification(Notification::crash("B", at));

        let received = rx.recv().await.unwrap();
        assert_eq!(received.message, "Possible crash on device: B");
    }

    #[test]
    fn drops_when_full_without_blocking() {
        let (sink, mut rx) = ChannelSink::create(1);
        let at = Utc.timestamp_millis_opt(0).unwrap();
        sink.save_notification(Notification::crash("first", at));
        sink.save_notification(Notification::crash("second", at));

        assert_eq!(rx.try_recv().unwrap().message, "Possible crash on device: first");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn drops_when_receiver_closed() {
        let (sink, rx) = ChannelSink::create(1);
        drop(rx);
        let at = Utc.timestamp_millis_opt(0).unwrap();
        sink.save_notification(Notification::crash("gone", at));
    }
}
