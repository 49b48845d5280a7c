//! Crash detection over the live message set.

use std::collections::HashSet;

use tracing::debug;
use twinwatch_types::{Notification, WifiMessage};

use crate::sink::NotificationSink;

/// Find peers claimed by AP_STA nodes that have no live message.
///
/// `live` holds one message per live device, in any order. Every claimed
/// address missing from the live set yields its own error, so a node missing
/// three peers produces three notifications.
pub fn scan_crashes(live: &[WifiMessage]) -> Vec<Notification> {
    let live_addresses: HashSet<&str> = live.iter().map(|m| m.mac.as_str()).collect();

    live.iter()
        .filter(|node| node.is_access_point())
        .flat_map(|node| {
            let live_addresses = &live_addresses;
            node.wifi_data
                .address_list
                .iter()
                .filter(move |address| !live_addresses.contains(address.as_str()))
                .map(move |address| Notification::crash(address, node.timestamp))
        })
        .collect()
}

/// Detects access-point peers that disappeared from the live set.
///
/// Stateless: every call is computed from the snapshot it is given.
#[derive(Debug, Default, Clone, Copy)]
pub struct CrashDetector;

impl CrashDetector {
    /// Create a detector.
    pub fn new() -> Self {
        Self
    }

    /// Run [`scan_crashes`] and hand every error to `sink`.
    /// Returns the number of errors raised.
    pub fn detect_crashes<S>(&self, live_messages: &[WifiMessage], sink: &S) -> usize
    where
        S: NotificationSink + ?Sized,
    {
        let notifications = scan_crashes(live_messages);
        let count = notifications.len();

        if count > 0 {
            debug!(count, live = live_messages.len(), "Missing access point peers");
        }
        for notification in notifications {
            sink.save_notification(notification);
        }

        count
    }
}
