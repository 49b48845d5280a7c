//! Notification records raised by the stability analyzers.

use chrono::{DateTime, Utc};

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum NotificationType {
    Info,
    Warning,
    Error,
}

impl NotificationType {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            NotificationType::Info => "INFO",
            NotificationType::Warning => "WARN",
            NotificationType::Error => "ERROR",
        }
    }
}

/// Which analyzer condition produced a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum NotificationKind {
    /// Two consecutive reports from a device arrived closer than the delay threshold.
    Threshold,
    /// A peer claimed by an access point has no live report.
    Crash,
}

/// A notification handed to a sink.
///
/// Created by an analyzer, delivered once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Notification {
    pub kind: NotificationKind,

    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub notification_type: NotificationType,

    /// Human readable description, embedding the offending device identifier.
    pub message: String,

    /// Timestamp of the report that triggered the notification.
    pub observed_at: DateTime<Utc>,
}

impl Notification {
    /// Delay threshold violation for `mac`, `delta_ms` apart.
    pub fn threshold(mac: &str, delta_ms: i64, observed_at: DateTime<Utc>) -> Self {
        Self {
            kind: NotificationKind::Threshold,
            notification_type: NotificationType::Warning,
            message: format!("Device ({}) above delay threshold: {}", mac, delta_ms),
            observed_at,
        }
    }

    /// Possible crash of the peer `address`.
    pub fn crash(address: &str, observed_at: DateTime<Utc>) -> Self {
        Self {
            kind: NotificationKind::Crash,
            notification_type: NotificationType::Error,
            message: format!("Possible crash on device: {}", address),
            observed_at,
        }
    }
}

impl core::fmt::Display for Notification {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "[{}] {} {}",
            self.notification_type.symbol(),
            self.observed_at.to_rfc3339(),
            self.message
        )
    }
}
