//! Device reports as produced by the ingestion pipeline.

use chrono::{DateTime, Utc};

/// A report from a single device.
///
/// Anything the analyzers scan must expose the reporting device's identifier
/// and the instant the report was taken. Implementors are immutable once built.
pub trait Message {
    /// Identifier of the reporting device (its MAC address).
    fn mac(&self) -> &str;

    /// Wall-clock instant of the report.
    fn timestamp(&self) -> DateTime<Utc>;
}

/// Radio mode a node was operating in when it reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum WifiMode {
    /// Radio off.
    #[default]
    Null,
    /// Client station only.
    Sta,
    /// Access point only.
    Ap,
    /// Access point and station at the same time.
    ApSta,
}

impl WifiMode {
    /// Returns the wire name of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            WifiMode::Null => "NULL",
            WifiMode::Sta => "STA",
            WifiMode::Ap => "AP",
            WifiMode::ApSta => "AP_STA",
        }
    }
}

impl core::fmt::Display for WifiMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wireless state carried by a [`WifiMessage`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct WifiData {
    /// Radio mode at report time.
    pub mode: WifiMode,

    /// Peers the node claims are currently associated with it.
    ///
    /// Order is preserved as reported; duplicates are kept.
    #[cfg_attr(feature = "serde", serde(default))]
    pub address_list: Vec<String>,
}

/// A device report with its wireless state.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct WifiMessage {
    /// Reporting device.
    pub mac: String,

    /// When the report was taken.
    pub timestamp: DateTime<Utc>,

    /// Radio mode and associated peers.
    pub wifi_data: WifiData,
}

impl WifiMessage {
    /// Create a message with an explicit wireless state.
    pub fn new(mac: impl Into<String>, timestamp: DateTime<Utc>, wifi_data: WifiData) -> Self {
        Self {
            mac: mac.into(),
            timestamp,
            wifi_data,
        }
    }

    /// Create a builder for a message from `mac` taken at `timestamp`.
    pub fn builder(mac: impl Into<String>, timestamp: DateTime<Utc>) -> WifiMessageBuilder {
        WifiMessageBuilder::new(mac, timestamp)
    }

    /// Whether the node reported as access point and station at once.
    pub fn is_access_point(&self) -> bool {
        self.wifi_data.mode == WifiMode::ApSta
    }
}

impl Message for WifiMessage {
    fn mac(&self) -> &str {
        &self.mac
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Builder for [`WifiMessage`].
#[derive(Debug)]
pub struct WifiMessageBuilder {
    mac: String,
    timestamp: DateTime<Utc>,
    data: WifiData,
}

impl WifiMessageBuilder {
    /// Create a new builder. The mode defaults to [`WifiMode::Null`].
    pub fn new(mac: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            mac: mac.into(),
            timestamp,
            data: WifiData::default(),
        }
    }

    /// Set the radio mode.
    pub fn mode(mut self, mode: WifiMode) -> Self {
        self.data.mode = mode;
        self
    }

    /// Append one associated peer.
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.data.address_list.push(address.into());
        self
    }

    /// Append several associated peers.
    pub fn addresses<I, S>(mut self, addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.data
            .address_list
            .extend(addresses.into_iter().map(Into::into));
        self
    }

    /// Build the message.
    pub fn build(self) -> WifiMessage {
        WifiMessage {
            mac: self.mac,
            timestamp: self.timestamp,
            wifi_data: self.data,
        }
    }
}
