//! In-memory message store.

use std::collections::{BTreeMap, VecDeque};

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::RwLock;
use twinwatch_types::WifiMessage;

use super::MessageStore;

/// Default number of reports retained per device.
pub const DEFAULT_MAX_HISTORY: usize = 1000;

/// Thread-safe in-memory store keyed by device identifier.
///
/// Reports are kept in arrival order, capped at `max_history` per device
/// (oldest dropped first).
///
/// A device is live when its latest report lies within `live_window` of the
/// newest report held for any device. Without a window every known device
/// is live.
#[derive(Debug)]
pub struct InMemoryStore {
    devices: RwLock<BTreeMap<String, VecDeque<WifiMessage>>>,
    max_history: usize,
    live_window: Option<TimeDelta>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Create an empty store with default retention and no live window.
    pub fn new() -> Self {
        Self {
            devices: RwLock::new(BTreeMap::new()),
            max_history: DEFAULT_MAX_HISTORY,
            live_window: None,
        }
    }

    /// Retain at most `max_history` reports per device (minimum 1).
    pub fn with_max_history(mut self, max_history: usize) -> Self {
        self.max_history = max_history.max(1);
        self
    }

    /// Only treat devices as live if they reported within `window`.
    pub fn with_live_window(mut self, window: TimeDelta) -> Self {
        self.live_window = Some(window);
        self
    }

    /// Total number of retained reports.
    pub fn len(&self) -> usize {
        self.devices.read().values().map(VecDeque::len).sum()
    }

    /// Whether no reports are held.
    pub fn is_empty(&self) -> bool {
        self.devices.read().is_empty()
    }
}

impl MessageStore for InMemoryStore {
    fn append(&self, message: WifiMessage) {
        let mut devices = self.devices.write();
        let history = devices.entry(message.mac.clone()).or_default();
        history.push_back(message);
        while history.len() > self.max_history {
            history.pop_front();
        }
    }

    fn latest(&self, mac: &str) -> Option<WifiMessage> {
        self.devices.read().get(mac)?.back().cloned()
    }

    fn history(&self, mac: &str) -> Vec<WifiMessage> {
        self.devices
            .read()
            .get(mac)
            .map(|h| h.iter().rev().cloned().collect())
            .unwrap_or_default()
    }

    fn devices(&self) -> Vec<String> {
        self.devices.read().keys().cloned().collect()
    }

    fn live_messages(&self) -> Vec<WifiMessage> {
        let devices = self.devices.read();
        let latest: Vec<&WifiMessage> = devices.values().filter_map(|h| h.back()).collect();

        let Some(window) = self.live_window else {
            return latest.into_iter().cloned().collect();
        };

        let Some(newest) = latest.iter().map(|m| m.timestamp).max() else {
            return Vec::new();
        };
        let cutoff = newest
            .checked_sub_signed(window)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        latest
            .into_iter()
            .filter(|m| m.timestamp >= cutoff)
            .cloned()
            .collect()
    }
}
