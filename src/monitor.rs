//! Monitor: ties a message store, the analyzers and a sink together.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};
use twinwatch_types::WifiMessage;

use crate::analysis::{CrashDetector, DelayDetector};
use crate::settings::Settings;
use crate::sink::NotificationSink;
use crate::source::DataSource;
use crate::store::{InMemoryStore, MessageStore};

/// Outcome of one analysis cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    /// Devices with at least one retained report.
    pub devices: usize,
    /// Devices in the live set.
    pub live_devices: usize,
    /// Live devices reporting as AP_STA.
    pub ap_nodes: usize,
    /// Delay warnings raised this cycle.
    pub delay_warnings: usize,
    /// Crash errors raised this cycle.
    pub crash_errors: usize,
}

impl CycleReport {
    /// Total notifications raised this cycle.
    pub fn total(&self) -> usize {
        self.delay_warnings + self.crash_errors
    }
}

/// Runs both analyzers over a message store.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use chrono::{TimeZone, Utc};
/// use twinwatch::{MemorySink, Monitor, Settings};
/// use twinwatch_types::WifiMessage;
///
/// let sink = Arc::new(MemorySink::new());
/// let monitor = Monitor::from_settings(&Settings::default(), sink.clone());
///
/// let at = |ms| Utc.timestamp_millis_opt(ms).unwrap();
/// monitor.ingest([
///     WifiMessage::builder("node-1", at(0)).build(),
///     WifiMessage::builder("node-1", at(4_000)).build(),
/// ]);
///
/// let report = monitor.run_cycle();
/// assert_eq!(report.delay_warnings, 1);
/// assert_eq!(sink.len(), 1);
/// ```
pub struct Monitor {
    store: Box<dyn MessageStore>,
    delays: DelayDetector,
    crashes: CrashDetector,
    sink: Arc<dyn NotificationSink>,
}

impl Monitor {
    /// Create a monitor from its parts.
    pub fn new(
        store: Box<dyn MessageStore>,
        delays: DelayDetector,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            store,
            delays,
            crashes: CrashDetector::new(),
            sink,
        }
    }

    /// Create a monitor with an in-memory store configured from `settings`.
    pub fn from_settings(settings: &Settings, sink: Arc<dyn NotificationSink>) -> Self {
        let mut store = InMemoryStore::new().with_max_history(settings.max_history);
        if let Some(window) = settings.live_window() {
            store = store.with_live_window(window);
        }
        let delays = DelayDetector::new(settings.delay_threshold_ms, settings.watermark_scope);
        Self::new(Box::new(store), delays, sink)
    }

    /// The underlying store.
    pub fn store(&self) -> &dyn MessageStore {
        self.store.as_ref()
    }

    /// The delay detector, for inspecting its watermark.
    pub fn delay_detector(&self) -> &DelayDetector {
        &self.delays
    }

    /// Append reports to the store. Returns how many were appended.
    pub fn ingest<I>(&self, messages: I) -> usize
    where
        I: IntoIterator<Item = WifiMessage>,
    {
        let mut count = 0;
        for message in messages {
            self.store.append(message);
            count += 1;
        }
        count
    }

    /// Run delay detection for every device, then crash detection once over
    /// the live set.
    pub fn run_cycle(&self) -> CycleReport {
        let mut report = CycleReport::default();

        for mac in self.store.devices() {
            let history = self.store.history(&mac);
            report.delay_warnings += self.delays.detect_delays(&history, self.sink.as_ref());
            report.devices += 1;
        }

        let live = self.store.live_messages();
        report.live_devices = live.len();
        report.ap_nodes = live.iter().filter(|m| m.is_access_point()).count();
        report.crash_errors = self.crashes.detect_crashes(&live, self.sink.as_ref());

        if report.total() > 0 {
            info!(
                devices = report.devices,
                live = report.live_devices,
                delay_warnings = report.delay_warnings,
                crash_errors = report.crash_errors,
                "Analysis cycle raised notifications"
            );
        } else {
            debug!(
                devices = report.devices,
                live = report.live_devices,
                "Analysis cycle clean"
            );
        }

        report
    }

    /// Poll `source` and, if it produced reports, ingest them and run a cycle.
    pub fn step(&self, source: &mut dyn DataSource) -> Option<CycleReport> {
        let batch = source.poll();
        if let Some(error) = source.error() {
            warn!("{}: {}", source.description(), error);
        }

        let batch = batch?;
        let ingested = self.ingest(batch);
        debug!("Ingested {} messages from {}", ingested, source.description());
        Some(self.run_cycle())
    }
}

impl std::fmt::Debug for Monitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Monitor")
            .field("devices", &self.store.devices().len())
            .field("delays", &self.delays)
            .finish()
    }
}
