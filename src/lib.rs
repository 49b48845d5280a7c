//! # twinwatch
//!
//! Stability monitoring for wireless device telemetry.
//!
//! Devices report periodically with their radio mode and, for access points,
//! the peers associated with them. This crate watches that stream and raises
//! two kinds of notifications:
//!
//! - **Delay warnings**: two consecutive reports from a device arrived closer
//!   together than the delay threshold (10 s by default).
//! - **Crash errors**: an AP_STA node claims a peer that has no live report.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Monitor                            │
//! │  ┌─────────┐    ┌──────────┐    ┌──────────┐    ┌────────┐ │
//! │  │ source  │───▶│  store   │───▶│ analysis │───▶│  sink  │ │
//! │  │ (input) │    │(history) │    │(detectors)    │(output)│ │
//! │  └─────────┘    └──────────┘    └──────────┘    └────────┘ │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: [`DataSource`] trait with a JSON Lines file tail and a
//!   channel source; wire records are validated here
//! - **[`store`]**: [`MessageStore`] trait and the [`InMemoryStore`]
//! - **[`analysis`]**: [`DelayDetector`] (with its [`Watermark`]) and [`CrashDetector`]
//! - **[`sink`]**: [`NotificationSink`] trait with memory, JSON Lines and channel sinks
//! - **[`monitor`]**: [`Monitor`], running a full analysis cycle
//! - **[`settings`]**: layered [`Settings`] (defaults, TOML file, environment)
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Follow a JSON Lines message log, printing notifications as JSON
//! twinwatch --file messages.jsonl
//!
//! # Analyze once and write a report
//! twinwatch --file messages.jsonl --export report.json
//! ```
//!
//! ### As a library
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use twinwatch::{DelayDetector, MemorySink};
//! use twinwatch_types::WifiMessage;
//!
//! let detector = DelayDetector::default();
//! let sink = MemorySink::new();
//!
//! // Newest first
//! let history = vec![
//!     WifiMessage::builder("node-1", Utc.timestamp_millis_opt(105_000).unwrap()).build(),
//!     WifiMessage::builder("node-1", Utc.timestamp_millis_opt(100_000).unwrap()).build(),
//! ];
//!
//! assert_eq!(detector.detect_delays(&history, &sink), 1);
//! assert_eq!(
//!     sink.notifications()[0].message,
//!     "Device (node-1) above delay threshold: 5000"
//! );
//! ```

pub mod analysis;
pub mod monitor;
pub mod settings;
pub mod sink;
pub mod source;
pub mod store;

pub use analysis::{
    scan_crashes, scan_delays, CrashDetector, DelayDetector, Watermark, WatermarkScope,
    TIME_THRESHOLD,
};
pub use monitor::{CycleReport, Monitor};
pub use settings::Settings;
pub use sink::{ChannelSink, JsonLinesSink, MemorySink, NotificationSink};
pub use source::{ChannelSource, DataSource, FileSource, RawWifiMessage, RecordError};
pub use store::{InMemoryStore, MessageStore};
