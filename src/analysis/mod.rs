//! Stability analyzers.
//!
//! ## Submodules
//!
//! - [`delay`]: delay threshold detection over one device's history
//! - [`crash`]: missing-peer detection over the live message set
//! - [`watermark`]: the delay watermark and its keying scope
//!
//! ## Data Flow
//!
//! ```text
//! device history (newest first) ──▶ DelayDetector ──┐
//!                                   (Watermark)      ├──▶ NotificationSink
//! live messages ───────────────────▶ CrashDetector ──┘
//! ```
//!
//! Both analyzers have a pure `scan_*` core that returns the notifications
//! and a detector type that delivers them to a sink.

pub mod crash;
pub mod delay;
pub mod watermark;

pub use crash::{scan_crashes, CrashDetector};
pub use delay::{scan_delays, DelayDetector, TIME_THRESHOLD};
pub use watermark::{Watermark, WatermarkScope};
