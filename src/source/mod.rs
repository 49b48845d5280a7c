//! Data source abstraction for receiving device reports.
//!
//! This module provides a trait-based abstraction for receiving messages
//! from various producers (an appended log file, an in-process channel, ...).
//! Wire records are validated at this boundary, see [`record`].

mod channel;
mod file;
pub mod record;

pub use channel::ChannelSource;
pub use file::FileSource;
pub use record::{RawWifiMessage, RecordError};

use std::fmt::Debug;

use twinwatch_types::WifiMessage;

/// Trait for receiving device reports from various sources.
///
/// # Example
///
/// ```
/// use twinwatch::{DataSource, FileSource};
///
/// let mut source = FileSource::new("messages.jsonl");
/// if let Some(batch) = source.poll() {
///     println!("Got {} messages", batch.len());
/// }
/// ```
pub trait DataSource: Send + Debug {
    /// Poll for reports that arrived since the previous poll.
    ///
    /// Returns `Some(batch)` if new reports are available, `None` otherwise.
    /// This method should be non-blocking.
    fn poll(&mut self) -> Option<Vec<WifiMessage>>;

    /// Returns a human-readable description of the source.
    fn description(&self) -> &str;

    /// The error recorded during the last poll, if any.
    fn error(&self) -> Option<&str>;
}
