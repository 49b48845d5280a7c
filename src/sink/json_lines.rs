//! JSON Lines sink: one serialized notification per line.

use std::fs::{File, OpenOptions};
use std::io::{self, Stdout, Write};
use std::path::Path;

use parking_lot::Mutex;
use tracing::warn;
use twinwatch_types::Notification;

use super::NotificationSink;

/// Writes each notification as a single line of JSON.
///
/// Write failures are logged and the notification is dropped.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesSink<W> {
    /// Wrap any writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Unwrap the inner writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn write_line(&self, notification: &Notification) -> io::Result<()> {
        let json = serde_json::to_string(notification)?;
        let mut writer = self.writer.lock();
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()
    }
}

impl JsonLinesSink<File> {
    /// Append to the file at `path`, creating it if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;
        Ok(Self::new(file))
    }
}

impl JsonLinesSink<Stdout> {
    /// Write to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> NotificationSink for JsonLinesSink<W> {
    fn save_notification(&self, notification: Notification) {
        if let Err(e) = self.write_line(&notification) {
            warn!("Failed to write notification '{}': {}", notification.message, e);
        }
    }
}
