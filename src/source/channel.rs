//! Channel-based data source.
//!
//! Receives validated reports over a bounded tokio channel. This is the entry
//! point for an in-process ingestion pipeline that pushes messages rather than
//! writing them to a file.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use twinwatch_types::WifiMessage;

use super::DataSource;

/// A data source that drains reports pushed through a channel.
///
/// # Example
///
/// ```
/// use twinwatch::ChannelSource;
///
/// let (tx, source) = ChannelSource::create("mqtt://broker", 64);
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: mpsc::Receiver<WifiMessage>,
    description: String,
    last_error: Option<String>,
    disconnected: bool,
}

impl ChannelSource {
    /// Create a new channel source.
    ///
    /// # Arguments
    ///
    /// * `receiver` - The receiving end of an mpsc channel
    /// * `source_description` - Where the reports come from
    pub fn new(receiver: mpsc::Receiver<WifiMessage>, source_description: &str) -> Self {
        Self {
            receiver,
            description: format!("channel: {}", source_description),
            last_error: None,
            disconnected: false,
        }
    }

    /// Create a channel pair with room for `buffer` reports.
    ///
    /// Returns (sender, source) where the sender is handed to the producer.
    pub fn create(source_description: &str, buffer: usize) -> (mpsc::Sender<WifiMessage>, Self) {
        let (tx, rx) = mpsc::channel(buffer);
        (tx, Self::new(rx, source_description))
    }
}

impl DataSource for ChannelSource {
    fn poll(&mut self) -> Option<Vec<WifiMessage>> {
        self.last_error = None;

        let mut batch = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(message) => batch.push(message),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    // Reported on the first poll that sees it
                    if !self.disconnected {
                        self.disconnected = true;
                        self.last_error = Some("Producer disconnected".to_string());
                    }
                    break;
                }
            }
        }

        if batch.is_empty() {
            None
        } else {
            Some(batch)
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
