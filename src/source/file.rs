//! File-based data source.
//!
//! Tails a JSON Lines file of wire records.

use std::fs::{self, File};
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use twinwatch_types::WifiMessage;

use super::{DataSource, RawWifiMessage};

/// A data source that follows a JSON Lines file.
///
/// The ingestion pipeline appends one record per line. Each poll returns only
/// the complete lines written since the previous poll; a trailing partial line
/// is left for the next poll. If the file shrinks it is assumed to have been
/// rotated and is read again from the start.
///
/// Malformed records are rejected, logged, and reported through
/// [`DataSource::error`]; the remaining records of the batch are still returned.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    last_error: Option<String>,
    /// Bytes of complete lines already consumed.
    offset: u64,
    rejected: u64,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            last_error: None,
            offset: 0,
            rejected: 0,
        }
    }

    /// Returns the path being followed.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Total number of records rejected so far.
    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    /// Read everything after the current offset.
    fn read_tail(&mut self) -> std::io::Result<Option<Vec<u8>>> {
        let len = fs::metadata(&self.path)?.len();
        if len < self.offset {
            debug!("{} shrank, reading from the start", self.path.display());
            self.offset = 0;
        }
        if len == self.offset {
            return Ok(None);
        }

        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(self.offset))?;
        let mut tail = Vec::new();
        file.read_to_end(&mut tail)?;
        Ok(Some(tail))
    }

    fn parse_tail(&mut self, tail: &[u8]) -> Vec<WifiMessage> {
        // Only consume up to the last newline
        let Some(end) = tail.iter().rposition(|&b| b == b'\n') else {
            return Vec::new();
        };
        self.offset += (end + 1) as u64;

        let mut messages = Vec::new();
        let mut first_error = None;
        let mut rejected = 0u64;

        for line in tail[..end].split(|&b| b == b'\n') {
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            match RawWifiMessage::parse_bytes(line) {
                Ok(message) => messages.push(message),
                Err(e) => {
                    warn!("Rejected record from {}: {}", self.path.display(), e);
                    rejected += 1;
                    first_error.get_or_insert(e);
                }
            }
        }

        self.rejected += rejected;
        self.last_error = first_error.map(|e| format!("Rejected {} record(s): {}", rejected, e));
        messages
    }
}

impl DataSource for FileSource {
    fn poll(&mut self) -> Option<Vec<WifiMessage>> {
        self.last_error = None;

        let tail = match self.read_tail() {
            Ok(Some(tail)) => tail,
            Ok(None) => return None,
            Err(e) => {
                self.last_error = Some(format!("Read error: {}", e));
                return None;
            }
        };

        let messages = self.parse_tail(&tail);
        if messages.is_empty() {
            None
        } else {
            debug!("Read {} messages from {}", messages.len(), self.path.display());
            Some(messages)
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
