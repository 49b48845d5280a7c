//! Message persistence abstraction.
//!
//! The analyzers read message history and the live set through a
//! [`MessageStore`]. [`InMemoryStore`] is the bundled implementation.

mod memory;

pub use memory::{InMemoryStore, DEFAULT_MAX_HISTORY};

use twinwatch_types::WifiMessage;

/// Storage for device reports.
pub trait MessageStore: Send + Sync {
    /// Record a report for its device.
    fn append(&self, message: WifiMessage);

    /// Most recent report of `mac`.
    fn latest(&self, mac: &str) -> Option<WifiMessage>;

    /// Every retained report of `mac`, newest first.
    fn history(&self, mac: &str) -> Vec<WifiMessage>;

    /// Known device identifiers, sorted.
    fn devices(&self) -> Vec<String>;

    /// Latest report of every live device.
    fn live_messages(&self) -> Vec<WifiMessage>;
}
