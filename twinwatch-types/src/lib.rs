//! # twinwatch-types
//!
//! Core types for wireless device telemetry. This crate defines the messages
//! reported by devices and the notifications raised about them, shared between
//! the analyzers, the stores that hold message history and the sinks that
//! deliver notifications.
//!
//! ## Features
//!
//! - `serde`: JSON (or any serde format) serialization, including chrono timestamps
//!
//! ## Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use twinwatch_types::{Message, WifiMessage, WifiMode};
//!
//! let ts = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
//! let node = WifiMessage::builder("aa:bb:cc:dd:ee:01", ts)
//!     .mode(WifiMode::ApSta)
//!     .address("aa:bb:cc:dd:ee:02")
//!     .address("aa:bb:cc:dd:ee:03")
//!     .build();
//!
//! assert_eq!(node.mac(), "aa:bb:cc:dd:ee:01");
//! assert!(node.is_access_point());
//! assert_eq!(node.wifi_data.address_list.len(), 2);
//! ```

mod message;
mod notification;

pub use message::*;
pub use notification::*;
