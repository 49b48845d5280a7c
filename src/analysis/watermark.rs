//! Delay watermark: the newest delay timestamp already reported.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How the delay watermark is keyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WatermarkScope {
    /// One watermark shared by every device.
    ///
    /// A delay reported on one device suppresses earlier gaps on every other
    /// device until their messages pass the shared timestamp.
    #[default]
    Global,
    /// One watermark per device identifier.
    PerDevice,
}

/// Timestamp of the most recent delay already reported.
///
/// Starts at the minimum representable instant and only ever moves forward.
#[derive(Debug, Clone)]
pub struct Watermark {
    scope: WatermarkScope,
    global: DateTime<Utc>,
    per_device: HashMap<String, DateTime<Utc>>,
}

impl Default for Watermark {
    fn default() -> Self {
        Self::new(WatermarkScope::default())
    }
}

impl Watermark {
    /// Create a watermark at the minimum instant.
    pub fn new(scope: WatermarkScope) -> Self {
        Self {
            scope,
            global: DateTime::<Utc>::MIN_UTC,
            per_device: HashMap::new(),
        }
    }

    /// The keying scope.
    pub fn scope(&self) -> WatermarkScope {
        self.scope
    }

    /// Current watermark for `mac`.
    ///
    /// With [`WatermarkScope::Global`] the device is ignored.
    pub fn get(&self, mac: &str) -> DateTime<Utc> {
        match self.scope {
            WatermarkScope::Global => self.global,
            WatermarkScope::PerDevice => self
                .per_device
                .get(mac)
                .copied()
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
        }
    }

    /// Move the watermark for `mac` to `to`.
    ///
    /// Ignored if `to` is not after the current value. Returns whether it moved.
    pub fn advance(&mut self, mac: &str, to: DateTime<Utc>) -> bool {
        let slot = match self.scope {
            WatermarkScope::Global => &mut self.global,
            WatermarkScope::PerDevice => self
                .per_device
                .entry(mac.to_string())
                .or_insert(DateTime::<Utc>::MIN_UTC),
        };

        if to > *slot {
            *slot = to;
            true
        } else {
            false
        }
    }
}
