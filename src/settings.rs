//! Runtime settings.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `TWINWATCH_*` environment variables. The CLI applies its own overrides on
//! top of the result.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::TimeDelta;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::analysis::{WatermarkScope, TIME_THRESHOLD};
use crate::store::DEFAULT_MAX_HISTORY;

/// Analyzer and store settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Gaps strictly below this many milliseconds raise a delay warning.
    pub delay_threshold_ms: i64,
    /// Whether the delay watermark is shared or kept per device.
    pub watermark_scope: WatermarkScope,
    /// Reports retained per device.
    pub max_history: usize,
    /// Devices silent for longer than this (relative to the newest report)
    /// drop out of the live set. Unset means every known device is live.
    pub live_window_ms: Option<i64>,
    /// Seconds between polls of the data source.
    pub refresh_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            delay_threshold_ms: TIME_THRESHOLD,
            watermark_scope: WatermarkScope::Global,
            max_history: DEFAULT_MAX_HISTORY,
            live_window_ms: None,
            refresh_secs: 1,
        }
    }
}

impl Settings {
    /// Load settings from defaults, an optional file and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        builder = builder.add_source(Environment::with_prefix("TWINWATCH"));

        let config = builder.build().context("Failed to load configuration")?;
        let settings: Settings = config
            .try_deserialize()
            .context("Invalid configuration")?;
        Ok(settings)
    }

    /// The live window as a duration, if one is set.
    pub fn live_window(&self) -> Option<TimeDelta> {
        self.live_window_ms.and_then(TimeDelta::try_milliseconds)
    }
}
