//! Run settings
//!
//! Loaded from an optional JSON file; any field left out keeps its default.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};
use crate::sim::WorldConfig;

/// Per-tick output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One human-readable line per ball
    #[default]
    Text,
    /// One JSON object per tick
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Simulation run settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Population ===
    pub num_regular: u32,
    pub num_monster: u32,
    pub num_repellent: u32,

    // === Canvas ===
    pub width: f64,
    pub height: f64,

    // === Run control ===
    /// Pause between ticks in milliseconds (0 = no pacing)
    pub tick_delay_ms: u64,
    /// RNG seed; a clock-derived seed is used when absent
    pub seed: Option<u64>,
    /// Stop after this many ticks
    pub max_ticks: Option<u64>,

    // === Output ===
    pub format: OutputFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            num_regular: DEFAULT_REGULAR,
            num_monster: DEFAULT_MONSTER,
            num_repellent: DEFAULT_REPELLENT,

            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,

            tick_delay_ms: DEFAULT_TICK_DELAY_MS,
            seed: None,
            max_ticks: None,

            format: OutputFormat::Text,
        }
    }
}

impl Settings {
    /// Read settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Reject settings the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(Error::InvalidSettings(format!(
                "width must be finite and > 0 (got {})",
                self.width
            )));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(Error::InvalidSettings(format!(
                "height must be finite and > 0 (got {})",
                self.height
            )));
        }
        Ok(())
    }

    /// Population and canvas for the simulation
    pub fn world(&self) -> WorldConfig {
        WorldConfig {
            num_regular: self.num_regular,
            num_monster: self.num_monster,
            num_repellent: self.num_repellent,
            width: self.width,
            height: self.height,
        }
    }

    pub fn tick_delay(&self) -> Duration {
        Duration::from_millis(self.tick_delay_ms)
    }
}
