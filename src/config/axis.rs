//! Per-axis drive train configuration from TOML.

use serde::Deserialize;

use super::units::FeedRate;

/// Drive train description of one axis.
#[derive(Debug, Clone, Deserialize)]
pub struct AxisConfig {
    /// Microsteps per millimetre of travel (or of filament for the extruder).
    pub steps_per_mm: f32,

    /// Maximum feedrate the axis can follow, in mm/min.
    #[serde(rename = "max_feedrate_mm_per_min")]
    pub max_feedrate: FeedRate,

    /// Fraction of the maximum feed used for low-speed (search) moves.
    #[serde(default = "default_search_feed_fraction")]
    pub search_feed_fraction: f32,

    /// Power the driver only while this axis is part of a live move.
    #[serde(default)]
    pub disable_when_idle: bool,
}

fn default_search_feed_fraction() -> f32 {
    0.1
}

impl AxisConfig {
    /// Create an axis with default search fraction that stays powered.
    pub fn new(steps_per_mm: f32, max_feedrate: FeedRate) -> Self {
        Self {
            steps_per_mm,
            max_feedrate,
            search_feed_fraction: default_search_feed_fraction(),
            disable_when_idle: false,
        }
    }

    /// Maximum step frequency in steps per second.
    pub fn max_step_frequency(&self) -> f32 {
        self.max_feedrate.value() as f32 * self.steps_per_mm / 60.0
    }

    /// Search feedrate in mm/min.
    pub fn search_feedrate(&self) -> FeedRate {
        FeedRate((self.max_feedrate.value() as f32 * self.search_feed_fraction) as u32)
    }
}

/// The four axes of the machine.
#[derive(Debug, Clone, Deserialize)]
pub struct Axes {
    /// X axis.
    pub x: AxisConfig,
    /// Y axis.
    pub y: AxisConfig,
    /// Z axis.
    pub z: AxisConfig,
    /// Extruder.
    pub e: AxisConfig,
}
