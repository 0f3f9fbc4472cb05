//! Machine configuration - root configuration structure.

use serde::Deserialize;

use super::axis::{AxisConfig, Axes};
use super::units::FeedRate;

/// How the step period evolves over a move.
///
/// Chosen once per machine; every planned move and every tick uses the same policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "snake_case")]
pub enum AccelerationPolicy {
    /// Start from (almost) standstill, accelerate to the target feed, decelerate just in
    /// time to stop at the endpoint. Symmetric ramps of fixed acceleration.
    #[default]
    Ramping,
    /// Start at the feed of the previous move and change linearly to the feed of this one
    /// over the whole move.
    TrapezoidalDuration,
    /// No acceleration; every step is emitted at the limiting period.
    Temporal,
}

/// Whether extruder coordinates are absolute or relative to the previous move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "snake_case")]
pub enum ExtruderMode {
    /// `E` is an absolute filament position.
    Absolute,
    /// `E` is the length to extrude in this move; the tracked value resets after each move.
    #[default]
    Relative,
}

impl ExtruderMode {
    /// Whether the tracked extruder coordinate resets once a move consumed it.
    #[inline]
    pub fn is_relative(self) -> bool {
        self == ExtruderMode::Relative
    }
}

/// Root configuration structure from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct MachineConfig {
    /// Clock feeding the step timer, in Hz.
    #[serde(default = "default_clock_hz")]
    pub clock_hz: u32,

    /// Acceleration algorithm.
    #[serde(default)]
    pub acceleration_policy: AccelerationPolicy,

    /// Acceleration for the ramping policy, in mm/s².
    #[serde(default = "default_acceleration", rename = "acceleration_mm_per_s2")]
    pub acceleration: f32,

    /// Absolute or relative extruder coordinates.
    #[serde(default)]
    pub extruder_mode: ExtruderMode,

    /// Let other interrupt sources preempt the step handler once pulses are latched.
    #[serde(default = "default_interruptible")]
    pub step_interrupt_interruptible: bool,

    /// Heater PWM applied while the extruder is moving (DC extruder motors).
    #[serde(default)]
    pub dc_extruder_pwm: Option<u8>,

    /// Power-on feedrate, and the feed used when a move requests `F0`.
    /// Defaults to the Z axis search feedrate.
    #[serde(default, rename = "search_feedrate_mm_per_min")]
    pub search_feedrate: Option<FeedRate>,

    /// Per-axis drive trains.
    pub axes: Axes,
}

fn default_clock_hz() -> u32 {
    16_000_000
}

fn default_acceleration() -> f32 {
    400.0
}

fn default_interruptible() -> bool {
    true
}

impl MachineConfig {
    /// Power-on feedrate.
    pub fn effective_search_feedrate(&self) -> FeedRate {
        self.search_feedrate
            .unwrap_or_else(|| self.axes.z.search_feedrate())
    }
}

impl Default for MachineConfig {
    /// A Mendel-style machine on a 16 MHz RAMPS board: T5 belts on 8-tooth pulleys for X/Y,
    /// M8 threaded rod on Z, a geared extruder, 1/8 microstepping everywhere.
    fn default() -> Self {
        let mut z = AxisConfig::new(1280.0, FeedRate(300));
        z.search_feed_fraction = 0.25;
        z.disable_when_idle = true;

        Self {
            clock_hz: default_clock_hz(),
            acceleration_policy: AccelerationPolicy::Ramping,
            acceleration: default_acceleration(),
            extruder_mode: ExtruderMode::Relative,
            step_interrupt_interruptible: true,
            dc_extruder_pwm: None,
            search_feedrate: None,
            axes: Axes {
                x: AxisConfig::new(40.0, FeedRate(8400)),
                y: AxisConfig::new(40.0, FeedRate(8400)),
                z,
                e: AxisConfig::new(228.6, FeedRate(1680)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_search_feedrate_follows_z() {
        let config = MachineConfig::default();
        // 300 mm/min * 0.25
        assert_eq!(config.effective_search_feedrate(), FeedRate(75));
    }

    #[test]
    fn test_explicit_search_feedrate() {
        let config = MachineConfig {
            search_feedrate: Some(FeedRate(600)),
            ..MachineConfig::default()
        };
        assert_eq!(config.effective_search_feedrate(), FeedRate(600));
    }

    #[test]
    fn test_relative_extruder_default() {
        assert!(MachineConfig::default().extruder_mode.is_relative());
        assert!(!ExtruderMode::Absolute.is_relative());
    }
}
