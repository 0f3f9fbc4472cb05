//! Configuration validation.
//!
//! The firmware treated these as compile-time constants; a bad value here would make the
//! planner divide by zero or overflow, so it is refused before any constant is derived.

use crate::error::{ConfigError, Error, Result};

use super::axis::AxisConfig;
use super::machine::{AccelerationPolicy, MachineConfig};

/// Slowest timer clock the duration scaling (`clock_hz / 40000`) supports.
pub const MIN_CLOCK_HZ: u32 = 40_000;

/// Validate a machine configuration.
///
/// Checks:
/// - Timer clock is fast enough for the duration scaling
/// - Every axis has positive steps/mm and maximum feedrate
/// - Search fractions are in (0, 1]
/// - Acceleration is at least 1 mm/s² when ramping
pub fn validate_config(config: &MachineConfig) -> Result<()> {
    if config.clock_hz < MIN_CLOCK_HZ {
        return Err(Error::Config(ConfigError::InvalidClock(config.clock_hz)));
    }

    validate_axis('X', &config.axes.x)?;
    validate_axis('Y', &config.axes.y)?;
    validate_axis('Z', &config.axes.z)?;
    validate_axis('E', &config.axes.e)?;

    if config.acceleration_policy == AccelerationPolicy::Ramping && !(config.acceleration >= 1.0) {
        return Err(Error::Config(ConfigError::InvalidAcceleration(
            config.acceleration,
        )));
    }

    if let Some(feed) = config.search_feedrate {
        if feed.is_zero() {
            return Err(Error::Config(ConfigError::InvalidSearchFeedrate(feed.value())));
        }
    } else if config.effective_search_feedrate().is_zero() {
        return Err(Error::Config(ConfigError::InvalidSearchFeedrate(0)));
    }

    Ok(())
}

fn validate_axis(axis: char, config: &AxisConfig) -> Result<()> {
    // NaN fails this comparison too
    if !(config.steps_per_mm > 0.0) {
        return Err(Error::Config(ConfigError::InvalidStepsPerMm {
            axis,
            value: config.steps_per_mm,
        }));
    }

    if config.max_feedrate.is_zero() {
        return Err(Error::Config(ConfigError::InvalidMaxFeedrate {
            axis,
            value: config.max_feedrate.value(),
        }));
    }

    if !(config.search_feed_fraction > 0.0 && config.search_feed_fraction <= 1.0) {
        return Err(Error::Config(ConfigError::InvalidSearchFraction {
            axis,
            value: config.search_feed_fraction,
        }));
    }

    Ok(())
}
