//! Configuration module for dda-motion.
//!
//! Provides the machine description (from TOML with the `std` feature, or built in code)
//! and the integer constants derived from it once at start-up.

mod axis;
mod machine;
mod mechanical;
pub mod units;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use axis::{AxisConfig, Axes};
pub use machine::{AccelerationPolicy, ExtruderMode, MachineConfig};
pub use mechanical::{AxisConstants, MotionConstants};
pub use validation::{validate_config, MIN_CLOCK_HZ};

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{FeedRate, Micrometers, Ticks};
