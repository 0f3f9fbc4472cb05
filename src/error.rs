//! Error types for dda-motion.
//!
//! Everything that can fail does so before the first step is emitted: configuration
//! parsing and validation, pin access in the I/O adapter, and foreground misuse of the
//! controller. The tick handler itself never produces an error.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all dda-motion operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Stepper I/O error
    Motor(MotorError),
    /// Move planning or execution error
    Motion(MotionError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Timer clock too slow for the duration scaling (must be >= 40 kHz)
    InvalidClock(u32),
    /// Steps per millimetre must be > 0
    InvalidStepsPerMm {
        /// Axis name
        axis: char,
        /// Configured value
        value: f32,
    },
    /// Maximum feedrate must be > 0
    InvalidMaxFeedrate {
        /// Axis name
        axis: char,
        /// Configured value in mm/min
        value: u32,
    },
    /// Search feed fraction must be within (0, 1]
    InvalidSearchFraction {
        /// Axis name
        axis: char,
        /// Configured value
        value: f32,
    },
    /// Acceleration must be >= 1 mm/s² for the ramping policy
    InvalidAcceleration(f32),
    /// Search feedrate must be > 0
    InvalidSearchFeedrate(u32),
    /// A required pin was not supplied to a builder
    MissingPin {
        /// Axis name
        axis: char,
        /// Which pin of the axis
        pin: &'static str,
    },
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Stepper I/O errors.
#[derive(Debug, Clone, PartialEq)]
pub enum MotorError {
    /// Pin operation failed
    PinError,
}

/// Move planning and execution errors.
#[derive(Debug, Clone, PartialEq)]
pub enum MotionError {
    /// A move is live; the executor slot cannot be reused until it completes
    Busy,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Motor(e) => write!(f, "Motor error: {}", e),
            Error::Motion(e) => write!(f, "Motion error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidClock(hz) => {
                write!(f, "Invalid timer clock: {} Hz. Must be >= 40000", hz)
            }
            ConfigError::InvalidStepsPerMm { axis, value } => {
                write!(f, "Invalid steps per mm on axis {}: {}. Must be > 0", axis, value)
            }
            ConfigError::InvalidMaxFeedrate { axis, value } => {
                write!(f, "Invalid max feedrate on axis {}: {}. Must be > 0", axis, value)
            }
            ConfigError::InvalidSearchFraction { axis, value } => {
                write!(f, "Invalid search feed fraction on axis {}: {}. Must be in (0, 1]", axis, value)
            }
            ConfigError::InvalidAcceleration(v) => {
                write!(f, "Invalid acceleration: {}. Must be >= 1 mm/s²", v)
            }
            ConfigError::InvalidSearchFeedrate(v) => {
                write!(f, "Invalid search feedrate: {}. Must be > 0", v)
            }
            ConfigError::MissingPin { axis, pin } => {
                write!(f, "Missing {} pin for axis {}", pin, axis)
            }
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorError::PinError => write!(f, "GPIO pin operation failed"),
        }
    }
}

impl fmt::Display for MotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionError::Busy => write!(f, "A move is already live"),
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<MotorError> for Error {
    fn from(e: MotorError) -> Self {
        Error::Motor(e)
    }
}

impl From<MotionError> for Error {
    fn from(e: MotionError) -> Self {
        Error::Motion(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for MotorError {}

#[cfg(feature = "std")]
impl std::error::Error for MotionError {}
