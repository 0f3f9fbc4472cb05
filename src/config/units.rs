//! Unit types for physical quantities.
//!
//! Integer newtypes for the quantities the planner mixes together, so a feedrate is
//! never passed where a distance or a tick count is expected.

use core::ops::{Add, Sub};

use serde::Deserialize;

/// Linear distance in micrometres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(transparent)]
pub struct Micrometers(pub u32);

impl Micrometers {
    /// Create a new Micrometers value.
    #[inline]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Create from millimetres.
    #[inline]
    pub const fn from_mm(mm: u32) -> Self {
        Self(mm * 1000)
    }
}

impl Add for Micrometers {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Micrometers {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

/// Feedrate in millimetres per minute (the G-code `F` unit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(transparent)]
pub struct FeedRate(pub u32);

impl FeedRate {
    /// Create a new FeedRate value.
    #[inline]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the raw value in mm/min.
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Create from millimetres per second.
    #[inline]
    pub const fn from_mm_per_sec(mm_per_sec: u32) -> Self {
        Self(mm_per_sec * 60)
    }

    /// Whether this is the zero feedrate ("use the default feed").
    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

/// Duration in hardware timer clock ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Ticks(pub u32);

impl Ticks {
    /// Create a new Ticks value.
    #[inline]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Convert to microseconds at the given clock.
    #[inline]
    pub fn to_micros(self, clock_hz: u32) -> u32 {
        ((self.0 as u64 * 1_000_000) / clock_hz.max(1) as u64) as u32
    }
}

/// Extension trait for creating unit types from primitives.
pub trait UnitExt {
    /// Convert to Micrometers.
    fn um(self) -> Micrometers;
    /// Convert to FeedRate in mm/min.
    fn mm_per_min(self) -> FeedRate;
}

impl UnitExt for u32 {
    #[inline]
    fn um(self) -> Micrometers {
        Micrometers(self)
    }

    #[inline]
    fn mm_per_min(self) -> FeedRate {
        FeedRate(self)
    }
}
