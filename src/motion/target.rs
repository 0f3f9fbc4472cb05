//! Axes, directions and step-space positions.

use crate::config::units::FeedRate;

/// One of the four stepper axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    /// X carriage.
    X,
    /// Y carriage.
    Y,
    /// Z carriage.
    Z,
    /// Extruder.
    E,
}

impl Axis {
    /// All axes, in the order used by every per-axis array.
    pub const ALL: [Axis; 4] = [Axis::X, Axis::Y, Axis::Z, Axis::E];

    /// Index into per-axis arrays.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Single-letter G-code name.
    #[inline]
    pub const fn letter(self) -> char {
        match self {
            Axis::X => 'X',
            Axis::Y => 'Y',
            Axis::Z => 'Z',
            Axis::E => 'E',
        }
    }
}

/// Direction of travel on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Towards larger coordinates.
    #[default]
    Positive,
    /// Towards smaller coordinates.
    Negative,
}

impl Direction {
    /// Direction from `start` to `end`; a tie counts as positive.
    #[inline]
    pub fn between(start: i32, end: i32) -> Self {
        if end >= start {
            Direction::Positive
        } else {
            Direction::Negative
        }
    }

    /// Whether this is the positive direction (the DIR line level before inversion).
    #[inline]
    pub fn is_positive(self) -> bool {
        self == Direction::Positive
    }
}

/// A position in step space plus the feedrate to get there.
///
/// Used both for the endpoint of the last planned move and for the tracked position of the
/// head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Target {
    /// X coordinate in steps.
    pub x: i32,
    /// Y coordinate in steps.
    pub y: i32,
    /// Z coordinate in steps.
    pub z: i32,
    /// Extruder coordinate in steps, absolute or relative per configuration.
    pub e: i32,
    /// Feedrate.
    pub f: FeedRate,
}

impl Target {
    /// Create a target from step coordinates and a feedrate in mm/min.
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32, e: i32, f: u32) -> Self {
        Self {
            x,
            y,
            z,
            e,
            f: FeedRate(f),
        }
    }

    /// Coordinate on one axis.
    #[inline]
    pub fn axis(&self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
            Axis::E => self.e,
        }
    }

    /// Set the coordinate on one axis.
    #[inline]
    pub fn set_axis(&mut self, axis: Axis, value: i32) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
            Axis::Z => self.z = value,
            Axis::E => self.e = value,
        }
    }

    /// The same position with another feedrate.
    #[inline]
    pub fn with_feedrate(mut self, f: FeedRate) -> Self {
        self.f = f;
        self
    }
}
