//! The planned move handed from planner to executor.

use crate::config::units::Micrometers;

use super::profile::{ConstantTiming, RampTiming, TrapezoidalTiming};
use super::target::{Axis, Direction, Target};

/// Timing constants of one move, one variant per acceleration policy.
///
/// All periods are 24.8 fixed point timer ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MoveTiming {
    /// Symmetric ramp computed from the configured acceleration.
    Ramping(RampTiming),
    /// Start and end periods derived from the start and end feedrates.
    Trapezoidal(TrapezoidalTiming),
    /// One period for the whole move.
    Constant(ConstantTiming),
}

impl Default for MoveTiming {
    fn default() -> Self {
        MoveTiming::Constant(ConstantTiming::default())
    }
}

/// A fully planned move.
///
/// Written once by the planner. While `live` is set, only the executor touches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MoveDescriptor {
    /// Position at the end of the move, including the requested feedrate.
    pub endpoint: Target,

    /// Absolute step count per axis, indexed by [`Axis::index`].
    pub deltas: [u32; 4],

    /// Direction of travel per axis.
    pub directions: [Direction; 4],

    /// Largest of the per-axis deltas; one Bresenham tick per major-axis step.
    pub total_steps: u32,

    /// Estimated travel distance.
    pub distance: Micrometers,

    /// Nothing to step; starting the move only changes the feedrate.
    pub nullmove: bool,

    /// Set while the executor is stepping this move.
    pub live: bool,

    /// Policy specific timing constants.
    pub timing: MoveTiming,
}

impl MoveDescriptor {
    /// Step count on one axis.
    #[inline]
    pub fn delta(&self, axis: Axis) -> u32 {
        self.deltas[axis.index()]
    }

    /// Direction of one axis.
    #[inline]
    pub fn direction(&self, axis: Axis) -> Direction {
        self.directions[axis.index()]
    }

    /// Whether the extruder moves at all.
    #[inline]
    pub fn moves_extruder(&self) -> bool {
        self.delta(Axis::E) != 0
    }
}
