//! Per-move execution state shared between start and the tick handler.

use super::descriptor::MoveDescriptor;
use super::target::Axis;

/// Counters of the move being stepped.
///
/// One instance is reused for every move. It is reseeded by `start` and goes stale once the
/// descriptor's live flag clears.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MoveState {
    /// Bresenham error accumulators.
    pub counters: [i32; 4],

    /// Steps still to be emitted per axis.
    pub steps: [u32; 4],

    /// Current step period, 24.8 fixed point.
    pub c: u32,

    /// Signed ramp coefficient. Carried from move to move so a ramp can pick up where the
    /// previous one ended.
    pub n: i32,

    /// Ticks elapsed since the start of the move.
    pub step_no: u32,
}

impl MoveState {
    /// Power-on state.
    pub const fn new() -> Self {
        Self {
            counters: [0; 4],
            steps: [0; 4],
            c: 0,
            n: 1,
            step_no: 0,
        }
    }

    /// Prepare the counters for a new move.
    ///
    /// Every accumulator starts at `-(total_steps / 2)` regardless of the axis' own delta.
    pub fn seed(&mut self, dda: &MoveDescriptor) {
        debug_assert!(dda.total_steps <= i32::MAX as u32 / 2);

        let seed = -((dda.total_steps >> 1) as i32);
        self.counters = [seed; 4];
        self.steps = dda.deltas;
        self.step_no = 0;
    }

    /// Steps still to be emitted on one axis.
    #[inline]
    pub fn remaining(&self, axis: Axis) -> u32 {
        self.steps[axis.index()]
    }

    /// Whether every axis has emitted all of its steps.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.steps.iter().all(|&s| s == 0)
    }
}

impl Default for MoveState {
    fn default() -> Self {
        Self::new()
    }
}

/// Ticks since the last emitted step.
///
/// Reset by the executor on every step and advanced by an external watchdog; a value that
/// keeps growing while a move is live means the motion has stalled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepTimeout(u8);

impl StepTimeout {
    /// Zero timeout.
    pub const fn new() -> Self {
        Self(0)
    }

    /// Restart the count.
    #[inline]
    pub fn reset(&mut self) {
        self.0 = 0;
    }

    /// Advance by one watchdog period, saturating.
    #[inline]
    pub fn tick(&mut self) {
        self.0 = self.0.saturating_add(1);
    }

    /// Current count.
    #[inline]
    pub fn value(&self) -> u8 {
        self.0
    }
}
