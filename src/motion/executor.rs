//! Move execution: the per-tick step state machine.

use crate::config::units::FeedRate;
use crate::config::MotionConstants;
use crate::hal::{StepTimer, StepperDriver};

use super::descriptor::MoveDescriptor;
use super::state::MoveState;
use super::target::{Axis, Target};

/// Result of starting a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StartOutcome {
    /// Nothing to step; only the feedrate changes.
    FeedrateOnly(FeedRate),
    /// The move is live and the first tick is armed.
    Running,
}

/// Result of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome {
    /// The move is still live.
    Stepping {
        /// At least one axis emitted a pulse on this tick.
        stepped: bool,
    },
    /// The move finished on this tick.
    Completed,
    /// No move was live.
    Idle,
}

/// Drives the live move.
///
/// Holds the descriptor slot of the move being stepped and the counters shared between
/// [`start`](Self::start) and [`step`](Self::step).
#[derive(Debug, Clone, Default)]
pub struct MoveExecutor {
    dda: MoveDescriptor,
    state: MoveState,
}

impl MoveExecutor {
    /// Idle executor in its power-on state.
    pub fn new() -> Self {
        Self {
            dda: MoveDescriptor::default(),
            state: MoveState::new(),
        }
    }

    /// Whether a move is being stepped.
    #[inline]
    pub fn is_live(&self) -> bool {
        self.dda.live
    }

    /// Descriptor of the current or last move.
    #[inline]
    pub fn descriptor(&self) -> &MoveDescriptor {
        &self.dda
    }

    /// Counters of the current or last move.
    #[inline]
    pub fn state(&self) -> &MoveState {
        &self.state
    }

    /// Begin executing a planned move.
    ///
    /// A nullmove arms nothing and only reports the new feedrate. Otherwise the axes with
    /// travel are powered, all directions are set, the counters are seeded and the first
    /// tick is armed.
    pub fn start<H>(
        &mut self,
        constants: &MotionConstants,
        dda: MoveDescriptor,
        hw: &mut H,
    ) -> StartOutcome
    where
        H: StepperDriver + StepTimer,
    {
        debug_assert!(!self.dda.live, "start while a move is live");

        if dda.nullmove {
            return StartOutcome::FeedrateOnly(dda.endpoint.f);
        }

        hw.power_on();
        for axis in Axis::ALL {
            if dda.delta(axis) != 0 {
                hw.enable(axis);
            }
        }
        for axis in Axis::ALL {
            hw.set_direction(axis, dda.direction(axis));
        }

        if let Some(pwm) = constants.dc_extruder_pwm {
            if dda.moves_extruder() {
                hw.set_extruder_heater(pwm);
            }
        }

        self.dda = dda;
        self.state.seed(&self.dda);
        let ticks = self.dda.timing.start(&mut self.state);
        self.dda.live = true;

        hw.set_timer(ticks);
        StartOutcome::Running
    }

    /// Latch phase: decide which axes step on this tick and emit their pulses.
    ///
    /// Returns whether any axis stepped.
    #[inline]
    pub fn latch<D: StepperDriver>(&mut self, driver: &mut D) -> bool {
        let total = self.dda.total_steps as i32;
        let mut did_step = false;

        for axis in Axis::ALL {
            let i = axis.index();
            if self.state.steps[i] == 0 {
                continue;
            }

            self.state.counters[i] -= self.dda.deltas[i] as i32;
            if self.state.counters[i] < 0 {
                driver.step(axis);
                did_step = true;
                self.state.steps[i] -= 1;
                self.state.counters[i] += total;
            }
        }

        did_step
    }

    /// Compute phase: advance the period and detect completion.
    ///
    /// Returns the outcome of the tick and the delay to arm in timer ticks.
    pub fn compute<D: StepperDriver>(
        &mut self,
        constants: &MotionConstants,
        did_step: bool,
        driver: &mut D,
    ) -> (TickOutcome, u32) {
        let ticks = self.dda.timing.advance_tick(&mut self.state);

        if did_step {
            return (TickOutcome::Stepping { stepped: true }, ticks);
        }
        if !self.state.is_exhausted() {
            return (TickOutcome::Stepping { stepped: false }, ticks);
        }

        self.dda.live = false;

        if constants.dc_extruder_pwm.is_some() && self.dda.moves_extruder() {
            driver.set_extruder_heater(0);
        }
        for axis in Axis::ALL {
            if constants.axis(axis).disable_when_idle {
                driver.disable(axis);
            }
        }

        (TickOutcome::Completed, ticks)
    }

    /// Run one tick: latch, compute, re-arm the timer, retract the pulses.
    ///
    /// The compute phase runs with preemption allowed when the machine is configured for
    /// an interruptible step handler.
    pub fn step<H>(&mut self, constants: &MotionConstants, hw: &mut H) -> TickOutcome
    where
        H: StepperDriver + StepTimer,
    {
        if !self.dda.live {
            return TickOutcome::Idle;
        }

        let did_step = self.latch(hw);

        let interruptible = constants.step_interrupt_interruptible;
        if interruptible {
            hw.allow_preemption();
        }

        let (outcome, ticks) = self.compute(constants, did_step, hw);

        if interruptible {
            hw.mask_preemption();
        }

        hw.set_timer(ticks);
        hw.unstep();

        outcome
    }

    /// Update `position` from the live move's remaining step counts.
    ///
    /// Leaves `position` untouched when no move is live. A relative extruder reports the
    /// steps it still has to go.
    pub fn update_position(&self, position: &mut Target, extruder_relative: bool) {
        if !self.dda.live {
            return;
        }

        for axis in Axis::ALL {
            let remaining = self.state.remaining(axis) as i32;

            if axis == Axis::E && extruder_relative {
                position.e = remaining;
                continue;
            }

            let endpoint = self.dda.endpoint.axis(axis);
            let value = if self.dda.direction(axis).is_positive() {
                endpoint.wrapping_sub(remaining)
            } else {
                endpoint.wrapping_add(remaining)
            };
            position.set_axis(axis, value);
        }
    }
}
