//! The motion controller: planner, executor and tracked position in one context.

use crate::config::MotionConstants;
use crate::error::{Error, MotionError, Result};
use crate::hal::{StepTimer, StepperDriver};
use crate::motion::{
    MoveDescriptor, MoveExecutor, Planner, StartOutcome, StepTimeout, Target, TickOutcome,
};

/// Owns everything the motion core mutates.
///
/// The surrounding queue plans into its own slots with [`create_move`](Self::create_move),
/// hands one descriptor at a time to [`start`](Self::start), and calls
/// [`step`](Self::step) from the timer interrupt until the move completes.
#[derive(Debug, Clone)]
pub struct MotionController {
    constants: MotionConstants,
    planner: Planner,
    executor: MoveExecutor,
    current_position: Target,
    step_timeout: StepTimeout,
}

impl MotionController {
    /// Power-on state: at the origin, feedrate set to the search feedrate.
    pub fn new(constants: MotionConstants) -> Self {
        let planner = Planner::new(&constants);
        let current_position = *planner.startpoint();

        Self {
            constants,
            planner,
            executor: MoveExecutor::new(),
            current_position,
            step_timeout: StepTimeout::new(),
        }
    }

    /// Motion constants in use.
    #[inline]
    pub fn constants(&self) -> &MotionConstants {
        &self.constants
    }

    /// Plan a move from the end of the previously planned one to `target`.
    pub fn create_move(&mut self, target: &Target) -> MoveDescriptor {
        self.planner.create_move(&self.constants, target)
    }

    /// Start executing a planned move.
    ///
    /// A nullmove only changes the tracked feedrate.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::Busy`] while another move is live.
    pub fn start<H>(&mut self, dda: MoveDescriptor, hw: &mut H) -> Result<StartOutcome>
    where
        H: StepperDriver + StepTimer,
    {
        if self.executor.is_live() {
            return Err(Error::Motion(MotionError::Busy));
        }

        let outcome = self.executor.start(&self.constants, dda, hw);
        match outcome {
            StartOutcome::FeedrateOnly(f) => {
                self.current_position.f = f;
                debug!("move: feedrate only, F {}", f.value());
            }
            StartOutcome::Running => {
                self.step_timeout.reset();
                debug!("move: start, {} steps", dda.total_steps);
            }
        }

        Ok(outcome)
    }

    /// Timer tick. Call once per timer expiry while a move is live.
    pub fn step<H>(&mut self, hw: &mut H) -> TickOutcome
    where
        H: StepperDriver + StepTimer,
    {
        let outcome = self.executor.step(&self.constants, hw);

        match outcome {
            TickOutcome::Stepping { stepped: true } => self.step_timeout.reset(),
            TickOutcome::Completed => self.complete(),
            TickOutcome::Stepping { stepped: false } | TickOutcome::Idle => {}
        }

        outcome
    }

    fn complete(&mut self) {
        let endpoint = self.executor.descriptor().endpoint;

        self.current_position.x = endpoint.x;
        self.current_position.y = endpoint.y;
        self.current_position.z = endpoint.z;
        self.current_position.e = if self.constants.extruder_mode.is_relative() {
            0
        } else {
            endpoint.e
        };
        // the ramp never lands exactly on the requested feed
        self.current_position.f = endpoint.f;

        debug!(
            "move: done at [{},{},{}]",
            endpoint.x,
            endpoint.y,
            endpoint.z
        );
    }

    /// Recompute the tracked position from the live move's counters and return it.
    ///
    /// Unchanged when no move is live. Running it again without an intervening tick gives
    /// the same result.
    pub fn refresh_current_position(&mut self) -> Target {
        self.executor.update_position(
            &mut self.current_position,
            self.constants.extruder_mode.is_relative(),
        );
        self.current_position
    }

    /// Last computed head position.
    #[inline]
    pub fn current_position(&self) -> &Target {
        &self.current_position
    }

    /// Redefine the head position, e.g. after homing. Also where the next move starts.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::Busy`] while a move is live.
    pub fn set_position(&mut self, position: Target) -> Result<()> {
        if self.executor.is_live() {
            return Err(Error::Motion(MotionError::Busy));
        }
        self.current_position = position;
        self.planner.set_startpoint(position);
        Ok(())
    }

    /// Endpoint of the last planned move.
    #[inline]
    pub fn startpoint(&self) -> &Target {
        self.planner.startpoint()
    }

    /// Whether a move is being stepped.
    #[inline]
    pub fn is_live(&self) -> bool {
        self.executor.is_live()
    }

    /// Executor, for inspecting the live move.
    #[inline]
    pub fn executor(&self) -> &MoveExecutor {
        &self.executor
    }

    /// Stall watchdog counter; reset on every step.
    #[inline]
    pub fn step_timeout(&self) -> StepTimeout {
        self.step_timeout
    }

    /// Advance the stall watchdog by one period.
    #[inline]
    pub fn tick_timeout(&mut self) {
        self.step_timeout.tick();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::{Axis, Direction};

    struct Quiet;

    impl StepperDriver for Quiet {
        fn power_on(&mut self) {}
        fn enable(&mut self, _axis: Axis) {}
        fn disable(&mut self, _axis: Axis) {}
        fn set_direction(&mut self, _axis: Axis, _direction: Direction) {}
        fn step(&mut self, _axis: Axis) {}
        fn unstep(&mut self) {}
    }

    impl StepTimer for Quiet {
        fn set_timer(&mut self, _ticks: u32) {}
    }

    #[test]
    fn test_power_on_state() {
        let constants = MotionConstants::default();
        let search = constants.search_feedrate;
        let controller = MotionController::new(constants);

        assert_eq!(controller.current_position().f, search);
        assert_eq!(controller.startpoint().f, search);
        assert!(!controller.is_live());
    }

    #[test]
    fn test_busy_while_live() {
        let mut controller = MotionController::new(MotionConstants::default());
        let mut hw = Quiet;

        let first = controller.create_move(&Target::new(100, 0, 0, 0, 3000));
        let second = controller.create_move(&Target::new(200, 0, 0, 0, 3000));

        assert_eq!(controller.start(first, &mut hw), Ok(StartOutcome::Running));
        assert_eq!(
            controller.start(second, &mut hw),
            Err(Error::Motion(MotionError::Busy))
        );
        assert!(controller.set_position(Target::default()).is_err());

        while controller.step(&mut hw) != TickOutcome::Completed {}
        assert_eq!(controller.start(second, &mut hw), Ok(StartOutcome::Running));
    }

    #[test]
    fn test_timeout_reset_by_steps() {
        let mut controller = MotionController::new(MotionConstants::default());
        let mut hw = Quiet;

        controller.tick_timeout();
        controller.tick_timeout();
        assert_eq!(controller.step_timeout().value(), 2);

        let dda = controller.create_move(&Target::new(10, 0, 0, 0, 3000));
        controller.start(dda, &mut hw).unwrap();
        controller.tick_timeout();
        controller.step(&mut hw);
        assert_eq!(controller.step_timeout().value(), 0);
    }
}
