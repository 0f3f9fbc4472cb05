//! Shared test hardware for integration tests.

#![allow(dead_code)]

use dda_motion::hal::AxisPins;
use dda_motion::{
    Axis, Direction, MotionController, PinStepper, StepTimer, StepperDriver, TickOutcome,
};
use embedded_hal::digital::{ErrorType, OutputPin};

/// Records every call the motion core makes into the machine.
#[derive(Debug, Default)]
pub struct Recorder {
    pub power_ons: u32,
    pub enabled: Vec<Axis>,
    pub disabled: Vec<Axis>,
    pub directions: [Option<Direction>; 4],
    pub pulses: [u32; 4],
    pub unsteps: u32,
    pub periods: Vec<u32>,
    pub heater: Vec<u8>,
    pub preemption_windows: u32,
    preemptible: bool,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pulses emitted on one axis.
    pub fn pulses(&self, axis: Axis) -> u32 {
        self.pulses[axis.index()]
    }

    /// Clear the per-move records, keeping nothing but the call counters.
    pub fn clear(&mut self) {
        self.enabled.clear();
        self.disabled.clear();
        self.directions = [None; 4];
        self.pulses = [0; 4];
        self.periods.clear();
        self.heater.clear();
    }
}

impl StepperDriver for Recorder {
    fn power_on(&mut self) {
        self.power_ons += 1;
    }

    fn enable(&mut self, axis: Axis) {
        self.enabled.push(axis);
    }

    fn disable(&mut self, axis: Axis) {
        self.disabled.push(axis);
    }

    fn set_direction(&mut self, axis: Axis, direction: Direction) {
        self.directions[axis.index()] = Some(direction);
    }

    fn step(&mut self, axis: Axis) {
        self.pulses[axis.index()] += 1;
    }

    fn unstep(&mut self) {
        self.unsteps += 1;
    }

    fn set_extruder_heater(&mut self, pwm: u8) {
        self.heater.push(pwm);
    }
}

impl StepTimer for Recorder {
    fn set_timer(&mut self, ticks: u32) {
        assert!(!self.preemptible, "timer armed with preemption allowed");
        self.periods.push(ticks);
    }

    fn allow_preemption(&mut self) {
        self.preemptible = true;
        self.preemption_windows += 1;
    }

    fn mask_preemption(&mut self) {
        self.preemptible = false;
    }
}

/// Output pin that accepts every write.
pub struct NullPin;

impl ErrorType for NullPin {
    type Error = core::convert::Infallible;
}

impl OutputPin for NullPin {
    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Pin-level driver with every axis wired to [`NullPin`]s.
pub fn null_stepper() -> PinStepper<NullPin> {
    let mut builder = PinStepper::builder();
    for axis in Axis::ALL {
        builder = builder.axis(axis, AxisPins::new(NullPin, NullPin).with_enable(NullPin));
    }
    builder.build().expect("all axes wired")
}

/// Timer that only records the periods it was armed with.
#[derive(Debug, Default)]
pub struct TimerLog {
    pub periods: Vec<u32>,
}

impl StepTimer for TimerLog {
    fn set_timer(&mut self, ticks: u32) {
        self.periods.push(ticks);
    }
}

/// Tick the controller until the live move completes; returns the number of ticks.
pub fn run_to_completion<H>(controller: &mut MotionController, hw: &mut H) -> u32
where
    H: StepperDriver + StepTimer,
{
    let mut ticks = 0;
    loop {
        ticks += 1;
        match controller.step(hw) {
            TickOutcome::Completed => return ticks,
            TickOutcome::Idle => panic!("tick with no live move"),
            TickOutcome::Stepping { .. } => {}
        }
        assert!(ticks < 10_000_000, "move never completed");
    }
}
