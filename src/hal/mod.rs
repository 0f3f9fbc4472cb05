//! Hardware collaborators.
//!
//! The executor talks to the machine only through these two traits. They are called from
//! the tick handler, so implementations must not block and cannot report errors.

mod pins;

pub use pins::{AxisPins, PinStepper, PinStepperBuilder};

use crate::motion::{Axis, Direction};

/// Step, direction and enable outputs of the four axes.
pub trait StepperDriver {
    /// Power up the drivers (e.g. switch on the supply).
    fn power_on(&mut self);

    /// Energise one axis.
    fn enable(&mut self, axis: Axis);

    /// De-energise one axis.
    fn disable(&mut self, axis: Axis);

    /// Set the direction output of one axis.
    fn set_direction(&mut self, axis: Axis, direction: Direction);

    /// Assert the step output of one axis.
    fn step(&mut self, axis: Axis);

    /// Deassert every asserted step output.
    fn unstep(&mut self);

    /// Drive the extruder heater with `pwm`; 0 turns it off.
    fn set_extruder_heater(&mut self, _pwm: u8) {}
}

/// One-shot step timer.
pub trait StepTimer {
    /// Arm the timer to fire the next tick after `ticks` clock cycles.
    fn set_timer(&mut self, ticks: u32);

    /// Let other interrupt sources preempt the rest of the tick.
    fn allow_preemption(&mut self) {}

    /// Block preemption again before re-arming.
    fn mask_preemption(&mut self) {}
}

impl<T: StepperDriver + ?Sized> StepperDriver for &mut T {
    fn power_on(&mut self) {
        (**self).power_on()
    }

    fn enable(&mut self, axis: Axis) {
        (**self).enable(axis)
    }

    fn disable(&mut self, axis: Axis) {
        (**self).disable(axis)
    }

    fn set_direction(&mut self, axis: Axis, direction: Direction) {
        (**self).set_direction(axis, direction)
    }

    fn step(&mut self, axis: Axis) {
        (**self).step(axis)
    }

    fn unstep(&mut self) {
        (**self).unstep()
    }

    fn set_extruder_heater(&mut self, pwm: u8) {
        (**self).set_extruder_heater(pwm)
    }
}

impl<T: StepTimer + ?Sized> StepTimer for &mut T {
    fn set_timer(&mut self, ticks: u32) {
        (**self).set_timer(ticks)
    }

    fn allow_preemption(&mut self) {
        (**self).allow_preemption()
    }

    fn mask_preemption(&mut self) {
        (**self).mask_preemption()
    }
}

/// A stepper driver and a timer combined into the hardware the executor expects.
#[derive(Debug)]
pub struct Board<D, T> {
    /// Step/direction/enable outputs.
    pub driver: D,
    /// Step timer.
    pub timer: T,
}

impl<D, T> Board<D, T> {
    /// Pair a driver with a timer.
    pub fn new(driver: D, timer: T) -> Self {
        Self { driver, timer }
    }
}

impl<D: StepperDriver, T> StepperDriver for Board<D, T> {
    fn power_on(&mut self) {
        self.driver.power_on()
    }

    fn enable(&mut self, axis: Axis) {
        self.driver.enable(axis)
    }

    fn disable(&mut self, axis: Axis) {
        self.driver.disable(axis)
    }

    fn set_direction(&mut self, axis: Axis, direction: Direction) {
        self.driver.set_direction(axis, direction)
    }

    fn step(&mut self, axis: Axis) {
        self.driver.step(axis)
    }

    fn unstep(&mut self) {
        self.driver.unstep()
    }

    fn set_extruder_heater(&mut self, pwm: u8) {
        self.driver.set_extruder_heater(pwm)
    }
}

impl<D, T: StepTimer> StepTimer for Board<D, T> {
    fn set_timer(&mut self, ticks: u32) {
        self.timer.set_timer(ticks)
    }

    fn allow_preemption(&mut self) {
        self.timer.allow_preemption()
    }

    fn mask_preemption(&mut self) {
        self.timer.mask_preemption()
    }
}
