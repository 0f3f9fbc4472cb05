//! [`StepperDriver`] over embedded-hal 1.0 output pins.
//!
//! Each axis has a STEP and DIR pin and an optional active-low ENABLE pin, as on the
//! common A4988/DRV8825 driver boards.

use embedded_hal::digital::OutputPin;

use crate::error::{ConfigError, Error, MotorError, Result};
use crate::motion::{Axis, Direction};

use super::StepperDriver;

/// Pins of one axis.
#[derive(Debug)]
pub struct AxisPins<P> {
    step: P,
    dir: P,
    enable: Option<P>,
    invert_direction: bool,
    current_direction: Option<Direction>,
    stepping: bool,
}

impl<P: OutputPin> AxisPins<P> {
    /// STEP and DIR pins; the driver is always enabled.
    pub fn new(step: P, dir: P) -> Self {
        Self {
            step,
            dir,
            enable: None,
            invert_direction: false,
            current_direction: None,
            stepping: false,
        }
    }

    /// Add an active-low ENABLE pin.
    pub fn with_enable(mut self, enable: P) -> Self {
        self.enable = Some(enable);
        self
    }

    /// Set direction inversion.
    pub fn invert_direction(mut self, invert: bool) -> Self {
        self.invert_direction = invert;
        self
    }

    /// Give the pins back.
    pub fn into_pins(self) -> (P, P, Option<P>) {
        (self.step, self.dir, self.enable)
    }

    fn set_direction(&mut self, direction: Direction) -> Result<()> {
        if self.current_direction == Some(direction) {
            return Ok(());
        }

        let pin_high = direction.is_positive() != self.invert_direction;
        if pin_high {
            self.dir.set_high().map_err(|_| MotorError::PinError)?;
        } else {
            self.dir.set_low().map_err(|_| MotorError::PinError)?;
        }

        self.current_direction = Some(direction);
        Ok(())
    }
}

/// Builder for [`PinStepper`].
pub struct PinStepperBuilder<P> {
    axes: [Option<AxisPins<P>>; 4],
    power: Option<P>,
}

impl<P: OutputPin> Default for PinStepperBuilder<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: OutputPin> PinStepperBuilder<P> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            axes: [None, None, None, None],
            power: None,
        }
    }

    /// Set the pins of one axis.
    pub fn axis(mut self, axis: Axis, pins: AxisPins<P>) -> Self {
        self.axes[axis.index()] = Some(pins);
        self
    }

    /// Set the power supply pin, driven high by [`StepperDriver::power_on`].
    pub fn power_pin(mut self, pin: P) -> Self {
        self.power = Some(pin);
        self
    }

    /// Build the PinStepper.
    ///
    /// # Errors
    ///
    /// Returns an error if an axis has no pins.
    pub fn build(self) -> Result<PinStepper<P>> {
        let [x, y, z, e] = self.axes;
        let missing = |axis: Axis| {
            Error::Config(ConfigError::MissingPin {
                axis: axis.letter(),
                pin: "step/dir",
            })
        };

        Ok(PinStepper {
            axes: [
                x.ok_or_else(|| missing(Axis::X))?,
                y.ok_or_else(|| missing(Axis::Y))?,
                z.ok_or_else(|| missing(Axis::Z))?,
                e.ok_or_else(|| missing(Axis::E))?,
            ],
            power: self.power,
            fault: None,
        })
    }
}

/// Pin-level stepper driver for four axes.
///
/// The `try_*` methods report pin failures directly. The [`StepperDriver`] methods run in
/// the tick handler and cannot, so they latch the first failure; check it with
/// [`take_fault`](Self::take_fault) from the foreground.
pub struct PinStepper<P> {
    axes: [AxisPins<P>; 4],
    power: Option<P>,
    fault: Option<MotorError>,
}

impl<P: OutputPin> PinStepper<P> {
    /// Start building a PinStepper.
    pub fn builder() -> PinStepperBuilder<P> {
        PinStepperBuilder::new()
    }

    /// Switch on the power supply pin, if any.
    pub fn try_power_on(&mut self) -> Result<()> {
        if let Some(pin) = self.power.as_mut() {
            pin.set_high().map_err(|_| MotorError::PinError)?;
        }
        Ok(())
    }

    /// Pull the ENABLE pin of one axis low.
    pub fn try_enable(&mut self, axis: Axis) -> Result<()> {
        if let Some(pin) = self.axes[axis.index()].enable.as_mut() {
            pin.set_low().map_err(|_| MotorError::PinError)?;
        }
        Ok(())
    }

    /// Release the ENABLE pin of one axis.
    pub fn try_disable(&mut self, axis: Axis) -> Result<()> {
        if let Some(pin) = self.axes[axis.index()].enable.as_mut() {
            pin.set_high().map_err(|_| MotorError::PinError)?;
        }
        Ok(())
    }

    /// Set the DIR pin of one axis. Unchanged directions are not written again.
    pub fn try_set_direction(&mut self, axis: Axis, direction: Direction) -> Result<()> {
        self.axes[axis.index()].set_direction(direction)
    }

    /// Raise the STEP pin of one axis.
    pub fn try_step(&mut self, axis: Axis) -> Result<()> {
        let pins = &mut self.axes[axis.index()];
        pins.step.set_high().map_err(|_| MotorError::PinError)?;
        pins.stepping = true;
        Ok(())
    }

    /// Lower every raised STEP pin.
    ///
    /// A pin that fails stays marked as raised and is retried on the next call; the others
    /// are still lowered. Returns the first failure.
    pub fn try_unstep(&mut self) -> Result<()> {
        let mut result = Ok(());
        for pins in self.axes.iter_mut().filter(|p| p.stepping) {
            match pins.step.set_low() {
                Ok(()) => pins.stepping = false,
                Err(_) => {
                    if result.is_ok() {
                        result = Err(Error::Motor(MotorError::PinError));
                    }
                }
            }
        }
        result
    }

    /// First pin failure seen by the infallible methods, cleared on return.
    pub fn take_fault(&mut self) -> Result<()> {
        match self.fault.take() {
            Some(e) => Err(Error::Motor(e)),
            None => Ok(()),
        }
    }

    /// Give the pins back.
    pub fn release(self) -> ([AxisPins<P>; 4], Option<P>) {
        (self.axes, self.power)
    }

    fn latch_fault(&mut self, result: Result<()>) {
        if let Err(Error::Motor(e)) = result {
            if self.fault.is_none() {
                self.fault = Some(e);
            }
        }
    }
}

impl<P: OutputPin> StepperDriver for PinStepper<P> {
    fn power_on(&mut self) {
        let result = self.try_power_on();
        self.latch_fault(result);
    }

    fn enable(&mut self, axis: Axis) {
        let result = self.try_enable(axis);
        self.latch_fault(result);
    }

    fn disable(&mut self, axis: Axis) {
        let result = self.try_disable(axis);
        self.latch_fault(result);
    }

    fn set_direction(&mut self, axis: Axis, direction: Direction) {
        let result = self.try_set_direction(axis, direction);
        self.latch_fault(result);
    }

    fn step(&mut self, axis: Axis) {
        let result = self.try_step(axis);
        self.latch_fault(result);
    }

    fn unstep(&mut self) {
        let result = self.try_unstep();
        self.latch_fault(result);
    }
}
