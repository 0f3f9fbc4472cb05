//! Integer motion constants derived from the machine configuration.

use core::fmt;

use libm::roundf;

use crate::motion::Axis;

use super::axis::AxisConfig;
use super::machine::{AccelerationPolicy, ExtruderMode, MachineConfig};
use super::units::{FeedRate, Micrometers, Ticks};

/// Derived integer parameters of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisConstants {
    /// Steps per metre of travel.
    pub steps_per_m: u32,

    /// Maximum feedrate the axis may run at.
    pub max_feedrate: FeedRate,

    /// Search feedrate of this axis.
    pub search_feedrate: FeedRate,

    /// Timer ticks between two steps when the axis runs at its maximum feedrate.
    pub min_clocks_per_step: Ticks,

    /// Driver is powered only while a move is live.
    pub disable_when_idle: bool,
}

impl AxisConstants {
    /// Derive the integer constants of one axis.
    pub fn from_config(config: &AxisConfig, clock_hz: u32) -> Self {
        let steps_per_m = roundf(config.steps_per_mm * 1000.0).max(1.0) as u32;

        let step_rate = config.max_step_frequency();
        let min_clocks = if step_rate > 0.0 {
            roundf(clock_hz as f32 / step_rate).max(1.0) as u32
        } else {
            u32::MAX
        };

        Self {
            steps_per_m,
            max_feedrate: config.max_feedrate,
            search_feedrate: config.search_feedrate(),
            min_clocks_per_step: Ticks(min_clocks),
            disable_when_idle: config.disable_when_idle,
        }
    }

    /// Convert a step count on this axis to micrometres.
    #[inline]
    pub fn steps_to_um(&self, steps: u32) -> Micrometers {
        let um = (steps as u64 * 1_000_000) / self.steps_per_m.max(1) as u64;
        Micrometers(um.min(u32::MAX as u64) as u32)
    }

    /// Maximum step frequency in steps per second.
    #[inline]
    pub fn max_step_frequency(&self, clock_hz: u32) -> u32 {
        clock_hz / self.min_clocks_per_step.value().max(1)
    }
}

/// Everything the planner and executor need, in integer form.
///
/// Computed once at system configuration time and shared read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionConstants {
    /// Clock feeding the step timer, in Hz.
    pub clock_hz: u32,

    /// Acceleration for the ramping policy, in mm/s².
    pub acceleration: u32,

    /// Acceleration algorithm.
    pub policy: AccelerationPolicy,

    /// Absolute or relative extruder coordinates.
    pub extruder_mode: ExtruderMode,

    /// Re-enable other interrupt sources after the latch phase.
    pub step_interrupt_interruptible: bool,

    /// Heater PWM applied while the extruder moves.
    pub dc_extruder_pwm: Option<u8>,

    /// Power-on feedrate; substitutes a requested feedrate of zero.
    pub search_feedrate: FeedRate,

    /// Per-axis constants, indexed by [`Axis::index`].
    pub axes: [AxisConstants; 4],
}

impl MotionConstants {
    /// Derive motion constants from a machine configuration.
    pub fn from_config(config: &MachineConfig) -> Self {
        let clock_hz = config.clock_hz;
        let axes = [
            AxisConstants::from_config(&config.axes.x, clock_hz),
            AxisConstants::from_config(&config.axes.y, clock_hz),
            AxisConstants::from_config(&config.axes.z, clock_hz),
            AxisConstants::from_config(&config.axes.e, clock_hz),
        ];

        Self {
            clock_hz,
            acceleration: roundf(config.acceleration).max(1.0) as u32,
            policy: config.acceleration_policy,
            extruder_mode: config.extruder_mode,
            step_interrupt_interruptible: config.step_interrupt_interruptible,
            dc_extruder_pwm: config.dc_extruder_pwm,
            search_feedrate: config.effective_search_feedrate(),
            axes,
        }
    }

    /// Constants of one axis.
    #[inline]
    pub fn axis(&self, axis: Axis) -> &AxisConstants {
        &self.axes[axis.index()]
    }

    /// The same constants with another acceleration policy.
    pub fn with_policy(mut self, policy: AccelerationPolicy) -> Self {
        self.policy = policy;
        self
    }
}

impl Default for MotionConstants {
    fn default() -> Self {
        Self::from_config(&MachineConfig::default())
    }
}

impl fmt::Display for MotionConstants {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<24}{:>12}{:>12}{:>12}{:>12}   units",
            "", "X-axis", "Y-axis", "Z-axis", "E-axis"
        )?;

        write!(f, "{:<24}", "steps per metre")?;
        for axis in Axis::ALL {
            write!(f, "{:>12}", self.axis(axis).steps_per_m)?;
        }
        writeln!(f, "   [steps/m]")?;

        write!(f, "{:<24}", "maximum feedrate")?;
        for axis in Axis::ALL {
            write!(f, "{:>12}", self.axis(axis).max_feedrate.value())?;
        }
        writeln!(f, "   [mm/min]")?;

        write!(f, "{:<24}", "search feedrate")?;
        for axis in Axis::ALL {
            write!(f, "{:>12}", self.axis(axis).search_feedrate.value())?;
        }
        writeln!(f, "   [mm/min]")?;

        write!(f, "{:<24}", "max step frequency")?;
        for axis in Axis::ALL {
            write!(f, "{:>12}", self.axis(axis).max_step_frequency(self.clock_hz))?;
        }
        writeln!(f, "   [steps/s]")?;

        write!(f, "{:<24}", "min clocks per step")?;
        for axis in Axis::ALL {
            write!(f, "{:>12}", self.axis(axis).min_clocks_per_step.value())?;
        }
        writeln!(f, "   [clocks/step]")?;

        writeln!(f)?;
        writeln!(f, "{:<24}{:>12}   [Hz]", "timer clock", self.clock_hz)?;
        writeln!(f, "{:<24}{:>12}   [mm/s²]", "acceleration", self.acceleration)?;
        writeln!(f, "{:<24}{:>12}   [mm/min]", "search feedrate", self.search_feedrate.value())?;
        writeln!(f, "{:<24}{:?}", "acceleration policy", self.policy)?;
        writeln!(f, "{:<24}{:?}", "extruder mode", self.extruder_mode)
    }
}
