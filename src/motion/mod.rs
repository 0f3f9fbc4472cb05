//! Motion module for dda-motion.
//!
//! Plans moves into DDA descriptors and steps them tick by tick.

mod descriptor;
mod executor;
pub mod math;
mod planner;
mod profile;
mod state;
mod target;

pub use descriptor::{MoveDescriptor, MoveTiming};
pub use executor::{MoveExecutor, StartOutcome, TickOutcome};
pub use planner::{create_move, Planner};
pub use profile::{
    AccelerationStrategy, ConstantTiming, MoveGeometry, RampTiming, Ramping, Temporal,
    TrapezoidalDuration, TrapezoidalTiming,
};
pub use state::{MoveState, StepTimeout};
pub use target::{Axis, Direction, Target};
