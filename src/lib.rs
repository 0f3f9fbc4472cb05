//! # dda-motion
//!
//! Motion core of a 3D printer / CNC firmware: plans linear moves into digital differential
//! analyser (DDA) descriptors and steps them from a timer interrupt.
//!
//! ## Features
//!
//! - **Bresenham stepping**: up to four axes (X, Y, Z, extruder) stepped in lockstep with
//!   integer arithmetic only
//! - **Three acceleration policies**: symmetric ramping, trapezoidal from start to end feed,
//!   or constant speed
//! - **Per-axis speed limits**: no axis is ever asked to exceed its rated feedrate
//! - **embedded-hal 1.0**: `OutputPin` based stepper driver included
//! - **no_std compatible**: nothing allocates, nothing in the tick handler divides more than once
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dda_motion::hal::AxisPins;
//! use dda_motion::{Axis, Board, MotionConstants, MotionController, PinStepper, Target, TickOutcome};
//!
//! // Derive integer constants from the machine description
//! let config = dda_motion::load_config("machine.toml")?;
//! let mut controller = MotionController::new(MotionConstants::from_config(&config));
//!
//! // STEP/DIR pins of the four drivers plus the board's step timer
//! let driver = PinStepper::builder()
//!     .axis(Axis::X, AxisPins::new(x_step, x_dir))
//!     .axis(Axis::Y, AxisPins::new(y_step, y_dir))
//!     .axis(Axis::Z, AxisPins::new(z_step, z_dir).with_enable(z_enable))
//!     .axis(Axis::E, AxisPins::new(e_step, e_dir))
//!     .build()?;
//! let mut board = Board::new(driver, step_timer);
//!
//! // Plan and start a move of 1000 X steps at 3000 mm/min
//! let dda = controller.create_move(&Target::new(1000, 0, 0, 0, 3000));
//! controller.start(dda, &mut board)?;
//!
//! // From the timer interrupt
//! if controller.step(&mut board) == TickOutcome::Completed {
//!     // start the next queued move
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O and TOML parsing
//! - `alloc`: Enables heap allocation for no_std with allocator
//! - `defmt`: Enables defmt logging for embedded targets
//! - `log`: Enables logging through the `log` facade

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

#[cfg(feature = "alloc")]
extern crate alloc;

// This must go first so the logging macros are visible to every other module
mod fmt;

// Core modules
pub mod config;
pub mod controller;
pub mod error;
pub mod hal;
pub mod motion;

// Re-exports for ergonomic API
pub use config::{
    validate_config, AccelerationPolicy, ExtruderMode, MachineConfig, MotionConstants,
};
pub use controller::MotionController;
pub use error::{Error, Result};
pub use hal::{Board, PinStepper, StepTimer, StepperDriver};
pub use motion::{
    create_move, Axis, Direction, MoveDescriptor, MoveExecutor, MoveTiming, Planner,
    StartOutcome, Target, TickOutcome,
};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};

// Unit types
pub use config::units::{FeedRate, Micrometers, Ticks};
