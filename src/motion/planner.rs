//! Move planning.
//!
//! Turns a target position into a [`MoveDescriptor`] that fully determines the step timing.
//! All the expensive arithmetic (distance estimate, square root, ramp length) happens here,
//! outside the tick handler.

use crate::config::units::{FeedRate, Micrometers};
use crate::config::MotionConstants;

use super::descriptor::{MoveDescriptor, MoveTiming};
use super::math::{approx_distance_2d, approx_distance_3d, MAX_MOVE_DISTANCE_UM};
use super::profile::MoveGeometry;
use super::target::{Axis, Direction, Target};

/// Plan the move from `start` to `target`.
///
/// Performs no bounds checking on `target`. A feedrate of zero, on either end, is replaced
/// by the search feedrate.
pub fn create_move(constants: &MotionConstants, target: &Target, start: &Target) -> MoveDescriptor {
    let mut dda = MoveDescriptor {
        endpoint: *target,
        ..Default::default()
    };

    for axis in Axis::ALL {
        let i = axis.index();
        dda.deltas[i] = target.axis(axis).abs_diff(start.axis(axis));
        dda.directions[i] = Direction::between(start.axis(axis), target.axis(axis));
    }

    dda.total_steps = dda.deltas.iter().copied().max().unwrap_or(0);

    if dda.total_steps == 0 {
        dda.nullmove = true;
        trace!("dda: nullmove, F {}", target.f.value());
        return dda;
    }

    let distance = estimate_distance(constants, &dda);
    dda.distance = Micrometers(distance);

    let total = dda.total_steps;
    let search = constants.search_feedrate;
    let end_feedrate = non_zero_feed(target.f, search);
    let start_feedrate = non_zero_feed(start.f, search);

    // Staged so that nothing exceeds 32 bits below MAX_MOVE_DISTANCE_UM.
    debug_assert!(distance <= MAX_MOVE_DISTANCE_UM);
    let move_duration =
        (distance.saturating_mul(2400) / total).saturating_mul(constants.clock_hz / 40_000);

    let c_feed = move_duration / end_feedrate;

    let axis_limit = Axis::ALL
        .iter()
        .map(|&axis| {
            dda.delta(axis)
                .saturating_mul(constants.axis(axis).min_clocks_per_step.value())
        })
        .max()
        .unwrap_or(0)
        / total;

    let c_limit = c_feed.max(axis_limit).max(1);

    let geometry = MoveGeometry {
        total_steps: total,
        distance_um: distance,
        move_duration,
        axis_limit,
        c_limit,
        start_feedrate,
        end_feedrate,
    };
    dda.timing = MoveTiming::plan(&geometry, constants);

    trace!(
        "dda: [{},{},{},{}] ts {} ds {} md {} cl {}",
        dda.deltas[0],
        dda.deltas[1],
        dda.deltas[2],
        dda.deltas[3],
        total,
        distance,
        move_duration,
        c_limit
    );
    match dda.timing {
        MoveTiming::Ramping(t) => {
            trace!("dda: c0 {} c_min {} ru {} rd {}", t.c0 >> 8, t.c_min >> 8, t.rampup_steps, t.rampdown_steps);
        }
        MoveTiming::Trapezoidal(t) => {
            trace!("dda: c {} end_c {} n {}", t.c >> 8, t.end_c >> 8, t.n);
        }
        MoveTiming::Constant(t) => {
            trace!("dda: c {}", t.c >> 8);
        }
    }

    dda
}

fn non_zero_feed(feed: FeedRate, search: FeedRate) -> u32 {
    if feed.is_zero() {
        search.value().max(1)
    } else {
        feed.value()
    }
}

/// Travel distance in µm, using the cheapest approximation the axis combination allows.
fn estimate_distance(constants: &MotionConstants, dda: &MoveDescriptor) -> u32 {
    let um = |axis: Axis| constants.axis(axis).steps_to_um(dda.delta(axis)).value();
    let (dx, dy, dz) = (dda.delta(Axis::X), dda.delta(Axis::Y), dda.delta(Axis::Z));

    let mut distance = if dz == 0 {
        if dx == 0 {
            um(Axis::Y)
        } else if dy == 0 {
            um(Axis::X)
        } else {
            approx_distance_2d(um(Axis::X), um(Axis::Y))
        }
    } else if dx == 0 && dy == 0 {
        um(Axis::Z)
    } else {
        approx_distance_3d(um(Axis::X), um(Axis::Y), um(Axis::Z))
    };

    // small extruder moves don't change the feed distance
    let e_um = um(Axis::E);
    if distance < e_um.saturating_mul(8) {
        distance = approx_distance_2d(distance, e_um);
    }

    if distance == 0 {
        warn!("dda: {} steps over zero distance, using 1 um", dda.total_steps);
        distance = 1;
    }

    distance
}

/// Stateful planner holding the endpoint of the last planned move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Planner {
    startpoint: Target,
}

impl Planner {
    /// Planner at the origin with the search feedrate.
    pub fn new(constants: &MotionConstants) -> Self {
        Self {
            startpoint: Target {
                f: constants.search_feedrate,
                ..Default::default()
            },
        }
    }

    /// Endpoint of the last planned move, start of the next one.
    #[inline]
    pub fn startpoint(&self) -> &Target {
        &self.startpoint
    }

    /// Redefine where the next move starts, e.g. after homing.
    pub fn set_startpoint(&mut self, startpoint: Target) {
        self.startpoint = startpoint;
    }

    /// Plan a move from the startpoint to `target` and advance the startpoint.
    pub fn create_move(&mut self, constants: &MotionConstants, target: &Target) -> MoveDescriptor {
        let dda = create_move(constants, target, &self.startpoint);

        self.startpoint = *target;
        if constants.extruder_mode.is_relative() {
            self.startpoint.e = 0;
        }

        dda
    }
}
