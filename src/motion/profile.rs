//! Acceleration strategies.
//!
//! Each policy contributes two things: constants computed once per move by the planner, and
//! an incremental period update run once per tick. The tick update never divides by more
//! than one value and never takes a square root.
//!
//! Periods are 24.8 fixed point throughout; see [`to_fixed`].

use crate::config::{AccelerationPolicy, MotionConstants};

use super::descriptor::MoveTiming;
use super::math::{int_sqrt, msbloc, to_fixed, to_ticks, MAX_PERIOD_TICKS, PERIOD_SHIFT};
use super::state::MoveState;

/// Shortest period the ramp math may produce (one tick).
const MIN_PERIOD: u32 = 1 << PERIOD_SHIFT;

/// Longest period the ramp math may produce.
const MAX_PERIOD: u32 = to_fixed(MAX_PERIOD_TICKS);

/// Per-move quantities the planner hands to a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveGeometry {
    /// Major-axis step count, never zero.
    pub total_steps: u32,
    /// Estimated travel distance in µm, never zero.
    pub distance_um: u32,
    /// Move duration scaled per step; divide by a feedrate in mm/min to get timer ticks per step.
    pub move_duration: u32,
    /// Ticks per step below which some axis would exceed its rated speed.
    pub axis_limit: u32,
    /// Ticks per step of the move: the slower of the requested feed and `axis_limit`.
    pub c_limit: u32,
    /// Feedrate at the start of the move in mm/min, never zero.
    pub start_feedrate: u32,
    /// Requested feedrate in mm/min, never zero.
    pub end_feedrate: u32,
}

/// One acceleration algorithm.
pub trait AccelerationStrategy {
    /// Constants the strategy needs for the whole move.
    type Timing: Copy;

    /// Planner side: derive the move constants.
    fn compute_initial_state(
        &self,
        geometry: &MoveGeometry,
        constants: &MotionConstants,
    ) -> Self::Timing;

    /// Seed the period of a new move; returns the first delay in timer ticks.
    fn start(&self, timing: &Self::Timing, state: &mut MoveState) -> u32;

    /// Tick side: update the period; returns the next delay in timer ticks.
    fn advance_tick(&self, timing: &Self::Timing, state: &mut MoveState) -> u32;
}

// ============================================================================
// Ramping
// ============================================================================

/// Symmetric acceleration ramp from a configured acceleration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ramping;

/// Move constants of the ramping policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RampTiming {
    /// Period of the first step, 24.8 fixed point.
    pub c0: u32,
    /// Period at cruise speed, 24.8 fixed point. The timer is never armed shorter.
    pub c_min: u32,
    /// Ticks spent accelerating.
    pub rampup_steps: u32,
    /// Tick index after which deceleration starts.
    pub rampdown_steps: u32,
}

impl AccelerationStrategy for Ramping {
    type Timing = RampTiming;

    fn compute_initial_state(
        &self,
        geometry: &MoveGeometry,
        constants: &MotionConstants,
    ) -> RampTiming {
        let total = geometry.total_steps.max(1);
        let distance = geometry.distance_um.max(1);
        let c_limit = geometry.c_limit.max(1);
        let accel = constants.acceleration;

        // c0 = f / sqrt(a), a in steps/s² = 1000 * accel * total / distance
        let arg = (1000u64 * accel as u64 * total as u64) / distance as u64;
        let root = int_sqrt(arg.min(u32::MAX as u64) as u32).max(1) as u32;
        let c0 = to_fixed(constants.clock_hz / root);

        // Ramp length v² / 2a, kept within 32 bits one stage at a time.
        let mut x = constants.clock_hz / c_limit;
        x = x.saturating_mul(x);
        x >>= 12;
        x = x.saturating_mul(distance);
        let divisor = (((2000u32.saturating_mul(accel)) >> 6).saturating_mul(total) >> 6).max(1);
        x /= divisor;

        let rampup_steps = if x.saturating_mul(2) > total {
            total / 2
        } else {
            x
        };

        RampTiming {
            c0,
            c_min: to_fixed(c_limit),
            rampup_steps,
            rampdown_steps: total - rampup_steps,
        }
    }

    fn start(&self, timing: &RampTiming, state: &mut MoveState) -> u32 {
        state.c = timing.c0;
        // c_min wins when the previous move left no deceleration
        to_ticks(timing.c_min.max(state.c))
    }

    fn advance_tick(&self, timing: &RampTiming, state: &mut MoveState) -> u32 {
        let recalc = if state.step_no < timing.rampup_steps {
            if state.n < 0 {
                state.n = -2 - state.n;
            }
            true
        } else if state.step_no > timing.rampdown_steps {
            if state.n > 0 {
                state.n = -2 - state.n;
            }
            true
        } else {
            false
        };

        if recalc {
            state.n = state.n.saturating_add(4);
            let delta = state.c.saturating_mul(2) / state.n.unsigned_abs().max(1);
            state.c = if state.n > 0 {
                state.c.saturating_sub(delta)
            } else {
                state.c.saturating_add(delta)
            }
            .clamp(MIN_PERIOD, MAX_PERIOD);
        }
        state.step_no = state.step_no.saturating_add(1);

        // integer rounding overshoots the cruise period; never go faster than c_min
        to_ticks(timing.c_min.max(state.c))
    }
}

// ============================================================================
// Trapezoidal duration
// ============================================================================

/// Acceleration from the start feedrate to the requested feedrate over the whole move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrapezoidalDuration;

/// Move constants of the trapezoidal duration policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TrapezoidalTiming {
    /// Period of the first step, 24.8 fixed point.
    pub c: u32,
    /// Period to converge to, 24.8 fixed point.
    pub end_c: u32,
    /// Signed ramp coefficient; positive while accelerating.
    pub n: i32,
    /// Whether the period changes at all during the move.
    pub accel: bool,
}

impl AccelerationStrategy for TrapezoidalDuration {
    type Timing = TrapezoidalTiming;

    fn compute_initial_state(
        &self,
        geometry: &MoveGeometry,
        _constants: &MotionConstants,
    ) -> TrapezoidalTiming {
        let start_feed = geometry.start_feedrate.max(1);
        let end_feed = geometry.end_feedrate.max(1);

        let c = to_fixed((geometry.move_duration / start_feed).max(geometry.axis_limit));
        let end_c = to_fixed((geometry.move_duration / end_feed).max(geometry.axis_limit));

        if c == end_c {
            return TrapezoidalTiming {
                c,
                end_c,
                n: 0,
                accel: false,
            };
        }

        let st_f = start_feed / 4;
        let en_f = end_feed / 4;
        let ssq = st_f.saturating_mul(st_f);
        let esq = en_f.saturating_mul(en_f);
        let dsq = (esq.wrapping_sub(ssq) as i32) / 4;

        if dsq == 0 {
            // feedrates too close to resolve; jump straight to the end period
            return TrapezoidalTiming {
                c: end_c,
                end_c,
                n: 0,
                accel: false,
            };
        }

        let total = geometry.total_steps;
        let msb_ssq = msbloc(ssq);
        let msb_tot = msbloc(total);
        let ssq_i = ssq.min(i32::MAX as u32) as i32;
        let total_i = total.min(i32::MAX as u32) as i32;

        // pick the ordering that keeps the most precision without overflowing
        let n = if msb_tot + msb_ssq <= 30 {
            let product = i32::try_from(total.saturating_mul(ssq)).unwrap_or(i32::MAX);
            product / dsq
        } else if msb_tot >= msb_ssq {
            (total_i / dsq).saturating_mul(ssq_i)
        } else {
            (ssq_i / dsq).saturating_mul(total_i)
        }
        .saturating_add(1);

        TrapezoidalTiming {
            c,
            end_c,
            n,
            accel: true,
        }
    }

    fn start(&self, timing: &TrapezoidalTiming, state: &mut MoveState) -> u32 {
        state.c = timing.c;
        state.n = timing.n;
        to_ticks(state.c)
    }

    fn advance_tick(&self, timing: &TrapezoidalTiming, state: &mut MoveState) -> u32 {
        if timing.accel {
            let end_c = timing.end_c;
            if state.c > end_c && state.n > 0 {
                let step = state.c.saturating_mul(2) / state.n as u32;
                match state.c.checked_sub(step) {
                    Some(new_c) if new_c > end_c => {
                        state.c = new_c;
                        state.n = state.n.saturating_add(4);
                    }
                    _ => state.c = end_c,
                }
            } else if state.c < end_c && state.n < 0 {
                let step = state.c.saturating_mul(2) / state.n.unsigned_abs();
                match state.c.checked_add(step) {
                    Some(new_c) if new_c < end_c => {
                        state.c = new_c;
                        state.n = state.n.saturating_add(4);
                    }
                    _ => state.c = end_c,
                }
            } else if state.c != end_c {
                state.c = end_c;
            }
        }

        to_ticks(state.c)
    }
}

// ============================================================================
// Temporal
// ============================================================================

/// No acceleration: every step runs at the limiting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Temporal;

/// Move constants of the temporal policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConstantTiming {
    /// Step period, 24.8 fixed point.
    pub c: u32,
}

impl AccelerationStrategy for Temporal {
    type Timing = ConstantTiming;

    fn compute_initial_state(
        &self,
        geometry: &MoveGeometry,
        _constants: &MotionConstants,
    ) -> ConstantTiming {
        ConstantTiming {
            c: to_fixed(geometry.c_limit.max(1)),
        }
    }

    fn start(&self, timing: &ConstantTiming, state: &mut MoveState) -> u32 {
        state.c = timing.c;
        to_ticks(state.c)
    }

    fn advance_tick(&self, timing: &ConstantTiming, state: &mut MoveState) -> u32 {
        state.step_no = state.step_no.saturating_add(1);
        to_ticks(timing.c)
    }
}

// ============================================================================
// Dispatch
// ============================================================================

impl MoveTiming {
    /// Compute the timing of a move with the configured policy.
    pub fn plan(geometry: &MoveGeometry, constants: &MotionConstants) -> Self {
        match constants.policy {
            AccelerationPolicy::Ramping => {
                MoveTiming::Ramping(Ramping.compute_initial_state(geometry, constants))
            }
            AccelerationPolicy::TrapezoidalDuration => MoveTiming::Trapezoidal(
                TrapezoidalDuration.compute_initial_state(geometry, constants),
            ),
            AccelerationPolicy::Temporal => {
                MoveTiming::Constant(Temporal.compute_initial_state(geometry, constants))
            }
        }
    }

    /// Seed the period for a new move; returns the first delay in timer ticks.
    pub fn start(&self, state: &mut MoveState) -> u32 {
        match self {
            MoveTiming::Ramping(t) => Ramping.start(t, state),
            MoveTiming::Trapezoidal(t) => TrapezoidalDuration.start(t, state),
            MoveTiming::Constant(t) => Temporal.start(t, state),
        }
    }

    /// Update the period after a tick; returns the next delay in timer ticks.
    #[inline]
    pub fn advance_tick(&self, state: &mut MoveState) -> u32 {
        match self {
            MoveTiming::Ramping(t) => Ramping.advance_tick(t, state),
            MoveTiming::Trapezoidal(t) => TrapezoidalDuration.advance_tick(t, state),
            MoveTiming::Constant(t) => Temporal.advance_tick(t, state),
        }
    }
}
