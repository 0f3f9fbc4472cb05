//! Integration tests for dda-motion
//!
//! These tests drive complete moves from planning through the tick handler into recorded
//! hardware calls.

mod common;

use common::{null_stepper, run_to_completion, Recorder, TimerLog};
use dda_motion::config::units::FeedRate;
use dda_motion::error::{Error, MotionError};
use dda_motion::{
    parse_config, AccelerationPolicy, Axis, Board, Direction, ExtruderMode, MachineConfig,
    MotionConstants, MotionController, StartOutcome, Target,
};

// =============================================================================
// Test configuration data
// =============================================================================

const TEMPORAL_CONFIG: &str = r#"
clock_hz = 16000000
acceleration_policy = "temporal"
acceleration_mm_per_s2 = 500
extruder_mode = "relative"
step_interrupt_interruptible = false

[axes.x]
steps_per_mm = 80.0
max_feedrate_mm_per_min = 12000

[axes.y]
steps_per_mm = 80.0
max_feedrate_mm_per_min = 12000

[axes.z]
steps_per_mm = 400.0
max_feedrate_mm_per_min = 300
disable_when_idle = true

[axes.e]
steps_per_mm = 96.0
max_feedrate_mm_per_min = 3000
"#;

fn controller_with(policy: AccelerationPolicy) -> MotionController {
    MotionController::new(MotionConstants::default().with_policy(policy))
}

fn execute(controller: &mut MotionController, hw: &mut Recorder, target: Target) -> u32 {
    let dda = controller.create_move(&target);
    assert_eq!(controller.start(dda, hw), Ok(StartOutcome::Running));
    run_to_completion(controller, hw)
}

// =============================================================================
// Single moves
// =============================================================================

#[test]
fn test_single_axis_move() {
    let mut controller = controller_with(AccelerationPolicy::Ramping);
    let mut hw = Recorder::new();

    let ticks = execute(&mut controller, &mut hw, Target::new(1000, 0, 0, 0, 3000));

    assert_eq!(hw.pulses, [1000, 0, 0, 0]);
    // one tick per X step plus the tick that notices completion
    assert_eq!(ticks, 1001);
    assert_eq!(hw.periods.len(), ticks as usize + 1);
    assert_eq!(hw.unsteps, ticks);
    assert_eq!(hw.power_ons, 1);
    assert_eq!(hw.enabled, vec![Axis::X]);
    assert_eq!(controller.current_position().x, 1000);
    assert!(!controller.is_live());
}

#[test]
fn test_planar_move() {
    let mut controller = controller_with(AccelerationPolicy::Ramping);
    let mut hw = Recorder::new();

    execute(&mut controller, &mut hw, Target::new(1000, 500, 0, 0, 3000));

    assert_eq!(hw.pulses, [1000, 500, 0, 0]);
    assert_eq!(hw.enabled, vec![Axis::X, Axis::Y]);
    assert_eq!(
        (controller.current_position().x, controller.current_position().y),
        (1000, 500)
    );
}

#[test]
fn test_directions_set_on_every_axis() {
    let mut controller = controller_with(AccelerationPolicy::Ramping);
    let mut hw = Recorder::new();

    execute(&mut controller, &mut hw, Target::new(-400, 300, 0, 0, 3000));

    assert_eq!(
        hw.directions,
        [
            Some(Direction::Negative),
            Some(Direction::Positive),
            Some(Direction::Positive),
            Some(Direction::Positive),
        ]
    );
    assert_eq!(controller.current_position().x, -400);
}

#[test]
fn test_nullmove_updates_feedrate_only() {
    let mut controller = controller_with(AccelerationPolicy::Ramping);
    let mut hw = Recorder::new();

    let dda = controller.create_move(&Target::new(0, 0, 0, 0, 1500));
    assert!(dda.nullmove);

    assert_eq!(
        controller.start(dda, &mut hw),
        Ok(StartOutcome::FeedrateOnly(FeedRate(1500)))
    );
    assert_eq!(controller.current_position().f, FeedRate(1500));
    assert!(hw.periods.is_empty());
    assert_eq!(hw.power_ons, 0);
    assert!(!controller.is_live());
}

// =============================================================================
// Speed limits and acceleration policies
// =============================================================================

#[test]
fn test_axis_feedrate_never_exceeded() {
    for policy in [
        AccelerationPolicy::Ramping,
        AccelerationPolicy::TrapezoidalDuration,
        AccelerationPolicy::Temporal,
    ] {
        for (target, axis) in [
            (Target::new(2000, 0, 0, 0, 100_000), Axis::X),
            (Target::new(0, 0, 1000, 0, 3000), Axis::Z),
        ] {
            let mut controller = controller_with(policy);
            let mut hw = Recorder::new();
            let min_clocks = controller.constants().axis(axis).min_clocks_per_step.value();

            execute(&mut controller, &mut hw, target);

            assert!(
                hw.periods.iter().all(|&p| p >= min_clocks),
                "{:?} on {:?} armed {:?} below {}",
                policy,
                axis,
                hw.periods.iter().min(),
                min_clocks
            );
        }
    }
}

#[test]
fn test_every_policy_completes_with_exact_counts() {
    for policy in [
        AccelerationPolicy::Ramping,
        AccelerationPolicy::TrapezoidalDuration,
        AccelerationPolicy::Temporal,
    ] {
        let mut controller = controller_with(policy);
        let mut hw = Recorder::new();

        execute(&mut controller, &mut hw, Target::new(1200, -800, 40, 300, 2400));

        assert_eq!(hw.pulses, [1200, 800, 40, 300], "{:?}", policy);
        let position = controller.current_position();
        assert_eq!((position.x, position.y, position.z, position.e), (1200, -800, 40, 0));
    }
}

#[test]
fn test_ramp_accelerates_then_decelerates() {
    let mut controller = controller_with(AccelerationPolicy::Ramping);
    let mut hw = Recorder::new();

    execute(&mut controller, &mut hw, Target::new(8000, 0, 0, 0, 6000));

    let first = hw.periods[0];
    let fastest = *hw.periods.iter().min().unwrap();
    let last = hw.periods[hw.periods.len() - 2];

    assert!(first > fastest);
    assert!(last > fastest);
}

// =============================================================================
// Position tracking
// =============================================================================

#[test]
fn test_refresh_position_mid_move() {
    let mut controller = controller_with(AccelerationPolicy::Ramping);
    let mut hw = Recorder::new();

    assert_eq!(controller.refresh_current_position().x, 0);

    let dda = controller.create_move(&Target::new(1000, 0, 0, 0, 3000));
    controller.start(dda, &mut hw).unwrap();
    for _ in 0..300 {
        controller.step(&mut hw);
    }

    let first = controller.refresh_current_position();
    let second = controller.refresh_current_position();
    assert_eq!(first, second);
    assert_eq!(first.x, 300);

    run_to_completion(&mut controller, &mut hw);
    assert_eq!(controller.refresh_current_position().x, 1000);
}

#[test]
fn test_relative_extruder_resets_after_each_move() {
    let mut controller = controller_with(AccelerationPolicy::Ramping);
    let mut hw = Recorder::new();

    execute(&mut controller, &mut hw, Target::new(1000, 0, 0, 300, 1800));
    assert_eq!(hw.pulses(Axis::E), 300);
    assert_eq!(controller.current_position().e, 0);
    assert_eq!(controller.startpoint().e, 0);

    hw.clear();
    execute(&mut controller, &mut hw, Target::new(2000, 0, 0, 300, 1800));
    assert_eq!(hw.pulses(Axis::E), 300);
    assert_eq!(controller.current_position().e, 0);
}

#[test]
fn test_absolute_extruder_keeps_position() {
    let config = MachineConfig {
        extruder_mode: ExtruderMode::Absolute,
        ..MachineConfig::default()
    };
    let mut controller = MotionController::new(MotionConstants::from_config(&config));
    let mut hw = Recorder::new();

    execute(&mut controller, &mut hw, Target::new(1000, 0, 0, 300, 1800));
    assert_eq!(controller.current_position().e, 300);

    hw.clear();
    execute(&mut controller, &mut hw, Target::new(2000, 0, 0, 300, 1800));
    assert_eq!(hw.pulses(Axis::E), 0);
    assert_eq!(controller.current_position().e, 300);
}

#[test]
fn test_set_position_moves_origin() {
    let mut controller = controller_with(AccelerationPolicy::Ramping);
    let mut hw = Recorder::new();

    controller
        .set_position(Target::new(5000, 0, 0, 0, 3000))
        .unwrap();
    execute(&mut controller, &mut hw, Target::new(5100, 0, 0, 0, 3000));

    assert_eq!(hw.pulses, [100, 0, 0, 0]);
    assert_eq!(hw.directions[Axis::X.index()], Some(Direction::Positive));
    assert_eq!(controller.current_position().x, 5100);
}

// =============================================================================
// Hardware side effects
// =============================================================================

#[test]
fn test_idle_axes_disabled_at_completion() {
    let mut controller = controller_with(AccelerationPolicy::Ramping);
    let mut hw = Recorder::new();

    execute(&mut controller, &mut hw, Target::new(1000, 0, 0, 0, 3000));

    // only Z is configured to power down between moves
    assert_eq!(hw.disabled, vec![Axis::Z]);
}

#[test]
fn test_extruder_heater_follows_extruding_moves() {
    let config = MachineConfig {
        dc_extruder_pwm: Some(180),
        ..MachineConfig::default()
    };
    let mut controller = MotionController::new(MotionConstants::from_config(&config));
    let mut hw = Recorder::new();

    execute(&mut controller, &mut hw, Target::new(1000, 0, 0, 0, 3000));
    assert!(hw.heater.is_empty());

    execute(&mut controller, &mut hw, Target::new(2000, 0, 0, 200, 1800));
    assert_eq!(hw.heater, vec![180, 0]);
}

#[test]
fn test_compute_phase_runs_preemptible() {
    let mut controller = controller_with(AccelerationPolicy::Ramping);
    let mut hw = Recorder::new();

    let ticks = execute(&mut controller, &mut hw, Target::new(500, 0, 0, 0, 3000));
    assert_eq!(hw.preemption_windows, ticks);
}

#[test]
fn test_pin_board_runs_move() {
    let mut controller = controller_with(AccelerationPolicy::Ramping);
    let mut board = Board::new(null_stepper(), TimerLog::default());

    let dda = controller.create_move(&Target::new(400, -200, 0, 0, 3000));
    assert_eq!(controller.start(dda, &mut board), Ok(StartOutcome::Running));
    let ticks = run_to_completion(&mut controller, &mut board);

    assert_eq!(ticks, 401);
    assert_eq!(board.timer.periods.len(), ticks as usize + 1);
    assert!(board.driver.take_fault().is_ok());
    assert_eq!(
        (controller.current_position().x, controller.current_position().y),
        (400, -200)
    );
}

#[test]
fn test_busy_until_completion() {
    let mut controller = controller_with(AccelerationPolicy::Ramping);
    let mut hw = Recorder::new();

    let first = controller.create_move(&Target::new(300, 0, 0, 0, 3000));
    let second = controller.create_move(&Target::new(600, 0, 0, 0, 3000));

    controller.start(first, &mut hw).unwrap();
    assert_eq!(
        controller.start(second, &mut hw),
        Err(Error::Motion(MotionError::Busy))
    );

    run_to_completion(&mut controller, &mut hw);
    assert_eq!(controller.start(second, &mut hw), Ok(StartOutcome::Running));
    run_to_completion(&mut controller, &mut hw);

    assert_eq!(hw.pulses(Axis::X), 600);
    assert_eq!(controller.current_position().x, 600);
}

// =============================================================================
// Configuration workflow
// =============================================================================

#[test]
fn test_toml_to_motion_workflow() {
    // Step 1: Parse configuration
    let config = parse_config(TEMPORAL_CONFIG).expect("Config should parse");
    assert_eq!(config.acceleration_policy, AccelerationPolicy::Temporal);

    // Step 2: Derive integer constants
    let constants = MotionConstants::from_config(&config);
    // 80 steps/mm at 200 mm/s is 16000 steps/s
    assert_eq!(constants.axis(Axis::X).min_clocks_per_step.value(), 1000);

    // Step 3: Run 20 mm at 100 mm/s
    let mut controller = MotionController::new(constants);
    let mut hw = Recorder::new();
    execute(&mut controller, &mut hw, Target::new(1600, 0, 0, 0, 6000));

    // Step 4: Constant speed at 8000 steps/s, no preemption window
    assert_eq!(hw.pulses, [1600, 0, 0, 0]);
    assert!(hw.periods.iter().all(|&p| p == 2000));
    assert_eq!(hw.preemption_windows, 0);
    assert_eq!(hw.disabled, vec![Axis::Z]);
}

#[test]
fn test_invalid_toml_rejected() {
    let bad = TEMPORAL_CONFIG.replace("clock_hz = 16000000", "clock_hz = 0");
    assert!(parse_config(&bad).is_err());
}
