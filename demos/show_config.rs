//! Example: show the derived motion constants of a machine.
//!
//! This example demonstrates how to:
//! - Load a machine description from TOML (or fall back to the built-in RAMPS machine)
//! - Derive the integer constants used by the planner and executor
//! - Plan a few moves and inspect their timing
//!
//! Run with: `cargo run --example show_config --features std -- [machine.toml]`

use dda_motion::{
    config::{MachineConfig, MotionConstants},
    error::Result,
    motion::{create_move, MoveTiming, Target},
};

fn main() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            println!("Machine: {}\n", path);
            dda_motion::load_config(path)?
        }
        None => {
            println!("Machine: built-in RAMPS defaults\n");
            MachineConfig::default()
        }
    };

    let constants = MotionConstants::from_config(&config);
    println!("{}", constants);

    let origin = Target::new(0, 0, 0, 0, constants.search_feedrate.value());
    let moves = [
        ("X only", Target::new(4000, 0, 0, 0, 3000)),
        ("diagonal", Target::new(4000, 2000, 0, 0, 3000)),
        ("Z lift", Target::new(0, 0, 1280, 0, 3000)),
        ("print", Target::new(4000, 4000, 0, 2000, 1800)),
    ];

    println!("Sample moves from the origin:");
    println!("{}", "-".repeat(60));

    for (name, target) in moves {
        let dda = create_move(&constants, &target, &origin);
        print!(
            "  {:<10} {:>6} steps {:>8} um  ",
            name,
            dda.total_steps,
            dda.distance.value()
        );

        match dda.timing {
            MoveTiming::Ramping(t) => println!(
                "c0 {:>6}  c_min {:>6}  ramp {:>5}/{:>5}",
                t.c0 >> 8,
                t.c_min >> 8,
                t.rampup_steps,
                t.rampdown_steps
            ),
            MoveTiming::Trapezoidal(t) => {
                println!("c {:>6}  end_c {:>6}  n {:>8}", t.c >> 8, t.end_c >> 8, t.n)
            }
            MoveTiming::Constant(t) => println!("c {:>6}", t.c >> 8),
        }
    }

    Ok(())
}
