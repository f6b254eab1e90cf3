//! Scenario 2: Chained Conditions
//!
//! A conditional grant whose target is itself a conditional grant. The
//! concrete target applies only while every condition in the chain holds;
//! the intermediate grants never stay on the entity.

use condperm_contracts::error::CondpermResult;

use super::{spawn_point, DemoOptions, DemoWorld};

/// Run Scenario 2: Chained Conditions.
pub fn run_scenario(options: &DemoOptions) -> CondpermResult<()> {
    println!("=== Scenario 2: Chained Conditions ===");
    println!();

    let mut world = DemoWorld::new(options)?;
    let prefix = world.engine.config().prefix.clone();
    let chain = format!("world=world.{prefix}.inregion=spawn.{prefix}.!flying.spawn.build");

    let sam = world.spawn("sam", spawn_point(), &[chain.as_str(), "nosuchcondition.never"]);
    world.connect(sam);
    println!("  Connected at spawn, on the ground");
    world.show_applied(sam);
    world.show_report(sam);
    println!();

    println!("  Sam starts flying");
    let event = world.host.update_status(sam, |status| status.flying = true);
    world.dispatch(event);
    world.settle(1);
    world.show_applied(sam);
    println!();

    println!("  Sam lands");
    let event = world.host.update_status(sam, |status| status.flying = false);
    world.dispatch(event);
    world.settle(1);
    world.show_applied(sam);

    world.engine.shutdown();
    println!("  RESULT: chain applied only while all three conditions held (expected)");
    println!();
    Ok(())
}
