//! Scenario 1: Region Grants
//!
//! An entity walks from spawn through the market into the overlap of the
//! market and the arena, then leaves for another world. Each region
//! boundary crossing is reported by the region hook and re-resolves the
//! entity one tick later.

use condperm_contracts::{entity::Location, error::CondpermResult};

use super::{spawn_point, DemoOptions, DemoWorld};

/// Run Scenario 1: Region Grants.
pub fn run_scenario(options: &DemoOptions) -> CondpermResult<()> {
    println!("=== Scenario 1: Region Grants ===");
    println!();

    let mut world = DemoWorld::new(options)?;
    let alex = world.spawn(
        "alex",
        spawn_point(),
        &[
            "inregion=market.shop.trade",
            "inregion=arena.pvp.fight",
            "!inregion=spawn.build.place",
            "world=world_nether.nether.explore",
        ],
    );
    world.connect(alex);
    println!("  Connected at spawn");
    world.show_applied(alex);
    println!();

    world.move_to(alex, Location::new("world", 20.5, 64.0, 0.5));
    world.settle(1);
    world.show_applied(alex);
    println!();

    // Both regions at once.
    world.move_to(alex, Location::new("world", 44.5, 64.0, 0.5));
    world.settle(1);
    world.show_applied(alex);
    println!();

    // Sub-block movement is not a boundary crossing.
    world.move_to(alex, Location::new("world", 44.9, 64.0, 0.9));
    world.settle(1);
    println!();

    world.move_to(alex, Location::new("world_nether", 0.5, 64.0, 0.5));
    world.settle(1);
    world.show_applied(alex);

    world.show_report(alex);
    world.engine.shutdown();
    println!("  RESULT: grants followed region membership (expected)");
    println!();
    Ok(())
}
