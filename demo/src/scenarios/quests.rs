//! Scenario 3: Quest Conditions
//!
//! Grants gated on quest-engine conditions. Quest progress produces no host
//! event, so the scenario refreshes the entity the way an operator would.

use condperm_contracts::error::CondpermResult;

use super::{spawn_point, DemoOptions, DemoWorld};

/// Run Scenario 3: Quest Conditions.
pub fn run_scenario(options: &DemoOptions) -> CondpermResult<()> {
    println!("=== Scenario 3: Quest Conditions ===");
    println!();

    let mut world = DemoWorld::new(options)?;
    world.quests.define("tutorial", "finished");

    let kim = world.spawn(
        "kim",
        spawn_point(),
        &[
            "quest=tutorial:finished.kit.starter",
            "!quest=tutorial:finished.tutorial.hints",
            // Malformed and unknown quest references never apply.
            "quest=tutorial.malformed",
            "quest=tutorial:missing.never",
        ],
    );
    world.connect(kim);
    println!("  Connected with the tutorial unfinished");
    world.show_applied(kim);
    println!();

    world.quests.set(kim, "tutorial", "finished", true);
    let refreshed = world.engine.reload_all(&mut world.host);
    println!("  Tutorial finished, refreshed {} entity(ies)", refreshed);
    world.show_applied(kim);
    world.show_report(kim);

    world.engine.shutdown();
    println!("  RESULT: quest progress swapped hints for the starter kit (expected)");
    println!();
    Ok(())
}
