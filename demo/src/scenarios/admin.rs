//! Scenario 4: Admin Commands
//!
//! The `reload` and `debug` subcommands as seen by a privileged operator
//! and by a sender holding no admin permissions.

use condperm_contracts::error::CondpermResult;
use condperm_core::{command, traits::CommandSender};

use super::{spawn_point, DemoOptions, DemoWorld};

struct Operator {
    permissions: Vec<&'static str>,
}

impl CommandSender for Operator {
    fn has_permission(&self, node: &str) -> bool {
        self.permissions.iter().any(|granted| *granted == node)
    }
}

/// Run Scenario 4: Admin Commands.
pub fn run_scenario(options: &DemoOptions) -> CondpermResult<()> {
    println!("=== Scenario 4: Admin Commands ===");
    println!();

    let mut world = DemoWorld::new(options)?;
    let lee = world.spawn("Lee", spawn_point(), &["inregion=spawn.spawn.chat"]);
    world.connect(lee);

    let admin = Operator {
        permissions: vec![command::RELOAD_PERMISSION, command::DEBUG_PERMISSION],
    };
    let guest = Operator { permissions: Vec::new() };

    let script: [(&str, &Operator, &[&str]); 7] = [
        ("admin", &admin, &[]),
        ("admin", &admin, &["reload", "lee"]),
        ("admin", &admin, &["reload", "ghost"]),
        ("admin", &admin, &["reload"]),
        ("admin", &admin, &["debug"]),
        ("admin", &admin, &["debug"]),
        ("guest", &guest, &["reload"]),
    ];

    for (who, sender, args) in script {
        println!("  {} > condperm {}", who, args.join(" "));
        for line in command::execute(&mut world.engine, &mut world.host, sender, args) {
            println!("    {}", line);
        }
    }
    println!();

    world.show_applied(lee);
    world.engine.shutdown();
    println!("  RESULT: commands gated by sender permissions (expected)");
    println!();
    Ok(())
}
