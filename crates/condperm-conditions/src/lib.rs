//! # condperm-conditions
//!
//! The built-in condition set.
//!
//! | name       | parameter              | hook   |
//! |------------|------------------------|--------|
//! | `inregion` | region id              | region |
//! | `quest`    | `package:condition`    | quest  |
//! | `world`    | world name             |        |
//! | `gamemode` | game mode              |        |
//! | `flying`   |                        |        |
//! | `sneaking` |                        |        |

pub mod entity;
pub mod quest;
pub mod region;

use condperm_contracts::error::CondpermResult;
use condperm_core::ConditionRegistry;

pub use entity::{Flying, InGameMode, InWorld, Sneaking};
pub use quest::QuestCondition;
pub use region::InRegion;

/// Register every built-in condition.
pub fn register_builtins(registry: &mut ConditionRegistry) -> CondpermResult<()> {
    registry.register(Box::new(InRegion))?;
    registry.register(Box::new(QuestCondition))?;
    registry.register(Box::new(InWorld))?;
    registry.register(Box::new(InGameMode))?;
    registry.register(Box::new(Flying))?;
    registry.register(Box::new(Sneaking))?;
    Ok(())
}

/// A registry holding exactly the built-in conditions.
pub fn builtin_registry() -> CondpermResult<ConditionRegistry> {
    let mut registry = ConditionRegistry::new();
    register_builtins(&mut registry)?;
    Ok(registry)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::Arc;

    use condperm_contracts::{
        entity::{EntityId, GameMode, Location},
        error::CondpermError,
        hook::{HookEvent, HookKind},
    };
    use condperm_core::{EngineConfig, HookManager, InMemoryHost, ResolutionEngine};
    use condperm_hooks::{
        InMemoryQuestProvider, InMemoryRegionProvider, QuestHook, QuestProvider, RegionHook,
        RegionProvider,
    };

    use super::*;

    // ── Fixture ───────────────────────────────────────────────────────────────

    const REGIONS: &str = r#"
        worlds = ["world", "nether"]

        [[regions]]
        id = "Spawn"
        world = "world"
        min = [0, 0, 0]
        max = [9, 255, 9]

        [[regions]]
        id = "market"
        world = "world"
        min = [10, 0, 0]
        max = [19, 255, 9]
    "#;

    struct World {
        engine: ResolutionEngine,
        host: InMemoryHost,
        quests: Arc<InMemoryQuestProvider>,
    }

    fn world_with(region_hook: bool) -> World {
        world_configured(region_hook, EngineConfig::default())
    }

    fn world_configured(region_hook: bool, config: EngineConfig) -> World {
        let regions: Option<Arc<dyn RegionProvider>> = if region_hook {
            Some(Arc::new(InMemoryRegionProvider::from_toml_str(REGIONS).unwrap()))
        } else {
            None
        };
        let quests = Arc::new(InMemoryQuestProvider::new());
        let quest_provider: Arc<dyn QuestProvider> = quests.clone();

        let mut hooks = HookManager::new();
        hooks.register(Box::new(RegionHook::new(regions))).unwrap();
        hooks.register(Box::new(QuestHook::new(Some(quest_provider)))).unwrap();

        let mut engine =
            ResolutionEngine::new(config, builtin_registry().unwrap(), hooks);
        engine.init();
        World { engine, host: InMemoryHost::new(), quests }
    }

    fn at(x: f64) -> Location {
        Location::new("world", x, 64.0, 4.5)
    }

    impl World {
        fn join(&mut self, x: f64, grants: &[&str]) -> EntityId {
            let entity = self.host.add_entity("alex", at(x));
            for grant in grants {
                self.host.assign(entity, *grant, true);
            }
            for event in self.host.connect(entity) {
                self.engine.handle_event(&mut self.host, &event);
            }
            entity
        }

        fn move_to(&mut self, entity: EntityId, to: Location) {
            if let Some(event) = self.host.move_to(entity, to) {
                self.engine.handle_event(&mut self.host, &event);
            }
        }
    }

    // ── Registry ──────────────────────────────────────────────────────────────

    #[test]
    fn builtins_register_once() {
        let mut registry = builtin_registry().unwrap();
        assert_eq!(
            registry.names(),
            vec!["flying", "gamemode", "inregion", "quest", "sneaking", "world"]
        );
        assert!(matches!(
            register_builtins(&mut registry),
            Err(CondpermError::DuplicateCondition { .. })
        ));
    }

    // ── Regions ───────────────────────────────────────────────────────────────

    #[test]
    fn entering_a_region_applies_its_grant_after_one_tick() {
        let mut w = world_with(true);
        let entity = w.join(2.5, &["cperms.inregion=Market.shop.use"]);
        assert!(!w.host.has_grant(entity, "shop.use"));
        w.engine.drain_hook_events();

        w.move_to(entity, at(12.5));
        assert!(!w.host.has_grant(entity, "shop.use"));
        assert_eq!(
            w.engine.drain_hook_events(),
            vec![
                HookEvent::LeftRegion { entity, region: "spawn".to_string() },
                HookEvent::EnteredRegion { entity, region: "market".to_string() },
            ]
        );

        assert_eq!(w.engine.advance(&mut w.host, 1), 1);
        assert!(w.host.has_grant(entity, "shop.use"));

        w.move_to(entity, at(3.5));
        w.engine.advance(&mut w.host, 1);
        assert!(!w.host.has_grant(entity, "shop.use"));
    }

    #[test]
    fn region_grants_register_interest() {
        let mut w = world_with(true);
        let entity = w.join(2.5, &["cperms.inregion=spawn.build", "cperms.flying.fly"]);

        let state = w.engine.state(entity).unwrap();
        assert_eq!(state.interested_hooks, BTreeSet::from([HookKind::Region]));
        assert!(w.host.has_grant(entity, "build"));
    }

    #[test]
    fn missing_region_system_reads_as_no_regions() {
        let mut w = world_with(false);
        let entity = w.join(
            2.5,
            &["cperms.!inregion=spawn.outside", "cperms.inregion=spawn.inside"],
        );

        assert!(!w.engine.hooks().is_enabled(HookKind::Region));
        assert!(w.host.has_grant(entity, "outside"));
        assert!(!w.host.has_grant(entity, "inside"));
    }

    #[test]
    fn failed_region_lookup_withdraws_region_grants() {
        let mut w = world_with(true);
        let entity = w.join(2.5, &["cperms.inregion=spawn.spawn.build"]);
        assert!(w.host.has_grant(entity, "spawn.build"));

        // No region manager exists for this world.
        w.move_to(entity, Location::new("the_end", 0.5, 64.0, 0.5));
        w.engine.run_until_idle(&mut w.host);

        assert!(w.engine.hooks().get(HookKind::Region).regions_of(entity).is_empty());
        assert!(!w.host.has_grant(entity, "spawn.build"));
    }

    #[test]
    fn hook_event_log_keeps_only_the_newest_transitions() {
        let config = EngineConfig { hook_event_log_capacity: 4, ..EngineConfig::default() };
        let mut w = world_configured(true, config);
        let entity = w.join(2.5, &["cperms.inregion=market.shop"]);

        for i in 0..10 {
            let x = if i % 2 == 0 { 12.5 } else { 2.5 };
            w.move_to(entity, at(x));
            w.engine.advance(&mut w.host, 1);
        }

        assert_eq!(
            w.engine.drain_hook_events(),
            vec![
                HookEvent::LeftRegion { entity, region: "spawn".to_string() },
                HookEvent::EnteredRegion { entity, region: "market".to_string() },
                HookEvent::LeftRegion { entity, region: "market".to_string() },
                HookEvent::EnteredRegion { entity, region: "spawn".to_string() },
            ]
        );
        assert!(w.engine.drain_hook_events().is_empty());
    }

    #[test]
    fn zero_capacity_retains_nothing_but_still_resolves() {
        let config = EngineConfig { hook_event_log_capacity: 0, ..EngineConfig::default() };
        let mut w = world_configured(true, config);
        let entity = w.join(2.5, &["cperms.inregion=market.shop"]);

        w.move_to(entity, at(12.5));
        w.engine.advance(&mut w.host, 1);

        assert!(w.engine.drain_hook_events().is_empty());
        assert!(w.host.has_grant(entity, "shop"));
    }

    #[test]
    fn disconnect_forgets_membership_and_grants() {
        let mut w = world_with(true);
        let entity = w.join(2.5, &["cperms.inregion=spawn.build"]);
        assert!(w.host.has_grant(entity, "build"));

        let event = w.host.disconnect(entity).unwrap();
        w.engine.handle_event(&mut w.host, &event);

        assert!(w.engine.state(entity).is_none());
        assert!(w.engine.hooks().get(HookKind::Region).regions_of(entity).is_empty());
        assert!(w.host.attachment(entity).is_empty());
    }

    // ── Chaining ──────────────────────────────────────────────────────────────

    #[test]
    fn chain_across_world_and_region_conditions() {
        let mut w = world_with(true);
        let entity = w.join(2.5, &["cperms.world=world.cperms.inregion=spawn.build"]);

        let report = w.engine.resolve(&mut w.host, entity).unwrap();
        assert_eq!(report.applied, BTreeSet::from(["build".to_string()]));
        assert!(w.host.has_grant(entity, "build"));
        assert!(!w.host.has_grant(entity, "cperms.inregion=spawn.build"));
    }

    // ── Quests ────────────────────────────────────────────────────────────────

    #[test]
    fn quest_condition_follows_quest_state() {
        let mut w = world_with(true);
        w.quests.define("default", "has_key");
        let grants = [
            "cperms.quest=default:has_key.vault.open",
            "cperms.quest=default.broken",
            "cperms.quest=default:missing.never",
        ];

        let entity = w.host.add_entity("alex", at(2.5));
        w.quests.set(entity, "default", "has_key", true);
        for grant in grants {
            w.host.assign(entity, grant, true);
        }
        for event in w.host.connect(entity) {
            w.engine.handle_event(&mut w.host, &event);
        }

        assert!(w.host.has_grant(entity, "vault.open"));
        assert!(!w.host.has_grant(entity, "broken"));
        assert!(!w.host.has_grant(entity, "never"));

        w.quests.set(entity, "default", "has_key", false);
        assert_eq!(w.engine.reload_all(&mut w.host), 1);
        assert!(!w.host.has_grant(entity, "vault.open"));
    }

    // ── Entity state ──────────────────────────────────────────────────────────

    #[test]
    fn cross_world_move_re_resolves_world_grants() {
        let mut w = world_with(true);
        let entity = w.join(2.5, &["cperms.world=Nether.nether.access"]);
        assert!(!w.host.has_grant(entity, "nether.access"));

        w.move_to(entity, Location::new("nether", 0.5, 64.0, 0.5));
        w.engine.advance(&mut w.host, 1);

        assert!(w.host.has_grant(entity, "nether.access"));
    }

    #[test]
    fn status_conditions_follow_status_changes() {
        let mut w = world_with(true);
        let entity = w.join(
            2.5,
            &[
                "cperms.gamemode=creative.build.anywhere",
                "cperms.gamemode=bogus.never",
                "cperms.sneaking.quiet",
                "cperms.!flying.grounded",
            ],
        );
        assert!(!w.host.has_grant(entity, "build.anywhere"));
        assert!(w.host.has_grant(entity, "grounded"));

        let event = w
            .host
            .update_status(entity, |status| {
                status.game_mode = GameMode::Creative;
                status.sneaking = true;
                status.flying = true;
            })
            .unwrap();
        w.engine.handle_event(&mut w.host, &event);
        w.engine.advance(&mut w.host, 1);

        assert!(w.host.has_grant(entity, "build.anywhere"));
        assert!(w.host.has_grant(entity, "quiet"));
        assert!(!w.host.has_grant(entity, "grounded"));
        assert!(!w.host.has_grant(entity, "never"));
    }
}
