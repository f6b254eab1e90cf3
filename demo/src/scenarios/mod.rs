//! Demo scenarios.
//!
//! Every scenario builds a fresh [`DemoWorld`]: the in-memory host, the
//! region and quest hooks over in-memory providers, and the built-in
//! conditions.

pub mod admin;
pub mod chaining;
pub mod quests;
pub mod regions;

use std::sync::Arc;

use condperm_conditions::builtin_registry;
use condperm_contracts::{
    entity::{EntityId, Location},
    error::CondpermResult,
    event::HostEvent,
};
use condperm_core::{EngineConfig, HookManager, InMemoryHost, ResolutionEngine, ResolutionReport};
use condperm_hooks::{
    InMemoryQuestProvider, InMemoryRegionProvider, QuestHook, QuestProvider, RegionHook,
    RegionProvider,
};

/// Settings shared by all scenarios, resolved from the command line.
pub struct DemoOptions {
    pub config: EngineConfig,
    /// Region layout TOML.
    pub regions: String,
    pub json: bool,
}

pub struct DemoWorld {
    pub engine: ResolutionEngine,
    pub host: InMemoryHost,
    pub quests: Arc<InMemoryQuestProvider>,
    json: bool,
}

impl DemoWorld {
    pub fn new(options: &DemoOptions) -> CondpermResult<Self> {
        let regions: Arc<dyn RegionProvider> =
            Arc::new(InMemoryRegionProvider::from_toml_str(&options.regions)?);
        let quests = Arc::new(InMemoryQuestProvider::new());
        let quest_provider: Arc<dyn QuestProvider> = quests.clone();

        let mut hooks = HookManager::new();
        hooks.register(Box::new(RegionHook::new(Some(regions))))?;
        hooks.register(Box::new(QuestHook::new(Some(quest_provider))))?;

        let mut engine = ResolutionEngine::new(options.config.clone(), builtin_registry()?, hooks);
        let enabled = engine.init();
        let names: Vec<String> = enabled.iter().map(ToString::to_string).collect();
        println!("  Hooks enabled:          {}", names.join(", "));

        Ok(Self {
            engine,
            host: InMemoryHost::new(),
            quests,
            json: options.json,
        })
    }

    /// `<prefix>.<body>`
    pub fn grant(&self, body: &str) -> String {
        format!("{}.{}", self.engine.config().prefix, body)
    }

    /// Add an entity holding `bodies` as conditional grants, without connecting it.
    pub fn spawn(&mut self, name: &str, location: Location, bodies: &[&str]) -> EntityId {
        let entity = self.host.add_entity(name, location);
        for body in bodies {
            let grant = self.grant(body);
            println!("  Assigned:               {}", grant);
            self.host.assign(entity, grant, true);
        }
        entity
    }

    pub fn connect(&mut self, entity: EntityId) {
        for event in self.host.connect(entity) {
            self.engine.handle_event(&mut self.host, &event);
        }
    }

    pub fn dispatch(&mut self, event: Option<HostEvent>) {
        if let Some(event) = event {
            self.engine.handle_event(&mut self.host, &event);
        }
    }

    pub fn move_to(&mut self, entity: EntityId, to: Location) {
        println!(
            "  Move to:                {} ({:.1}, {:.1}, {:.1})",
            to.world, to.x, to.y, to.z
        );
        let event = self.host.move_to(entity, to);
        self.dispatch(event);
        for transition in self.engine.drain_hook_events() {
            println!("  Hook transition:        {}", transition);
        }
    }

    /// Advance the scheduler so deferred resolutions run.
    pub fn settle(&mut self, ticks: u64) {
        let ran = self.engine.advance(&mut self.host, ticks);
        println!("  Deferred resolutions:   {} in {} tick(s)", ran, ticks);
    }

    pub fn show_applied(&self, entity: EntityId) {
        let applied: Vec<String> = self
            .engine
            .applied_grants(entity)
            .map(|grants| grants.iter().cloned().collect())
            .unwrap_or_default();
        if applied.is_empty() {
            println!("  Applied grants:         (none)");
        } else {
            println!("  Applied grants:         {}", applied.join(", "));
        }
    }

    pub fn show_report(&mut self, entity: EntityId) {
        let Some(report) = self.engine.resolve(&mut self.host, entity) else {
            println!("  Report:                 entity is not tracked");
            return;
        };
        if self.json {
            print_json(&report);
        } else {
            println!(
                "  Report:                 {} applied, {} consumed, {} pass(es)",
                report.applied.len(),
                report.consumed.len(),
                report.passes
            );
        }
    }
}

fn print_json(report: &ResolutionReport) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => {
            for line in json.lines() {
                println!("  {}", line);
            }
        }
        Err(e) => tracing::warn!(error = %e, "could not serialize resolution report"),
    }
}

/// Where entities stand at the start of each scenario.
pub fn spawn_point() -> Location {
    Location::new("world", 0.5, 64.0, 0.5)
}
