//! The resolution engine.
//!
//! The engine turns an entity's raw conditional grants into the concrete
//! grants that should be active right now:
//!
//!   host event → hooks → resolve → conditions → attachment
//!
//! Resolution is a fixpoint over the host's effective-permission view. Each
//! pass walks every effective grant in host order; a conditional grant whose
//! condition holds sets its target on the entity's attachment, which makes
//! the target visible to the next pass. That is what lets a conditional
//! grant name another conditional grant as its target. Every source grant
//! fires at most once per resolution, so the loop is bounded by the number
//! of distinct source grants.
//!
//! Unknown conditions, missing parameters, and disabled hooks never fail a
//! resolution; the grant is skipped and the next one is processed.

use std::collections::{BTreeSet, HashSet, VecDeque};

use chrono::Utc;
use serde::Serialize;
use tracing::debug;

use condperm_contracts::{
    entity::EntityId,
    event::HostEvent,
    grant::ConditionalGrant,
    hook::{HookEvent, HookKind},
};

use crate::{
    config::EngineConfig,
    hooks::HookManager,
    registry::ConditionRegistry,
    scheduler::{ScheduledTask, Scheduler},
    state::{EntityRegistry, EntityResolutionState, ResolutionPhase},
    traits::{ConditionContext, HookContext, PermissionHost},
};

/// Resolution trace line: `info!` while verbose tracing is on, `debug!` otherwise.
macro_rules! trace_resolution {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            ::tracing::info!($($arg)+)
        } else {
            ::tracing::debug!($($arg)+)
        }
    };
}

/// What one resolution did.
#[derive(Debug, Clone, Serialize)]
pub struct ResolutionReport {
    pub entity: EntityId,
    /// Target grants left active on the attachment.
    pub applied: BTreeSet<String>,
    /// Source grants that fired, in firing order.
    pub consumed: Vec<String>,
    /// Fixpoint passes, including the final pass that applied nothing.
    pub passes: u32,
    pub interested_hooks: BTreeSet<HookKind>,
}

pub struct ResolutionEngine {
    config: EngineConfig,
    conditions: ConditionRegistry,
    hooks: HookManager,
    entities: EntityRegistry,
    scheduler: Scheduler,
    verbose: bool,
    /// Bounded by `config.hook_event_log_capacity`, oldest first.
    hook_events: VecDeque<HookEvent>,
}

impl ResolutionEngine {
    pub fn new(config: EngineConfig, conditions: ConditionRegistry, hooks: HookManager) -> Self {
        let verbose = config.debug;
        Self {
            config,
            conditions,
            hooks,
            entities: EntityRegistry::new(),
            scheduler: Scheduler::new(),
            verbose,
            hook_events: VecDeque::new(),
        }
    }

    /// Enable hooks. Returns the kinds that came up.
    pub fn init(&mut self) -> BTreeSet<HookKind> {
        let enabled = self.hooks.init(&self.config.disabled_hooks);
        debug!(
            conditions = self.conditions.len(),
            enabled_hooks = ?enabled,
            prefix = %self.config.prefix,
            "resolution engine initialized"
        );
        enabled
    }

    /// Release all hook subscriptions and tracked state.
    pub fn shutdown(&mut self) {
        self.hooks.shutdown();
    }

    // ── Host events ──────────────────────────────────────────────────────────

    /// Process one host event.
    ///
    /// Subscribed hooks see the event first, so a resolution triggered by the
    /// same event reads hook state that already reflects it. Transitions the
    /// hooks report schedule a deferred resolution of the entity.
    pub fn handle_event(&mut self, host: &mut dyn PermissionHost, event: &HostEvent) {
        let emitted = self.hooks.dispatch(
            event,
            &HookContext {
                host: &*host,
                interest: &self.entities,
            },
        );

        match event {
            HostEvent::PreConnect { entity } => {
                self.entities.connect(*entity);
                self.resolve(host, *entity);
            }
            HostEvent::Connect { entity } => {
                self.entities.connect(*entity);
                self.resolve(host, *entity);
                let delay = self.config.post_connect_delay_ticks;
                self.defer(*entity, delay);
            }
            HostEvent::Disconnect { entity } => self.disconnect(host, *entity),
            HostEvent::Moved { entity, from, to } => {
                if from.world != to.world {
                    let delay = self.config.transition_delay_ticks;
                    self.defer(*entity, delay);
                }
            }
            HostEvent::StatusChanged { entity } => {
                let delay = self.config.transition_delay_ticks;
                self.defer(*entity, delay);
            }
        }

        let delay = self.config.transition_delay_ticks;
        for hook_event in emitted {
            trace_resolution!(self.verbose, event = %hook_event, "hook reported transition");
            self.defer(hook_event.entity(), delay);
            self.record_hook_event(hook_event);
        }
    }

    fn record_hook_event(&mut self, hook_event: HookEvent) {
        let capacity = self.config.hook_event_log_capacity;
        if capacity == 0 {
            return;
        }
        while self.hook_events.len() >= capacity {
            self.hook_events.pop_front();
        }
        self.hook_events.push_back(hook_event);
    }

    /// Advance the scheduler one tick and run deferred resolutions now due.
    ///
    /// Returns how many resolutions ran. Work for entities that disconnected
    /// in the meantime is dropped.
    pub fn tick(&mut self, host: &mut dyn PermissionHost) -> usize {
        let mut ran = 0;
        for task in self.scheduler.advance() {
            match task {
                ScheduledTask::Resolve(entity) => {
                    if !self.entities.contains(entity) || !host.is_connected(entity) {
                        debug!(entity = %entity, "skipping deferred resolution for disconnected entity");
                        continue;
                    }
                    if self.resolve(host, entity).is_some() {
                        ran += 1;
                    }
                }
            }
        }
        ran
    }

    /// Run `ticks` ticks.
    pub fn advance(&mut self, host: &mut dyn PermissionHost, ticks: u64) -> usize {
        (0..ticks).map(|_| self.tick(host)).sum()
    }

    /// Tick until nothing is pending. Returns the number of ticks run.
    pub fn run_until_idle(&mut self, host: &mut dyn PermissionHost) -> u64 {
        let mut ticks = 0;
        while !self.scheduler.is_idle() {
            self.tick(host);
            ticks += 1;
        }
        ticks
    }

    // ── Resolution ───────────────────────────────────────────────────────────

    /// Recompute the entity's derived grants from scratch.
    ///
    /// Returns `None` when the entity has no resolution state (it is not
    /// connected as far as the engine knows).
    pub fn resolve(
        &mut self,
        host: &mut dyn PermissionHost,
        entity: EntityId,
    ) -> Option<ResolutionReport> {
        let verbose = self.verbose;
        let prefix = self.config.prefix.as_str();

        let Some(state) = self.entities.get_mut(entity) else {
            trace_resolution!(verbose, entity = %entity, "no resolution state, skipping");
            return None;
        };

        trace_resolution!(verbose, entity = %entity, "processing conditional grants");

        for name in std::mem::take(&mut state.applied_grants) {
            host.unset_grant(entity, &name);
        }
        state.clear_interest();

        let mut consumed: Vec<String> = Vec::new();
        let mut fired: HashSet<String> = HashSet::new();
        let mut applied: BTreeSet<String> = BTreeSet::new();
        let mut passes = 0u32;

        loop {
            passes += 1;
            let mut progressed = false;

            for grant in host.effective_grants(entity) {
                if !grant.value {
                    continue;
                }

                let Some(conditional) = ConditionalGrant::parse(prefix, &grant.name) else {
                    let in_namespace = grant
                        .name
                        .strip_prefix(prefix)
                        .is_some_and(|rest| rest.starts_with('.'));
                    if in_namespace {
                        trace_resolution!(verbose, grant = %grant.name, "skipping grant with no target to apply");
                    }
                    continue;
                };

                if fired.contains(&grant.name) {
                    continue;
                }

                let Some(condition) = self.conditions.lookup(&conditional.condition_name) else {
                    trace_resolution!(
                        verbose,
                        grant = %grant.name,
                        condition = %conditional.condition_name,
                        "skipping grant with unknown condition"
                    );
                    continue;
                };

                if let Some(kind) = condition.required_hook() {
                    if !self.hooks.is_enabled(kind) {
                        trace_resolution!(
                            verbose,
                            condition = condition.name(),
                            hook = %kind,
                            "condition requires a hook that is not enabled"
                        );
                    }
                    state.register_interest(kind);
                }

                if condition.requires_parameter() && conditional.parameter.is_none() {
                    trace_resolution!(
                        verbose,
                        grant = %grant.name,
                        condition = condition.name(),
                        "skipping grant: condition requires a parameter"
                    );
                    continue;
                }

                let ctx = ConditionContext {
                    hooks: &self.hooks,
                    host: &*host,
                };
                let result = condition.evaluate(&ctx, entity, conditional.parameter.as_deref());
                if !conditional.applies(result) {
                    trace_resolution!(
                        verbose,
                        grant = %grant.name,
                        result,
                        negated = conditional.negated,
                        "condition not met"
                    );
                    continue;
                }

                host.set_grant(entity, &conditional.target_grant);
                trace_resolution!(
                    verbose,
                    entity = %entity,
                    grant = %grant.name,
                    target = %conditional.target_grant,
                    "applied conditional grant"
                );
                applied.insert(conditional.target_grant);
                fired.insert(grant.name.clone());
                consumed.push(grant.name);
                progressed = true;
            }

            if !progressed {
                break;
            }
        }

        // Chained intermediates only exist to feed the next pass.
        let intermediates: Vec<String> = applied
            .iter()
            .filter(|name| ConditionalGrant::parse(prefix, name).is_some())
            .cloned()
            .collect();
        for name in intermediates {
            host.unset_grant(entity, &name);
            applied.remove(&name);
        }

        state.applied_grants = applied.clone();
        state.phase = ResolutionPhase::Resolved;
        state.resolutions += 1;
        state.last_resolved_at = Some(Utc::now());

        trace_resolution!(
            verbose,
            entity = %entity,
            applied = applied.len(),
            passes,
            "resolution complete"
        );

        Some(ResolutionReport {
            entity,
            applied,
            consumed,
            passes,
            interested_hooks: state.interested_hooks.clone(),
        })
    }

    /// Re-resolve every connected entity. Returns how many were resolved.
    pub fn reload_all(&mut self, host: &mut dyn PermissionHost) -> usize {
        host.connected_entities()
            .into_iter()
            .filter(|entity| self.resolve(host, *entity).is_some())
            .count()
    }

    fn disconnect(&mut self, host: &mut dyn PermissionHost, entity: EntityId) {
        if let Some(state) = self.entities.disconnect(entity) {
            for name in &state.applied_grants {
                host.unset_grant(entity, name);
            }
            trace_resolution!(
                self.verbose,
                entity = %entity,
                dropped = state.applied_grants.len(),
                "discarded resolution state"
            );
        }
    }

    fn defer(&mut self, entity: EntityId, delay: u64) {
        if !self.scheduler.schedule(delay, ScheduledTask::Resolve(entity)) {
            debug!(entity = %entity, "resolution already pending, coalesced");
        }
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn conditions(&self) -> &ConditionRegistry {
        &self.conditions
    }

    pub fn hooks(&self) -> &HookManager {
        &self.hooks
    }

    pub fn state(&self, entity: EntityId) -> Option<&EntityResolutionState> {
        self.entities.get(entity)
    }

    pub fn applied_grants(&self, entity: EntityId) -> Option<&BTreeSet<String>> {
        self.entities.get(entity).map(|state| &state.applied_grants)
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Flip verbose tracing, returning the new state.
    pub fn toggle_verbose(&mut self) -> bool {
        self.verbose = !self.verbose;
        self.verbose
    }

    /// Take the retained hook transitions, oldest first.
    ///
    /// At most `hook_event_log_capacity` are kept between drains.
    pub fn drain_hook_events(&mut self) -> Vec<HookEvent> {
        self.hook_events.drain(..).collect()
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
