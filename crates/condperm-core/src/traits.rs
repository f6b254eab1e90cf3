//! Trait definitions at the engine's seams.
//!
//! - `PermissionHost`: the host runtime (entities, effective grants, attachment)
//! - `Condition`:      a named predicate over an entity and optional parameter
//! - `Hook`:           a lifecycle-bound integration with an external system
//! - `InterestView`:   read access to which hooks matter for which entity
//! - `CommandSender`:  whoever issued an admin command
//!
//! Everything runs on the host's simulation thread, so none of these require
//! `Sync`. New conditions and hooks are added by implementing these traits,
//! never by touching the engine.

use std::collections::BTreeSet;

use condperm_contracts::{
    entity::{EntityId, EntityStatus, Location},
    error::CondpermResult,
    event::{HostEvent, HostEventKind},
    grant::Grant,
    hook::{HookEvent, HookKind},
};

use crate::hooks::HookManager;

/// The host runtime as seen by the engine.
///
/// `set_grant` / `unset_grant` act on the engine's own grant attachment for
/// the entity; grants set there must show up in `effective_grants` with
/// value `true`.
pub trait PermissionHost {
    /// The entity's effective grants, in the host's enumeration order.
    fn effective_grants(&self, entity: EntityId) -> Vec<Grant>;

    /// Activate `name` on the entity's attachment.
    fn set_grant(&mut self, entity: EntityId, name: &str);

    /// Remove `name` from the entity's attachment.
    fn unset_grant(&mut self, entity: EntityId, name: &str);

    fn is_connected(&self, entity: EntityId) -> bool;

    fn connected_entities(&self) -> Vec<EntityId>;

    /// Find a connected entity by its display name (case-insensitive).
    fn entity_by_name(&self, name: &str) -> Option<EntityId>;

    fn entity_name(&self, entity: EntityId) -> Option<String>;

    fn location(&self, entity: EntityId) -> Option<Location>;

    fn status(&self, entity: EntityId) -> Option<EntityStatus>;
}

/// What a condition may consult while evaluating.
pub struct ConditionContext<'a> {
    pub hooks: &'a HookManager,
    pub host: &'a dyn PermissionHost,
}

/// A named boolean predicate.
///
/// Conditions are registered once at startup and never mutated. Evaluation
/// must not fail: anything that goes wrong is logged by the condition and
/// reported as `false`.
pub trait Condition: Send + Sync {
    /// Registry name. Matched case-insensitively.
    fn name(&self) -> &'static str;

    /// The hook whose state this condition reads, if any.
    fn required_hook(&self) -> Option<HookKind> {
        None
    }

    /// Whether the grant must carry `=<parameter>`.
    fn requires_parameter(&self) -> bool {
        false
    }

    /// Evaluate the predicate.
    ///
    /// Only called with `parameter = Some(_)` when `requires_parameter()` is
    /// true. When the required hook is disabled, `ctx.hooks.get(kind)` hands
    /// out an empty stub, so the predicate sees empty state.
    fn evaluate(&self, ctx: &ConditionContext<'_>, entity: EntityId, parameter: Option<&str>)
        -> bool;
}

/// Read access to per-entity hook interest.
pub trait InterestView {
    fn is_interested(&self, entity: EntityId, kind: HookKind) -> bool;
}

/// What a hook may consult while handling a host event.
pub struct HookContext<'a> {
    pub host: &'a dyn PermissionHost,
    pub interest: &'a dyn InterestView,
}

/// The host event kinds a hook listens to.
///
/// Filled by `Hook::enable`, released in full by `HookManager::shutdown`.
#[derive(Debug, Default)]
pub struct Subscriptions {
    kinds: BTreeSet<HostEventKind>,
}

impl Subscriptions {
    pub fn subscribe(&mut self, kind: HostEventKind) {
        self.kinds.insert(kind);
    }

    pub fn contains(&self, kind: HostEventKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Drop every subscription, returning how many there were.
    pub fn release_all(&mut self) -> usize {
        let released = self.kinds.len();
        self.kinds.clear();
        released
    }
}

/// A capability hook.
///
/// The query methods at the bottom are the capability surface conditions
/// read through. Their defaults describe a hook with no state, which is
/// exactly what a disabled hook must look like.
pub trait Hook {
    fn kind(&self) -> HookKind;

    /// Attach to the backing system and declare event subscriptions.
    ///
    /// Return `CondpermError::HookUnavailable` when the backing system is
    /// absent. The hook then stays disabled for the process lifetime.
    fn enable(&mut self, subscriptions: &mut Subscriptions) -> CondpermResult<()>;

    /// Release everything acquired in `enable` and drop tracked state.
    fn disable(&mut self);

    /// React to a subscribed host event, returning transitions to report.
    fn handle(&mut self, _event: &HostEvent, _ctx: &HookContext<'_>) -> Vec<HookEvent> {
        Vec::new()
    }

    /// Regions the entity currently occupies, lower-cased.
    fn regions_of(&self, _entity: EntityId) -> BTreeSet<String> {
        BTreeSet::new()
    }

    /// Whether a quest-engine condition holds for the entity.
    fn quest_condition(&self, _entity: EntityId, _package: &str, _condition: &str) -> bool {
        false
    }
}

/// The issuer of an admin command.
pub trait CommandSender {
    fn has_permission(&self, node: &str) -> bool;
}
