//! Per-entity resolution state.
//!
//! One `EntityResolutionState` exists per connected entity, created at
//! connect and dropped at disconnect. The engine is its only writer; hooks
//! read interest through the `InterestView` impl.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use serde::Serialize;

use condperm_contracts::{entity::EntityId, hook::HookKind};

use crate::traits::InterestView;

/// Where an entity is in its resolution lifecycle.
///
/// `Disconnected` is represented by the absence of state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResolutionPhase {
    AwaitingFirstResolution,
    Resolved,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntityResolutionState {
    pub phase: ResolutionPhase,
    /// Derived grants currently set on the entity's attachment.
    pub applied_grants: BTreeSet<String>,
    /// Hooks the entity's conditional grants depended on in the last pass.
    pub interested_hooks: BTreeSet<HookKind>,
    pub resolutions: u64,
    pub last_resolved_at: Option<DateTime<Utc>>,
}

impl EntityResolutionState {
    fn new() -> Self {
        Self {
            phase: ResolutionPhase::AwaitingFirstResolution,
            applied_grants: BTreeSet::new(),
            interested_hooks: BTreeSet::new(),
            resolutions: 0,
            last_resolved_at: None,
        }
    }

    /// Idempotent.
    pub fn register_interest(&mut self, kind: HookKind) {
        self.interested_hooks.insert(kind);
    }

    pub fn clear_interest(&mut self) {
        self.interested_hooks.clear();
    }
}

#[derive(Debug, Default)]
pub struct EntityRegistry {
    states: HashMap<EntityId, EntityResolutionState>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state for `entity` unless it already has some.
    ///
    /// Returns true if state was created.
    pub fn connect(&mut self, entity: EntityId) -> bool {
        if self.states.contains_key(&entity) {
            return false;
        }
        self.states.insert(entity, EntityResolutionState::new());
        true
    }

    /// Drop the entity's state, handing it back for cleanup.
    pub fn disconnect(&mut self, entity: EntityId) -> Option<EntityResolutionState> {
        self.states.remove(&entity)
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        self.states.contains_key(&entity)
    }

    pub fn get(&self, entity: EntityId) -> Option<&EntityResolutionState> {
        self.states.get(&entity)
    }

    pub fn get_mut(&mut self, entity: EntityId) -> Option<&mut EntityResolutionState> {
        self.states.get_mut(&entity)
    }

    pub fn register_interest(&mut self, entity: EntityId, kind: HookKind) {
        if let Some(state) = self.states.get_mut(&entity) {
            state.register_interest(kind);
        }
    }

    pub fn clear_interest(&mut self, entity: EntityId) {
        if let Some(state) = self.states.get_mut(&entity) {
            state.clear_interest();
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl InterestView for EntityRegistry {
    fn is_interested(&self, entity: EntityId, kind: HookKind) -> bool {
        self.states
            .get(&entity)
            .is_some_and(|state| state.interested_hooks.contains(&kind))
    }
}
