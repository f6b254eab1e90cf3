//! Incremental spatial membership tracking.
//!
//! Holds the last observed set of regions per entity and diffs it against
//! a fresh observation. Diffing is over sets, so only regions whose
//! membership actually changed produce a transition.

use std::collections::{BTreeSet, HashMap};

use condperm_contracts::{entity::EntityId, hook::HookEvent};

#[derive(Debug, Default)]
pub struct MembershipTracker {
    memberships: HashMap<EntityId, BTreeSet<String>>,
}

impl MembershipTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `regions` as the entity's membership without emitting anything.
    pub fn track(&mut self, entity: EntityId, regions: BTreeSet<String>) {
        self.memberships.insert(entity, regions);
    }

    pub fn forget(&mut self, entity: EntityId) -> Option<BTreeSet<String>> {
        self.memberships.remove(&entity)
    }

    /// Last observed membership; empty when untracked.
    pub fn regions(&self, entity: EntityId) -> BTreeSet<String> {
        self.memberships.get(&entity).cloned().unwrap_or_default()
    }

    pub fn is_tracked(&self, entity: EntityId) -> bool {
        self.memberships.contains_key(&entity)
    }

    /// Replace the entity's membership with `now`, returning the transitions.
    ///
    /// Leaves come before enters; each group is in region order. An
    /// untracked entity diffs against the empty set.
    pub fn update(&mut self, entity: EntityId, now: BTreeSet<String>) -> Vec<HookEvent> {
        let before = self.memberships.entry(entity).or_default();

        let mut transitions: Vec<HookEvent> = before
            .difference(&now)
            .map(|region| HookEvent::LeftRegion { entity, region: region.clone() })
            .collect();
        transitions.extend(
            now.difference(before)
                .map(|region| HookEvent::EnteredRegion { entity, region: region.clone() }),
        );

        *before = now;
        transitions
    }

    pub fn clear(&mut self) {
        self.memberships.clear();
    }

    pub fn len(&self) -> usize {
        self.memberships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memberships.is_empty()
    }
}
