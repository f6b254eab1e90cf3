//! Region containment hook.
//!
//! Tracks which regions each entity stands in. Membership is computed on
//! connect, dropped on disconnect, and re-queried on moves that cross a
//! block or world boundary, but only for entities whose conditional grants
//! depend on regions. A failed query counts as standing in no region.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, error};

use condperm_contracts::{
    entity::{EntityId, Location},
    error::{CondpermError, CondpermResult},
    event::{HostEvent, HostEventKind},
    hook::{HookEvent, HookKind},
};
use condperm_core::traits::{Hook, HookContext, Subscriptions};

use crate::tracker::MembershipTracker;

/// The external region system.
pub trait RegionProvider: Send + Sync {
    /// Identifiers of every region containing `location`.
    fn applicable_regions(&self, location: &Location) -> CondpermResult<Vec<String>>;
}

pub struct RegionHook {
    provider: Option<Arc<dyn RegionProvider>>,
    tracker: MembershipTracker,
}

impl RegionHook {
    /// `None` means no region system is installed; the hook will refuse to enable.
    pub fn new(provider: Option<Arc<dyn RegionProvider>>) -> Self {
        Self { provider, tracker: MembershipTracker::new() }
    }

    pub fn tracked_entities(&self) -> usize {
        self.tracker.len()
    }

    fn query(&self, location: &Location) -> CondpermResult<BTreeSet<String>> {
        let Some(provider) = &self.provider else {
            return Err(CondpermError::HookUnavailable { kind: HookKind::Region });
        };
        Ok(provider
            .applicable_regions(location)?
            .into_iter()
            .map(|id| id.to_lowercase())
            .collect())
    }

    fn on_connect(&mut self, entity: EntityId, ctx: &HookContext<'_>) {
        let Some(location) = ctx.host.location(entity) else {
            self.tracker.track(entity, BTreeSet::new());
            return;
        };
        let regions = match self.query(&location) {
            Ok(regions) => regions,
            Err(e) => {
                error!(entity = %entity, error = %e, "initial region query failed");
                BTreeSet::new()
            }
        };
        debug!(entity = %entity, regions = ?regions, "tracking region membership");
        self.tracker.track(entity, regions);
    }

    fn on_move(
        &mut self,
        entity: EntityId,
        from: &Location,
        to: &Location,
        ctx: &HookContext<'_>,
    ) -> Vec<HookEvent> {
        if from.same_block(to) {
            return Vec::new();
        }
        if !ctx.interest.is_interested(entity, HookKind::Region) {
            return Vec::new();
        }
        let now = match self.query(to) {
            Ok(now) => now,
            Err(e) => {
                error!(entity = %entity, error = %e, "region query failed, treating entity as in no region");
                BTreeSet::new()
            }
        };
        self.tracker.update(entity, now)
    }
}

impl Hook for RegionHook {
    fn kind(&self) -> HookKind {
        HookKind::Region
    }

    fn enable(&mut self, subscriptions: &mut Subscriptions) -> CondpermResult<()> {
        if self.provider.is_none() {
            return Err(CondpermError::HookUnavailable { kind: HookKind::Region });
        }
        subscriptions.subscribe(HostEventKind::Connect);
        subscriptions.subscribe(HostEventKind::Disconnect);
        subscriptions.subscribe(HostEventKind::Moved);
        Ok(())
    }

    fn disable(&mut self) {
        self.tracker.clear();
    }

    fn handle(&mut self, event: &HostEvent, ctx: &HookContext<'_>) -> Vec<HookEvent> {
        match event {
            HostEvent::Connect { entity } => {
                self.on_connect(*entity, ctx);
                Vec::new()
            }
            HostEvent::Disconnect { entity } => {
                self.tracker.forget(*entity);
                Vec::new()
            }
            HostEvent::Moved { entity, from, to } => self.on_move(*entity, from, to, ctx),
            _ => Vec::new(),
        }
    }

    fn regions_of(&self, entity: EntityId) -> BTreeSet<String> {
        self.tracker.regions(entity)
    }
}
