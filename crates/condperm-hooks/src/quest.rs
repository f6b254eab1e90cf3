//! Quest-engine hook.
//!
//! A thin query bridge: no tracked state and no event subscriptions.

use std::sync::Arc;

use tracing::error;

use condperm_contracts::{
    entity::EntityId,
    error::{CondpermError, CondpermResult},
    hook::HookKind,
};
use condperm_core::traits::{Hook, Subscriptions};

/// The external quest engine.
pub trait QuestProvider: Send + Sync {
    fn has_package(&self, package: &str) -> bool;

    /// Evaluate `condition` from `package` for the entity.
    ///
    /// Returns `CondpermError::ExternalLookup` when the package has no such
    /// condition.
    fn check(&self, entity: EntityId, package: &str, condition: &str) -> CondpermResult<bool>;
}

pub struct QuestHook {
    provider: Option<Arc<dyn QuestProvider>>,
}

impl QuestHook {
    pub fn new(provider: Option<Arc<dyn QuestProvider>>) -> Self {
        Self { provider }
    }
}

impl Hook for QuestHook {
    fn kind(&self) -> HookKind {
        HookKind::Quest
    }

    fn enable(&mut self, _subscriptions: &mut Subscriptions) -> CondpermResult<()> {
        if self.provider.is_none() {
            return Err(CondpermError::HookUnavailable { kind: HookKind::Quest });
        }
        Ok(())
    }

    fn disable(&mut self) {}

    fn quest_condition(&self, entity: EntityId, package: &str, condition: &str) -> bool {
        let Some(provider) = &self.provider else {
            return false;
        };
        if !provider.has_package(package) {
            return false;
        }
        match provider.check(entity, package, condition) {
            Ok(result) => result,
            Err(e) => {
                error!(
                    entity = %entity,
                    package,
                    condition,
                    error = %e,
                    "could not find quest object"
                );
                false
            }
        }
    }
}
