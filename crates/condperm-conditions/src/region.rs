//! `inregion=<region>`: the entity currently stands in the named region.

use condperm_contracts::{entity::EntityId, hook::HookKind};
use condperm_core::traits::{Condition, ConditionContext};

pub struct InRegion;

impl Condition for InRegion {
    fn name(&self) -> &'static str {
        "inregion"
    }

    fn required_hook(&self) -> Option<HookKind> {
        Some(HookKind::Region)
    }

    fn requires_parameter(&self) -> bool {
        true
    }

    fn evaluate(
        &self,
        ctx: &ConditionContext<'_>,
        entity: EntityId,
        parameter: Option<&str>,
    ) -> bool {
        let Some(region) = parameter else {
            return false;
        };
        if !ctx.hooks.is_enabled(HookKind::Region) {
            return false;
        }
        ctx.hooks
            .get(HookKind::Region)
            .regions_of(entity)
            .contains(&region.to_lowercase())
    }
}
