//! `quest=<package>:<condition>`: a quest-engine condition holds for the entity.

use tracing::debug;

use condperm_contracts::{entity::EntityId, hook::HookKind};
use condperm_core::traits::{Condition, ConditionContext};

pub struct QuestCondition;

impl Condition for QuestCondition {
    fn name(&self) -> &'static str {
        "quest"
    }

    fn required_hook(&self) -> Option<HookKind> {
        Some(HookKind::Quest)
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
        let Some(parameter) = parameter else {
            return false;
        };
        let Some((package, condition)) = parameter.split_once(':') else {
            debug!(parameter, "quest parameter is not <package>:<condition>");
            return false;
        };
        if package.is_empty() || condition.is_empty() {
            debug!(parameter, "quest parameter has an empty package or condition");
            return false;
        }
        ctx.hooks
            .get(HookKind::Quest)
            .quest_condition(entity, package, condition)
    }
}
