//! Conditions over the entity's own state, read straight from the host.

use std::str::FromStr;

use tracing::debug;

use condperm_contracts::entity::{EntityId, GameMode};
use condperm_core::traits::{Condition, ConditionContext};

/// `world=<name>`: the entity is in the named world (case-insensitive).
pub struct InWorld;

impl Condition for InWorld {
    fn name(&self) -> &'static str {
        "world"
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
        let (Some(world), Some(location)) = (parameter, ctx.host.location(entity)) else {
            return false;
        };
        location.world.eq_ignore_ascii_case(world)
    }
}

/// `gamemode=<mode>`.
pub struct InGameMode;

impl Condition for InGameMode {
    fn name(&self) -> &'static str {
        "gamemode"
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
        let mode = match GameMode::from_str(parameter) {
            Ok(mode) => mode,
            Err(reason) => {
                debug!(parameter, reason = %reason, "gamemode condition has invalid parameter");
                return false;
            }
        };
        ctx.host.status(entity).is_some_and(|status| status.game_mode == mode)
    }
}

pub struct Flying;

impl Condition for Flying {
    fn name(&self) -> &'static str {
        "flying"
    }

    fn evaluate(&self, ctx: &ConditionContext<'_>, entity: EntityId, _parameter: Option<&str>) -> bool {
        ctx.host.status(entity).is_some_and(|status| status.flying)
    }
}

pub struct Sneaking;

impl Condition for Sneaking {
    fn name(&self) -> &'static str {
        "sneaking"
    }

    fn evaluate(&self, ctx: &ConditionContext<'_>, entity: EntityId, _parameter: Option<&str>) -> bool {
        ctx.host.status(entity).is_some_and(|status| status.sneaking)
    }
}
