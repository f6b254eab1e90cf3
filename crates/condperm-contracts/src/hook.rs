//! Capability hook kinds and the events hooks emit.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// The closed set of capability hooks the engine knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HookKind {
    /// Region containment, backed by an external region provider.
    Region,
    /// Quest-engine conditions, backed by an external quest provider.
    Quest,
}

impl HookKind {
    /// Every kind, in initialization order.
    pub const ALL: [HookKind; 2] = [HookKind::Region, HookKind::Quest];
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookKind::Region => f.write_str("region"),
            HookKind::Quest => f.write_str("quest"),
        }
    }
}

/// A state transition reported by a hook.
///
/// Region identifiers are always lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HookEvent {
    EnteredRegion { entity: EntityId, region: String },
    LeftRegion { entity: EntityId, region: String },
}

impl HookEvent {
    /// The entity the transition happened to.
    pub fn entity(&self) -> EntityId {
        match self {
            HookEvent::EnteredRegion { entity, .. } | HookEvent::LeftRegion { entity, .. } => {
                *entity
            }
        }
    }
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookEvent::EnteredRegion { entity, region } => {
                write!(f, "{entity} entered region '{region}'")
            }
            HookEvent::LeftRegion { entity, region } => {
                write!(f, "{entity} left region '{region}'")
            }
        }
    }
}
