//! Host lifecycle events delivered to the engine.
//!
//! The host delivers these serially on its simulation thread. The engine
//! forwards each one to the hooks subscribed to its kind before acting on it.

use serde::{Deserialize, Serialize};

use crate::entity::{EntityId, Location};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HostEvent {
    /// The entity is being admitted; its grant attachment exists from here on.
    PreConnect { entity: EntityId },
    /// The entity finished joining.
    Connect { entity: EntityId },
    /// The entity left. Terminal for all derived state.
    Disconnect { entity: EntityId },
    /// The entity's position changed.
    Moved { entity: EntityId, from: Location, to: Location },
    /// Game mode, flight, or sneak state changed.
    StatusChanged { entity: EntityId },
}

/// Discriminant of [`HostEvent`], used for hook subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HostEventKind {
    PreConnect,
    Connect,
    Disconnect,
    Moved,
    StatusChanged,
}

impl HostEvent {
    pub fn kind(&self) -> HostEventKind {
        match self {
            HostEvent::PreConnect { .. } => HostEventKind::PreConnect,
            HostEvent::Connect { .. } => HostEventKind::Connect,
            HostEvent::Disconnect { .. } => HostEventKind::Disconnect,
            HostEvent::Moved { .. } => HostEventKind::Moved,
            HostEvent::StatusChanged { .. } => HostEventKind::StatusChanged,
        }
    }

    pub fn entity(&self) -> EntityId {
        match self {
            HostEvent::PreConnect { entity }
            | HostEvent::Connect { entity }
            | HostEvent::Disconnect { entity }
            | HostEvent::Moved { entity, .. }
            | HostEvent::StatusChanged { entity } => *entity,
        }
    }
}
