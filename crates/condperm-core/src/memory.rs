//! In-memory implementation of `PermissionHost`.
//!
//! `InMemoryHost` is the reference host: entities with names, assigned
//! grants, a grant attachment the engine writes to, a location, and status
//! flags. The demo runs on it and the test suites use it as a fixture.
//!
//! Effective grants are the assigned grants in assignment order followed by
//! attachment grants not already assigned. The first occurrence of a name
//! wins.

use std::collections::BTreeMap;

use condperm_contracts::{
    entity::{EntityId, EntityStatus, Location},
    event::HostEvent,
    grant::Grant,
};

use crate::traits::PermissionHost;

#[derive(Debug, Clone)]
struct HostEntity {
    name: String,
    connected: bool,
    assigned: Vec<Grant>,
    attachment: Vec<String>,
    location: Location,
    status: EntityStatus,
}

#[derive(Debug, Default)]
pub struct InMemoryHost {
    entities: BTreeMap<EntityId, HostEntity>,
}

impl InMemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a disconnected entity standing at `location`.
    pub fn add_entity(&mut self, name: impl Into<String>, location: Location) -> EntityId {
        let id = EntityId::new();
        self.entities.insert(
            id,
            HostEntity {
                name: name.into(),
                connected: false,
                assigned: Vec::new(),
                attachment: Vec::new(),
                location,
                status: EntityStatus::default(),
            },
        );
        id
    }

    /// Assign a raw grant. Re-assigning a name replaces its value in place.
    pub fn assign(&mut self, entity: EntityId, name: impl Into<String>, value: bool) {
        let name = name.into();
        if let Some(e) = self.entities.get_mut(&entity) {
            match e.assigned.iter_mut().find(|g| g.name == name) {
                Some(existing) => existing.value = value,
                None => e.assigned.push(Grant::new(name, value)),
            }
        }
    }

    pub fn unassign(&mut self, entity: EntityId, name: &str) {
        if let Some(e) = self.entities.get_mut(&entity) {
            e.assigned.retain(|g| g.name != name);
        }
    }

    /// Mark connected. Returns the events the host would deliver, in order.
    pub fn connect(&mut self, entity: EntityId) -> Vec<HostEvent> {
        match self.entities.get_mut(&entity) {
            Some(e) if !e.connected => {
                e.connected = true;
                vec![HostEvent::PreConnect { entity }, HostEvent::Connect { entity }]
            }
            _ => Vec::new(),
        }
    }

    /// Mark disconnected and drop the attachment.
    pub fn disconnect(&mut self, entity: EntityId) -> Option<HostEvent> {
        match self.entities.get_mut(&entity) {
            Some(e) if e.connected => {
                e.connected = false;
                e.attachment.clear();
                Some(HostEvent::Disconnect { entity })
            }
            _ => None,
        }
    }

    /// Move the entity. Returns the move event if the entity is connected.
    pub fn move_to(&mut self, entity: EntityId, to: Location) -> Option<HostEvent> {
        let e = self.entities.get_mut(&entity)?;
        let from = std::mem::replace(&mut e.location, to.clone());
        e.connected.then_some(HostEvent::Moved { entity, from, to })
    }

    /// Update status flags. Returns the change event if the entity is connected.
    pub fn update_status(
        &mut self,
        entity: EntityId,
        update: impl FnOnce(&mut EntityStatus),
    ) -> Option<HostEvent> {
        let e = self.entities.get_mut(&entity)?;
        update(&mut e.status);
        e.connected.then_some(HostEvent::StatusChanged { entity })
    }

    /// Whether `name` is effectively granted with value true.
    pub fn has_grant(&self, entity: EntityId, name: &str) -> bool {
        self.effective_grants(entity)
            .iter()
            .any(|g| g.name == name && g.value)
    }

    /// Names currently on the engine's attachment, in the order they were set.
    pub fn attachment(&self, entity: EntityId) -> Vec<String> {
        self.entities
            .get(&entity)
            .map(|e| e.attachment.clone())
            .unwrap_or_default()
    }
}

impl PermissionHost for InMemoryHost {
    fn effective_grants(&self, entity: EntityId) -> Vec<Grant> {
        let Some(e) = self.entities.get(&entity) else {
            return Vec::new();
        };
        let mut grants = e.assigned.clone();
        for name in &e.attachment {
            if !grants.iter().any(|g| &g.name == name) {
                grants.push(Grant::new(name.clone(), true));
            }
        }
        grants
    }

    fn set_grant(&mut self, entity: EntityId, name: &str) {
        if let Some(e) = self.entities.get_mut(&entity) {
            if !e.attachment.iter().any(|n| n == name) {
                e.attachment.push(name.to_string());
            }
        }
    }

    fn unset_grant(&mut self, entity: EntityId, name: &str) {
        if let Some(e) = self.entities.get_mut(&entity) {
            e.attachment.retain(|n| n != name);
        }
    }

    fn is_connected(&self, entity: EntityId) -> bool {
        self.entities.get(&entity).is_some_and(|e| e.connected)
    }

    fn connected_entities(&self) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|(_, e)| e.connected)
            .map(|(id, _)| *id)
            .collect()
    }

    fn entity_by_name(&self, name: &str) -> Option<EntityId> {
        self.entities
            .iter()
            .find(|(_, e)| e.connected && e.name.eq_ignore_ascii_case(name))
            .map(|(id, _)| *id)
    }

    fn entity_name(&self, entity: EntityId) -> Option<String> {
        self.entities.get(&entity).map(|e| e.name.clone())
    }

    fn location(&self, entity: EntityId) -> Option<Location> {
        self.entities.get(&entity).map(|e| e.location.clone())
    }

    fn status(&self, entity: EntityId) -> Option<EntityStatus> {
        self.entities.get(&entity).map(|e| e.status.clone())
    }
}
