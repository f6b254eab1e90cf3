//! The condition registry.
//!
//! A closed set of named predicates, filled at startup and read-only
//! afterwards. Names are matched case-insensitively.

use std::collections::HashMap;

use tracing::debug;

use condperm_contracts::error::{CondpermError, CondpermResult};

use crate::traits::Condition;

#[derive(Default)]
pub struct ConditionRegistry {
    /// Keyed by lower-cased condition name.
    conditions: HashMap<String, Box<dyn Condition>>,
}

impl ConditionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a condition under its `name()`.
    ///
    /// Returns `CondpermError::DuplicateCondition` if the name (ignoring
    /// case) is taken.
    pub fn register(&mut self, condition: Box<dyn Condition>) -> CondpermResult<()> {
        let key = condition.name().to_ascii_lowercase();
        if self.conditions.contains_key(&key) {
            return Err(CondpermError::DuplicateCondition { name: key });
        }
        debug!(
            condition = %key,
            hook = ?condition.required_hook(),
            requires_parameter = condition.requires_parameter(),
            "registered condition"
        );
        self.conditions.insert(key, condition);
        Ok(())
    }

    /// Case-insensitive exact lookup.
    pub fn lookup(&self, name: &str) -> Option<&dyn Condition> {
        self.conditions
            .get(&name.to_ascii_lowercase())
            .map(|c| c.as_ref())
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.conditions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
