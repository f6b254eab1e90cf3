//! In-memory region and quest providers.
//!
//! Reference implementations of the external systems, used by the demo and
//! the test suites. Regions are axis-aligned block cuboids and can be
//! loaded from TOML:
//!
//! ```toml
//! worlds = ["world", "nether"]
//!
//! [[regions]]
//! id = "Spawn"
//! world = "world"
//! min = [-16, 0, -16]
//! max = [15, 255, 15]
//! ```

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use condperm_contracts::{
    entity::{BlockPosition, EntityId, Location},
    error::{CondpermError, CondpermResult},
};

use crate::{quest::QuestProvider, region::RegionProvider};

// ── Regions ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CuboidRegion {
    pub id: String,
    pub world: String,
    /// Inclusive minimum block corner.
    pub min: [i32; 3],
    /// Inclusive maximum block corner.
    pub max: [i32; 3],
}

impl CuboidRegion {
    pub fn contains(&self, block: &BlockPosition) -> bool {
        block.world == self.world
            && (self.min[0]..=self.max[0]).contains(&block.x)
            && (self.min[1]..=self.max[1]).contains(&block.y)
            && (self.min[2]..=self.max[2]).contains(&block.z)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RegionFile {
    worlds: Vec<String>,
    regions: Vec<CuboidRegion>,
}

/// Cuboid regions per world.
///
/// Querying a world the provider knows nothing about is a lookup failure,
/// the same way a region system without a manager for that world would be.
#[derive(Debug, Default)]
pub struct InMemoryRegionProvider {
    worlds: BTreeSet<String>,
    regions: Vec<CuboidRegion>,
}

impl InMemoryRegionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a region document. Worlds named by regions are known implicitly.
    pub fn from_toml_str(s: &str) -> CondpermResult<Self> {
        let file: RegionFile = toml::from_str(s).map_err(|e| CondpermError::ConfigError {
            reason: format!("failed to parse region TOML: {}", e),
        })?;
        let mut provider = Self::new();
        for world in file.worlds {
            provider.add_world(world);
        }
        for region in file.regions {
            provider.add_region(region);
        }
        Ok(provider)
    }

    pub fn add_world(&mut self, world: impl Into<String>) {
        self.worlds.insert(world.into());
    }

    pub fn add_region(&mut self, region: CuboidRegion) {
        self.worlds.insert(region.world.clone());
        self.regions.push(region);
    }

    pub fn regions(&self) -> &[CuboidRegion] {
        &self.regions
    }
}

impl RegionProvider for InMemoryRegionProvider {
    fn applicable_regions(&self, location: &Location) -> CondpermResult<Vec<String>> {
        if !self.worlds.contains(&location.world) {
            return Err(CondpermError::ExternalLookup {
                system: "region".to_string(),
                reason: format!("no region manager for world '{}'", location.world),
            });
        }
        let block = location.block();
        Ok(self
            .regions
            .iter()
            .filter(|region| region.contains(&block))
            .map(|region| region.id.clone())
            .collect())
    }
}

// ── Quests ───────────────────────────────────────────────────────────────────

/// package → condition → entities for which the condition holds.
type QuestTable = HashMap<String, HashMap<String, HashSet<EntityId>>>;

/// Quest packages whose conditions are plain per-entity flags.
#[derive(Debug, Default)]
pub struct InMemoryQuestProvider {
    packages: Mutex<QuestTable>,
}

impl InMemoryQuestProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `condition` in `package`, creating the package if needed.
    pub fn define(&self, package: &str, condition: &str) {
        if let Ok(mut packages) = self.packages.lock() {
            packages
                .entry(package.to_string())
                .or_default()
                .entry(condition.to_string())
                .or_default();
        }
    }

    /// Make a declared condition hold (or stop holding) for the entity.
    pub fn set(&self, entity: EntityId, package: &str, condition: &str, holds: bool) {
        if let Ok(mut packages) = self.packages.lock() {
            let entities = packages
                .entry(package.to_string())
                .or_default()
                .entry(condition.to_string())
                .or_default();
            if holds {
                entities.insert(entity);
            } else {
                entities.remove(&entity);
            }
        }
    }
}

impl QuestProvider for InMemoryQuestProvider {
    fn has_package(&self, package: &str) -> bool {
        self.packages
            .lock()
            .map(|packages| packages.contains_key(package))
            .unwrap_or(false)
    }

    fn check(&self, entity: EntityId, package: &str, condition: &str) -> CondpermResult<bool> {
        let packages = self.packages.lock().map_err(|e| CondpermError::ExternalLookup {
            system: "quest".to_string(),
            reason: format!("quest state lock poisoned: {}", e),
        })?;
        let holds = packages
            .get(package)
            .and_then(|conditions| conditions.get(condition))
            .map(|entities| entities.contains(&entity));
        holds.ok_or_else(|| CondpermError::ExternalLookup {
            system: "quest".to_string(),
            reason: format!("condition '{}.{}' not found", package, condition),
        })
    }
}
