//! # condperm-hooks
//!
//! Capability hooks for the condperm resolution engine.
//!
//! ## Overview
//!
//! - [`RegionHook`] tracks region membership per entity and reports
//!   enter/leave transitions as entities move.
//! - [`QuestHook`] forwards quest-condition queries to a quest engine.
//!
//! Both take their external system as `Option<Arc<dyn _>>`; `None` means
//! the system is not installed and the hook stays disabled.
//!
//! ```rust,ignore
//! let mut hooks = HookManager::new();
//! hooks.register(Box::new(RegionHook::new(Some(Arc::new(regions)))))?;
//! hooks.register(Box::new(QuestHook::new(None)))?;
//! ```

pub mod memory;
pub mod quest;
pub mod region;
pub mod tracker;

pub use memory::{CuboidRegion, InMemoryQuestProvider, InMemoryRegionProvider};
pub use quest::{QuestHook, QuestProvider};
pub use region::{RegionHook, RegionProvider};
pub use tracker::MembershipTracker;

// ── Tests ─────────────────────────────────────────────────────────────────────
