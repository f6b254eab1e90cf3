//! # condperm-core
//!
//! The conditional grant resolution engine.
//!
//! This crate provides:
//! - The seam traits (`PermissionHost`, `Condition`, `Hook`)
//! - `ConditionRegistry` and `HookManager`, filled at startup
//! - `ResolutionEngine`, which turns host events into resolved grants
//! - `InMemoryHost`, a reference host for tests and demos
//!
//! ## Usage
//!
//! ```rust,ignore
//! use condperm_core::{EngineConfig, HookManager, ConditionRegistry, ResolutionEngine};
//!
//! let mut engine = ResolutionEngine::new(EngineConfig::default(), conditions, hooks);
//! engine.init();
//! engine.handle_event(&mut host, &event);
//! engine.tick(&mut host);
//! ```

pub mod command;
pub mod config;
pub mod engine;
pub mod hooks;
pub mod memory;
pub mod registry;
pub mod scheduler;
pub mod state;
pub mod traits;

pub use config::EngineConfig;
pub use engine::{ResolutionEngine, ResolutionReport};
pub use hooks::{HookManager, HookRef};
pub use memory::InMemoryHost;
pub use registry::ConditionRegistry;
