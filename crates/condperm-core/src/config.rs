//! Engine configuration.
//!
//! `EngineConfig` is read from a TOML document. Every key is optional:
//!
//! ```toml
//! prefix = "cperms"
//! debug = false
//! post_connect_delay_ticks = 20
//! transition_delay_ticks = 1
//! disabled_hooks = ["quest"]
//! hook_event_log_capacity = 256
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use condperm_contracts::{
    error::{CondpermError, CondpermResult},
    hook::HookKind,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Reserved first segment of conditional grant names.
    pub prefix: String,
    /// Initial state of verbose resolution tracing.
    pub debug: bool,
    /// Delay of the second resolution scheduled after connect.
    pub post_connect_delay_ticks: u64,
    /// Delay of resolutions triggered by hook transitions and status changes.
    pub transition_delay_ticks: u64,
    /// Hooks never enabled, even when their backing system is present.
    pub disabled_hooks: Vec<HookKind>,
    /// Most recent hook transitions kept for `drain_hook_events`. Older
    /// entries are dropped first; 0 keeps none.
    pub hook_event_log_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            prefix: "cperms".to_string(),
            debug: false,
            post_connect_delay_ticks: 20,
            transition_delay_ticks: 1,
            disabled_hooks: Vec::new(),
            hook_event_log_capacity: 256,
        }
    }
}

impl EngineConfig {
    /// Parse `s` as TOML and validate the result.
    ///
    /// Returns `CondpermError::ConfigError` if the TOML is malformed, has
    /// unknown keys, or names an unusable prefix.
    pub fn from_toml_str(s: &str) -> CondpermResult<Self> {
        let config: EngineConfig = toml::from_str(s).map_err(|e| CondpermError::ConfigError {
            reason: format!("failed to parse engine TOML: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read the file at `path` and parse it as engine configuration.
    pub fn from_file(path: &Path) -> CondpermResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| CondpermError::ConfigError {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// The prefix is one grant segment: non-empty, without dots.
    pub fn validate(&self) -> CondpermResult<()> {
        if self.prefix.is_empty() {
            return Err(CondpermError::ConfigError {
                reason: "prefix must not be empty".to_string(),
            });
        }
        if self.prefix.contains('.') {
            return Err(CondpermError::ConfigError {
                reason: format!("prefix '{}' must be a single segment without '.'", self.prefix),
            });
        }
        Ok(())
    }
}
