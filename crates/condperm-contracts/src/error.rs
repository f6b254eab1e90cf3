//! Error types for condperm.
//!
//! Only startup paths return these: configuration, registry construction,
//! and hook enabling. Resolution itself absorbs every failure it meets.

use thiserror::Error;

use crate::hook::HookKind;

#[derive(Debug, Error)]
pub enum CondpermError {
    /// A configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// The external system backing a hook is not present.
    ///
    /// Expected during hook initialization; the hook stays disabled.
    #[error("hook '{kind}' is unavailable: its backing system is not present")]
    HookUnavailable { kind: HookKind },

    /// An external system could not resolve something it was asked for.
    #[error("{system} lookup failed: {reason}")]
    ExternalLookup { system: String, reason: String },

    /// Two conditions were registered under the same case-insensitive name.
    #[error("condition '{name}' is already registered")]
    DuplicateCondition { name: String },

    /// Two hooks were registered for the same kind.
    #[error("a hook of kind '{kind}' is already registered")]
    DuplicateHook { kind: HookKind },
}

pub type CondpermResult<T> = Result<T, CondpermError>;
