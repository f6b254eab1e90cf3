//! Grants and the structured conditional grant grammar.
//!
//! ```text
//! <prefix>.[!]<condition>[=<parameter>].<target.grant.path>
//! ```
//!
//! Parsing is pure. The condition name keeps the case it was written in;
//! matching against the registry is case-insensitive and happens later.

use serde::{Deserialize, Serialize};

/// A raw (name, value) pair from the host's effective-permission view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    pub name: String,
    pub value: bool,
}

impl Grant {
    pub fn new(name: impl Into<String>, value: bool) -> Self {
        Self { name: name.into(), value }
    }
}

/// A grant whose name encodes a condition and the target grant it gates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalGrant {
    /// Condition name exactly as written (without `!` and parameter).
    pub condition_name: String,
    /// True when the condition segment started with `!`.
    pub negated: bool,
    /// Text after the first `=` of the condition segment, if any.
    pub parameter: Option<String>,
    /// The dot-joined remainder, applied verbatim.
    pub target_grant: String,
}

impl ConditionalGrant {
    /// Parse `name` against the reserved namespace `prefix`.
    ///
    /// Returns `None` unless the first segment equals `prefix` and the name
    /// has at least three dot-separated segments. Trailing empty segments
    /// do not count.
    pub fn parse(prefix: &str, name: &str) -> Option<Self> {
        let mut segments = name.splitn(3, '.');
        if segments.next()? != prefix {
            return None;
        }
        let condition_spec = segments.next()?;
        let target_grant = segments.next()?.trim_end_matches('.');
        if target_grant.is_empty() {
            return None;
        }

        let (negated, condition_spec) = match condition_spec.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, condition_spec),
        };

        let (condition_name, parameter) = match condition_spec.split_once('=') {
            Some((condition, parameter)) => (condition, Some(parameter.to_string())),
            None => (condition_spec, None),
        };

        Some(Self {
            condition_name: condition_name.to_string(),
            negated,
            parameter,
            target_grant: target_grant.to_string(),
        })
    }

    /// Whether the target applies given the condition's predicate result.
    ///
    /// A plain condition applies on true, a negated one on false.
    pub fn applies(&self, predicate: bool) -> bool {
        self.negated != predicate
    }
}
