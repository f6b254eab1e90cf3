//! # condperm-contracts
//!
//! Shared types, the conditional grant grammar, and error contracts for the
//! condperm resolution engine.
//!
//! All crates in the workspace import from here. Apart from the grant
//! parser and a few value helpers, no logic lives in this crate.

pub mod entity;
pub mod error;
pub mod event;
pub mod grant;
pub mod hook;

#[cfg(test)]
mod tests {
    use super::*;
    use entity::{EntityId, GameMode, Location};
    use error::CondpermError;
    use event::{HostEvent, HostEventKind};
    use grant::ConditionalGrant;
    use hook::{HookEvent, HookKind};

    // ── ConditionalGrant::parse ──────────────────────────────────────────────

    #[test]
    fn parse_plain_condition() {
        let parsed = ConditionalGrant::parse("cperms", "cperms.flying.essentials.fly").unwrap();
        assert_eq!(parsed.condition_name, "flying");
        assert!(!parsed.negated);
        assert_eq!(parsed.parameter, None);
        assert_eq!(parsed.target_grant, "essentials.fly");
    }

    #[test]
    fn parse_negated_condition_with_parameter() {
        let parsed = ConditionalGrant::parse("cperms", "cperms.!inregion=Spawn.build.Place").unwrap();
        assert_eq!(parsed.condition_name, "inregion");
        assert!(parsed.negated);
        assert_eq!(parsed.parameter.as_deref(), Some("Spawn"));
        // Target keeps its case.
        assert_eq!(parsed.target_grant, "build.Place");
    }

    #[test]
    fn parse_splits_parameter_on_first_equals_only() {
        let parsed = ConditionalGrant::parse("cperms", "cperms.quest=a=b.x").unwrap();
        assert_eq!(parsed.condition_name, "quest");
        assert_eq!(parsed.parameter.as_deref(), Some("a=b"));
    }

    #[test]
    fn parse_empty_parameter_is_still_supplied() {
        let parsed = ConditionalGrant::parse("cperms", "cperms.inregion=.x").unwrap();
        assert_eq!(parsed.parameter.as_deref(), Some(""));
    }

    #[test]
    fn parse_chained_target_is_kept_verbatim() {
        let parsed =
            ConditionalGrant::parse("cperms", "cperms.flying.cperms.sneaking.target").unwrap();
        assert_eq!(parsed.target_grant, "cperms.sneaking.target");

        let inner = ConditionalGrant::parse("cperms", &parsed.target_grant).unwrap();
        assert_eq!(inner.condition_name, "sneaking");
        assert_eq!(inner.target_grant, "target");
    }

    #[test]
    fn parse_rejects_too_few_segments() {
        assert!(ConditionalGrant::parse("cperms", "cperms").is_none());
        assert!(ConditionalGrant::parse("cperms", "cperms.flying").is_none());
        assert!(ConditionalGrant::parse("cperms", "cperms.flying.").is_none());
        assert!(ConditionalGrant::parse("cperms", "cperms.flying..").is_none());
    }

    #[test]
    fn parse_rejects_other_namespaces() {
        assert!(ConditionalGrant::parse("cperms", "essentials.fly.other").is_none());
        // The prefix must be the whole first segment.
        assert!(ConditionalGrant::parse("cperms", "cpermsx.flying.x").is_none());
        assert!(ConditionalGrant::parse("cperms", "CPERMS.flying.x").is_none());
    }

    #[test]
    fn applies_follows_negation() {
        let plain = ConditionalGrant::parse("cperms", "cperms.flying.x").unwrap();
        let negated = ConditionalGrant::parse("cperms", "cperms.!flying.x").unwrap();

        assert!(plain.applies(true));
        assert!(!plain.applies(false));
        assert!(!negated.applies(true));
        assert!(negated.applies(false));
    }

    // ── Location ─────────────────────────────────────────────────────────────

    #[test]
    fn same_block_ignores_sub_block_jitter() {
        let a = Location::new("world", 10.1, 64.0, -3.9);
        let b = Location::new("world", 10.9, 64.5, -3.1);
        assert!(a.same_block(&b));
        assert_eq!(a.block(), b.block());
    }

    #[test]
    fn same_block_detects_block_and_world_changes() {
        let a = Location::new("world", 10.5, 64.0, 0.5);
        assert!(!a.same_block(&Location::new("world", 11.0, 64.0, 0.5)));
        assert!(!a.same_block(&Location::new("world", 10.5, 63.9, 0.5)));
        assert!(!a.same_block(&Location::new("nether", 10.5, 64.0, 0.5)));
    }

    #[test]
    fn block_floors_negative_coordinates() {
        let block = Location::new("world", -0.5, 0.0, -1.0).block();
        assert_eq!((block.x, block.y, block.z), (-1, 0, -1));
    }

    // ── Enums ────────────────────────────────────────────────────────────────

    #[test]
    fn game_mode_parses_case_insensitively() {
        assert_eq!("Creative".parse::<GameMode>().unwrap(), GameMode::Creative);
        assert_eq!("SPECTATOR".parse::<GameMode>().unwrap(), GameMode::Spectator);
        assert!("hardcore".parse::<GameMode>().is_err());
    }

    #[test]
    fn hook_kind_serializes_kebab_case() {
        let json = serde_json::to_string(&HookKind::Region).unwrap();
        assert_eq!(json, "\"region\"");
        let decoded: HookKind = serde_json::from_str("\"quest\"").unwrap();
        assert_eq!(decoded, HookKind::Quest);
    }

    #[test]
    fn host_event_reports_kind_and_entity() {
        let entity = EntityId::new();
        let event = HostEvent::Moved {
            entity,
            from: Location::new("world", 0.0, 0.0, 0.0),
            to: Location::new("world", 1.0, 0.0, 0.0),
        };
        assert_eq!(event.kind(), HostEventKind::Moved);
        assert_eq!(event.entity(), entity);
    }

    #[test]
    fn hook_event_display_names_region() {
        let entity = EntityId::new();
        let event = HookEvent::LeftRegion { entity, region: "spawn".to_string() };
        assert_eq!(event.entity(), entity);
        assert!(event.to_string().contains("left region 'spawn'"));
    }

    // ── CondpermError display messages ───────────────────────────────────────

    #[test]
    fn error_hook_unavailable_display() {
        let err = CondpermError::HookUnavailable { kind: HookKind::Region };
        let msg = err.to_string();
        assert!(msg.contains("region"));
        assert!(msg.contains("unavailable"));
    }

    #[test]
    fn error_external_lookup_display() {
        let err = CondpermError::ExternalLookup {
            system: "quest".to_string(),
            reason: "condition 'default.has_key' not found".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("quest lookup failed"));
        assert!(msg.contains("has_key"));
    }

    #[test]
    fn error_config_display() {
        let err = CondpermError::ConfigError { reason: "prefix must not be empty".to_string() };
        assert!(err.to_string().contains("configuration error"));
    }
}
