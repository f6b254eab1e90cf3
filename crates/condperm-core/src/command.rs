//! Admin command surface.
//!
//! Text in, text out. Each subcommand is gated on a sender permission; a
//! subcommand the sender may not use gets the same reply as an unknown one.

use crate::{
    engine::ResolutionEngine,
    traits::{CommandSender, PermissionHost},
};

pub const RELOAD_PERMISSION: &str = "conditionalperms.reload";
pub const DEBUG_PERMISSION: &str = "conditionalperms.debug";

const REPLY_PREFIX: &str = "[ConditionalPerms] ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCommand {
    /// No arguments: version and usage.
    Usage,
    /// Re-resolve one named entity, or everyone.
    Reload { target: Option<String> },
    /// Toggle verbose resolution tracing.
    Debug,
    Unknown,
}

impl AdminCommand {
    pub fn parse(args: &[&str]) -> Self {
        match args {
            [] => AdminCommand::Usage,
            [sub, rest @ ..] if sub.eq_ignore_ascii_case("reload") => AdminCommand::Reload {
                target: rest.first().map(|name| name.to_string()),
            },
            [sub, ..] if sub.eq_ignore_ascii_case("debug") => AdminCommand::Debug,
            _ => AdminCommand::Unknown,
        }
    }
}

/// Run an admin command and return the reply lines.
pub fn execute(
    engine: &mut ResolutionEngine,
    host: &mut dyn PermissionHost,
    sender: &dyn CommandSender,
    args: &[&str],
) -> Vec<String> {
    let replies = match AdminCommand::parse(args) {
        AdminCommand::Usage => usage(sender),

        AdminCommand::Reload { target } if sender.has_permission(RELOAD_PERMISSION) => {
            match target {
                // An entity the engine holds no state for has not finished
                // connecting, so it is not online as far as reload goes.
                Some(name) => match host.entity_by_name(&name) {
                    Some(entity) if engine.resolve(host, entity).is_some() => {
                        let display = host.entity_name(entity).unwrap_or(name);
                        vec![format!("Player {} has their permissions refreshed.", display)]
                    }
                    _ => vec![format!("Player '{}' is not online.", name)],
                },
                None => {
                    engine.reload_all(host);
                    vec!["All online users were refreshed.".to_string()]
                }
            }
        }

        AdminCommand::Debug if sender.has_permission(DEBUG_PERMISSION) => {
            let verbose = engine.toggle_verbose();
            vec![format!("Set debug to {}.", verbose)]
        }

        _ => vec!["Unknown sub command.".to_string()],
    };

    replies
        .into_iter()
        .map(|line| format!("{REPLY_PREFIX}{line}"))
        .collect()
}

fn usage(sender: &dyn CommandSender) -> Vec<String> {
    let mut lines = vec![format!("Running version v{}.", env!("CARGO_PKG_VERSION"))];
    if sender.has_permission(RELOAD_PERMISSION) {
        lines.push("--> reload to refresh all online users.".to_string());
        lines.push("--> reload <username> to refresh a specific user.".to_string());
    }
    if sender.has_permission(DEBUG_PERMISSION) {
        lines.push("--> debug to toggle debug mode.".to_string());
    }
    lines
}
