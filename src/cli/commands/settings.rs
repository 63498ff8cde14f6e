use crate::cli::core::{CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{line, section};
use crate::cli::registry::CommandEntry;
use crate::core::Profile;

use super::subcommand;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "profile",
            "Show or switch the operator profile",
            "profile [show|use <manager|clerk>]",
            cmd_profile,
        )
        .with_actions(&["show", "use"]),
        CommandEntry::new(
            "config",
            "View and manage shell preferences",
            "config [show|set <key> <value>|backup [note]|backups|restore <backup>]",
            cmd_config,
        )
        .with_actions(&["show", "set", "backup", "backups", "restore"]),
    ]
}

fn cmd_profile(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = subcommand(args);
    match action.as_str() {
        "" | "show" => {
            let profile = context.profile();
            section(format!("Profile: {}", profile));
            for feature in profile.features() {
                line(format!("  - {}", feature));
            }
            Ok(())
        }
        "use" => {
            let name = rest.first().ok_or_else(|| {
                CommandError::InvalidArguments("usage: profile use <manager|clerk>".into())
            })?;
            let profile = Profile::parse(name).ok_or_else(|| {
                CommandError::InvalidArguments(format!(
                    "unknown profile `{}`; expected manager or clerk",
                    name
                ))
            })?;
            context.config.profile = profile;
            context.persist_config()?;
            tracing::info!(%profile, "profile switched");
            io::print_success(format!("Now working as {}.", profile));
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown profile action `{}`",
            other
        ))),
    }
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = subcommand(args);
    match action.as_str() {
        "" | "show" => {
            section("Configuration");
            for (key, value) in context.config.entries() {
                line(format!("  {:<20} {}", key, value));
            }
            line(format!("  {:<20} {}", "file", context.config_manager.path().display()));
            Ok(())
        }
        "set" => {
            if rest.len() < 2 {
                return Err(CommandError::InvalidArguments(
                    "usage: config set <profile|export_dir|last_opened_session|backup_retention|ui_color_enabled> <value>".into(),
                ));
            }
            let key = rest[0].to_lowercase();
            let value = rest[1..].join(" ");
            context.config.set_value(&key, &value)?;
            context.persist_config()?;
            io::apply_config(&context.config, context.mode == CliMode::Script);
            io::print_success(format!("Set {} to {}.", key, value.trim()));
            Ok(())
        }
        "backup" => {
            let note = rest.join(" ");
            let note = Some(note.trim()).filter(|note| !note.is_empty());
            let name = context.config_manager.backup(&context.config, note)?;
            io::print_success(format!("Configuration backup created: {}", name));
            Ok(())
        }
        "backups" => {
            let backups = context.config_manager.list_backups()?;
            if backups.is_empty() {
                io::print_info("No configuration backups.");
                return Ok(());
            }
            section("Configuration backups");
            for (idx, backup) in backups.iter().enumerate() {
                line(format!("  {:>2}. {}", idx + 1, backup));
            }
            Ok(())
        }
        "restore" => {
            let reference = rest.first().ok_or_else(|| {
                CommandError::InvalidArguments("usage: config restore <backup>".into())
            })?;
            let name = match reference.parse::<usize>() {
                Ok(index) => {
                    let backups = context.config_manager.list_backups()?;
                    index
                        .checked_sub(1)
                        .and_then(|idx| backups.get(idx).cloned())
                        .ok_or_else(|| {
                            CommandError::InvalidArguments(format!(
                                "no configuration backup numbered {}",
                                index
                            ))
                        })?
                }
                Err(_) => reference.to_string(),
            };
            if !context.confirm(&format!("Replace the configuration with `{}`?", name))? {
                io::print_info("Operation cancelled.");
                return Ok(());
            }
            context.config = context.config_manager.restore(&name)?;
            context.persist_config()?;
            io::apply_config(&context.config, context.mode == CliMode::Script);
            io::print_success(format!("Configuration restored from {}.", name));
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown config action `{}`",
            other
        ))),
    }
}
