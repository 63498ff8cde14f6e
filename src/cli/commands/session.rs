use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{line, section};
use crate::cli::registry::CommandEntry;
use crate::ledger::format_fixed2;

use super::subcommand;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "session",
        "Start, save, load, and back up shift sessions",
        "session [info|new <name>|save [name]|load <name>|list|backup [note]|backups [name]|restore <backup> [name]]",
        cmd_session,
    )
    .with_actions(&["info", "new", "save", "load", "list", "backup", "backups", "restore"])]
}

fn cmd_session(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = subcommand(args);
    match action.as_str() {
        "" | "info" => show_info(context),
        "new" => {
            let name = joined(rest)
                .ok_or_else(|| CommandError::InvalidArguments("usage: session new <name>".into()))?;
            if context.manager.current.is_some()
                && !context.confirm("Discard the current session and start a new one?")?
            {
                io::print_info("Operation cancelled.");
                return Ok(());
            }
            context.manager.create(&name);
            io::print_success(format!("Started session `{}`.", name));
            Ok(())
        }
        "save" => {
            let path = match joined(rest) {
                Some(name) => {
                    let path = context.manager.save_as(&name)?;
                    context.remember_session(Some(&name))?;
                    path
                }
                None => context.manager.save()?,
            };
            io::print_success(format!("Session saved to {}.", path.display()));
            Ok(())
        }
        "load" => {
            let name = joined(rest).ok_or_else(|| {
                CommandError::InvalidArguments("usage: session load <name>".into())
            })?;
            let title = context.manager.load(&name)?.name.clone();
            context.remember_session(Some(&name))?;
            io::print_success(format!("Loaded session `{}`.", title));
            Ok(())
        }
        "list" => {
            let sessions = context.manager.list_sessions()?;
            if sessions.is_empty() {
                io::print_info("No saved sessions.");
                return Ok(());
            }
            section("Saved sessions");
            let current = context.manager.current_name().map(crate::storage::canonical_name);
            for name in sessions {
                let marker = if current.as_deref() == Some(name.as_str()) {
                    "*"
                } else {
                    " "
                };
                line(format!(" {} {}", marker, name));
            }
            Ok(())
        }
        "backup" => {
            let note = joined(rest);
            let backup = context.manager.backup(note.as_deref())?;
            io::print_success(format!("Backup created: {}", backup));
            Ok(())
        }
        "backups" => {
            let name = match joined(rest) {
                Some(name) => name,
                None => current_name(context)?,
            };
            let backups = context.manager.list_backups(&name)?;
            if backups.is_empty() {
                io::print_info(format!("No backups for `{}`.", name));
                return Ok(());
            }
            section(format!("Backups of {}", name));
            for (idx, backup) in backups.iter().enumerate() {
                line(format!("  {:>2}. {}", idx + 1, backup));
            }
            Ok(())
        }
        "restore" => {
            let backup = rest.first().ok_or_else(|| {
                CommandError::InvalidArguments("usage: session restore <backup> [name]".into())
            })?;
            let name = match joined(&rest[1..]) {
                Some(name) => name,
                None => current_name(context)?,
            };
            let backup = resolve_backup(context, &name, backup)?;
            if !context.confirm(&format!("Replace `{}` with backup `{}`?", name, backup))? {
                io::print_info("Operation cancelled.");
                return Ok(());
            }
            context.manager.restore(&name, &backup)?;
            io::print_success(format!("Restored `{}` from {}.", name, backup));
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown session action `{}`",
            other
        ))),
    }
}

fn show_info(context: &ShellContext) -> CommandResult {
    let session = context.session()?;
    section(format!("Session: {}", session.name));
    line(format!("  Id           : {}", session.id));
    line(format!(
        "  Saved as     : {}",
        context.manager.current_name().unwrap_or("(unsaved)")
    ));
    line(format!("  Fuel year    : {}", session.fuel_ledger().year()));
    line(format!(
        "  Created      : {}",
        session.created_at.format("%Y-%m-%d %H:%M")
    ));
    line(format!(
        "  Updated      : {}",
        session.updated_at.format("%Y-%m-%d %H:%M")
    ));
    line(format!(
        "  Tickets      : {} ({} subtotal)",
        session.lottery_ledger().ticket_count(),
        format_fixed2(session.lottery_subtotal())
    ));
    line(format!("  Profile      : {}", context.profile()));
    Ok(())
}

fn joined(args: &[&str]) -> Option<String> {
    let name = args.join(" ");
    let name = name.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

fn current_name(context: &ShellContext) -> Result<String, CommandError> {
    context
        .manager
        .current_name()
        .map(str::to_string)
        .ok_or_else(|| {
            CommandError::InvalidArguments(
                "the current session has not been saved; pass a session name".into(),
            )
        })
}

/// Accepts a backup file name or its 1-based position in `session backups`.
fn resolve_backup(context: &ShellContext, name: &str, reference: &str) -> Result<String, CommandError> {
    if let Ok(index) = reference.parse::<usize>() {
        let backups = context.manager.list_backups(name)?;
        return index
            .checked_sub(1)
            .and_then(|idx| backups.get(idx).cloned())
            .ok_or_else(|| {
                CommandError::InvalidArguments(format!("no backup numbered {}", index))
            });
    }
    Ok(reference.to_string())
}
