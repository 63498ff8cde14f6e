use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output::{line, section};
use crate::cli::registry::CommandEntry;
use crate::core::CURRENT_SCHEMA_VERSION;
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "version",
            "Show build and data location details",
            "version",
            cmd_version,
        ),
        CommandEntry::new(
            "help",
            "List commands, or show usage for one",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new("exit", "Leave the shell", "exit", cmd_exit),
    ]
}

fn cmd_version(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    section(format!("Shift Core {}", meta.version));
    let rows = [
        ("Session schema", format!("v{CURRENT_SCHEMA_VERSION}")),
        ("Commit", format!("{} ({})", meta.git_hash, meta.git_status)),
        ("Built", format!("{} [{}]", meta.timestamp, meta.profile)),
        ("Compiler", meta.rustc.to_string()),
        ("Data directory", context.base_dir.display().to_string()),
    ];
    for (label, value) in rows {
        line(format!("  {label:<16} {value}"));
    }
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    context.print_help(args.first().copied());
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
