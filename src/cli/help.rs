use crate::cli::io;
use crate::cli::output::{line, section};
use crate::cli::registry::{CommandEntry, CommandRegistry};
use crate::core::Profile;

pub fn print_overview(registry: &CommandRegistry, profile: Profile) {
    section("Available commands");
    for entry in registry.list() {
        let locked = match entry.feature {
            Some(feature) if !profile.allows(feature) => " (not available to this profile)",
            _ => "",
        };
        line(format!("  {:<10} {}{}", entry.name, entry.description, locked));
    }
    io::print_info("Use `help <command>` for details.");
}

pub fn print_command(entry: &CommandEntry) {
    section(format!("Help: {}", entry.name));
    line(format!("  Description: {}", entry.description));
    line(format!("  Usage: {}", entry.usage));
    if !entry.actions.is_empty() {
        line(format!("  Subcommands: {}", entry.actions.join(", ")));
    }
    if let Some(feature) = entry.feature {
        line(format!("  Feature: {}", feature));
    }
}
