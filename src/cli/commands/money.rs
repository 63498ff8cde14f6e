use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::line;
use crate::cli::registry::CommandEntry;
use crate::core::Feature;
use crate::ledger::{format_fixed2, MoneyManagementRecord};

use super::{apply_assignments, known_fields, print_fields, subcommand};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "money",
        "Fill in the money management form",
        "money [show|set field=value...|clear|submit]",
        cmd_money,
    )
    .with_actions(&["show", "set", "clear", "submit"])
    .gated(Feature::MoneyManagement)]
}

fn cmd_money(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = subcommand(args);
    match action.as_str() {
        "" | "show" => {
            let session = context.session()?;
            print_fields("Money management", session.money_management().entries());
            line(format!(
                "  {:<47} {}",
                "Total",
                format_fixed2(session.money_management_total())
            ));
            Ok(())
        }
        "set" => {
            let known = known_fields(MoneyManagementRecord::FIELDS);
            let changed = apply_assignments(context, rest, &known, |session, key, value| {
                session.update_money_management_field(key, value)
            })?;
            io::print_success(format!("Updated {} money field(s).", changed));
            Ok(())
        }
        "clear" => {
            if !context.confirm("Clear every money management field?")? {
                io::print_info("Operation cancelled.");
                return Ok(());
            }
            context.session_mut()?.clear_money_management();
            io::print_success("Money management cleared.");
            Ok(())
        }
        "submit" => {
            context.session_mut()?.submit_money_management();
            io::print_success("Money management submitted.");
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown money action `{}`",
            other
        ))),
    }
}
