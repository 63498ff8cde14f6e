use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{line, section};
use crate::cli::registry::CommandEntry;
use crate::core::Feature;
use crate::ledger::{form_label, format_fixed2, SalesTotalsRecord};

use super::{apply_assignments, known_fields, print_fields, subcommand};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "sales",
            "Fill in the sales management form",
            "sales [show|set field=value...|add-field <name>|submit]",
            cmd_sales,
        )
        .with_actions(&["show", "set", "add-field", "submit"])
        .gated(Feature::SalesManagement),
        CommandEntry::new(
            "totals",
            "Fill in sales totals and review the derived category totals",
            "totals [show|set field=value...|clear|submit]",
            cmd_totals,
        )
        .with_actions(&["show", "set", "clear", "submit"])
        .gated(Feature::SalesTotals),
    ]
}

fn cmd_sales(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = subcommand(args);
    match action.as_str() {
        "" | "show" => show_sales(context),
        "set" => {
            let known: Vec<String> = context
                .session()?
                .sales_management()
                .keys()
                .map(str::to_string)
                .collect();
            let changed = apply_assignments(context, rest, &known, |session, key, value| {
                session.update_sales_management_field(key, value)
            })?;
            io::print_success(format!("Updated {} sales field(s).", changed));
            Ok(())
        }
        "add-field" => {
            let name = rest.join(" ");
            if name.trim().is_empty() {
                return Err(CommandError::InvalidArguments(
                    "usage: sales add-field <name>".into(),
                ));
            }
            match context.session_mut()?.add_sales_management_field(&name) {
                Some(key) => io::print_success(format!(
                    "Added field `{}`. Set it with `sales set {}=<amount>`.",
                    key, key
                )),
                None => io::print_warning(format!("A field named `{}` already exists.", name.trim())),
            }
            Ok(())
        }
        "submit" => {
            context.session_mut()?.submit_sales_management();
            io::print_success("Sales management submitted.");
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown sales action `{}`",
            other
        ))),
    }
}

fn show_sales(context: &ShellContext) -> CommandResult {
    let session = context.session()?;
    print_fields("Sales management", session.sales_management().entries());
    line(format!(
        "  {:<47} {}",
        "Lottery subtotal",
        format_fixed2(session.lottery_subtotal())
    ));
    line(format!(
        "  {:<47} {}",
        "Total",
        format_fixed2(session.sales_management_total())
    ));
    Ok(())
}

fn cmd_totals(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = subcommand(args);
    match action.as_str() {
        "" | "show" => show_totals(context),
        "set" => {
            let known = known_fields(SalesTotalsRecord::FIELDS);
            let changed = apply_assignments(context, rest, &known, |session, key, value| {
                session.update_sales_totals_field(key, value)
            })?;
            io::print_success(format!("Updated {} sales totals field(s).", changed));
            Ok(())
        }
        "clear" => {
            if !context.confirm("Clear every sales totals field?")? {
                io::print_info("Operation cancelled.");
                return Ok(());
            }
            context.session_mut()?.clear_sales_totals();
            io::print_success("Sales totals cleared.");
            Ok(())
        }
        "submit" => {
            context.session_mut()?.submit_sales_totals();
            io::print_success("Sales totals submitted.");
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown totals action `{}`",
            other
        ))),
    }
}

fn show_totals(context: &ShellContext) -> CommandResult {
    let session = context.session()?;
    print_fields("Sales totals", session.sales_totals().entries());
    section("Category totals");
    for total in session.category_totals() {
        line(format!(
            "  {:<24} {:<22} {}",
            form_label(total.category.total_key()),
            total.category.total_key(),
            total.value
        ));
    }
    Ok(())
}
