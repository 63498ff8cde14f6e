use std::path::PathBuf;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{line, section};
use crate::cli::registry::CommandEntry;
use crate::core::{Feature, SummaryService};
use crate::export;
use crate::ledger::{form_label, format_fixed2, spaced_label, FieldMap, Section};
use crate::utils::ensure_dir;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "view",
            "Show shift totals and the submitted snapshot",
            "view [summary|snapshot]",
            cmd_view,
        )
        .with_actions(&["summary", "snapshot"])
        .gated(Feature::ViewData),
        CommandEntry::new(
            "export",
            "Write the whole shift to a CSV file",
            "export [path]",
            cmd_export,
        )
        .gated(Feature::Download),
    ]
}

fn cmd_view(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().map(|arg| arg.to_lowercase()).as_deref() {
        None => {
            show_summary(context)?;
            show_snapshot(context)
        }
        Some("summary") => show_summary(context),
        Some("snapshot") => show_snapshot(context),
        Some(other) => Err(CommandError::InvalidArguments(format!(
            "unknown view `{}`; expected summary or snapshot",
            other
        ))),
    }
}

fn show_summary(context: &ShellContext) -> CommandResult {
    let summary = SummaryService::shift_summary(context.session()?);
    section("Shift summary");
    line(format!(
        "  Lottery subtotal        : {} ({} tickets)",
        format_fixed2(summary.lottery_subtotal),
        summary.ticket_count
    ));
    line(format!(
        "  Fuel days recorded      : gas {}, diesel {}",
        summary.gas_days, summary.diesel_days
    ));
    line(format!(
        "  Sales management total  : {}",
        format_fixed2(summary.sales_management_total)
    ));
    line(format!(
        "  Money management total  : {}",
        format_fixed2(summary.money_management_total)
    ));
    line(format!("  Cash balance            : {}", summary.cash_balance));
    line(format!("  Check balance           : {}", summary.check_balance));
    for total in &summary.category_totals {
        line(format!(
            "  {:<24}: {}",
            form_label(total.category.total_key()),
            total.value
        ));
    }
    Ok(())
}

fn show_snapshot(context: &ShellContext) -> CommandResult {
    let snapshot = context.session()?.snapshot();
    for part in Section::ALL {
        section(format!("{} (submitted)", part.title()));
        if !snapshot.is_submitted(part) {
            io::print_hint(format!("Nothing submitted yet. Use `submit {}`.", part));
            continue;
        }
        match part {
            Section::SalesManagement => print_map(&snapshot.sales_management, ""),
            Section::SalesTotals => {
                print_map(&snapshot.sales_totals.fields, "");
                for (key, value) in snapshot.sales_totals.totals.iter() {
                    line(format!("  Total {:<24} {}", spaced_label(key), value));
                }
            }
            Section::MoneyManagement => print_map(&snapshot.money_management, ""),
            Section::InHand => {
                print_map(&snapshot.in_hand.cash, "Cash ");
                print_map(&snapshot.in_hand.check, "Check ");
            }
        }
    }
    Ok(())
}

fn print_map(fields: &FieldMap, prefix: &str) {
    for (key, value) in fields.iter() {
        line(format!("  {}{:<24} {}", prefix, spaced_label(key), value));
    }
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let target = match args.first() {
        Some(path) => PathBuf::from(path),
        None => {
            let dir = context.config.resolve_export_dir(&context.base_dir);
            ensure_dir(&dir)?;
            dir.join(export::DEFAULT_FILE_NAME)
        }
    };
    let session = context.session()?;
    let written = export::export_csv(session, &target)?;
    io::print_success(format!("Exported shift to {}.", written.display()));
    Ok(())
}
