use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::line;
use crate::cli::registry::CommandEntry;
use crate::core::Feature;
use crate::ledger::InHandKind;

use super::{apply_assignments, known_fields, print_fields, subcommand};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "inhand",
        "Count cash and checks in hand and see the balances",
        "inhand [show|cash field=value...|check field=value...|clear|submit]",
        cmd_in_hand,
    )
    .with_actions(&["show", "cash", "check", "clear", "submit"])
    .gated(Feature::InHandCalculations)]
}

fn cmd_in_hand(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = subcommand(args);
    if let Some(kind) = InHandKind::parse(&action) {
        return set_count(context, kind, rest);
    }
    match action.as_str() {
        "" | "show" => {
            let in_hand = context.session()?.in_hand();
            print_fields("Cash", in_hand.cash.entries());
            line(format!("  {:<47} {}", "Cash balance", in_hand.cash.balance_display()));
            print_fields("Check", in_hand.check.entries());
            line(format!("  {:<47} {}", "Check balance", in_hand.check.balance_display()));
            Ok(())
        }
        "clear" => {
            if !context.confirm("Clear the cash and check counts?")? {
                io::print_info("Operation cancelled.");
                return Ok(());
            }
            context.session_mut()?.clear_in_hand();
            io::print_success("Cash and check counts cleared and submitted.");
            Ok(())
        }
        "submit" => {
            let session = context.session_mut()?;
            session.submit_in_hand();
            let in_hand = session.in_hand();
            io::print_success(format!(
                "In hand submitted. Cash balance {}, check balance {}.",
                in_hand.cash.balance_display(),
                in_hand.check.balance_display()
            ));
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown inhand action `{}`",
            other
        ))),
    }
}

fn set_count(context: &mut ShellContext, kind: InHandKind, args: &[&str]) -> CommandResult {
    let known = known_fields(kind.fields());
    let changed = apply_assignments(context, args, &known, |session, key, value| match kind {
        InHandKind::Cash => session.update_cash_field(key, value),
        InHandKind::Check => session.update_check_field(key, value),
    })?;
    let in_hand = context.session()?.in_hand();
    let balance = match kind {
        InHandKind::Cash => in_hand.cash.balance_display(),
        InHandKind::Check => in_hand.check.balance_display(),
    };
    io::print_success(format!(
        "Updated {} {} field(s). Balance: {}.",
        changed,
        kind.as_str(),
        balance
    ));
    Ok(())
}
