use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::{line, section};
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};
use crate::core::Feature;
use crate::ledger::format_fixed2;

use super::subcommand;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "lottery",
        "Record ticket readings and manage the ticket catalog",
        "lottery [list|record <denomination> <serial> <open> <close>|catalog [denomination]|add-ticket <denomination> <serial>|add-denomination <label>]",
        cmd_lottery,
    )
    .with_actions(&["list", "record", "catalog", "add-ticket", "add-denomination"])
    .gated(Feature::LotteryManagement)]
}

fn cmd_lottery(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = subcommand(args);
    match action.as_str() {
        "" | "list" => list_readings(context),
        "record" => {
            let [denomination, serial, opening, closing] = rest else {
                return Err(CommandError::InvalidArguments(
                    "usage: lottery record <denomination> <serial> <open> <close>".into(),
                ));
            };
            let session = context.session_mut()?;
            if !session.ticket_catalog().contains(denomination, serial) {
                io::print_hint(format!(
                    "Ticket {} is not in the {} catalog; recording it anyway.",
                    serial, denomination
                ));
            }
            let entry = session
                .record_ticket_reading(denomination, serial, opening, closing)
                .cloned()
                .ok_or_else(|| {
                    CommandError::InvalidArguments(
                        "denomination, serial, open, and close must all be filled in".into(),
                    )
                })?;
            let book_total = session
                .lottery_ledger()
                .book(denomination)
                .map(|book| book.abs_total())
                .unwrap_or_default();
            io::print_success(format!(
                "{} #{}: {} sold, {} due ({} book total {}).",
                denomination,
                serial,
                entry.units_sold,
                format_fixed2(entry.amount_due),
                denomination,
                format_fixed2(book_total)
            ));
            Ok(())
        }
        "catalog" => {
            let session = context.session()?;
            let catalog = session.ticket_catalog();
            match rest.first() {
                Some(denomination) => {
                    section(format!("Tickets for {}", denomination));
                    let tickets = catalog.tickets(denomination);
                    if tickets.is_empty() {
                        io::print_info("No tickets listed.");
                    } else {
                        line(format!("  {}", tickets.join(", ")));
                    }
                }
                None => {
                    section("Ticket catalog");
                    for denomination in catalog.denominations() {
                        line(format!(
                            "  {:<5} {}",
                            denomination,
                            catalog.tickets(denomination).join(", ")
                        ));
                    }
                }
            }
            Ok(())
        }
        "add-ticket" => {
            let [denomination, serial] = rest else {
                return Err(CommandError::InvalidArguments(
                    "usage: lottery add-ticket <denomination> <serial>".into(),
                ));
            };
            if context.session_mut()?.add_catalog_ticket(denomination, serial) {
                io::print_success(format!("Added ticket {} to {}.", serial, denomination));
            } else {
                io::print_warning(format!(
                    "Ticket {} was not added: unknown denomination or already listed.",
                    serial
                ));
            }
            Ok(())
        }
        "add-denomination" => {
            let [label] = rest else {
                return Err(CommandError::InvalidArguments(
                    "usage: lottery add-denomination <label>".into(),
                ));
            };
            if context.session_mut()?.register_denomination(label) {
                io::print_success(format!("Denomination {} registered.", label));
            } else {
                io::print_warning(format!("Denomination {} already exists.", label));
            }
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown lottery action `{}`",
            other
        ))),
    }
}

fn list_readings(context: &ShellContext) -> CommandResult {
    let ledger = context.session()?.lottery_ledger();
    if ledger.is_empty() {
        io::print_info("No ticket readings recorded yet.");
        return Ok(());
    }
    let mut table = Table::new(
        Some("Lottery readings"),
        vec![
            TableColumn::new("Amount", 6),
            TableColumn::new("Ticket", 6),
            TableColumn::new("Open", 5),
            TableColumn::new("Close", 5),
            TableColumn::new("Sold", 5),
            TableColumn::new("Due", 8),
        ],
    );
    for (denomination, book) in ledger.books() {
        for (serial, entry) in book.tickets() {
            table.add_row(vec![
                denomination.to_string(),
                serial.to_string(),
                entry.opening.clone(),
                entry.closing.clone(),
                entry.units_sold.to_string(),
                format_fixed2(entry.amount_due),
            ]);
        }
    }
    table.render();
    line(format!("  Subtotal: {}", format_fixed2(ledger.subtotal())));
    Ok(())
}
