use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};
use crate::core::Feature;
use crate::ledger::fuel::month_name;
use crate::ledger::{FuelDayReading, FuelKind, FuelReadingPatch};

use super::{parse_assignments, resolve_field, subcommand};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "fuel",
        "Record and review daily gas and diesel stock",
        "fuel [show <gas|diesel> [month]|record <gas|diesel> <month> <day> field=value...]",
        cmd_fuel,
    )
    .with_actions(&["show", "record"])
    .gated(Feature::GasAndDiesel)]
}

fn cmd_fuel(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (action, rest) = subcommand(args);
    match action.as_str() {
        "" => {
            show(context, FuelKind::Gas, None)?;
            show(context, FuelKind::Diesel, None)
        }
        "show" => {
            let kind = parse_kind(rest.first().copied().unwrap_or("gas"))?;
            let month = rest.get(1).map(|value| parse_month(value)).transpose()?;
            show(context, kind, month)
        }
        "record" => {
            if rest.len() < 4 {
                return Err(CommandError::InvalidArguments(
                    "usage: fuel record <gas|diesel> <month> <day> field=value...".into(),
                ));
            }
            let kind = parse_kind(rest[0])?;
            let month = parse_month(rest[1])?;
            let day: u32 = rest[2].parse().map_err(|_| {
                CommandError::InvalidArguments(format!("`{}` is not a day of the month", rest[2]))
            })?;
            let patch = build_patch(&rest[3..])?;

            let session = context.session_mut()?;
            let year = session.fuel_ledger().year();
            let total = session
                .record_fuel_reading(kind, month, day, patch)
                .map(FuelDayReading::today_total_display)
                .ok_or_else(|| {
                    CommandError::InvalidArguments(format!(
                        "{}/{} is not a date in {}",
                        month, day, year
                    ))
                })?;
            io::print_success(format!(
                "{} reading for {} {} saved. Today's total: {}.",
                kind,
                month_name(month).unwrap_or("?"),
                day,
                total
            ));
            Ok(())
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown fuel action `{}`",
            other
        ))),
    }
}

fn show(context: &ShellContext, kind: FuelKind, month: Option<u32>) -> CommandResult {
    let ledger = context.session()?.fuel_ledger();
    let title = match month.and_then(month_name) {
        Some(name) => format!("{} readings, {} {}", kind, name, ledger.year()),
        None => format!("{} readings, {}", kind, ledger.year()),
    };
    let mut table = Table::new(
        Some(title),
        vec![
            TableColumn::new("Month", 5),
            TableColumn::new("Day", 3),
            TableColumn::new("Inventory", 9),
            TableColumn::new("Opening", 7),
            TableColumn::new("Sale", 6),
            TableColumn::new("New", 6),
            TableColumn::new("Monthly", 7),
            TableColumn::new("Total", 8),
        ],
    );
    for (reading_month, day, reading) in ledger.readings(kind) {
        if month.is_some_and(|wanted| wanted != reading_month) {
            continue;
        }
        table.add_row(vec![
            reading_month.to_string(),
            day.to_string(),
            reading.inventory_stock.clone(),
            reading.opening_stock.clone(),
            reading.today_sale.clone(),
            reading.new_stock.clone(),
            reading.monthly_sale.clone(),
            reading.today_total_display(),
        ]);
    }
    if table.rows.is_empty() {
        io::print_info(format!("No {} readings recorded.", kind));
        return Ok(());
    }
    table.render();
    Ok(())
}

fn parse_kind(value: &str) -> Result<FuelKind, CommandError> {
    FuelKind::parse(value).ok_or_else(|| {
        CommandError::InvalidArguments(format!("fuel type must be gas or diesel, got `{}`", value))
    })
}

fn parse_month(value: &str) -> Result<u32, CommandError> {
    value
        .parse::<u32>()
        .ok()
        .filter(|month| (1..=12).contains(month))
        .ok_or_else(|| CommandError::InvalidArguments(format!("`{}` is not a month (1-12)", value)))
}

fn build_patch(args: &[&str]) -> Result<FuelReadingPatch, CommandError> {
    let mut patch = FuelReadingPatch::default();
    for (key, value) in parse_assignments(args)? {
        let field = resolve_field(FuelDayReading::FIELDS.iter().copied(), key).ok_or_else(|| {
            CommandError::InvalidArguments(format!(
                "unknown fuel field `{}`. Known fields: {}",
                key,
                FuelDayReading::FIELDS.join(", ")
            ))
        })?;
        patch.set(field, value);
    }
    if patch.is_empty() {
        return Err(CommandError::InvalidArguments(
            "expected at least one field=value".into(),
        ));
    }
    Ok(patch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_resolves_field_names() {
        let patch = build_patch(&["openingstock=500", "todaySale=120"]).unwrap();
        assert_eq!(patch.opening_stock.as_deref(), Some("500"));
        assert_eq!(patch.today_sale.as_deref(), Some("120"));
        assert!(build_patch(&["price=3"]).is_err());
        assert!(build_patch(&[]).is_err());
    }

    #[test]
    fn months_are_bounded() {
        assert_eq!(parse_month("12").unwrap(), 12);
        assert!(parse_month("13").is_err());
        assert!(parse_month("0").is_err());
    }
}
