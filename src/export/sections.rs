//! Row layout of each exported section.

use crate::core::session::ReconciliationSession;
use crate::ledger::{spaced_label, FieldMap, FuelKind};

/// One titled block of the export: title line, header row, data rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvSection {
    pub title: &'static str,
    pub header: &'static [&'static str],
    pub rows: Vec<Vec<String>>,
}

const LOTTERY_HEADER: &[&str] = &["Amount", "Ticket", "Open", "Close", "Total Sold", "Total"];
const FUEL_HEADER: &[&str] = &[
    "Fuel Type",
    "Month",
    "Day",
    "Inventory Stock",
    "Opening Stock",
    "Today's Sale",
    "New Stock",
    "Monthly Sale",
];
const FIELD_HEADER: &[&str] = &["Field", "Value"];
const IN_HAND_HEADER: &[&str] = &["Type", "Field", "Value"];

/// Every section in export order. Lottery and fuel come from the live
/// ledgers; the rest come from the submitted snapshot.
pub fn build_sections(session: &ReconciliationSession) -> Vec<CsvSection> {
    vec![
        lottery_section(session),
        fuel_section(session),
        CsvSection {
            title: "Sales Management Data",
            header: FIELD_HEADER,
            rows: field_rows(&session.snapshot().sales_management),
        },
        sales_totals_section(session),
        CsvSection {
            title: "Money Management Data",
            header: FIELD_HEADER,
            rows: field_rows(&session.snapshot().money_management),
        },
        in_hand_section(session),
    ]
}

fn lottery_section(session: &ReconciliationSession) -> CsvSection {
    let rows = session
        .lottery_ledger()
        .books()
        .flat_map(|(denomination, book)| {
            book.tickets().map(move |(serial, entry)| {
                vec![
                    denomination.to_string(),
                    serial.to_string(),
                    entry.opening.clone(),
                    entry.closing.clone(),
                    entry.units_sold.to_string(),
                    entry.amount_due.to_string(),
                ]
            })
        })
        .collect();
    CsvSection {
        title: "Lottery Management Data",
        header: LOTTERY_HEADER,
        rows,
    }
}

fn fuel_section(session: &ReconciliationSession) -> CsvSection {
    let fuel = session.fuel_ledger();
    let rows = FuelKind::ALL
        .into_iter()
        .flat_map(move |kind| {
            fuel.readings(kind).map(move |(month, day, reading)| {
                let mut row = vec![kind.as_str().to_string(), month.to_string(), day.to_string()];
                row.extend(reading.entries().map(|(_, value)| value.to_string()));
                row
            })
        })
        .collect();
    CsvSection {
        title: "Gas and Diesel Data",
        header: FUEL_HEADER,
        rows,
    }
}

fn sales_totals_section(session: &ReconciliationSession) -> CsvSection {
    let slice = &session.snapshot().sales_totals;
    let mut rows = field_rows(&slice.fields);
    rows.extend(slice.totals.iter().map(|(key, value)| {
        vec![format!("Total {}", spaced_label(key)), value.to_string()]
    }));
    CsvSection {
        title: "Sales Totals Data",
        header: FIELD_HEADER,
        rows,
    }
}

fn in_hand_section(session: &ReconciliationSession) -> CsvSection {
    let slice = &session.snapshot().in_hand;
    let tagged = |kind: &str, fields: &FieldMap| -> Vec<Vec<String>> {
        fields
            .iter()
            .map(|(key, value)| vec![kind.to_string(), spaced_label(key), value.clone()])
            .collect()
    };
    let mut rows = tagged("Cash", &slice.cash);
    rows.extend(tagged("Check", &slice.check));
    CsvSection {
        title: "In Hand Calculations Data",
        header: IN_HAND_HEADER,
        rows,
    }
}

fn field_rows(fields: &FieldMap) -> Vec<Vec<String>> {
    fields
        .iter()
        .map(|(key, value)| vec![spaced_label(key), value.clone()])
        .collect()
}
