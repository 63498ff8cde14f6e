//! Daily gas and diesel stock readings keyed by calendar month and day.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::amount::{format_fixed2, parse_amount};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FuelKind {
    Gas,
    Diesel,
}

impl FuelKind {
    pub const ALL: [FuelKind; 2] = [FuelKind::Gas, FuelKind::Diesel];

    pub fn as_str(self) -> &'static str {
        match self {
            FuelKind::Gas => "gas",
            FuelKind::Diesel => "diesel",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "gas" => Some(FuelKind::Gas),
            "diesel" => Some(FuelKind::Diesel),
            _ => None,
        }
    }
}

impl fmt::Display for FuelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

text_record! {
    /// Stock figures for one fuel kind on one day, as entered.
    pub struct FuelDayReading {
        inventory_stock => "inventoryStock",
        opening_stock => "openingStock",
        today_sale => "todaySale",
        new_stock => "newStock",
        monthly_sale => "monthlySale",
    }
}

impl FuelDayReading {
    /// Display-only stock position: opening minus today's sale plus new stock.
    pub fn today_total(&self) -> f64 {
        parse_amount(&self.opening_stock) - parse_amount(&self.today_sale)
            + parse_amount(&self.new_stock)
    }

    pub fn today_total_display(&self) -> String {
        format_fixed2(self.today_total())
    }

    fn merge(&mut self, patch: FuelReadingPatch) {
        let FuelReadingPatch {
            inventory_stock,
            opening_stock,
            today_sale,
            new_stock,
            monthly_sale,
        } = patch;
        let updates = [
            (&mut self.inventory_stock, inventory_stock),
            (&mut self.opening_stock, opening_stock),
            (&mut self.today_sale, today_sale),
            (&mut self.new_stock, new_stock),
            (&mut self.monthly_sale, monthly_sale),
        ];
        for (slot, value) in updates {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}

/// Partial update for a [`FuelDayReading`]; `None` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FuelReadingPatch {
    pub inventory_stock: Option<String>,
    pub opening_stock: Option<String>,
    pub today_sale: Option<String>,
    pub new_stock: Option<String>,
    pub monthly_sale: Option<String>,
}

impl FuelReadingPatch {
    /// Sets a field by its wire name (`openingStock`, ...). Returns `false` for unknown names.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> bool {
        let slot = match key {
            "inventoryStock" => &mut self.inventory_stock,
            "openingStock" => &mut self.opening_stock,
            "todaySale" => &mut self.today_sale,
            "newStock" => &mut self.new_stock,
            "monthlySale" => &mut self.monthly_sale,
            _ => return false,
        };
        *slot = Some(value.into());
        true
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

type DayReadings = BTreeMap<u32, FuelDayReading>;
type MonthReadings = BTreeMap<u32, DayReadings>;

/// Fuel readings for one calendar year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuelLedger {
    year: i32,
    #[serde(default)]
    gas: MonthReadings,
    #[serde(default)]
    diesel: MonthReadings,
}

impl Default for FuelLedger {
    fn default() -> Self {
        Self::for_year(Local::now().year())
    }
}

impl FuelLedger {
    pub fn for_year(year: i32) -> Self {
        Self {
            year,
            gas: MonthReadings::new(),
            diesel: MonthReadings::new(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Merges `patch` into the reading for `kind` on `month`/`day`.
    ///
    /// Returns the merged reading, or `None` when the date is not on the
    /// ledger's calendar (nothing is stored in that case).
    pub fn record(
        &mut self,
        kind: FuelKind,
        month: u32,
        day: u32,
        patch: FuelReadingPatch,
    ) -> Option<&FuelDayReading> {
        if !self.is_valid_day(month, day) {
            return None;
        }
        let reading = self
            .months_mut(kind)
            .entry(month)
            .or_default()
            .entry(day)
            .or_default();
        reading.merge(patch);
        Some(reading)
    }

    pub fn reading(&self, kind: FuelKind, month: u32, day: u32) -> Option<&FuelDayReading> {
        self.months(kind).get(&month)?.get(&day)
    }

    /// Readings for one month, ordered by day.
    pub fn month(&self, kind: FuelKind, month: u32) -> impl Iterator<Item = (u32, &FuelDayReading)> {
        self.months(kind)
            .get(&month)
            .into_iter()
            .flat_map(|days| days.iter().map(|(day, reading)| (*day, reading)))
    }

    /// Every reading for `kind`, ordered by month then day.
    pub fn readings(&self, kind: FuelKind) -> impl Iterator<Item = (u32, u32, &FuelDayReading)> {
        self.months(kind).iter().flat_map(|(month, days)| {
            days.iter()
                .map(move |(day, reading)| (*month, *day, reading))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.gas.is_empty() && self.diesel.is_empty()
    }

    pub fn days_in_month(&self, month: u32) -> Option<u32> {
        days_in_month(self.year, month)
    }

    fn is_valid_day(&self, month: u32, day: u32) -> bool {
        self.days_in_month(month)
            .is_some_and(|last| (1..=last).contains(&day))
    }

    fn months(&self, kind: FuelKind) -> &MonthReadings {
        match kind {
            FuelKind::Gas => &self.gas,
            FuelKind::Diesel => &self.diesel,
        }
    }

    fn months_mut(&mut self, kind: FuelKind) -> &mut MonthReadings {
        match kind {
            FuelKind::Gas => &mut self.gas,
            FuelKind::Diesel => &mut self.diesel,
        }
    }
}

/// Number of days in `month` (1-12) of `year`.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    u32::try_from(next.signed_duration_since(first).num_days()).ok()
}

/// English month name for `month` (1-12).
pub fn month_name(month: u32) -> Option<&'static str> {
    const NAMES: [&str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];
    let index = usize::try_from(month.checked_sub(1)?).ok()?;
    NAMES.get(index).copied()
}
