//! The reconciliation store: every live form of one shift, plus the
//! submitted snapshot that the view and the export read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::ledger::{
    sales::{derive_sales_totals, totals_by_key},
    AggregateSnapshot, CategoryTotal, FieldMap, FuelDayReading, FuelKind, FuelLedger,
    FuelReadingPatch, InHandKind, InHandReconciliation, InHandSlice, LotteryLedger,
    MoneyManagementRecord, SalesManagementRecord, SalesTotalsRecord, SalesTotalsSlice,
    SectionPayload, TicketCatalog, TicketEntry,
};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

fn default_schema_version() -> u8 {
    CURRENT_SCHEMA_VERSION
}

/// One shift's worth of reconciliation data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationSession {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "default_schema_version")]
    pub schema_version: u8,
    #[serde(default)]
    lottery: LotteryLedger,
    #[serde(default)]
    catalog: TicketCatalog,
    #[serde(default)]
    fuel: FuelLedger,
    #[serde(default)]
    sales_management: SalesManagementRecord,
    #[serde(default)]
    sales_totals: SalesTotalsRecord,
    #[serde(default)]
    money_management: MoneyManagementRecord,
    #[serde(default)]
    in_hand: InHandReconciliation,
    #[serde(default)]
    snapshot: AggregateSnapshot,
}

impl ReconciliationSession {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_fuel_ledger(name, FuelLedger::default())
    }

    /// A session whose fuel calendar is `year` instead of the current one.
    pub fn for_year(name: impl Into<String>, year: i32) -> Self {
        Self::with_fuel_ledger(name, FuelLedger::for_year(year))
    }

    fn with_fuel_ledger(name: impl Into<String>, fuel: FuelLedger) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
            lottery: LotteryLedger::default(),
            catalog: TicketCatalog::default(),
            fuel,
            sales_management: SalesManagementRecord::default(),
            sales_totals: SalesTotalsRecord::default(),
            money_management: MoneyManagementRecord::default(),
            in_hand: InHandReconciliation::default(),
            snapshot: AggregateSnapshot::default(),
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    // Lottery ----------------------------------------------------------------

    /// Records one ticket reading and returns the stored entry.
    ///
    /// Blank inputs make this a no-op. The owning book's total is re-summed.
    pub fn record_ticket_reading(
        &mut self,
        denomination: &str,
        serial: &str,
        opening: &str,
        closing: &str,
    ) -> Option<&TicketEntry> {
        let recorded = self
            .lottery
            .record_reading(denomination, serial, opening, closing)
            .cloned();
        let Some(entry) = recorded else {
            warn!(denomination, serial, "incomplete ticket reading ignored");
            return None;
        };
        debug!(
            denomination,
            serial,
            units_sold = entry.units_sold,
            amount_due = entry.amount_due,
            "ticket reading recorded"
        );
        self.touch();
        self.lottery
            .book(denomination.trim())
            .and_then(|book| book.ticket(serial.trim()))
    }

    pub fn lottery_ledger(&self) -> &LotteryLedger {
        &self.lottery
    }

    pub fn lottery_subtotal(&self) -> f64 {
        self.lottery.subtotal()
    }

    pub fn ticket_catalog(&self) -> &TicketCatalog {
        &self.catalog
    }

    pub fn add_catalog_ticket(&mut self, denomination: &str, serial: &str) -> bool {
        let added = self.catalog.add_ticket(denomination, serial);
        if added {
            debug!(denomination, serial, "ticket added to catalog");
            self.touch();
        }
        added
    }

    pub fn register_denomination(&mut self, label: &str) -> bool {
        let added = self.catalog.register_denomination(label);
        if added {
            debug!(label, "denomination registered");
            self.touch();
        }
        added
    }

    // Fuel -------------------------------------------------------------------

    /// Merges a partial reading into the given day. Dates off the ledger's
    /// calendar are ignored.
    pub fn record_fuel_reading(
        &mut self,
        kind: FuelKind,
        month: u32,
        day: u32,
        patch: FuelReadingPatch,
    ) -> Option<&FuelDayReading> {
        if self.fuel.record(kind, month, day, patch).is_none() {
            warn!(
                fuel = %kind,
                month,
                day,
                year = self.fuel.year(),
                "fuel reading outside the calendar ignored"
            );
            return None;
        }
        debug!(fuel = %kind, month, day, "fuel reading merged");
        self.touch();
        self.fuel.reading(kind, month, day)
    }

    pub fn fuel_ledger(&self) -> &FuelLedger {
        &self.fuel
    }

    // Sales management -------------------------------------------------------

    pub fn update_sales_management_field(&mut self, key: &str, value: &str) -> bool {
        let updated = self.sales_management.set(key, value);
        self.log_field_update("sales_management", key, updated);
        updated
    }

    pub fn update_sales_management_fields<'a>(
        &mut self,
        fields: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> usize {
        fields
            .into_iter()
            .filter(|(key, value)| self.update_sales_management_field(key, value))
            .count()
    }

    /// Adds a blank custom sales field; returns its key, or `None` for a duplicate.
    pub fn add_sales_management_field(&mut self, name: &str) -> Option<String> {
        let key = self.sales_management.add_extra_field(name);
        match &key {
            Some(key) => {
                debug!(field = %key, "custom sales field added");
                self.touch();
            }
            None => warn!(name, "custom sales field already exists or is blank"),
        }
        key
    }

    pub fn sales_management(&self) -> &SalesManagementRecord {
        &self.sales_management
    }

    /// Every sales management field plus the lottery subtotal.
    pub fn sales_management_total(&self) -> f64 {
        self.sales_management.total(self.lottery_subtotal())
    }

    // Sales totals -----------------------------------------------------------

    pub fn update_sales_totals_field(&mut self, key: &str, value: &str) -> bool {
        let updated = self.sales_totals.set(key, value);
        self.log_field_update("sales_totals", key, updated);
        updated
    }

    pub fn update_sales_totals_fields<'a>(
        &mut self,
        fields: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> usize {
        fields
            .into_iter()
            .filter(|(key, value)| self.update_sales_totals_field(key, value))
            .count()
    }

    pub fn sales_totals(&self) -> &SalesTotalsRecord {
        &self.sales_totals
    }

    /// Category totals derived from the current forms and the lottery subtotal.
    pub fn category_totals(&self) -> Vec<CategoryTotal> {
        derive_sales_totals(
            &self.sales_totals,
            &self.sales_management,
            self.lottery_subtotal(),
        )
    }

    pub fn clear_sales_totals(&mut self) {
        self.sales_totals.clear();
        info!("sales totals cleared");
        self.touch();
    }

    // Money management -------------------------------------------------------

    pub fn update_money_management_field(&mut self, key: &str, value: &str) -> bool {
        let updated = self.money_management.set(key, value);
        self.log_field_update("money_management", key, updated);
        updated
    }

    pub fn update_money_management_fields<'a>(
        &mut self,
        fields: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> usize {
        fields
            .into_iter()
            .filter(|(key, value)| self.update_money_management_field(key, value))
            .count()
    }

    pub fn money_management(&self) -> &MoneyManagementRecord {
        &self.money_management
    }

    pub fn money_management_total(&self) -> f64 {
        self.money_management.total()
    }

    pub fn clear_money_management(&mut self) {
        self.money_management.clear();
        info!("money management cleared");
        self.touch();
    }

    // In hand ----------------------------------------------------------------

    pub fn update_cash_field(&mut self, key: &str, value: &str) -> bool {
        let updated = self.in_hand.set(InHandKind::Cash, key, value);
        self.log_field_update("cash", key, updated);
        updated
    }

    pub fn update_check_field(&mut self, key: &str, value: &str) -> bool {
        let updated = self.in_hand.set(InHandKind::Check, key, value);
        self.log_field_update("check", key, updated);
        updated
    }

    pub fn in_hand(&self) -> &InHandReconciliation {
        &self.in_hand
    }

    /// Blanks both counts and submits the cleared records, without balances.
    pub fn clear_in_hand(&mut self) {
        self.in_hand.clear();
        self.submit_section(SectionPayload::InHand(InHandSlice {
            cash: self.in_hand.cash.to_field_map(),
            check: self.in_hand.check.to_field_map(),
        }));
    }

    // Submission -------------------------------------------------------------

    /// Replaces one snapshot slice wholesale.
    pub fn submit_section(&mut self, payload: SectionPayload) {
        let section = payload.section();
        self.snapshot.apply(payload);
        info!(section = %section, "section submitted");
        self.touch();
    }

    pub fn submit_sales_management(&mut self) {
        let fields = self.sales_management.to_field_map();
        self.submit_section(SectionPayload::SalesManagement(fields));
    }

    /// Submits the sales totals inputs together with the derived category totals.
    pub fn submit_sales_totals(&mut self) {
        let slice = SalesTotalsSlice {
            fields: self.sales_totals.to_field_map(),
            totals: totals_by_key(&self.category_totals()),
        };
        self.submit_section(SectionPayload::SalesTotals(slice));
    }

    pub fn submit_money_management(&mut self) {
        let fields = self.money_management.to_field_map();
        self.submit_section(SectionPayload::MoneyManagement(fields));
    }

    /// Submits both counts, each with its formatted balance.
    pub fn submit_in_hand(&mut self) {
        let (cash, check) = self.in_hand.with_balances();
        self.submit_section(SectionPayload::InHand(InHandSlice { cash, check }));
    }

    pub fn snapshot(&self) -> &AggregateSnapshot {
        &self.snapshot
    }

    fn log_field_update(&mut self, form: &str, key: &str, updated: bool) {
        if updated {
            debug!(form, field = key, "field updated");
            self.touch();
        } else {
            warn!(form, field = key, "unknown field ignored");
        }
    }
}

/// Builds a [`FieldMap`] from borrowed pairs, for callers assembling payloads by hand.
pub fn field_map<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> FieldMap {
    pairs
        .into_iter()
        .map(|(key, value)| (key, value.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Section;

    #[test]
    fn ticket_readings_feed_the_subtotal() {
        let mut session = ReconciliationSession::for_year("Monday", 2024);
        let entry = session
            .record_ticket_reading("$5", "1514", "10", "40")
            .cloned()
            .unwrap();
        assert_eq!(entry.units_sold, 30);
        assert_eq!(entry.amount_due, 150.0);
        session.record_ticket_reading("$20", "1543", "5", "2");
        assert_eq!(session.lottery_subtotal(), 150.0 + 27.0 * 20.0);
    }

    #[test]
    fn blank_ticket_reading_is_a_no_op() {
        let mut session = ReconciliationSession::new("Tuesday");
        assert!(session.record_ticket_reading("$5", "", "1", "2").is_none());
        assert!(session.lottery_ledger().is_empty());
    }

    #[test]
    fn lotto_total_includes_lottery_subtotal() {
        let mut session = ReconciliationSession::new("Wednesday");
        session.record_ticket_reading("$1", "1544", "0", "10");
        session.update_sales_totals_field("lotto", "5");
        session.update_sales_management_field("lottoSales", "2");
        let lotto = session
            .category_totals()
            .into_iter()
            .find(|total| total.category.total_key() == "lottoTotal")
            .unwrap();
        assert_eq!(lotto.value, 17.0);
        assert_eq!(session.sales_management_total(), 12.0);
    }

    #[test]
    fn submit_money_management_replaces_slice() {
        let mut session = ReconciliationSession::new("Thursday");
        session.submit_section(SectionPayload::MoneyManagement(field_map([
            ("cash", "10"),
            ("ebt", "3"),
        ])));
        session.submit_section(SectionPayload::MoneyManagement(field_map([("cash", "11")])));
        let slice = &session.snapshot().money_management;
        assert_eq!(slice.value("cash"), Some("11"));
        assert!(!slice.contains_key("ebt"));
    }

    #[test]
    fn live_edits_stay_out_of_the_snapshot_until_submitted() {
        let mut session = ReconciliationSession::new("Friday");
        session.update_money_management_field("cash", "40");
        assert!(!session.snapshot().is_submitted(Section::MoneyManagement));
        session.submit_money_management();
        assert_eq!(session.snapshot().money_management.value("cash"), Some("40"));
        assert_eq!(session.snapshot().money_management.len(), 10);
    }

    #[test]
    fn submit_sales_totals_carries_derived_totals() {
        let mut session = ReconciliationSession::new("Saturday");
        session.update_sales_totals_field("gas", "100");
        session.update_sales_management_field("gasSales", "25");
        session.submit_sales_totals();
        let slice = &session.snapshot().sales_totals;
        assert_eq!(slice.fields.value("gas"), Some("100"));
        assert_eq!(slice.totals.get("gasTotal"), Some(&125.0));
        assert_eq!(slice.totals.len(), 7);
    }

    #[test]
    fn in_hand_submit_and_clear() {
        let mut session = ReconciliationSession::new("Sunday");
        session.update_cash_field("cashOnHand", "100");
        session.update_check_field("checkOnHand", "20");
        session.submit_in_hand();
        assert_eq!(
            session.snapshot().in_hand.cash.value("cashBalance"),
            Some("100.00")
        );

        session.clear_in_hand();
        let cash = &session.snapshot().in_hand.cash;
        assert_eq!(cash.value("cashOnHand"), Some(""));
        assert!(!cash.contains_key("cashBalance"));
        assert!(!session.snapshot().in_hand.check.contains_key("checkBalance"));
    }

    #[test]
    fn clearing_money_management_leaves_snapshot() {
        let mut session = ReconciliationSession::new("Close");
        session.update_money_management_field("check", "9");
        session.submit_money_management();
        session.clear_money_management();
        assert_eq!(session.money_management().check, "");
        assert_eq!(session.snapshot().money_management.value("check"), Some("9"));
    }

    #[test]
    fn unknown_fields_are_reported() {
        let mut session = ReconciliationSession::new("Open");
        assert!(!session.update_cash_field("checkOnHand", "1"));
        assert_eq!(
            session.update_sales_totals_fields([("gas", "1"), ("diesel", "2")]),
            1
        );
    }

    #[test]
    fn fuel_readings_outside_the_calendar_are_dropped() {
        let mut session = ReconciliationSession::for_year("Fuel", 2023);
        let mut patch = FuelReadingPatch::default();
        patch.set("todaySale", "5");
        assert!(session
            .record_fuel_reading(FuelKind::Gas, 2, 29, patch.clone())
            .is_none());
        assert!(session
            .record_fuel_reading(FuelKind::Gas, 2, 28, patch)
            .is_some());
    }

    #[test]
    fn session_json_roundtrip() {
        let mut session = ReconciliationSession::for_year("Roundtrip", 2024);
        session.record_ticket_reading("$10", "1508", "5", "20");
        session.add_sales_management_field("Propane");
        session.update_sales_management_field("propane", "7");
        session.submit_sales_management();
        let json = serde_json::to_string(&session).unwrap();
        let back: ReconciliationSession = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
    }
}
