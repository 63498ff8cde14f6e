//! Cash and check counts for the end-of-shift in-hand reconciliation.

use serde::{Deserialize, Serialize};

use super::amount::{format_fixed2, parse_amount};
use super::fields::FieldMap;

text_record! {
    pub struct CashCount {
        cash_on_hand => "cashOnHand",
        cash_to_bank => "cashToBank",
        cash_from_store => "cashFromStore",
        extra_cash => "extraCash",
    }
}

impl CashCount {
    pub const BALANCE_KEY: &'static str = "cashBalance";

    /// On hand plus from store, less what went to the bank and the extra cash.
    pub fn balance(&self) -> f64 {
        parse_amount(&self.cash_on_hand) + parse_amount(&self.cash_from_store)
            - parse_amount(&self.cash_to_bank)
            - parse_amount(&self.extra_cash)
    }

    pub fn balance_display(&self) -> String {
        format_fixed2(self.balance())
    }
}

text_record! {
    pub struct CheckCount {
        check_on_hand => "checkOnHand",
        check_to_bank => "checkToBank",
        check_from_store => "checkFromStore",
        instant_book => "instantBook",
    }
}

impl CheckCount {
    pub const BALANCE_KEY: &'static str = "checkBalance";

    /// On hand plus from store, less what went to the bank. `instantBook` is
    /// recorded but does not take part.
    pub fn balance(&self) -> f64 {
        parse_amount(&self.check_on_hand) + parse_amount(&self.check_from_store)
            - parse_amount(&self.check_to_bank)
    }

    pub fn balance_display(&self) -> String {
        format_fixed2(self.balance())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InHandKind {
    Cash,
    Check,
}

impl InHandKind {
    pub fn as_str(self) -> &'static str {
        match self {
            InHandKind::Cash => "cash",
            InHandKind::Check => "check",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "cash" => Some(InHandKind::Cash),
            "check" => Some(InHandKind::Check),
            _ => None,
        }
    }

    pub fn fields(self) -> &'static [&'static str] {
        match self {
            InHandKind::Cash => CashCount::FIELDS,
            InHandKind::Check => CheckCount::FIELDS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InHandReconciliation {
    #[serde(default)]
    pub cash: CashCount,
    #[serde(default)]
    pub check: CheckCount,
}

impl InHandReconciliation {
    pub fn set(&mut self, kind: InHandKind, key: &str, value: impl Into<String>) -> bool {
        match kind {
            InHandKind::Cash => self.cash.set(key, value),
            InHandKind::Check => self.check.set(key, value),
        }
    }

    pub fn clear(&mut self) {
        self.cash.clear();
        self.check.clear();
    }

    /// Field maps for both counts, each followed by its formatted balance.
    pub fn with_balances(&self) -> (FieldMap, FieldMap) {
        let mut cash = self.cash.to_field_map();
        cash.insert(CashCount::BALANCE_KEY, self.cash.balance_display());
        let mut check = self.check.to_field_map();
        check.insert(CheckCount::BALANCE_KEY, self.check.balance_display());
        (cash, check)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cash_balance_uses_all_four_fields() {
        let cash = CashCount {
            cash_on_hand: "100".into(),
            cash_to_bank: "50".into(),
            cash_from_store: "30".into(),
            extra_cash: "20".into(),
        };
        assert_eq!(cash.balance_display(), "60.00");

        let mut reconciliation = InHandReconciliation::default();
        reconciliation.set(InHandKind::Cash, "cashOnHand", "100");
        reconciliation.set(InHandKind::Cash, "cashFromStore", "50");
        reconciliation.set(InHandKind::Cash, "cashToBank", "30");
        reconciliation.set(InHandKind::Cash, "extraCash", "20");
        assert_eq!(reconciliation.cash.balance_display(), "100.00");
    }

    #[test]
    fn check_balance_ignores_instant_book() {
        let mut reconciliation = InHandReconciliation::default();
        reconciliation.set(InHandKind::Check, "checkOnHand", "40");
        reconciliation.set(InHandKind::Check, "checkToBank", "15.5");
        reconciliation.set(InHandKind::Check, "instantBook", "999");
        assert_eq!(reconciliation.check.balance_display(), "24.50");
    }

    #[test]
    fn blank_inputs_balance_to_zero() {
        assert_eq!(CashCount::default().balance_display(), "0.00");
        assert_eq!(CheckCount::default().balance_display(), "0.00");
    }

    #[test]
    fn balances_follow_the_counts() {
        let mut reconciliation = InHandReconciliation::default();
        reconciliation.set(InHandKind::Cash, "cashOnHand", "5");
        let (cash, check) = reconciliation.with_balances();
        assert_eq!(cash.keys().last(), Some("cashBalance"));
        assert_eq!(cash.value("cashBalance"), Some("5.00"));
        assert_eq!(check.value("checkBalance"), Some("0.00"));
        assert_eq!(check.len(), 5);
    }
}
