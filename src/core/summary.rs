use crate::core::session::ReconciliationSession;
use crate::ledger::{CategoryTotal, FuelKind};

/// Headline figures for the shift, computed fresh from the live forms.
#[derive(Debug, Clone, PartialEq)]
pub struct ShiftSummary {
    pub lottery_subtotal: f64,
    pub ticket_count: usize,
    pub gas_days: usize,
    pub diesel_days: usize,
    pub sales_management_total: f64,
    pub money_management_total: f64,
    pub category_totals: Vec<CategoryTotal>,
    pub cash_balance: String,
    pub check_balance: String,
}

pub struct SummaryService;

impl SummaryService {
    pub fn shift_summary(session: &ReconciliationSession) -> ShiftSummary {
        let fuel = session.fuel_ledger();
        ShiftSummary {
            lottery_subtotal: session.lottery_subtotal(),
            ticket_count: session.lottery_ledger().ticket_count(),
            gas_days: fuel.readings(FuelKind::Gas).count(),
            diesel_days: fuel.readings(FuelKind::Diesel).count(),
            sales_management_total: session.sales_management_total(),
            money_management_total: session.money_management_total(),
            category_totals: session.category_totals(),
            cash_balance: session.in_hand().cash.balance_display(),
            check_balance: session.in_hand().check.balance_display(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::FuelReadingPatch;

    #[test]
    fn summary_reflects_live_state() {
        let mut session = ReconciliationSession::for_year("Summary", 2024);
        session.record_ticket_reading("$2", "1510", "100", "130");
        let mut patch = FuelReadingPatch::default();
        patch.set("openingStock", "900");
        session.record_fuel_reading(FuelKind::Diesel, 6, 30, patch);
        session.update_money_management_field("cash", "80");
        session.update_cash_field("cashOnHand", "80");

        let summary = SummaryService::shift_summary(&session);
        assert_eq!(summary.lottery_subtotal, 240.0);
        assert_eq!(summary.ticket_count, 1);
        assert_eq!((summary.gas_days, summary.diesel_days), (0, 1));
        assert_eq!(summary.sales_management_total, 240.0);
        assert_eq!(summary.money_management_total, 80.0);
        assert_eq!(summary.cash_balance, "80.00");
        assert_eq!(summary.category_totals.len(), 7);
    }
}
