use super::amount::sum_amounts;

text_record! {
    /// Money management form: where the shift's money came from and went.
    pub struct MoneyManagementRecord {
        credit_debit => "creditDebit",
        store_credit => "storeCredit",
        grocery_purchase_sales => "groceryPurchaseSales",
        lottery_paid_out => "lotteryPaidOut",
        lotto_paid_out => "lottoPaidOut",
        cash_in_register => "cashInRegister",
        cash => "cash",
        check => "check",
        ebt => "ebt",
        cash_to_atm => "cashToATM",
    }
}

impl MoneyManagementRecord {
    pub fn total(&self) -> f64 {
        sum_amounts(self.entries().map(|(_, value)| value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_sums_every_field() {
        let mut record = MoneyManagementRecord::default();
        record.set("cash", "100");
        record.set("cashToATM", "20.25");
        record.set("ebt", "n/a");
        assert_eq!(record.total(), 120.25);
    }

    #[test]
    fn clear_blanks_fields() {
        let mut record = MoneyManagementRecord::default();
        record.set("check", "9");
        record.clear();
        assert!(record.entries().all(|(_, value)| value.is_empty()));
        assert_eq!(MoneyManagementRecord::FIELDS.len(), 10);
    }
}
