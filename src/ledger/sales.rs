//! Sales management and sales totals records, and the per-category totals
//! derived from them.

use serde::{Deserialize, Serialize};

use super::amount::{parse_amount, sum_amounts};
use super::fields::{FieldMap, OrderedMap};

text_record! {
    /// Base fields of the sales management form.
    pub struct SalesManagementFields {
        gas_sales => "gasSales",
        tax_grocery_sales => "taxGrocerySales",
        non_tax_grocery_sales => "nonTaxGrocerySales",
        deli_sales => "deliSales",
        lotto_sales => "lottoSales",
        sales_tax_sales => "salesTaxSales",
        grocery_purchase_sales => "groceryPurchaseSales",
        paid_in => "paidIn",
        cash_in => "cashIn",
    }
}

/// Sales management form: the fixed base fields plus operator-added fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesManagementRecord {
    #[serde(default)]
    pub base: SalesManagementFields,
    #[serde(default)]
    pub extra: FieldMap,
}

impl SalesManagementRecord {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.base.get(key).or_else(|| self.extra.value(key))
    }

    /// Sets a base field or a previously added extra field.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> bool {
        let value = value.into();
        if self.base.set(key, value.clone()) {
            return true;
        }
        match self.extra.get_mut(key) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Adds a blank custom field and returns its key.
    ///
    /// The key is `name` with its first letter lowercased. Blank names and
    /// names that match an existing field ignoring case are ignored.
    pub fn add_extra_field(&mut self, name: &str) -> Option<String> {
        let key = custom_field_key(name)?;
        if self.keys().any(|existing| existing.eq_ignore_ascii_case(&key)) {
            return None;
        }
        self.extra.insert(key.clone(), String::new());
        Some(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        SalesManagementFields::FIELDS
            .iter()
            .copied()
            .chain(self.extra.keys())
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.base
            .entries()
            .map(|(key, value)| (key as &str, value))
            .chain(self.extra.iter().map(|(key, value)| (key, value.as_str())))
    }

    pub fn to_field_map(&self) -> FieldMap {
        self.entries()
            .map(|(key, value)| (key, value.to_string()))
            .collect()
    }

    /// Sum of every field, base and extra, plus the lottery subtotal.
    pub fn total(&self, lottery_subtotal: f64) -> f64 {
        sum_amounts(self.entries().map(|(_, value)| value)) + lottery_subtotal
    }
}

fn custom_field_key(name: &str) -> Option<String> {
    let name = name.trim();
    let mut chars = name.chars();
    let first = chars.next()?;
    Some(first.to_lowercase().chain(chars).collect())
}

text_record! {
    /// Sales totals form inputs, one per category.
    pub struct SalesTotalsRecord {
        gas => "gas",
        lotto => "lotto",
        tax_grocery => "taxGrocery",
        nontax_grocery => "nontaxGrocery",
        deli => "deli",
        sales_tax => "salesTax",
        grocery_purchase => "groceryPurchase",
    }
}

/// The seven reporting categories that pair a sales-totals input with a
/// sales-management field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SalesCategory {
    Gas,
    Lotto,
    TaxGrocery,
    NontaxGrocery,
    Deli,
    SalesTax,
    GroceryPurchase,
}

impl SalesCategory {
    pub const ALL: [SalesCategory; 7] = [
        SalesCategory::Gas,
        SalesCategory::Lotto,
        SalesCategory::TaxGrocery,
        SalesCategory::NontaxGrocery,
        SalesCategory::Deli,
        SalesCategory::SalesTax,
        SalesCategory::GroceryPurchase,
    ];

    pub fn input_field(self) -> &'static str {
        match self {
            SalesCategory::Gas => "gas",
            SalesCategory::Lotto => "lotto",
            SalesCategory::TaxGrocery => "taxGrocery",
            SalesCategory::NontaxGrocery => "nontaxGrocery",
            SalesCategory::Deli => "deli",
            SalesCategory::SalesTax => "salesTax",
            SalesCategory::GroceryPurchase => "groceryPurchase",
        }
    }

    pub fn management_field(self) -> &'static str {
        match self {
            SalesCategory::Gas => "gasSales",
            SalesCategory::Lotto => "lottoSales",
            SalesCategory::TaxGrocery => "taxGrocerySales",
            SalesCategory::NontaxGrocery => "nonTaxGrocerySales",
            SalesCategory::Deli => "deliSales",
            SalesCategory::SalesTax => "salesTaxSales",
            SalesCategory::GroceryPurchase => "groceryPurchaseSales",
        }
    }

    pub fn total_key(self) -> &'static str {
        match self {
            SalesCategory::Gas => "gasTotal",
            SalesCategory::Lotto => "lottoTotal",
            SalesCategory::TaxGrocery => "taxGroceryTotal",
            SalesCategory::NontaxGrocery => "nontaxGroceryTotal",
            SalesCategory::Deli => "deliTotal",
            SalesCategory::SalesTax => "salesTaxTotal",
            SalesCategory::GroceryPurchase => "groceryPurchaseTotal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryTotal {
    pub category: SalesCategory,
    pub value: f64,
}

/// Derives every category total from the current forms.
///
/// Each total is the sales-totals input plus the matching sales-management
/// field; the lotto total also includes the lottery subtotal.
pub fn derive_sales_totals(
    totals: &SalesTotalsRecord,
    management: &SalesManagementRecord,
    lottery_subtotal: f64,
) -> Vec<CategoryTotal> {
    SalesCategory::ALL
        .iter()
        .map(|&category| {
            let input = totals.get(category.input_field()).unwrap_or_default();
            let managed = management
                .get(category.management_field())
                .unwrap_or_default();
            let mut value = parse_amount(input) + parse_amount(managed);
            if category == SalesCategory::Lotto {
                value += lottery_subtotal;
            }
            CategoryTotal { category, value }
        })
        .collect()
}

/// Category totals keyed by total name, in category order.
pub fn totals_by_key(totals: &[CategoryTotal]) -> OrderedMap<f64> {
    totals
        .iter()
        .map(|total| (total.category.total_key(), total.value))
        .collect()
}
