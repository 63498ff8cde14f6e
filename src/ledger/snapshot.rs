//! The submitted copy of each form, which is what the view and the export read.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::fields::{FieldMap, OrderedMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    SalesManagement,
    SalesTotals,
    MoneyManagement,
    InHand,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::SalesManagement,
        Section::SalesTotals,
        Section::MoneyManagement,
        Section::InHand,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Section::SalesManagement => "sales",
            Section::SalesTotals => "totals",
            Section::MoneyManagement => "money",
            Section::InHand => "inhand",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        let needle = input.trim().to_ascii_lowercase();
        Section::ALL.into_iter().find(|section| section.as_str() == needle)
    }

    pub fn title(self) -> &'static str {
        match self {
            Section::SalesManagement => "Sales Management",
            Section::SalesTotals => "Sales Totals",
            Section::MoneyManagement => "Money Management",
            Section::InHand => "In Hand Calculations",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesTotalsSlice {
    #[serde(default)]
    pub fields: FieldMap,
    #[serde(default)]
    pub totals: OrderedMap<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InHandSlice {
    #[serde(default)]
    pub cash: FieldMap,
    #[serde(default)]
    pub check: FieldMap,
}

/// A whole-section replacement for the snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionPayload {
    SalesManagement(FieldMap),
    SalesTotals(SalesTotalsSlice),
    MoneyManagement(FieldMap),
    InHand(InHandSlice),
}

impl SectionPayload {
    pub fn section(&self) -> Section {
        match self {
            SectionPayload::SalesManagement(_) => Section::SalesManagement,
            SectionPayload::SalesTotals(_) => Section::SalesTotals,
            SectionPayload::MoneyManagement(_) => Section::MoneyManagement,
            SectionPayload::InHand(_) => Section::InHand,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateSnapshot {
    #[serde(default)]
    pub sales_management: FieldMap,
    #[serde(default)]
    pub sales_totals: SalesTotalsSlice,
    #[serde(default)]
    pub money_management: FieldMap,
    #[serde(default)]
    pub in_hand: InHandSlice,
}

impl AggregateSnapshot {
    /// Replaces the slice named by `payload`; fields absent from it are gone.
    pub fn apply(&mut self, payload: SectionPayload) {
        match payload {
            SectionPayload::SalesManagement(fields) => self.sales_management = fields,
            SectionPayload::SalesTotals(slice) => self.sales_totals = slice,
            SectionPayload::MoneyManagement(fields) => self.money_management = fields,
            SectionPayload::InHand(slice) => self.in_hand = slice,
        }
    }

    pub fn is_submitted(&self, section: Section) -> bool {
        match section {
            Section::SalesManagement => !self.sales_management.is_empty(),
            Section::SalesTotals => {
                !self.sales_totals.fields.is_empty() || !self.sales_totals.totals.is_empty()
            }
            Section::MoneyManagement => !self.money_management.is_empty(),
            Section::InHand => !self.in_hand.cash.is_empty() || !self.in_hand.check.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> FieldMap {
        pairs
            .iter()
            .map(|(key, value)| (*key, value.to_string()))
            .collect()
    }

    #[test]
    fn apply_replaces_the_whole_slice() {
        let mut snapshot = AggregateSnapshot::default();
        snapshot.apply(SectionPayload::MoneyManagement(fields(&[
            ("cash", "10"),
            ("ebt", "4"),
        ])));
        snapshot.apply(SectionPayload::MoneyManagement(fields(&[("cash", "12")])));

        assert_eq!(snapshot.money_management.value("cash"), Some("12"));
        assert!(!snapshot.money_management.contains_key("ebt"));
        assert!(!snapshot.is_submitted(Section::SalesManagement));
        assert!(snapshot.is_submitted(Section::MoneyManagement));
    }

    #[test]
    fn section_names_parse_back() {
        for section in Section::ALL {
            assert_eq!(Section::parse(section.as_str()), Some(section));
        }
        assert_eq!(Section::parse("InHand"), Some(Section::InHand));
        assert_eq!(Section::parse("fuel"), None);
    }

    #[test]
    fn payload_names_its_section() {
        let payload = SectionPayload::InHand(InHandSlice::default());
        assert_eq!(payload.section(), Section::InHand);
    }
}
