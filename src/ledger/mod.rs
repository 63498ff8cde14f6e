//! Shift domain records, derived totals, and lenient numeric helpers.

#[macro_use]
mod record;

pub mod amount;
pub mod fields;
pub mod fuel;
pub mod in_hand;
pub mod lottery;
pub mod money;
pub mod sales;
pub mod snapshot;

pub use amount::{format_fixed2, parse_amount, parse_counter};
pub use fields::{form_label, spaced_label, FieldMap, OrderedMap};
pub use fuel::{FuelDayReading, FuelKind, FuelLedger, FuelReadingPatch};
pub use in_hand::{CashCount, CheckCount, InHandKind, InHandReconciliation};
pub use lottery::{
    compute_units_sold, BookRule, LotteryLedger, TicketBook, TicketCatalog, TicketEntry,
};
pub use money::MoneyManagementRecord;
pub use sales::{
    derive_sales_totals, CategoryTotal, SalesCategory, SalesManagementFields,
    SalesManagementRecord, SalesTotalsRecord,
};
pub use snapshot::{AggregateSnapshot, InHandSlice, SalesTotalsSlice, Section, SectionPayload};
