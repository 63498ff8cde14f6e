//! Lottery ticket books, roll-over arithmetic, and the shift ticket catalog.

use serde::{Deserialize, Serialize};

use super::amount::parse_counter;
use super::fields::OrderedMap;

/// Counter arithmetic selected by a denomination label.
///
/// Ticket counters run from a fixed book size back toward the number sold and
/// may wrap past zero when a new book is opened mid-shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookRule {
    /// `$2` books: 150 tickets, counted down from the far end of a 300 range.
    TwoDollar,
    /// `$3`, `$5`, and `$10` books of 60 tickets.
    Sixty,
    /// `$20`, `$30`, and `$50` books of 30 tickets.
    Thirty,
    /// Every other label, including `$1`: 300 tickets.
    Standard,
}

impl BookRule {
    pub fn for_denomination(label: &str) -> Self {
        match label {
            "$2" => BookRule::TwoDollar,
            "$3" | "$5" | "$10" => BookRule::Sixty,
            "$20" | "$30" | "$50" => BookRule::Thirty,
            _ => BookRule::Standard,
        }
    }

    pub fn book_size(self) -> i64 {
        match self {
            BookRule::TwoDollar => 150,
            BookRule::Sixty => 60,
            BookRule::Thirty => 30,
            BookRule::Standard => 300,
        }
    }

    /// Units sold between two counter readings. Inputs are not range checked;
    /// results beyond `i64` saturate.
    pub fn units_sold(self, opening: i64, closing: i64) -> i64 {
        let size = i128::from(self.book_size());
        let (open, close) = (i128::from(opening), i128::from(closing));
        let units = match self {
            BookRule::TwoDollar => {
                if close >= open {
                    size - (close - open)
                } else {
                    size - (300 - open + close)
                }
            }
            BookRule::Sixty | BookRule::Thirty => {
                if close >= open {
                    close - open
                } else {
                    size - (open - close)
                }
            }
            BookRule::Standard => {
                if close >= open {
                    close - open
                } else {
                    size - open + close
                }
            }
        };
        i64::try_from(units).unwrap_or(if units < 0 { i64::MIN } else { i64::MAX })
    }
}

pub fn compute_units_sold(denomination: &str, opening: i64, closing: i64) -> i64 {
    BookRule::for_denomination(denomination).units_sold(opening, closing)
}

/// Face value encoded in a label (`$5` is 5). Labels without a number are worth 0.
pub fn denomination_value(label: &str) -> i64 {
    parse_counter(&label.replace('$', "")).unwrap_or(0)
}

pub fn amount_due(denomination: &str, units_sold: i64) -> f64 {
    (units_sold.saturating_mul(denomination_value(denomination))).unsigned_abs() as f64
}

/// One recorded ticket reading. `opening` and `closing` keep the operator's text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketEntry {
    pub opening: String,
    pub closing: String,
    pub units_sold: i64,
    pub amount_due: f64,
}

impl TicketEntry {
    pub fn compute(denomination: &str, opening: &str, closing: &str) -> Self {
        let open = parse_counter(opening).unwrap_or(0);
        let close = parse_counter(closing).unwrap_or(0);
        let units_sold = compute_units_sold(denomination, open, close);
        Self {
            opening: opening.to_string(),
            closing: closing.to_string(),
            units_sold,
            amount_due: amount_due(denomination, units_sold),
        }
    }
}

/// All readings recorded for one denomination.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredTicketBook")]
pub struct TicketBook {
    tickets: OrderedMap<TicketEntry>,
    abs_total: f64,
}

#[derive(Deserialize)]
struct StoredTicketBook {
    #[serde(default)]
    tickets: OrderedMap<TicketEntry>,
}

impl From<StoredTicketBook> for TicketBook {
    fn from(stored: StoredTicketBook) -> Self {
        let mut book = TicketBook {
            tickets: stored.tickets,
            abs_total: 0.0,
        };
        book.recompute_total();
        book
    }
}

impl TicketBook {
    /// Inserts or replaces the reading for `serial` and re-sums the book.
    pub fn record(&mut self, serial: &str, entry: TicketEntry) {
        self.tickets.insert(serial, entry);
        self.recompute_total();
    }

    /// Sum of `amount_due` across every ticket, refreshed on each write.
    pub fn abs_total(&self) -> f64 {
        self.abs_total
    }

    pub fn ticket(&self, serial: &str) -> Option<&TicketEntry> {
        self.tickets.get(serial)
    }

    pub fn tickets(&self) -> impl Iterator<Item = (&str, &TicketEntry)> {
        self.tickets.iter()
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    fn recompute_total(&mut self) {
        self.abs_total = self.tickets.values().map(|entry| entry.amount_due).sum();
    }
}

/// Ticket books keyed by denomination label, in the order first recorded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LotteryLedger {
    books: OrderedMap<TicketBook>,
}

impl LotteryLedger {
    /// Records a reading and returns the stored entry.
    ///
    /// A blank denomination, serial, opening, or closing value makes this a
    /// no-op that returns `None`.
    pub fn record_reading(
        &mut self,
        denomination: &str,
        serial: &str,
        opening: &str,
        closing: &str,
    ) -> Option<&TicketEntry> {
        let denomination = denomination.trim();
        let serial = serial.trim();
        let opening = opening.trim();
        let closing = closing.trim();
        if denomination.is_empty() || serial.is_empty() || opening.is_empty() || closing.is_empty()
        {
            return None;
        }

        let entry = TicketEntry::compute(denomination, opening, closing);
        let book = self
            .books
            .entry_or_insert_with(denomination, TicketBook::default);
        book.record(serial, entry);
        book.ticket(serial)
    }

    pub fn book(&self, denomination: &str) -> Option<&TicketBook> {
        self.books.get(denomination)
    }

    pub fn books(&self) -> impl Iterator<Item = (&str, &TicketBook)> {
        self.books.iter()
    }

    /// Sum of every book's `abs_total`; zero for an empty ledger.
    pub fn subtotal(&self) -> f64 {
        self.books.values().map(TicketBook::abs_total).sum()
    }

    pub fn ticket_count(&self) -> usize {
        self.books.values().map(TicketBook::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

/// Known ticket serials per denomination, used to pick tickets during a shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketCatalog {
    serials: OrderedMap<Vec<String>>,
}

impl Default for TicketCatalog {
    fn default() -> Self {
        let seeds: [(&str, &[&str]); 8] = [
            ("$1", &["1544", "7026", "1536"]),
            (
                "$2",
                &["1510", "1541", "7027", "1594", "1537", "1530", "1533", "1545"],
            ),
            ("$3", &["1531", "1516", "1497"]),
            (
                "$5",
                &[
                    "7023", "5054", "1514", "1499", "1511", "1521", "1522", "7020", "5052", "1524",
                    "1527", "1534", "1538", "1542", "1546",
                ],
            ),
            (
                "$10",
                &[
                    "1547", "7025", "1528", "5053", "1508", "5028", "1454", "1512", "5049", "1535",
                ],
            ),
            ("$20", &["1543", "1501", "1513", "1457", "1539"]),
            ("$30", &["5048"]),
            ("$50", &["1529"]),
        ];
        let mut catalog = TicketCatalog::empty();
        for (denomination, serials) in seeds {
            catalog.register_denomination(denomination);
            for serial in serials {
                catalog.add_ticket(denomination, serial);
            }
        }
        catalog
    }
}

impl TicketCatalog {
    pub fn empty() -> Self {
        Self {
            serials: OrderedMap::new(),
        }
    }

    pub fn denominations(&self) -> impl Iterator<Item = &str> {
        self.serials.keys()
    }

    pub fn tickets(&self, denomination: &str) -> &[String] {
        self.serials
            .get(denomination)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, denomination: &str, serial: &str) -> bool {
        self.tickets(denomination).iter().any(|known| known == serial)
    }

    /// Adds a new denomination label. Blank or already known labels are ignored.
    pub fn register_denomination(&mut self, label: &str) -> bool {
        let label = label.trim();
        if label.is_empty() || self.serials.contains_key(label) {
            return false;
        }
        self.serials.insert(label, Vec::new());
        true
    }

    /// Appends a serial to a known denomination. Duplicates, blanks, and
    /// unknown denominations are ignored.
    pub fn add_ticket(&mut self, denomination: &str, serial: &str) -> bool {
        let serial = serial.trim();
        if serial.is_empty() {
            return false;
        }
        match self.serials.get_mut(denomination.trim()) {
            Some(list) if !list.iter().any(|known| known == serial) => {
                list.push(serial.to_string());
                true
            }
            _ => false,
        }
    }
}
