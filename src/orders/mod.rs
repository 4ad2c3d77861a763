//! Merchant order extraction from confirmation emails
//!
//! Each supported merchant has its own parser; [`DelegatingOrderParser`]
//! tries them in a fixed order and lets the first one that recognizes the
//! sender handle the record.

mod amazon;
mod steam;

pub use amazon::AmazonOrderParser;
pub use steam::SteamOrderParser;

use crate::types::{Merchant, NormalizedRecord, OrderDetails};
use regex::Regex;
use tracing::{debug, warn};

/// One of the supported confirmation formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderParser {
    Amazon(AmazonOrderParser),
    Steam(SteamOrderParser),
}

impl OrderParser {
    #[must_use]
    pub const fn merchant(&self) -> Merchant {
        match self {
            Self::Amazon(_) => Merchant::Amazon,
            Self::Steam(_) => Merchant::Steam,
        }
    }

    /// Whether the record comes from this merchant's sender address
    #[must_use]
    pub fn can_parse(&self, record: &NormalizedRecord) -> bool {
        match self {
            Self::Amazon(p) => p.can_parse(record),
            Self::Steam(p) => p.can_parse(record),
        }
    }

    /// Attach order details, or return the record untouched when the body
    /// is not a purchase confirmation
    #[must_use]
    pub fn parse(&self, record: NormalizedRecord) -> NormalizedRecord {
        match self {
            Self::Amazon(p) => p.parse(record),
            Self::Steam(p) => p.parse(record),
        }
    }
}

/// Tries parsers in priority order; first match wins
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegatingOrderParser {
    parsers: Vec<OrderParser>,
}

impl DelegatingOrderParser {
    #[must_use]
    pub const fn new(parsers: Vec<OrderParser>) -> Self {
        Self { parsers }
    }

    #[must_use]
    pub fn parsers(&self) -> &[OrderParser] {
        &self.parsers
    }

    /// Hand the record to the first parser that accepts it
    ///
    /// At most one parser runs. With no match the record is returned as is.
    #[must_use]
    pub fn parse(&self, record: NormalizedRecord) -> NormalizedRecord {
        match self.parsers.iter().find(|p| p.can_parse(&record)) {
            Some(parser) => {
                debug!("Parsing order with {} parser", parser.merchant());
                parser.parse(record)
            }
            None => record,
        }
    }
}

impl Default for DelegatingOrderParser {
    fn default() -> Self {
        Self::new(vec![
            OrderParser::Amazon(AmazonOrderParser),
            OrderParser::Steam(SteamOrderParser),
        ])
    }
}

/// A decimal amount, optionally with `,` thousands separators
const AMOUNT_PATTERN: &str = r"(?:\d{1,3}(?:,\d{3})+|\d+)\.\d+";

/// Parse an amount matched by [`AMOUNT_PATTERN`]
fn parse_amount(text: &str) -> Option<f64> {
    text.replace(',', "").parse().ok()
}

/// Sender address contains `fragment`; records without a sender never match
fn sender_contains(record: &NormalizedRecord, fragment: &str) -> bool {
    record.from.as_deref().is_some_and(|f| f.contains(fragment))
}

/// First capture group of `re` in `text`, as an amount
fn capture_amount(re: &Regex, text: &str) -> Option<f64> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| parse_amount(m.as_str()))
}

fn warn_if_unreconciled(details: &OrderDetails, body: &str) {
    if details.is_reconciled() {
        return;
    }

    warn!(
        merchant = %details.merchant,
        unreconciled = details.unreconciled_amount(),
        ?details,
        body,
        "Order not parsed correctly, items may be missing or a promotion may have been applied"
    );
}
