//! Steam purchase receipts

use super::{AMOUNT_PATTERN, capture_amount, parse_amount, sender_contains, warn_if_unreconciled};
use crate::types::{Merchant, NormalizedRecord, OrderDetails, OrderItem};
use regex::Regex;
use std::sync::LazyLock;

const SENDER: &str = "noreply@steampowered.com";

/// Index of the sentence-delimited section listing the items
const ITEMS_SECTION: usize = 2;

/// Rule separating the item list from the totals footer
const FOOTER_RULE: &str = "-------";

static ORDER_TOTAL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"Total:[ \t]+({AMOUNT_PATTERN})")).unwrap());

static SECTION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\.\r?\n)+").unwrap());

static LEADING_COST_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{AMOUNT_PATTERN}")).unwrap());

/// Parser for Steam "Thank you for your purchase" emails
///
/// Gift purchases use another layout and end up with wrong or missing items;
/// the reconciliation warning flags them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SteamOrderParser;

impl SteamOrderParser {
    #[must_use]
    pub fn can_parse(&self, record: &NormalizedRecord) -> bool {
        sender_contains(record, SENDER)
    }

    #[must_use]
    pub fn parse(&self, mut record: NormalizedRecord) -> NormalizedRecord {
        let is_receipt = record.subject().is_some_and(|s| s.contains("Thank you"))
            && record.body.as_deref().is_some_and(|b| b.contains("purchase"));
        if !is_receipt {
            return record;
        }
        let Some(body) = record.body.as_deref() else {
            return record;
        };

        let order_total = capture_amount(&ORDER_TOTAL_REGEX, body).unwrap_or(0.0);
        let mut details = OrderDetails::new(Merchant::Steam, order_total, None);
        if let Some(section) = SECTION_REGEX.split(body).nth(ITEMS_SECTION) {
            details.order_items = section
                .lines()
                .take_while(|l| !l.contains(FOOTER_RULE))
                .filter_map(parse_item_line)
                .collect();
        }

        warn_if_unreconciled(&details, body);
        record.order_details = Some(details);
        record
    }
}

/// `Name: 9.99` with the name split off at the last colon
fn parse_item_line(line: &str) -> Option<OrderItem> {
    if line.is_empty() || !line.contains(": ") {
        return None;
    }

    let (name, after) = line.rsplit_once(':')?;
    let cost = LEADING_COST_REGEX
        .find(after.trim())
        .and_then(|m| parse_amount(m.as_str()))?;

    Some(OrderItem::new(name.trim(), cost))
}
