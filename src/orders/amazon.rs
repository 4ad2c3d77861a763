//! Amazon order confirmations

use super::{AMOUNT_PATTERN, capture_amount, parse_amount, sender_contains, warn_if_unreconciled};
use crate::types::{Merchant, NormalizedRecord, OrderDetails, OrderItem};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

const SENDER: &str = "auto-confirm@amazon";

/// Intro paragraph before the first item
const LEADING_PARAGRAPHS: usize = 1;

/// Summary and footer paragraphs after the last item
const TRAILING_PARAGRAPHS: usize = 3;

/// Paragraphs carrying shipping info rather than an item
const NON_ITEM_MARKERS: [&str; 2] = [
    "Your estimated delivery date is:",
    "Your order will be sent to:",
];

static ORDER_TOTAL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("Order Total: .*?({AMOUNT_PATTERN})")).unwrap());

static POSTAGE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("Postage & Packing: .*?({AMOUNT_PATTERN})")).unwrap());

static DELIVERY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("Delivery & Handling:: .*?({AMOUNT_PATTERN})")).unwrap());

static ITEMS_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"={10}\r?\n\r?\n").unwrap());

static PARAGRAPH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n\r?\n").unwrap());

static COST_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(AMOUNT_PATTERN).unwrap());

/// Parser for the plain-text Amazon "Order Confirmation" template
///
/// Items are found by blank-line separated paragraphs, so the body must keep
/// the template's blank lines. Text produced by [`crate::ContentExtractor`]
/// has them removed; records normalized with body indexing get the order
/// total but no items, and the mismatch warning fires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AmazonOrderParser;

impl AmazonOrderParser {
    #[must_use]
    pub fn can_parse(&self, record: &NormalizedRecord) -> bool {
        sender_contains(record, SENDER)
    }

    #[must_use]
    pub fn parse(&self, mut record: NormalizedRecord) -> NormalizedRecord {
        let Some(body) = record.body.as_deref() else {
            return record;
        };
        if !body.contains("Order Confirmation") {
            return record;
        }

        let order_total = capture_amount(&ORDER_TOTAL_REGEX, body).unwrap_or(0.0);
        let postage = capture_amount(&POSTAGE_REGEX, body)
            .or_else(|| capture_amount(&DELIVERY_REGEX, body))
            .unwrap_or(0.0);

        let mut details = OrderDetails::new(Merchant::Amazon, order_total, Some(postage));
        details.order_items = item_paragraphs(body)
            .into_iter()
            .filter_map(parse_item)
            .collect();

        warn_if_unreconciled(&details, body);
        record.order_details = Some(details);
        record
    }
}

/// Paragraphs between the intro and the summary, after the first `=====` rule
fn item_paragraphs(body: &str) -> Vec<&str> {
    let Some(marker) = ITEMS_MARKER_REGEX.find(body) else {
        debug!("No item marker in Amazon confirmation");
        return Vec::new();
    };

    let paragraphs: Vec<&str> = PARAGRAPH_REGEX.split(&body[marker.end()..]).collect();
    if paragraphs.len() <= LEADING_PARAGRAPHS + TRAILING_PARAGRAPHS {
        return Vec::new();
    }

    paragraphs[LEADING_PARAGRAPHS..paragraphs.len() - TRAILING_PARAGRAPHS].to_vec()
}

/// Name, price, condition and seller on four consecutive lines
fn parse_item(paragraph: &str) -> Option<OrderItem> {
    if NON_ITEM_MARKERS.iter().any(|m| paragraph.contains(m)) {
        return None;
    }

    let cleaned = paragraph.replace('_', "");
    let lines: Vec<&str> = cleaned.lines().collect();
    if lines.len() < 4 {
        debug!("Skipping malformed order block: {paragraph:?}");
        return None;
    }

    let Some(cost) = COST_REGEX
        .find(lines[1])
        .and_then(|m| parse_amount(m.as_str()))
    else {
        debug!("Skipping order block without a price: {paragraph:?}");
        return None;
    };

    let condition = lines[2].rsplit_once(':').map_or(lines[2], |(_, c)| c);
    let seller = lines[3].replace("Sold by", "");

    Some(OrderItem {
        item: lines[0].trim().to_string(),
        cost,
        condition: Some(condition.trim().to_string()),
        seller: Some(seller.trim().to_string()),
    })
}
