//! Core types for normalized index records

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Amounts closer than half a cent are treated as equal when reconciling
pub const RECONCILIATION_TOLERANCE: f64 = 0.005;

/// Top-level keys owned by [`NormalizedRecord`]'s own fields
pub const RECORD_FIELDS: [&str; 13] = [
    "to",
    "cc",
    "bcc",
    "from",
    "date_ts",
    "labels",
    "body",
    "body_size",
    "body_filenames",
    "body_ignored_content_types",
    "content_size_total",
    "parts",
    "order_details",
];

/// One message flattened into a document ready for bulk indexing
///
/// Serializes to a single JSON object: every copied header sits at the top
/// level under its lower-cased name, next to the normalized fields below.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    /// Remaining headers, keys lower-cased (last occurrence wins)
    ///
    /// Never holds a key from [`RECORD_FIELDS`].
    #[serde(flatten)]
    pub headers: BTreeMap<String, String>,

    /// Bare recipient addresses, in header order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cc: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bcc: Option<Vec<String>>,

    /// Bare sender address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,

    /// Date header as epoch milliseconds (UTC)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_ts: Option<i64>,

    /// Lower-cased mailbox labels
    #[serde(default)]
    pub labels: Vec<String>,

    /// Visible text of every indexed body part
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    /// Body length in characters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_size: Option<usize>,

    /// Attachment filenames, space separated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_filenames: Option<String>,

    /// Content types that were skipped, space separated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_ignored_content_types: Option<String>,

    /// Sum of the content lengths in `parts`
    #[serde(default)]
    pub content_size_total: usize,

    /// Pre-split content carried over from older document layouts
    #[serde(default)]
    pub parts: Vec<LegacyPart>,

    /// Itemized order, when a merchant parser recognized the message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_details: Option<OrderDetails>,
}

impl NormalizedRecord {
    /// Look up a copied header by its lower-cased name
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// The unique identifier used as the index document id
    #[must_use]
    pub fn message_id(&self) -> Option<&str> {
        self.header("message-id")
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.header("subject")
    }
}

/// A content entry from the older `parts` document layout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyPart {
    #[serde(default)]
    pub content: String,
}

/// Merchant whose confirmation template produced an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Merchant {
    Amazon,
    Steam,
}

impl fmt::Display for Merchant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Amazon => write!(f, "amazon"),
            Self::Steam => write!(f, "steam"),
        }
    }
}

/// Order data extracted from a confirmation email
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDetails {
    pub merchant: Merchant,

    /// Total stated by the email
    pub order_total: f64,

    /// Shipping charge (Amazon only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postage: Option<f64>,

    pub order_items: Vec<OrderItem>,
}

impl OrderDetails {
    #[must_use]
    pub const fn new(merchant: Merchant, order_total: f64, postage: Option<f64>) -> Self {
        Self {
            merchant,
            order_total,
            postage,
            order_items: Vec::new(),
        }
    }

    /// Sum of all extracted item costs
    #[must_use]
    pub fn items_total(&self) -> f64 {
        self.order_items.iter().map(|i| i.cost).sum()
    }

    /// What is left of the stated total after postage and every item
    #[must_use]
    pub fn unreconciled_amount(&self) -> f64 {
        self.order_items
            .iter()
            .fold(self.order_total - self.postage.unwrap_or(0.0), |rest, i| {
                rest - i.cost
            })
    }

    /// Whether the extracted items account for the stated total
    #[must_use]
    pub fn is_reconciled(&self) -> bool {
        self.unreconciled_amount().abs() < RECONCILIATION_TOLERANCE
    }
}

/// One priced line of an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub item: String,
    pub cost: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller: Option<String>,
}

impl OrderItem {
    pub fn new(item: impl Into<String>, cost: f64) -> Self {
        Self {
            item: item.into(),
            cost,
            condition: None,
            seller: None,
        }
    }
}
