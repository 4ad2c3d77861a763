// Enforce at crate level
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! Email Index Preparation
//!
//! Turns archived email messages into flat, search-engine ready documents
//! and recognizes merchant order confirmations in them.
//!
//! # Features
//!
//! - Bare-address normalization of `From`/`To`/`Cc`/`Bcc`
//! - Timezone-aware date to epoch milliseconds
//! - Label splitting and optional extension-header filtering
//! - Recursive body text extraction with content-type filtering
//! - Itemized order extraction for Amazon and Steam confirmations
//! - Bulk payload batching
//!
//! # Example
//!
//! ```rust
//! use email_index::{DelegatingOrderParser, IndexOptions, MessageNormalizer};
//!
//! let raw = b"From: Jane <jane@example.com>\r\n\
//!             Message-ID: <1@example.com>\r\n\
//!             Date: Wed, 01 Jan 2025 12:00:00 +0000\r\n\
//!             \r\n\
//!             Hello";
//!
//! let options = IndexOptions { index_bodies: true, ..IndexOptions::default() };
//! let record = MessageNormalizer::new(options).normalize_bytes(raw).unwrap();
//! let record = DelegatingOrderParser::default().parse(record);
//!
//! assert_eq!(record.from.as_deref(), Some("jane@example.com"));
//! assert_eq!(record.date_ts, Some(1_735_732_800_000));
//! assert_eq!(record.body.as_deref(), Some("Hello"));
//! ```

mod batch;
mod config;
mod content;
mod error;
mod headers;
mod orders;
mod parser;
mod types;

pub use batch::{BatchRun, bulk_body};
pub use config::{EXTENSION_HEADER_PREFIX, IndexOptions};
pub use content::{ContentExtractor, ExtractedContent, strip_markup};
pub use error::{IndexError, Result};
pub use headers::{date_to_epoch_millis, normalize_address, parse_labels, split_address_list};
pub use orders::{AmazonOrderParser, DelegatingOrderParser, OrderParser, SteamOrderParser};
pub use parser::{CLASHING_HEADER_PREFIX, LABELS_HEADER, MessageNormalizer};
pub use types::*;
