//! Message normalization into index records

use crate::config::{EXTENSION_HEADER_PREFIX, IndexOptions};
use crate::content::ContentExtractor;
use crate::error::{IndexError, Result};
use crate::headers::{date_to_epoch_millis, normalize_address, parse_labels, split_address_list};
use crate::types::{NormalizedRecord, RECORD_FIELDS};
use mailparse::ParsedMail;
use tracing::debug;

/// Header carrying comma-separated mailbox labels
pub const LABELS_HEADER: &str = "x-gmail-labels";

/// Prefix for headers whose name clashes with a derived record field
pub const CLASHING_HEADER_PREFIX: &str = "header-";

/// Recipient and sender headers, moved into their own fields
const ADDRESS_HEADERS: [&str; 4] = ["to", "cc", "bcc", "from"];

/// Turns parsed messages into [`NormalizedRecord`]s
///
/// Holds no per-message state, so one normalizer can serve a whole run.
#[derive(Debug, Clone)]
pub struct MessageNormalizer {
    options: IndexOptions,
    extractor: ContentExtractor,
}

impl MessageNormalizer {
    #[must_use]
    pub fn new(options: IndexOptions) -> Self {
        let extractor = ContentExtractor::new(&options);
        Self { options, extractor }
    }

    #[must_use]
    pub const fn options(&self) -> &IndexOptions {
        &self.options
    }

    /// Parse raw message bytes and normalize them
    pub fn normalize_bytes(&self, raw: &[u8]) -> Result<NormalizedRecord> {
        let parsed = mailparse::parse_mail(raw).map_err(|e| IndexError::Structure(e.to_string()))?;
        self.normalize(&parsed)
    }

    /// Build the record for one message
    ///
    /// Fails when the message has no identifier or its date header cannot be
    /// turned into a timestamp; the caller should drop the message then.
    pub fn normalize(&self, mail: &ParsedMail) -> Result<NormalizedRecord> {
        let mut record = NormalizedRecord::default();
        for header in &mail.headers {
            record
                .headers
                .insert(header_key(&header.get_key()), header.get_value());
        }

        if record.message_id().is_none() {
            return Err(IndexError::MissingIdentifier);
        }

        record.to = take_address_list(&mut record, "to");
        record.cc = take_address_list(&mut record, "cc");
        record.bcc = take_address_list(&mut record, "bcc");
        record.from = record.headers.remove("from").map(|f| normalize_address(&f));

        if let Some(date) = record.header("date") {
            record.date_ts = Some(date_to_epoch_millis(date)?);
        }

        record.labels = record
            .headers
            .remove(LABELS_HEADER)
            .map(|l| parse_labels(&l))
            .unwrap_or_default();

        if self.options.index_bodies {
            let content = self.extractor.extract(mail);
            record.body_size = Some(content.body.chars().count());
            record.body = Some(content.body);
            record.body_filenames = Some(content.filenames);
            record.body_ignored_content_types = Some(content.ignored_content_types);
        }

        record.content_size_total = record.parts.iter().map(|p| p.content.len()).sum();

        if !self.options.index_x_headers {
            record
                .headers
                .retain(|key, _| !key.starts_with(EXTENSION_HEADER_PREFIX));
        }

        debug!(
            "Normalized {} from {}",
            record.message_id().unwrap_or_default(),
            record.from.as_deref().unwrap_or_default()
        );

        Ok(record)
    }
}

impl Default for MessageNormalizer {
    fn default() -> Self {
        Self::new(IndexOptions::default())
    }
}

/// Lower-cased header name, prefixed when it would shadow a record field
fn header_key(name: &str) -> String {
    let key = name.to_lowercase();
    if RECORD_FIELDS.contains(&key.as_str()) && !ADDRESS_HEADERS.contains(&key.as_str()) {
        format!("{CLASHING_HEADER_PREFIX}{key}")
    } else {
        key
    }
}

/// Move a recipient header out of the copied headers as bare addresses
///
/// Blank headers are dropped.
fn take_address_list(record: &mut NormalizedRecord, key: &str) -> Option<Vec<String>> {
    record
        .headers
        .remove(key)
        .filter(|v| !v.trim().is_empty())
        .map(|v| split_address_list(&v))
}
