//! Bulk payload batching for the indexing collaborator

use crate::config::IndexOptions;
use crate::error::{IndexError, Result};
use crate::types::NormalizedRecord;
use serde_json::json;
use tracing::debug;

/// Encode records as a newline-delimited bulk request body
///
/// Each record is preceded by an action line naming its index and using the
/// message identifier as the document id.
pub fn bulk_body(index_name: &str, records: &[NormalizedRecord]) -> Result<String> {
    let mut body = String::new();

    for record in records {
        let id = record.message_id().ok_or(IndexError::MissingIdentifier)?;
        let action = json!({ "index": { "_index": index_name, "_id": id } });
        body.push_str(&serde_json::to_string(&action)?);
        body.push('\n');
        body.push_str(&serde_json::to_string(record)?);
        body.push('\n');
    }

    Ok(body)
}

/// State of one indexing run: pending records and how many were handed off
#[derive(Debug, Clone)]
pub struct BatchRun {
    index_name: String,
    batch_size: usize,
    pending: Vec<NormalizedRecord>,
    flushed: usize,
}

impl BatchRun {
    #[must_use]
    pub fn new(index_name: impl Into<String>, batch_size: usize) -> Self {
        let batch_size = batch_size.max(1);
        Self {
            index_name: index_name.into(),
            batch_size,
            pending: Vec::with_capacity(batch_size),
            flushed: 0,
        }
    }

    #[must_use]
    pub fn from_options(options: &IndexOptions) -> Self {
        Self::new(options.index_name.clone(), options.batch_size)
    }

    /// Queue a record; returns a bulk body once a full batch is pending
    pub fn push(&mut self, record: NormalizedRecord) -> Result<Option<String>> {
        self.pending.push(record);
        if self.pending.len() < self.batch_size {
            return Ok(None);
        }
        self.flush().map(Some)
    }

    /// Emit whatever is still pending, along with the final record count
    pub fn finish(mut self) -> Result<(Option<String>, usize)> {
        let last = if self.pending.is_empty() {
            None
        } else {
            Some(self.flush()?)
        };
        Ok((last, self.flushed))
    }

    /// Records handed off so far
    #[must_use]
    pub const fn flushed(&self) -> usize {
        self.flushed
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    fn flush(&mut self) -> Result<String> {
        let body = bulk_body(&self.index_name, &self.pending)?;
        self.flushed += self.pending.len();
        debug!(
            "Flushed batch of {} records ({} total)",
            self.pending.len(),
            self.flushed
        );
        self.pending.clear();
        Ok(body)
    }
}
