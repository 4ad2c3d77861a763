//! Run configuration.
//!
//! Options are read once per run, either built in code or loaded from TOML,
//! and shared by reference afterwards.

use serde::{Deserialize, Serialize};

use crate::error::{IndexError, Result};

/// Headers starting with this prefix are extension headers
pub const EXTENSION_HEADER_PREFIX: &str = "x-";

/// Options controlling what goes into each record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexOptions {
    /// Extract message bodies into `body`.
    pub index_bodies: bool,
    /// Comma-separated content-type substrings whose parts are not decoded.
    pub index_bodies_ignore_content_types: String,
    /// Keep `x-` headers in the record.
    pub index_x_headers: bool,
    /// Target index for bulk payloads.
    pub index_name: String,
    /// Records per bulk payload.
    pub batch_size: usize,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            index_bodies: false,
            index_bodies_ignore_content_types: "application,image".to_string(),
            index_x_headers: true,
            index_name: "gmail".to_string(),
            batch_size: 500,
        }
    }
}

impl IndexOptions {
    /// Parse options from TOML; missing keys keep their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let options: Self =
            toml::from_str(contents).map_err(|e| IndexError::Config(e.to_string()))?;
        tracing::debug!(?options, "Loaded index options");
        Ok(options)
    }

    /// The ignore list, trimmed and lower-cased, without empty entries.
    #[must_use]
    pub fn ignored_content_types(&self) -> Vec<String> {
        self.index_bodies_ignore_content_types
            .split(',')
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect()
    }
}
