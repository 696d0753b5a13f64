//! Store-wide configuration.

use serde::{Deserialize, Serialize};

use crate::error::{LogStoreError, Result};

/// Default upper bound on a single header (64 KiB).
pub const DEFAULT_MAX_HEADER_LEN: usize = 64 * 1024;

/// Configuration for a [`LogStore`](crate::LogStore).
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```
/// use logstore::StoreConfig;
///
/// let config = StoreConfig::from_json(r#"{"header_len": 40}"#).unwrap();
/// assert_eq!(config.header_len, Some(40));
/// assert!(config.require_all_indexes);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// When set, every header must be exactly this many bytes.
    pub header_len: Option<usize>,
    /// Upper bound on any header.
    pub max_header_len: usize,
    /// Require exactly one token per registered index on every insert.
    /// When false, an insert may omit indexes (the entry is then simply
    /// absent from those indexes).
    pub require_all_indexes: bool,
    /// Capacity hint for the entry log.
    pub expected_entries: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            header_len: None,
            max_header_len: DEFAULT_MAX_HEADER_LEN,
            require_all_indexes: true,
            expected_entries: 0,
        }
    }
}

impl StoreConfig {
    /// Parse and validate a JSON config document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: StoreConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Fixed-size header log of `header_len` bytes per entry.
    pub fn fixed_header(header_len: usize) -> Self {
        Self {
            header_len: Some(header_len),
            max_header_len: header_len.max(DEFAULT_MAX_HEADER_LEN),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_header_len == 0 {
            return Err(LogStoreError::InvalidConfig(
                "max_header_len must be at least 1".to_string(),
            ));
        }
        if let Some(len) = self.header_len {
            if len > self.max_header_len {
                return Err(LogStoreError::InvalidConfig(format!(
                    "header_len {} exceeds max_header_len {}",
                    len, self.max_header_len
                )));
            }
        }
        Ok(())
    }

    /// Check a header against the configured length bounds.
    pub(crate) fn check_header(&self, header: &[u8]) -> Result<()> {
        if let Some(expected) = self.header_len {
            if header.len() != expected {
                return Err(LogStoreError::HeaderLengthMismatch {
                    expected,
                    actual: header.len(),
                });
            }
        }
        if header.len() > self.max_header_len {
            return Err(LogStoreError::HeaderTooLarge {
                max: self.max_header_len,
                actual: header.len(),
            });
        }
        Ok(())
    }
}
