//! Sharing-URL to locator extraction
//!
//! A provider's sharing URL wraps the object locator between a fixed prefix
//! and suffix (`https://drive.google.com/file/d/<ID>/view?usp=sharing` for
//! Drive). Parsing strips the query string and then removes the two
//! literals, failing on the first one that is absent.

use crate::types::StoreError;

/// The fixed prefix/suffix pair wrapping a locator in a sharing URL.
///
/// The literals are provider-specific and supplied at construction; nothing
/// in the parsing logic is tied to a particular provider.
#[derive(Debug, Clone)]
pub struct ShareUrlFormat {
    prefix: String,
    suffix: String,
}

impl ShareUrlFormat {
    pub fn new(prefix: &str, suffix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        }
    }

    /// The Google Drive sharing URL literal pair.
    pub fn google() -> Self {
        Self::new("https://drive.google.com/file/d/", "/view")
    }

    /// Extract the object locator from a sharing URL.
    ///
    /// Everything from the first `?` is discarded, then the prefix and
    /// suffix are checked and removed in that order. The first missing
    /// literal wins: a URL lacking the prefix fails before the suffix is
    /// ever looked at.
    pub fn parse(&self, url: &str) -> Result<String, StoreError> {
        let mut remainder = url.split('?').next().unwrap_or(url).to_string();

        for literal in [&self.prefix, &self.suffix] {
            if !remainder.contains(literal.as_str()) {
                return Err(StoreError::InvalidUrlFormat(format!(
                    "expected '{literal}' in '{url}'"
                )));
            }
            remainder = remainder.replace(literal.as_str(), "");
        }

        Ok(remainder)
    }
}
