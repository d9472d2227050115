//! Shared types for the path layer
//!
//! Remote entry representation and the error type used across all modules.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One entry of a remote directory listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteEntry {
    /// Entry name within its directory (not unique among siblings)
    pub name: String,
    /// Opaque locator addressing this entry in the backing store
    pub locator: String,
    /// Whether this entry is a directory
    pub is_dir: bool,
    /// Size in bytes (0 for directories)
    pub size: u64,
    /// Last modification time (ISO 8601 string, if the store reports one)
    pub modified: Option<String>,
}

impl RemoteEntry {
    /// Create a directory entry.
    pub fn directory(name: &str, locator: &str) -> Self {
        Self {
            name: name.to_string(),
            locator: locator.to_string(),
            is_dir: true,
            size: 0,
            modified: None,
        }
    }

    /// Create a file entry.
    pub fn file(name: &str, locator: &str, size: u64) -> Self {
        Self {
            name: name.to_string(),
            locator: locator.to_string(),
            is_dir: false,
            size,
            modified: None,
        }
    }
}

/// Error type for path resolution and remote store access
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("path not found: {0}")]
    PathNotFound(String),

    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("invalid sharing URL: {0}")]
    InvalidUrlFormat(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("store inconsistency: {0}")]
    Inconsistent(String),
}
