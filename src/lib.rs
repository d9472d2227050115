//! POSIX-style path layer over flat, ID-addressed cloud object stores
//!
//! Object stores like Google Drive expose a flat folder graph addressed by
//! opaque IDs, where two sibling folders may share a name. This crate puts a
//! slash-separated logical path interface on top: it resolves paths against
//! the remote hierarchy, materializes missing folder chains idempotently, and
//! translates sharing URLs into canonical object locators.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────┐
//! │                  PathStore                     │
//! │  put_file, get/delete by path, get/delete by   │
//! │  URL, list_folder_tree                         │
//! └────────────────────────────────────────────────┘
//!        │             │               │
//!        ▼             ▼               ▼
//! ┌────────────┐ ┌────────────┐ ┌──────────────┐
//! │ materialize│ │ path (re-  │ │  share_url   │
//! │ (ensure)   │ │ solver)    │ │  (parser)    │
//! └────────────┘ └────────────┘ └──────────────┘
//!        │             │
//!        └──────┬──────┘
//!               ▼
//!       ┌──────────────┐       ┌───────────────────┐
//!       │ tree (cache) │──────▶│   RemoteListing   │
//!       └──────────────┘       │ (Google Drive, …) │
//!                              └───────────────────┘
//! ```
//!
//! Every public operation rebuilds its folder tree from a fresh remote
//! listing; nothing is cached across calls. That is deliberate: the backing
//! store can be mutated by other processes at any time, and a stale tree is
//! how duplicate sibling folders get created.

pub mod google_drive;
pub mod http_retry;
pub mod materialize;
pub mod path;
pub mod share_url;
pub mod store;
pub mod tree;
pub mod types;

#[cfg(test)]
pub(crate) mod testutil;

pub use google_drive::{GoogleDriveConfig, GoogleDriveListing};
pub use materialize::ensure_path;
pub use path::{join_locator, resolve, split_logical_path, Resolution, ROOT_LOCATOR};
pub use share_url::ShareUrlFormat;
pub use store::PathStore;
pub use tree::{build_tree, FolderNode};
pub use types::{RemoteEntry, StoreError};

use async_trait::async_trait;

/// Query surface over the backing object store.
///
/// Locators are opaque slash-joined paths understood by the implementation;
/// the root is the sentinel [`ROOT_LOCATOR`]. Higher layers never inspect a
/// locator beyond joining a child name onto it.
///
/// Implementations own transport policy entirely: authentication, timeouts
/// and retries happen behind this trait. Errors cross it unchanged; the
/// resolution layers above never retry.
#[async_trait]
pub trait RemoteListing: Send + Sync {
    /// List the immediate entries (files and directories) of a directory.
    ///
    /// Sibling names are not unique; callers that look entries up by name
    /// take the first match in listing order.
    async fn list(&self, locator: &str) -> Result<Vec<RemoteEntry>, StoreError>;

    /// Create a directory at the given locator. The parent must exist.
    async fn create_directory(&self, locator: &str) -> Result<(), StoreError>;

    /// Read the full content of a file.
    async fn get(&self, locator: &str) -> Result<Vec<u8>, StoreError>;

    /// Write the full content of a file, replacing any previous content.
    async fn put(&self, locator: &str, content: &[u8]) -> Result<(), StoreError>;

    /// Delete a file.
    async fn delete(&self, locator: &str) -> Result<(), StoreError>;
}
