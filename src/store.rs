//! Public path-addressed operations over a remote listing
//!
//! [`PathStore`] composes the resolver, the materializer and the sharing-URL
//! parser into the operations a CLI or HTTP layer consumes: write a file
//! under a logical path, read or delete one by path or by sharing URL, and
//! list the remote folder tree.

use crate::materialize;
use crate::path::{join_locator, resolve, split_logical_path, ROOT_LOCATOR};
use crate::share_url::ShareUrlFormat;
use crate::tree::{build_tree, FolderNode};
use crate::types::{RemoteEntry, StoreError};
use crate::RemoteListing;

/// Path-addressed facade over a [`RemoteListing`] backend.
pub struct PathStore {
    listing: Box<dyn RemoteListing>,
    share_format: ShareUrlFormat,
}

impl PathStore {
    pub fn new(listing: Box<dyn RemoteListing>, share_format: ShareUrlFormat) -> Self {
        Self { listing, share_format }
    }

    /// Direct access to the backing listing.
    pub fn listing(&self) -> &dyn RemoteListing {
        self.listing.as_ref()
    }

    /// Write `content` as `file_name` under `logical_path`, creating any
    /// missing folders first.
    pub async fn put_file(
        &self,
        content: &[u8],
        file_name: &str,
        logical_path: &str,
    ) -> Result<(), StoreError> {
        let folder = self.ensure_path(logical_path).await?;
        self.listing.put(&join_locator(&folder, file_name), content).await
    }

    /// Ensure the folder chain for `logical_path` exists and return the
    /// locator of its deepest folder.
    pub async fn ensure_path(&self, logical_path: &str) -> Result<String, StoreError> {
        let segments = split_logical_path(logical_path);
        materialize::ensure_path(self.listing.as_ref(), &segments).await
    }

    /// Read a file addressed by logical path and name.
    pub async fn get_file_by_path(
        &self,
        logical_path: &str,
        file_name: &str,
    ) -> Result<Vec<u8>, StoreError> {
        let locator = self.locate_file(logical_path, file_name).await?;
        self.listing.get(&locator).await
    }

    /// Delete a file addressed by logical path and name.
    pub async fn delete_file_by_path(
        &self,
        logical_path: &str,
        file_name: &str,
    ) -> Result<(), StoreError> {
        let locator = self.locate_file(logical_path, file_name).await?;
        self.listing.delete(&locator).await
    }

    /// Read a file addressed by its sharing URL.
    pub async fn get_file_by_url(&self, url: &str) -> Result<Vec<u8>, StoreError> {
        let locator = self.share_format.parse(url)?;
        self.listing.get(&locator).await
    }

    /// Delete a file addressed by its sharing URL.
    pub async fn delete_file_by_url(&self, url: &str) -> Result<(), StoreError> {
        let locator = self.share_format.parse(url)?;
        self.listing.delete(&locator).await
    }

    /// Build the folder tree under `root` (see [`build_tree`] for the
    /// expansion policy).
    pub async fn list_folder_tree(&self, root: &str) -> Result<Vec<FolderNode>, StoreError> {
        build_tree(self.listing.as_ref(), root).await
    }

    /// Raw immediate listing of a directory, files included.
    pub async fn list_folder(&self, locator: &str) -> Result<Vec<RemoteEntry>, StoreError> {
        self.listing.list(locator).await
    }

    /// Translate a logical path plus file name into the file's locator.
    ///
    /// The path must resolve fully ([`StoreError::PathNotFound`] otherwise);
    /// the named file must exist in the resolved directory
    /// ([`StoreError::FileNotFound`] otherwise, first match wins on
    /// duplicate names). Paths of zero or one segment resolve directly to
    /// the root with no remote lookup, matching root-relative lookups.
    pub async fn locate_file(
        &self,
        logical_path: &str,
        file_name: &str,
    ) -> Result<String, StoreError> {
        let folder = self.resolve_folder(logical_path).await?;
        let entries = self.listing.list(&folder).await?;

        entries
            .iter()
            .find(|e| e.name == file_name)
            .map(|e| e.locator.clone())
            .ok_or_else(|| StoreError::FileNotFound(join_locator(&folder, file_name)))
    }

    async fn resolve_folder(&self, logical_path: &str) -> Result<String, StoreError> {
        let segments = split_logical_path(logical_path);
        if segments.len() <= 1 {
            return Ok(ROOT_LOCATOR.to_string());
        }

        let resolution = resolve(self.listing.as_ref(), &segments).await?;
        if resolution.matched < segments.len() {
            return Err(StoreError::PathNotFound(
                segments[..resolution.matched + 1].join("/"),
            ));
        }

        Ok(resolution.locator)
    }
}
