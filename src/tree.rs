//! In-memory folder tree built from remote listings
//!
//! The tree mirrors the remote folder hierarchy for the duration of a single
//! operation. Building it fetches a bounded number of levels eagerly
//! ([`EXPANSION_DEPTH`]): enough lookahead to resolve typical path depths in
//! one round of listings without walking the entire store. The resolver
//! rebuilds a fresh tree rooted at a node when it needs to descend past the
//! expanded depth.

use serde::Serialize;
use tracing::debug;

use crate::types::{RemoteEntry, StoreError};
use crate::RemoteListing;

/// Number of directory levels fetched eagerly per tree build.
pub const EXPANSION_DEPTH: usize = 2;

/// One remote directory in the in-memory tree.
///
/// `children` is populated only to the depth the build fetched; an empty
/// vector does not mean the directory is empty remotely.
#[derive(Debug, Clone, Serialize)]
pub struct FolderNode {
    pub name: String,
    pub locator: String,
    pub modified: Option<String>,
    pub size: u64,
    pub children: Vec<FolderNode>,
}

impl FolderNode {
    fn from_entry(entry: &RemoteEntry) -> Self {
        Self {
            name: entry.name.clone(),
            locator: entry.locator.clone(),
            modified: entry.modified.clone(),
            size: entry.size,
            children: Vec::new(),
        }
    }
}

/// Build a folder tree rooted at `root`, expanded [`EXPANSION_DEPTH`] levels.
///
/// Lists the immediate entries of `root`, keeps only directories, and for
/// each of them lists its children one level further down. Listing order is
/// preserved; duplicate sibling names are kept as-is. Costs one `list` call
/// per directory visited.
///
/// The synthetic root itself is not returned, only its children.
pub async fn build_tree(
    listing: &dyn RemoteListing,
    root: &str,
) -> Result<Vec<FolderNode>, StoreError> {
    let entries = listing.list(root).await?;
    let mut nodes = Vec::new();

    for entry in entries.iter().filter(|e| e.is_dir) {
        let mut node = FolderNode::from_entry(entry);
        let children = listing.list(&entry.locator).await?;
        node.children = children
            .iter()
            .filter(|c| c.is_dir)
            .map(FolderNode::from_entry)
            .collect();
        nodes.push(node);
    }

    debug!("built folder tree at {} ({} top-level folders)", root, nodes.len());
    Ok(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::ROOT_LOCATOR;
    use crate::testutil::MemoryListing;

    #[tokio::test]
    async fn test_build_tree_two_level_expansion() {
        let listing = MemoryListing::new();
        let docs = listing.add_dir(ROOT_LOCATOR, "docs");
        let reports = listing.add_dir(&docs, "reports");
        listing.add_dir(&reports, "2024");

        let tree = build_tree(&listing, ROOT_LOCATOR).await.unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].name, "docs");
        assert_eq!(tree[0].children.len(), 1);
        assert_eq!(tree[0].children[0].name, "reports");
        // Third level exists remotely but is past the expansion depth.
        assert!(tree[0].children[0].children.is_empty());
    }

    #[tokio::test]
    async fn test_build_tree_filters_files() {
        let listing = MemoryListing::new();
        listing.add_dir(ROOT_LOCATOR, "docs");
        listing.add_file(ROOT_LOCATOR, "readme.txt", b"hello");

        let tree = build_tree(&listing, ROOT_LOCATOR).await.unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].name, "docs");
    }

    #[tokio::test]
    async fn test_build_tree_preserves_listing_order_and_duplicates() {
        let listing = MemoryListing::new();
        listing.add_dir_with_locator(ROOT_LOCATOR, "x", "/x");
        listing.add_dir_with_locator(ROOT_LOCATOR, "x", "/x-dup");
        listing.add_dir(ROOT_LOCATOR, "y");

        let tree = build_tree(&listing, ROOT_LOCATOR).await.unwrap();
        let names: Vec<&str> = tree.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["x", "x", "y"]);
        assert_eq!(tree[0].locator, "/x");
        assert_eq!(tree[1].locator, "/x-dup");
    }

    #[tokio::test]
    async fn test_build_tree_empty_root() {
        let listing = MemoryListing::new();
        let tree = build_tree(&listing, ROOT_LOCATOR).await.unwrap();
        assert!(tree.is_empty());
    }
}
