//! Logical path handling and segment-by-segment resolution
//!
//! A logical path is the slash-separated human-facing path supplied by a
//! caller, distinct from any locator. [`split_logical_path`] normalizes it
//! into segments; [`resolve`] walks those segments against a freshly built
//! folder tree and reports how deep it got.

use crate::tree::{build_tree, EXPANSION_DEPTH};
use crate::types::StoreError;
use crate::RemoteListing;

/// Locator of the synthetic root directory.
pub const ROOT_LOCATOR: &str = "/";

/// Split a logical path into non-empty segments.
///
/// Backslashes are normalized to forward slashes first. Empty segments from
/// leading, trailing or doubled slashes are dropped, so `"/docs//reports/"`
/// and `"docs\reports"` both yield `["docs", "reports"]`.
pub fn split_logical_path(raw: &str) -> Vec<String> {
    raw.replace('\\', "/")
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join a child name onto a parent locator.
pub fn join_locator(parent: &str, name: &str) -> String {
    if parent == ROOT_LOCATOR {
        format!("/{name}")
    } else {
        format!("{parent}/{name}")
    }
}

/// Outcome of walking a logical path against the remote tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Locator of the deepest folder that matched ([`ROOT_LOCATOR`] if none)
    pub locator: String,
    /// How many leading segments matched
    pub matched: usize,
}

/// Resolve logical path segments against the remote folder hierarchy.
///
/// Builds a fresh tree at the root and descends one segment per level,
/// taking the first child whose name matches (duplicate siblings are
/// invisible past the first). When the walk reaches the edge of the eagerly
/// expanded depth, a fresh tree is rebuilt rooted at the current folder.
///
/// Stops at the first segment with no matching child and reports the locator
/// of the last match along with the matched count. Never fails on a missing
/// segment; callers that require a full match check `matched` themselves.
pub async fn resolve(
    listing: &dyn RemoteListing,
    segments: &[String],
) -> Result<Resolution, StoreError> {
    let mut level = build_tree(listing, ROOT_LOCATOR).await?;
    let mut locator = ROOT_LOCATOR.to_string();
    let mut matched = 0;
    // Levels descended since the tree under `locator` was last fetched.
    let mut cached_depth = 0;

    for segment in segments {
        if cached_depth == EXPANSION_DEPTH {
            level = build_tree(listing, &locator).await?;
            cached_depth = 0;
        }

        let Some(node) = level.into_iter().find(|n| n.name == *segment) else {
            break;
        };

        locator = node.locator;
        level = node.children;
        matched += 1;
        cached_depth += 1;
    }

    Ok(Resolution { locator, matched })
}
