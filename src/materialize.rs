//! Idempotent folder chain materialization
//!
//! Creates the missing suffix of a logical path on the remote store, one
//! level per pass, re-resolving against a freshly built tree after every
//! creation. Restarting from a fresh tree after each create is what keeps
//! materialization idempotent when the store allows duplicate sibling names:
//! a folder another caller just created shows up in the rebuilt tree and is
//! matched instead of recreated. Two callers can still race past each other
//! before either creation is visible; that residual window is accepted, not
//! locked away.

use tracing::info;

use crate::path::{join_locator, resolve, ROOT_LOCATOR};
use crate::types::StoreError;
use crate::RemoteListing;

/// Ensure the folder chain for `segments` exists, creating missing levels.
///
/// Each pass resolves the full path against a fresh tree; at the first
/// unmatched segment it issues exactly one `create_directory` under the
/// deepest matched folder, then starts the next pass. Terminates when a pass
/// matches every segment and returns the locator of the last one.
///
/// At most one folder is created per pass, so `segments.len()` creations
/// plus one verifying pass always suffice. If a created folder never shows
/// up in a fresh listing the pass budget runs out and the call fails rather
/// than looping.
///
/// Creation errors propagate unchanged. Folders created before a failure are
/// left in place; they are legitimate directories, not rolled back.
pub async fn ensure_path(
    listing: &dyn RemoteListing,
    segments: &[String],
) -> Result<String, StoreError> {
    if segments.is_empty() {
        return Ok(ROOT_LOCATOR.to_string());
    }

    for _pass in 0..=segments.len() {
        let resolution = resolve(listing, segments).await?;
        if resolution.matched == segments.len() {
            return Ok(resolution.locator);
        }

        let target = join_locator(&resolution.locator, &segments[resolution.matched]);
        info!("creating remote folder {}", target);
        listing.create_directory(&target).await?;
    }

    Err(StoreError::Inconsistent(format!(
        "created folders under '{}' never appeared in a fresh listing",
        segments.join("/")
    )))
}
