//! In-memory `RemoteListing` used by unit tests
//!
//! Mirrors the backing-store contract the crate is written against: a flat
//! directory graph addressed by locators, duplicate sibling names allowed,
//! listing order preserved. Records every `create_directory` call so tests
//! can assert on creation counts.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::path::ROOT_LOCATOR;
use crate::types::{RemoteEntry, StoreError};
use crate::RemoteListing;

#[derive(Default)]
struct State {
    /// Directory locator -> its entries, in insertion (listing) order
    dirs: HashMap<String, Vec<RemoteEntry>>,
    /// File locator -> content
    files: HashMap<String, Vec<u8>>,
    /// Locators passed to create_directory, in call order
    created: Vec<String>,
    /// Remaining create_directory calls allowed before forced failure
    creates_left: Option<usize>,
}

/// Shared-state in-memory listing; clones address the same store.
#[derive(Clone)]
pub struct MemoryListing {
    state: Arc<Mutex<State>>,
}

impl MemoryListing {
    pub fn new() -> Self {
        let mut state = State::default();
        state.dirs.insert(ROOT_LOCATOR.to_string(), Vec::new());
        Self { state: Arc::new(Mutex::new(state)) }
    }

    /// Add a directory under `parent`, returning its locator.
    pub fn add_dir(&self, parent: &str, name: &str) -> String {
        let locator = crate::path::join_locator(parent, name);
        self.add_dir_with_locator(parent, name, &locator);
        locator
    }

    /// Add a directory with an explicit locator, so tests can model
    /// duplicate-named siblings (same name, distinct locators).
    pub fn add_dir_with_locator(&self, parent: &str, name: &str, locator: &str) {
        let mut state = self.state.lock().unwrap();
        state
            .dirs
            .get_mut(parent)
            .expect("parent directory must exist")
            .push(RemoteEntry::directory(name, locator));
        state.dirs.insert(locator.to_string(), Vec::new());
    }

    /// Add a file under `parent`, returning its locator.
    pub fn add_file(&self, parent: &str, name: &str, content: &[u8]) -> String {
        let locator = crate::path::join_locator(parent, name);
        self.add_file_with_locator(parent, name, &locator, content);
        locator
    }

    /// Add a file with an explicit locator (sharing-URL tests address files
    /// by bare IDs rather than joined paths).
    pub fn add_file_with_locator(&self, parent: &str, name: &str, locator: &str, content: &[u8]) {
        let mut state = self.state.lock().unwrap();
        let entry = RemoteEntry::file(name, locator, content.len() as u64);
        state
            .dirs
            .get_mut(parent)
            .expect("parent directory must exist")
            .push(entry);
        state.files.insert(locator.to_string(), content.to_vec());
    }

    /// Locators passed to `create_directory` so far, in call order.
    pub fn created_dirs(&self) -> Vec<String> {
        self.state.lock().unwrap().created.clone()
    }

    /// Let the next `budget` creations succeed, then fail the rest.
    pub fn fail_creates_after(&self, budget: usize) {
        self.state.lock().unwrap().creates_left = Some(budget);
    }
}

#[async_trait]
impl RemoteListing for MemoryListing {
    async fn list(&self, locator: &str) -> Result<Vec<RemoteEntry>, StoreError> {
        let state = self.state.lock().unwrap();
        state
            .dirs
            .get(locator)
            .cloned()
            .ok_or_else(|| StoreError::Transport(format!("no such directory: {locator}")))
    }

    async fn create_directory(&self, locator: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();

        if let Some(left) = state.creates_left {
            if left == 0 {
                return Err(StoreError::Transport(format!("create failed: {locator}")));
            }
            state.creates_left = Some(left - 1);
        }

        let (parent, name) = split_parent(locator);
        let entry = RemoteEntry::directory(name, locator);
        state
            .dirs
            .get_mut(parent)
            .ok_or_else(|| StoreError::Transport(format!("no such directory: {parent}")))?
            .push(entry);
        state.dirs.insert(locator.to_string(), Vec::new());
        state.created.push(locator.to_string());
        Ok(())
    }

    async fn get(&self, locator: &str) -> Result<Vec<u8>, StoreError> {
        let state = self.state.lock().unwrap();
        state
            .files
            .get(locator)
            .cloned()
            .ok_or_else(|| StoreError::FileNotFound(locator.to_string()))
    }

    async fn put(&self, locator: &str, content: &[u8]) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        let (parent, name) = split_parent(locator);
        let entry = RemoteEntry::file(name, locator, content.len() as u64);
        state
            .dirs
            .get_mut(parent)
            .ok_or_else(|| StoreError::Transport(format!("no such directory: {parent}")))?
            .push(entry);
        state.files.insert(locator.to_string(), content.to_vec());
        Ok(())
    }

    async fn delete(&self, locator: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap();
        state
            .files
            .remove(locator)
            .ok_or_else(|| StoreError::FileNotFound(locator.to_string()))?;
        for entries in state.dirs.values_mut() {
            entries.retain(|e| e.locator != locator);
        }
        Ok(())
    }
}

/// Split a joined locator into (parent locator, entry name).
fn split_parent(locator: &str) -> (&str, &str) {
    match locator.rfind('/') {
        Some(0) => (ROOT_LOCATOR, &locator[1..]),
        Some(pos) => (&locator[..pos], &locator[pos + 1..]),
        None => (ROOT_LOCATOR, locator),
    }
}
