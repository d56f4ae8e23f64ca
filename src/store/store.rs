//! Directory-backed store of parsed schema documents.

use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::engine::FileLoader;

use super::errors::{StoreError, StoreResult};

/// Loads and caches parsed schema documents from a root directory.
///
/// URIs are interpreted as relative paths under the root; absolute
/// paths and parent-directory segments are rejected. Documents are
/// parsed once and served from the cache afterwards.
pub struct DocumentStore {
    root_dir: PathBuf,
    cache: Mutex<HashMap<String, Value>>,
}

impl DocumentStore {
    /// Creates a store rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the store's root directory.
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Fetches the parsed document for a URI, reading and caching it on
    /// first use.
    pub fn get(&self, uri: &str) -> StoreResult<Value> {
        if let Some(document) = self.cache.lock().unwrap().get(uri) {
            return Ok(document.clone());
        }

        let path = self.resolve(uri)?;
        let content = fs::read_to_string(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        let document: Value =
            serde_json::from_str(&content).map_err(|source| StoreError::Parse {
                path: path.clone(),
                source,
            })?;

        self.cache
            .lock()
            .unwrap()
            .insert(uri.to_string(), document.clone());
        Ok(document)
    }

    /// Converts the store into the loader callback consumed by
    /// [`Evaluator::set_file_loader`].
    ///
    /// [`Evaluator::set_file_loader`]: crate::engine::Evaluator::set_file_loader
    pub fn into_loader(self) -> FileLoader {
        let store = Arc::new(self);
        Arc::new(move |uri: &str| store.get(uri).map_err(Into::into))
    }

    fn resolve(&self, uri: &str) -> StoreResult<PathBuf> {
        let relative = Path::new(uri);
        let escapes = relative.components().any(|component| {
            !matches!(component, Component::Normal(_) | Component::CurDir)
        });
        if escapes || uri.is_empty() {
            return Err(StoreError::OutsideRoot { uri: uri.into() });
        }
        Ok(self.root_dir.join(relative))
    }
}
