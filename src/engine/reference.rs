//! Reference resolution for `$ref`.
//!
//! A `$ref` value is a URI with a fragment. Fragment-only refs (`#/a/b`)
//! resolve by walking the bound root schema key-by-key through the
//! fragment segments. Refs with a non-empty URI require the registered
//! file loader; the remote document is evaluated by a fresh nested
//! evaluator bound to the remote root, so `$ref`s inside the remote
//! document resolve relative to the remote root rather than the original
//! one. The nested evaluator inherits draft, reporting mode, format
//! registry, and loader; its accumulated errors and warnings are
//! absorbed into the outer sink.

use std::sync::Arc;

use serde_json::Value;

use super::errors::{EvalError, EvalResult};
use super::evaluator::Evaluator;

/// Callback that fetches and parses a remote schema document by URI.
///
/// The engine performs no I/O itself; a loader may read the filesystem,
/// a cache, or the network, and blocks the validation while doing so.
pub type FileLoader =
    Arc<dyn Fn(&str) -> Result<Value, Box<dyn std::error::Error + Send + Sync>>>;

impl Evaluator {
    /// Validates data against the target of a `$ref`, short-circuiting
    /// every sibling keyword.
    pub(super) fn validate_reference(
        &mut self,
        data: &Value,
        reference: &Value,
    ) -> EvalResult<bool> {
        let reference = reference.as_str().ok_or_else(|| {
            EvalError::InvalidSchema(format!("$ref must be a string, got '{}'", reference))
        })?;

        // Fragment-only: resolve within the bound root schema.
        if let Some(fragment) = reference.strip_prefix('#') {
            let root = Arc::clone(&self.root);
            let target = walk_schema_from_root(&root, reference, fragment)?;
            return self.validate_node(data, target);
        }

        let (uri, fragment) = reference.split_once('#').ok_or_else(|| {
            EvalError::InvalidSchema(format!(
                "$ref '{}' could not be handled because it didn't start with '#'",
                reference
            ))
        })?;

        let loader = self
            .file_loader
            .clone()
            .ok_or_else(|| EvalError::FileLoaderMissing { uri: uri.into() })?;
        let remote_root = loader(uri).map_err(|error| EvalError::RemoteLoadFailed {
            uri: uri.into(),
            reason: error.to_string(),
        })?;

        // Fresh evaluator bound to the remote root: nested refs resolve
        // against the remote document.
        let mut nested = Evaluator::with_mode(remote_root, self.draft, self.sink.mode());
        nested.formats = self.formats.clone();
        nested.file_loader = Some(loader);

        let remote_arc = Arc::clone(&nested.root);
        let outcome = walk_schema_from_root(&remote_arc, reference, fragment)
            .and_then(|target| nested.validate_node(data, target));

        self.sink.absorb(nested.sink);
        outcome
    }
}

/// Walks a schema document key-by-key through the fragment segments.
fn walk_schema_from_root<'a>(
    root: &'a Value,
    reference: &str,
    fragment: &str,
) -> EvalResult<&'a Value> {
    let mut node = root;
    for segment in fragment.split('/').filter(|segment| !segment.is_empty()) {
        node = node
            .as_object()
            .and_then(|object| object.get(segment))
            .ok_or_else(|| {
                EvalError::InvalidSchema(format!(
                    "$ref '{}' does not resolve: no node at segment '{}'",
                    reference, segment
                ))
            })?;
    }
    Ok(node)
}
