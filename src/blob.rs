//! Scoped binary blob references.
//!
//! The browser equivalent of this module is `URL.createObjectURL` /
//! `URL.revokeObjectURL`: an allocator hands out opaque `blob:` handles to
//! byte buffers, and the displaying caller releases each handle when the
//! view goes away. The contract is one handle per buffer, released exactly
//! once, never resolved after release — an unreleased handle keeps its
//! buffer alive indefinitely.
//!
//! [`BlobGuard`] wraps a handle with release-on-drop for callers that want
//! the release guaranteed on every exit path, error paths included.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlobError {
    #[error("unknown or already revoked blob url: {0}")]
    UnknownUrl(String),
}

/// Opaque handle to bytes held by a [`BlobStore`], rendered as `blob:N`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlobUrl(String);

impl BlobUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlobUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Default)]
struct StoreInner {
    next_id: u64,
    entries: HashMap<String, Arc<[u8]>>,
}

/// Allocator and registry for blob handles.
#[derive(Default)]
pub struct BlobStore {
    inner: Mutex<StoreInner>,
}

impl BlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a buffer and return a fresh handle to it.
    pub fn create(&self, bytes: Vec<u8>) -> BlobUrl {
        let mut inner = self.inner.lock().expect("blob store mutex poisoned");
        let url = format!("blob:{}", inner.next_id);
        inner.next_id += 1;
        inner.entries.insert(url.clone(), Arc::from(bytes));
        BlobUrl(url)
    }

    /// Register a buffer behind a guard that revokes on drop.
    pub fn create_scoped(&self, bytes: Vec<u8>) -> BlobGuard<'_> {
        BlobGuard {
            store: self,
            url: Some(self.create(bytes)),
        }
    }

    /// Look up the bytes behind a live handle.
    pub fn resolve(&self, url: &BlobUrl) -> Result<Arc<[u8]>, BlobError> {
        let inner = self.inner.lock().expect("blob store mutex poisoned");
        inner
            .entries
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| BlobError::UnknownUrl(url.to_string()))
    }

    /// Release a handle. Errors if it was never issued or already revoked —
    /// a double release is a caller bug worth surfacing.
    pub fn revoke(&self, url: &BlobUrl) -> Result<(), BlobError> {
        let mut inner = self.inner.lock().expect("blob store mutex poisoned");
        inner
            .entries
            .remove(url.as_str())
            .map(|_| ())
            .ok_or_else(|| BlobError::UnknownUrl(url.to_string()))
    }

    /// Number of live handles.
    pub fn len(&self) -> usize {
        self.inner.lock().expect("blob store mutex poisoned").entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// RAII wrapper around a blob handle: revokes on drop unless released
/// explicitly first.
pub struct BlobGuard<'a> {
    store: &'a BlobStore,
    url: Option<BlobUrl>,
}

impl BlobGuard<'_> {
    pub fn url(&self) -> &BlobUrl {
        // Only None after release(), which consumes self.
        self.url.as_ref().expect("blob guard already released")
    }

    /// Release now instead of at end of scope.
    pub fn release(mut self) -> Result<(), BlobError> {
        match self.url.take() {
            Some(url) => self.store.revoke(&url),
            None => Ok(()),
        }
    }
}

impl Drop for BlobGuard<'_> {
    fn drop(&mut self) {
        if let Some(url) = self.url.take() {
            // Drop in an already-revoked state is unreachable; ignore the
            // error rather than panic in a destructor.
            let _ = self.store.revoke(&url);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_and_resolve_roundtrip() {
        let store = BlobStore::new();
        let url = store.create(vec![1, 2, 3]);
        assert_eq!(store.resolve(&url).unwrap().as_ref(), &[1, 2, 3]);
    }

    #[test]
    fn handles_are_distinct() {
        let store = BlobStore::new();
        let a = store.create(vec![1]);
        let b = store.create(vec![1]);
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn revoked_handle_cannot_be_resolved() {
        let store = BlobStore::new();
        let url = store.create(vec![9]);
        store.revoke(&url).unwrap();
        assert!(store.resolve(&url).is_err());
    }

    #[test]
    fn double_revoke_errors() {
        let store = BlobStore::new();
        let url = store.create(vec![9]);
        store.revoke(&url).unwrap();
        assert!(matches!(store.revoke(&url), Err(BlobError::UnknownUrl(_))));
    }

    #[test]
    fn guard_revokes_on_drop() {
        let store = BlobStore::new();
        {
            let guard = store.create_scoped(vec![5, 6]);
            assert_eq!(store.resolve(guard.url()).unwrap().as_ref(), &[5, 6]);
            assert_eq!(store.len(), 1);
        }
        assert!(store.is_empty());
    }

    #[test]
    fn guard_explicit_release() {
        let store = BlobStore::new();
        let guard = store.create_scoped(vec![7]);
        guard.release().unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn resolved_bytes_outlive_revocation() {
        let store = BlobStore::new();
        let url = store.create(vec![1, 2, 3]);
        let bytes = store.resolve(&url).unwrap();
        store.revoke(&url).unwrap();
        // An outstanding Arc keeps the data readable; only the handle dies.
        assert_eq!(bytes.as_ref(), &[1, 2, 3]);
    }

    #[test]
    fn url_renders_with_blob_scheme() {
        let store = BlobStore::new();
        let url = store.create(vec![]);
        assert!(url.to_string().starts_with("blob:"));
    }
}
