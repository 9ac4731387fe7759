//! Object-store capability traits
//!
//! The engine only needs three narrow capabilities from the store: listing
//! immediate child prefixes, reading one object, and writing one object.
//! Real transports (bucket clients, filesystem mirrors) implement these
//! seams; [`MemoryStore`] backs the test suite.

use crate::error::StoreError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Lists the immediate child "directory" names under a prefix
///
/// No recursion; names are returned without the trailing delimiter.
#[async_trait]
pub trait PrefixWalker: Send + Sync {
    /// Immediate child prefix names under `prefix`
    async fn children(&self, prefix: &str) -> Result<Vec<String>, StoreError>;
}

/// Reads one object's textual content
#[async_trait]
pub trait ArtifactReader: Send + Sync {
    /// Content of `key`, or `Ok(None)` when the key is absent
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError>;
}

/// Persists one serialized document
#[async_trait]
pub trait DocumentSink: Send + Sync {
    /// Write `body` under `key`
    async fn put(&self, key: &str, body: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
struct MemoryInner {
    objects: BTreeMap<String, String>,
    writes: Vec<String>,
}

/// In-memory object store
///
/// Keys use `/` as the prefix delimiter, matching the bucket layout. Writes
/// are recorded so tests can assert on dry-run behavior.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
    /// Create an empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object
    pub fn insert(&self, key: impl Into<String>, body: impl Into<String>) {
        self.inner.lock().objects.insert(key.into(), body.into());
    }

    /// Fetch an object synchronously (test helper)
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.lock().objects.get(key).cloned()
    }

    /// Number of `put` calls observed
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.inner.lock().writes.len()
    }

    /// Keys written via `put`, in order
    #[must_use]
    pub fn written_keys(&self) -> Vec<String> {
        self.inner.lock().writes.clone()
    }
}

#[async_trait]
impl PrefixWalker for MemoryStore {
    async fn children(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let prefix = if prefix.ends_with('/') {
            prefix.to_string()
        } else {
            format!("{prefix}/")
        };
        let inner = self.inner.lock();
        let mut names = BTreeSet::new();
        for key in inner.objects.keys() {
            let Some(rest) = key.strip_prefix(&prefix) else {
                continue;
            };
            // only keys with a further delimiter form a child prefix
            if let Some((child, _)) = rest.split_once('/') {
                names.insert(child.to_string());
            }
        }
        Ok(names.into_iter().collect())
    }
}

#[async_trait]
impl ArtifactReader for MemoryStore {
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.inner.lock().objects.get(key).cloned())
    }
}

#[async_trait]
impl DocumentSink for MemoryStore {
    async fn put(&self, key: &str, body: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        inner.objects.insert(key.to_string(), body.to_string());
        inner.writes.push(key.to_string());
        Ok(())
    }
}
