//! Filesystem-backed object store
//!
//! Mirrors the bucket layout under a local root: directories are prefixes,
//! files are objects. Used by the dev manifold and for verification runs
//! against a synced copy of the bucket.

use async_trait::async_trait;
use mlight_core::{ArtifactReader, DocumentSink, PrefixWalker, StoreError};
use std::io::ErrorKind;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub(crate) struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub(crate) fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl PrefixWalker for FsObjectStore {
    async fn children(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let dir = self.root.join(prefix);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(StoreError::io(prefix, err)),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|err| StoreError::io(prefix, err))?
        {
            let file_type = entry
                .file_type()
                .await
                .map_err(|err| StoreError::io(prefix, err))?;
            if file_type.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        // stable listing order keeps repeat runs byte-identical
        names.sort();
        Ok(names)
    }
}

#[async_trait]
impl ArtifactReader for FsObjectStore {
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        match tokio::fs::read_to_string(self.root.join(key)).await {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::io(key, err)),
        }
    }
}

#[async_trait]
impl DocumentSink for FsObjectStore {
    async fn put(&self, key: &str, body: &str) -> Result<(), StoreError> {
        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| StoreError::io(key, err))?;
        }
        tokio::fs::write(&path, body)
            .await
            .map_err(|err| StoreError::io(key, err))
    }
}
