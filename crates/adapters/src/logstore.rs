// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Crawl-log store collaborator contract.
//!
//! Crawl output (crawl logs, scope files) lives in an external object
//! store addressed by string keys. The engine only needs list-by-prefix
//! and fetch; the store's actual layout is not its concern.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from log-store operations
#[derive(Debug, Error)]
pub enum LogStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("no object for key {0}")]
    NotFound(String),
}

/// Adapter for the store holding crawl output.
#[async_trait]
pub trait LogStore: Send + Sync {
    /// Keys starting with `prefix`, in no particular order.
    async fn list(&self, prefix: &str) -> Result<Vec<String>, LogStoreError>;

    /// Raw content for one key.
    async fn fetch(&self, key: &str) -> Result<Vec<u8>, LogStoreError>;
}

/// Directory-backed log store. Keys are paths relative to the root.
///
/// Used for local runs and as the mount point when the real object store
/// is synced to disk.
#[derive(Debug, Clone)]
pub struct FsLogStore {
    root: PathBuf,
}

impl FsLogStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn walk(dir: &std::path::Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
        for dirent in std::fs::read_dir(dir)? {
            let path = dirent?.path();
            if path.is_dir() {
                Self::walk(&path, out)?;
            } else {
                out.push(path);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl LogStore for FsLogStore {
    async fn list(&self, prefix: &str) -> Result<Vec<String>, LogStoreError> {
        let mut files = Vec::new();
        if self.root.is_dir() {
            Self::walk(&self.root, &mut files)?;
        }
        let keys = files
            .into_iter()
            .filter_map(|p| {
                p.strip_prefix(&self.root).ok().map(|rel| rel.to_string_lossy().into_owned())
            })
            .filter(|key| key.starts_with(prefix))
            .collect();
        Ok(keys)
    }

    async fn fetch(&self, key: &str) -> Result<Vec<u8>, LogStoreError> {
        match tokio::fs::read(self.root.join(key)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(LogStoreError::NotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::{LogStore, LogStoreError};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    /// In-memory log store for tests.
    #[derive(Clone, Default)]
    pub struct FakeLogStore {
        objects: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
    }

    impl FakeLogStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn put(&self, key: &str, bytes: impl Into<Vec<u8>>) {
            self.objects.lock().insert(key.to_string(), bytes.into());
        }
    }

    #[async_trait]
    impl LogStore for FakeLogStore {
        async fn list(&self, prefix: &str) -> Result<Vec<String>, LogStoreError> {
            Ok(self
                .objects
                .lock()
                .keys()
                .filter(|k| k.starts_with(prefix))
                .cloned()
                .collect())
        }

        async fn fetch(&self, key: &str) -> Result<Vec<u8>, LogStoreError> {
            self.objects
                .lock()
                .get(key)
                .cloned()
                .ok_or_else(|| LogStoreError::NotFound(key.to_string()))
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeLogStore;

#[cfg(test)]
#[path = "logstore_tests.rs"]
mod tests;
