//! Durable directory-backed store.
//!
//! One file per key, named by the lowercase hex SHA-256 of the key bytes so
//! names stay 64 characters whatever the key length. Writes go through a
//! temporary file in the same directory and are renamed into place, so
//! readers never observe a partially written record.

use super::backend::{BackendError, MetadataBackend};
use async_trait::async_trait;
use bytes::Bytes;
use sha2::{Digest, Sha256};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Metadata backend persisting records under a root directory.
#[derive(Debug, Clone)]
pub struct FsBackend {
    name: String,
    root: PathBuf,
}

impl FsBackend {
    /// Open a store rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, BackendError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        debug!("Filesystem metadata store at {}", root.display());
        Ok(Self {
            name: "filesystem".to_string(),
            root,
        })
    }

    /// Override the name reported in logs.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// The directory records are stored in.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &[u8]) -> PathBuf {
        self.root.join(file_name(key))
    }
}

fn file_name(key: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key);
    hex::encode(hasher.finalize())
}

#[async_trait]
impl MetadataBackend for FsBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get(&self, key: &[u8]) -> Result<Option<Bytes>, BackendError> {
        match tokio::fs::read(self.path_for(key)).await {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn put(&self, key: &[u8], value: Bytes) -> Result<(), BackendError> {
        let root = self.root.clone();
        let target = self.path_for(key);

        tokio::task::spawn_blocking(move || -> Result<(), BackendError> {
            let mut tmp = tempfile::NamedTempFile::new_in(&root)?;
            tmp.write_all(&value)?;
            tmp.as_file().sync_all()?;
            tmp.persist(&target).map_err(|e| BackendError::Io(e.error))?;
            Ok(())
        })
        .await
        .map_err(|e| BackendError::Unavailable(format!("write task failed: {e}")))?
    }
}
