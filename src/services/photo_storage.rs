//! Photo file storage.
//!
//! A storage backend writes a file under a caller-chosen name. Names are
//! generated unique by the ingest service, so a backend never has to
//! coordinate concurrent writers.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::{Error, Result};

/// Destination for uploaded photo bytes.
#[async_trait]
pub trait PhotoStorage: Send + Sync {
    /// Write `data` under `name`. Fails with [`Error::Storage`] if the file
    /// cannot be written or `name` is already taken.
    async fn write_file(&self, name: &str, data: &[u8]) -> Result<()>;
}

/// Stores photos as plain files in one directory.
#[derive(Debug, Clone)]
pub struct DiskPhotoStorage {
    root: PathBuf,
}

impl DiskPhotoStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the storage directory if it does not exist yet.
    pub async fn ensure_root(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            Error::Storage(format!(
                "Failed to create directory {}: {}",
                self.root.display(),
                e
            ))
        })
    }
}

#[async_trait]
impl PhotoStorage for DiskPhotoStorage {
    async fn write_file(&self, name: &str, data: &[u8]) -> Result<()> {
        let has_separator = name.contains(|c: char| c == '/' || c == '\\');
        if name.is_empty() || has_separator || name == "." || name == ".." {
            return Err(Error::Storage(format!("Invalid storage name: {:?}", name)));
        }

        self.ensure_root().await?;

        let path = self.root.join(name);
        let write_err = |e: std::io::Error| {
            Error::Storage(format!("Failed to write {}: {}", path.display(), e))
        };

        // create_new refuses to clobber an existing file
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(write_err)?;
        file.write_all(data).await.map_err(write_err)?;
        file.flush().await.map_err(write_err)?;

        debug!(path = %path.display(), bytes = data.len(), "Stored photo");

        Ok(())
    }
}
