//! Blob storage for Cubby.
//!
//! This module provides physical blob storage:
//! - One blob per file, named by the file's UUID
//! - Streaming writes with an upload size cap
//! - Partial blobs removed when a write fails or is abandoned

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tracing::warn;

use crate::{CubbyError, Result};

const WRITE_BUF_SIZE: usize = 64 * 1024;

/// Unlinks `path` on drop until disarmed.
///
/// Covers both write errors and the caller dropping the write future
/// mid-stream, as happens when an uploading client disconnects.
struct PartialBlobGuard<'a> {
    path: &'a Path,
    armed: bool,
}

impl Drop for PartialBlobGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(e) = std::fs::remove_file(self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(
                    "failed to remove partial blob {}: {}",
                    self.path.display(),
                    e
                );
            }
        }
    }
}

/// Blob store holding one file per blob under a single directory.
///
/// Blobs are keyed by the file's UUID, so names never collide and the
/// metadata row is the only map from display name to content.
#[derive(Debug, Clone)]
pub struct BlobStore {
    /// Base directory for blob storage.
    root: PathBuf,
}

impl BlobStore {
    /// Create a new BlobStore with the given base directory.
    ///
    /// The directory will be created if it doesn't exist.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;

        Ok(Self { root })
    }

    /// Get the base directory of this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the on-disk path for a blob.
    pub fn blob_path(&self, file_id: &str) -> PathBuf {
        self.root.join(file_id)
    }

    /// Stream content into a new blob, enforcing `max_size`.
    ///
    /// Returns the number of bytes written. The partial blob is removed
    /// when the write fails and when this future is dropped before
    /// completion.
    pub async fn write(
        &self,
        file_id: &str,
        reader: impl AsyncRead + Unpin,
        max_size: u64,
    ) -> Result<i64> {
        let path = self.blob_path(file_id);
        let mut guard = PartialBlobGuard {
            path: &path,
            armed: true,
        };

        let size = Self::write_to(&path, reader, max_size).await?;

        guard.armed = false;
        Ok(size)
    }

    async fn write_to(
        path: &Path,
        mut reader: impl AsyncRead + Unpin,
        max_size: u64,
    ) -> Result<i64> {
        let mut file = fs::File::create(path).await?;
        let mut total: u64 = 0;
        let mut buf = vec![0u8; WRITE_BUF_SIZE];

        loop {
            let n = reader.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            total += n as u64;
            if total > max_size {
                return Err(CubbyError::Validation(format!(
                    "upload exceeds the maximum size of {max_size} bytes"
                )));
            }
            file.write_all(&buf[..n]).await?;
        }

        file.flush().await?;
        Ok(total as i64)
    }

    /// Open a blob for reading, returning the handle and its length.
    pub async fn open(&self, file_id: &str) -> Result<(fs::File, u64)> {
        let path = self.blob_path(file_id);
        let file = match fs::File::open(&path).await {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(CubbyError::NotFound(format!("blob {file_id}")))
            }
            Err(e) => return Err(e.into()),
        };
        let len = file.metadata().await?.len();

        Ok((file, len))
    }

    /// Delete a blob.
    ///
    /// Returns `true` if the blob was deleted, `false` if it didn't exist.
    pub async fn delete(&self, file_id: &str) -> Result<bool> {
        match fs::remove_file(self.blob_path(file_id)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Check if a blob exists.
    pub async fn exists(&self, file_id: &str) -> bool {
        fs::try_exists(self.blob_path(file_id)).await.unwrap_or(false)
    }
}
