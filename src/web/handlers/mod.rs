//! API handlers for the Web API.

pub mod file;

pub use file::*;

use crate::db::Database;
use crate::file::{BlobStore, FileService, QuotaAccountant};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Database,
    /// Blob store rooted at the configured storage path.
    pub blobs: BlobStore,
    /// Per-user storage quota.
    pub quota: QuotaAccountant,
    /// Maximum upload size in bytes.
    pub max_upload_size: u64,
}

impl AppState {
    /// Create a new application state.
    pub fn new(db: Database, blobs: BlobStore, quota: QuotaAccountant, max_upload_size: u64) -> Self {
        Self {
            db,
            blobs,
            quota,
            max_upload_size,
        }
    }

    /// Build a file service borrowing this state's stores.
    pub fn file_service(&self) -> FileService<'_> {
        FileService::new(&self.db, &self.blobs, self.quota).with_max_upload_size(self.max_upload_size)
    }
}
