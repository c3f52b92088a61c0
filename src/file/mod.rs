//! File management module for Cubby.
//!
//! This module provides multi-tenant file storage including:
//! - File metadata with ownership and audit fields
//! - Per-user sharing grants (editor/viewer)
//! - Secret files hidden from everyone but the owner
//! - Per-owner storage quotas
//! - Blob storage with UUID naming

mod grant;
mod metadata;
mod quota;
mod service;
mod storage;

pub use grant::{Grant, GrantKind, GrantRepository};
pub use metadata::{File, FilePage, FileRepository, FileUpdate, ListParams, NewFile, Visibility};
pub use quota::{parse_limit, QuotaAccountant};
pub use service::{Download, FileService};
pub use storage::BlobStore;

/// Maximum length for filename (in characters).
pub const MAX_FILENAME_LENGTH: usize = 100;

/// Maximum listing page size; larger or missing values fall back to this.
pub const MAX_PAGE_SIZE: i64 = 50;

/// Default maximum upload size (10MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;
