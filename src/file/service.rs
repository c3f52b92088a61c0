//! File service for Cubby.
//!
//! This module provides the high-level file operations:
//! - Upload with quota enforcement and blob compensation
//! - Download with visibility checks
//! - Metadata create/update/delete, including secrecy transitions
//! - Listing with pagination and filters

use std::collections::HashSet;

use tokio::io::AsyncRead;
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::Database;
use crate::{CubbyError, Result};

use super::grant::GrantRepository;
use super::metadata::{File, FilePage, FileRepository, FileUpdate, ListParams, NewFile};
use super::quota::QuotaAccountant;
use super::storage::BlobStore;
use super::{DEFAULT_MAX_FILE_SIZE, MAX_FILENAME_LENGTH};

/// Result of a file download.
#[derive(Debug)]
pub struct Download {
    /// File metadata.
    pub file: File,
    /// Open handle on the blob.
    pub reader: tokio::fs::File,
    /// Blob length in bytes.
    pub length: u64,
}

/// File service coordinating the metadata, grant, and blob stores.
pub struct FileService<'a> {
    db: &'a Database,
    blobs: &'a BlobStore,
    quota: QuotaAccountant,
    max_upload_size: u64,
}

impl<'a> FileService<'a> {
    /// Create a new FileService.
    pub fn new(db: &'a Database, blobs: &'a BlobStore, quota: QuotaAccountant) -> Self {
        Self {
            db,
            blobs,
            quota,
            max_upload_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    /// Create a new FileService with a custom max upload size.
    pub fn with_max_upload_size(mut self, max_size: u64) -> Self {
        self.max_upload_size = max_size;
        self
    }

    /// Get the configured max upload size.
    pub fn max_upload_size(&self) -> u64 {
        self.max_upload_size
    }

    /// Register a new file record without touching the blob store.
    ///
    /// # Validation
    /// - Filename: non-empty, max 100 characters
    /// - Size: non-negative
    ///
    /// # Quota
    /// Fails with `QuotaExceeded` when the owner's usage plus `size`
    /// would exceed the configured limit; nothing is persisted then.
    pub async fn create(
        &self,
        owner: &str,
        filename: &str,
        size: i64,
        secret: bool,
    ) -> Result<File> {
        validate_filename(filename)?;
        if size < 0 {
            return Err(CubbyError::Validation(
                "size must not be negative".to_string(),
            ));
        }

        let file_id = Uuid::new_v4().to_string();
        self.create_with_id(&file_id, owner, filename, size, secret)
            .await
    }

    async fn create_with_id(
        &self,
        file_id: &str,
        owner: &str,
        filename: &str,
        size: i64,
        secret: bool,
    ) -> Result<File> {
        let repo = FileRepository::new(self.db.pool());
        let new_file = NewFile::new(file_id, filename, size, owner).with_secret(secret);

        let created = repo.create(&new_file, self.quota.limit_bytes()).await?;
        if !created {
            let usage = repo.usage_by_owner(owner).await?;
            return Err(CubbyError::QuotaExceeded {
                requested: size,
                available: self.quota.available(usage),
            });
        }

        repo.find_by_id(file_id, owner).await?.ok_or_else(|| {
            CubbyError::Database(format!("file {file_id} missing after insert"))
        })
    }

    /// Upload a file: stream the content into the blob store, then
    /// register the metadata.
    ///
    /// The blob is keyed by a freshly generated UUID, never by the
    /// caller-provided filename. If metadata registration fails the
    /// written blob is deleted again; when that compensating delete
    /// fails too, a warning names the orphaned blob id.
    pub async fn upload(
        &self,
        owner: &str,
        filename: &str,
        secret: bool,
        reader: impl AsyncRead + Unpin,
    ) -> Result<File> {
        validate_filename(filename)?;

        let file_id = Uuid::new_v4().to_string();
        let size = self
            .blobs
            .write(&file_id, reader, self.max_upload_size)
            .await?;

        match self
            .create_with_id(&file_id, owner, filename, size, secret)
            .await
        {
            Ok(file) => Ok(file),
            Err(e) => {
                if let Err(cleanup) = self.blobs.delete(&file_id).await {
                    warn!(
                        "failed to delete orphaned blob {} after create failure: {}",
                        file_id, cleanup
                    );
                }
                Err(e)
            }
        }
    }

    /// Download a file's content.
    ///
    /// Visibility is checked through the metadata store before the
    /// blob is opened.
    pub async fn download(&self, requester: &str, file_id: &str) -> Result<Download> {
        let file = self.find_by_id(requester, file_id).await?;
        let (reader, length) = self.blobs.open(&file.file_id).await?;

        Ok(Download {
            file,
            reader,
            length,
        })
    }

    /// Find a file visible to the requester.
    pub async fn find_by_id(&self, requester: &str, file_id: &str) -> Result<File> {
        FileRepository::new(self.db.pool())
            .find_by_id(file_id, requester)
            .await?
            .ok_or_else(|| CubbyError::NotFound("file".to_string()))
    }

    /// List files visible to the requester, newest first.
    pub async fn find_all(&self, requester: &str, params: &ListParams) -> Result<FilePage> {
        FileRepository::new(self.db.pool())
            .find_all(requester, params)
            .await
    }

    /// Update a file's metadata and grants in one transaction.
    ///
    /// # Permission Check
    /// The owner may apply any update. An editor may update only when
    /// the target state is secret. Everyone else, viewers included,
    /// gets `NotFound`.
    ///
    /// # Secrecy
    /// A transition to secret revokes every grant in the same
    /// transaction; the new visibility carries no membership at all.
    pub async fn update(
        &self,
        requester: &str,
        file_id: &str,
        update: &FileUpdate,
    ) -> Result<File> {
        validate_filename(&update.file_name)?;
        validate_grant_lists(update.visibility.editors(), update.visibility.viewers())?;

        let mut tx = self.db.pool().begin().await?;

        let found = FileRepository::get_tx(&mut tx, file_id)
            .await?
            .ok_or_else(|| CubbyError::NotFound("file".to_string()))?;
        if !can_view(&found, requester) {
            return Err(CubbyError::NotFound("file".to_string()));
        }

        let target_secret = update.visibility.is_secret();
        if !can_write(&found, requester, target_secret) {
            return Err(CubbyError::NotFound("file".to_string()));
        }

        if update
            .visibility
            .editors()
            .iter()
            .chain(update.visibility.viewers())
            .any(|user| *user == found.owner_id)
        {
            return Err(CubbyError::Validation(
                "the owner cannot appear in the grant lists".to_string(),
            ));
        }

        // Grants first, metadata second: a transition to secret must
        // never commit with stale grant rows.
        if target_secret {
            GrantRepository::revoke_all_tx(&mut tx, file_id).await?;
        } else {
            GrantRepository::replace_for_file_tx(
                &mut tx,
                file_id,
                update.visibility.editors(),
                update.visibility.viewers(),
            )
            .await?;
        }

        let rows =
            FileRepository::update_tx(&mut tx, file_id, &update.file_name, target_secret, requester)
                .await?;
        if rows == 0 {
            return Err(CubbyError::NotFound("file".to_string()));
        }

        let updated = FileRepository::get_tx(&mut tx, file_id)
            .await?
            .ok_or_else(|| CubbyError::Database(format!("file {file_id} missing after update")))?;

        tx.commit().await?;
        info!("file {} updated by {}", file_id, requester);
        Ok(updated)
    }

    /// Delete a file, its grants, and its blob.
    ///
    /// # Permission Check
    /// Owner only; everyone else gets `NotFound`.
    ///
    /// Metadata and grants go first in one transaction. The blob is
    /// removed afterwards; a failure there leaves an orphan blob and a
    /// warning, never a metadata row pointing at nothing.
    pub async fn delete(&self, owner: &str, file_id: &str) -> Result<()> {
        let mut tx = self.db.pool().begin().await?;

        let found = FileRepository::get_tx(&mut tx, file_id)
            .await?
            .ok_or_else(|| CubbyError::NotFound("file".to_string()))?;
        if found.owner_id != owner {
            return Err(CubbyError::NotFound("file".to_string()));
        }

        GrantRepository::revoke_all_tx(&mut tx, file_id).await?;
        let rows = FileRepository::delete_tx(&mut tx, file_id, owner).await?;
        if rows == 0 {
            return Err(CubbyError::NotFound("file".to_string()));
        }

        tx.commit().await?;
        info!("file {} deleted by owner {}", file_id, owner);

        if let Err(e) = self.blobs.delete(file_id).await {
            warn!("failed to delete blob for removed file {}: {}", file_id, e);
        }

        Ok(())
    }
}

fn validate_filename(filename: &str) -> Result<()> {
    if filename.trim().is_empty() {
        return Err(CubbyError::Validation(
            "filename must not be empty".to_string(),
        ));
    }
    if filename.chars().count() > MAX_FILENAME_LENGTH {
        return Err(CubbyError::Validation(format!(
            "filename must be at most {MAX_FILENAME_LENGTH} characters"
        )));
    }
    Ok(())
}

fn validate_grant_lists(editors: &[String], viewers: &[String]) -> Result<()> {
    let mut seen = HashSet::new();
    for user in editors.iter().chain(viewers) {
        if user.trim().is_empty() {
            return Err(CubbyError::Validation(
                "grantee id must not be empty".to_string(),
            ));
        }
        if !seen.insert(user.as_str()) {
            return Err(CubbyError::Validation(format!(
                "user {user} appears more than once in the grant lists"
            )));
        }
    }
    Ok(())
}

fn can_view(file: &File, requester: &str) -> bool {
    file.owner_id == requester
        || (!file.is_secret()
            && (file.editors().iter().any(|user| user == requester)
                || file.viewers().iter().any(|user| user == requester)))
}

/// Write access depends on the target secret value: the owner may
/// always write, an editor only when the file stays or becomes secret.
fn can_write(found: &File, requester: &str, target_secret: bool) -> bool {
    if found.owner_id == requester {
        return true;
    }
    target_secret && found.editors().iter().any(|user| user == requester)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::Visibility;
    use tempfile::TempDir;
    use tokio::io::AsyncReadExt;

    const LIMIT: i64 = 1_000_000;

    async fn setup() -> (Database, TempDir, BlobStore) {
        let db = Database::open_in_memory().await.unwrap();
        let temp_dir = TempDir::new().unwrap();
        let blobs = BlobStore::new(temp_dir.path()).unwrap();
        (db, temp_dir, blobs)
    }

    fn update_shared(name: &str, editors: &[&str], viewers: &[&str]) -> FileUpdate {
        FileUpdate {
            file_name: name.to_string(),
            visibility: Visibility::shared(
                editors.iter().map(|s| s.to_string()).collect(),
                viewers.iter().map(|s| s.to_string()).collect(),
            ),
        }
    }

    fn update_secret(name: &str) -> FileUpdate {
        FileUpdate {
            file_name: name.to_string(),
            visibility: Visibility::Private,
        }
    }

    async fn read_download(download: Download) -> Vec<u8> {
        let mut content = Vec::new();
        let mut reader = download.reader;
        reader.read_to_end(&mut content).await.unwrap();
        content
    }

    #[tokio::test]
    async fn test_create_and_find_by_id() {
        let (db, _temp_dir, blobs) = setup().await;
        let service = FileService::new(&db, &blobs, QuotaAccountant::new(LIMIT));

        let file = service.create("alice", "notes.txt", 42, false).await.unwrap();
        assert_eq!(file.file_name, "notes.txt");
        assert_eq!(file.size, 42);
        assert_eq!(file.owner_id, "alice");
        assert!(!file.is_secret());

        let found = service.find_by_id("alice", &file.file_id).await.unwrap();
        assert_eq!(found.file_id, file.file_id);
    }

    #[tokio::test]
    async fn test_create_invalid_filename() {
        let (db, _temp_dir, blobs) = setup().await;
        let service = FileService::new(&db, &blobs, QuotaAccountant::new(LIMIT));

        let result = service.create("alice", "", 1, false).await;
        assert!(matches!(result, Err(CubbyError::Validation(_))));

        let result = service.create("alice", "   ", 1, false).await;
        assert!(matches!(result, Err(CubbyError::Validation(_))));

        let long_name = "a".repeat(MAX_FILENAME_LENGTH + 1);
        let result = service.create("alice", &long_name, 1, false).await;
        assert!(matches!(result, Err(CubbyError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_negative_size() {
        let (db, _temp_dir, blobs) = setup().await;
        let service = FileService::new(&db, &blobs, QuotaAccountant::new(LIMIT));

        let result = service.create("alice", "a.txt", -1, false).await;
        assert!(matches!(result, Err(CubbyError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_over_quota() {
        let (db, _temp_dir, blobs) = setup().await;
        let service = FileService::new(&db, &blobs, QuotaAccountant::new(100));

        service.create("alice", "a.txt", 80, false).await.unwrap();

        let result = service.create("alice", "b.txt", 30, false).await;
        match result {
            Err(CubbyError::QuotaExceeded {
                requested,
                available,
            }) => {
                assert_eq!(requested, 30);
                assert_eq!(available, 20);
            }
            other => panic!("expected QuotaExceeded, got {other:?}"),
        }

        // The rejected create left usage unchanged
        let usage = FileRepository::new(db.pool())
            .usage_by_owner("alice")
            .await
            .unwrap();
        assert_eq!(usage, 80);
    }

    #[tokio::test]
    async fn test_upload_and_download_round_trip() {
        let (db, _temp_dir, blobs) = setup().await;
        let service = FileService::new(&db, &blobs, QuotaAccountant::new(LIMIT));
        let content = b"Hello, Cubby!".to_vec();

        let file = service
            .upload("alice", "hello.txt", false, &content[..])
            .await
            .unwrap();
        assert_eq!(file.size, content.len() as i64);
        assert!(blobs.exists(&file.file_id).await);

        let download = service.download("alice", &file.file_id).await.unwrap();
        assert_eq!(download.length, content.len() as u64);
        assert_eq!(download.file.file_name, "hello.txt");
        assert_eq!(read_download(download).await, content);
    }

    #[tokio::test]
    async fn test_upload_over_quota_removes_blob() {
        let (db, temp_dir, blobs) = setup().await;
        let service = FileService::new(&db, &blobs, QuotaAccountant::new(10));
        let content = vec![0u8; 50];

        let result = service.upload("alice", "big.bin", false, &content[..]).await;
        assert!(matches!(result, Err(CubbyError::QuotaExceeded { .. })));

        // The compensating delete removed the just-written blob
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_upload_over_max_size() {
        let (db, temp_dir, blobs) = setup().await;
        let service = FileService::new(&db, &blobs, QuotaAccountant::new(LIMIT))
            .with_max_upload_size(10);
        let content = vec![0u8; 50];

        let result = service.upload("alice", "big.bin", false, &content[..]).await;
        assert!(matches!(result, Err(CubbyError::Validation(_))));
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_upload_secret_file() {
        let (db, _temp_dir, blobs) = setup().await;
        let service = FileService::new(&db, &blobs, QuotaAccountant::new(LIMIT));

        let file = service
            .upload("alice", "diary.txt", true, &b"private"[..])
            .await
            .unwrap();
        assert!(file.is_secret());

        let result = service.find_by_id("bob", &file.file_id).await;
        assert!(matches!(result, Err(CubbyError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_download_not_visible() {
        let (db, _temp_dir, blobs) = setup().await;
        let service = FileService::new(&db, &blobs, QuotaAccountant::new(LIMIT));

        let file = service
            .upload("alice", "a.txt", false, &b"data"[..])
            .await
            .unwrap();

        let result = service.download("bob", &file.file_id).await;
        assert!(matches!(result, Err(CubbyError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_download_missing_blob() {
        let (db, _temp_dir, blobs) = setup().await;
        let service = FileService::new(&db, &blobs, QuotaAccountant::new(LIMIT));

        // Metadata without a blob behind it
        let file = service.create("alice", "ghost.txt", 4, false).await.unwrap();

        let result = service.download("alice", &file.file_id).await;
        assert!(matches!(result, Err(CubbyError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_filename_by_owner() {
        let (db, _temp_dir, blobs) = setup().await;
        let service = FileService::new(&db, &blobs, QuotaAccountant::new(LIMIT));

        let file = service.create("alice", "old.txt", 1, false).await.unwrap();
        let updated = service
            .update("alice", &file.file_id, &update_shared("new.txt", &[], &[]))
            .await
            .unwrap();

        assert_eq!(updated.file_name, "new.txt");
        assert_eq!(updated.updated_by.as_deref(), Some("alice"));
        assert!(updated.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_update_share_and_viewer_sees() {
        let (db, _temp_dir, blobs) = setup().await;
        let service = FileService::new(&db, &blobs, QuotaAccountant::new(LIMIT));

        let file = service.create("alice", "a.txt", 1, false).await.unwrap();
        let updated = service
            .update(
                "alice",
                &file.file_id,
                &update_shared("a.txt", &["bob"], &["carol"]),
            )
            .await
            .unwrap();
        assert_eq!(updated.editors(), ["bob".to_string()]);
        assert_eq!(updated.viewers(), ["carol".to_string()]);

        let seen = service.find_by_id("carol", &file.file_id).await.unwrap();
        assert_eq!(seen.file_id, file.file_id);
    }

    #[tokio::test]
    async fn test_update_viewer_cannot_mutate() {
        let (db, _temp_dir, blobs) = setup().await;
        let service = FileService::new(&db, &blobs, QuotaAccountant::new(LIMIT));

        let file = service.create("alice", "a.txt", 1, false).await.unwrap();
        service
            .update("alice", &file.file_id, &update_shared("a.txt", &[], &["bob"]))
            .await
            .unwrap();

        // Viewers cannot rename, share, or make secret
        let result = service
            .update("bob", &file.file_id, &update_shared("stolen.txt", &[], &["bob"]))
            .await;
        assert!(matches!(result, Err(CubbyError::NotFound(_))));

        let result = service
            .update("bob", &file.file_id, &update_secret("a.txt"))
            .await;
        assert!(matches!(result, Err(CubbyError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_editor_can_make_secret() {
        let (db, _temp_dir, blobs) = setup().await;
        let service = FileService::new(&db, &blobs, QuotaAccountant::new(LIMIT));

        let file = service.create("alice", "a.txt", 1, false).await.unwrap();
        service
            .update(
                "alice",
                &file.file_id,
                &update_shared("a.txt", &["bob"], &["carol"]),
            )
            .await
            .unwrap();

        let updated = service
            .update("bob", &file.file_id, &update_secret("a.txt"))
            .await
            .unwrap();
        assert!(updated.is_secret());

        // Every grant is gone, including the editor's own
        let grants = GrantRepository::new(db.pool())
            .list_by_file(&file.file_id)
            .await
            .unwrap();
        assert!(grants.is_empty());

        let result = service.find_by_id("bob", &file.file_id).await;
        assert!(matches!(result, Err(CubbyError::NotFound(_))));
        let result = service.find_by_id("carol", &file.file_id).await;
        assert!(matches!(result, Err(CubbyError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_editor_cannot_keep_shared() {
        let (db, _temp_dir, blobs) = setup().await;
        let service = FileService::new(&db, &blobs, QuotaAccountant::new(LIMIT));

        let file = service.create("alice", "a.txt", 1, false).await.unwrap();
        service
            .update("alice", &file.file_id, &update_shared("a.txt", &["bob"], &[]))
            .await
            .unwrap();

        // Only the owner may write a non-secret target state
        let result = service
            .update(
                "bob",
                &file.file_id,
                &update_shared("renamed.txt", &["bob"], &[]),
            )
            .await;
        assert!(matches!(result, Err(CubbyError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_secret_back_to_shared_by_owner() {
        let (db, _temp_dir, blobs) = setup().await;
        let service = FileService::new(&db, &blobs, QuotaAccountant::new(LIMIT));

        let file = service.create("alice", "a.txt", 1, true).await.unwrap();
        let updated = service
            .update("alice", &file.file_id, &update_shared("a.txt", &[], &["bob"]))
            .await
            .unwrap();
        assert!(!updated.is_secret());
        assert_eq!(updated.viewers(), ["bob".to_string()]);

        let seen = service.find_by_id("bob", &file.file_id).await.unwrap();
        assert_eq!(seen.file_id, file.file_id);
    }

    #[tokio::test]
    async fn test_update_overlapping_grant_lists() {
        let (db, _temp_dir, blobs) = setup().await;
        let service = FileService::new(&db, &blobs, QuotaAccountant::new(LIMIT));

        let file = service.create("alice", "a.txt", 1, false).await.unwrap();
        let result = service
            .update(
                "alice",
                &file.file_id,
                &update_shared("a.txt", &["bob"], &["bob"]),
            )
            .await;
        assert!(matches!(result, Err(CubbyError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_owner_in_grant_list() {
        let (db, _temp_dir, blobs) = setup().await;
        let service = FileService::new(&db, &blobs, QuotaAccountant::new(LIMIT));

        let file = service.create("alice", "a.txt", 1, false).await.unwrap();
        let result = service
            .update(
                "alice",
                &file.file_id,
                &update_shared("a.txt", &[], &["alice"]),
            )
            .await;
        assert!(matches!(result, Err(CubbyError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_missing_or_stranger() {
        let (db, _temp_dir, blobs) = setup().await;
        let service = FileService::new(&db, &blobs, QuotaAccountant::new(LIMIT));

        let result = service
            .update("alice", "missing", &update_shared("a.txt", &[], &[]))
            .await;
        assert!(matches!(result, Err(CubbyError::NotFound(_))));

        let file = service.create("alice", "a.txt", 1, false).await.unwrap();
        let result = service
            .update("mallory", &file.file_id, &update_shared("a.txt", &[], &[]))
            .await;
        assert!(matches!(result, Err(CubbyError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_by_owner_removes_everything() {
        let (db, _temp_dir, blobs) = setup().await;
        let service = FileService::new(&db, &blobs, QuotaAccountant::new(LIMIT));

        let file = service
            .upload("alice", "a.txt", false, &b"data"[..])
            .await
            .unwrap();
        service
            .update("alice", &file.file_id, &update_shared("a.txt", &[], &["bob"]))
            .await
            .unwrap();

        service.delete("alice", &file.file_id).await.unwrap();

        let result = service.find_by_id("alice", &file.file_id).await;
        assert!(matches!(result, Err(CubbyError::NotFound(_))));

        let grants = GrantRepository::new(db.pool())
            .list_by_file(&file.file_id)
            .await
            .unwrap();
        assert!(grants.is_empty());
        assert!(!blobs.exists(&file.file_id).await);
    }

    #[tokio::test]
    async fn test_delete_by_non_owner() {
        let (db, _temp_dir, blobs) = setup().await;
        let service = FileService::new(&db, &blobs, QuotaAccountant::new(LIMIT));

        let file = service
            .upload("alice", "a.txt", false, &b"data"[..])
            .await
            .unwrap();
        service
            .update("alice", &file.file_id, &update_shared("a.txt", &["bob"], &[]))
            .await
            .unwrap();

        // Even an editor cannot delete
        let result = service.delete("bob", &file.file_id).await;
        assert!(matches!(result, Err(CubbyError::NotFound(_))));

        let found = service.find_by_id("alice", &file.file_id).await.unwrap();
        assert_eq!(found.file_id, file.file_id);
        assert!(blobs.exists(&file.file_id).await);
    }

    #[tokio::test]
    async fn test_delete_missing() {
        let (db, _temp_dir, blobs) = setup().await;
        let service = FileService::new(&db, &blobs, QuotaAccountant::new(LIMIT));

        let result = service.delete("alice", "missing").await;
        assert!(matches!(result, Err(CubbyError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_find_all_lists_visible() {
        let (db, _temp_dir, blobs) = setup().await;
        let service = FileService::new(&db, &blobs, QuotaAccountant::new(LIMIT));

        let own = service.create("alice", "own.txt", 1, false).await.unwrap();
        let shared = service.create("bob", "shared.txt", 1, false).await.unwrap();
        service
            .update(
                "bob",
                &shared.file_id,
                &update_shared("shared.txt", &[], &["alice"]),
            )
            .await
            .unwrap();
        service.create("bob", "hidden.txt", 1, false).await.unwrap();

        let page = service
            .find_all("alice", &ListParams::default())
            .await
            .unwrap();
        assert_eq!(page.total_count, 2);
        let ids: Vec<&str> = page.files.iter().map(|f| f.file_id.as_str()).collect();
        assert!(ids.contains(&own.file_id.as_str()));
        assert!(ids.contains(&shared.file_id.as_str()));
    }
}
