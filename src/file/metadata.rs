//! File metadata types and repository for Cubby.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};

use crate::file::grant::{Grant, GrantKind, GrantRepository};
use crate::file::MAX_PAGE_SIZE;
use crate::{CubbyError, Result};

/// Access state of a file.
///
/// A secret file has no grant rows; making a file secret revokes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visibility {
    /// Only the owner can see the file.
    Private,
    /// The listed users can see the file; editors may also modify it
    /// under the secrecy rules.
    Shared {
        editors: Vec<String>,
        viewers: Vec<String>,
    },
}

impl Visibility {
    /// Shared visibility with the given grant lists.
    pub fn shared(editors: Vec<String>, viewers: Vec<String>) -> Self {
        Visibility::Shared { editors, viewers }
    }

    /// Whether this state is secret.
    pub fn is_secret(&self) -> bool {
        matches!(self, Visibility::Private)
    }

    /// Users holding editor grants (empty when private).
    pub fn editors(&self) -> &[String] {
        match self {
            Visibility::Shared { editors, .. } => editors,
            Visibility::Private => &[],
        }
    }

    /// Users holding viewer grants (empty when private).
    pub fn viewers(&self) -> &[String] {
        match self {
            Visibility::Shared { viewers, .. } => viewers,
            Visibility::Private => &[],
        }
    }
}

/// A file in the store.
#[derive(Debug, Clone)]
pub struct File {
    /// Unique file ID (UUID).
    pub file_id: String,
    /// Display filename.
    pub file_name: String,
    /// Size in bytes.
    pub size: i64,
    /// Owning user.
    pub owner_id: String,
    /// Access state, including grants when shared.
    pub visibility: Visibility,
    /// When the file was created.
    pub created_at: String,
    /// When the file was last modified.
    pub updated_at: Option<String>,
    /// User who created the record.
    pub created_by: String,
    /// User who last modified the record.
    pub updated_by: Option<String>,
}

impl File {
    /// Whether the file is secret.
    pub fn is_secret(&self) -> bool {
        self.visibility.is_secret()
    }

    /// Users holding editor grants.
    pub fn editors(&self) -> &[String] {
        self.visibility.editors()
    }

    /// Users holding viewer grants.
    pub fn viewers(&self) -> &[String] {
        self.visibility.viewers()
    }

    /// Get the created_at as DateTime<Utc>.
    pub fn created_at_datetime(&self) -> DateTime<Utc> {
        crate::datetime::parse_db_datetime(&self.created_at).unwrap_or_else(Utc::now)
    }
}

/// Raw database row for the files table.
#[derive(Debug, Clone, sqlx::FromRow)]
struct FileRow {
    file_id: String,
    file_name: String,
    size: i64,
    is_secret: bool,
    owner_id: String,
    created_at: String,
    updated_at: Option<String>,
    created_by: String,
    updated_by: Option<String>,
}

impl FileRow {
    fn into_file(self, grants: Vec<Grant>) -> File {
        let visibility = if self.is_secret {
            Visibility::Private
        } else {
            let mut editors = Vec::new();
            let mut viewers = Vec::new();
            for grant in grants {
                match grant.kind {
                    GrantKind::Editor => editors.push(grant.user_id),
                    GrantKind::Viewer => viewers.push(grant.user_id),
                }
            }
            Visibility::Shared { editors, viewers }
        };

        File {
            file_id: self.file_id,
            file_name: self.file_name,
            size: self.size,
            owner_id: self.owner_id,
            visibility,
            created_at: self.created_at,
            updated_at: self.updated_at,
            created_by: self.created_by,
            updated_by: self.updated_by,
        }
    }
}

/// Listing row carrying the window total alongside the file columns.
#[derive(sqlx::FromRow)]
struct FileListRow {
    #[sqlx(flatten)]
    row: FileRow,
    total_count: i64,
}

/// Data for creating a new file record.
#[derive(Debug, Clone)]
pub struct NewFile {
    /// Unique file ID (UUID).
    pub file_id: String,
    /// Display filename.
    pub file_name: String,
    /// Size in bytes.
    pub size: i64,
    /// Owning user.
    pub owner_id: String,
    /// User creating the record.
    pub created_by: String,
    /// Whether the file starts out secret.
    pub secret: bool,
}

impl NewFile {
    /// Create a NewFile owned and created by the same user, not secret.
    pub fn new(
        file_id: impl Into<String>,
        file_name: impl Into<String>,
        size: i64,
        owner_id: impl Into<String>,
    ) -> Self {
        let owner_id = owner_id.into();
        Self {
            file_id: file_id.into(),
            file_name: file_name.into(),
            size,
            created_by: owner_id.clone(),
            owner_id,
            secret: false,
        }
    }

    /// Set the secret flag.
    pub fn with_secret(mut self, secret: bool) -> Self {
        self.secret = secret;
        self
    }

    /// Set the creating user when it differs from the owner.
    pub fn with_created_by(mut self, created_by: impl Into<String>) -> Self {
        self.created_by = created_by.into();
        self
    }
}

/// Full-replacement update of a file's mutable metadata.
#[derive(Debug, Clone)]
pub struct FileUpdate {
    /// New display filename.
    pub file_name: String,
    /// New access state, including the full grant lists.
    pub visibility: Visibility,
}

/// Listing parameters.
#[derive(Debug, Clone, Default)]
pub struct ListParams {
    /// Zero-based page number.
    pub page: i64,
    /// Requested page size.
    pub size: i64,
    /// Case-sensitive filename substring filter.
    pub filename: Option<String>,
    /// Restrict to the requester's own secret files.
    pub secret_only: bool,
}

impl ListParams {
    /// Effective (page, size) after applying defaults and the page cap.
    pub fn normalized(&self) -> (i64, i64) {
        let page = self.page.max(0);
        let size = if self.size <= 0 || self.size > MAX_PAGE_SIZE {
            MAX_PAGE_SIZE
        } else {
            self.size
        };
        (page, size)
    }
}

/// One page of listing results.
#[derive(Debug, Clone)]
pub struct FilePage {
    /// Files on this page, newest first.
    pub files: Vec<File>,
    /// Effective page number.
    pub page: i64,
    /// Effective page size.
    pub size: i64,
    /// Total matching files across all pages.
    pub total_count: i64,
}

/// Repository for file metadata operations.
pub struct FileRepository<'a> {
    pool: &'a SqlitePool,
}

const FILE_COLUMNS: &str = "f.file_id, f.file_name, f.size, f.is_secret, f.owner_id, \
     f.created_at, f.updated_at, f.created_by, f.updated_by";

impl<'a> FileRepository<'a> {
    /// Create a new FileRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a file record, charging the owner's quota in the same statement.
    ///
    /// Returns false without inserting when the owner's usage plus the new
    /// size would exceed `quota_limit`.
    pub async fn create(&self, file: &NewFile, quota_limit: i64) -> Result<bool> {
        let result = sqlx::query(
            "INSERT INTO files (file_id, file_name, size, is_secret, owner_id, created_by)
             SELECT ?1, ?2, ?3, ?4, ?5, ?6
             WHERE (SELECT COALESCE(SUM(size), 0) FROM files WHERE owner_id = ?5) + ?3 <= ?7",
        )
        .bind(&file.file_id)
        .bind(&file.file_name)
        .bind(file.size)
        .bind(file.secret)
        .bind(&file.owner_id)
        .bind(&file.created_by)
        .bind(quota_limit)
        .execute(self.pool)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db) if db.is_unique_violation() => {
                CubbyError::Conflict(format!("file id {} already exists", file.file_id))
            }
            _ => CubbyError::Database(e.to_string()),
        })?;

        Ok(result.rows_affected() > 0)
    }

    /// Find a file visible to the requester.
    ///
    /// Visible means owned by the requester, or shared with them while not
    /// secret. Anything else is indistinguishable from absent.
    pub async fn find_by_id(&self, file_id: &str, requester: &str) -> Result<Option<File>> {
        let query = format!(
            "SELECT {FILE_COLUMNS} FROM files f
             WHERE f.file_id = ?1
               AND (f.owner_id = ?2
                    OR (f.is_secret = 0 AND EXISTS (
                          SELECT 1 FROM file_grants g
                          WHERE g.file_id = f.file_id AND g.user_id = ?2)))"
        );

        let row: Option<FileRow> = sqlx::query_as(&query)
            .bind(file_id)
            .bind(requester)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| CubbyError::Database(e.to_string()))?;

        match row {
            Some(row) => {
                let grants = if row.is_secret {
                    Vec::new()
                } else {
                    GrantRepository::new(self.pool)
                        .list_by_file(&row.file_id)
                        .await?
                };
                Ok(Some(row.into_file(grants)))
            }
            None => Ok(None),
        }
    }

    /// List files visible to the requester, newest first.
    pub async fn find_all(&self, requester: &str, params: &ListParams) -> Result<FilePage> {
        let (page, size) = params.normalized();
        let filename = params.filename.clone().unwrap_or_default();
        let offset = page * size;

        let query = if params.secret_only {
            format!(
                "SELECT {FILE_COLUMNS}, COUNT(*) OVER () AS total_count
                 FROM files f
                 WHERE f.owner_id = ?1 AND f.is_secret = 1
                   AND (?2 = '' OR instr(f.file_name, ?2) > 0)
                 ORDER BY f.created_at DESC, f.rowid DESC
                 LIMIT ?3 OFFSET ?4"
            )
        } else {
            format!(
                "SELECT {FILE_COLUMNS}, COUNT(*) OVER () AS total_count
                 FROM files f
                 WHERE (f.owner_id = ?1
                        OR (f.is_secret = 0 AND EXISTS (
                              SELECT 1 FROM file_grants g
                              WHERE g.file_id = f.file_id AND g.user_id = ?1)))
                   AND (?2 = '' OR instr(f.file_name, ?2) > 0)
                 ORDER BY f.created_at DESC, f.rowid DESC
                 LIMIT ?3 OFFSET ?4"
            )
        };

        let rows: Vec<FileListRow> = sqlx::query_as(&query)
            .bind(requester)
            .bind(&filename)
            .bind(size)
            .bind(offset)
            .fetch_all(self.pool)
            .await
            .map_err(|e| CubbyError::Database(e.to_string()))?;

        let total_count = rows.first().map(|r| r.total_count).unwrap_or(0);

        // Hydrate grants for the page's shared files in one query
        let shared_ids: Vec<String> = rows
            .iter()
            .filter(|r| !r.row.is_secret)
            .map(|r| r.row.file_id.clone())
            .collect();
        let mut grants_by_file = GrantRepository::new(self.pool)
            .list_by_files(&shared_ids)
            .await?;

        let files = rows
            .into_iter()
            .map(|r| {
                let grants = grants_by_file.remove(&r.row.file_id).unwrap_or_default();
                r.row.into_file(grants)
            })
            .collect();

        Ok(FilePage {
            files,
            page,
            size,
            total_count,
        })
    }

    /// Total bytes currently charged to an owner.
    pub async fn usage_by_owner(&self, owner_id: &str) -> Result<i64> {
        let usage: (i64,) =
            sqlx::query_as("SELECT COALESCE(SUM(size), 0) FROM files WHERE owner_id = ?")
                .bind(owner_id)
                .fetch_one(self.pool)
                .await
                .map_err(|e| CubbyError::Database(e.to_string()))?;

        Ok(usage.0)
    }

    /// Load a file with its grants inside a transaction, without any
    /// visibility filter. Authorization happens on the loaded snapshot.
    pub(crate) async fn get_tx(
        conn: &mut SqliteConnection,
        file_id: &str,
    ) -> Result<Option<File>> {
        let query = format!("SELECT {FILE_COLUMNS} FROM files f WHERE f.file_id = ?");
        let row: Option<FileRow> = sqlx::query_as(&query)
            .bind(file_id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| CubbyError::Database(e.to_string()))?;

        match row {
            Some(row) => {
                let grants = if row.is_secret {
                    Vec::new()
                } else {
                    GrantRepository::list_by_file_tx(&mut *conn, &row.file_id).await?
                };
                Ok(Some(row.into_file(grants)))
            }
            None => Ok(None),
        }
    }

    /// Write a file's mutable metadata inside a transaction.
    pub(crate) async fn update_tx(
        conn: &mut SqliteConnection,
        file_id: &str,
        file_name: &str,
        secret: bool,
        updated_by: &str,
    ) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE files SET file_name = ?2, is_secret = ?3,
                    updated_at = datetime('now'), updated_by = ?4
             WHERE file_id = ?1",
        )
        .bind(file_id)
        .bind(file_name)
        .bind(secret)
        .bind(updated_by)
        .execute(conn)
        .await
        .map_err(|e| CubbyError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }

    /// Delete a file record owned by `owner_id` inside a transaction.
    pub(crate) async fn delete_tx(
        conn: &mut SqliteConnection,
        file_id: &str,
        owner_id: &str,
    ) -> Result<u64> {
        let result = sqlx::query("DELETE FROM files WHERE file_id = ?1 AND owner_id = ?2")
            .bind(file_id)
            .bind(owner_id)
            .execute(conn)
            .await
            .map_err(|e| CubbyError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
