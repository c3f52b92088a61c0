//! Grant types and repository for per-file sharing.
//!
//! A grant gives one user one kind of access to one file. The table's
//! primary key is (file_id, user_id), so a user holds at most one grant
//! per file.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use sqlx::{SqliteConnection, SqlitePool};

use crate::{CubbyError, Result};

/// Kind of access a grant confers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantKind {
    /// May read, and modify under the secrecy rules.
    Editor,
    /// May read only.
    Viewer,
}

impl GrantKind {
    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            GrantKind::Editor => "EDITOR",
            GrantKind::Viewer => "VIEWER",
        }
    }
}

impl fmt::Display for GrantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GrantKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "EDITOR" => Ok(GrantKind::Editor),
            "VIEWER" => Ok(GrantKind::Viewer),
            _ => Err(format!("unknown grant kind: {s}")),
        }
    }
}

impl TryFrom<String> for GrantKind {
    type Error = CubbyError;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse().map_err(CubbyError::Validation)
    }
}

/// A single grant row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Grant {
    /// File the grant applies to.
    pub file_id: String,
    /// User receiving access.
    pub user_id: String,
    /// Kind of access.
    #[sqlx(try_from = "String")]
    pub kind: GrantKind,
}

/// Repository for grant operations.
pub struct GrantRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> GrantRepository<'a> {
    /// Create a new GrantRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all grants for a file.
    pub async fn list_by_file(&self, file_id: &str) -> Result<Vec<Grant>> {
        let grants = sqlx::query_as::<_, Grant>(
            "SELECT file_id, user_id, kind FROM file_grants
             WHERE file_id = ? ORDER BY user_id",
        )
        .bind(file_id)
        .fetch_all(self.pool)
        .await
        .map_err(|e| CubbyError::Database(e.to_string()))?;

        Ok(grants)
    }

    /// List grants for a set of files, grouped by file id.
    ///
    /// Used to hydrate a listing page with a single query.
    pub async fn list_by_files(&self, file_ids: &[String]) -> Result<HashMap<String, Vec<Grant>>> {
        if file_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let placeholders: String = file_ids
            .iter()
            .map(|_| "?")
            .collect::<Vec<_>>()
            .join(",");
        let query = format!(
            "SELECT file_id, user_id, kind FROM file_grants
             WHERE file_id IN ({placeholders}) ORDER BY user_id"
        );

        let mut query_builder = sqlx::query_as::<_, Grant>(&query);
        for file_id in file_ids {
            query_builder = query_builder.bind(file_id);
        }

        let grants = query_builder
            .fetch_all(self.pool)
            .await
            .map_err(|e| CubbyError::Database(e.to_string()))?;

        let mut by_file: HashMap<String, Vec<Grant>> = HashMap::new();
        for grant in grants {
            by_file.entry(grant.file_id.clone()).or_default().push(grant);
        }

        Ok(by_file)
    }

    /// List all grants for a file inside a transaction.
    pub(crate) async fn list_by_file_tx(
        conn: &mut SqliteConnection,
        file_id: &str,
    ) -> Result<Vec<Grant>> {
        let grants = sqlx::query_as::<_, Grant>(
            "SELECT file_id, user_id, kind FROM file_grants
             WHERE file_id = ? ORDER BY user_id",
        )
        .bind(file_id)
        .fetch_all(conn)
        .await
        .map_err(|e| CubbyError::Database(e.to_string()))?;

        Ok(grants)
    }

    /// Remove every grant for a file inside a transaction.
    pub(crate) async fn revoke_all_tx(conn: &mut SqliteConnection, file_id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM file_grants WHERE file_id = ?")
            .bind(file_id)
            .execute(conn)
            .await
            .map_err(|e| CubbyError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }

    /// Replace the grant set of a file inside a transaction.
    ///
    /// Existing grants are removed first; the lists must already be
    /// validated as disjoint and free of the owner.
    pub(crate) async fn replace_for_file_tx(
        conn: &mut SqliteConnection,
        file_id: &str,
        editors: &[String],
        viewers: &[String],
    ) -> Result<()> {
        Self::revoke_all_tx(&mut *conn, file_id).await?;

        for (users, kind) in [(editors, GrantKind::Editor), (viewers, GrantKind::Viewer)] {
            for user_id in users {
                sqlx::query("INSERT INTO file_grants (file_id, user_id, kind) VALUES (?, ?, ?)")
                    .bind(file_id)
                    .bind(user_id)
                    .bind(kind.as_str())
                    .execute(&mut *conn)
                    .await
                    .map_err(|e| CubbyError::Database(e.to_string()))?;
            }
        }

        Ok(())
    }
}
