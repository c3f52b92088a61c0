//! Schema migrations for the metadata database.

/// Migration scripts, applied in order by [`super::Database::migrate`].
///
/// A script's position in this slice is its version; never reorder or
/// edit an entry that has shipped, append a new one instead.
pub const MIGRATIONS: &[&str] = &[
    // v1: Initial schema - files table
    r#"
-- File metadata, one row per stored blob
CREATE TABLE files (
    file_id     TEXT PRIMARY KEY,       -- UUID assigned at upload
    file_name   TEXT NOT NULL,
    size        INTEGER NOT NULL,       -- Bytes, derived from the stored blob
    is_secret   INTEGER NOT NULL DEFAULT 0,
    owner_id    TEXT NOT NULL,
    created_at  TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at  TEXT,
    created_by  TEXT NOT NULL,
    updated_by  TEXT
);

CREATE INDEX idx_files_owner_id ON files(owner_id);
CREATE INDEX idx_files_created_at ON files(created_at);
"#,
    // v2: Grants table for per-file sharing
    r#"
-- Grants table, at most one grant per (file, user)
CREATE TABLE file_grants (
    file_id  TEXT NOT NULL REFERENCES files(file_id),
    user_id  TEXT NOT NULL,
    kind     TEXT NOT NULL,             -- 'EDITOR' or 'VIEWER'
    PRIMARY KEY (file_id, user_id)
);

CREATE INDEX idx_file_grants_user_id ON file_grants(user_id);
"#,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_list_is_populated() {
        assert!(!MIGRATIONS.is_empty());
    }

    #[test]
    fn test_first_migration_contains_files_table() {
        let first = MIGRATIONS[0];
        assert!(first.contains("CREATE TABLE files"));
        assert!(first.contains("file_id"));
        assert!(first.contains("file_name"));
        assert!(first.contains("is_secret"));
        assert!(first.contains("owner_id"));
    }

    #[test]
    fn test_second_migration_contains_grants_table() {
        let second = MIGRATIONS[1];
        assert!(second.contains("CREATE TABLE file_grants"));
        assert!(second.contains("PRIMARY KEY (file_id, user_id)"));
    }
}
