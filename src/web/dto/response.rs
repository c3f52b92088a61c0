//! Response DTOs for the Web API.

use serde::Serialize;
use utoipa::ToSchema;

use crate::datetime;
use crate::file::{File, FilePage};

/// A file in API responses.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileResponse {
    /// File ID.
    pub file_id: String,
    /// Display filename.
    pub filename: String,
    /// Size in bytes.
    pub size: i64,
    /// Whether the file is secret (owner-only).
    pub secret: bool,
    /// Owning user.
    pub owner: String,
    /// Users granted edit access.
    pub editors: Vec<String>,
    /// Users granted read access.
    pub viewers: Vec<String>,
    /// Creation timestamp (RFC3339).
    pub created_at: String,
    /// Last update timestamp (RFC3339).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// User who created the record.
    pub created_by: String,
    /// User who last updated the record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

impl From<File> for FileResponse {
    fn from(file: File) -> Self {
        Self {
            secret: file.is_secret(),
            editors: file.editors().to_vec(),
            viewers: file.viewers().to_vec(),
            file_id: file.file_id,
            filename: file.file_name,
            size: file.size,
            owner: file.owner_id,
            created_at: datetime::to_rfc3339(&file.created_at),
            updated_at: file.updated_at.as_deref().map(datetime::to_rfc3339),
            created_by: file.created_by,
            updated_by: file.updated_by,
        }
    }
}

/// One page of file listing results.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilePageResponse {
    /// Effective page size.
    pub size: i64,
    /// Total matching files across all pages.
    pub total_elements: i64,
    /// Effective page number.
    pub page: i64,
    /// URL of the next page, present only when this page is full.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    /// Files on this page.
    pub content: Vec<FileResponse>,
}

impl From<FilePage> for FilePageResponse {
    fn from(page: FilePage) -> Self {
        let content: Vec<FileResponse> = page.files.into_iter().map(FileResponse::from).collect();
        // A partial page is the last one; only a full page advertises a successor.
        let next = if content.len() as i64 == page.size {
            Some(format!(
                "/api/v1/files?page={}&size={}",
                page.page + 1,
                page.size
            ))
        } else {
            None
        };
        Self {
            size: page.size,
            total_elements: page.total_count,
            page: page.page,
            next,
            content,
        }
    }
}

/// Response for a completed upload.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// File ID of the stored file.
    pub file_id: String,
    /// Display filename.
    pub filename: String,
    /// Owning user.
    pub owner_id: String,
}

impl From<File> for UploadResponse {
    fn from(file: File) -> Self {
        Self {
            file_id: file.file_id,
            filename: file.file_name,
            owner_id: file.owner_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::Visibility;

    fn sample_file() -> File {
        File {
            file_id: "f-1".to_string(),
            file_name: "notes.txt".to_string(),
            size: 42,
            owner_id: "alice".to_string(),
            visibility: Visibility::shared(
                vec!["bob".to_string()],
                vec!["carol".to_string()],
            ),
            created_at: "2024-01-15 10:30:00".to_string(),
            updated_at: None,
            created_by: "alice".to_string(),
            updated_by: None,
        }
    }

    #[test]
    fn test_file_response_serialization() {
        let response = FileResponse::from(sample_file());
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["fileId"], "f-1");
        assert_eq!(json["filename"], "notes.txt");
        assert_eq!(json["size"], 42);
        assert_eq!(json["secret"], false);
        assert_eq!(json["owner"], "alice");
        assert_eq!(json["editors"][0], "bob");
        assert_eq!(json["viewers"][0], "carol");
        assert_eq!(json["createdAt"], "2024-01-15T10:30:00Z");
        assert_eq!(json["createdBy"], "alice");
        assert!(json.get("updatedAt").is_none());
        assert!(json.get("updatedBy").is_none());
    }

    #[test]
    fn test_file_response_secret_has_empty_lists() {
        let mut file = sample_file();
        file.visibility = Visibility::Private;
        let response = FileResponse::from(file);
        assert!(response.secret);
        assert!(response.editors.is_empty());
        assert!(response.viewers.is_empty());
    }

    #[test]
    fn test_file_response_updated_fields() {
        let mut file = sample_file();
        file.updated_at = Some("2024-02-01 08:00:00".to_string());
        file.updated_by = Some("bob".to_string());
        let json = serde_json::to_value(FileResponse::from(file)).unwrap();
        assert_eq!(json["updatedAt"], "2024-02-01T08:00:00Z");
        assert_eq!(json["updatedBy"], "bob");
    }

    #[test]
    fn test_page_response_full_page_has_next() {
        let page = FilePage {
            files: vec![sample_file(), sample_file()],
            page: 0,
            size: 2,
            total_count: 5,
        };
        let response = FilePageResponse::from(page);
        assert_eq!(response.next.as_deref(), Some("/api/v1/files?page=1&size=2"));
        assert_eq!(response.total_elements, 5);
        assert_eq!(response.content.len(), 2);
    }

    #[test]
    fn test_page_response_partial_page_has_no_next() {
        let page = FilePage {
            files: vec![sample_file()],
            page: 2,
            size: 50,
            total_count: 101,
        };
        let response = FilePageResponse::from(page);
        assert!(response.next.is_none());

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("next").is_none());
        assert_eq!(json["totalElements"], 101);
        assert_eq!(json["page"], 2);
    }

    #[test]
    fn test_upload_response_serialization() {
        let response = UploadResponse::from(sample_file());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["fileId"], "f-1");
        assert_eq!(json["filename"], "notes.txt");
        assert_eq!(json["ownerId"], "alice");
    }
}
