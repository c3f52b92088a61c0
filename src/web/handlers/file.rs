//! Handlers for the file endpoints.

use axum::{
    body::Body,
    extract::{Multipart, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::Response,
    Json,
};
use futures::TryStreamExt;
use std::io::SeekFrom;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::{ReaderStream, StreamReader};
use utoipa;

use crate::file::Download;
use crate::web::dto::{
    FilePageResponse, FileResponse, ListQuery, UpdateFileRequest, UploadResponse, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::RequesterId;

/// Build the Content-Disposition value for a download.
///
/// Filenames are attacker-controlled and end up inside a header, so the
/// quoted fallback strips control characters (CR and LF would split the
/// header) and replaces quotes and backslashes. Names that need more than
/// plain ASCII are additionally carried in an RFC 5987 `filename*`
/// parameter so clients can restore the original.
fn content_disposition_header(filename: &str) -> String {
    let plain_ascii = filename.is_ascii()
        && !filename
            .chars()
            .any(|c| c.is_control() || c == '"' || c == '\\');

    if plain_ascii {
        return format!("attachment; filename=\"{}\"", filename);
    }

    let fallback: String = filename
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| if c == '"' || c == '\\' { '_' } else { c })
        .collect();

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(filename)
    )
}

/// Byte range requested for a download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RangeSpec {
    /// Serve the whole blob.
    Full,
    /// Serve the inclusive byte window.
    Partial { start: u64, end: u64 },
    /// The range cannot be satisfied for this blob.
    Unsatisfiable,
}

/// Parse a Range header value against a blob of `total` bytes.
///
/// Only single byte ranges are honored. Multi-range and malformed headers
/// fall back to serving the whole blob; syntactically valid ranges outside
/// the blob are unsatisfiable.
fn parse_range(header: &str, total: u64) -> RangeSpec {
    let Some(spec) = header.strip_prefix("bytes=") else {
        return RangeSpec::Full;
    };
    let spec = spec.trim();
    if spec.contains(',') {
        return RangeSpec::Full;
    }
    let Some((start_part, end_part)) = spec.split_once('-') else {
        return RangeSpec::Full;
    };

    if start_part.is_empty() {
        // Suffix range: the last N bytes.
        let Ok(suffix) = end_part.parse::<u64>() else {
            return RangeSpec::Full;
        };
        if suffix == 0 || total == 0 {
            return RangeSpec::Unsatisfiable;
        }
        return RangeSpec::Partial {
            start: total.saturating_sub(suffix),
            end: total - 1,
        };
    }

    let Ok(start) = start_part.parse::<u64>() else {
        return RangeSpec::Full;
    };
    let end = if end_part.is_empty() {
        total.saturating_sub(1)
    } else {
        match end_part.parse::<u64>() {
            Ok(end) => end.min(total.saturating_sub(1)),
            Err(_) => return RangeSpec::Full,
        }
    };

    if total == 0 || start >= total || start > end {
        return RangeSpec::Unsatisfiable;
    }

    RangeSpec::Partial { start, end }
}

/// GET /api/v1/files - List files visible to the requester.
#[utoipa::path(
    get,
    path = "/files",
    tag = "files",
    params(ListQuery),
    responses(
        (status = 200, description = "One page of files", body = FilePageResponse),
        (status = 401, description = "Missing requester id")
    )
)]
pub async fn list_files(
    State(state): State<Arc<AppState>>,
    RequesterId(requester): RequesterId,
    Query(query): Query<ListQuery>,
) -> Result<Json<FilePageResponse>, ApiError> {
    let page = state
        .file_service()
        .find_all(&requester, &query.into_params())
        .await?;

    Ok(Json(FilePageResponse::from(page)))
}

/// GET /api/v1/files/:id - Get file metadata.
#[utoipa::path(
    get,
    path = "/files/{id}",
    tag = "files",
    params(
        ("id" = String, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File metadata", body = FileResponse),
        (status = 401, description = "Missing requester id"),
        (status = 404, description = "File not found or not visible")
    )
)]
pub async fn get_file(
    State(state): State<Arc<AppState>>,
    RequesterId(requester): RequesterId,
    Path(file_id): Path<String>,
) -> Result<Json<FileResponse>, ApiError> {
    let file = state.file_service().find_by_id(&requester, &file_id).await?;

    Ok(Json(FileResponse::from(file)))
}

/// PUT /api/v1/files/:id - Update file metadata and grants.
#[utoipa::path(
    put,
    path = "/files/{id}",
    tag = "files",
    params(
        ("id" = String, Path, description = "File ID")
    ),
    request_body = UpdateFileRequest,
    responses(
        (status = 200, description = "Updated file metadata", body = FileResponse),
        (status = 401, description = "Missing requester id"),
        (status = 404, description = "File not found or not writable"),
        (status = 422, description = "Invalid update")
    )
)]
pub async fn update_file(
    State(state): State<Arc<AppState>>,
    RequesterId(requester): RequesterId,
    Path(file_id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateFileRequest>,
) -> Result<Json<FileResponse>, ApiError> {
    let update = payload.into_update();
    let file = state
        .file_service()
        .update(&requester, &file_id, &update)
        .await?;

    Ok(Json(FileResponse::from(file)))
}

/// DELETE /api/v1/files/:id - Delete a file.
#[utoipa::path(
    delete,
    path = "/files/{id}",
    tag = "files",
    params(
        ("id" = String, Path, description = "File ID")
    ),
    responses(
        (status = 204, description = "File deleted"),
        (status = 401, description = "Missing requester id"),
        (status = 404, description = "File not found or not owned by the requester")
    )
)]
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    RequesterId(requester): RequesterId,
    Path(file_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.file_service().delete(&requester, &file_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/uploads - Upload a file.
///
/// Request body: multipart/form-data with a "file" part and an optional
/// "secret" text part. The "secret" part must precede "file"; the file part
/// is streamed to the blob store as it arrives.
#[utoipa::path(
    post,
    path = "/uploads",
    tag = "files",
    responses(
        (status = 201, description = "File uploaded", body = UploadResponse),
        (status = 400, description = "Malformed multipart body"),
        (status = 401, description = "Missing requester id"),
        (status = 422, description = "Invalid filename or oversized upload"),
        (status = 507, description = "Owner quota exceeded")
    )
)]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    RequesterId(requester): RequesterId,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let mut secret = false;
    let mut uploaded: Option<crate::file::File> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::error!("Failed to read multipart field: {}", e);
        ApiError::bad_request("Malformed multipart body")
    })? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "secret" => {
                let text = field.text().await.map_err(|e| {
                    tracing::error!("Failed to read secret field: {}", e);
                    ApiError::bad_request("Invalid secret field")
                })?;
                secret = text.trim().eq_ignore_ascii_case("true");
            }
            "file" => {
                let filename = field
                    .file_name()
                    .map(|s| s.to_string())
                    .ok_or_else(|| ApiError::bad_request("No filename provided"))?;

                let reader = StreamReader::new(
                    field.map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e)),
                );
                let file = state
                    .file_service()
                    .upload(&requester, &filename, secret, reader)
                    .await?;

                uploaded = Some(file);
                // The body stream is consumed; any later fields are not read.
                break;
            }
            _ => {}
        }
    }

    let file = uploaded.ok_or_else(|| ApiError::bad_request("No file provided"))?;

    Ok((StatusCode::CREATED, Json(UploadResponse::from(file))))
}

/// GET /api/v1/downloads/:id - Download a file's content.
///
/// Serves the blob as application/octet-stream with an attachment
/// Content-Disposition. Honors single-range Range headers with 206
/// responses.
#[utoipa::path(
    get,
    path = "/downloads/{id}",
    tag = "files",
    params(
        ("id" = String, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File content", content_type = "application/octet-stream"),
        (status = 206, description = "Partial file content", content_type = "application/octet-stream"),
        (status = 401, description = "Missing requester id"),
        (status = 404, description = "File not found or not visible"),
        (status = 416, description = "Requested range not satisfiable")
    )
)]
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    RequesterId(requester): RequesterId,
    Path(file_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let Download {
        file,
        mut reader,
        length,
    } = state.file_service().download(&requester, &file_id).await?;

    let range = headers
        .get(header::RANGE)
        .and_then(|value| value.to_str().ok())
        .map(|value| parse_range(value, length))
        .unwrap_or(RangeSpec::Full);

    let response = match range {
        RangeSpec::Unsatisfiable => Response::builder()
            .status(StatusCode::RANGE_NOT_SATISFIABLE)
            .header(header::CONTENT_RANGE, format!("bytes */{}", length))
            .body(Body::empty()),
        RangeSpec::Full => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .header(
                header::CONTENT_DISPOSITION,
                content_disposition_header(&file.file_name),
            )
            .header(header::CONTENT_LENGTH, length)
            .header(header::ACCEPT_RANGES, "bytes")
            .body(Body::from_stream(ReaderStream::new(reader))),
        RangeSpec::Partial { start, end } => {
            reader.seek(SeekFrom::Start(start)).await.map_err(|e| {
                tracing::error!("Failed to seek blob for {}: {}", file.file_id, e);
                ApiError::internal("Failed to read file")
            })?;
            let window = end - start + 1;
            Response::builder()
                .status(StatusCode::PARTIAL_CONTENT)
                .header(header::CONTENT_TYPE, "application/octet-stream")
                .header(
                    header::CONTENT_DISPOSITION,
                    content_disposition_header(&file.file_name),
                )
                .header(header::CONTENT_LENGTH, window)
                .header(header::ACCEPT_RANGES, "bytes")
                .header(
                    header::CONTENT_RANGE,
                    format!("bytes {}-{}/{}", start, end, length),
                )
                .body(Body::from_stream(ReaderStream::new(reader.take(window))))
        }
    };

    response.map_err(|e| {
        tracing::error!("Failed to build response: {}", e);
        ApiError::internal("Failed to build response")
    })
}
