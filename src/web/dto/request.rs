//! Request DTOs for the Web API.

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// File update request.
///
/// `editors` and `viewers` are required; a request that omits them is
/// rejected before it reaches the service layer. When `secret` is true the
/// lists are accepted but not applied, since secret files carry no grants.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFileRequest {
    /// New file name.
    #[validate(length(min = 1, max = 100, message = "Filename must be between 1 and 100 characters"))]
    pub filename: String,
    /// Whether the file is secret (owner-only).
    #[serde(default)]
    pub secret: bool,
    /// User ids granted edit access.
    pub editors: Vec<String>,
    /// User ids granted read access.
    pub viewers: Vec<String>,
}

impl UpdateFileRequest {
    /// Convert into the service-layer update, dropping the grant lists when
    /// the file is secret.
    pub fn into_update(self) -> crate::file::FileUpdate {
        let visibility = if self.secret {
            crate::file::Visibility::Private
        } else {
            crate::file::Visibility::Shared {
                editors: self.editors,
                viewers: self.viewers,
            }
        };
        crate::file::FileUpdate {
            file_name: self.filename,
            visibility,
        }
    }
}

/// Query parameters for listing files.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListQuery {
    /// Page number (0-based).
    #[serde(default)]
    pub page: i64,
    /// Page size (1-50; out-of-range values fall back to 50).
    #[serde(default)]
    pub size: i64,
    /// Substring filter on the file name.
    #[serde(default)]
    pub filename: Option<String>,
    /// When true, list only the requester's secret files.
    #[serde(default)]
    pub secret: bool,
}

impl ListQuery {
    /// Convert into the service-layer listing parameters.
    pub fn into_params(self) -> crate::file::ListParams {
        crate::file::ListParams {
            page: self.page,
            size: self.size,
            filename: self.filename,
            secret_only: self.secret,
        }
    }
}
