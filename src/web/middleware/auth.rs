//! Requester identification middleware.
//!
//! Cubby sits behind a gateway that authenticates users and forwards the
//! user id in the `x-user-id` header. The extractor here trusts that header;
//! requests without it are rejected as unauthorized.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::web::error::ApiError;

/// Header carrying the authenticated user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Extractor for the requesting user's id.
///
/// Use this extractor to require an identified requester for a handler.
#[derive(Debug, Clone)]
pub struct RequesterId(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for RequesterId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ApiError::unauthorized(format!("Missing {} header", USER_ID_HEADER)))?;

        Ok(RequesterId(user_id.to_string()))
    }
}
