//! Request body extraction with validation.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::web::error::ApiError;

/// JSON extractor that runs the payload through its `validator` rules.
///
/// Deserialization failures become a 400 response; a payload that parses
/// but breaks a validation rule becomes a 422 carrying the offending
/// fields, so handlers only ever see well-formed input.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("Malformed JSON body: {e}")))?;

        payload
            .validate()
            .map_err(ApiError::from_validation_errors)?;

        Ok(ValidatedJson(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::dto::UpdateFileRequest;
    use axum::body::Body;
    use axum::http::{header, Request};

    fn json_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("PUT")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_body_passes() {
        let req = json_request(
            r#"{"filename": "notes.txt", "secret": false, "editors": [], "viewers": []}"#,
        );
        let result = ValidatedJson::<UpdateFileRequest>::from_request(req, &()).await;
        let ValidatedJson(payload) = result.unwrap();
        assert_eq!(payload.filename, "notes.txt");
    }

    #[tokio::test]
    async fn test_missing_required_field_is_bad_request() {
        // editors/viewers omitted entirely
        let req = json_request(r#"{"filename": "notes.txt"}"#);
        let result = ValidatedJson::<UpdateFileRequest>::from_request(req, &()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_invalid_field_fails_validation() {
        let req = json_request(r#"{"filename": "", "editors": [], "viewers": []}"#);
        let result = ValidatedJson::<UpdateFileRequest>::from_request(req, &()).await;
        assert!(result.is_err());
    }
}
