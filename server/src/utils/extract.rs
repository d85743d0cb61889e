//! Request extractors that reject with `AppError` instead of axum's
//! plain-text rejections.

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use crate::utils::error::AppError;

/// JSON request body.
///
/// Unlike `axum::Json` this ignores `Content-Type` and reports every decode
/// problem as a 400.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::ValidationError(format!("Failed to read request body: {}", e)))?;

        if bytes.is_empty() {
            return Err(AppError::ValidationError("Request body is empty".to_string()));
        }

        serde_json::from_slice(&bytes)
            .map(JsonBody)
            .map_err(|e| AppError::ValidationError(format!("Error decoding event: {}", e)))
    }
}

/// The `{id}` path segment parsed as an event id.
#[derive(Debug, Clone, Copy)]
pub struct EventId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for EventId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::ValidationError(e.body_text()))?;

        raw.parse::<i64>()
            .map(EventId)
            .map_err(|_| AppError::ValidationError(format!("Invalid id: {}", raw)))
    }
}
