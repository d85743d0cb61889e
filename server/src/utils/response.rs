use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::utils::error::AppError;

#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
    pub details: Option<Value>,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub success: bool,
    pub error: ApiErrorBody,
}

/// Serializes `data` as a JSON response body.
///
/// Encoding happens here rather than inside `axum::Json` so a failure surfaces
/// as an `AppError` and goes through the usual logging.
pub fn json<T>(status: StatusCode, data: &T) -> Result<Response, AppError>
where
    T: Serialize + ?Sized,
{
    let body = serde_json::to_vec(data)?;
    Ok((
        status,
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        )],
        body,
    )
        .into_response())
}

pub fn empty_success() -> Response {
    StatusCode::OK.into_response()
}

pub fn error(code: &str, message: impl Into<String>, status: StatusCode) -> Response {
    let body = ApiErrorResponse {
        success: false,
        error: ApiErrorBody {
            code: code.to_string(),
            message: message.into(),
            // Internal details never reach the client
            details: None,
        },
    };

    (status, Json(body)).into_response()
}
