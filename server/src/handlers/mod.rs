use axum::http::Uri;
use axum::response::{IntoResponse, Response};

use crate::utils::error::AppError;

pub mod event;

pub use event::{create_event, delete_event, get_event, list_events, update_event};

pub async fn route_not_found(uri: Uri) -> Response {
    AppError::NotFound(format!("No route for '{}'", uri.path())).into_response()
}
