use axum::body::Body;
use axum::http::Request;
use axum::{routing::get, Router};
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer, Config, UuidRequestId};
use crate::handlers::{
    create_event, delete_event, get_event, list_events, route_not_found, update_event,
};
use crate::repository::SharedRepository;

pub const EVENT_PATH: &str = "/event";
pub const EVENT_ID_PATH: &str = "/event/:id";

/// Builds the event API. Requests with a method a route does not register
/// get a 405 from the router before any handler runs.
pub fn create_routes(repository: SharedRepository, config: &Config) -> Router {
    Router::new()
        .route(EVENT_PATH, get(list_events).post(create_event))
        .route(
            EVENT_ID_PATH,
            get(get_event).put(update_event).delete(delete_event),
        )
        .fallback(route_not_found)
        .with_state(repository)
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            }),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
        .layer(create_security_headers_layer(config.production))
        .layer(create_cors_layer(&config.cors_allowed_origins))
}
